use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::NamedTempFile;

use super::name::{copy_name, validate_filename, DocumentKind, DocumentName, FilenameError};

const BACKUP_SUFFIX: &str = ".bak";

/// Mode given to documents that did not exist before a write.
#[cfg(unix)]
pub const DOCUMENT_MODE: u32 = 0o644;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("{0} does not exist.")]
    NotFound(String),
    #[error("{0} already exists.")]
    AlreadyExists(String),
    #[error(transparent)]
    Filename(#[from] FilenameError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// A flat directory of documents.
///
/// Reads go straight to disk. Mutations are serialized through a
/// store-wide lock shared by every clone of the handle, and content is
/// written to a temporary file in the same directory before being moved
/// over its target.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl DocumentStore {
    /// Open the store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, DocumentError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filenames of every document in the store, sorted.
    pub fn list(&self) -> Result<Vec<String>, DocumentError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if is_listed(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    pub fn read(&self, name: &str) -> Result<Vec<u8>, DocumentError> {
        let path = self.resolve(name)?;
        fs::read(&path).map_err(|e| not_found_or_io(e, name))
    }

    /// Create or overwrite `name` with `content`.
    pub fn write(&self, name: &str, content: &[u8]) -> Result<DocumentName, DocumentError> {
        let name = validate_filename(name)?;
        let _guard = self.lock.lock();
        let path = self.root.join(name.to_string());
        self.write_unlocked(&path, &path, content)?;
        tracing::info!(document = %name, bytes = content.len(), "document written");
        Ok(name)
    }

    /// Save `content` under `new`, removing `old` when the name changed.
    ///
    /// `new` is validated before anything is touched, so a rejected name
    /// leaves `old` exactly as it was.
    pub fn rename(
        &self,
        old: &str,
        new: &str,
        content: &[u8],
    ) -> Result<DocumentName, DocumentError> {
        let new_name = validate_filename(new)?;
        let _guard = self.lock.lock();

        let old_path = self.resolve(old)?;
        let new_path = self.root.join(new_name.to_string());
        self.write_unlocked(&new_path, &old_path, content)?;

        if old_path != new_path {
            fs::remove_file(&old_path).map_err(|e| not_found_or_io(e, old))?;
            tracing::info!(from = %old, to = %new_name, "document renamed");
        } else {
            tracing::info!(document = %new_name, bytes = content.len(), "document updated");
        }

        Ok(new_name)
    }

    pub fn delete(&self, name: &str) -> Result<(), DocumentError> {
        let _guard = self.lock.lock();
        let path = self.resolve(name)?;
        fs::remove_file(&path).map_err(|e| not_found_or_io(e, name))?;
        tracing::info!(document = %name, "document deleted");
        Ok(())
    }

    /// Copy `name` to its `-copy` sibling and return the sibling's name.
    ///
    /// An existing copy is overwritten.
    pub fn duplicate(&self, name: &str) -> Result<String, DocumentError> {
        let _guard = self.lock.lock();
        let path = self.resolve(name)?;
        let content = fs::read(&path).map_err(|e| not_found_or_io(e, name))?;

        let copy = copy_name(name);
        self.write_unlocked(&self.root.join(&copy), &path, &content)?;
        tracing::info!(document = %name, copy = %copy, "document duplicated");
        Ok(copy)
    }

    /// Create an empty document. Fails with `AlreadyExists` rather than
    /// truncating an existing file.
    pub fn create(&self, name: &str) -> Result<DocumentName, DocumentError> {
        let name = validate_filename(name)?;
        let _guard = self.lock.lock();

        let filename = name.to_string();
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.root.join(&filename))
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => DocumentError::AlreadyExists(filename.clone()),
                _ => DocumentError::Io(e),
            })?;

        tracing::info!(document = %name, "document created");
        Ok(name)
    }

    /// Map a stored filename to its path, if it names a file directly
    /// inside the store root.
    fn resolve(&self, name: &str) -> Result<PathBuf, DocumentError> {
        let contained = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(|c: char| matches!(c, '/' | '\\' | '\0'));
        if !contained {
            return Err(DocumentError::NotFound(name.to_string()));
        }

        let path = self.root.join(name);
        if !path.is_file() {
            return Err(DocumentError::NotFound(name.to_string()));
        }
        Ok(path)
    }

    /// Replace `path` with `content`, giving it the permissions of `like`
    /// (or the default document mode when `like` is absent).
    ///
    /// Caller holds the store lock.
    fn write_unlocked(
        &self,
        path: &Path,
        like: &Path,
        content: &[u8],
    ) -> Result<(), DocumentError> {
        let permissions = carried_permissions(like);

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(content)?;
        if let Some(permissions) = permissions {
            tmp.as_file().set_permissions(permissions)?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

// temp files are created 0600; documents should not change mode on save
fn carried_permissions(like: &Path) -> Option<fs::Permissions> {
    match fs::metadata(like) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => default_permissions(),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(DOCUMENT_MODE))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

/// Whether a directory entry counts as a document.
fn is_listed(name: &str) -> bool {
    if name.starts_with('.') || name.ends_with(BACKUP_SUFFIX) {
        return false;
    }
    match name.rsplit_once('.') {
        Some((base, extension)) => {
            !base.is_empty() && DocumentKind::from_extension(extension).is_some()
        }
        None => false,
    }
}

fn not_found_or_io(err: io::Error, name: &str) -> DocumentError {
    match err.kind() {
        io::ErrorKind::NotFound => DocumentError::NotFound(name.to_string()),
        _ => DocumentError::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_listed() {
        assert!(is_listed("a.txt"));
        assert!(is_listed("notes.v2.md"));
        assert!(!is_listed(".hidden"));
        assert!(!is_listed(".hidden.txt"));
        assert!(!is_listed("b.bak"));
        assert!(!is_listed("a.txt.bak"));
        assert!(!is_listed("noext"));
        assert!(!is_listed("image.png"));
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = DocumentStore::open(temp.path().join("data")).unwrap();
        fs::write(temp.path().join("outside.txt"), b"secret").unwrap();

        assert!(matches!(
            store.read("../outside.txt"),
            Err(DocumentError::NotFound(_))
        ));
        assert!(matches!(store.read(""), Err(DocumentError::NotFound(_))));
        assert!(matches!(store.read(".."), Err(DocumentError::NotFound(_))));
    }

    #[test]
    fn test_open_creates_root() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().join("nested").join("data");
        let store = DocumentStore::open(&root).unwrap();
        assert!(root.is_dir());
        assert!(store.list().unwrap().is_empty());
    }
}
