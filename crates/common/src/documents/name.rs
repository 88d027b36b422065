use std::fmt;

/// Suffix inserted before the extension when a document is duplicated.
pub const COPY_SUFFIX: &str = "-copy";

/// The closed set of document formats the store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Text,
    Markdown,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 2] = [DocumentKind::Text, DocumentKind::Markdown];

    /// Match an extension (without the leading dot). Matching is case-sensitive.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "txt" => Some(DocumentKind::Text),
            "md" => Some(DocumentKind::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Text => "txt",
            DocumentKind::Markdown => "md",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Text => "text/plain",
            DocumentKind::Markdown => "text/html",
        }
    }
}

/// A filename that passed [`validate_filename`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentName {
    base: String,
    kind: DocumentKind,
}

impl DocumentName {
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.base, self.kind.extension())
    }
}

/// Filename policy violations. The display text is shown to users as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilenameError {
    #[error("A name is required.")]
    EmptyName,
    #[error("A file extension is required.")]
    MissingExtension,
    #[error("Only .txt and .md files are supported.")]
    InvalidExtension(String),
    #[error("A name may not contain slashes or begin with a dot.")]
    InvalidCharacters,
}

/// Check a proposed document filename against the store's naming rules.
///
/// Surrounding whitespace is ignored. The base name is everything before the
/// last `.`, and must be non-empty.
pub fn validate_filename(name: &str) -> Result<DocumentName, FilenameError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FilenameError::EmptyName);
    }
    if name.contains(|c: char| matches!(c, '/' | '\\' | '\0')) {
        return Err(FilenameError::InvalidCharacters);
    }

    let (base, extension) = name
        .rsplit_once('.')
        .ok_or(FilenameError::MissingExtension)?;
    if base.is_empty() {
        // ".md" has an extension but nothing to name
        return Err(FilenameError::EmptyName);
    }
    if base.starts_with('.') {
        return Err(FilenameError::InvalidCharacters);
    }
    if extension.is_empty() {
        return Err(FilenameError::MissingExtension);
    }

    let kind = DocumentKind::from_extension(extension)
        .ok_or_else(|| FilenameError::InvalidExtension(extension.to_string()))?;

    Ok(DocumentName {
        base: base.to_string(),
        kind,
    })
}

/// Derive the name a duplicate of `name` is written to: `about.md` becomes
/// `about-copy.md`. Names without an extension get the suffix appended.
pub fn copy_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((base, extension)) if !base.is_empty() => {
            format!("{}{}.{}", base, COPY_SUFFIX, extension)
        }
        _ => format!("{}{}", name, COPY_SUFFIX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_extensions() {
        let name = validate_filename("about.md").unwrap();
        assert_eq!(name.base(), "about");
        assert_eq!(name.kind(), DocumentKind::Markdown);
        assert_eq!(name.to_string(), "about.md");

        let name = validate_filename("  notes.v2.txt ").unwrap();
        assert_eq!(name.base(), "notes.v2");
        assert_eq!(name.kind(), DocumentKind::Text);
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(validate_filename(""), Err(FilenameError::EmptyName));
        assert_eq!(validate_filename("   "), Err(FilenameError::EmptyName));
        assert_eq!(validate_filename(".md"), Err(FilenameError::EmptyName));
    }

    #[test]
    fn test_missing_extension() {
        assert_eq!(
            validate_filename("readme"),
            Err(FilenameError::MissingExtension)
        );
        assert_eq!(
            validate_filename("readme."),
            Err(FilenameError::MissingExtension)
        );
    }

    #[test]
    fn test_invalid_extension() {
        assert_eq!(
            validate_filename("b.doc"),
            Err(FilenameError::InvalidExtension("doc".to_string()))
        );
        assert_eq!(
            validate_filename("b.MD"),
            Err(FilenameError::InvalidExtension("MD".to_string()))
        );
        assert_eq!(
            FilenameError::InvalidExtension("doc".into()).to_string(),
            "Only .txt and .md files are supported."
        );
    }

    #[test]
    fn test_rejects_paths_and_dotfiles() {
        assert_eq!(
            validate_filename("../etc/passwd.txt"),
            Err(FilenameError::InvalidCharacters)
        );
        assert_eq!(
            validate_filename("dir\\a.txt"),
            Err(FilenameError::InvalidCharacters)
        );
        assert_eq!(
            validate_filename("..hidden.txt"),
            Err(FilenameError::InvalidCharacters)
        );
    }

    #[test]
    fn test_accepted_names_always_have_base_and_known_extension() {
        let candidates = [
            "a.txt", "a.md", ".txt", "a", "a.", "a.bak", "a.txt.bak", "x.y.md", " .md",
        ];
        for candidate in candidates {
            if let Ok(name) = validate_filename(candidate) {
                assert!(!name.base().is_empty(), "{candidate}");
                assert!(DocumentKind::ALL.contains(&name.kind()), "{candidate}");
            }
        }
    }

    #[test]
    fn test_copy_name() {
        assert_eq!(copy_name("about.md"), "about-copy.md");
        assert_eq!(copy_name("about-copy.md"), "about-copy-copy.md");
        assert_eq!(copy_name("notes.v2.txt"), "notes.v2-copy.txt");
        assert_eq!(copy_name("plain"), "plain-copy");
    }
}
