use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use parking_lot::Mutex;
use tempfile::NamedTempFile;

/// Username to argon2 PHC hash string.
pub type Credentials = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credentials file {} is corrupt: {source}", .path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize credentials: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Flat JSON file of credential records.
///
/// The file is always read and written whole. A missing or blank file is
/// an empty store.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_all(&self) -> Result<Credentials, CredentialError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Credentials::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Credentials::new());
        }

        serde_json::from_str(&raw).map_err(|source| CredentialError::CorruptStore {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the persisted store with `credentials`.
    pub fn save_all(&self, credentials: &Credentials) -> Result<(), CredentialError> {
        let json = serde_json::to_string_pretty(credentials).map_err(CredentialError::Serialize)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    pub fn exists(&self, username: &str) -> Result<bool, CredentialError> {
        Ok(self.load_all()?.contains_key(username))
    }

    pub fn usernames(&self) -> Result<Vec<String>, CredentialError> {
        Ok(self.load_all()?.into_keys().collect())
    }

    /// Check `password` against the stored hash for `username`.
    ///
    /// Unknown users and unreadable hashes verify as `false`.
    pub fn verify(&self, username: &str, password: &str) -> Result<bool, CredentialError> {
        let credentials = self.load_all()?;
        let Some(stored) = credentials.get(username) else {
            return Ok(false);
        };

        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(username = %username, "stored password hash is invalid: {}", e);
                return Ok(false);
            }
        };

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Load the store, apply `f`, and save the result if `f` succeeds.
    ///
    /// Concurrent updates through clones of this handle are serialized.
    pub fn update<F, E>(&self, f: F) -> Result<(), E>
    where
        F: FnOnce(&mut Credentials) -> Result<(), E>,
        E: From<CredentialError>,
    {
        let _guard = self.lock.lock();
        let mut credentials = self.load_all()?;
        f(&mut credentials)?;
        self.save_all(&credentials)?;
        Ok(())
    }
}

/// Hash `password` with argon2 and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hash(e.to_string()))
}
