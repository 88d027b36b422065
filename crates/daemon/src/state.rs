use std::{fs, path::PathBuf};

use axum_extra::extract::cookie::Key;
use base64::Engine;
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "folio";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const USERS_FILE_NAME: &str = "users.json";
pub const SESSION_KEY_FILE_NAME: &str = "session.key";
pub const DATA_DIR_NAME: &str = "data";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the web server
    #[serde(default = "default_app_port")]
    pub app_port: u16,
    /// Document directory (defaults to <folio dir>/data)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Credentials file (defaults to <folio dir>/users.json)
    #[serde(default)]
    pub users_file: Option<PathBuf>,
}

fn default_app_port() -> u16 {
    4567
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_port: default_app_port(),
            data_dir: None,
            users_file: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the folio directory (~/.folio)
    pub folio_dir: PathBuf,
    /// Path to the document directory
    pub data_path: PathBuf,
    /// Path to the credentials file
    pub users_path: PathBuf,
    /// Path to the cookie signing key
    pub key_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the folio directory path (custom or default ~/.folio)
    pub fn folio_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new folio directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let folio_dir = Self::folio_dir(custom_path)?;

        if folio_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&folio_dir)?;

        let config = config.unwrap_or_default();
        let config_path = folio_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        let (data_path, users_path) = Self::resolve_paths(&folio_dir, &config);
        fs::create_dir_all(&data_path)?;
        if !users_path.exists() {
            fs::write(&users_path, "{}\n")?;
        }

        // Generate and save the cookie signing key
        let key = Key::generate();
        let key_path = folio_dir.join(SESSION_KEY_FILE_NAME);
        fs::write(
            &key_path,
            base64::engine::general_purpose::STANDARD.encode(key.master()),
        )?;

        Ok(Self {
            folio_dir,
            data_path,
            users_path,
            key_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the folio directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let folio_dir = Self::folio_dir(custom_path)?;

        if !folio_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_path = folio_dir.join(CONFIG_FILE_NAME);
        let key_path = folio_dir.join(SESSION_KEY_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }
        if !key_path.exists() {
            return Err(StateError::MissingFile(SESSION_KEY_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        let (data_path, users_path) = Self::resolve_paths(&folio_dir, &config);
        if !data_path.is_dir() {
            return Err(StateError::MissingFile(format!("{}/", data_path.display())));
        }

        Ok(Self {
            folio_dir,
            data_path,
            users_path,
            key_path,
            config_path,
            config,
        })
    }

    /// Load the cookie signing key
    pub fn load_key(&self) -> Result<Key, StateError> {
        let encoded = fs::read_to_string(&self.key_path)?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| StateError::InvalidKey(e.to_string()))?;
        Key::try_from(bytes.as_slice()).map_err(|e| StateError::InvalidKey(e.to_string()))
    }

    fn resolve_paths(folio_dir: &std::path::Path, config: &AppConfig) -> (PathBuf, PathBuf) {
        let data_path = config
            .data_dir
            .clone()
            .unwrap_or_else(|| folio_dir.join(DATA_DIR_NAME));
        let users_path = config
            .users_file
            .clone()
            .unwrap_or_else(|| folio_dir.join(USERS_FILE_NAME));
        (data_path, users_path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("folio directory not initialized. Run 'folio init' first")]
    NotInitialized,

    #[error("folio directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid session key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("folio");

        let created = AppState::init(Some(dir.clone()), None).unwrap();
        assert!(created.data_path.is_dir());
        assert_eq!(fs::read_to_string(&created.users_path).unwrap(), "{}\n");

        let loaded = AppState::load(Some(dir.clone())).unwrap();
        assert_eq!(loaded.config, AppConfig::default());
        assert_eq!(loaded.data_path, dir.join(DATA_DIR_NAME));
        assert_eq!(
            loaded.load_key().unwrap().master(),
            created.load_key().unwrap().master()
        );
    }

    #[test]
    fn test_init_twice_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("folio");
        AppState::init(Some(dir.clone()), None).unwrap();
        assert!(matches!(
            AppState::init(Some(dir), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_uninitialized() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            AppState::load(Some(temp.path().join("missing"))),
            Err(StateError::NotInitialized)
        ));
    }

    #[test]
    fn test_custom_paths() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = AppConfig {
            app_port: 8080,
            data_dir: Some(temp.path().join("docs")),
            users_file: Some(temp.path().join("accounts.json")),
        };
        let state = AppState::init(Some(temp.path().join("folio")), Some(config)).unwrap();
        assert_eq!(state.data_path, temp.path().join("docs"));
        assert!(temp.path().join("accounts.json").exists());

        let loaded = AppState::load(Some(temp.path().join("folio"))).unwrap();
        assert_eq!(loaded.config.app_port, 8080);
    }
}
