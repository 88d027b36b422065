use std::path::PathBuf;

use axum_extra::extract::cookie::Key;

pub struct Config {
    // http server configuration
    /// Port for the web server
    pub app_port: u16,

    // data store configuration
    /// Directory holding the documents
    pub data_dir: PathBuf,
    /// Flat file holding the credential records
    pub users_path: PathBuf,
    /// Key used to sign the session cookie
    pub session_key: Key,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("app_port", &self.app_port)
            .field("data_dir", &self.data_dir)
            .field("users_path", &self.users_path)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .finish_non_exhaustive()
    }
}
