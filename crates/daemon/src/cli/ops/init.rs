use clap::Args;

use folio_daemon::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port the web server listens on
    #[arg(long)]
    pub app_port: Option<u16>,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = StateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut config = AppConfig::default();
        if let Some(port) = self.app_port {
            config.app_port = port;
        }

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        Ok(format!(
            "Initialized folio directory at {}\n  documents: {}\n  users:     {}\n  port:      {}",
            state.folio_dir.display(),
            state.data_path.display(),
            state.users_path.display(),
            state.config.app_port,
        ))
    }
}
