use clap::{Args, Subcommand};

use common::documents::{DocumentError, DocumentStore};
use folio_daemon::state::{AppState, StateError};

use crate::cli::op::{Op, OpContext};

#[derive(Args, Debug, Clone)]
pub struct Doc {
    #[command(subcommand)]
    pub command: DocCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DocCommand {
    /// List documents in the store
    Ls,
}

#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error(transparent)]
    Documents(#[from] DocumentError),
}

#[async_trait::async_trait]
impl Op for Doc {
    type Error = DocError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let store = DocumentStore::open(&state.data_path)?;

        match self.command {
            DocCommand::Ls => {
                let names = store.list()?;
                if names.is_empty() {
                    return Ok("No documents.".to_string());
                }
                Ok(names.join("\n"))
            }
        }
    }
}
