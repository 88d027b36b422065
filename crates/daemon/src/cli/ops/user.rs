use clap::{Args, Subcommand};

use common::accounts::{sign_up, AccountError, CredentialError, CredentialStore};
use folio_daemon::state::{AppState, StateError};

use crate::cli::op::{Op, OpContext};

/// Manage accounts without going through the web front end.
#[derive(Args, Debug, Clone)]
pub struct User {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum UserCommand {
    /// Create an account
    Add {
        username: String,
        password: String,
    },
    /// List usernames
    Ls,
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Credentials(#[from] CredentialError),
}

#[async_trait::async_trait]
impl Op for User {
    type Error = UserError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let store = CredentialStore::new(&state.users_path);

        match &self.command {
            UserCommand::Add { username, password } => {
                sign_up(&store, username, password)?;
                Ok(format!("{} has been added.", username))
            }
            UserCommand::Ls => {
                let usernames = store.usernames()?;
                if usernames.is_empty() {
                    return Ok("No users.".to_string());
                }
                Ok(usernames.join("\n"))
            }
        }
    }
}
