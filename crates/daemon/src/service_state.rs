use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use common::accounts::CredentialStore;
use common::documents::{DocumentError, DocumentStore};

use crate::ServiceConfig;

/// Handles shared by every request.
#[derive(Clone)]
pub struct State {
    documents: DocumentStore,
    credentials: CredentialStore,
    session_key: Key,
}

impl State {
    pub fn new(documents: DocumentStore, credentials: CredentialStore, session_key: Key) -> Self {
        Self {
            documents,
            credentials,
            session_key,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, StateSetupError> {
        let documents = DocumentStore::open(&config.data_dir)?;
        let credentials = CredentialStore::new(&config.users_path);

        tracing::info!(
            data_dir = %config.data_dir.display(),
            users = %config.users_path.display(),
            "stores opened"
        );

        Ok(Self::new(documents, credentials, config.session_key.clone()))
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }
}

impl FromRef<State> for Key {
    fn from_ref(state: &State) -> Self {
        state.session_key.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("failed to open document store: {0}")]
    Documents(#[from] DocumentError),
}
