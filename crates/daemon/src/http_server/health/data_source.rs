use std::fmt::Debug;
use std::ops::Deref;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use http::request::Parts;

use common::accounts::CredentialStore;
use common::documents::DocumentStore;

use crate::ServiceState;

#[async_trait]
pub trait DataSource {
    /// Check that the stores backing the service can be read.
    async fn is_ready(&self) -> Result<(), DataSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("document directory is not available")]
    DocumentsUnavailable,

    #[error("credentials file can't be read")]
    CredentialsUnreadable,
}

pub type DynDataSource = Arc<dyn DataSource + Send + Sync>;

pub struct StateDataSource(DynDataSource);

impl Debug for StateDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateDataSource").finish()
    }
}

impl StateDataSource {
    #[cfg(test)]
    pub fn new(dds: DynDataSource) -> Self {
        Self(dds)
    }
}

impl Deref for StateDataSource {
    type Target = DynDataSource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

struct StoreSource {
    documents: DocumentStore,
    credentials: CredentialStore,
}

#[async_trait]
impl DataSource for StoreSource {
    async fn is_ready(&self) -> Result<(), DataSourceError> {
        self.documents
            .list()
            .map_err(|_| DataSourceError::DocumentsUnavailable)?;
        self.credentials.load_all().map_err(|e| {
            tracing::warn!("readiness: {}", e);
            DataSourceError::CredentialsUnreadable
        })?;
        Ok(())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for StateDataSource
where
    ServiceState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ();

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = ServiceState::from_ref(state);
        Ok(StateDataSource(Arc::new(StoreSource {
            documents: state.documents().clone(),
            credentials: state.credentials().clone(),
        })))
    }
}
