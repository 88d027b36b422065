use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::State;
use axum::response::Response;
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::instrument;

use super::{session, Layout, PageError};
use crate::ServiceState;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub layout: Layout,
    pub documents: Vec<String>,
}

#[instrument(skip(state, jar))]
pub async fn handler(
    State(state): State<ServiceState>,
    jar: SignedCookieJar,
) -> Result<Response, PageError> {
    let documents = state.documents().list()?;

    let mut session = session::load(&jar);
    let layout = Layout::take(&mut session);

    let template = IndexTemplate { layout, documents };
    Ok((session::store(jar, &session), template).into_response())
}
