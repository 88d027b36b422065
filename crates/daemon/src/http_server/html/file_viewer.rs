use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::instrument;

use common::documents::{render, DocumentError};

use super::{fail, session, PageError};
use crate::ServiceState;

/// Serve a document's rendered body. Viewing does not require signing in.
#[instrument(skip(state, jar))]
pub async fn handler(
    State(state): State<ServiceState>,
    Path(filename): Path<String>,
    jar: SignedCookieJar,
) -> Result<Response, PageError> {
    let content = match state.documents().read(&filename) {
        Ok(content) => content,
        Err(e @ DocumentError::NotFound(_)) => {
            let session = session::load(&jar);
            return Ok(fail(jar, session, e.to_string(), "/"));
        }
        Err(e) => return Err(e.into()),
    };

    match render(&filename, &content) {
        Ok(rendered) => {
            Ok(([(header::CONTENT_TYPE, rendered.mime_type())], rendered.body).into_response())
        }
        Err(e) => {
            tracing::warn!(document = %filename, "can't render document: {}", e);
            let session = session::load(&jar);
            Ok(fail(jar, session, format!("{} can't be displayed.", filename), "/"))
        }
    }
}
