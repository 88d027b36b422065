use axum::extract::{Path, State};
use axum::response::Response;
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::instrument;

use common::documents::DocumentError;
use common::session::require_signed_in;

use super::{deny, fail, session, succeed, PageError};
use crate::ServiceState;

#[instrument(skip(state, jar))]
pub async fn delete_handler(
    State(state): State<ServiceState>,
    Path(filename): Path<String>,
    jar: SignedCookieJar,
) -> Result<Response, PageError> {
    let session = session::load(&jar);
    if let Err(e) = require_signed_in(&session) {
        return Ok(deny(jar, session, e));
    }

    match state.documents().delete(&filename) {
        Ok(()) => Ok(succeed(jar, session, format!("{} has been deleted.", filename), "/")),
        Err(e @ DocumentError::NotFound(_)) => Ok(fail(jar, session, e.to_string(), "/")),
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(state, jar))]
pub async fn duplicate_handler(
    State(state): State<ServiceState>,
    Path(filename): Path<String>,
    jar: SignedCookieJar,
) -> Result<Response, PageError> {
    let session = session::load(&jar);
    if let Err(e) = require_signed_in(&session) {
        return Ok(deny(jar, session, e));
    }

    match state.documents().duplicate(&filename) {
        Ok(copy) => Ok(succeed(
            jar,
            session,
            format!("{} has been duplicated as {}.", filename, copy),
            "/",
        )),
        Err(e @ DocumentError::NotFound(_)) => Ok(fail(jar, session, e.to_string(), "/")),
        Err(e) => Err(e.into()),
    }
}
