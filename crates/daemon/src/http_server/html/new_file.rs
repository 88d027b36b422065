use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::State;
use axum::response::Response;
use axum::Form;
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use tracing::instrument;

use common::documents::DocumentError;
use common::session::require_signed_in;

use super::{deny, fail, session, succeed, Layout, PageError};
use crate::ServiceState;

#[derive(Template)]
#[template(path = "new.html")]
pub struct NewTemplate {
    pub layout: Layout,
}

#[derive(Debug, Deserialize)]
pub struct NewForm {
    pub filename: String,
}

#[instrument(skip(jar))]
pub async fn handler(jar: SignedCookieJar) -> Response {
    let mut session = session::load(&jar);
    if let Err(e) = require_signed_in(&session) {
        return deny(jar, session, e);
    }

    let layout = Layout::take(&mut session);
    (session::store(jar, &session), NewTemplate { layout }).into_response()
}

#[instrument(skip(state, jar))]
pub async fn create_handler(
    State(state): State<ServiceState>,
    jar: SignedCookieJar,
    Form(form): Form<NewForm>,
) -> Result<Response, PageError> {
    let session = session::load(&jar);
    if let Err(e) = require_signed_in(&session) {
        return Ok(deny(jar, session, e));
    }

    match state.documents().create(&form.filename) {
        Ok(name) => Ok(succeed(jar, session, format!("{} has been created.", name), "/")),
        Err(e @ (DocumentError::Filename(_) | DocumentError::AlreadyExists(_))) => {
            Ok(fail(jar, session, e.to_string(), "/new"))
        }
        Err(e) => Err(e.into()),
    }
}
