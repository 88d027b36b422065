use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::{Path, State};
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
#[template(path = "edit.html")]
pub struct EditTemplate {
    pub layout: Layout,
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub filename: String,
    pub content: String,
}

#[instrument(skip(state, jar))]
pub async fn handler(
    State(state): State<ServiceState>,
    Path(filename): Path<String>,
    jar: SignedCookieJar,
) -> Result<Response, PageError> {
    let mut session = session::load(&jar);
    if let Err(e) = require_signed_in(&session) {
        return Ok(deny(jar, session, e));
    }

    let content = match state.documents().read(&filename) {
        Ok(content) => content,
        Err(e @ DocumentError::NotFound(_)) => return Ok(fail(jar, session, e.to_string(), "/")),
        Err(e) => return Err(e.into()),
    };

    let layout = Layout::take(&mut session);
    let template = EditTemplate {
        layout,
        content: String::from_utf8_lossy(&content).into_owned(),
        filename,
    };
    Ok((session::store(jar, &session), template).into_response())
}

/// Save the form, renaming when the submitted name differs from the path.
#[instrument(skip(state, jar, form))]
pub async fn save_handler(
    State(state): State<ServiceState>,
    Path(filename): Path<String>,
    jar: SignedCookieJar,
    Form(form): Form<EditForm>,
) -> Result<Response, PageError> {
    let session = session::load(&jar);
    if let Err(e) = require_signed_in(&session) {
        return Ok(deny(jar, session, e));
    }

    let back = format!("/{}/edit", filename);
    match state
        .documents()
        .rename(&filename, &form.filename, form.content.as_bytes())
    {
        Ok(name) => Ok(succeed(jar, session, format!("{} has been updated.", name), "/")),
        Err(e @ DocumentError::NotFound(_)) => Ok(fail(jar, session, e.to_string(), "/")),
        Err(DocumentError::Filename(e)) => Ok(fail(jar, session, e.to_string(), &back)),
        Err(e) => Err(e.into()),
    }
}
