use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::SignedCookieJar;

use common::accounts::CredentialError;
use common::documents::DocumentError;
use common::session::{AccessError, Session};

mod file_actions;
mod file_editor;
mod file_viewer;
mod index;
mod new_file;
mod users;

use super::session;
use crate::ServiceState;

pub fn router() -> Router<ServiceState> {
    Router::new()
        .route("/", get(index::handler))
        .route("/new", get(new_file::handler))
        .route("/create", post(new_file::create_handler))
        .route("/users/signin", get(users::signin_form).post(users::signin))
        .route("/users/signout", post(users::signout))
        .route("/users/signup", get(users::signup_form).post(users::signup))
        .route(
            "/:filename",
            get(file_viewer::handler).post(file_editor::save_handler),
        )
        .route("/:filename/edit", get(file_editor::handler))
        .route("/:filename/delete", post(file_actions::delete_handler))
        .route("/:filename/duplicate", post(file_actions::duplicate_handler))
}

/// Values every page's layout needs.
pub struct Layout {
    pub username: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl Layout {
    /// Consume the session's flash messages for this render.
    pub fn take(session: &mut Session) -> Self {
        let flash = session.take_flash();
        Self {
            username: session.username.clone().filter(|_| session.signed_in),
            error: flash.error,
            success: flash.success,
        }
    }
}

/// Send anonymous visitors home with an explanation.
fn deny(jar: SignedCookieJar, mut session: Session, err: AccessError) -> Response {
    tracing::debug!("rejecting anonymous request: {}", err);
    session.set_error(err.to_string());
    session::redirect(jar, &session, "/")
}

/// Flash `message` as an error and send the browser to `to`.
fn fail(
    jar: SignedCookieJar,
    mut session: Session,
    message: impl Into<String>,
    to: &str,
) -> Response {
    session.set_error(message);
    session::redirect(jar, &session, to)
}

/// Flash `message` as a success and send the browser to `to`.
fn succeed(
    jar: SignedCookieJar,
    mut session: Session,
    message: impl Into<String>,
    to: &str,
) -> Response {
    session.set_success(message);
    session::redirect(jar, &session, to)
}

/// Failures a page can't recover from by asking the user to try again.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("document store error: {0}")]
    Documents(#[from] DocumentError),
    #[error("credential store error: {0}")]
    Credentials(#[from] CredentialError),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected error").into_response()
    }
}
