use askama::Template;
use askama_axum::IntoResponse;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use tracing::instrument;

use common::accounts::{sign_up, AccountError};

use super::{fail, session, succeed, Layout, PageError};
use crate::ServiceState;

#[derive(Template)]
#[template(path = "signin.html")]
pub struct SignInTemplate {
    pub layout: Layout,
    pub username: String,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignUpTemplate {
    pub layout: Layout,
}

#[derive(Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

pub async fn signin_form(jar: SignedCookieJar) -> Response {
    let mut session = session::load(&jar);
    let layout = Layout::take(&mut session);
    let template = SignInTemplate {
        layout,
        username: String::new(),
    };
    (session::store(jar, &session), template).into_response()
}

#[instrument(skip_all, fields(username = %form.username))]
pub async fn signin(
    State(state): State<ServiceState>,
    jar: SignedCookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, PageError> {
    let credentials = state.credentials().clone();
    let CredentialsForm { username, password } = form;

    let check = username.clone();
    let verified =
        tokio::task::spawn_blocking(move || credentials.verify(&check, &password)).await??;

    let mut session = session::load(&jar);
    if verified {
        tracing::info!("user signed in");
        session.sign_in(username);
        return Ok(succeed(jar, session, "Welcome!", "/"));
    }

    tracing::info!("rejected sign-in");
    session.set_error("Invalid credentials");
    let layout = Layout::take(&mut session);
    let template = SignInTemplate { layout, username };
    Ok((
        StatusCode::UNPROCESSABLE_ENTITY,
        session::store(jar, &session),
        template,
    )
        .into_response())
}

pub async fn signout(jar: SignedCookieJar) -> Response {
    let mut session = session::load(&jar);
    if let Some(username) = session.username.as_deref() {
        tracing::info!(username = %username, "user signed out");
    }
    session.sign_out();
    succeed(jar, session, "You have been signed out.", "/")
}

pub async fn signup_form(jar: SignedCookieJar) -> Response {
    let mut session = session::load(&jar);
    let layout = Layout::take(&mut session);
    (session::store(jar, &session), SignUpTemplate { layout }).into_response()
}

#[instrument(skip_all, fields(username = %form.username))]
pub async fn signup(
    State(state): State<ServiceState>,
    jar: SignedCookieJar,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, PageError> {
    let credentials = state.credentials().clone();
    let CredentialsForm { username, password } = form;

    let name = username.clone();
    let result =
        tokio::task::spawn_blocking(move || sign_up(&credentials, &name, &password)).await?;

    let session = session::load(&jar);
    match result {
        Ok(()) => Ok(succeed(
            jar,
            session,
            format!("{} successfully signed up! Please sign in below", username),
            "/users/signin",
        )),
        Err(AccountError::Store(e)) => Err(e.into()),
        Err(e) => Ok(fail(jar, session, e.to_string(), "/users/signup")),
    }
}
