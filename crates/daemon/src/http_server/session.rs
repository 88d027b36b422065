//! Cookie-backed storage for [`Session`].
//!
//! The session is serialized to JSON, base64url-encoded, and kept in a single
//! signed cookie. A missing, tampered or unreadable cookie is treated as an
//! anonymous session.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use common::session::Session;

pub const SESSION_COOKIE: &str = "folio_session";

pub fn load(jar: &SignedCookieJar) -> Session {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| decode(cookie.value()))
        .unwrap_or_default()
}

pub fn store(jar: SignedCookieJar, session: &Session) -> SignedCookieJar {
    let Some(value) = encode(session) else {
        return jar;
    };
    let cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Persist `session` and send the browser to `to`.
pub fn redirect(jar: SignedCookieJar, session: &Session, to: &str) -> Response {
    (store(jar, session), Redirect::to(to)).into_response()
}

fn encode(session: &Session) -> Option<String> {
    match serde_json::to_vec(session) {
        Ok(json) => Some(URL_SAFE_NO_PAD.encode(json)),
        Err(e) => {
            tracing::error!("failed to serialize session: {}", e);
            None
        }
    }
}

fn decode(value: &str) -> Option<Session> {
    let json = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&json).ok()
}
