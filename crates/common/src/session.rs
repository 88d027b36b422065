use serde::{Deserialize, Serialize};

/// Per-visitor state carried between requests.
///
/// `error` and `success` are flash messages: set by one request, shown and
/// cleared by the next page render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub signed_in: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub success: Option<String>,
}

/// The flash messages taken out of a session for one render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flash {
    pub error: Option<String>,
    pub success: Option<String>,
}

impl Session {
    pub fn sign_in(&mut self, username: impl Into<String>) {
        self.signed_in = true;
        self.username = Some(username.into());
    }

    pub fn sign_out(&mut self) {
        self.signed_in = false;
        self.username = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.success = Some(message.into());
    }

    /// Remove and return both flash messages.
    pub fn take_flash(&mut self) -> Flash {
        Flash {
            error: self.error.take(),
            success: self.success.take(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("You must be signed in to do that.")]
    Unauthorized,
}

/// Gate for operations that change documents.
pub fn require_signed_in(session: &Session) -> Result<(), AccessError> {
    if session.signed_in {
        Ok(())
    } else {
        Err(AccessError::Unauthorized)
    }
}
