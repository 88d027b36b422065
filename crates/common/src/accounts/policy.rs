use super::credentials::{hash_password, CredentialError, CredentialStore};

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Reasons a new account is refused. The display text is shown to users
/// as-is.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Username is too short, must be at least 3 characters long.")]
    UsernameTooShort,
    #[error("Username {0} is already taken.")]
    AlreadyExists(String),
    #[error("Password is too short, must be at least 8 characters long.")]
    PasswordTooShort,
    #[error(
        "Password must contain at least one uppercase letter, one lowercase letter, and one digit."
    )]
    ComplexityUnmet,
    #[error(transparent)]
    Store(#[from] CredentialError),
}

impl AccountError {
    /// Whether the failure is the user's to fix, as opposed to a broken store.
    pub fn is_policy(&self) -> bool {
        !matches!(self, AccountError::Store(_))
    }
}

pub fn validate_username<I, S>(username: &str, existing: I) -> Result<(), AccountError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if username.chars().count() < MIN_USERNAME_LENGTH {
        return Err(AccountError::UsernameTooShort);
    }
    if existing.into_iter().any(|name| name.as_ref() == username) {
        return Err(AccountError::AlreadyExists(username.to_string()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AccountError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AccountError::PasswordTooShort);
    }

    let has_upper = password.chars().any(char::is_uppercase);
    let has_lower = password.chars().any(char::is_lowercase);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_upper && has_lower && has_digit) {
        return Err(AccountError::ComplexityUnmet);
    }
    Ok(())
}

/// Validate and persist a new account. Nothing is written unless both the
/// username and password pass.
pub fn sign_up(store: &CredentialStore, username: &str, password: &str) -> Result<(), AccountError> {
    store.update::<_, AccountError>(|credentials| {
        validate_username(username, credentials.keys())?;
        validate_password(password)?;

        let hash = hash_password(password)?;
        credentials.insert(username.to_string(), hash);
        Ok(())
    })?;

    tracing::info!(username = %username, "account created");
    Ok(())
}
