//! Accounts: credential persistence and the rules new accounts must meet.

mod credentials;
mod policy;

pub use credentials::{hash_password, CredentialError, CredentialStore, Credentials};
pub use policy::{
    sign_up, validate_password, validate_username, AccountError, MIN_PASSWORD_LENGTH,
    MIN_USERNAME_LENGTH,
};
