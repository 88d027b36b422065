/**
 * User accounts.
 *  - Credential store backed by a flat JSON file
 *  - Username and password policy, sign-up
 */
pub mod accounts;
/**
 * The document collection: a flat directory
 *  of text and markdown files, the rules for
 *  naming them, and how they are rendered.
 */
pub mod documents;
/**
 * Session state and the signed-in gate
 *  guarding document mutations.
 */
pub mod session;
/**
 * Helper for reading build version information
 *  set at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::accounts::{sign_up, AccountError, CredentialError, CredentialStore};
    pub use crate::documents::{
        render, validate_filename, DocumentError, DocumentKind, DocumentName, DocumentStore,
        FilenameError, RenderError, Rendered,
    };
    pub use crate::session::{require_signed_in, AccessError, Flash, Session};
    pub use crate::version::build_info;
}
