//! Document storage and presentation
//!
//! - **[`DocumentStore`]**: a flat directory of `.txt` and `.md` files with
//!   list / read / write / rename / delete / duplicate / create operations
//! - **[`validate_filename`]**: the naming rules every created or renamed
//!   document must satisfy
//! - **[`render`]**: turns stored bytes into a servable body based on the
//!   document's [`DocumentKind`]

mod name;
mod render;
mod store;

pub use name::{copy_name, validate_filename, DocumentKind, DocumentName, FilenameError};
pub use render::{markdown_to_html, render, RenderError, Rendered};
pub use store::{DocumentError, DocumentStore};
#[cfg(unix)]
pub use store::DOCUMENT_MODE;
