pub mod daemon;
pub mod doc;
pub mod init;
pub mod user;
pub mod version;

pub use daemon::Daemon;
pub use doc::Doc;
pub use init::Init;
pub use user::User;
pub use version::Version;
