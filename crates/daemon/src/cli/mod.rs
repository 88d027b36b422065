pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Daemon, Doc, Init, User, Version};
