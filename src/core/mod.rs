// Public modules
pub mod config;
pub mod descriptor;
pub mod error;
pub mod git;
pub mod hosted;
pub mod hosting;
pub mod init;
pub mod merge;
pub mod naming;
pub mod prompt;
pub mod scaffold;
pub mod tty;

// Internal modules - not part of public API
pub(crate) mod keychain;
pub(crate) mod paths;

// Re-export common types for convenience
pub use descriptor::Descriptor;
pub use error::{Error, ErrorCode, Result};
pub use merge::{merge, MergeContext, OriginSource};
