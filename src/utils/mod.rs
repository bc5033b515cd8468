//! Generic utility primitives with zero domain knowledge.
//!
//! - `command` - Subprocess execution with error handling
//! - `io` - File I/O with consistent error handling
//! - `template` - `{{dotted.path}}` template filling

pub mod command;
pub mod io;
pub mod template;
