//! cmdloop - Command registry and read-eval-print loop
//!
//! This crate provides:
//! - A collision-checked registry of named, aliased commands
//! - A run-once shell loop with built-in `help` and `exit` commands
//! - Lifecycle notifications for embedding applications
//! - A line-source abstraction so the loop can run on a terminal or a script

pub mod command;
pub mod error;
pub mod help;
pub mod registry;
pub mod shell;
pub mod terminal;

pub use cmdloop_config::ShellConfig;
pub use command::{sanitize, Command, Handler};
pub use error::{RegistryError, ShellError, ShellResult};
pub use registry::{CommandMut, Registry};
pub use shell::{Shell, ShellState};
pub use terminal::{BufReadSource, LineSource};
