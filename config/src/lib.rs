//! cmdloop Configuration System
//!
//! Provides YAML-based configuration for the cmdloop shell.
//!
//! # Configuration Loading Priority
//!
//! 1. Compiled-in defaults
//! 2. `/etc/cmdloop/cmdloop.yaml` (system-wide)
//! 3. `~/.config/cmdloop/cmdloop.yaml` (user)
//! 4. `./cmdloop.yaml` (project-local)
//! 5. `CMDLOOP_CONFIG=/path/to/config.yaml` (explicit)
//! 6. Environment variables (highest priority)
//!
//! # Example Configuration
//!
//! ```yaml
//! shell:
//!   prompt: "app> "
//!   welcome_message: "Hello, ${USER}"
//!   show_exit_message: false
//!
//! logging:
//!   level: debug
//! ```

#![allow(missing_docs)]

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::*;

/// Load configuration from default locations.
///
/// Searches for config files in order and merges them.
/// Environment variables override file values.
pub fn load() -> Result<CmdloopConfig, ConfigError> {
    ConfigLoader::new().load()
}

/// Load configuration from a specific file.
pub fn load_from_file(path: &str) -> Result<CmdloopConfig, ConfigError> {
    ConfigLoader::new().with_file(path).load()
}
