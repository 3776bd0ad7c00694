//! Error types for cmdloop

use thiserror::Error;

/// Result type alias for shell operations
pub type ShellResult<T> = Result<T, ShellError>;

/// Rejected registry mutations. The registry is unchanged when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The name or alias already resolves to a command
    #[error("'{name}' is already used by command '{owner}'")]
    NameTaken { name: String, owner: String },

    /// The identifier is empty after sanitization
    #[error("Command names and aliases cannot be empty")]
    EmptyName,
}

/// Error types for shell operations
#[derive(Error, Debug)]
pub enum ShellError {
    /// IO error while reading input or writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Registration rejected
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// `run` called on a shell that already ran
    #[error("Shell has already been run")]
    AlreadyRun,

    /// Failure reported by a command handler
    #[error("Command failed: {0}")]
    Command(String),
}

impl ShellError {
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }
}
