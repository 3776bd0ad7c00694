use serde::{Deserialize, Serialize};

pub const DEFAULT_PROMPT: &str = "> ";
pub const DEFAULT_WELCOME_MESSAGE: &str =
    "Welcome. Please enter a command. Use \"exit\" or \"quit\" to close the program";
pub const DEFAULT_EXIT_MESSAGE: &str = "Goodbye";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmdloopConfig {
    pub shell: ShellConfig,
    pub logging: LoggingConfig,
}

/// Prompt and lifecycle messages of an interactive shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Written before every read, without a trailing newline.
    pub prompt: String,
    pub welcome_message: String,
    pub show_welcome_message: bool,
    pub exit_message: String,
    pub show_exit_message: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
            show_welcome_message: true,
            exit_message: DEFAULT_EXIT_MESSAGE.to_string(),
            show_exit_message: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Full `EnvFilter` directive; takes precedence over `level` when set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            filter: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl LoggingConfig {
    /// The directive handed to `EnvFilter`.
    pub fn directive(&self) -> String {
        if self.filter.is_empty() {
            self.level.as_str().to_string()
        } else {
            self.filter.clone()
        }
    }
}
