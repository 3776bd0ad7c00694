//! Commands: a sanitized name, its aliases, help text and the handler to run.

use crate::error::ShellResult;
use std::fmt;
use std::io::Write;

/// Callable run when a command is invoked.
///
/// Receives every token of the input line, the command word included at
/// index 0, and the shell's output sink.
pub type Handler = Box<dyn FnMut(&[String], &mut dyn Write) -> ShellResult<()>>;

/// Normalize a command name or alias.
///
/// Surrounding whitespace is trimmed, the rest is lowercased and every space
/// becomes an underscore. Applying it twice changes nothing.
pub fn sanitize(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Help,
    Exit,
}

pub(crate) enum Action {
    Builtin(Builtin),
    Handler(Handler),
}

pub struct Command {
    name: String,
    aliases: Vec<String>,
    help: Option<String>,
    action: Action,
}

impl Command {
    /// Create an unregistered command with a no-op handler and no help.
    pub fn new(name: &str) -> Self {
        Self {
            name: sanitize(name),
            aliases: Vec::new(),
            help: None,
            action: Action::Handler(Box::new(|_, _| Ok(()))),
        }
    }

    pub(crate) fn builtin(name: &str, alias: &str, builtin: Builtin) -> Self {
        Self {
            name: sanitize(name),
            aliases: vec![sanitize(alias)],
            help: None,
            action: Action::Builtin(builtin),
        }
    }

    /// Add an alias. Duplicates of the command's own identifiers are ignored.
    #[must_use]
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.push_alias(sanitize(alias));
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.set_help(help.into());
        self
    }

    #[must_use]
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&[String], &mut dyn Write) -> ShellResult<()> + 'static,
    {
        self.set_handler(Box::new(handler));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Help text, or `None` when unset or empty.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref().filter(|h| !h.is_empty())
    }

    /// True when `token` is this command's name or one of its aliases.
    pub fn matches(&self, token: &str) -> bool {
        self.name == token || self.aliases.iter().any(|a| a == token)
    }

    /// Name first, then aliases in the order they were added.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Returns false if the command already answers to `alias`.
    pub(crate) fn push_alias(&mut self, alias: String) -> bool {
        if self.matches(&alias) {
            return false;
        }
        self.aliases.push(alias);
        true
    }

    pub(crate) fn remove_alias(&mut self, alias: &str) {
        self.aliases.retain(|a| a != alias);
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_help(&mut self, help: String) {
        self.help = Some(help);
    }

    pub(crate) fn set_handler(&mut self, handler: Handler) {
        self.action = Action::Handler(handler);
    }

    pub(crate) fn builtin_kind(&self) -> Option<Builtin> {
        match self.action {
            Action::Builtin(b) => Some(b),
            Action::Handler(_) => None,
        }
    }

    pub(crate) fn action_mut(&mut self) -> &mut Action {
        &mut self.action
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("help", &self.help)
            .field("builtin", &self.builtin_kind())
            .finish_non_exhaustive()
    }
}
