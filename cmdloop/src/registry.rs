//! Command registry - ordered storage and collision-checked lookup.
//!
//! Every name and alias lives in a single index, so registration, alias
//! addition and renames all go through the same uniqueness check.

use crate::command::{sanitize, Builtin, Command};
use crate::error::{RegistryError, ShellResult};
use std::collections::HashMap;
use std::io::Write;

#[derive(Debug, Default)]
pub struct Registry {
    commands: Vec<Command>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `help` (`?`) and `exit` (`quit`), in that order.
    pub(crate) fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert(Command::builtin("help", "?", Builtin::Help));
        registry.insert(Command::builtin("exit", "quit", Builtin::Exit));
        registry
    }

    /// Register a new command under the sanitized `name`.
    ///
    /// The command starts with a no-op handler and no help text; configure
    /// it through the returned handle.
    pub fn register(&mut self, name: &str) -> Result<CommandMut<'_>, RegistryError> {
        self.register_existing(Command::new(name))
    }

    /// Register a pre-built command. Its name and every alias must be free,
    /// otherwise nothing is inserted.
    pub fn register_existing(&mut self, command: Command) -> Result<CommandMut<'_>, RegistryError> {
        for id in command.identifiers() {
            if let Err(err) = self.check_available(id) {
                tracing::debug!(command = %command.name(), %err, "registration rejected");
                return Err(err);
            }
        }
        let index = self.insert(command);
        Ok(CommandMut {
            registry: self,
            index,
        })
    }

    /// Register several commands in order, collecting the rejections.
    pub fn register_all<I>(&mut self, commands: I) -> Vec<RegistryError>
    where
        I: IntoIterator<Item = Command>,
    {
        commands
            .into_iter()
            .filter_map(|command| self.register_existing(command).err())
            .collect()
    }

    /// Resolve a name or alias. The token is compared as given.
    pub fn find(&self, token: &str) -> Option<&Command> {
        self.position(token).map(|i| &self.commands[i])
    }

    /// Handle for reconfiguring an already registered command.
    pub fn command_mut(&mut self, token: &str) -> Option<CommandMut<'_>> {
        let index = self.position(token)?;
        Some(CommandMut {
            registry: self,
            index,
        })
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// All commands in registration order.
    pub fn all(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn position(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut Command {
        &mut self.commands[index]
    }

    fn check_available(&self, id: &str) -> Result<(), RegistryError> {
        if id.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        match self.index.get(id) {
            Some(&owner) => Err(RegistryError::NameTaken {
                name: id.to_string(),
                owner: self.commands[owner].name().to_string(),
            }),
            None => Ok(()),
        }
    }

    fn insert(&mut self, command: Command) -> usize {
        let index = self.commands.len();
        for id in command.identifiers() {
            self.index.insert(id.to_string(), index);
        }
        tracing::debug!(command = %command.name(), aliases = ?command.aliases(), "registered command");
        self.commands.push(command);
        index
    }

    fn add_alias(&mut self, index: usize, alias: &str) -> Result<(), RegistryError> {
        let alias = sanitize(alias);
        if self.commands[index].matches(&alias) {
            return Ok(());
        }
        self.check_available(&alias)?;
        tracing::debug!(command = %self.commands[index].name(), %alias, "added alias");
        self.index.insert(alias.clone(), index);
        self.commands[index].push_alias(alias);
        Ok(())
    }

    fn rename(&mut self, index: usize, name: &str) -> Result<(), RegistryError> {
        let name = sanitize(name);
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if let Some(&owner) = self.index.get(&name) {
            if owner != index {
                return Err(RegistryError::NameTaken {
                    name,
                    owner: self.commands[owner].name().to_string(),
                });
            }
        }

        let command = &mut self.commands[index];
        let old = command.name().to_string();
        command.remove_alias(&name);
        command.set_name(name.clone());
        self.index.remove(&old);
        tracing::debug!(from = %old, to = %name, "renamed command");
        self.index.insert(name, index);
        Ok(())
    }
}

/// Mutable handle to a registered command. Setters return the handle so calls
/// can be chained; identifier changes are checked against the whole registry.
#[derive(Debug)]
pub struct CommandMut<'a> {
    registry: &'a mut Registry,
    index: usize,
}

impl CommandMut<'_> {
    pub fn get(&self) -> &Command {
        &self.registry.commands[self.index]
    }

    pub fn name(&self) -> &str {
        self.get().name()
    }

    /// Add an alias. Re-adding one the command already has is a no-op; one
    /// owned by another command is rejected.
    pub fn alias(mut self, alias: &str) -> Result<Self, RegistryError> {
        self.registry.add_alias(self.index, alias)?;
        Ok(self)
    }

    /// Add several aliases, stopping at the first rejection.
    pub fn aliases<I, S>(mut self, aliases: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for alias in aliases {
            self.registry.add_alias(self.index, alias.as_ref())?;
        }
        Ok(self)
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.registry.commands[self.index].set_help(text.into());
        self
    }

    /// Replace the handler. On a built-in this replaces its behavior.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&[String], &mut dyn Write) -> ShellResult<()> + 'static,
    {
        self.registry.commands[self.index].set_handler(Box::new(handler));
        self
    }

    /// Change the primary name. The old name stops resolving.
    pub fn rename(mut self, name: &str) -> Result<Self, RegistryError> {
        self.registry.rename(self.index, name)?;
        Ok(self)
    }
}
