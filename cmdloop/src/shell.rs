//! Shell state and read-eval-print loop

use crate::command::{Action, Builtin, Command};
use crate::error::{RegistryError, ShellError, ShellResult};
use crate::help;
use crate::registry::{CommandMut, Registry};
use crate::terminal::LineSource;
use cmdloop_config::ShellConfig;
use std::io::{self, Stdout, Write};

type Observer = Box<dyn FnMut()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    /// Constructed, `run` not called yet.
    Idle,
    /// Inside the read-eval-print cycle.
    Running,
    /// The loop has ended; the shell cannot run again.
    Terminated,
}

pub struct Shell<W: Write = Stdout> {
    registry: Registry,
    config: ShellConfig,
    output: W,
    state: ShellState,
    running: bool,
    started: Vec<Observer>,
    exited: Vec<Observer>,
}

impl Shell<Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Shell<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Shell<W> {
    pub fn with_output(output: W) -> Self {
        Self::with_config(ShellConfig::default(), output)
    }

    /// Create a shell with `help` and `exit` already registered.
    pub fn with_config(config: ShellConfig, output: W) -> Self {
        Self {
            registry: Registry::with_builtins(),
            config,
            output,
            state: ShellState::Idle,
            running: false,
            started: Vec::new(),
            exited: Vec::new(),
        }
    }

    pub fn register(&mut self, name: &str) -> Result<CommandMut<'_>, RegistryError> {
        self.registry.register(name)
    }

    pub fn register_existing(&mut self, command: Command) -> Result<CommandMut<'_>, RegistryError> {
        self.registry.register_existing(command)
    }

    pub fn command_mut(&mut self, token: &str) -> Option<CommandMut<'_>> {
        self.registry.command_mut(token)
    }

    pub fn find(&self, token: &str) -> Option<&Command> {
        self.registry.find(token)
    }

    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub const fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ShellConfig {
        &mut self.config
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) -> &mut Self {
        self.config.prompt = prompt.into();
        self
    }

    pub fn set_welcome_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.config.welcome_message = message.into();
        self
    }

    pub fn set_exit_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.config.exit_message = message.into();
        self
    }

    pub fn set_show_welcome_message(&mut self, show: bool) -> &mut Self {
        self.config.show_welcome_message = show;
        self
    }

    pub fn set_show_exit_message(&mut self, show: bool) -> &mut Self {
        self.config.show_exit_message = show;
        self
    }

    /// Subscribe to the "loop started" notification, fired after the welcome
    /// message and before the first prompt.
    pub fn on_started<F: FnMut() + 'static>(&mut self, observer: F) -> &mut Self {
        self.started.push(Box::new(observer));
        self
    }

    /// Subscribe to the "loop exited" notification, fired after the exit message.
    pub fn on_exited<F: FnMut() + 'static>(&mut self, observer: F) -> &mut Self {
        self.exited.push(Box::new(observer));
        self
    }

    pub const fn state(&self) -> ShellState {
        self.state
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub const fn output(&self) -> &W {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the read-eval-print loop until `exit` or end of input.
    ///
    /// A shell runs once; later calls fail with [`ShellError::AlreadyRun`].
    /// Handler and I/O errors end the loop and are returned without the exit
    /// message or exit notification.
    pub fn run(&mut self, source: &mut dyn LineSource) -> ShellResult<()> {
        if self.state != ShellState::Idle {
            return Err(ShellError::AlreadyRun);
        }
        self.state = ShellState::Running;
        self.running = true;

        let result = self.run_loop(source);
        self.running = false;
        self.state = ShellState::Terminated;
        result?;

        if self.config.show_exit_message && !self.config.exit_message.is_empty() {
            writeln!(self.output, "{}", self.config.exit_message)?;
        }
        self.output.flush()?;
        tracing::info!("shell exited");
        for observer in &mut self.exited {
            observer();
        }
        Ok(())
    }

    fn run_loop(&mut self, source: &mut dyn LineSource) -> ShellResult<()> {
        if self.config.show_welcome_message && !self.config.welcome_message.is_empty() {
            writeln!(self.output, "{}", self.config.welcome_message)?;
        }
        tracing::info!(commands = self.registry.len(), "shell started");
        for observer in &mut self.started {
            observer();
        }

        while self.running {
            match source.prompt(&self.config.prompt, &mut self.output)? {
                Some(line) => self.execute(&line)?,
                None => {
                    tracing::debug!("end of input, exiting");
                    self.running = false;
                }
            }
        }
        Ok(())
    }

    /// Execute one input line.
    ///
    /// The line is lowercased and split on single spaces; empty tokens are
    /// kept. Unknown commands only produce a message. Errors come from the
    /// invoked handler or from writing output.
    pub fn execute(&mut self, input: &str) -> ShellResult<()> {
        let line = input.to_lowercase();
        let tokens: Vec<String> = line.split(' ').map(str::to_string).collect();

        let Some(index) = self.registry.position(&tokens[0]) else {
            tracing::debug!(input = %line, "command not recognized");
            writeln!(self.output, "{}", help::not_recognized(&line))?;
            return Ok(());
        };

        let command = self.registry.get_mut(index);
        tracing::debug!(command = %command.name(), args = tokens.len() - 1, "dispatching");
        match command.action_mut() {
            Action::Builtin(Builtin::Help) => self.show_help(&tokens),
            Action::Builtin(Builtin::Exit) => {
                self.running = false;
                Ok(())
            }
            Action::Handler(handler) => {
                let out: &mut dyn Write = &mut self.output;
                handler(tokens.as_slice(), out)
            }
        }
    }

    fn show_help(&mut self, tokens: &[String]) -> ShellResult<()> {
        match tokens.get(1) {
            None => {
                for command in self.registry.all() {
                    if let Some(line) = help::help_line(command) {
                        writeln!(self.output, "{line}")?;
                    }
                }
            }
            Some(name) => match self.registry.find(name) {
                Some(command) => {
                    if let Some(line) = help::help_line(command) {
                        writeln!(self.output, "{line}")?;
                    }
                }
                None => writeln!(self.output, "{}", help::not_found(name))?,
            },
        }
        Ok(())
    }
}
