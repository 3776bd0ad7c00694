use cmdloop::LineSource;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};

/// Interactive line source backed by rustyline. History is not kept.
pub struct ReadlineSource {
    editor: DefaultEditor,
}

impl ReadlineSource {
    pub fn new() -> io::Result<Self> {
        let editor = DefaultEditor::new().map_err(into_io)?;
        Ok(Self { editor })
    }

    fn readline(&mut self, prompt: &str, out: &mut dyn Write) -> io::Result<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => return Ok(Some(line)),
                Err(err) => match recover(err, out)? {
                    Step::Retry => {}
                    Step::Eof => return Ok(None),
                },
            }
        }
    }
}

impl LineSource for ReadlineSource {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.readline("", &mut io::stdout())
    }

    fn prompt(&mut self, prompt: &str, out: &mut dyn Write) -> io::Result<Option<String>> {
        out.flush()?;
        self.readline(prompt, out)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Retry,
    Eof,
}

/// Ctrl-C echoes `^C` and asks again; Ctrl-D ends the line and the input.
fn recover(err: ReadlineError, out: &mut dyn Write) -> io::Result<Step> {
    match err {
        ReadlineError::Interrupted => {
            writeln!(out, "^C")?;
            Ok(Step::Retry)
        }
        ReadlineError::Eof => {
            writeln!(out)?;
            Ok(Step::Eof)
        }
        other => Err(into_io(other)),
    }
}

fn into_io(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(e) => e,
        other => io::Error::other(other.to_string()),
    }
}
