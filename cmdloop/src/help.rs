use crate::command::Command;

/// One help line: `name [alias, alias]: text`.
///
/// The bracketed list only appears when the command has aliases. Commands
/// without help text have no line at all.
pub fn help_line(command: &Command) -> Option<String> {
    let text = command.help()?;
    let aliases = command.aliases();
    if aliases.is_empty() {
        Some(format!("{}: {text}", command.name()))
    } else {
        Some(format!("{} [{}]: {text}", command.name(), aliases.join(", ")))
    }
}

pub fn not_found(name: &str) -> String {
    format!("Function \"{name}\" not found.")
}

pub fn not_recognized(input: &str) -> String {
    format!("Function '{input}' not recognized. Sorry!")
}
