//! Embed cmdloop in your Rust application.
//!
//! Run:  cargo run -p cmdloop --example embed

use cmdloop::{BufReadSource, Command, Shell, ShellError, ShellResult};
use std::cell::Cell;
use std::io::Cursor;
use std::rc::Rc;

fn main() -> ShellResult<()> {
    let counter = Rc::new(Cell::new(0_i64));

    let mut shell = Shell::new();
    shell
        .set_prompt("counter> ")
        .set_welcome_message("counter demo - try 'add 5', 'show', 'help'");

    let value = Rc::clone(&counter);
    shell
        .register("add")?
        .aliases(["plus", "+"])?
        .help("Add a number to the counter")
        .handler(move |tokens, out| {
            let n: i64 = tokens
                .get(1)
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| ShellError::command("usage: add <number>"))?;
            writeln!(out, "counter is now {}", add_to(&value, n)?)?;
            Ok(())
        });

    let value = Rc::clone(&counter);
    shell.register_existing(
        Command::new("Show Value")
            .with_alias("show")
            .with_help("Print the counter")
            .with_handler(move |_, out| {
                writeln!(out, "{}", value.get())?;
                Ok(())
            }),
    )?;

    if let Err(err) = shell.register("show") {
        println!("second 'show' rejected: {err}");
    }

    shell.on_started(|| println!("[started]"));
    let value = Rc::clone(&counter);
    shell.on_exited(move || println!("[exited with counter = {}]", value.get()));

    let mut source = BufReadSource::new(Cursor::new("add 5\nPLUS 10\nshow\nhelp\nfrobnicate\nquit\n"));
    shell.run(&mut source)?;

    Ok(())
}

fn add_to(counter: &Cell<i64>, n: i64) -> ShellResult<i64> {
    let sum = counter
        .get()
        .checked_add(n)
        .ok_or_else(|| ShellError::command("counter overflow"))?;
    counter.set(sum);
    Ok(sum)
}
