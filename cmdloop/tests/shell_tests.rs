//! End-to-end tests for the shell loop
//!
//! Each test scripts the input with an in-memory reader, runs the loop to
//! completion and compares everything the shell wrote.

use cmdloop::{BufReadSource, Command, Shell, ShellError, ShellState};
use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

fn script(lines: &str) -> BufReadSource<Cursor<Vec<u8>>> {
    BufReadSource::new(Cursor::new(lines.as_bytes().to_vec()))
}

fn quiet_shell() -> Shell<Vec<u8>> {
    let mut shell = Shell::with_output(Vec::<u8>::new());
    shell.set_show_welcome_message(false).set_show_exit_message(false);
    shell
}

fn output(shell: Shell<Vec<u8>>) -> String {
    String::from_utf8(shell.into_output()).unwrap()
}

fn register_echo(shell: &mut Shell<Vec<u8>>) {
    shell
        .register("echo")
        .unwrap()
        .help("writes its arguments back")
        .handler(|tokens, out| {
            writeln!(out, "{}", tokens[1..].join(" "))?;
            Ok(())
        });
}

#[test]
fn full_session_with_defaults() {
    let mut shell = Shell::with_output(Vec::<u8>::new());
    register_echo(&mut shell);

    shell.run(&mut script("Echo hello World\nexit\n")).unwrap();

    assert_eq!(shell.state(), ShellState::Terminated);
    assert_eq!(
        output(shell),
        "Welcome. Please enter a command. Use \"exit\" or \"quit\" to close the program\n\
         > hello world\n\
         > Goodbye\n"
    );
}

#[test]
fn exit_stops_before_remaining_input() {
    let mut shell = quiet_shell();
    register_echo(&mut shell);

    shell.run(&mut script("echo one\nQUIT\necho two\n")).unwrap();

    assert_eq!(output(shell), "> one\n> ");
}

#[test]
fn exit_message_only_when_enabled() {
    let mut shell = quiet_shell();
    shell.set_exit_message("see you").set_show_exit_message(true);
    shell.run(&mut script("exit\n")).unwrap();
    assert_eq!(output(shell), "> see you\n");

    let mut shell = quiet_shell();
    shell.set_exit_message("").set_show_exit_message(true);
    shell.run(&mut script("exit\n")).unwrap();
    assert_eq!(output(shell), "> ");
}

#[test]
fn empty_welcome_message_is_not_written() {
    let mut shell = Shell::with_output(Vec::<u8>::new());
    shell.set_welcome_message("").set_show_exit_message(false);
    shell.run(&mut script("exit\n")).unwrap();
    assert_eq!(output(shell), "> ");
}

#[test]
fn end_of_input_acts_as_exit() {
    let exited = Rc::new(RefCell::new(0));
    let mut shell = Shell::with_output(Vec::<u8>::new());
    shell.set_show_welcome_message(false).set_prompt("$ ");
    let counter = Rc::clone(&exited);
    shell.on_exited(move || *counter.borrow_mut() += 1);

    shell.run(&mut script("nope")).unwrap();

    assert_eq!(*exited.borrow(), 1);
    assert_eq!(
        output(shell),
        "$ Function 'nope' not recognized. Sorry!\n$ Goodbye\n"
    );
}

#[test]
fn lifecycle_notifications_fire_in_order() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut shell = quiet_shell();

    for name in ["started-1", "started-2"] {
        let log = Rc::clone(&events);
        shell.on_started(move || log.borrow_mut().push(name));
    }
    let log = Rc::clone(&events);
    shell.on_exited(move || log.borrow_mut().push("exited"));
    let log = Rc::clone(&events);
    shell
        .register("mark")
        .unwrap()
        .handler(move |_, _| {
            log.borrow_mut().push("mark");
            Ok(())
        });

    shell.run(&mut script("mark\nmark\nexit\n")).unwrap();

    assert_eq!(
        *events.borrow(),
        ["started-1", "started-2", "mark", "mark", "exited"]
    );
}

#[test]
fn run_is_once_only() {
    let mut shell = quiet_shell();
    shell.run(&mut script("exit\n")).unwrap();

    let err = shell.run(&mut script("exit\n")).unwrap_err();
    assert!(matches!(err, ShellError::AlreadyRun));
    assert_eq!(shell.state(), ShellState::Terminated);
    assert_eq!(output(shell), "> ");
}

#[test]
fn handler_error_ends_run_without_exit_message() {
    let exited = Rc::new(RefCell::new(false));
    let mut shell = Shell::with_output(Vec::<u8>::new());
    shell.set_show_welcome_message(false);
    let flag = Rc::clone(&exited);
    shell.on_exited(move || *flag.borrow_mut() = true);
    shell
        .register("explode")
        .unwrap()
        .handler(|_, _| Err(ShellError::command("kaboom")));

    let err = shell.run(&mut script("explode\nexit\n")).unwrap_err();

    assert_eq!(err.to_string(), "Command failed: kaboom");
    assert!(!*exited.borrow());
    assert_eq!(shell.state(), ShellState::Terminated);
    assert_eq!(output(shell), "> ");
}

#[test]
fn help_in_session() {
    let mut shell = quiet_shell();
    register_echo(&mut shell);
    shell.register("beta").unwrap();
    shell.command_mut("echo").unwrap().alias("say").unwrap();

    shell.run(&mut script("help\nhelp say\nhelp missing\nexit\n")).unwrap();

    assert_eq!(
        output(shell),
        "> echo [say]: writes its arguments back\n\
         > echo [say]: writes its arguments back\n\
         > Function \"missing\" not found.\n\
         > "
    );
}

#[test]
fn collisions_leave_dispatch_unchanged() {
    let mut shell = quiet_shell();
    register_echo(&mut shell);

    assert!(shell.register("ECHO").is_err());
    assert!(shell.register_existing(Command::new("repeat").with_alias("echo")).is_err());
    assert!(shell.register("status").unwrap().alias("?").is_err());
    assert!(shell.find("repeat").is_none());

    shell.run(&mut script("echo still mine\n?\nexit\n")).unwrap();

    assert_eq!(
        output(shell),
        "> still mine\n> echo: writes its arguments back\n> "
    );
}

#[test]
fn crlf_input_is_handled() {
    let mut shell = quiet_shell();
    register_echo(&mut shell);
    shell.run(&mut script("echo hi\r\nexit\r\n")).unwrap();
    assert_eq!(output(shell), "> hi\n> ");
}
