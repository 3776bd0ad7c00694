use clap::Parser;
use cmdloop::{BufReadSource, LineSource, RegistryError, Shell};
use cmdloop_config::CmdloopConfig;
use std::io::{IsTerminal, Write};

mod readline;

/// cmdloop - A small interactive command shell
#[derive(Parser, Debug)]
#[command(name = "cmdloop", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(long, env = "CMDLOOP_CONFIG")]
    config: Option<String>,

    /// Prompt prefix
    #[arg(short, long)]
    prompt: Option<String>,

    /// Hide the welcome and exit messages
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Execute command and exit
    #[arg(short = 'c')]
    command: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => cmdloop_config::load_from_file(path).unwrap_or_else(|e| {
            eprintln!("Error: Failed to load config from {path}: {e}");
            std::process::exit(1);
        }),
        None => cmdloop_config::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config: {e}, using defaults");
            CmdloopConfig::default()
        }),
    };

    init_logging(&config, args.debug);

    let mut shell = Shell::with_config(config.shell, std::io::stdout());
    if let Some(prompt) = args.prompt {
        shell.set_prompt(prompt);
    }
    if args.quiet {
        shell.set_show_welcome_message(false).set_show_exit_message(false);
    }
    register_demo_commands(&mut shell)?;

    if let Some(command) = args.command {
        if let Err(e) = shell.execute(&command) {
            eprintln!("cmdloop: {e}");
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut source: Box<dyn LineSource> = if std::io::stdin().is_terminal() {
        Box::new(readline::ReadlineSource::new()?)
    } else {
        Box::new(BufReadSource::stdin())
    };

    if let Err(e) = shell.run(&mut *source) {
        eprintln!("cmdloop: {e}");
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(config: &CmdloopConfig, debug: bool) {
    let directive = if debug {
        "debug".to_string()
    } else {
        config.logging.directive()
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directive)),
        )
        .init();
}

fn register_demo_commands<W: Write>(shell: &mut Shell<W>) -> Result<(), RegistryError> {
    shell
        .register("echo")?
        .alias("say")?
        .help("Write the arguments back, separated by spaces")
        .handler(|tokens, out| {
            writeln!(out, "{}", tokens[1..].join(" "))?;
            Ok(())
        });

    shell
        .register("args")?
        .help("Show how a line was split into tokens")
        .handler(|tokens, out| {
            writeln!(out, "{} token(s)", tokens.len())?;
            for (i, token) in tokens.iter().enumerate() {
                writeln!(out, "  [{i}] {token:?}")?;
            }
            Ok(())
        });

    Ok(())
}
