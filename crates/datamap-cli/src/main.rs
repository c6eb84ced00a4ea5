//! datamap CLI - map loosely-structured records into typed records
//!
//! Entry point of the `datamap` binary: parses arguments, loads the
//! configuration, sets up logging and dispatches to the command handlers.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;
use tracing_appender::non_blocking::WorkerGuard;

fn main() {
    let cli = Cli::parse_args();

    let result = Config::load_with_file(cli.config.as_deref()).and_then(|config| {
        control::set_override(cli.use_color(config.output.color));

        let _guard = match init_logging(&cli, &config) {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Failed to initialize logging: {}", e);
                None
            }
        };

        run(cli, config)
    });

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

#[instrument(skip_all, fields(command = ?cli.command))]
fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let format = cli.output.or(config.output.format).unwrap_or_default();
    let output = OutputWriter::new(format, cli.use_color(config.output.color), cli.quiet);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Map(args) => handlers::handle_map(args, &config, output),
        Commands::Flatten(args) => handlers::handle_flatten(args, output),
        Commands::Config(args) => handlers::handle_config(args, &config, output),
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize logging from verbosity, the config file and the environment
fn init_logging(cli: &Cli, config: &Config) -> Result<Option<WorkerGuard>> {
    let mut logging = LoggingConfig::from_verbosity(cli.verbosity_level());
    logging.merge_with_file(&config.logging);
    logging.merge_with_env();

    if cli.quiet {
        logging.level = "error".to_string();
        logging.console = false;
    }

    logging::init_logging(logging)
}
