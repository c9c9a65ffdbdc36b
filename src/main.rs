use clap::Parser;
use std::process::ExitCode;
use timesheet_dashboard::args::{Args, Command};
use timesheet_dashboard::{commands, Config, Result};
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let settings = args.common().settings();

    // Route to appropriate command handler
    match args.command() {
        Command::Summary(summary_args) => {
            let config = Config::resolve(settings)?;
            commands::summary(config, summary_args.inputs())?.print_as(summary_args.format())?
        }

        Command::Project(project_args) => {
            let config = Config::resolve(settings)?;
            commands::project(config, project_args)?.print_as(project_args.format())?
        }

        Command::Export(export_args) => {
            let config = Config::resolve(settings)?;
            commands::export(config, export_args)?.print()
        }

        Command::Init(init_args) => {
            commands::init(init_args.path().or(settings), init_args.force())?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
