//! Entry point for the `ts-catalog` command.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use qt_ts_catalog::cli::{
    self,
    Cli,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let stdout = std::io::stdout();
    match cli::run(&cli, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(?e, "Command failed");
            // Nothing sensible is left to do if stderr is gone.
            let _ = writeln!(std::io::stderr(), "error: {e}");
            ExitCode::FAILURE
        }
    }
}
