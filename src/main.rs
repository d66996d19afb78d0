use anyhow::Result;
use clap::Parser;
use osync::cli::Cli;
use osync::{LOG_ENV, OsyncContext, commands, output};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    if let Err(e) = run() {
        output::error(&format!("{e:#}"));
        process::exit(exit_code(&e));
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    output::set_verbosity(output::verbosity_from_flags(cli.quiet, cli.verbose));

    let ctx = OsyncContext::new(&cli.settings())?;
    commands::transfer::execute(&ctx, cli.direction(), &cli.path, cli.force, cli.dry_run)?;
    Ok(())
}

/// Diagnostics go to stderr, filtered by `OSYNC_LOG` (default: warnings only).
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .with_target(false)
        .init();
}

/// Exit status for a failed run: rsync's own status when it ran, 1 otherwise.
fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<osync::Error>()
        .map_or(1, osync::Error::exit_code)
}
