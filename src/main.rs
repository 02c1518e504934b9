use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cdbs::cli::Cli;
use cdbs::dispatcher::dispatch_command;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v/-vv
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    dispatch_command(&cli)
}
