mod config;
mod error;
mod finder;
mod model;
mod report;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Cli, Config};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = Config::from_cli(Cli::parse())?;
    info!(
        original = %config.original_path.display(),
        changed = %config.changed_path.display(),
        element_id = %config.element_id,
        candidate_tag = %config.candidate_tag,
        "configuration loaded"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    finder::run(&config, &mut out)?;
    Ok(())
}
