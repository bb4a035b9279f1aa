//! pforge: compile simple proxy profiles into full engine configs and decode
//! subscription payloads into share links.

mod cli;
mod logging;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    let log = logging::LoggingConfig::from_env().with_level(args.log_level.as_deref());
    logging::init_once(&log);

    cli::dispatch(args).await
}
