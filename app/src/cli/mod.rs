pub mod compile;
pub mod decode;
pub mod fetch;
pub mod formats;
pub mod output;

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pforge", version)]
#[command(about = "Profile compiler and subscription decoder", long_about = None)]
pub struct Args {
    /// Log filter, e.g. `debug` or `pf=trace` (overrides PF_LOG_LEVEL/RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a single-outbound profile into a full engine config
    Compile(compile::CompileArgs),
    /// Decode a subscription payload into share links
    Decode(decode::DecodeArgs),
    /// Fetch and decode from a remote subscription provider
    Fetch(fetch::FetchArgs),
    /// List registered subscription formats
    Formats(formats::FormatsArgs),
}

pub async fn dispatch(args: Args) -> anyhow::Result<()> {
    match args.command {
        Commands::Compile(a) => compile::run(a),
        Commands::Decode(a) => decode::run(a),
        Commands::Fetch(a) => fetch::run(a).await,
        Commands::Formats(a) => formats::run(a),
    }
}

/// Read a whole file, or stdin when `path` is `-`.
pub(crate) fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("read stdin")?;
        Ok(buf)
    } else {
        std::fs::read(path).with_context(|| format!("read {}", path.display()))
    }
}
