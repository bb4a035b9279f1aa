use std::path::PathBuf;

use clap::Args;
use pf_subscribe::DecoderRegistry;

use super::output::{emit, Format};
use super::read_input;

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Subscription format id (see `pforge formats`)
    #[arg(short = 'f', long = "format", default_value = "simple_base64")]
    pub format: String,
    /// Payload file. Use '-' for stdin.
    pub input: PathBuf,
    /// Output: text (one link per line) | json
    #[arg(long = "output", value_enum, default_value_t = Format::Text)]
    pub output: Format,
}

pub fn run(args: DecodeArgs) -> anyhow::Result<()> {
    let payload = read_input(&args.input)?;
    let result = DecoderRegistry::builtin().decode(&args.format, &payload)?;
    for note in &result.notes {
        tracing::info!(format = %args.format, "{note}");
    }
    emit(args.output, || result.links.join("\n"), &result)
}
