use clap::Args;
use pf_subscribe::DecoderRegistry;
use serde::Serialize;

use super::output::{emit, Format};

#[derive(Args, Debug)]
pub struct FormatsArgs {
    #[arg(long = "output", value_enum, default_value_t = Format::Text)]
    pub output: Format,
}

#[derive(Serialize)]
struct FormatEntry {
    id: &'static str,
    kind: &'static str,
}

pub fn run(args: FormatsArgs) -> anyhow::Result<()> {
    let entries: Vec<FormatEntry> = DecoderRegistry::builtin()
        .formats()
        .map(|(id, kind)| FormatEntry {
            id,
            kind: kind.as_str(),
        })
        .collect();
    emit(
        args.output,
        || {
            entries
                .iter()
                .map(|e| format!("{}\t{}", e.id, e.kind))
                .collect::<Vec<_>>()
                .join("\n")
        },
        &entries,
    )
}
