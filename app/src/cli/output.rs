use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use serde::Serialize;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// Print `json` pretty-printed, or the text rendering.
pub fn emit<T: Serialize>(fmt: Format, text: impl FnOnce() -> String, json: &T) -> anyhow::Result<()> {
    match fmt {
        Format::Text => println!("{}", text()),
        Format::Json => println!("{}", serde_json::to_string_pretty(json)?),
    }
    Ok(())
}

/// Write pretty JSON to `out`, or stdout when absent.
pub fn write_json<T: Serialize>(out: Option<&Path>, value: &T) -> anyhow::Result<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    match out {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("write {}", path.display()))
        }
        None => {
            print!("{text}");
            Ok(())
        }
    }
}
