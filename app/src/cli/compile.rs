use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use pf_config::{parse_doc, GlobalConfig, ProfileContent};
use pf_router::ProfileCompiler;

use super::output::write_json;
use super::read_input;

#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Profile to compile (JSON/YAML). Use '-' for stdin.
    #[arg(short = 'p', long = "profile")]
    pub profile: PathBuf,
    /// Global settings file (JSON/YAML); built-in defaults when omitted
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Write the result here instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

pub fn run(args: CompileArgs) -> anyhow::Result<()> {
    let global = match &args.config {
        Some(path) => pf_config::load_global(path)?,
        None => GlobalConfig::default(),
    };

    let profile: ProfileContent = if args.profile == Path::new("-") {
        let text = String::from_utf8(read_input(&args.profile)?).context("profile is not utf-8")?;
        parse_doc(&text, None).context("parse profile from stdin")?
    } else {
        pf_config::load_profile(&args.profile)?
    };

    let compiled = ProfileCompiler::new(&global).compile(&profile);
    tracing::info!(
        inbounds = compiled.inbounds.len(),
        outbounds = compiled.outbounds.len(),
        rules = compiled.routing.rules.len(),
        "profile compiled"
    );
    write_json(args.output.as_deref(), &compiled.to_json_value()?)
}
