use clap::Args;
use pf_subscribe::ooc::{OPT_BASE_URL, OPT_PIN, OPT_SECRET, OPT_USER_ID, OPT_VERSION};
use pf_subscribe::{DecoderRegistry, ProviderOptions};
use serde_json::Value;

use super::output::{emit, Format};

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Provider format id
    #[arg(short = 'f', long = "format", default_value = "ooc_v1")]
    pub format: String,
    #[arg(long = "base-url")]
    pub base_url: String,
    #[arg(long)]
    pub secret: String,
    /// Protocol version placed in the request path
    #[arg(long = "ooc-version", default_value_t = 1)]
    pub ooc_version: u32,
    #[arg(long = "user-id")]
    pub user_id: String,
    /// Accept only servers whose SPKI SHA-256 matches (hex, repeatable)
    #[arg(long = "pin")]
    pub pins: Vec<String>,
    /// Output: text (one link per line) | json
    #[arg(long = "output", value_enum, default_value_t = Format::Text)]
    pub output: Format,
}

impl FetchArgs {
    fn options(&self) -> ProviderOptions {
        let mut opts = ProviderOptions::new();
        opts.insert(OPT_BASE_URL.into(), Value::from(self.base_url.clone()));
        opts.insert(OPT_SECRET.into(), Value::from(self.secret.clone()));
        opts.insert(OPT_VERSION.into(), Value::from(self.ooc_version));
        opts.insert(OPT_USER_ID.into(), Value::from(self.user_id.clone()));
        if !self.pins.is_empty() {
            opts.insert(OPT_PIN.into(), Value::from(self.pins.clone()));
        }
        opts
    }
}

pub async fn run(args: FetchArgs) -> anyhow::Result<()> {
    let result = DecoderRegistry::builtin()
        .fetch(&args.format, &args.options())
        .await?;
    for note in &result.notes {
        tracing::warn!(format = %args.format, "{note}");
    }
    emit(args.output, || result.links.join("\n"), &result)
}
