use async_trait::async_trait;
use serde_json::Value;

use crate::model::{ProviderOptions, SubsError, SubscriptionResult};
use crate::pin::{pin_from_hex, pinned_client_config, SpkiPin};
use crate::registry::SubscriptionProvider;

pub const FORMAT: &str = "ooc_v1";

pub const OPT_BASE_URL: &str = "baseUrl";
pub const OPT_SECRET: &str = "secret";
pub const OPT_VERSION: &str = "version";
pub const OPT_USER_ID: &str = "userId";
pub const OPT_PIN: &str = "pinSha256";

/// Open Online Config (OOC) v1 remote provider.
///
/// The response body is fetched and size-checked only; link extraction from
/// the OOC document is not defined yet, so success carries an empty link
/// list and a note describing what was received.
#[derive(Debug, Default, Clone, Copy)]
pub struct OocProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OocRequest {
    pub url: String,
    pub pins: Vec<SpkiPin>,
}

impl OocRequest {
    pub fn from_options(options: &ProviderOptions) -> Result<Self, SubsError> {
        let base = required_str(options, OPT_BASE_URL)?;
        let secret = required_str(options, OPT_SECRET)?;
        let user_id = required_str(options, OPT_USER_ID)?;
        let version = version(options)?;
        let url = format!(
            "{}/{secret}/ooc/v{version}/{user_id}",
            base.trim_end_matches('/')
        );
        Ok(Self {
            url,
            pins: pins(options)?,
        })
    }
}

fn required_str<'a>(options: &'a ProviderOptions, key: &str) -> Result<&'a str, SubsError> {
    match options.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.as_str()),
        Some(Value::String(_)) | None | Some(Value::Null) => {
            Err(SubsError::Options(format!("missing option `{key}`")))
        }
        Some(other) => Err(SubsError::Options(format!(
            "option `{key}` must be a string, got {other}"
        ))),
    }
}

fn version(options: &ProviderOptions) -> Result<u64, SubsError> {
    let parsed = match options.get(OPT_VERSION) {
        None | Some(Value::Null) => {
            return Err(SubsError::Options(format!("missing option `{OPT_VERSION}`")));
        }
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    };
    parsed.ok_or_else(|| {
        SubsError::Options(format!("option `{OPT_VERSION}` must be a non-negative integer"))
    })
}

fn pins(options: &ProviderOptions) -> Result<Vec<SpkiPin>, SubsError> {
    match options.get(OPT_PIN) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![pin_from_hex(s)?]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => pin_from_hex(s),
                other => Err(SubsError::Options(format!(
                    "option `{OPT_PIN}` entries must be strings, got {other}"
                ))),
            })
            .collect(),
        Some(other) => Err(SubsError::Options(format!(
            "option `{OPT_PIN}` must be a string or list, got {other}"
        ))),
    }
}

fn transport(e: reqwest::Error) -> SubsError {
    SubsError::Transport(e.to_string())
}

fn client(pins: &[SpkiPin]) -> Result<reqwest::Client, SubsError> {
    let mut builder =
        reqwest::Client::builder().user_agent(concat!("pforge/", env!("CARGO_PKG_VERSION")));
    if !pins.is_empty() {
        builder = builder.use_preconfigured_tls(pinned_client_config(pins.to_vec())?);
    }
    builder.build().map_err(transport)
}

#[async_trait]
impl SubscriptionProvider for OocProvider {
    fn format(&self) -> &'static str {
        FORMAT
    }

    async fn fetch_and_decode(
        &self,
        options: &ProviderOptions,
    ) -> Result<SubscriptionResult, SubsError> {
        let req = OocRequest::from_options(options)?;
        tracing::debug!(target: "pf::subscribe", format = FORMAT, pinned = !req.pins.is_empty(), "fetching");

        let resp = client(&req.pins)?
            .get(&req.url)
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SubsError::Transport(format!("server answered {status}")));
        }
        let body = resp.bytes().await.map_err(transport)?;

        Ok(SubscriptionResult {
            links: Vec::new(),
            notes: vec![format!(
                "ooc v1 response of {} bytes received; no links extracted",
                body.len()
            )],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opts(v: Value) -> ProviderOptions {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn url_follows_path_template() {
        let req = OocRequest::from_options(&opts(json!({
            "baseUrl": "https://ooc.example/api/",
            "secret": "s3cr3t",
            "version": 1,
            "userId": "u-42",
        })))
        .unwrap();
        assert_eq!(req.url, "https://ooc.example/api/s3cr3t/ooc/v1/u-42");
        assert!(req.pins.is_empty());
    }

    #[test]
    fn version_accepts_numeric_text() {
        let req = OocRequest::from_options(&opts(json!({
            "baseUrl": "https://h", "secret": "s", "version": "2", "userId": "u",
        })))
        .unwrap();
        assert!(req.url.ends_with("/ooc/v2/u"));
    }

    #[test]
    fn each_required_option_is_checked() {
        let full = json!({ "baseUrl": "https://h", "secret": "s", "version": 1, "userId": "u" });
        for key in [OPT_BASE_URL, OPT_SECRET, OPT_VERSION, OPT_USER_ID] {
            let mut m = opts(full.clone());
            m.remove(key);
            let err = OocRequest::from_options(&m).unwrap_err();
            assert!(matches!(err, SubsError::Options(ref s) if s.contains(key)), "{key}");
        }
    }

    #[test]
    fn pins_parse_from_string_or_list() {
        let pin = "11".repeat(32);
        let m = opts(json!({
            "baseUrl": "https://h", "secret": "s", "version": 1, "userId": "u",
            "pinSha256": [pin, "22".repeat(32)],
        }));
        let req = OocRequest::from_options(&m).unwrap();
        assert_eq!(req.pins, vec![[0x11; 32], [0x22; 32]]);
    }
}
