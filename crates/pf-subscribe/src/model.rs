use serde::Serialize;
use thiserror::Error;

/// Options handed to a remote provider, keyed by option name.
pub type ProviderOptions = serde_json::Map<String, serde_json::Value>;

/// Decoded subscription: connection links in source order plus diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubscriptionResult {
    pub links: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl SubscriptionResult {
    pub fn from_links(links: Vec<String>) -> Self {
        Self {
            links,
            notes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum SubsError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid provider options: {0}")]
    Options(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unsupported subscription format `{0}`")]
    Unsupported(String),
}
