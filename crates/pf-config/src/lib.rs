//! Configuration model for profile-forge.
//!
//! # Strategic Workflow
//! `Raw Text (JSON/YAML)` -> `Parse` -> `GlobalConfig` / `ProfileContent`
//!
//! ## Key Modules
//! - [`ir`]: the canonical profile shape handed to the external proxy core.
//!   Field names follow the core's JSON schema exactly.
//! - [`settings`]: the immutable global snapshot (listen addresses, enabled
//!   inbounds, connection flags, route matrix) passed into the compiler.
//! - [`defaults`]: default ports and engine options used by serde.
//!
//! Nothing here reads ambient process state; callers load a snapshot once and
//! pass it around explicitly.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub mod defaults;
pub mod ir;
pub mod settings;

pub use ir::{InboundIR, OutboundIR, PortSpec, ProfileContent, RoutingIR, RuleIR, SniffingIR};
pub use settings::{
    ConnectionConfig, Credentials, GlobalConfig, HttpInboundConfig, InboundConfig, RouteLists,
    RouteMatrix, SocksInboundConfig, TproxyInboundConfig, TproxyMode,
};

/// Text format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Json,
    Yaml,
}

impl DocFormat {
    /// Guess the format from a file extension; unknown extensions yield `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Some(Self::Yaml)
            }
            _ => None,
        }
    }
}

/// Parse a document of type `T` from text.
///
/// With no explicit format JSON is tried first, then YAML.
pub fn parse_doc<T>(text: &str, format: Option<DocFormat>) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    match format {
        Some(DocFormat::Json) => serde_json::from_str(text).context("parse json document"),
        Some(DocFormat::Yaml) => serde_yaml::from_str(text).context("parse yaml document"),
        None => match serde_json::from_str(text) {
            Ok(v) => Ok(v),
            Err(json_err) => serde_yaml::from_str(text).with_context(|| {
                format!("document is neither json ({json_err}) nor yaml")
            }),
        },
    }
}

/// Load the global settings snapshot from a JSON or YAML file.
pub fn load_global<P: AsRef<Path>>(path: P) -> Result<GlobalConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("read global config {}", path.display()))?;
    let cfg: GlobalConfig = parse_doc(&text, DocFormat::from_path(path))
        .with_context(|| format!("load global config {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        http = cfg.inbounds.http.is_some(),
        socks = cfg.inbounds.socks.is_some(),
        tproxy = cfg.inbounds.tproxy.is_some(),
        "global config loaded"
    );
    Ok(cfg)
}

/// Load a profile from a JSON file.
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<ProfileContent> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).with_context(|| format!("read profile {}", path.display()))?;
    let profile: ProfileContent = parse_doc(&text, DocFormat::from_path(path))
        .with_context(|| format!("load profile {}", path.display()))?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_doc_falls_back_to_yaml() -> anyhow::Result<()> {
        let y = r#"
inbounds:
  listen_address_1: 127.0.0.1
  http:
    port: 8889
connection:
  bypass_cn: true
"#;
        let cfg: GlobalConfig = parse_doc(y, None)?;
        assert_eq!(cfg.inbounds.listen_address_1.as_deref(), Some("127.0.0.1"));
        assert_eq!(cfg.inbounds.http.as_ref().map(|h| h.port), Some(8889));
        assert!(cfg.connection.bypass_cn);
        assert!(cfg.inbounds.socks.is_none());
        Ok(())
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            DocFormat::from_path(Path::new("a/b.JSON")),
            Some(DocFormat::Json)
        );
        assert_eq!(DocFormat::from_path(Path::new("x.yml")), Some(DocFormat::Yaml));
        assert_eq!(DocFormat::from_path(Path::new("x.conf")), None);
    }
}
