use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};
use serde::Deserialize;

use crate::b64;
use crate::model::{SubsError, SubscriptionResult};
use crate::registry::SubscriptionDecoder;

pub const FORMAT: &str = "sip008";

/// Everything except RFC 3986 unreserved characters.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'`');

#[derive(Debug, Deserialize)]
struct Sip008Doc {
    servers: Vec<Sip008Server>,
}

#[derive(Debug, Deserialize)]
struct Sip008Server {
    server: String,
    server_port: u16,
    password: String,
    method: String,
    #[serde(default)]
    plugin: Option<String>,
    #[serde(default)]
    plugin_opts: Option<String>,
    #[serde(default)]
    remarks: Option<String>,
}

impl Sip008Server {
    fn to_link(&self) -> String {
        let userinfo = b64::encode_url_safe(format!("{}:{}", self.method, self.password).as_bytes());
        let host = if self.server.contains(':') && !self.server.starts_with('[') {
            format!("[{}]", self.server)
        } else {
            self.server.clone()
        };
        let mut link = format!("ss://{userinfo}@{host}:{}", self.server_port);

        if let Some(plugin) = self.plugin.as_deref().filter(|p| !p.is_empty()) {
            let value = match self.plugin_opts.as_deref().filter(|o| !o.is_empty()) {
                Some(opts) => format!("{plugin};{opts}"),
                None => plugin.to_owned(),
            };
            link.push_str("?plugin=");
            link.extend(utf8_percent_encode(&value, QUERY_VALUE));
        }
        if let Some(remarks) = self.remarks.as_deref().filter(|r| !r.is_empty()) {
            link.push('#');
            link.extend(utf8_percent_encode(remarks, FRAGMENT));
        }
        link
    }
}

/// Shadowsocks SIP008 online configuration manifest.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sip008Decoder;

impl SubscriptionDecoder for Sip008Decoder {
    fn format(&self) -> &'static str {
        FORMAT
    }

    fn decode(&self, payload: &[u8]) -> Result<SubscriptionResult, SubsError> {
        let doc: Sip008Doc =
            serde_json::from_slice(payload).map_err(|e| SubsError::Parse(e.to_string()))?;
        let links: Vec<String> = doc.servers.iter().map(Sip008Server::to_link).collect();
        tracing::debug!(target: "pf::subscribe", format = FORMAT, links = links.len(), "decoded");
        Ok(SubscriptionResult::from_links(links))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(host: &str) -> Sip008Server {
        Sip008Server {
            server: host.into(),
            server_port: 443,
            password: "pw".into(),
            method: "chacha20-ietf-poly1305".into(),
            plugin: None,
            plugin_opts: None,
            remarks: None,
        }
    }

    #[test]
    fn ipv6_host_is_bracketed_once() {
        assert!(server("2001:db8::1").to_link().contains("@[2001:db8::1]:443"));
        assert!(server("[2001:db8::1]").to_link().contains("@[2001:db8::1]:443"));
    }

    #[test]
    fn plugin_without_opts_has_no_separator() {
        let mut s = server("example.com");
        s.plugin = Some("obfs-local".into());
        assert!(s.to_link().ends_with("?plugin=obfs-local"));
    }

    #[test]
    fn remarks_are_fragment_encoded() {
        let mut s = server("example.com");
        s.remarks = Some("hk 01 #2".into());
        assert!(s.to_link().ends_with("#hk%2001%20%232"));
    }
}
