//! Canonical profile representation consumed by the external proxy core.
//!
//! Field naming follows the core's JSON schema (`outboundTag`, `inboundTag`,
//! `streamSettings`, ...). Unknown keys are preserved through `extra` maps so a
//! profile that is passed through untouched serializes back field for field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Object(m) => m.is_empty(),
        _ => false,
    }
}

/// Traffic sniffing options attached to an inbound.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SniffingIR {
    #[serde(default)]
    pub enabled: bool,
    /// Protocols whose sniffed destination overrides the original one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dest_override: Vec<String>,
    #[serde(default)]
    pub metadata_only: bool,
}

/// Inbound listener.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InboundIR {
    /// Unique within a profile; rules refer to it through `inboundTag`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    /// Engine protocol name: `http`, `socks`, `dokodemo-door`, ...
    pub protocol: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub listen: String,
    /// A port number, or a range/list such as `"1080-1090"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<PortSpec>,
    /// Protocol-specific settings blob.
    #[serde(default = "empty_object", skip_serializing_if = "is_blank")]
    pub settings: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sniffing: Option<SniffingIR>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_settings: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Outbound (egress) listener.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OutboundIR {
    /// Unique within a profile; rules refer to it through `outboundTag`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag: String,
    pub protocol: String,
    #[serde(default = "empty_object", skip_serializing_if = "is_blank")]
    pub settings: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_settings: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OutboundIR {
    /// Outbound with empty settings.
    pub fn new(tag: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            protocol: protocol.into(),
            settings: empty_object(),
            ..Default::default()
        }
    }
}

/// Rule kind marker; the core only understands `field` rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    #[default]
    Field,
}

/// Destination port predicate: a single port or a textual list/range
/// (`"53,443,1000-2000"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PortSpec {
    Single(u16),
    Text(String),
}

/// Routing rule. All populated predicates must match; the first matching rule
/// in sequence order decides the outbound.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RuleIR {
    #[serde(rename = "type", default)]
    pub kind: RuleKind,
    /// Empty when the rule targets a balancer (`balancerTag` in `extra`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub outbound_tag: String,
    /// Domain tokens (`full:`, `regexp:`, `geosite:`, plain).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domain: Vec<String>,
    /// IP/CIDR or `geoip:` tokens.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<PortSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// Sniffed protocol names (`http`, `tls`, `bittorrent`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocol: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inbound_tag: Vec<String>,
    /// Predicates and targets not modelled above (`source`, `user`,
    /// `attrs`, `balancerTag`, ...), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RuleIR {
    /// Rule with no predicates that routes to `outbound_tag`.
    pub fn to(outbound_tag: impl Into<String>) -> Self {
        Self {
            outbound_tag: outbound_tag.into(),
            ..Default::default()
        }
    }

    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ips<I, S>(mut self, ips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ip = ips.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_protocols<I, S>(mut self, protocols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protocol = protocols.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_inbound_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inbound_tag = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(PortSpec::Single(port));
        self
    }

    /// True when no predicate is populated (the rule would match everything).
    pub fn is_catch_all(&self) -> bool {
        self.domain.is_empty()
            && self.ip.is_empty()
            && self.port.is_none()
            && self.network.is_none()
            && self.protocol.is_empty()
            && self.inbound_tag.is_empty()
            && self.extra.is_empty()
    }
}

/// Routing table: ordered rules plus engine options (`domainStrategy`,
/// `domainMatcher`, ...) flattened next to them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RoutingIR {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleIR>,
    #[serde(flatten)]
    pub extra_options: Map<String, Value>,
}

impl RoutingIR {
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.extra_options.is_empty()
    }
}

/// A full profile: what the proxy core is started with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProfileContent {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inbounds: Vec<InboundIR>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outbounds: Vec<OutboundIR>,
    #[serde(default, skip_serializing_if = "RoutingIR::is_empty")]
    pub routing: RoutingIR,
    /// Top-level sections this crate does not model (`log`, `dns`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProfileContent {
    /// Profile holding a single outbound and nothing else, as produced by a
    /// "simple connection".
    pub fn from_outbound(outbound: OutboundIR) -> Self {
        Self {
            outbounds: vec![outbound],
            ..Default::default()
        }
    }

    /// Zero inbounds, zero rules and exactly one outbound.
    pub fn is_simple(&self) -> bool {
        self.inbounds.is_empty() && self.routing.rules.is_empty() && self.outbounds.len() == 1
    }

    pub fn inbound(&self, tag: &str) -> Option<&InboundIR> {
        self.inbounds.iter().find(|i| i.tag == tag)
    }

    pub fn outbound(&self, tag: &str) -> Option<&OutboundIR> {
        self.outbounds.iter().find(|o| o.tag == tag)
    }

    /// Serialize to the JSON document expected by the proxy core.
    pub fn to_json_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rule_serializes_engine_field_names() {
        let r = RuleIR::to("dns-out")
            .with_port(53)
            .with_inbound_tags(["socks-in-1"]);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(
            v,
            json!({
                "type": "field",
                "outboundTag": "dns-out",
                "port": 53,
                "inboundTag": ["socks-in-1"]
            })
        );
    }

    #[test]
    fn profile_keeps_unknown_sections() {
        let doc = json!({
            "log": { "loglevel": "warning" },
            "outbounds": [{ "tag": "proxy", "protocol": "vmess", "mux": { "enabled": true } }],
            "routing": { "domainStrategy": "IPIfNonMatch" }
        });
        let p: ProfileContent = serde_json::from_value(doc.clone()).unwrap();
        assert!(p.is_simple());
        assert_eq!(p.extra.get("log"), doc.get("log"));
        assert_eq!(
            p.routing.extra_options.get("domainStrategy"),
            Some(&json!("IPIfNonMatch"))
        );
        assert_eq!(p.outbounds[0].extra.get("mux"), Some(&json!({ "enabled": true })));
        assert_eq!(serde_json::to_value(&p).unwrap(), doc);
    }

    #[test]
    fn port_accepts_number_or_text() {
        let r: RuleIR =
            serde_json::from_value(json!({ "outboundTag": "x", "port": "80,443" })).unwrap();
        assert_eq!(r.port, Some(PortSpec::Text("80,443".into())));
        assert!(!r.is_catch_all());
        assert!(RuleIR::to("x").is_catch_all());
    }

    #[test]
    fn unmodelled_rule_fields_survive() {
        let doc = json!({
            "type": "field",
            "source": ["10.0.0.5"],
            "user": ["a@example.com"],
            "outboundTag": "blackhole"
        });
        let r: RuleIR = serde_json::from_value(doc.clone()).unwrap();
        assert!(!r.is_catch_all());
        assert_eq!(serde_json::to_value(&r).unwrap(), doc);
    }

    #[test]
    fn balancer_rule_without_outbound_tag() {
        let doc = json!({ "type": "field", "network": "tcp", "balancerTag": "bal" });
        let r: RuleIR = serde_json::from_value(doc.clone()).unwrap();
        assert!(r.outbound_tag.is_empty());
        assert_eq!(serde_json::to_value(&r).unwrap(), doc);
    }

    #[test]
    fn inbound_port_range_and_sparse_fields() {
        let doc = json!({ "protocol": "dokodemo-door", "port": "1080-1090" });
        let i: InboundIR = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(i.port, Some(PortSpec::Text("1080-1090".into())));
        assert_eq!(serde_json::to_value(&i).unwrap(), doc);
    }
}
