//! Local inbound generation.
//!
//! Every supported protocol is one row of [`INBOUND_TABLE`]; generation walks
//! the rows in order and instantiates each enabled row once per configured
//! listen address.

use pf_config::{Credentials, InboundConfig, InboundIR, PortSpec, SniffingIR};
use serde_json::{json, Map, Value};

use crate::tags::{
    HTTP_IPV4_TAG, HTTP_IPV6_TAG, SOCKS_IPV4_TAG, SOCKS_IPV6_TAG, TPROXY_IPV4_TAG,
    TPROXY_IPV6_TAG,
};

/// Protocol-specific part of an inbound, independent of the listen address.
struct InboundDraft {
    port: u16,
    settings: Value,
    sniffing: Option<SniffingIR>,
    stream_settings: Option<Value>,
}

struct InboundTemplate {
    protocol: &'static str,
    /// Tags for listen address slot 1 and slot 2.
    tags: [&'static str; 2],
    /// Position among DNS interception sources; `None` when the protocol
    /// carries no UDP.
    dns_rank: Option<u8>,
    /// `None` when the protocol is disabled.
    draft: fn(&InboundConfig) -> Option<InboundDraft>,
}

const INBOUND_TABLE: [InboundTemplate; 3] = [
    InboundTemplate {
        protocol: "http",
        tags: [HTTP_IPV4_TAG, HTTP_IPV6_TAG],
        dns_rank: None,
        draft: http_draft,
    },
    InboundTemplate {
        protocol: "socks",
        tags: [SOCKS_IPV4_TAG, SOCKS_IPV6_TAG],
        dns_rank: Some(1),
        draft: socks_draft,
    },
    InboundTemplate {
        protocol: "dokodemo-door",
        tags: [TPROXY_IPV4_TAG, TPROXY_IPV6_TAG],
        dns_rank: Some(0),
        draft: tproxy_draft,
    },
];

fn accounts(auth: &Credentials) -> Value {
    json!([{ "user": auth.user, "pass": auth.pass }])
}

fn http_draft(cfg: &InboundConfig) -> Option<InboundDraft> {
    let http = cfg.http.as_ref()?;
    let mut settings = Map::new();
    if let Some(auth) = &http.auth {
        settings.insert("accounts".into(), accounts(auth));
    }
    Some(InboundDraft {
        port: http.port,
        settings: Value::Object(settings),
        sniffing: http.sniffing.clone(),
        stream_settings: None,
    })
}

fn socks_draft(cfg: &InboundConfig) -> Option<InboundDraft> {
    let socks = cfg.socks.as_ref()?;
    let mut settings = Map::new();
    match &socks.auth {
        Some(auth) => {
            settings.insert("auth".into(), json!("password"));
            settings.insert("accounts".into(), accounts(auth));
        }
        None => {
            settings.insert("auth".into(), json!("noauth"));
        }
    }
    settings.insert("udp".into(), json!(socks.udp));
    if let Some(ip) = socks.udp_local_address.as_deref().filter(|s| !s.is_empty()) {
        settings.insert("ip".into(), json!(ip));
    }
    Some(InboundDraft {
        port: socks.port,
        settings: Value::Object(settings),
        sniffing: socks.sniffing.clone(),
        stream_settings: None,
    })
}

fn tproxy_draft(cfg: &InboundConfig) -> Option<InboundDraft> {
    let tproxy = cfg.tproxy.as_ref()?;
    Some(InboundDraft {
        port: tproxy.port,
        settings: json!({ "network": tproxy.network, "followRedirect": true }),
        sniffing: tproxy.sniffing.clone(),
        stream_settings: Some(json!({ "sockopt": { "tproxy": tproxy.working_mode.as_str() } })),
    })
}

/// Output of [`generate_inbounds`].
#[derive(Debug, Clone, Default)]
pub struct GeneratedInbounds {
    pub inbounds: Vec<InboundIR>,
    /// Tags of generated inbounds that carry UDP: transparent proxy
    /// listeners first, then SOCKS, each in listen address order.
    pub udp_tags: Vec<String>,
}

/// Instantiate every enabled inbound on every configured listen address.
pub fn generate_inbounds(cfg: &InboundConfig) -> GeneratedInbounds {
    let mut out = GeneratedInbounds::default();
    let mut udp: Vec<(u8, &'static str)> = Vec::new();
    for template in &INBOUND_TABLE {
        let Some(draft) = (template.draft)(cfg) else {
            continue;
        };
        for (slot, addr) in cfg.listen_addresses() {
            let tag = template.tags[slot];
            out.inbounds.push(InboundIR {
                tag: tag.to_owned(),
                protocol: template.protocol.to_owned(),
                listen: addr.to_owned(),
                port: Some(PortSpec::Single(draft.port)),
                settings: draft.settings.clone(),
                sniffing: draft.sniffing.clone(),
                stream_settings: draft.stream_settings.clone(),
                extra: Map::new(),
            });
            if let Some(rank) = template.dns_rank {
                udp.push((rank, tag));
            }
        }
    }
    udp.sort_by_key(|(rank, _)| *rank);
    out.udp_tags = udp.into_iter().map(|(_, tag)| tag.to_owned()).collect();
    tracing::debug!(
        inbounds = out.inbounds.len(),
        udp = out.udp_tags.len(),
        "inbounds generated"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_config::{HttpInboundConfig, SocksInboundConfig};

    #[test]
    fn disabled_protocols_produce_nothing() {
        let cfg = InboundConfig {
            listen_address_1: Some("127.0.0.1".into()),
            ..Default::default()
        };
        let g = generate_inbounds(&cfg);
        assert!(g.inbounds.is_empty());
        assert!(g.udp_tags.is_empty());
    }

    #[test]
    fn no_listen_address_produces_nothing() {
        let cfg = InboundConfig {
            http: Some(HttpInboundConfig::default()),
            ..Default::default()
        };
        assert!(generate_inbounds(&cfg).inbounds.is_empty());
    }

    #[test]
    fn socks_auth_and_udp_settings() {
        let cfg = InboundConfig {
            listen_address_2: Some("::1".into()),
            socks: Some(SocksInboundConfig {
                auth: Some(Credentials {
                    user: "u".into(),
                    pass: "p".into(),
                }),
                udp_local_address: Some("127.0.0.1".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let g = generate_inbounds(&cfg);
        assert_eq!(g.inbounds.len(), 1);
        let socks = &g.inbounds[0];
        assert_eq!(socks.tag, SOCKS_IPV6_TAG);
        assert_eq!(socks.listen, "::1");
        assert_eq!(
            socks.settings,
            json!({
                "auth": "password",
                "accounts": [{ "user": "u", "pass": "p" }],
                "udp": true,
                "ip": "127.0.0.1"
            })
        );
        assert_eq!(g.udp_tags, vec![SOCKS_IPV6_TAG]);
    }

    #[test]
    fn udp_tags_put_transparent_proxy_first() {
        let cfg = InboundConfig {
            listen_address_1: Some("127.0.0.1".into()),
            listen_address_2: Some("::1".into()),
            socks: Some(SocksInboundConfig::default()),
            tproxy: Some(pf_config::TproxyInboundConfig::default()),
            ..Default::default()
        };
        let g = generate_inbounds(&cfg);
        assert_eq!(g.inbounds[0].tag, SOCKS_IPV4_TAG);
        assert_eq!(
            g.udp_tags,
            vec![TPROXY_IPV4_TAG, TPROXY_IPV6_TAG, SOCKS_IPV4_TAG, SOCKS_IPV6_TAG]
        );
    }
}
