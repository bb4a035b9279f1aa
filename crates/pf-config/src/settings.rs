//! Global settings snapshot.
//!
//! One immutable value carrying everything the profile compiler needs to know
//! about the host: which local inbounds are enabled and where they listen, the
//! connection policy flags, and the default route matrix. It is loaded once by
//! the caller and passed explicitly.

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::ir::SniffingIR;

/// Username/password pair for HTTP or SOCKS inbound authentication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

/// HTTP inbound settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpInboundConfig {
    #[serde(default = "defaults::default_http_port")]
    pub port: u16,
    #[serde(default)]
    pub auth: Option<Credentials>,
    #[serde(default)]
    pub sniffing: Option<SniffingIR>,
}

impl Default for HttpInboundConfig {
    fn default() -> Self {
        Self {
            port: defaults::DEFAULT_HTTP_PORT,
            auth: None,
            sniffing: None,
        }
    }
}

/// SOCKS inbound settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SocksInboundConfig {
    #[serde(default = "defaults::default_socks_port")]
    pub port: u16,
    #[serde(default)]
    pub auth: Option<Credentials>,
    /// Accept UDP ASSOCIATE.
    #[serde(default = "defaults::default_true")]
    pub udp: bool,
    /// Address announced to clients for UDP relay.
    #[serde(default)]
    pub udp_local_address: Option<String>,
    #[serde(default)]
    pub sniffing: Option<SniffingIR>,
}

impl Default for SocksInboundConfig {
    fn default() -> Self {
        Self {
            port: defaults::DEFAULT_SOCKS_PORT,
            auth: None,
            udp: true,
            udp_local_address: None,
            sniffing: None,
        }
    }
}

/// Working mode of the transparent-proxy inbound.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TproxyMode {
    Tproxy,
    #[default]
    Redirect,
}

impl TproxyMode {
    /// Value written to `streamSettings.sockopt.tproxy`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TproxyMode::Tproxy => "tproxy",
            TproxyMode::Redirect => "redirect",
        }
    }
}

/// Transparent-proxy (dokodemo-door) inbound settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TproxyInboundConfig {
    #[serde(default = "defaults::default_tproxy_port")]
    pub port: u16,
    /// Accepted transports, e.g. `"tcp,udp"`.
    #[serde(default = "defaults::default_tproxy_network")]
    pub network: String,
    #[serde(default)]
    pub working_mode: TproxyMode,
    #[serde(default)]
    pub sniffing: Option<SniffingIR>,
}

impl Default for TproxyInboundConfig {
    fn default() -> Self {
        Self {
            port: defaults::DEFAULT_TPROXY_PORT,
            network: defaults::default_tproxy_network(),
            working_mode: TproxyMode::default(),
            sniffing: None,
        }
    }
}

/// Local listeners. A protocol set to `None` is disabled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct InboundConfig {
    /// First listen address, typically IPv4.
    #[serde(default)]
    pub listen_address_1: Option<String>,
    /// Second listen address, typically IPv6.
    #[serde(default)]
    pub listen_address_2: Option<String>,
    #[serde(default)]
    pub http: Option<HttpInboundConfig>,
    #[serde(default)]
    pub socks: Option<SocksInboundConfig>,
    #[serde(default)]
    pub tproxy: Option<TproxyInboundConfig>,
}

impl InboundConfig {
    /// Configured listen addresses paired with their slot index (0 or 1).
    /// Blank entries count as unset.
    pub fn listen_addresses(&self) -> impl Iterator<Item = (usize, &str)> {
        [&self.listen_address_1, &self.listen_address_2]
            .into_iter()
            .enumerate()
            .filter_map(|(slot, addr)| {
                addr.as_deref()
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(|a| (slot, a))
            })
    }
}

/// Connection policy switches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ConnectionConfig {
    pub force_direct_connection: bool,
    pub bypass_cn: bool,
    pub bypass_lan: bool,
    pub bypass_bittorrent: bool,
    pub dns_interception: bool,
    pub use_direct_outbound_as_primary: bool,
}

/// Block/proxy/direct token lists for one predicate kind (IP or domain).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct RouteLists {
    pub block: Vec<String>,
    pub proxy: Vec<String>,
    pub direct: Vec<String>,
}

/// User routing lists plus the engine's domain resolution options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteMatrix {
    #[serde(default = "defaults::default_domain_strategy")]
    pub domain_strategy: String,
    #[serde(default = "defaults::default_domain_matcher")]
    pub domain_matcher: String,
    #[serde(default)]
    pub ips: RouteLists,
    #[serde(default)]
    pub domains: RouteLists,
}

impl Default for RouteMatrix {
    fn default() -> Self {
        Self {
            domain_strategy: defaults::default_domain_strategy(),
            domain_matcher: defaults::default_domain_matcher(),
            ips: RouteLists::default(),
            domains: RouteLists::default(),
        }
    }
}

impl RouteMatrix {
    /// Key under which a profile may carry its own matrix in
    /// `routing` extra options.
    pub const EXTRA_OPTIONS_KEY: &'static str = "routeMatrix";

    /// Read a matrix embedded in a profile's routing options, if present and
    /// well-formed.
    pub fn from_extra_options(options: &serde_json::Map<String, serde_json::Value>) -> Option<Self> {
        let raw = options.get(Self::EXTRA_OPTIONS_KEY)?;
        match serde_json::from_value(raw.clone()) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed routeMatrix in profile");
                None
            }
        }
    }
}

/// Everything loaded from the global settings file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct GlobalConfig {
    pub inbounds: InboundConfig,
    pub connection: ConnectionConfig,
    pub route_matrix: RouteMatrix,
}
