//! Default configuration values for listeners and routing engine options.
//!
//! Used with `#[serde(default = "...")]` attributes.

/// Default HTTP inbound port.
pub const DEFAULT_HTTP_PORT: u16 = 8889;

/// Default SOCKS inbound port.
pub const DEFAULT_SOCKS_PORT: u16 = 1089;

/// Default transparent-proxy (dokodemo-door) inbound port.
pub const DEFAULT_TPROXY_PORT: u16 = 12345;

/// Default domain resolution strategy of the routing engine.
pub const DEFAULT_DOMAIN_STRATEGY: &str = "AsIs";

/// Default domain matcher implementation of the routing engine.
pub const DEFAULT_DOMAIN_MATCHER: &str = "mph";

#[must_use]
pub fn default_http_port() -> u16 {
    DEFAULT_HTTP_PORT
}

#[must_use]
pub fn default_socks_port() -> u16 {
    DEFAULT_SOCKS_PORT
}

#[must_use]
pub fn default_tproxy_port() -> u16 {
    DEFAULT_TPROXY_PORT
}

/// Transparent proxy accepts both transports unless told otherwise.
#[must_use]
pub fn default_tproxy_network() -> String {
    "tcp,udp".to_owned()
}

#[must_use]
pub fn default_domain_strategy() -> String {
    DEFAULT_DOMAIN_STRATEGY.to_owned()
}

#[must_use]
pub fn default_domain_matcher() -> String {
    DEFAULT_DOMAIN_MATCHER.to_owned()
}

#[must_use]
pub fn default_true() -> bool {
    true
}
