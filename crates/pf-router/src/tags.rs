//! Reserved tags and geo tokens shared with the proxy core.

/// Freedom outbound; traffic leaves the host unproxied.
pub const DIRECT_TAG: &str = "direct";
/// Drop sink.
pub const BLACKHOLE_TAG: &str = "blackhole";
/// Dedicated DNS outbound used by DNS interception.
pub const DNS_OUT_TAG: &str = "dns-out";

pub const HTTP_IPV4_TAG: &str = "http-in-1";
pub const HTTP_IPV6_TAG: &str = "http-in-2";
pub const SOCKS_IPV4_TAG: &str = "socks-in-1";
pub const SOCKS_IPV6_TAG: &str = "socks-in-2";
pub const TPROXY_IPV4_TAG: &str = "tproxy-in-1";
pub const TPROXY_IPV6_TAG: &str = "tproxy-in-2";

/// Tag given to the primary outbound of a simple profile that arrives untagged.
pub const FALLBACK_PRIMARY_TAG: &str = "proxy";

pub const GEOIP_PRIVATE: &str = "geoip:private";
pub const GEOIP_CN: &str = "geoip:cn";
pub const GEOSITE_CN: &str = "geosite:cn";
pub const MATCH_ALL_DOMAINS: &str = "regexp:.*";
pub const MATCH_ALL_IPV4: &str = "0.0.0.0/0";
pub const MATCH_ALL_IPV6: &str = "::/0";

pub const BITTORRENT_PROTOCOL: &str = "bittorrent";
pub const DNS_PORT: u16 = 53;
