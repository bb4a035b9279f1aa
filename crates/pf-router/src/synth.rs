//! Rule synthesis from a routing policy.
//!
//! Emission order is priority order: the core evaluates rules front to back
//! and the first match wins.

use pf_config::RuleIR;

use crate::policy::RoutingPolicy;
use crate::tags::{
    BLACKHOLE_TAG, DIRECT_TAG, GEOIP_CN, GEOIP_PRIVATE, GEOSITE_CN, MATCH_ALL_DOMAINS,
    MATCH_ALL_IPV4, MATCH_ALL_IPV6,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Ip,
    Domain,
}

fn rule(target: Target, tokens: &[String], outbound: &str) -> RuleIR {
    let r = RuleIR::to(outbound);
    match target {
        Target::Ip => r.with_ips(tokens.iter().cloned()),
        Target::Domain => r.with_domains(tokens.iter().cloned()),
    }
}

fn single(target: Target, token: &str, outbound: &str) -> RuleIR {
    rule(target, &[token.to_owned()], outbound)
}

/// Build the ordered rule list for `policy`.
///
/// `primary_outbound_tag` receives the proxy-category lists. The result is
/// meant to be placed ahead of any rules the profile already has.
pub fn synthesize(policy: &RoutingPolicy, primary_outbound_tag: &str) -> Vec<RuleIR> {
    let mut rules = Vec::new();

    if policy.bypass_lan {
        rules.push(single(Target::Ip, GEOIP_PRIVATE, DIRECT_TAG));
    }

    if policy.force_direct_connection {
        rules.push(single(Target::Domain, MATCH_ALL_DOMAINS, DIRECT_TAG));
        rules.push(single(Target::Ip, MATCH_ALL_IPV4, DIRECT_TAG));
        rules.push(single(Target::Ip, MATCH_ALL_IPV6, DIRECT_TAG));
        tracing::debug!(rules = rules.len(), "force direct connection");
        return rules;
    }

    let m = &policy.matrix;
    let categories: [(Target, &[String], &str); 6] = [
        (Target::Ip, m.ips.block.as_slice(), BLACKHOLE_TAG),
        (Target::Domain, m.domains.block.as_slice(), BLACKHOLE_TAG),
        (Target::Ip, m.ips.proxy.as_slice(), primary_outbound_tag),
        (Target::Domain, m.domains.proxy.as_slice(), primary_outbound_tag),
        (Target::Ip, m.ips.direct.as_slice(), DIRECT_TAG),
        (Target::Domain, m.domains.direct.as_slice(), DIRECT_TAG),
    ];
    for (target, tokens, outbound) in categories {
        if !tokens.is_empty() {
            rules.push(rule(target, tokens, outbound));
        }
    }

    if policy.bypass_cn {
        rules.push(single(Target::Ip, GEOIP_CN, DIRECT_TAG));
        rules.push(single(Target::Domain, GEOSITE_CN, DIRECT_TAG));
    }

    tracing::debug!(rules = rules.len(), primary = primary_outbound_tag, "rules synthesized");
    rules
}
