//! Profile compilation.
//!
//! Turns a "simple connection" profile (one outbound, nothing else) into a
//! complete profile: local inbounds, policy rules and the mandatory terminal
//! outbounds. Any other profile shape passes through unchanged.

use pf_config::{
    GlobalConfig, InboundConfig, OutboundIR, ProfileContent, RouteMatrix, RoutingIR, RuleIR,
};
use serde_json::Value;

use crate::inbound::generate_inbounds;
use crate::policy::RoutingPolicy;
use crate::synth::synthesize;
use crate::tags::{
    BITTORRENT_PROTOCOL, BLACKHOLE_TAG, DIRECT_TAG, DNS_OUT_TAG, DNS_PORT, FALLBACK_PRIMARY_TAG,
};

/// DNS rule plus its outbound, or `None` when no UDP inbound exists.
fn dns_interception(udp_tags: &[String]) -> Option<(RuleIR, OutboundIR)> {
    if udp_tags.is_empty() {
        tracing::debug!("dns interception requested without udp inbounds; skipped");
        return None;
    }
    let rule = RuleIR::to(DNS_OUT_TAG)
        .with_port(DNS_PORT)
        .with_inbound_tags(udp_tags.iter().cloned());
    Some((rule, OutboundIR::new(DNS_OUT_TAG, "dns")))
}

/// Compile `profile` against the inbound configuration and routing policy.
///
/// Rule priority of the result, highest first: DNS interception, bittorrent
/// bypass, synthesized policy rules, then whatever rules the profile had.
pub fn compile(
    profile: &ProfileContent,
    inbounds: &InboundConfig,
    policy: &RoutingPolicy,
) -> ProfileContent {
    if !profile.is_simple() {
        tracing::debug!(
            inbounds = profile.inbounds.len(),
            outbounds = profile.outbounds.len(),
            rules = profile.routing.rules.len(),
            "profile is not a simple connection; left unchanged"
        );
        return profile.clone();
    }

    let mut outbounds = profile.outbounds.clone();
    if let Some(primary) = outbounds.first_mut() {
        if primary.tag.is_empty() {
            primary.tag = FALLBACK_PRIMARY_TAG.to_owned();
        }
    }
    let primary_tag = outbounds
        .first()
        .map(|o| o.tag.clone())
        .unwrap_or_default();

    let generated = generate_inbounds(inbounds);

    let mut extra_options = profile.routing.extra_options.clone();
    extra_options.remove(RouteMatrix::EXTRA_OPTIONS_KEY);
    extra_options.insert(
        "domainStrategy".into(),
        Value::String(policy.matrix.domain_strategy.clone()),
    );
    extra_options.insert(
        "domainMatcher".into(),
        Value::String(policy.matrix.domain_matcher.clone()),
    );

    let synthesized = synthesize(policy, &primary_tag);

    let bittorrent = policy
        .bypass_bittorrent
        .then(|| RuleIR::to(DIRECT_TAG).with_protocols([BITTORRENT_PROTOCOL]));

    let dns = if policy.dns_interception {
        dns_interception(&generated.udp_tags)
    } else {
        None
    };

    let mut rules = Vec::with_capacity(synthesized.len() + profile.routing.rules.len() + 2);
    if let Some((rule, outbound)) = dns {
        rules.push(rule);
        outbounds.push(outbound);
    }
    rules.extend(bittorrent);
    rules.extend(synthesized);
    rules.extend(profile.routing.rules.iter().cloned());

    outbounds.push(OutboundIR::new(BLACKHOLE_TAG, "blackhole"));
    let freedom = OutboundIR::new(DIRECT_TAG, "freedom");
    if policy.use_direct_outbound_as_primary {
        outbounds.insert(0, freedom);
    } else {
        outbounds.push(freedom);
    }

    tracing::debug!(
        primary = %primary_tag,
        inbounds = generated.inbounds.len(),
        outbounds = outbounds.len(),
        rules = rules.len(),
        "profile compiled"
    );

    ProfileContent {
        inbounds: generated.inbounds,
        outbounds,
        routing: RoutingIR {
            rules,
            extra_options,
        },
        extra: profile.extra.clone(),
    }
}

/// Compiler bound to one global settings snapshot.
#[derive(Debug, Clone)]
pub struct ProfileCompiler {
    inbounds: InboundConfig,
    policy: RoutingPolicy,
}

impl ProfileCompiler {
    pub fn new(global: &GlobalConfig) -> Self {
        Self {
            inbounds: global.inbounds.clone(),
            policy: RoutingPolicy::from_global(global),
        }
    }

    pub fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    /// Compile `profile`, honouring a route matrix embedded in it.
    pub fn compile(&self, profile: &ProfileContent) -> ProfileContent {
        let policy = self.policy.clone().with_profile_matrix(profile);
        compile(profile, &self.inbounds, &policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_primary_gets_fallback_tag() {
        let profile = ProfileContent::from_outbound(OutboundIR::new("", "vmess"));
        let policy = RoutingPolicy {
            matrix: pf_config::RouteMatrix {
                ips: pf_config::RouteLists {
                    proxy: vec!["8.8.8.8".into()],
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };
        let out = compile(&profile, &InboundConfig::default(), &policy);
        assert_eq!(out.outbounds[0].tag, FALLBACK_PRIMARY_TAG);
        assert_eq!(out.routing.rules[0].outbound_tag, FALLBACK_PRIMARY_TAG);
    }
}
