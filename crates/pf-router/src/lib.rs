//! Routing rule compiler.
//!
//! Expands a routing policy (block/proxy/direct lists, bypass switches) into
//! an ordered rule list and compiles "simple connection" profiles into the
//! complete shape the proxy core runs: local inbounds, rules, and the
//! `direct`/`blackhole` terminal outbounds.
//!
//! Everything here is pure and synchronous. Inputs are immutable snapshots;
//! each call returns freshly built values.

pub mod compile;
pub mod inbound;
pub mod policy;
pub mod synth;
pub mod tags;

pub use compile::{compile, ProfileCompiler};
pub use inbound::{generate_inbounds, GeneratedInbounds};
pub use policy::RoutingPolicy;
pub use synth::synthesize;
