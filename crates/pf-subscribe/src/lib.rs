//! Subscription decoders.
//!
//! A subscription is whatever a provider hands out for a list of servers:
//! a newline-separated link list (often base64-wrapped), a Shadowsocks
//! SIP008 manifest, or a remote OOC endpoint. Each format is registered in
//! [`DecoderRegistry`] under a stable id and produces the same thing, an
//! ordered list of share links.

pub mod b64;
pub mod model;
pub mod ooc;
pub mod pin;
pub mod registry;
pub mod simple;
pub mod sip008;

pub use model::{ProviderOptions, SubsError, SubscriptionResult};
pub use ooc::OocProvider;
pub use registry::{DecoderRegistry, FormatKind, SubscriptionDecoder, SubscriptionProvider};
pub use simple::SimpleBase64Decoder;
pub use sip008::Sip008Decoder;
