use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::model::{ProviderOptions, SubsError, SubscriptionResult};
use crate::{ooc, simple, sip008};

/// Turns a fetched payload into connection links.
pub trait SubscriptionDecoder: Send + Sync {
    fn format(&self) -> &'static str;
    fn decode(&self, payload: &[u8]) -> Result<SubscriptionResult, SubsError>;
}

/// Fetches from a remote endpoint described by options, then decodes.
#[async_trait]
pub trait SubscriptionProvider: Send + Sync {
    fn format(&self) -> &'static str;
    async fn fetch_and_decode(
        &self,
        options: &ProviderOptions,
    ) -> Result<SubscriptionResult, SubsError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Decoder,
    Provider,
}

impl FormatKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FormatKind::Decoder => "decoder",
            FormatKind::Provider => "provider",
        }
    }
}

#[derive(Clone, Default)]
pub struct DecoderRegistry {
    decoders: BTreeMap<&'static str, Arc<dyn SubscriptionDecoder>>,
    providers: BTreeMap<&'static str, Arc<dyn SubscriptionProvider>>,
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("decoders", &self.decoders.keys().collect::<Vec<_>>())
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every decoder and provider shipped in this crate.
    pub fn builtin() -> Self {
        let mut r = Self::new();
        r.register_decoder(Arc::new(simple::SimpleBase64Decoder));
        r.register_decoder(Arc::new(sip008::Sip008Decoder));
        r.register_provider(Arc::new(ooc::OocProvider));
        r
    }

    /// Returns the decoder previously registered under the same id.
    pub fn register_decoder(
        &mut self,
        decoder: Arc<dyn SubscriptionDecoder>,
    ) -> Option<Arc<dyn SubscriptionDecoder>> {
        self.decoders.insert(decoder.format(), decoder)
    }

    pub fn register_provider(
        &mut self,
        provider: Arc<dyn SubscriptionProvider>,
    ) -> Option<Arc<dyn SubscriptionProvider>> {
        self.providers.insert(provider.format(), provider)
    }

    pub fn decoder(&self, format: &str) -> Option<&Arc<dyn SubscriptionDecoder>> {
        self.decoders.get(format)
    }

    pub fn provider(&self, format: &str) -> Option<&Arc<dyn SubscriptionProvider>> {
        self.providers.get(format)
    }

    /// Registered ids, decoders first, each group sorted.
    pub fn formats(&self) -> impl Iterator<Item = (&'static str, FormatKind)> + '_ {
        self.decoders
            .keys()
            .map(|k| (*k, FormatKind::Decoder))
            .chain(self.providers.keys().map(|k| (*k, FormatKind::Provider)))
    }

    pub fn decode(&self, format: &str, payload: &[u8]) -> Result<SubscriptionResult, SubsError> {
        let decoder = self
            .decoder(format)
            .ok_or_else(|| SubsError::Unsupported(format.to_owned()))?;
        decoder.decode(payload)
    }

    pub async fn fetch(
        &self,
        format: &str,
        options: &ProviderOptions,
    ) -> Result<SubscriptionResult, SubsError> {
        let provider = self
            .provider(format)
            .ok_or_else(|| SubsError::Unsupported(format.to_owned()))?;
        provider.fetch_and_decode(options).await
    }
}
