use std::borrow::Cow;

use crate::b64;
use crate::model::{SubsError, SubscriptionResult};
use crate::registry::SubscriptionDecoder;

pub const FORMAT: &str = "simple_base64";

/// Newline-delimited link list, either plain or wrapped in URL-safe base64.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleBase64Decoder;

impl SubscriptionDecoder for SimpleBase64Decoder {
    fn format(&self) -> &'static str {
        FORMAT
    }

    fn decode(&self, payload: &[u8]) -> Result<SubscriptionResult, SubsError> {
        let text = std::str::from_utf8(payload)
            .map_err(|e| SubsError::Parse(format!("payload is not utf-8: {e}")))?;
        let source = text.trim();

        // a scheme separator means the list was never encoded
        let list: Cow<'_, str> = if source.contains("://") {
            Cow::Borrowed(source)
        } else {
            let raw = b64::decode_url_safe(source)
                .map_err(|e| SubsError::Parse(format!("base64: {e}")))?;
            let decoded = String::from_utf8(raw)
                .map_err(|e| SubsError::Parse(format!("decoded payload is not utf-8: {e}")))?;
            Cow::Owned(decoded)
        };

        let links: Vec<String> = list
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect();
        tracing::debug!(target: "pf::subscribe", format = FORMAT, links = links.len(), "decoded");
        Ok(SubscriptionResult::from_links(links))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_list_kept_in_order() {
        let out = SimpleBase64Decoder
            .decode(b"  vmess://a\r\n\r\ntrojan://b\n")
            .unwrap();
        assert_eq!(out.links, vec!["vmess://a", "trojan://b"]);
    }

    #[test]
    fn empty_payload_is_empty_success() {
        let out = SimpleBase64Decoder.decode(b"   \n").unwrap();
        assert!(out.is_empty());
    }
}
