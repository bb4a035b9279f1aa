//! Leaf-certificate pinning on the SHA-256 of the SubjectPublicKeyInfo.
//!
//! A pinned connection trusts exactly the listed keys. Chain building and
//! hostname checks are replaced by the pin match; handshake signatures are
//! still verified against the presented certificate.

use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, Error as TlsError, SignatureScheme};
use sha2::{Digest, Sha256};
use x509_parser::prelude::{FromDer, X509Certificate};

use crate::model::SubsError;

pub type SpkiPin = [u8; 32];

/// Parse a hex digest, tolerating `sha256/` prefixes and `:` separators.
pub fn pin_from_hex(text: &str) -> Result<SpkiPin, SubsError> {
    let cleaned: String = text
        .trim()
        .trim_start_matches("sha256/")
        .chars()
        .filter(|c| *c != ':')
        .collect();
    let bytes = hex::decode(&cleaned)
        .map_err(|e| SubsError::Options(format!("pin `{text}`: {e}")))?;
    <SpkiPin>::try_from(bytes.as_slice())
        .map_err(|_| SubsError::Options(format!("pin `{text}`: expected 32 bytes, got {}", bytes.len())))
}

/// SHA-256 over the DER SubjectPublicKeyInfo of `cert`.
pub fn spki_sha256(cert: &CertificateDer<'_>) -> Option<SpkiPin> {
    let (_, parsed) = X509Certificate::from_der(cert.as_ref()).ok()?;
    let mut h = Sha256::new();
    h.update(parsed.public_key().raw);
    Some(h.finalize().into())
}

#[derive(Debug)]
pub struct PinVerify {
    pins: Vec<SpkiPin>,
    provider: Arc<CryptoProvider>,
}

impl PinVerify {
    pub fn new(pins: Vec<SpkiPin>, provider: Arc<CryptoProvider>) -> Self {
        Self { pins, provider }
    }
}

impl ServerCertVerifier for PinVerify {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, TlsError> {
        let Some(digest) = spki_sha256(end_entity) else {
            return Err(TlsError::General("cannot parse server certificate".into()));
        };
        if self.pins.iter().any(|p| p == &digest) {
            Ok(ServerCertVerified::assertion())
        } else {
            tracing::warn!(target: "pf::subscribe", spki = %hex::encode(digest), "certificate pin mismatch");
            Err(TlsError::General("certificate pin mismatch".into()))
        }
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

/// Client TLS config that accepts only the pinned server keys.
pub fn pinned_client_config(pins: Vec<SpkiPin>) -> Result<rustls::ClientConfig, SubsError> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()
        .map_err(|e| SubsError::Transport(format!("tls setup: {e}")))?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(PinVerify::new(pins, provider)))
        .with_no_client_auth();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_hex_forms() {
        let hex64 = "ab".repeat(32);
        assert_eq!(pin_from_hex(&hex64).unwrap(), [0xab; 32]);
        let colons = vec!["AB"; 32].join(":");
        assert_eq!(pin_from_hex(&format!("sha256/{colons}")).unwrap(), [0xab; 32]);
    }

    #[test]
    fn short_or_bad_pins_are_option_errors() {
        assert!(matches!(pin_from_hex("abcd"), Err(SubsError::Options(_))));
        assert!(matches!(pin_from_hex("zz"), Err(SubsError::Options(_))));
    }

    #[test]
    fn garbage_certificate_has_no_digest() {
        assert!(spki_sha256(&CertificateDer::from(vec![0u8; 8])).is_none());
    }

    #[test]
    fn pinned_config_builds() {
        assert!(pinned_client_config(vec![[0u8; 32]]).is_ok());
    }
}
