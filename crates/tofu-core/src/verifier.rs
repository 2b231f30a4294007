//! Handshake-time certificate verification for TOFU connections.
//!
//! Both discovery and pinned dialing handshake without CA validation:
//! [`UnverifiedChain`] accepts whatever chain the server presents so the
//! caller can inspect it afterwards. [`PinnedChain`] runs the pin check of
//! [`crate::validation`] inside the handshake instead, for TLS clients that
//! never hand the raw stream back (an HTTP client library, for instance).
//! Neither consults a certificate authority.

use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{
    CertificateError, DigitallySignedStruct, Error as TlsError, OtherError, SignatureScheme,
};

use crate::errors::{TofuError, TofuResult};
use crate::events::{TofuEvent, TofuObserver};
use crate::validation::validate_chain;

/// A `ServerCertVerifier` that accepts any certificate chain.
///
/// It does not validate the chain, expiry, or hostname. Handshake signatures
/// are still checked against the presented leaf key, so the peer must hold
/// the private key of the certificate whose fingerprint is later compared.
#[derive(Debug)]
pub struct UnverifiedChain {
    provider: Arc<rustls::crypto::CryptoProvider>,
}

impl UnverifiedChain {
    pub fn new(provider: Arc<rustls::crypto::CryptoProvider>) -> Arc<Self> {
        Arc::new(Self { provider })
    }
}

impl ServerCertVerifier for UnverifiedChain {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, TlsError> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        rustls::crypto::verify_tls12_signature(
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
        rustls::crypto::verify_tls13_signature(
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

/// A `ServerCertVerifier` that accepts a chain only when it passes
/// [`validate_chain`] for one trusted fingerprint.
///
/// The chain is checked as presented (leaf first) at the handshake's
/// timestamp. A rejected chain aborts the handshake with a `bad_certificate`
/// alert and the [`TofuError`] is carried inside the rustls error.
pub struct PinnedChain {
    trusted: String,
    inner: Arc<UnverifiedChain>,
    observer: Arc<dyn TofuObserver>,
}

impl std::fmt::Debug for PinnedChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinnedChain")
            .field("trusted", &self.trusted)
            .finish_non_exhaustive()
    }
}

impl PinnedChain {
    pub fn new(
        trusted: impl Into<String>,
        provider: Arc<rustls::crypto::CryptoProvider>,
        observer: Arc<dyn TofuObserver>,
    ) -> Arc<Self> {
        Arc::new(Self {
            trusted: trusted.into(),
            inner: UnverifiedChain::new(provider),
            observer,
        })
    }
}

impl ServerCertVerifier for PinnedChain {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, TlsError> {
        let mut chain = Vec::with_capacity(intermediates.len() + 1);
        chain.push(end_entity.clone());
        chain.extend_from_slice(intermediates);

        let address = server_name.to_str();
        let now = i64::try_from(now.as_secs()).unwrap_or(i64::MAX);
        match validate_chain(&chain, &self.trusted, now) {
            Ok(matched_index) => {
                self.observer.on_event(&TofuEvent::Trusted {
                    address: &*address,
                    matched_index,
                });
                Ok(ServerCertVerified::assertion())
            }
            Err(e) => {
                self.observer.on_event(&TofuEvent::Rejected {
                    address: &*address,
                    error: &e,
                });
                Err(TlsError::InvalidCertificate(CertificateError::Other(
                    OtherError(Arc::new(e)),
                )))
            }
        }
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        self.inner.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        self.inner.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner.supported_verify_schemes()
    }
}

/// Build a `rustls::ClientConfig` that handshakes without chain verification.
///
/// Uses `builder_with_provider` so the crypto provider is explicit and
/// independent of whether `install_default()` has been called.
pub fn unverified_client_config() -> TofuResult<Arc<rustls::ClientConfig>> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()
        .map_err(|e| TofuError::TlsConfig(e.to_string()))?
        .dangerous()
        .with_custom_certificate_verifier(UnverifiedChain::new(provider))
        .with_no_client_auth();
    Ok(Arc::new(config))
}

/// Build a `rustls::ClientConfig` whose handshakes only complete against a
/// chain trusted by `trusted_fingerprint`.
///
/// Returned by value so it can be handed to HTTP clients that take ownership
/// of a preconfigured rustls config.
pub fn pinned_client_config(
    trusted_fingerprint: impl Into<String>,
    observer: Arc<dyn TofuObserver>,
) -> TofuResult<rustls::ClientConfig> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let verifier = PinnedChain::new(trusted_fingerprint, provider.clone(), observer);
    let config = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| TofuError::TlsConfig(e.to_string()))?
        .dangerous()
        .with_custom_certificate_verifier(verifier)
        .with_no_client_auth();
    Ok(config)
}
