//! Fingerprint discovery: a one-shot unauthenticated look at a TLS server.

use rustls::pki_types::CertificateDer;

use crate::address::{Network, TargetAddress};
use crate::connect::{self, DialOptions};
use crate::errors::{TofuError, TofuResult};
use crate::events::{TofuEvent, TofuObserver, TracingObserver};
use crate::identity::CertificateIdentity;
use crate::verifier::unverified_client_config;

/// Connect to an untrusted server and describe every certificate it presents.
///
/// `address` is `host` or `host:port`; port 443 is assumed when absent. The
/// returned list follows the server's presentation order (leaf first) and is
/// never empty.
pub fn discover(address: &str) -> TofuResult<Vec<CertificateIdentity>> {
    discover_with(address, &DialOptions::default(), &TracingObserver)
}

/// [`discover`] with explicit timeouts and event sink.
pub fn discover_with(
    address: &str,
    options: &DialOptions,
    observer: &dyn TofuObserver,
) -> TofuResult<Vec<CertificateIdentity>> {
    let target = TargetAddress::parse(address)?;
    let display = target.to_string();
    observer.on_event(&TofuEvent::DiscoveryStarted { address: &display });

    let stream = match unverified_client_config()
        .and_then(|config| connect::handshake(config, &target, Network::Tcp, options))
    {
        Ok(stream) => stream,
        Err(e) => {
            observer.on_event(&TofuEvent::ConnectFailed {
                address: &display,
                error: &e,
            });
            return Err(e);
        }
    };

    let identities = describe_chain(
        stream.conn.peer_certificates().unwrap_or_default(),
        &display,
        observer,
    );
    connect::close(stream);
    identities
}

// Reports the outcome of reading a handshaken chain to `observer`.
fn describe_chain(
    chain: &[CertificateDer<'_>],
    address: &str,
    observer: &dyn TofuObserver,
) -> TofuResult<Vec<CertificateIdentity>> {
    match identities_from_chain(chain) {
        Ok(identities) => {
            observer.on_event(&TofuEvent::DiscoveryCompleted {
                address,
                certificates: identities.len(),
            });
            Ok(identities)
        }
        Err(e) => {
            observer.on_event(&TofuEvent::DiscoveryFailed { address, error: &e });
            Err(e)
        }
    }
}

/// Describe every certificate of a presented chain, in order.
///
/// An empty chain is `NoCertificatesDetected`; any unparsable certificate
/// fails the whole chain.
pub(crate) fn identities_from_chain(
    chain: &[CertificateDer<'_>],
) -> TofuResult<Vec<CertificateIdentity>> {
    if chain.is_empty() {
        return Err(TofuError::NoCertificatesDetected);
    }
    chain.iter().map(CertificateIdentity::from_cert).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TofuFailure;
    use rcgen::{CertificateParams, DnType, KeyPair};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl TofuObserver for Recorder {
        fn on_event(&self, event: &TofuEvent<'_>) {
            let name = match event {
                TofuEvent::DiscoveryCompleted { certificates, .. } => {
                    format!("completed:{}", certificates)
                }
                TofuEvent::DiscoveryFailed { error, .. } => format!("failed:{}", error.error_code()),
                other => format!("{:?}", other),
            };
            self.0.lock().unwrap().push(name);
        }
    }

    fn cert_with_cn(cn: &str) -> CertificateDer<'static> {
        let mut params = CertificateParams::new(vec!["localhost".to_string()]).unwrap();
        params.distinguished_name.push(DnType::CommonName, cn);
        let key = KeyPair::generate().unwrap();
        params.self_signed(&key).unwrap().der().clone()
    }

    #[test]
    fn test_empty_chain_detects_no_certificates() {
        let result = identities_from_chain(&[]);
        assert!(matches!(result, Err(TofuError::NoCertificatesDetected)));
    }

    #[test]
    fn test_garbage_certificate_is_malformed() {
        let chain = [
            cert_with_cn("leaf.test"),
            CertificateDer::from(vec![0x30, 0x03, 0x01, 0x02]),
        ];
        let result = identities_from_chain(&chain);
        assert!(matches!(
            result,
            Err(TofuError::MalformedCertificate { .. })
        ));
    }

    #[test]
    fn test_identities_keep_presentation_order() {
        let chain = [cert_with_cn("leaf.test"), cert_with_cn("ca.test")];
        let identities = identities_from_chain(&chain).unwrap();
        assert_eq!(identities.len(), 2);
        assert_eq!(identities[0].subject, "Subject: leaf.test");
        assert_eq!(identities[1].subject, "Subject: ca.test");
    }

    #[test]
    fn test_failed_description_is_reported() {
        let recorder = Recorder::default();
        let result = describe_chain(&[], "a:443", &recorder);
        assert!(result.is_err());

        let garbage = [CertificateDer::from(vec![1u8, 2, 3])];
        assert!(describe_chain(&garbage, "a:443", &recorder).is_err());

        assert!(describe_chain(&[cert_with_cn("leaf.test")], "a:443", &recorder).is_ok());

        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![
                "failed:NO_CERTIFICATES_DETECTED",
                "failed:MALFORMED_CERTIFICATE",
                "completed:1",
            ]
        );
    }
}
