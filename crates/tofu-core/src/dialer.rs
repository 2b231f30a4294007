//! Pinned dialer: the connection hook that only releases streams whose
//! certificate chain matches a trusted fingerprint.

use std::fmt;
use std::sync::{Arc, OnceLock};

use rustls::ClientConfig;

use crate::address::{Network, TargetAddress};
use crate::connect::{self, DialOptions, TlsStream};
use crate::errors::TofuResult;
use crate::events::{TofuEvent, TofuObserver, TracingObserver};
use crate::validation::validate_chain;
use crate::verifier::unverified_client_config;

/// Low-level connection hook for an HTTP-over-TLS consumer.
///
/// `network` is `tcp`, `tcp4` or `tcp6`; `address` is `host[:port]`.
pub trait Dial: Send + Sync {
    fn dial(&self, network: &str, address: &str) -> TofuResult<TlsStream>;
}

/// Dial capability bound to one trusted fingerprint.
///
/// Holds no mutable state beyond a lazily built TLS config that every dial
/// shares; one instance can serve concurrent dials.
#[derive(Clone)]
pub struct PinnedDialer {
    trusted: String,
    options: DialOptions,
    observer: Arc<dyn TofuObserver>,
    config: OnceLock<Arc<ClientConfig>>,
}

impl fmt::Debug for PinnedDialer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinnedDialer")
            .field("trusted", &self.trusted)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Build a dialer that trusts exactly `trusted_fingerprint`.
///
/// Performs no I/O and cannot fail. The fingerprint is compared verbatim, so
/// it should come from discovery or [`crate::canonicalize_fingerprint`].
pub fn build_trusted_dialer(trusted_fingerprint: impl Into<String>) -> PinnedDialer {
    PinnedDialer {
        trusted: trusted_fingerprint.into(),
        options: DialOptions::default(),
        observer: Arc::new(TracingObserver),
        config: OnceLock::new(),
    }
}

impl PinnedDialer {
    pub fn with_options(mut self, options: DialOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn TofuObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn trusted_fingerprint(&self) -> &str {
        &self.trusted
    }

    // Built on first dial so construction stays infallible.
    fn client_config(&self) -> TofuResult<Arc<ClientConfig>> {
        if let Some(config) = self.config.get() {
            return Ok(config.clone());
        }
        let config = unverified_client_config()?;
        Ok(self.config.get_or_init(|| config).clone())
    }

    fn open(&self, network: &str, target: &TargetAddress) -> TofuResult<TlsStream> {
        let network = Network::parse(network)?;
        connect::handshake(self.client_config()?, target, network, &self.options)
    }
}

impl Dial for PinnedDialer {
    fn dial(&self, network: &str, address: &str) -> TofuResult<TlsStream> {
        let target = TargetAddress::parse(address)?;
        let display = target.to_string();
        self.observer.on_event(&TofuEvent::DialStarted {
            address: &display,
            trusted: &self.trusted,
        });

        let stream = self.open(network, &target).inspect_err(|e| {
            self.observer.on_event(&TofuEvent::ConnectFailed {
                address: &display,
                error: e,
            });
        })?;

        let now = chrono::Utc::now().timestamp();
        let verdict = validate_chain(
            stream.conn.peer_certificates().unwrap_or_default(),
            &self.trusted,
            now,
        );

        match verdict {
            Ok(matched_index) => {
                self.observer.on_event(&TofuEvent::Trusted {
                    address: &display,
                    matched_index,
                });
                Ok(stream)
            }
            Err(e) => {
                connect::close(stream);
                self.observer.on_event(&TofuEvent::Rejected {
                    address: &display,
                    error: &e,
                });
                Err(e)
            }
        }
    }
}
