//! tofu-core: Trust-On-First-Use certificate pinning for TLS connections.
//!
//! First contact is an unauthenticated connection that reports the fingerprint of
//! every certificate the server presents. Once the caller has decided which
//! fingerprint to trust, a [`PinnedDialer`] enforces that every later
//! connection presents a matching, currently valid certificate. No
//! certificate authority is consulted at any point.
//!
//! # Main Entry Points
//!
//! - [`discover`] - Connect to a server and list its certificate identities
//! - [`build_trusted_dialer`] - Dial capability bound to one fingerprint
//! - [`pinned_client_config`] - rustls config enforcing the same pin inside the handshake
//! - [`fingerprint`] - Canonical fingerprint of raw certificate bytes

pub mod address;
pub mod connect;
pub mod dialer;
pub mod discovery;
pub mod errors;
pub mod events;
pub mod fingerprint;
pub mod identity;
pub mod logging;
pub mod validation;
pub mod verifier;

pub use address::{DEFAULT_TLS_PORT, Network, TargetAddress};
pub use connect::{DialOptions, TlsStream};
pub use dialer::{Dial, PinnedDialer, build_trusted_dialer};
pub use discovery::{discover, discover_with};
pub use errors::{TofuError, TofuFailure, TofuResult};
pub use events::{NoopObserver, TofuEvent, TofuObserver, TracingObserver};
pub use fingerprint::{canonicalize_fingerprint, fingerprint};
pub use identity::CertificateIdentity;
pub use validation::validate_chain;
pub use verifier::pinned_client_config;

// Re-export logging initialization
pub use logging::init_logging;
