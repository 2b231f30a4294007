//! Structured events emitted by discovery and dialing.
//!
//! The core never configures logging itself. It reports what happens through
//! a [`TofuObserver`], and [`TracingObserver`] is the default sink that
//! forwards events to `tracing`.

use tracing::{debug, info, warn};

use crate::errors::{TofuError, TofuFailure};

/// Something that happened during discovery or a dial attempt.
#[derive(Debug)]
pub enum TofuEvent<'a> {
    DiscoveryStarted {
        address: &'a str,
    },
    DiscoveryCompleted {
        address: &'a str,
        certificates: usize,
    },
    /// Handshake succeeded but the presented chain could not be described.
    DiscoveryFailed {
        address: &'a str,
        error: &'a TofuError,
    },
    DialStarted {
        address: &'a str,
        trusted: &'a str,
    },
    ConnectFailed {
        address: &'a str,
        error: &'a TofuError,
    },
    /// Chain passed pin and validity checks; the stream is handed to the caller.
    Trusted {
        address: &'a str,
        matched_index: usize,
    },
    /// Chain failed validation; the connection was closed.
    Rejected {
        address: &'a str,
        error: &'a TofuError,
    },
}

/// Receives [`TofuEvent`]s. Must be callable concurrently from many dials.
pub trait TofuObserver: Send + Sync {
    fn on_event(&self, event: &TofuEvent<'_>);
}

/// Forwards events to `tracing` under `core.tofu.*` event names.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TofuObserver for TracingObserver {
    fn on_event(&self, event: &TofuEvent<'_>) {
        match event {
            TofuEvent::DiscoveryStarted { address } => {
                debug!(event = "core.tofu.discover_started", address = address);
            }
            TofuEvent::DiscoveryCompleted {
                address,
                certificates,
            } => {
                debug!(
                    event = "core.tofu.discover_completed",
                    address = address,
                    certificates = certificates
                );
            }
            TofuEvent::DiscoveryFailed { address, error } => {
                warn!(
                    event = "core.tofu.discover_failed",
                    address = address,
                    error = %error,
                    error_code = error.error_code()
                );
            }
            TofuEvent::DialStarted { address, trusted } => {
                debug!(
                    event = "core.tofu.dial_started",
                    address = address,
                    trusted_fingerprint = trusted
                );
            }
            TofuEvent::ConnectFailed { address, error } => {
                info!(
                    event = "core.tofu.connect_failed",
                    address = address,
                    error = %error,
                    error_code = error.error_code()
                );
            }
            TofuEvent::Trusted {
                address,
                matched_index,
            } => {
                debug!(
                    event = "core.tofu.dial_trusted",
                    address = address,
                    matched_index = matched_index
                );
            }
            TofuEvent::Rejected { address, error } => {
                warn!(
                    event = "core.tofu.dial_rejected",
                    address = address,
                    error = %error,
                    error_code = error.error_code()
                );
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TofuObserver for NoopObserver {
    fn on_event(&self, _event: &TofuEvent<'_>) {}
}
