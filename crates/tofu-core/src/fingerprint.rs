//! Certificate fingerprints.
//!
//! A fingerprint is the SHA-1 digest of a certificate's raw DER bytes,
//! rendered as `SHA1 Fingerprint=XX:XX:...:XX`. The string form is the unit
//! of trust: values recorded from discovery are compared verbatim against
//! the ones computed while dialing.

use rustls::pki_types::CertificateDer;
use sha1::{Digest, Sha1};

use crate::errors::{TofuError, TofuResult};

/// Label preceding the hex pairs of every fingerprint.
pub const FINGERPRINT_PREFIX: &str = "SHA1 Fingerprint=";

/// Length of a SHA-1 digest in bytes.
pub const FINGERPRINT_LEN: usize = 20;

/// Compute the raw SHA-1 digest of DER-encoded certificate bytes.
pub fn digest(der: &[u8]) -> [u8; FINGERPRINT_LEN] {
    let mut h = Sha1::new();
    h.update(der);
    h.finalize().into()
}

/// Format a certificate's raw bytes as a canonical fingerprint string.
///
/// Any byte sequence is accepted; no parsing takes place.
pub fn fingerprint(der: &[u8]) -> String {
    format_digest(&digest(der))
}

/// Fingerprint of a rustls certificate.
pub fn cert_fingerprint(cert: &CertificateDer<'_>) -> String {
    fingerprint(cert.as_ref())
}

fn format_digest(bytes: &[u8; FINGERPRINT_LEN]) -> String {
    let pairs: Vec<String> = bytes.iter().map(|b| format!("{:02X}", b)).collect();
    format!("{}{}", FINGERPRINT_PREFIX, pairs.join(":"))
}

/// Normalize user-supplied pin input into the canonical fingerprint form.
///
/// Accepts `SHA1 Fingerprint=AA:BB:...`, colon-separated hex pairs, or a bare
/// 40-char hex string, in any letter case.
pub fn canonicalize_fingerprint(input: &str) -> TofuResult<String> {
    let trimmed = input.trim();
    let hex_part = trimmed.strip_prefix(FINGERPRINT_PREFIX).unwrap_or(trimmed);
    let hex_str: String = hex_part.chars().filter(|c| *c != ':').collect();

    let bytes = hex::decode(&hex_str).map_err(|e| TofuError::InvalidFingerprint {
        message: format!("invalid fingerprint hex: {}", e),
    })?;
    let bytes: [u8; FINGERPRINT_LEN] =
        bytes
            .try_into()
            .map_err(|_| TofuError::InvalidFingerprint {
                message: format!(
                    "fingerprint must be {} bytes ({} hex chars)",
                    FINGERPRINT_LEN,
                    FINGERPRINT_LEN * 2
                ),
            })?;

    Ok(format_digest(&bytes))
}
