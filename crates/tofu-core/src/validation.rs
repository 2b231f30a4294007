//! Pin and validity-window checks over a presented certificate chain.

use rustls::pki_types::CertificateDer;

use crate::errors::{TofuError, TofuResult};
use crate::fingerprint::fingerprint;
use crate::identity::CertificateFields;

/// Validate a peer chain against a trusted fingerprint at time `now` (Unix seconds).
///
/// Certificates are visited in presentation order. Each one is checked for
/// its validity window, and the first certificate outside its window aborts
/// with `CertNotYetValid` or `CertExpired`, even if a later (or earlier)
/// certificate matched the pin. Only a chain that is entirely within its
/// windows is then judged on whether any certificate matched the pin.
///
/// Bounds are inclusive: a certificate is valid at exactly `not_before` and
/// exactly `not_after`.
///
/// Returns the index of the first matching certificate.
pub fn validate_chain(
    chain: &[CertificateDer<'_>],
    trusted: &str,
    now: i64,
) -> TofuResult<usize> {
    let mut matched = None;

    for (index, cert) in chain.iter().enumerate() {
        if matched.is_none() && fingerprint(cert.as_ref()) == trusted {
            matched = Some(index);
        }

        let fields = CertificateFields::parse(cert)?;
        if now < fields.not_before {
            return Err(TofuError::CertNotYetValid);
        }
        if now > fields.not_after {
            return Err(TofuError::CertExpired);
        }
    }

    matched.ok_or(TofuError::NoMatchingFingerprint)
}
