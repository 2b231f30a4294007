//! Certificate identity records and X.509 field extraction.

use rustls::pki_types::CertificateDer;
use serde::Serialize;
use x509_parser::prelude::*;

use crate::errors::{TofuError, TofuResult};
use crate::fingerprint::fingerprint;

/// Human-presentable identity of one certificate in a peer chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateIdentity {
    /// `"Subject: <common name>"`
    pub subject: String,
    /// `"Issuer: <common name>"`
    pub issuer: String,
    /// `"SHA1 Fingerprint=XX:..."`
    pub fingerprint: String,
}

/// Fields read out of a parsed certificate. Validity bounds are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateFields {
    pub subject_cn: String,
    pub issuer_cn: String,
    pub not_before: i64,
    pub not_after: i64,
}

impl CertificateFields {
    pub fn parse(cert: &CertificateDer<'_>) -> TofuResult<Self> {
        let (_, parsed) = x509_parser::parse_x509_certificate(cert.as_ref()).map_err(|e| {
            TofuError::MalformedCertificate {
                message: e.to_string(),
            }
        })?;

        let validity = parsed.validity();
        Ok(Self {
            subject_cn: common_name(parsed.subject()),
            issuer_cn: common_name(parsed.issuer()),
            not_before: validity.not_before.timestamp(),
            not_after: validity.not_after.timestamp(),
        })
    }
}

// First CN attribute, empty when absent or not a string type.
fn common_name(name: &X509Name<'_>) -> String {
    name.iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .unwrap_or_default()
        .to_string()
}

impl CertificateIdentity {
    pub fn from_cert(cert: &CertificateDer<'_>) -> TofuResult<Self> {
        let fields = CertificateFields::parse(cert)?;
        Ok(Self {
            subject: format!("Subject: {}", fields.subject_cn),
            issuer: format!("Issuer: {}", fields.issuer_cn),
            fingerprint: fingerprint(cert.as_ref()),
        })
    }
}
