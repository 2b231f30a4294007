use std::error::Error;

/// Base trait for errors surfaced by the TOFU core.
pub trait TofuFailure: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error was caused by caller input rather than the peer or network
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Errors from fingerprint discovery and pinned dialing.
#[derive(Debug, thiserror::Error)]
pub enum TofuError {
    #[error("Transport error: {source}")]
    Transport {
        #[from]
        source: std::io::Error,
    },

    #[error("No server certificates detected")]
    NoCertificatesDetected,

    #[error("Server certificate is not yet valid.")]
    CertNotYetValid,

    #[error("Server certificate has expired.")]
    CertExpired,

    #[error("Server certificate(s) didn't match trusted fingerprint.")]
    NoMatchingFingerprint,

    #[error("Malformed certificate: {message}")]
    MalformedCertificate { message: String },

    #[error("Invalid address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    #[error("Unsupported network '{network}' (expected tcp, tcp4 or tcp6)")]
    UnsupportedNetwork { network: String },

    #[error("Invalid fingerprint: {message}")]
    InvalidFingerprint { message: String },

    #[error("TLS configuration error: {0}")]
    TlsConfig(String),
}

impl TofuFailure for TofuError {
    fn error_code(&self) -> &'static str {
        match self {
            TofuError::Transport { .. } => "TRANSPORT_ERROR",
            TofuError::NoCertificatesDetected => "NO_CERTIFICATES_DETECTED",
            TofuError::CertNotYetValid => "CERT_NOT_YET_VALID",
            TofuError::CertExpired => "CERT_EXPIRED",
            TofuError::NoMatchingFingerprint => "NO_MATCHING_FINGERPRINT",
            TofuError::MalformedCertificate { .. } => "MALFORMED_CERTIFICATE",
            TofuError::InvalidAddress { .. } => "INVALID_ADDRESS",
            TofuError::UnsupportedNetwork { .. } => "UNSUPPORTED_NETWORK",
            TofuError::InvalidFingerprint { .. } => "INVALID_FINGERPRINT",
            TofuError::TlsConfig(_) => "TLS_CONFIG_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            TofuError::InvalidAddress { .. }
                | TofuError::UnsupportedNetwork { .. }
                | TofuError::InvalidFingerprint { .. }
        )
    }
}

/// Common result type for the core
pub type TofuResult<T> = Result<T, TofuError>;
