//! HTTPS GET through a `reqwest` client whose TLS layer only accepts a chain
//! matching one trusted fingerprint.
//!
//! Only the final status code is reported; the body is ignored.

use std::error::Error as StdError;
use std::sync::Arc;

use tofu_core::{DialOptions, TargetAddress, TofuError, TofuObserver, pinned_client_config};

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error(transparent)]
    Tofu(#[from] TofuError),

    #[error("Invalid request URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("{message}")]
    Request {
        message: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<reqwest::Error> for HttpError {
    fn from(source: reqwest::Error) -> Self {
        HttpError::Request {
            message: describe(&source),
            source,
        }
    }
}

impl HttpError {
    /// The core error behind this failure: a bad address, or the pin check
    /// that aborted the handshake.
    pub fn core_error(&self) -> Option<&TofuError> {
        match self {
            HttpError::Tofu(e) => Some(e),
            HttpError::Request { source, .. } => pin_failure(source),
            HttpError::InvalidUrl { .. } => None,
        }
    }
}

/// Blocking HTTPS client pinned to one certificate fingerprint.
pub struct PinnedHttpClient {
    client: reqwest::blocking::Client,
}

impl PinnedHttpClient {
    pub fn new(
        trusted_fingerprint: &str,
        options: &DialOptions,
        observer: Arc<dyn TofuObserver>,
    ) -> Result<Self, HttpError> {
        let tls = pinned_client_config(trusted_fingerprint, observer)?;

        let mut builder = reqwest::blocking::Client::builder()
            .use_preconfigured_tls(tls)
            .user_agent(concat!("tofu/", env!("CARGO_PKG_VERSION")));
        // reqwest's connect timeout spans both TCP connect and TLS handshake
        if let Some(timeout) = connect_timeout(options) {
            builder = builder.connect_timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Issue `GET path` to `address` and return the final status code.
    pub fn get(&self, address: &str, path: &str) -> Result<u16, HttpError> {
        let url = request_url(address, path)?;
        let response = self.client.get(url).send()?;
        Ok(response.status().as_u16())
    }
}

fn connect_timeout(options: &DialOptions) -> Option<std::time::Duration> {
    match (options.connect_timeout, options.handshake_timeout) {
        (Some(connect), Some(handshake)) => Some(connect + handshake),
        (connect, handshake) => connect.or(handshake),
    }
}

fn request_url(address: &str, path: &str) -> Result<reqwest::Url, HttpError> {
    let target = TargetAddress::parse(address)?;
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };
    let url = format!("https://{}{}", target, path);
    reqwest::Url::parse(&url).map_err(|e| HttpError::InvalidUrl {
        url,
        message: e.to_string(),
    })
}

// Walks a source chain down to the rustls error raised by the pin check.
// TLS failures arrive wrapped in an io::Error, whose source() skips the
// wrapped error, so those are unwrapped with get_ref().
fn pin_failure<'a>(e: &'a (dyn StdError + 'static)) -> Option<&'a TofuError> {
    let mut current = Some(e);
    while let Some(err) = current {
        if let Some(rustls::Error::InvalidCertificate(rustls::CertificateError::Other(other))) =
            err.downcast_ref::<rustls::Error>()
        {
            return other.0.downcast_ref::<TofuError>();
        }
        current = match err.downcast_ref::<std::io::Error>() {
            Some(io) => io.get_ref().map(|inner| inner as &(dyn StdError + 'static)),
            None => err.source(),
        };
    }
    None
}

fn describe(e: &reqwest::Error) -> String {
    if let Some(pin) = pin_failure(e) {
        return format!("{}: {}", e, pin);
    }
    let mut message = e.to_string();
    let mut current = e.source();
    while let Some(err) = current {
        message.push_str(": ");
        message.push_str(&err.to_string());
        current = err.source();
    }
    message
}
