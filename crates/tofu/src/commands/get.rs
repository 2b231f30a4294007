use std::sync::Arc;

use clap::ArgMatches;
use tracing::{error, info, warn};

use tofu_core::{
    CertificateIdentity, TofuFailure, TracingObserver, canonicalize_fingerprint, discover_with,
};

use super::fingerprints::format_identities;
use super::helpers::{load_config, report_core_error};
use crate::http::{HttpError, PinnedHttpClient};

pub(crate) fn handle_get_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let address = matches
        .get_one::<String>("address")
        .ok_or("Address argument is required")?;
    let path = matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or("/");

    info!(event = "cli.get_started", address = address.as_str(), path = path);

    let config = load_config(matches)?;
    let options = config.dial_options();

    let trusted = match matches.get_one::<String>("fingerprint") {
        Some(input) => canonicalize_fingerprint(input).map_err(|e| {
            report_core_error("Invalid fingerprint", "cli.get_invalid_fingerprint", e)
        })?,
        None => {
            let identities = discover_with(address, &options, &TracingObserver).map_err(|e| {
                report_core_error("Failed to get fingerprints", "cli.get_discover_failed", e)
            })?;
            let (report, fingerprint) =
                first_use_report(&identities).ok_or("No server certificates detected")?;
            print!("{}", report);
            fingerprint
        }
    };

    let result = PinnedHttpClient::new(&trusted, &options, Arc::new(TracingObserver))
        .and_then(|client| client.get(address, path));
    match result {
        Ok(status) => {
            println!("Response code: {}", status);
            info!(event = "cli.get_completed", status = status);
            Ok(())
        }
        Err(HttpError::Tofu(e)) => Err(report_core_error(
            "Failed to do request",
            "cli.get_request_failed",
            e,
        )),
        Err(e) => {
            eprintln!("Failed to do request: {}", e);
            match e.core_error() {
                Some(core) => warn!(
                    event = "cli.get_request_failed",
                    error = %e,
                    error_code = core.error_code()
                ),
                None => error!(event = "cli.get_request_failed", error = %e),
            }
            Err(e.into())
        }
    }
}

/// Listing printed on first use, followed by the fingerprint that gets
/// trusted: the first certificate the server presented.
fn first_use_report(identities: &[CertificateIdentity]) -> Option<(String, String)> {
    let leaf = identities.first()?;
    let report = format!(
        "{}Trusting {} ({})\n",
        format_identities(identities),
        leaf.fingerprint,
        leaf.subject
    );
    Some((report, leaf.fingerprint.clone()))
}
