use clap::ArgMatches;
use tracing::error;

use tofu_core::{TofuError, TofuFailure};

use crate::config::{self, TofuConfig};

/// Load configuration honouring the global `--config` flag.
///
/// Prints the error for the user before returning it.
pub(crate) fn load_config(matches: &ArgMatches) -> Result<TofuConfig, Box<dyn std::error::Error>> {
    let explicit = matches.get_one::<std::path::PathBuf>("config");
    config::load(explicit.map(|p| p.as_path())).map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        error!(event = "cli.config_load_failed", error = %e);
        e.into()
    })
}

/// Print a core error for the user and log it with its error code.
pub(crate) fn report_core_error(
    context: &str,
    event: &str,
    e: TofuError,
) -> Box<dyn std::error::Error> {
    eprintln!("{}: {}", context, e);
    if e.is_user_error() {
        tracing::warn!(event = event, error = %e, error_code = e.error_code());
    } else {
        error!(event = event, error = %e, error_code = e.error_code());
    }
    e.into()
}
