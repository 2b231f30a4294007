use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Install a JSON `tracing` subscriber writing to stderr.
///
/// `quiet` limits output to errors unless `RUST_LOG` says otherwise. Intended
/// for binaries; the library itself only emits events. Calling this twice is
/// harmless.
pub fn init_logging(quiet: bool) {
    let default_directive = if quiet { "error" } else { "debug" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
