use clap::ArgMatches;
use tracing::error;

mod fingerprints;
mod get;
mod helpers;

use fingerprints::handle_fingerprints_command;
use get::handle_get_command;

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("fingerprints", sub_matches)) => handle_fingerprints_command(sub_matches),
        Some(("get", sub_matches)) => handle_get_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}
