mod global;
mod pin;


use clap::Command;

pub fn build_cli() -> Command {
    global::root_command()
        .subcommand(pin::fingerprints_command())
        .subcommand(pin::get_command())
}
