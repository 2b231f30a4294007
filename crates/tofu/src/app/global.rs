use clap::{Arg, ArgAction, Command};

pub fn root_command() -> Command {
    Command::new("tofu")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Discover and pin TLS certificate fingerprints (Trust On First Use)")
        .long_about("TOFU connects to a TLS server without certificate-authority validation, shows the fingerprint of every certificate it presents, and then talks to that server only if it keeps presenting a certificate matching the fingerprint you chose to trust.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a config file (default: ~/.tofu/config.toml)")
                .value_name("PATH")
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
}
