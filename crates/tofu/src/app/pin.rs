use clap::{Arg, ArgAction, Command};

pub fn fingerprints_command() -> Command {
    Command::new("fingerprints")
        .about("Show subject, issuer and fingerprint of every certificate a server presents")
        .arg(
            Arg::new("address")
                .help("Server address as host or host:port (port defaults to 443)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Output in JSON format")
                .action(ArgAction::SetTrue),
        )
}

pub fn get_command() -> Command {
    Command::new("get")
        .about("Send an HTTP GET over a connection pinned to a trusted fingerprint")
        .arg(
            Arg::new("address")
                .help("Server address as host or host:port (port defaults to 443)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("fingerprint")
                .long("fingerprint")
                .short('f')
                .help("Trusted fingerprint; when omitted, the server's first certificate is trusted")
                .value_name("FINGERPRINT"),
        )
        .arg(
            Arg::new("path")
                .long("path")
                .help("Request path")
                .value_name("PATH")
                .default_value("/"),
        )
}
