use clap::ArgMatches;
use tracing::info;

use tofu_core::{CertificateIdentity, TracingObserver, discover_with};

use super::helpers::{load_config, report_core_error};

pub(crate) fn handle_fingerprints_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let address = matches
        .get_one::<String>("address")
        .ok_or("Address argument is required")?;
    let json_output = matches.get_flag("json");

    info!(
        event = "cli.fingerprints_started",
        address = address.as_str(),
        json_output = json_output
    );

    let config = load_config(matches)?;
    let identities = discover_with(address, &config.dial_options(), &TracingObserver).map_err(
        |e| report_core_error("Failed to get fingerprints", "cli.fingerprints_failed", e),
    )?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&identities)?);
    } else {
        print!("{}", format_identities(&identities));
    }

    info!(
        event = "cli.fingerprints_completed",
        certificates = identities.len()
    );
    Ok(())
}

pub(crate) fn format_identities(identities: &[CertificateIdentity]) -> String {
    let mut out = String::new();
    for (i, identity) in identities.iter().enumerate() {
        out.push_str(&format!("{:02}: Subject:      \"{}\"\n", i, identity.subject));
        out.push_str(&format!("{:02}: Issuer:       \"{}\"\n", i, identity.issuer));
        out.push_str(&format!(
            "{:02}: Fingerprint:  \"{}\"\n",
            i, identity.fingerprint
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_identities() {
        let identities = vec![
            CertificateIdentity {
                subject: "Subject: leaf.test".to_string(),
                issuer: "Issuer: ca.test".to_string(),
                fingerprint: "SHA1 Fingerprint=AA".to_string(),
            },
            CertificateIdentity {
                subject: "Subject: ca.test".to_string(),
                issuer: "Issuer: ca.test".to_string(),
                fingerprint: "SHA1 Fingerprint=BB".to_string(),
            },
        ];
        let out = format_identities(&identities);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "00: Subject:      \"Subject: leaf.test\"");
        assert_eq!(lines[1], "00: Issuer:       \"Issuer: ca.test\"");
        assert_eq!(lines[2], "00: Fingerprint:  \"SHA1 Fingerprint=AA\"");
        assert_eq!(lines[3], "01: Subject:      \"Subject: ca.test\"");
    }

    #[test]
    fn test_format_identities_empty() {
        assert_eq!(format_identities(&[]), "");
    }
}
