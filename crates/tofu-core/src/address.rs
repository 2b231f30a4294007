//! Target address parsing and resolution.

use std::fmt;
use std::net::{Ipv6Addr, SocketAddr, ToSocketAddrs};

use rustls::pki_types::ServerName;

use crate::errors::{TofuError, TofuResult};

/// Port assumed when the caller gives a bare host.
pub const DEFAULT_TLS_PORT: u16 = 443;

/// Address family selected by the `network` argument of a dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    /// `tcp`: IPv4 or IPv6
    Tcp,
    /// `tcp4`
    Tcp4,
    /// `tcp6`
    Tcp6,
}

impl Network {
    pub fn parse(network: &str) -> TofuResult<Self> {
        match network {
            "tcp" => Ok(Network::Tcp),
            "tcp4" => Ok(Network::Tcp4),
            "tcp6" => Ok(Network::Tcp6),
            other => Err(TofuError::UnsupportedNetwork {
                network: other.to_string(),
            }),
        }
    }

    fn admits(self, addr: &SocketAddr) -> bool {
        match self {
            Network::Tcp => true,
            Network::Tcp4 => addr.is_ipv4(),
            Network::Tcp6 => addr.is_ipv6(),
        }
    }
}

/// A `host:port` pair with the default TLS port applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetAddress {
    host: String,
    port: u16,
}

impl TargetAddress {
    /// Parse `host`, `host:port`, `[v6]`, `[v6]:port`, or a bare IPv6 literal.
    ///
    /// When no port is present, [`DEFAULT_TLS_PORT`] is used.
    pub fn parse(address: &str) -> TofuResult<Self> {
        let invalid = |message: &str| TofuError::InvalidAddress {
            address: address.to_string(),
            message: message.to_string(),
        };

        let address_trimmed = address.trim();
        if address_trimmed.is_empty() {
            return Err(invalid("empty address"));
        }

        let (host, port) = if let Some(rest) = address_trimmed.strip_prefix('[') {
            let (host, after) = rest
                .split_once(']')
                .ok_or_else(|| invalid("unterminated '[' in IPv6 address"))?;
            let port = match after {
                "" => None,
                p => Some(
                    p.strip_prefix(':')
                        .ok_or_else(|| invalid("unexpected characters after ']'"))?,
                ),
            };
            (host, port)
        } else {
            match address_trimmed.matches(':').count() {
                0 => (address_trimmed, None),
                1 => {
                    let (host, port) = address_trimmed
                        .split_once(':')
                        .ok_or_else(|| invalid("missing port separator"))?;
                    (host, Some(port))
                }
                // Unbracketed IPv6 literal, port cannot be expressed
                _ => {
                    address_trimmed
                        .parse::<Ipv6Addr>()
                        .map_err(|_| invalid("IPv6 addresses with a port must be bracketed"))?;
                    (address_trimmed, None)
                }
            }
        };

        if host.is_empty() {
            return Err(invalid("empty host"));
        }

        let port = match port {
            None => DEFAULT_TLS_PORT,
            Some(p) => p
                .parse::<u16>()
                .map_err(|_| invalid(&format!("invalid port '{}'", p)))?,
        };

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// TLS server name used for SNI. IP literals map to `ServerName::IpAddress`.
    pub fn server_name(&self) -> TofuResult<ServerName<'static>> {
        ServerName::try_from(self.host.clone()).map_err(|e| TofuError::InvalidAddress {
            address: self.to_string(),
            message: e.to_string(),
        })
    }

    /// Resolve to socket addresses admitted by `network`, in resolver order.
    pub fn resolve(&self, network: Network) -> TofuResult<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .filter(|a| network.admits(a))
            .collect();

        if addrs.is_empty() {
            return Err(TofuError::Transport {
                source: std::io::Error::new(
                    std::io::ErrorKind::AddrNotAvailable,
                    format!("no {:?} address found for {}", network, self),
                ),
            });
        }
        Ok(addrs)
    }
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
