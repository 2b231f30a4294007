//! TCP connect and unauthenticated TLS handshake shared by discovery and dialing.

use std::io;
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use rustls::{ClientConfig, ClientConnection, StreamOwned};

use crate::address::{Network, TargetAddress};
use crate::errors::{TofuError, TofuResult};

/// A live TLS stream over TCP. Implements `Read + Write`.
pub type TlsStream = StreamOwned<ClientConnection, TcpStream>;

/// Optional bounds on how long a discovery or dial may block.
///
/// `None` means no limit. The handshake timeout applies per socket read or
/// write while handshaking and is cleared before a stream is returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialOptions {
    pub connect_timeout: Option<Duration>,
    pub handshake_timeout: Option<Duration>,
}

impl DialOptions {
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = Some(timeout);
        self
    }
}

/// Connect to `target` and drive the TLS handshake to completion.
pub(crate) fn handshake(
    config: Arc<ClientConfig>,
    target: &TargetAddress,
    network: Network,
    options: &DialOptions,
) -> TofuResult<TlsStream> {
    let server_name = target.server_name()?;
    let addrs = target.resolve(network)?;
    let tcp = connect_any(&addrs, options.connect_timeout)?;

    tcp.set_read_timeout(options.handshake_timeout)?;
    tcp.set_write_timeout(options.handshake_timeout)?;

    let conn = ClientConnection::new(config, server_name)
        .map_err(|e| TofuError::TlsConfig(e.to_string()))?;
    let mut stream = StreamOwned::new(conn, tcp);

    while stream.conn.is_handshaking() {
        // rustls errors surface as io::Error(InvalidData) wrapping the TLS alert
        stream.conn.complete_io(&mut stream.sock)?;
    }

    stream.sock.set_read_timeout(None)?;
    stream.sock.set_write_timeout(None)?;
    Ok(stream)
}

fn connect_any(addrs: &[SocketAddr], timeout: Option<Duration>) -> TofuResult<TcpStream> {
    let mut last_err = None;
    for addr in addrs {
        let result = match timeout {
            Some(t) => TcpStream::connect_timeout(addr, t),
            None => TcpStream::connect(addr),
        };
        match result {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no addresses to connect"))
        .into())
}

/// Send close_notify and shut the socket down. Errors are ignored: the
/// connection is being discarded either way.
pub(crate) fn close(mut stream: TlsStream) {
    stream.conn.send_close_notify();
    while stream.conn.wants_write() {
        if stream.conn.write_tls(&mut stream.sock).is_err() {
            break;
        }
    }
    let _ = stream.sock.shutdown(Shutdown::Both);
}
