//! Local TLS server fixture for TOFU integration tests.
//!
//! Serves a fixed certificate chain on `127.0.0.1:0`. Every accepted
//! connection is handled on its own thread, answers one HTTP request with
//! `200 OK`, and reports on a channel whether a request arrived or the client
//! closed the connection without sending one.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

use rcgen::{CertificateParams, DnType, KeyPair};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::{ServerConfig, ServerConnection, StreamOwned};

const RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok";

/// What the server saw on one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The client sent a request and got the canned response.
    Served,
    /// The client went away without sending application data.
    Closed,
}

pub struct TestCert {
    pub der: CertificateDer<'static>,
    pub key: KeyPair,
}

/// Self-signed certificate with the given CN and validity years (Jan 1st).
pub fn cert(cn: &str, not_before_year: i32, not_after_year: i32) -> TestCert {
    let mut params = CertificateParams::new(vec!["localhost".to_string()]).unwrap();
    params.distinguished_name.push(DnType::CommonName, cn);
    params.not_before = rcgen::date_time_ymd(not_before_year, 1, 1);
    params.not_after = rcgen::date_time_ymd(not_after_year, 1, 1);
    let key = KeyPair::generate().unwrap();
    let der = params.self_signed(&key).unwrap().der().clone();
    TestCert { der, key }
}

/// Certificate valid from 2020 to 2090.
pub fn current_cert(cn: &str) -> TestCert {
    cert(cn, 2020, 2090)
}

pub struct TestServer {
    pub addr: String,
    outcomes: Receiver<Outcome>,
}

impl TestServer {
    /// Serve `leaf` followed by `extra` certificates. The leaf key signs the handshake.
    pub fn start(leaf: &TestCert, extra: &[&TestCert]) -> Self {
        let mut chain = vec![leaf.der.clone()];
        chain.extend(extra.iter().map(|c| c.der.clone()));
        let key = PrivateKeyDer::from(PrivatePkcs8KeyDer::from(leaf.key.serialize_der()));

        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = ServerConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .unwrap()
            .with_no_client_auth()
            .with_single_cert(chain, key)
            .unwrap();
        let config = Arc::new(config);

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let (tx, rx) = channel();

        std::thread::spawn(move || {
            for sock in listener.incoming() {
                let Ok(sock) = sock else { continue };
                let config = config.clone();
                let tx = tx.clone();
                std::thread::spawn(move || serve(config, sock, tx));
            }
        });

        Self {
            addr,
            outcomes: rx,
        }
    }

    /// Wait for the next connection outcome.
    pub fn next_outcome(&self) -> Outcome {
        self.outcomes
            .recv_timeout(Duration::from_secs(10))
            .expect("server did not report a connection outcome")
    }
}

fn serve(config: Arc<ServerConfig>, sock: TcpStream, tx: Sender<Outcome>) {
    let _ = sock.set_read_timeout(Some(Duration::from_secs(10)));
    let Ok(conn) = ServerConnection::new(config) else {
        return;
    };
    let mut tls = StreamOwned::new(conn, sock);

    let mut buf = [0u8; 1024];
    match tls.read(&mut buf) {
        Ok(n) if n > 0 => {
            let _ = tls.write_all(RESPONSE);
            tls.conn.send_close_notify();
            let _ = tls.flush();
            let _ = tx.send(Outcome::Served);
        }
        _ => {
            let _ = tx.send(Outcome::Closed);
        }
    }
}
