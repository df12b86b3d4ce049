//! Network helpers.

use std::net::{Ipv4Addr, TcpListener};

/// Base URL of a local port nothing is listening on.
///
/// The port is reserved by binding and released immediately, so a request to
/// it fails with a refused connection.
#[must_use]
pub fn unreachable_base_url() -> String {
    let port = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .and_then(|listener| listener.local_addr())
        .map_or(9, |addr| addr.port());
    format!("http://127.0.0.1:{port}")
}
