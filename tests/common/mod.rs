//! Shared utilities for probe integration tests.

use std::net::SocketAddr;

use tokio::net::TcpListener;

/// Start a mock cluster member on an ephemeral port. Accepts connections
/// until the test's runtime shuts down; each accepted stream is closed
/// immediately, which is all the socket-level probe needs.
pub async fn start_member() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, _)) => drop(stream),
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address that refuses connections: bind an ephemeral port, then drop
/// the listener before anyone can connect.
#[allow(dead_code)]
pub async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
