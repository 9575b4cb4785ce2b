//! Common utilities for cdc-smoke integration tests.
//!
//! # Integration Test Prerequisites
//!
//! These tests require live services. The simplest setup is Docker:
//!
//! ```bash
//! docker run -d --name trino-test -p 8080:8080 trinodb/trino:latest
//!
//! docker run -d --name sqlserver-test -p 1433:1433 \
//!   -e ACCEPT_EULA=Y -e MSSQL_SA_PASSWORD='YourStrongPassword123!' \
//!   mcr.microsoft.com/mssql/server:2022-latest
//! ```
//!
//! # Configuration
//!
//! Tests use the same environment variables and defaults as the binaries
//! (`TRINO_HOST`, `TRINO_PORT`, `SQLSERVER_HOST`, ...); see the `config`
//! module table. Integration tests are marked `#[ignore]` and skip
//! themselves when the target service is not reachable:
//!
//! ```bash
//! cargo test --test integration_tests -- --ignored
//! ```

use std::net::TcpStream;
use std::time::Duration;

/// Probe timeout for service availability checks.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Whether a TCP service is reachable at `host:port`.
pub fn is_service_available(host: &str, port: u16) -> bool {
    let addr = format!("{host}:{port}");
    match addr.parse() {
        Ok(socket_addr) => TcpStream::connect_timeout(&socket_addr, PROBE_TIMEOUT).is_ok(),
        // Hostnames need resolution first
        Err(_) => TcpStream::connect(addr.as_str()).is_ok(),
    }
}

/// Skip (return true) with a message when the service is unavailable.
pub fn skip_unless_available(service: &str, host: &str, port: u16) -> bool {
    if is_service_available(host, port) {
        false
    } else {
        eprintln!("skipping: {service} not reachable at {host}:{port}");
        true
    }
}
