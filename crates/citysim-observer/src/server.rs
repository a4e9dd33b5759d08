//! Binding and serving the boundary API.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use citysim_core::config::ServerConfig;

use crate::router::build_router;
use crate::state::AppState;

/// Failure to start or keep serving the boundary API.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// `host:port` from the config is not a socket address.
    #[error("invalid listen address {addr}: {reason}")]
    Address {
        /// The rejected address.
        addr: String,
        /// Parser message.
        reason: String,
    },

    /// The listener could not be opened.
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        /// Address that was tried.
        addr: SocketAddr,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The accept loop stopped with an error.
    #[error("boundary API stopped: {0}")]
    Serve(std::io::Error),
}

/// The socket address the server listens on.
pub fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
    let addr = format!("{}:{}", config.host, config.port);
    addr.parse().map_err(|e: std::net::AddrParseError| ServerError::Address {
        reason: e.to_string(),
        addr,
    })
}

/// Listen on the configured address and serve requests until the process ends.
pub async fn start_server(config: &ServerConfig, state: Arc<AppState>) -> Result<(), ServerError> {
    let addr = bind_addr(config)?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(%addr, "boundary API listening");
    axum::serve(listener, build_router(state))
        .await
        .map_err(ServerError::Serve)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn configured_address_parses() {
        let config = ServerConfig {
            host: String::from("127.0.0.1"),
            port: 8080,
        };
        assert_eq!(bind_addr(&config).unwrap().port(), 8080);
    }

    #[test]
    fn hostname_is_not_an_address() {
        let config = ServerConfig {
            host: String::from("not a host"),
            port: 8080,
        };
        assert!(matches!(bind_addr(&config), Err(ServerError::Address { .. })));
    }
}
