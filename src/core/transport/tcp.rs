//! TCP transport implementation.
//!
//! Line-delimited JSON-RPC over raw TCP. Each connection gets its own rmcp
//! service; all of them share one dispatcher.

use std::net::SocketAddr;

use rmcp::ServiceExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use super::{TransportError, TransportResult, config::TcpConfig};
use crate::core::McpServer;

/// TCP transport handler.
pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    /// Create a new TCP transport with the given config.
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Accept connections until the process stops.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} (JSON-RPC over TCP)", addr);

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!(%peer, "Failed to set TCP_NODELAY: {}", e);
                    }
                    tokio::spawn(serve_connection(server.clone(), stream, peer));
                }
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    // Back off briefly on persistent accept errors
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                }
            }
        }
    }
}

/// Serve one client until it disconnects. Errors end only this connection.
async fn serve_connection(server: McpServer, stream: TcpStream, peer: SocketAddr) {
    info!(%peer, "Accepted connection");

    let running = match server.serve(stream).await {
        Ok(running) => running,
        Err(e) => {
            warn!(%peer, "Failed to initialize service: {}", e);
            return;
        }
    };

    match running.waiting().await {
        Ok(reason) => info!(%peer, "Client disconnected: {:?}", reason),
        Err(e) => warn!(%peer, "Error while serving client: {:?}", e),
    }
}
