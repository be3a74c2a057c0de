//! Mood MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing a small set of named,
//! schema-validated tools backed by external services.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server handler and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: capability registry, dispatcher, data aggregator, response
//!     normalization and the tool definitions
//! - **clients**: completion provider, persona directory and journal store
//!
//! # Example
//!
//! ```rust,no_run
//! use mood_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config)?;
//!     let response = server
//!         .call_tool("echo", serde_json::json!({ "message": "hello" }))
//!         .await;
//!     assert_eq!(response.texts(), vec!["Tool echo: hello"]);
//!     Ok(())
//! }
//! ```

pub mod clients;
pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
