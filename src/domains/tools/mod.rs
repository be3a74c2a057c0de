//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are named, schema-validated operations that MCP clients can call.
//!
//! ## Architecture
//!
//! - `registry.rs` - Capability Registry: descriptors and handlers, write-once
//! - `dispatcher.rs` - Tool Dispatcher: validate, run, turn failures into content
//! - `aggregator.rs` - concurrent external reads with ordered, fail-fast results
//! - `response.rs` - content blocks, the response envelope and normalization
//! - `catalog.rs` - builds the registry with every tool the server exposes
//! - `definitions/` - individual tool implementations (one file per tool)
//! - `error.rs` - tool error taxonomy
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` implementing [`ToolDefinition`]
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it in `catalog.rs`
//!
//! Validation, failure handling and discovery come from the registry and the
//! dispatcher; the tool only implements `execute()`.

mod aggregator;
mod catalog;
pub mod definitions;
mod dispatcher;
mod error;
mod registry;
mod response;

pub use aggregator::{FetchResult, FetchTimeout, gather_all, gather_all_or_fail, with_timeout};
pub use catalog::build_capability_registry;
pub use dispatcher::{ToolCallRequest, ToolDispatcher};
pub use error::ToolError;
pub use registry::{
    CapabilityRegistry, ToolDefinition, ToolDescriptor, ToolHandler, ToolInvocation,
};
pub use response::{
    ContentBlock, MISSING_VALUE, NamedValue, ToolCallResponse, ToolOutput, normalize,
};
