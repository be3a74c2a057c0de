//! Tool Dispatcher - the single boundary where tool failures become content.
//!
//! A call is resolved against the registry, its arguments validated, the
//! handler run, and the outcome normalized. Whatever happens, the caller gets
//! a well-formed [`ToolCallResponse`].

use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use rmcp::model::JsonObject;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use super::error::ToolError;
use super::registry::CapabilityRegistry;
use super::response::{ToolCallResponse, normalize};

/// An incoming tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// The name of the tool to execute.
    pub name: String,

    /// The raw arguments to pass to the tool.
    #[serde(default)]
    pub arguments: JsonObject,
}

impl ToolCallRequest {
    pub fn new(name: impl Into<String>, arguments: JsonObject) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Build a request from a JSON value; anything but an object means "no arguments".
    pub fn from_value(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        let arguments = match arguments {
            serde_json::Value::Object(map) => map,
            _ => JsonObject::new(),
        };
        Self::new(name, arguments)
    }
}

/// Dispatches tool calls against a fully built registry.
pub struct ToolDispatcher {
    registry: CapabilityRegistry,
}

impl ToolDispatcher {
    /// Create a dispatcher. The registry is frozen from here on.
    pub fn new(registry: CapabilityRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Run a tool call to completion. Never fails.
    #[instrument(skip_all, fields(tool = %request.name))]
    pub async fn dispatch(&self, request: ToolCallRequest) -> ToolCallResponse {
        info!("Dispatching tool call");

        match self.run(request).await {
            Ok(response) => response,
            Err((tool, e)) => Self::failure_response(&tool, &e),
        }
    }

    async fn run(
        &self,
        request: ToolCallRequest,
    ) -> Result<ToolCallResponse, (String, ToolError)> {
        let ToolCallRequest { name, arguments } = request;

        let (_, handler) = match self.registry.resolve(&name) {
            Ok(found) => found,
            Err(e) => return Err((name, e)),
        };

        let invocation = match handler.bind(arguments) {
            Ok(invocation) => invocation,
            Err(e) => return Err((name, e)),
        };

        // A panicking handler still owes the caller an envelope
        match AssertUnwindSafe(invocation).catch_unwind().await {
            Ok(Ok(output)) => Ok(normalize(output)),
            Ok(Err(e)) => Err((name, e)),
            Err(_) => Err((name, ToolError::internal("handler panicked"))),
        }
    }

    /// Translate a tool error into a single user-facing block.
    fn failure_response(tool: &str, e: &ToolError) -> ToolCallResponse {
        if e.is_operational() {
            error!("Tool '{}' failed: {:?}", tool, e);
            return ToolCallResponse::failure(format!(
                "Sorry, something went wrong while running '{}'. Please try again later.",
                tool
            ));
        }

        match e {
            ToolError::NotFound(_) => {
                info!("Tool '{}' reported not found: {}", tool, e);
                ToolCallResponse::failure(e.to_string())
            }
            ToolError::Unavailable(_) => {
                warn!("Tool '{}' unavailable: {}", tool, e);
                ToolCallResponse::failure(format!("{} is unavailable: {}", tool, e))
            }
            _ => {
                warn!("Rejected tool call: {}", e);
                ToolCallResponse::failure(e.to_string())
            }
        }
    }
}
