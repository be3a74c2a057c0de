//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating tool calls to the [`ToolDispatcher`].
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool
//! and registered once in `domains/tools/catalog.rs`. The resulting
//! [`CapabilityRegistry`] is frozen inside the dispatcher, which every
//! transport shares.
//!
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Error;
use crate::clients::Collaborators;
use crate::domains::tools::{
    CapabilityRegistry, ToolCallRequest, ToolCallResponse, ToolDispatcher,
    build_capability_registry,
};

const INSTRUCTIONS: &str = "Mood and journal tools: echo a message, get encouragement with \
     moodEnhancer, or summarize the journal with fetchUserInsights.";

/// The main MCP server handler.
///
/// Cheap to clone: configuration and dispatcher are shared.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Dispatcher owning the frozen capability registry.
    dispatcher: Arc<ToolDispatcher>,
}

impl McpServer {
    /// Create a server with HTTP collaborators built from the configuration.
    ///
    /// Fails fast when a required credential is missing.
    pub fn new(config: Config) -> Result<Self, Error> {
        let collaborators = Collaborators::from_config(&config)?;
        Self::with_collaborators(config, collaborators)
    }

    /// Create a server around the given collaborators.
    pub fn with_collaborators(config: Config, collaborators: Collaborators) -> Result<Self, Error> {
        let registry = build_capability_registry(&collaborators, &config.tools)?;
        Ok(Self::with_registry(config, registry))
    }

    /// Create a server around an already built registry.
    pub fn with_registry(config: Config, registry: CapabilityRegistry) -> Self {
        info!("Server exposes {} tool(s)", registry.len());
        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(ToolDispatcher::new(registry)),
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Discovery mapping: tool name to its capability descriptor.
    pub fn capabilities(&self) -> serde_json::Value {
        let tools: BTreeMap<String, serde_json::Value> = self
            .dispatcher
            .registry()
            .describe()
            .into_iter()
            .map(|(name, description)| (name, serde_json::json!({ "description": description })))
            .collect();
        serde_json::json!(tools)
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.dispatcher
            .registry()
            .descriptors()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema.as_ref()
                })
            })
            .collect()
    }

    /// Call a tool by name. Tool failures come back as content, never as `Err`.
    pub async fn call_tool(&self, name: &str, arguments: serde_json::Value) -> ToolCallResponse {
        self.dispatcher
            .dispatch(ToolCallRequest::from_value(name, arguments))
            .await
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _request, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.dispatcher.registry().tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let request =
            ToolCallRequest::new(request.name, request.arguments.unwrap_or_default());
        Ok(self.dispatcher.dispatch(request).await.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::testing::StubCompletion;

    fn test_server() -> McpServer {
        let collaborators = Collaborators {
            completion: StubCompletion::replying("Keep going!"),
            personas: None,
            journal: None,
        };
        McpServer::with_collaborators(Config::default(), collaborators).unwrap()
    }

    #[test]
    fn test_new_fails_without_completion_key() {
        assert!(matches!(
            McpServer::new(Config::default()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_list_tools() {
        let tools = test_server().list_tools();
        assert_eq!(tools.len(), 3);
        assert_eq!(tools[0]["name"], "echo");
        assert!(tools[0]["inputSchema"].is_object());
    }

    #[test]
    fn test_capabilities_mapping() {
        let capabilities = test_server().capabilities();
        assert_eq!(capabilities["echo"]["description"], "Echo a message");
        assert!(capabilities["fetchUserInsights"]["description"].is_string());
    }

    #[tokio::test]
    async fn test_call_tool_echo() {
        let response = test_server()
            .call_tool("echo", serde_json::json!({ "message": "hello" }))
            .await;
        assert_eq!(response.texts(), vec!["Tool echo: hello"]);
    }

    #[tokio::test]
    async fn test_every_failure_branch_has_content() {
        let server = test_server();
        let calls = [
            ("nope", serde_json::json!({})),
            ("echo", serde_json::json!({})),
            ("moodEnhancer", serde_json::json!({ "message": 1 })),
            ("moodEnhancer", serde_json::json!({ "message": "hi", "userId": 3 })),
            ("fetchUserInsights", serde_json::json!({})),
        ];

        for (name, arguments) in calls {
            let response = server.call_tool(name, arguments).await;
            assert!(response.is_error(), "{} should fail", name);
            assert!(!response.content().is_empty());
        }
    }
}
