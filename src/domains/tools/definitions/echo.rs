//! Echo tool - the minimal round trip through the dispatch pipeline.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::domains::tools::{ToolDefinition, ToolError, ToolOutput};

/// Parameters for the echo tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct EchoParams {
    /// Message to echo back.
    #[schemars(description = "Message to echo back")]
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct EchoTool;

#[async_trait::async_trait]
impl ToolDefinition for EchoTool {
    type Params = EchoParams;

    const NAME: &'static str = "echo";

    const DESCRIPTION: &'static str = "Echo a message";

    async fn execute(&self, params: EchoParams) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::text(format!("Tool echo: {}", params.message)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::{
        CapabilityRegistry, ContentBlock, ToolCallRequest, ToolDispatcher,
    };

    fn dispatcher() -> ToolDispatcher {
        let mut registry = CapabilityRegistry::new();
        registry.register_tool(EchoTool).unwrap();
        ToolDispatcher::new(registry)
    }

    #[tokio::test]
    async fn test_echo_hello() {
        let response = dispatcher()
            .dispatch(ToolCallRequest::from_value(
                "echo",
                serde_json::json!({ "message": "hello" }),
            ))
            .await;

        assert_eq!(response.content(), &[ContentBlock::text("Tool echo: hello")]);
    }

    #[tokio::test]
    async fn test_echo_requires_message() {
        let response = dispatcher()
            .dispatch(ToolCallRequest::from_value("echo", serde_json::json!({})))
            .await;

        assert!(response.is_error());
        assert_eq!(response.content().len(), 1);
        assert!(response.texts()[0].contains("message"));
    }

    #[tokio::test]
    async fn test_echo_rejects_non_string() {
        let response = dispatcher()
            .dispatch(ToolCallRequest::from_value(
                "echo",
                serde_json::json!({ "message": 12 }),
            ))
            .await;

        assert!(response.is_error());
    }
}
