//! Capability Registry - the write-once table of tools.
//!
//! Tools are registered while the server is being built. Once the registry is
//! handed to the dispatcher it is only ever read, so it needs no locking.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::{JsonObject, Tool};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::info;

use super::error::ToolError;
use super::response::ToolOutput;

/// A bound, not yet started tool invocation.
pub type ToolInvocation = BoxFuture<'static, Result<ToolOutput, ToolError>>;

/// Name, argument schema and capability text of a registered tool.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub input_schema: Arc<JsonObject>,
    pub description: String,
}

impl ToolDescriptor {
    /// Create a Tool model for this descriptor (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.clone().into(),
            description: Some(self.description.clone().into()),
            input_schema: self.input_schema.clone(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

/// Type-erased handler stored in the registry.
///
/// `bind` validates the raw arguments and returns the invocation to run. No
/// handler code executes until the returned future is awaited.
pub trait ToolHandler: Send + Sync {
    fn bind(&self, arguments: JsonObject) -> Result<ToolInvocation, ToolError>;
}

/// A tool with typed, schema-bearing parameters.
///
/// Implementors get schema generation and argument validation for free via
/// [`CapabilityRegistry::register_tool`].
#[async_trait::async_trait]
pub trait ToolDefinition: Send + Sync + 'static {
    /// Parameters; their `JsonSchema` is the tool's input schema.
    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Capability text shown to clients.
    const DESCRIPTION: &'static str;

    async fn execute(&self, params: Self::Params) -> Result<ToolOutput, ToolError>;
}

/// Adapts a [`ToolDefinition`] to the type-erased [`ToolHandler`].
struct TypedHandler<T> {
    tool: Arc<T>,
}

impl<T: ToolDefinition> ToolHandler for TypedHandler<T> {
    fn bind(&self, arguments: JsonObject) -> Result<ToolInvocation, ToolError> {
        let params: T::Params = serde_json::from_value(serde_json::Value::Object(arguments))
            .map_err(|e| ToolError::invalid_arguments(T::NAME, e.to_string()))?;

        let tool = self.tool.clone();
        Ok(async move { tool.execute(params).await }.boxed())
    }
}

struct RegisteredTool {
    descriptor: ToolDescriptor,
    handler: Arc<dyn ToolHandler>,
}

/// Registry of all tools the server exposes.
#[derive(Default)]
pub struct CapabilityRegistry {
    tools: HashMap<String, RegisteredTool>,
}

impl CapabilityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its descriptor's name.
    ///
    /// Fails if the name is already taken.
    pub fn register(
        &mut self,
        descriptor: ToolDescriptor,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), ToolError> {
        if self.tools.contains_key(&descriptor.name) {
            return Err(ToolError::DuplicateTool(descriptor.name));
        }

        info!("Registering tool: {}", descriptor.name);
        self.tools.insert(
            descriptor.name.clone(),
            RegisteredTool {
                descriptor,
                handler,
            },
        );
        Ok(())
    }

    /// Register a typed tool, deriving its schema from `T::Params`.
    pub fn register_tool<T: ToolDefinition>(&mut self, tool: T) -> Result<(), ToolError> {
        let descriptor = ToolDescriptor {
            name: T::NAME.to_string(),
            input_schema: cached_schema_for_type::<T::Params>(),
            description: T::DESCRIPTION.to_string(),
        };
        self.register(
            descriptor,
            Arc::new(TypedHandler {
                tool: Arc::new(tool),
            }),
        )
    }

    /// Look up a tool by name.
    pub fn resolve(&self, name: &str) -> Result<(&ToolDescriptor, &dyn ToolHandler), ToolError> {
        self.tools
            .get(name)
            .map(|t| (&t.descriptor, t.handler.as_ref()))
            .ok_or_else(|| ToolError::unknown_tool(name))
    }

    /// Mapping of tool name to capability text, for discovery.
    pub fn describe(&self) -> BTreeMap<String, String> {
        self.tools
            .values()
            .map(|t| (t.descriptor.name.clone(), t.descriptor.description.clone()))
            .collect()
    }

    /// All descriptors, sorted by name.
    pub fn descriptors(&self) -> Vec<&ToolDescriptor> {
        let mut descriptors: Vec<_> = self.tools.values().map(|t| &t.descriptor).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Get all tools as Tool models (metadata).
    pub fn tools(&self) -> Vec<Tool> {
        self.descriptors().into_iter().map(ToolDescriptor::to_tool).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
