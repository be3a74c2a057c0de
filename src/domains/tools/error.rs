//! Tool-specific error types.

use thiserror::Error;

use crate::clients::{DirectoryError, ProviderError, StoreError};

/// Errors that can occur while registering or running tools.
///
/// Every variant is turned into a content block by the dispatcher; none of
/// them reaches the transport.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool is not registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A tool with this name is already registered.
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    /// The arguments did not match the tool's schema.
    #[error("Invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// A referenced entity does not exist. The message is shown to the caller.
    #[error("{0}")]
    NotFound(String),

    /// A collaborator this tool needs is not configured.
    #[error("{0} is not configured")]
    Unavailable(&'static str),

    /// The completion provider failed.
    #[error("Completion provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The persona directory failed.
    #[error("Persona directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// The journal store failed.
    #[error("Journal store error: {0}")]
    Store(#[from] StoreError),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Create a new "not found" error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error comes from a failing collaborator or an internal
    /// fault, as opposed to something the caller can act on.
    pub fn is_operational(&self) -> bool {
        matches!(
            self,
            Self::DuplicateTool(_)
                | Self::Provider(_)
                | Self::Directory(_)
                | Self::Store(_)
                | Self::Internal(_)
        )
    }
}
