//! Response envelope and normalization.
//!
//! Every tool call, successful or not, ends up as a [`ToolCallResponse`]: an
//! ordered, never-empty list of [`ContentBlock`]s. Handlers return a
//! [`ToolOutput`] and [`normalize`] turns it into the envelope.

use rmcp::model::{CallToolResult, Content};
use serde::{Deserialize, Serialize};

/// Placeholder rendered for an optional value that is absent.
pub const MISSING_VALUE: &str = "N/A";

/// One unit of a tool response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    /// Plain text block.
    Text { text: String },
}

impl ContentBlock {
    /// Create a text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The block's text, if it is a text block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
        }
    }

    fn into_content(self) -> Content {
        match self {
            Self::Text { text } => Content::text(text),
        }
    }
}

/// The envelope returned for every tool invocation.
///
/// The content list is private so that an envelope can only be built through
/// constructors that supply at least one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResponse {
    content: Vec<ContentBlock>,
    is_error: bool,
}

impl ToolCallResponse {
    /// A successful response with a primary block and supplementary blocks.
    pub fn success(primary: ContentBlock, rest: impl IntoIterator<Item = ContentBlock>) -> Self {
        let mut content = vec![primary];
        content.extend(rest);
        Self {
            content,
            is_error: false,
        }
    }

    /// A failure response carrying one user-facing message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(message)],
            is_error: true,
        }
    }

    pub fn content(&self) -> &[ContentBlock] {
        &self.content
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Texts of all blocks, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.content.iter().filter_map(ContentBlock::as_text).collect()
    }

    /// Serialize to the JSON shape used by `tools/call` over HTTP.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "content": self.content,
            "isError": self.is_error,
        })
    }
}

impl From<ToolCallResponse> for CallToolResult {
    fn from(response: ToolCallResponse) -> Self {
        let content = response
            .content
            .into_iter()
            .map(ContentBlock::into_content)
            .collect();
        if response.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}

/// A named value in a summary record. `None` renders as [`MISSING_VALUE`].
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
    pub label: String,
    pub value: Option<String>,
}

impl NamedValue {
    pub fn new(label: impl Into<String>, value: Option<impl ToString>) -> Self {
        Self {
            label: label.into(),
            value: value.map(|v| v.to_string()),
        }
    }

    fn render(&self) -> String {
        format!(
            "{}: {}",
            self.label,
            self.value.as_deref().unwrap_or(MISSING_VALUE)
        )
    }
}

/// What a tool handler produces on success.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// A single answer.
    Text(String),

    /// An answer followed by auxiliary strings (e.g. suggestions).
    WithSupplements {
        primary: String,
        supplements: Vec<String>,
    },

    /// A small record of named values; the first entry is the primary block.
    Record(NamedValue, Vec<NamedValue>),
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Convert handler output into a response envelope.
///
/// Each string becomes one text block, in the order supplied.
pub fn normalize(output: ToolOutput) -> ToolCallResponse {
    match output {
        ToolOutput::Text(text) => ToolCallResponse::success(ContentBlock::text(text), []),
        ToolOutput::WithSupplements {
            primary,
            supplements,
        } => ToolCallResponse::success(
            ContentBlock::text(primary),
            supplements.into_iter().map(ContentBlock::text),
        ),
        ToolOutput::Record(first, rest) => ToolCallResponse::success(
            ContentBlock::text(first.render()),
            rest.iter().map(|entry| ContentBlock::text(entry.render())),
        ),
    }
}
