//! Collaborator error types.

use thiserror::Error;

use crate::domains::tools::FetchTimeout;

/// Errors from the completion provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network failure or malformed HTTP exchange.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status (auth, rate limit, server error).
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response carried no completion text.
    #[error("provider returned no completion")]
    EmptyCompletion,
}

/// Errors from the persona directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("directory returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Errors from the journal store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Timeout(#[from] FetchTimeout),

    /// Query failure reported by the store itself.
    #[error("query failed: {0}")]
    Query(String),
}

impl StoreError {
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }
}
