//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod echo;
pub mod insights;
pub mod mood;

pub use echo::{EchoParams, EchoTool};
pub use insights::{FetchUserInsightsParams, FetchUserInsightsTool, InsightSummary};
pub use mood::{MoodEnhancerParams, MoodEnhancerTool};
