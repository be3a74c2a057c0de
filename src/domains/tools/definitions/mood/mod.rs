//! Mood tools.

pub mod enhancer;
pub mod sentiment;

pub use enhancer::{MoodEnhancerParams, MoodEnhancerTool};
pub use sentiment::Mood;
