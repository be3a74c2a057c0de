//! Tool catalog - builds the registry with every tool the server exposes.
//!
//! This is the only place tools are registered; it runs once at startup,
//! before the registry is handed to the dispatcher.

use crate::clients::Collaborators;
use crate::core::config::ToolsConfig;

use super::definitions::{EchoTool, FetchUserInsightsTool, MoodEnhancerTool};
use super::error::ToolError;
use super::registry::CapabilityRegistry;

/// Build the capability registry with all tools.
pub fn build_capability_registry(
    collaborators: &Collaborators,
    tools: &ToolsConfig,
) -> Result<CapabilityRegistry, ToolError> {
    let mut registry = CapabilityRegistry::new();

    registry.register_tool(EchoTool)?;
    registry.register_tool(MoodEnhancerTool::new(
        collaborators.completion.clone(),
        collaborators.personas.clone(),
    ))?;
    registry.register_tool(FetchUserInsightsTool::new(
        collaborators.journal.clone(),
        tools.insights_user_id.clone(),
        tools.fetch_timeout(),
    ))?;

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::testing::StubCompletion;

    fn collaborators() -> Collaborators {
        Collaborators {
            completion: StubCompletion::replying("ok"),
            personas: None,
            journal: None,
        }
    }

    #[test]
    fn test_build_registry() {
        let registry = build_capability_registry(&collaborators(), &ToolsConfig::default()).unwrap();
        assert_eq!(registry.len(), 3);

        let names: Vec<_> = registry.describe().into_keys().collect();
        assert_eq!(names, vec!["echo", "fetchUserInsights", "moodEnhancer"]);
    }

    #[test]
    fn test_capability_texts() {
        let registry = build_capability_registry(&collaborators(), &ToolsConfig::default()).unwrap();
        let described = registry.describe();
        assert_eq!(described["echo"], "Echo a message");
        assert_eq!(
            described["moodEnhancer"],
            "Enhance the user's mood by providing encouragement or suggestions"
        );
    }

    #[test]
    fn test_every_schema_is_an_object() {
        let registry = build_capability_registry(&collaborators(), &ToolsConfig::default()).unwrap();
        for tool in registry.tools() {
            assert_eq!(
                tool.input_schema.get("type"),
                Some(&serde_json::json!("object")),
                "schema of {} is not an object",
                tool.name
            );
        }
    }
}
