//! moodEnhancer tool.
//!
//! Replies to a user's message with encouragement from the completion
//! provider. When a user id is given, the persona directory is consulted
//! first and the persona's facts are folded into the system prompt.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info};

use super::sentiment::Mood;
use crate::clients::{CompletionProvider, Persona, PersonaDirectory};
use crate::domains::tools::{ToolDefinition, ToolError, ToolOutput};

const BASE_PROMPT: &str = "You are a supportive companion. Reply to the user's message with \
     short, sincere encouragement. Keep it under 120 words.";

/// Actionable suggestions appended when the user seems low.
pub const SUGGESTIONS: [&str; 3] = [
    "Take a short walk outside and notice three things you like.",
    "Write down one thing you're grateful for today.",
    "Reach out to a friend or someone you trust for a quick chat.",
];

/// Parameters for the mood enhancer.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoodEnhancerParams {
    /// What the user said.
    #[schemars(description = "The user's message")]
    pub message: String,

    /// Optional persona directory id of the user.
    #[schemars(description = "Numeric user id used to personalize the reply")]
    #[serde(default)]
    pub user_id: Option<u64>,
}

pub struct MoodEnhancerTool {
    completion: Arc<dyn CompletionProvider>,
    personas: Option<Arc<dyn PersonaDirectory>>,
}

impl MoodEnhancerTool {
    pub fn new(
        completion: Arc<dyn CompletionProvider>,
        personas: Option<Arc<dyn PersonaDirectory>>,
    ) -> Self {
        Self {
            completion,
            personas,
        }
    }

    async fn resolve_persona(&self, user_id: u64) -> Result<Persona, ToolError> {
        let directory = self
            .personas
            .as_ref()
            .ok_or(ToolError::Unavailable("the persona directory"))?;

        directory
            .lookup_persona(user_id)
            .await?
            .ok_or_else(|| ToolError::not_found(format!("User {} not found", user_id)))
    }
}

/// Assemble the system prompt from the detected mood and persona facts.
pub fn system_prompt(mood: Mood, persona: Option<&Persona>) -> String {
    let mut prompt = format!("{}\n\n{}", BASE_PROMPT, mood.describe());
    if let Some(persona) = persona {
        prompt.push_str("\n\nWhat you know about the user:\n");
        for fact in persona.facts() {
            prompt.push_str("- ");
            prompt.push_str(&fact);
            prompt.push('\n');
        }
    }
    prompt
}

#[async_trait::async_trait]
impl ToolDefinition for MoodEnhancerTool {
    type Params = MoodEnhancerParams;

    const NAME: &'static str = "moodEnhancer";

    const DESCRIPTION: &'static str =
        "Enhance the user's mood by providing encouragement or suggestions";

    async fn execute(&self, params: MoodEnhancerParams) -> Result<ToolOutput, ToolError> {
        let persona = match params.user_id {
            Some(id) => Some(self.resolve_persona(id).await?),
            None => None,
        };

        let mood = Mood::detect(&params.message);
        info!("Detected mood: {:?}", mood);

        let prompt = system_prompt(mood, persona.as_ref());
        debug!("System prompt is {} chars", prompt.len());

        let reply = self.completion.complete(&prompt, &params.message).await?;

        Ok(match mood {
            Mood::Negative => ToolOutput::WithSupplements {
                primary: reply,
                supplements: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            },
            Mood::Positive | Mood::Neutral => ToolOutput::Text(reply),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::testing::{StubCompletion, StubDirectory, persona};
    use crate::domains::tools::{CapabilityRegistry, ToolCallRequest, ToolDispatcher};
    use std::sync::atomic::Ordering;

    fn dispatcher(
        completion: Arc<StubCompletion>,
        personas: Option<Arc<StubDirectory>>,
    ) -> ToolDispatcher {
        let mut registry = CapabilityRegistry::new();
        registry
            .register_tool(MoodEnhancerTool::new(
                completion,
                personas.map(|p| p as Arc<dyn PersonaDirectory>),
            ))
            .unwrap();
        ToolDispatcher::new(registry)
    }

    fn call(arguments: serde_json::Value) -> ToolCallRequest {
        ToolCallRequest::from_value("moodEnhancer", arguments)
    }

    #[tokio::test]
    async fn test_reply_without_user() {
        let completion = StubCompletion::replying("You've got this!");
        let response = dispatcher(completion.clone(), None)
            .dispatch(call(serde_json::json!({ "message": "I feel great" })))
            .await;

        assert_eq!(response.texts(), vec!["You've got this!"]);
        assert_eq!(completion.call_count(), 1);
    }

    #[tokio::test]
    async fn test_negative_mood_adds_suggestions() {
        let completion = StubCompletion::replying("I'm here for you.");
        let response = dispatcher(completion, None)
            .dispatch(call(serde_json::json!({ "message": "I'm feeling down" })))
            .await;

        let texts = response.texts();
        assert_eq!(texts.len(), 1 + SUGGESTIONS.len());
        assert_eq!(texts[0], "I'm here for you.");
        assert_eq!(&texts[1..], &SUGGESTIONS);
    }

    #[tokio::test]
    async fn test_unknown_user_short_circuits() {
        let completion = StubCompletion::replying("unused");
        let directory = StubDirectory::with(vec![persona(1, "Ada")]);
        let response = dispatcher(completion.clone(), Some(directory.clone()))
            .dispatch(call(serde_json::json!({ "message": "hi", "userId": 99 })))
            .await;

        assert_eq!(response.texts(), vec!["User 99 not found"]);
        assert!(response.is_error());
        assert_eq!(directory.calls.load(Ordering::SeqCst), 1);
        assert_eq!(completion.call_count(), 0);
    }

    #[tokio::test]
    async fn test_known_user_enriches_prompt() {
        let completion = StubCompletion::replying("Hi Ada!");
        let directory = StubDirectory::with(vec![persona(1, "Ada")]);
        let response = dispatcher(completion.clone(), Some(directory))
            .dispatch(call(serde_json::json!({ "message": "hello", "userId": 1 })))
            .await;

        assert_eq!(response.texts(), vec!["Hi Ada!"]);
        let prompt = completion.last_system_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("Name: Ada"));
    }

    #[tokio::test]
    async fn test_directory_failure_is_generic() {
        let completion = StubCompletion::replying("unused");
        let response = dispatcher(completion.clone(), Some(StubDirectory::failing()))
            .dispatch(call(serde_json::json!({ "message": "hi", "userId": 1 })))
            .await;

        assert_eq!(response.content().len(), 1);
        assert!(response.texts()[0].starts_with("Sorry"));
        assert!(!response.texts()[0].contains("unauthorized"));
        assert_eq!(completion.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_directory_is_reported() {
        let completion = StubCompletion::replying("unused");
        let response = dispatcher(completion.clone(), None)
            .dispatch(call(serde_json::json!({ "message": "hi", "userId": 1 })))
            .await;

        assert_eq!(
            response.texts(),
            vec!["moodEnhancer is unavailable: the persona directory is not configured"]
        );
        assert_eq!(completion.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_apologizes() {
        let completion = StubCompletion::failing();
        let response = dispatcher(completion.clone(), None)
            .dispatch(call(serde_json::json!({ "message": "hello" })))
            .await;

        assert_eq!(completion.call_count(), 1);
        assert_eq!(response.content().len(), 1);
        assert!(response.is_error());
        assert!(response.texts()[0].starts_with("Sorry"));
    }

    #[tokio::test]
    async fn test_user_id_must_be_numeric() {
        let completion = StubCompletion::replying("unused");
        let response = dispatcher(completion.clone(), None)
            .dispatch(call(serde_json::json!({ "message": "hi", "userId": "abc" })))
            .await;

        assert!(response.is_error());
        assert!(response.texts()[0].starts_with("Invalid arguments"));
        assert_eq!(completion.call_count(), 0);
    }

    #[test]
    fn test_system_prompt_mentions_mood() {
        let prompt = system_prompt(Mood::Negative, None);
        assert!(prompt.starts_with(BASE_PROMPT));
        assert!(prompt.contains(Mood::Negative.describe()));
        assert!(!prompt.contains("What you know"));
    }
}
