//! Persona directory client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::DirectoryError;

/// Profile of an end user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl Persona {
    /// Short facts about the persona, one per line, for prompt enrichment.
    pub fn facts(&self) -> Vec<String> {
        let mut facts = vec![format!("Name: {}", self.name)];
        if let Some(bio) = self.bio.as_deref().filter(|b| !b.is_empty()) {
            facts.push(format!("About: {}", bio));
        }
        if !self.interests.is_empty() {
            facts.push(format!("Interests: {}", self.interests.join(", ")));
        }
        facts
    }
}

/// Resolves personas by identifier.
///
/// `Ok(None)` means the directory answered and has no such user.
#[async_trait]
pub trait PersonaDirectory: Send + Sync {
    async fn lookup_persona(&self, id: u64) -> Result<Option<Persona>, DirectoryError>;
}

/// REST client for the persona directory (`GET {base}/personas/{id}`).
///
/// The bearer token is optional; open directories are queried without one.
pub struct HttpPersonaDirectory {
    base_url: String,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl HttpPersonaDirectory {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            http_client: reqwest::Client::new(),
        }
    }

    fn request(&self, id: u64) -> reqwest::RequestBuilder {
        let request = self
            .http_client
            .get(format!("{}/personas/{}", self.base_url, id));
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }
}

#[async_trait]
impl PersonaDirectory for HttpPersonaDirectory {
    #[instrument(skip(self))]
    async fn lookup_persona(&self, id: u64) -> Result<Option<Persona>, DirectoryError> {
        let response = self.request(id).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Persona {} not in directory", id);
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(Some(response.json().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_without_key_has_no_authorization() {
        let directory = HttpPersonaDirectory::new("https://people.example.com/", None);
        let request = directory.request(7).build().unwrap();
        assert_eq!(request.url().as_str(), "https://people.example.com/personas/7");
        assert!(request.headers().get("Authorization").is_none());
    }

    #[test]
    fn test_request_with_key_sends_bearer() {
        let directory =
            HttpPersonaDirectory::new("https://people.example.com", Some("secret".to_string()));
        let request = directory.request(7).build().unwrap();
        assert_eq!(
            request.headers().get("Authorization").unwrap(),
            "Bearer secret"
        );
    }

    #[test]
    fn test_persona_defaults() {
        let persona: Persona = serde_json::from_str(r#"{"id": 1, "name": "Ada"}"#).unwrap();
        assert_eq!(persona.bio, None);
        assert!(persona.interests.is_empty());
        assert_eq!(persona.facts(), vec!["Name: Ada".to_string()]);
    }

    #[test]
    fn test_persona_facts() {
        let persona = Persona {
            id: 2,
            name: "Lin".to_string(),
            bio: Some("Night-shift nurse".to_string()),
            interests: vec!["running".to_string(), "jazz".to_string()],
        };
        assert_eq!(
            persona.facts(),
            vec![
                "Name: Lin".to_string(),
                "About: Night-shift nurse".to_string(),
                "Interests: running, jazz".to_string(),
            ]
        );
    }
}
