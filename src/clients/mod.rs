//! Clients for the external services tools depend on.
//!
//! Each collaborator is a trait so tools can be exercised against stubs; the
//! HTTP implementations are wired up from [`Config`] by [`Collaborators`].

mod completion;
mod error;
mod journal;
mod persona;

use std::sync::Arc;

use tracing::info;

use crate::core::{Config, Error, Result};

pub use completion::{CompletionProvider, OpenAiCompletionProvider};
pub use error::{DirectoryError, ProviderError, StoreError};
pub use journal::{JournalQuery, JournalRow, JournalStore, RestJournalStore, WEEK_DAYS};
pub use persona::{HttpPersonaDirectory, Persona, PersonaDirectory};

/// The set of collaborators handed to tools at startup.
///
/// The completion provider is always present; the persona directory and the
/// journal store are optional and only needed by specific tools.
#[derive(Clone)]
pub struct Collaborators {
    pub completion: Arc<dyn CompletionProvider>,
    pub personas: Option<Arc<dyn PersonaDirectory>>,
    pub journal: Option<Arc<dyn JournalStore>>,
}

impl Collaborators {
    /// Build HTTP clients from configuration.
    ///
    /// Fails when the completion provider has no credentials.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let api_key = config
            .credentials
            .completion_api_key
            .clone()
            .ok_or_else(|| Error::config("missing completion provider API key"))?;

        let completion: Arc<dyn CompletionProvider> = Arc::new(OpenAiCompletionProvider::new(
            config.services.completion_model.clone(),
            api_key,
            config.services.completion_base_url.clone(),
        ));

        let personas = config.persona_directory().map(|(url, key)| {
            info!("Persona directory: {}", url);
            Arc::new(HttpPersonaDirectory::new(url, key.map(str::to_string)))
                as Arc<dyn PersonaDirectory>
        });

        let journal = config.journal_store().map(|(url, key)| {
            info!("Journal store: {}", url);
            Arc::new(RestJournalStore::new(url, key)) as Arc<dyn JournalStore>
        });

        Ok(Self {
            completion,
            personas,
            journal,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Stub collaborators that record how often they are called.

    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Completion stub returning a fixed reply, or failing.
    pub struct StubCompletion {
        reply: Option<String>,
        pub calls: AtomicUsize,
        pub last_system_prompt: Mutex<Option<String>>,
    }

    impl StubCompletion {
        pub fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                calls: AtomicUsize::new(0),
                last_system_prompt: Mutex::new(None),
            })
        }

        pub fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: AtomicUsize::new(0),
                last_system_prompt: Mutex::new(None),
            })
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionProvider for StubCompletion {
        async fn complete(
            &self,
            system_prompt: &str,
            _user_message: &str,
        ) -> std::result::Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_system_prompt.lock().unwrap() = Some(system_prompt.to_string());
            self.reply.clone().ok_or(ProviderError::Status {
                status: 429,
                body: "rate limited".to_string(),
            })
        }
    }

    /// Directory stub backed by a map; `failing` answers every lookup with an error.
    pub struct StubDirectory {
        personas: HashMap<u64, Persona>,
        failing: bool,
        pub calls: AtomicUsize,
    }

    impl StubDirectory {
        pub fn with(personas: Vec<Persona>) -> Arc<Self> {
            Arc::new(Self {
                personas: personas.into_iter().map(|p| (p.id, p)).collect(),
                failing: false,
                calls: AtomicUsize::new(0),
            })
        }

        pub fn failing() -> Arc<Self> {
            Arc::new(Self {
                personas: HashMap::new(),
                failing: true,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PersonaDirectory for StubDirectory {
        async fn lookup_persona(
            &self,
            id: u64,
        ) -> std::result::Result<Option<Persona>, DirectoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing {
                return Err(DirectoryError::Status {
                    status: 401,
                    body: "unauthorized".to_string(),
                });
            }
            Ok(self.personas.get(&id).cloned())
        }
    }

    /// Store stub with canned rows per query; queries in `failing` return an error.
    pub struct StubStore {
        rows: HashMap<JournalQuery, Vec<JournalRow>>,
        failing: Vec<JournalQuery>,
        stalled: Vec<JournalQuery>,
        pub calls: AtomicUsize,
    }

    impl StubStore {
        pub fn new(rows: Vec<(JournalQuery, Vec<JournalRow>)>, failing: Vec<JournalQuery>) -> Arc<Self> {
            Arc::new(Self {
                rows: rows.into_iter().collect(),
                failing,
                stalled: Vec::new(),
                calls: AtomicUsize::new(0),
            })
        }

        /// A store whose `stalled` queries never answer in time.
        pub fn stalling(rows: Vec<(JournalQuery, Vec<JournalRow>)>, stalled: Vec<JournalQuery>) -> Arc<Self> {
            Arc::new(Self {
                rows: rows.into_iter().collect(),
                failing: Vec::new(),
                stalled,
                calls: AtomicUsize::new(0),
            })
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JournalStore for StubStore {
        async fn fetch(
            &self,
            _user_id: &str,
            query: JournalQuery,
        ) -> std::result::Result<Vec<JournalRow>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.stalled.contains(&query) {
                tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            }
            if self.failing.contains(&query) {
                return Err(StoreError::query(format!("{:?} failed", query)));
            }
            Ok(self.rows.get(&query).cloned().unwrap_or_default())
        }
    }

    pub fn persona(id: u64, name: &str) -> Persona {
        Persona {
            id,
            name: name.to_string(),
            bio: None,
            interests: vec![],
        }
    }

    pub fn rows(count: usize) -> Vec<JournalRow> {
        vec![JournalRow::default(); count]
    }

    pub fn scored(score: f64) -> JournalRow {
        JournalRow {
            score: Some(score),
            ..JournalRow::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_completion_key() {
        let config = Config::default();
        assert!(Collaborators::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_optional_collaborators() {
        let mut config = Config::default();
        config.credentials.completion_api_key = Some("key".to_string());
        config.services.persona_api_url = Some("https://personas.example.com".to_string());
        config.credentials.persona_api_key = Some("pkey".to_string());

        let collaborators = Collaborators::from_config(&config).unwrap();
        assert!(collaborators.personas.is_some());
        assert!(collaborators.journal.is_none());
    }

    #[test]
    fn test_persona_directory_without_key() {
        let mut config = Config::default();
        config.credentials.completion_api_key = Some("key".to_string());
        config.services.persona_api_url = Some("https://personas.example.com".to_string());

        let collaborators = Collaborators::from_config(&config).unwrap();
        assert!(collaborators.personas.is_some());
    }
}
