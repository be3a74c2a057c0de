//! Configuration management for the MCP server.
//!
//! Configuration starts from defaults and is overridden by environment
//! variables prefixed with `MCP_` (a `.env` file is loaded first if present).

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Endpoints of external collaborators.
    pub services: ServicesConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,

    /// Tool behavior settings.
    pub tools: ToolsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Where the external collaborators live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Base URL of the OpenAI-compatible completion API.
    pub completion_base_url: String,

    /// Model used for completions.
    pub completion_model: String,

    /// Base URL of the persona directory. `None` disables persona lookups.
    pub persona_api_url: Option<String>,

    /// Base URL of the journal store's REST API. `None` disables insights.
    pub journal_url: Option<String>,
}

/// Configuration for external API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Completion provider API key. Required.
    pub completion_api_key: Option<String>,

    /// Persona directory API key.
    pub persona_api_key: Option<String>,

    /// Journal store API key.
    pub journal_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("CredentialsConfig")
            .field("completion_api_key", &redact(&self.completion_api_key))
            .field("persona_api_key", &redact(&self.persona_api_key))
            .field("journal_api_key", &redact(&self.journal_api_key))
            .finish()
    }
}

/// Settings that shape tool behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// User whose journal `fetchUserInsights` summarizes.
    pub insights_user_id: String,

    /// Per-fetch timeout for aggregated reads, in seconds. `0` disables it.
    pub fetch_timeout_secs: u64,
}

impl ToolsConfig {
    pub fn fetch_timeout(&self) -> Option<std::time::Duration> {
        (self.fetch_timeout_secs > 0).then(|| std::time::Duration::from_secs(self.fetch_timeout_secs))
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            completion_base_url: "https://api.openai.com/v1".to_string(),
            completion_model: "gpt-4o-mini".to_string(),
            persona_api_url: None,
            journal_url: None,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            insights_user_id: "demo-user".to_string(),
            fetch_timeout_secs: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "mood-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            services: ServicesConfig::default(),
            credentials: CredentialsConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl LoggingConfig {
    /// Read only the logging settings, so a subscriber can be installed
    /// before the rest of the configuration reports anything.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut logging = Config::default().logging;
        if let Some(level) = env_var("MCP_LOG_LEVEL") {
            logging.level = level;
        }
        logging
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Some(name) = env_var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        if let Some(url) = env_var("MCP_COMPLETION_BASE_URL") {
            config.services.completion_base_url = url;
        }
        if let Some(model) = env_var("MCP_COMPLETION_MODEL") {
            config.services.completion_model = model;
        }
        config.services.persona_api_url = env_var("MCP_PERSONA_API_URL");
        config.services.journal_url = env_var("MCP_JOURNAL_URL");

        config.credentials.completion_api_key = env_var("MCP_COMPLETION_API_KEY");
        config.credentials.persona_api_key = env_var("MCP_PERSONA_API_KEY");
        config.credentials.journal_api_key = env_var("MCP_JOURNAL_KEY");

        if let Some(user_id) = env_var("MCP_INSIGHTS_USER_ID") {
            config.tools.insights_user_id = user_id;
        }

        if let Some(timeout) = env_var("MCP_FETCH_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.tools.fetch_timeout_secs = secs,
                Err(_) => warn!(
                    "Ignoring invalid MCP_FETCH_TIMEOUT_SECS '{}', using {}s",
                    timeout, config.tools.fetch_timeout_secs
                ),
            }
        }

        if config.persona_directory().is_none() {
            warn!("Persona directory not configured - moodEnhancer calls with userId will fail");
        }
        if config.journal_store().is_none() {
            if config.services.journal_url.is_some() {
                warn!("MCP_JOURNAL_URL is set but MCP_JOURNAL_KEY is missing - journal store disabled");
            } else {
                warn!("Journal store not configured - fetchUserInsights will be unavailable");
            }
        }

        config
    }

    /// Check the settings the server cannot start without.
    pub fn validate(&self) -> Result<()> {
        if self.credentials.completion_api_key.is_none() {
            return Err(Error::config(
                "MCP_COMPLETION_API_KEY is required (completion provider credentials)",
            ));
        }
        info!("Completion provider: {}", self.services.completion_base_url);
        Ok(())
    }

    /// Persona directory URL, with its key when one is set.
    pub fn persona_directory(&self) -> Option<(&str, Option<&str>)> {
        let url = self.services.persona_api_url.as_deref()?;
        Some((url, self.credentials.persona_api_key.as_deref()))
    }

    /// Journal store URL and key, when both are set.
    pub fn journal_store(&self) -> Option<(&str, &str)> {
        Some((
            self.services.journal_url.as_deref()?,
            self.credentials.journal_api_key.as_deref()?,
        ))
    }
}
