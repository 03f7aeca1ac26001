//! Agent configuration.

use serde::Deserialize;

use parlor_domain::registry::DEFAULT_EXPOSED_DOMAINS;

/// Tunables for the conversation engine. Every field has a sensible default
/// so configuration is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Assistant name used to look up per-entity exposure overrides.
    pub assistant: String,
    /// Language used when the caller does not supply one, and the fallback
    /// when a requested language has no grammar bundle.
    pub default_language: String,
    /// Domains exposed to the engine unless an entity carries an explicit
    /// override.
    pub exposed_domains: Vec<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            assistant: "conversation".to_string(),
            default_language: "en".to_string(),
            exposed_domains: DEFAULT_EXPOSED_DOMAINS.iter().map(ToString::to_string).collect(),
        }
    }
}
