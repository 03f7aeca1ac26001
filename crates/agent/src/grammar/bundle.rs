//! Grammar bundle — the TOML format sentence templates are shipped in.
//!
//! A bundle carries one language's intents, each with one or more data
//! blocks: a set of sentence templates plus fixed slot values that apply to
//! every sentence in the block (e.g. `domain = "light"` for light-specific
//! phrasings). Named lists constrain what a slot may capture; slots without
//! a list capture free text.

use std::collections::BTreeMap;
use std::future::Future;

use serde::Deserialize;

use super::GrammarError;
use crate::ports::BundleProvider;

/// One language's worth of sentence templates.
#[derive(Debug, Clone, Deserialize)]
pub struct GrammarBundle {
    pub language: String,
    /// Named value lists, e.g. `state = ["on", "off"]`. A `{state}` slot
    /// then only matches those values.
    #[serde(default)]
    pub lists: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub intents: Vec<IntentGrammar>,
}

/// All templates for one intent.
#[derive(Debug, Clone, Deserialize)]
pub struct IntentGrammar {
    pub name: String,
    #[serde(default)]
    pub data: Vec<IntentData>,
}

/// A block of sentences sharing fixed slot values.
#[derive(Debug, Clone, Deserialize)]
pub struct IntentData {
    pub sentences: Vec<String>,
    #[serde(default)]
    pub slots: BTreeMap<String, String>,
}

impl GrammarBundle {
    /// Parse a bundle from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::Parse`] for malformed TOML.
    pub fn from_toml(text: &str) -> Result<Self, GrammarError> {
        Ok(toml::from_str(text)?)
    }
}

const EN_BUNDLE: &str = include_str!("../../grammars/en.toml");

/// The bundles compiled into the binary. External providers can serve more
/// languages; this one covers English.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinBundles;

impl BundleProvider for BuiltinBundles {
    fn load_bundle(
        &self,
        language: &str,
    ) -> impl Future<Output = Result<GrammarBundle, GrammarError>> + Send {
        let result = match language {
            "en" => GrammarBundle::from_toml(EN_BUNDLE),
            other => Err(GrammarError::UnknownLanguage(other.to_string())),
        };
        async { result }
    }

    fn languages(&self) -> Vec<String> {
        vec!["en".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_load_builtin_english_bundle() {
        let bundle = BuiltinBundles.load_bundle("en").await.unwrap();
        assert_eq!(bundle.language, "en");
        assert!(bundle.intents.iter().any(|intent| intent.name == "TurnOn"));
        assert!(bundle.lists.contains_key("state"));
    }

    #[tokio::test]
    async fn should_reject_unknown_language() {
        let result = BuiltinBundles.load_bundle("entish").await;
        assert!(matches!(result, Err(GrammarError::UnknownLanguage(lang)) if lang == "entish"));
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result = GrammarBundle::from_toml("language = [broken");
        assert!(matches!(result, Err(GrammarError::Parse(_))));
    }

    #[test]
    fn should_parse_minimal_bundle() {
        let bundle = GrammarBundle::from_toml(
            "
            language = 'xx'

            [[intents]]
            name = 'TurnOn'

            [[intents.data]]
            sentences = ['turn on {name}']
            ",
        )
        .unwrap();
        assert_eq!(bundle.language, "xx");
        assert_eq!(bundle.intents[0].data[0].sentences.len(), 1);
        assert!(bundle.intents[0].data[0].slots.is_empty());
    }
}
