//! Per-language grammar store — compile once, cache, invalidate on demand.
//!
//! The compiled set folds in a vocabulary of currently exposed entity and
//! area names, used by the recognizer to rank candidates. The store itself
//! is a pure cache keyed by language: when exposed names change, the
//! registry-change collaborator calls [`GrammarStore::invalidate`] and the
//! next load recompiles against fresh names.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use parlor_domain::registry::{RegistrySnapshot, normalize_name};

use super::GrammarError;
use super::bundle::GrammarBundle;
use super::template::{CompiledTemplate, compile_sentence};
use crate::config::AgentConfig;
use crate::ports::BundleProvider;

/// A compiled, per-language set of sentence templates.
#[derive(Debug)]
pub struct GrammarSet {
    pub language: String,
    pub(crate) templates: Vec<CompiledTemplate>,
    pub(crate) lists: BTreeMap<String, Vec<String>>,
    /// Normalized names of exposed entities and of areas, for ranking
    /// free-text captures that refer to something real.
    pub(crate) vocabulary: HashSet<String>,
}

/// Caching front of a [`BundleProvider`].
///
/// Loads are single-flight per language: concurrent callers for an unloaded
/// language share one compilation. No lock is held across the provider call
/// other than the per-language once-cell.
pub struct GrammarStore<P> {
    provider: P,
    cache: Mutex<HashMap<String, Arc<OnceCell<Arc<GrammarSet>>>>>,
}

impl<P: BundleProvider> GrammarStore<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The provider behind this store.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Load the compiled grammar for `language`, compiling on first use.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnknownLanguage`] when the provider has no
    /// bundle for `language`, or a parse/template error for a malformed one.
    pub async fn load(
        &self,
        language: &str,
        snapshot: &RegistrySnapshot,
        config: &AgentConfig,
    ) -> Result<Arc<GrammarSet>, GrammarError> {
        let cell = {
            let mut cache = self.cache.lock().await;
            cache
                .entry(language.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };
        cell.get_or_try_init(|| async {
            let bundle = self.provider.load_bundle(language).await?;
            tracing::debug!(language, "compiling grammar bundle");
            compile(&bundle, vocabulary(snapshot, config)).map(Arc::new)
        })
        .await
        .cloned()
    }

    /// Drop the cache entry for `language`, forcing recompilation on the
    /// next load. Called when the exposed entity/area name set changes.
    pub async fn invalidate(&self, language: &str) {
        self.cache.lock().await.remove(language);
    }
}

fn vocabulary(snapshot: &RegistrySnapshot, config: &AgentConfig) -> HashSet<String> {
    let mut names: HashSet<String> = snapshot
        .entities()
        .iter()
        .filter(|entity| snapshot.should_expose(entity, &config.exposed_domains))
        .map(|entity| normalize_name(&entity.friendly_name))
        .collect();
    for area in snapshot.areas() {
        names.insert(normalize_name(&area.name));
        names.extend(area.aliases.iter().map(|alias| normalize_name(alias)));
    }
    names
}

fn compile(bundle: &GrammarBundle, vocabulary: HashSet<String>) -> Result<GrammarSet, GrammarError> {
    let mut templates = Vec::new();
    for intent in &bundle.intents {
        for data in &intent.data {
            for sentence in &data.sentences {
                templates.push(CompiledTemplate {
                    intent: intent.name.clone(),
                    fixed_slots: data.slots.clone(),
                    branches: compile_sentence(sentence)?,
                });
            }
        }
    }
    Ok(GrammarSet {
        language: bundle.language.clone(),
        templates,
        lists: bundle.lists.clone(),
        vocabulary,
    })
}
