//! Sentence recognizer — evaluate every compiled template against one
//! utterance and return all matching candidates.
//!
//! The same text can legitimately satisfy multiple intents (a captured name
//! may also be a valid area token), so recognition never stops at the first
//! match; disambiguation belongs to the match selector.

use std::collections::BTreeMap;

use parlor_domain::registry::normalize_name;

use crate::grammar::GrammarSet;
use crate::grammar::template::match_branch;

/// Bonus for a free-text capture that names a known exposed entity or area.
const KNOWN_NAME_BONUS: u32 = 25;
/// Weight of one literal word relative to one matched word.
const LITERAL_WEIGHT: u32 = 10;

/// One grammar match before target resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentCandidate {
    pub intent: String,
    /// Raw slot values: fixed slots from the bundle plus captured text.
    pub slots: BTreeMap<String, String>,
    /// Deterministic ranking input; higher is more specific.
    pub specificity: u32,
    pub(crate) template_index: usize,
}

impl IntentCandidate {
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots.get(name).map(String::as_str)
    }
}

/// Run every template of `grammar` over normalized `text`.
///
/// Candidates come back ordered by descending specificity, ties broken by
/// template position in the bundle, so ranking is stable across calls.
#[must_use]
pub fn recognize(text: &str, grammar: &GrammarSet) -> Vec<IntentCandidate> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let mut candidates: Vec<IntentCandidate> = Vec::new();
    for (template_index, template) in grammar.templates.iter().enumerate() {
        let mut best: Option<IntentCandidate> = None;
        for branch in &template.branches {
            let Some(captured) = match_branch(branch, &words, &grammar.lists) else {
                continue;
            };
            let mut slots = template.fixed_slots.clone();
            slots.extend(captured);

            let word_count = u32::try_from(words.len()).unwrap_or(u32::MAX);
            let literals = u32::try_from(branch.literals).unwrap_or(u32::MAX);
            let mut specificity = literals * LITERAL_WEIGHT + word_count;
            for slot in ["name", "area"] {
                if slots
                    .get(slot)
                    .is_some_and(|value| grammar.vocabulary.contains(&normalize_name(value)))
                {
                    specificity += KNOWN_NAME_BONUS;
                }
            }

            let candidate = IntentCandidate {
                intent: template.intent.clone(),
                slots,
                specificity,
                template_index,
            };
            if best.as_ref().is_none_or(|current| candidate.specificity > current.specificity) {
                best = Some(candidate);
            }
        }
        if let Some(candidate) = best {
            candidates.push(candidate);
        }
    }

    candidates.sort_by(|a, b| {
        b.specificity
            .cmp(&a.specificity)
            .then(a.template_index.cmp(&b.template_index))
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    use parlor_domain::registry::RegistrySnapshot;

    use crate::config::AgentConfig;
    use crate::grammar::GrammarStore;
    use crate::grammar::bundle::BuiltinBundles;

    async fn english() -> std::sync::Arc<GrammarSet> {
        let store = GrammarStore::new(BuiltinBundles);
        let snapshot = RegistrySnapshot::new(vec![], vec![], vec![], HashMap::new());
        store.load("en", &snapshot, &AgentConfig::default()).await.unwrap()
    }

    #[tokio::test]
    async fn should_return_all_matching_candidates() {
        let grammar = english().await;
        let candidates = recognize("turn on the kitchen lights", &grammar);

        // Both the area-scoped light template and the generic name template
        // match this text.
        assert!(candidates.len() >= 2);
        assert!(candidates.iter().any(|c| c.slot("area") == Some("kitchen")));
        assert!(candidates.iter().any(|c| c.slot("name") == Some("kitchen lights")));
    }

    #[tokio::test]
    async fn should_rank_more_literal_template_first() {
        let grammar = english().await;
        let candidates = recognize("turn on lights in the kitchen", &grammar);

        let first = &candidates[0];
        assert_eq!(first.intent, "TurnOn");
        assert_eq!(first.slot("area"), Some("kitchen"));
        assert_eq!(first.slot("domain"), Some("light"));
    }

    #[tokio::test]
    async fn should_return_empty_for_unmatched_text() {
        let grammar = english().await;
        assert!(recognize("open the pod bay doors", &grammar).is_empty());
        assert!(recognize("", &grammar).is_empty());
    }

    #[tokio::test]
    async fn should_capture_list_constrained_state_slot() {
        let grammar = english().await;
        let candidates = recognize("how many lights are on in the kitchen", &grammar);

        let first = &candidates[0];
        assert_eq!(first.intent, "QueryState");
        assert_eq!(first.slot("state"), Some("on"));
        assert_eq!(first.slot("area"), Some("kitchen"));
    }

    #[tokio::test]
    async fn should_be_deterministic_across_calls() {
        let grammar = english().await;
        let first = recognize("turn off the bedroom lights", &grammar);
        let second = recognize("turn off the bedroom lights", &grammar);
        assert_eq!(first, second);
    }

    #[test]
    fn should_boost_candidates_naming_known_vocabulary() {
        let vocabulary: HashSet<String> = HashSet::from(["desk lamp".to_string()]);
        let grammar = GrammarSet {
            language: "en".to_string(),
            templates: vec![crate::grammar::template::CompiledTemplate {
                intent: "TurnOn".to_string(),
                fixed_slots: BTreeMap::new(),
                branches: crate::grammar::template::compile_sentence("turn on {name}").unwrap(),
            }],
            lists: BTreeMap::new(),
            vocabulary,
        };

        let known = recognize("turn on desk lamp", &grammar);
        let unknown = recognize("turn on disco ball", &grammar);
        assert!(known[0].specificity > unknown[0].specificity);
    }
}
