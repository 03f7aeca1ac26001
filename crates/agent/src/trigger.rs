//! Trigger registry — custom trigger sentences checked before intent
//! matching.
//!
//! Phrase sets register with an opaque async callback and get back an
//! unregister handle. Matching is exact on normalized text (lowercased,
//! trailing punctuation dropped); the callback receives the original text
//! untouched. Registration order only matters when two sets contain the same
//! phrase, in which case the most recent one wins.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use crate::text::normalize;

/// Outcome of a trigger callback; the string becomes the response speech.
pub type TriggerResult = Result<String, anyhow::Error>;

/// Opaque callback invoked with the original utterance text.
pub type TriggerCallback =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = TriggerResult> + Send>> + Send + Sync>;

/// Wrap an async closure into a [`TriggerCallback`].
pub fn callback<F, Fut>(f: F) -> TriggerCallback
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TriggerResult> + Send + 'static,
{
    Arc::new(move |text| Box::pin(f(text)))
}

struct TriggerEntry {
    id: u64,
    phrases: Vec<String>,
    callback: TriggerCallback,
}

/// Registry of trigger-sentence sets.
#[derive(Default)]
pub struct TriggerRegistry {
    entries: Arc<RwLock<Vec<TriggerEntry>>>,
    next_id: AtomicU64,
}

impl TriggerRegistry {
    /// Register a phrase set. Phrases are normalized at registration time.
    pub fn register(
        &self,
        phrases: impl IntoIterator<Item = impl Into<String>>,
        callback: TriggerCallback,
    ) -> TriggerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let entry = TriggerEntry {
            id,
            phrases: phrases.into_iter().map(|phrase| normalize(&phrase.into())).collect(),
            callback,
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
        TriggerHandle {
            id,
            entries: Arc::downgrade(&self.entries),
        }
    }

    /// Find the callback for normalized text, most recent registration
    /// first. The lock is released before the callback runs.
    pub(crate) fn find(&self, normalized: &str) -> Option<TriggerCallback> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .iter()
            .rev()
            .find(|entry| entry.phrases.iter().any(|phrase| phrase == normalized))
            .map(|entry| Arc::clone(&entry.callback))
    }
}

/// Handle returned by [`TriggerRegistry::register`]; removes exactly its own
/// phrase set. Dropping the handle without calling [`unregister`](Self::unregister)
/// leaves the set active.
pub struct TriggerHandle {
    id: u64,
    entries: Weak<RwLock<Vec<TriggerEntry>>>,
}

impl TriggerHandle {
    /// Remove the registered phrase set. Idempotent.
    pub fn unregister(&self) {
        if let Some(entries) = self.entries.upgrade() {
            entries
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|entry| entry.id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cowabunga() -> TriggerCallback {
        callback(|_text| async { Ok("Cowabunga!".to_string()) })
    }

    #[tokio::test]
    async fn should_match_registered_phrase_ignoring_case_and_punctuation() {
        let registry = TriggerRegistry::default();
        let _handle = registry.register(["It's party time", "It is time to party"], cowabunga());

        for text in ["it's party time!", "IT IS TIME TO PARTY."] {
            let found = registry.find(&normalize(text)).expect(text);
            assert_eq!(found(text.to_string()).await.unwrap(), "Cowabunga!");
        }
        assert!(registry.find(&normalize("not the trigger")).is_none());
    }

    #[tokio::test]
    async fn should_prefer_most_recent_registration_for_same_phrase() {
        let registry = TriggerRegistry::default();
        let _old = registry.register(["hello"], callback(|_| async { Ok("old".to_string()) }));
        let newer = registry.register(["hello"], callback(|_| async { Ok("new".to_string()) }));

        let found = registry.find("hello").unwrap();
        assert_eq!(found(String::new()).await.unwrap(), "new");

        // After removing the newer set, the older one is visible again.
        newer.unregister();
        let found = registry.find("hello").unwrap();
        assert_eq!(found(String::new()).await.unwrap(), "old");
    }

    #[test]
    fn should_keep_other_sets_when_one_unregisters() {
        let registry = TriggerRegistry::default();
        let first = registry.register(["alpha"], cowabunga());
        let _second = registry.register(["beta"], cowabunga());

        first.unregister();
        assert!(registry.find("alpha").is_none());
        assert!(registry.find("beta").is_some());
    }

    #[test]
    fn should_treat_double_unregister_as_noop() {
        let registry = TriggerRegistry::default();
        let handle = registry.register(["alpha"], cowabunga());
        handle.unregister();
        handle.unregister();
        assert!(registry.find("alpha").is_none());
    }

    #[tokio::test]
    async fn should_pass_original_text_to_callback() {
        let registry = TriggerRegistry::default();
        let _handle = registry.register(
            ["echo me"],
            callback(|text| async move { Ok(text) }),
        );

        let found = registry.find(&normalize("Echo Me!")).unwrap();
        assert_eq!(found("Echo Me!".to_string()).await.unwrap(), "Echo Me!");
    }
}
