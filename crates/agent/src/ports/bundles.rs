//! Bundle-provider port — per-language grammar bundles.

use std::future::Future;

use crate::grammar::GrammarError;
use crate::grammar::bundle::GrammarBundle;

/// Source of per-language sentence-template bundles.
///
/// Loading may block on IO; the grammar store only calls it once per
/// language (single-flight) and caches the compiled result.
pub trait BundleProvider: Send + Sync {
    /// Load the bundle for a language tag.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnknownLanguage`] when no bundle exists for
    /// `language`, or a parse/IO error for a malformed bundle.
    fn load_bundle(
        &self,
        language: &str,
    ) -> impl Future<Output = Result<GrammarBundle, GrammarError>> + Send;

    /// Language tags this provider can serve.
    fn languages(&self) -> Vec<String>;
}
