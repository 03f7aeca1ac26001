//! Sentence-template grammars: bundle format, template compiler, and the
//! per-language cached store.

pub mod bundle;
pub mod store;
pub mod template;

pub use bundle::{BuiltinBundles, GrammarBundle};
pub use store::{GrammarSet, GrammarStore};

/// Failure while loading or compiling a grammar.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    /// No bundle exists for the requested language tag.
    #[error("no grammar bundle for language {0:?}")]
    UnknownLanguage(String),

    /// The bundle file is not valid TOML.
    #[error("failed to parse grammar bundle")]
    Parse(#[from] toml::de::Error),

    /// A sentence template inside the bundle is malformed.
    #[error("invalid sentence template {sentence:?}: {reason}")]
    Template { sentence: String, reason: String },
}
