//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts upward via `#[from]`.
//! The domain crate only knows about validation and registry-access failures;
//! recognition and conversation errors live in the `agent` crate.

/// Top-level domain error.
#[derive(Debug, thiserror::Error)]
pub enum ParlorError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The registry data source could not be read.
    #[error("registry error")]
    Registry(#[from] RegistryError),
}

/// Violation of a domain invariant, raised by builders and `validate()`.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// An entity id must be non-empty and shaped like `domain.object_id`.
    #[error("entity id must look like `domain.object_id`")]
    MalformedEntityId,

    /// A friendly name must be non-empty.
    #[error("name must not be empty")]
    EmptyName,
}

/// Failure while reading the registry data source.
///
/// The conversation core never mutates the registry, so the only failure
/// mode is being unable to take a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The backing store could not be read.
    #[error("registry snapshot failed")]
    Snapshot(#[source] anyhow::Error),
}
