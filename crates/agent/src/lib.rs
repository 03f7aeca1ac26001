//! # parlor-agent
//!
//! The conversation engine — turns freeform text into structured intents and
//! resolves them against a registry snapshot.
//!
//! ## Responsibilities
//! - Define **port traits** the outside world implements (driven ports):
//!   - [`ports::Registry`] — snapshot of entities/areas/devices + exposure
//!   - [`ports::BundleProvider`] — per-language grammar bundles
//!   - [`ports::IntentHandler`] — intent execution collaborator
//! - Compile and cache **sentence templates** per language ([`grammar`])
//! - Match **trigger sentences** registered at runtime ([`trigger`])
//! - Recognize intents ([`recognize`]), resolve their targets ([`resolve`]),
//!   and pick the best match ([`select`])
//! - Orchestrate a conversation turn end to end ([`agent::Agent`])
//!
//! ## Dependency rule
//! Depends on `parlor-domain` only (plus `tokio::sync` for the grammar
//! cache). Never imports adapter crates. Adapters depend on *this* crate,
//! not the reverse.

pub mod agent;
pub mod config;
pub mod grammar;
pub mod ports;
pub mod recognize;
pub mod resolve;
pub mod select;
pub mod trigger;

mod text;

pub use agent::{Agent, ConverseError};
pub use config::AgentConfig;
pub use grammar::GrammarError;
