//! Intent-handler port — the execution collaborator.
//!
//! The engine recognizes and resolves; *doing* (turning on a light) belongs
//! to the handler behind this port. Handler failures are opaque to the core
//! and are mapped to `HandlerFailed` error responses.

use std::collections::BTreeMap;
use std::future::Future;

use parlor_domain::entity::Entity;
use parlor_domain::response::SlotValue;

/// A fully resolved intent, ready to execute.
#[derive(Debug, Clone)]
pub struct IntentInvocation {
    pub intent_type: String,
    /// Resolved slots, including the concrete area id when one was used.
    pub slots: BTreeMap<String, SlotValue>,
    /// The exposed entities this intent targets, in registry order.
    pub entities: Vec<Entity>,
    pub conversation_id: Option<String>,
}

/// What a handler reports back after executing an intent.
#[derive(Debug, Clone, Default)]
pub struct HandlerResponse {
    /// Speech to say; empty means stay silent.
    pub speech: String,
    pub extra_data: Option<serde_json::Value>,
}

impl HandlerResponse {
    #[must_use]
    pub fn say(speech: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            extra_data: None,
        }
    }
}

/// Executes resolved intents.
pub trait IntentHandler: Send + Sync {
    /// Execute `invocation`.
    ///
    /// # Errors
    ///
    /// Any error is treated as a handler fault and surfaced to the user as a
    /// `HandlerFailed` response; the engine does not inspect it further.
    fn handle(
        &self,
        invocation: IntentInvocation,
    ) -> impl Future<Output = Result<HandlerResponse, anyhow::Error>> + Send;
}
