//! Response — the structured result of one conversation turn.
//!
//! Shapes mirror what a voice frontend consumes: a response type, an error
//! code on failure, speech variants keyed by format (only `"plain"` today),
//! the matched intent with its resolved slots, and entity state snapshots
//! for query answers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::AreaId;
use crate::state::EntityState;

/// Kind of outcome a turn produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    ActionDone,
    QueryAnswer,
    Error,
}

/// Typed failure kinds surfaced on `Error` responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No sentence template matched the text at all.
    NoIntentMatch,
    /// A template matched but no qualifying, exposed entity was found.
    NoValidTargets,
    /// No grammar bundle exists for the requested language.
    UnknownLanguage,
    /// An intent-execution collaborator failed after successful resolution.
    HandlerFailed,
}

/// One rendered speech variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechPayload {
    pub speech: String,
    pub extra_data: Option<serde_json::Value>,
}

/// A resolved slot value on the matched intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotValue {
    pub value: serde_json::Value,
}

impl SlotValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: serde_json::Value::String(value.into()),
        }
    }
}

/// The matched intent and its resolved slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentOutput {
    pub intent_type: String,
    pub slots: BTreeMap<String, SlotValue>,
}

/// Point-in-time view of one matched entity, carried on query answers and
/// action confirmations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub entity_id: String,
    pub friendly_name: String,
    pub state: EntityState,
    pub area_id: Option<AreaId>,
}

impl StateSnapshot {
    /// Capture an entity, tagging it with the area it resolved through.
    #[must_use]
    pub fn capture(entity: &Entity, area_id: Option<AreaId>) -> Self {
        Self {
            entity_id: entity.entity_id.clone(),
            friendly_name: entity.friendly_name.clone(),
            state: entity.state.clone(),
            area_id: area_id.or(entity.area_id),
        }
    }
}

/// The structured result of one conversation turn.
///
/// Every turn gets a well-formed response; recognition and resolution
/// failures are encoded as [`ResponseType::Error`] with an [`ErrorCode`],
/// never as a missing response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub response_type: ResponseType,
    pub error_code: Option<ErrorCode>,
    /// Speech keyed by format. Only `"plain"` is produced today.
    pub speech: BTreeMap<String, SpeechPayload>,
    pub intent: Option<IntentOutput>,
    pub matched_states: Vec<StateSnapshot>,
}

impl Response {
    /// A successful action confirmation. Empty speech stays absent rather
    /// than being rendered as an empty string.
    #[must_use]
    pub fn action_done(
        intent: IntentOutput,
        speech: String,
        matched_states: Vec<StateSnapshot>,
    ) -> Self {
        Self {
            response_type: ResponseType::ActionDone,
            error_code: None,
            speech: plain_speech_map(speech),
            intent: Some(intent),
            matched_states,
        }
    }

    /// A short-circuit trigger response: no intent, just speech.
    #[must_use]
    pub fn trigger_done(speech: String) -> Self {
        Self {
            response_type: ResponseType::ActionDone,
            error_code: None,
            speech: plain_speech_map(speech),
            intent: None,
            matched_states: Vec::new(),
        }
    }

    /// A query answer carrying the matched entity states.
    #[must_use]
    pub fn query_answer(
        intent: IntentOutput,
        speech: String,
        matched_states: Vec<StateSnapshot>,
    ) -> Self {
        Self {
            response_type: ResponseType::QueryAnswer,
            error_code: None,
            speech: plain_speech_map(speech),
            intent: Some(intent),
            matched_states,
        }
    }

    /// A typed error with localized speech.
    #[must_use]
    pub fn error(code: ErrorCode, speech: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            error_code: Some(code),
            speech: plain_speech_map(speech.into()),
            intent: None,
            matched_states: Vec::new(),
        }
    }

    /// The `"plain"` speech text, when present.
    #[must_use]
    pub fn plain_speech(&self) -> Option<&str> {
        self.speech.get("plain").map(|payload| payload.speech.as_str())
    }
}

fn plain_speech_map(speech: String) -> BTreeMap<String, SpeechPayload> {
    if speech.is_empty() {
        return BTreeMap::new();
    }
    BTreeMap::from([(
        "plain".to_string(),
        SpeechPayload {
            speech,
            extra_data: None,
        },
    )])
}
