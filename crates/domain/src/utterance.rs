//! Utterance — one text input to be matched, plus its invocation context.

use serde::{Deserialize, Serialize};

use crate::id::DeviceId;

/// Where a conversation turn came from.
///
/// A `device_id` identifies the physical device (e.g. a voice satellite) the
/// text arrived through; its area is used to scope commands that name no
/// explicit target ("turn on the lights").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverseContext {
    pub conversation_id: Option<String>,
    pub device_id: Option<DeviceId>,
}

impl ConverseContext {
    /// Context scoped to a calling device.
    #[must_use]
    pub fn from_device(device_id: DeviceId) -> Self {
        Self {
            conversation_id: None,
            device_id: Some(device_id),
        }
    }
}

/// One raw text input. Immutable per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// The original text, preserved for trigger callbacks.
    pub text: String,
    /// BCP-47-ish language tag (e.g. `en`), when the caller knows it.
    pub language: Option<String>,
    pub context: ConverseContext,
}

impl Utterance {
    #[must_use]
    pub fn new(text: impl Into<String>, language: Option<String>, context: ConverseContext) -> Self {
        Self {
            text: text.into(),
            language,
            context,
        }
    }
}
