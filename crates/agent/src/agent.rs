//! Conversation orchestrator — the public entry point of the engine.
//!
//! One [`Agent::converse`] call runs the whole pipeline: normalize the text,
//! short-circuit on trigger sentences, take a registry snapshot, load the
//! language grammar (falling back to the default language), recognize
//! candidates, select the best resolved match, and build the response.

use std::collections::BTreeMap;

use parlor_domain::error::RegistryError;
use parlor_domain::response::{
    ErrorCode, IntentOutput, Response, SlotValue, StateSnapshot,
};
use parlor_domain::state::EntityState;
use parlor_domain::utterance::Utterance;

use crate::config::AgentConfig;
use crate::grammar::{GrammarError, GrammarStore};
use crate::ports::{BundleProvider, IntentHandler, IntentInvocation, Registry};
use crate::recognize::recognize;
use crate::select::{Selection, SelectionFailure, select};
use crate::text::normalize;
use crate::trigger::{TriggerCallback, TriggerHandle, TriggerRegistry};

/// Intent answered by the engine itself from the snapshot instead of being
/// dispatched to the handler.
const QUERY_STATE_INTENT: &str = "QueryState";

/// Infrastructure failure during a conversation turn.
///
/// User-facing failures (no match, no targets, unknown language) are *not*
/// errors here: they come back as well-formed [`Response`]s. Only broken
/// collaborators surface as `Err`.
#[derive(Debug, thiserror::Error)]
pub enum ConverseError {
    #[error("registry snapshot failed")]
    Registry(#[from] RegistryError),

    #[error("grammar bundle is broken")]
    Grammar(#[from] GrammarError),

    /// A trigger callback failed; its semantics belong to the registrant,
    /// so it propagates unmapped.
    #[error("trigger callback failed")]
    Trigger(#[source] anyhow::Error),
}

/// The conversation engine, generic over its three ports.
pub struct Agent<R, P, H> {
    registry: R,
    grammar: GrammarStore<P>,
    triggers: TriggerRegistry,
    handler: H,
    config: AgentConfig,
}

impl<R, P, H> Agent<R, P, H>
where
    R: Registry,
    P: BundleProvider,
    H: IntentHandler,
{
    pub fn new(registry: R, provider: P, handler: H, config: AgentConfig) -> Self {
        Self {
            registry,
            grammar: GrammarStore::new(provider),
            triggers: TriggerRegistry::default(),
            handler,
            config,
        }
    }

    /// Language tags the bundle provider can serve.
    #[must_use]
    pub fn supported_languages(&self) -> Vec<String> {
        self.grammar.provider().languages()
    }

    /// Register a custom trigger-sentence set. The returned handle removes
    /// exactly this set; other registrations are unaffected.
    pub fn register_trigger(
        &self,
        phrases: impl IntoIterator<Item = impl Into<String>>,
        callback: TriggerCallback,
    ) -> TriggerHandle {
        self.triggers.register(phrases, callback)
    }

    /// Drop the cached grammar for `language`. Call when the exposed
    /// entity/area name set changes materially.
    pub async fn invalidate_language(&self, language: &str) {
        self.grammar.invalidate(language).await;
    }

    /// Run one conversation turn.
    ///
    /// # Errors
    ///
    /// Returns [`ConverseError`] only for infrastructure failures: a broken
    /// registry, a malformed grammar bundle, or a failing trigger callback.
    /// Everything else produces a well-formed [`Response`].
    #[tracing::instrument(skip(self, utterance), fields(language = ?utterance.language))]
    pub async fn converse(&self, utterance: &Utterance) -> Result<Response, ConverseError> {
        let normalized = normalize(&utterance.text);

        // Trigger sentences win over built-in intents and receive the
        // original, non-normalized text.
        if let Some(callback) = self.triggers.find(&normalized) {
            let speech = callback(utterance.text.clone())
                .await
                .map_err(ConverseError::Trigger)?;
            tracing::debug!("trigger sentence matched");
            return Ok(Response::trigger_done(speech));
        }

        let snapshot = self.registry.snapshot(&self.config.assistant).await?;

        let requested = utterance
            .language
            .as_deref()
            .unwrap_or(&self.config.default_language);
        let grammar = match self.grammar.load(requested, &snapshot, &self.config).await {
            Ok(grammar) => grammar,
            Err(GrammarError::UnknownLanguage(_))
                if requested != self.config.default_language =>
            {
                tracing::warn!(requested, "unknown language, falling back to default");
                match self
                    .grammar
                    .load(&self.config.default_language, &snapshot, &self.config)
                    .await
                {
                    Ok(grammar) => grammar,
                    Err(GrammarError::UnknownLanguage(language)) => {
                        return Ok(unknown_language_response(&language));
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            Err(GrammarError::UnknownLanguage(language)) => {
                return Ok(unknown_language_response(&language));
            }
            Err(err) => return Err(err.into()),
        };

        let candidates = recognize(&normalized, &grammar);
        let selection = match select(candidates, &utterance.context, &snapshot, &self.config) {
            Ok(selection) => selection,
            Err(SelectionFailure::NoIntentMatch) => {
                return Ok(Response::error(
                    ErrorCode::NoIntentMatch,
                    "Sorry, I couldn't understand that",
                ));
            }
            Err(SelectionFailure::NoValidTargets(failure)) => {
                return Ok(Response::error(ErrorCode::NoValidTargets, failure.speech()));
            }
        };

        if selection.candidate.intent == QUERY_STATE_INTENT {
            return Ok(self.answer_query(&selection));
        }
        Ok(self.execute(selection, utterance).await)
    }

    /// Answer a state query from the snapshot; no handler involved.
    fn answer_query(&self, selection: &Selection) -> Response {
        let state_filter = selection.candidate.slot("state").map(EntityState::parse);
        let area_id = selection.target.area.as_ref().map(|area| area.id);

        let matched_states: Vec<StateSnapshot> = selection
            .target
            .entities
            .iter()
            .filter(|entity| {
                state_filter
                    .as_ref()
                    .is_none_or(|wanted| entity.state == *wanted)
            })
            .map(|entity| StateSnapshot::capture(entity, area_id))
            .collect();

        let speech = query_speech(matched_states.len(), selection.candidate.slot("state"));
        Response::query_answer(intent_output(selection), speech, matched_states)
    }

    /// Dispatch a resolved action intent to the handler.
    async fn execute(&self, selection: Selection, utterance: &Utterance) -> Response {
        let output = intent_output(&selection);
        let area_id = selection.target.area.as_ref().map(|area| area.id);
        let matched_states: Vec<StateSnapshot> = selection
            .target
            .entities
            .iter()
            .map(|entity| StateSnapshot::capture(entity, area_id))
            .collect();

        let invocation = IntentInvocation {
            intent_type: selection.candidate.intent.clone(),
            slots: output.slots.clone(),
            entities: selection.target.entities,
            conversation_id: utterance.context.conversation_id.clone(),
        };
        match self.handler.handle(invocation).await {
            Ok(result) => {
                let mut response = Response::action_done(output, result.speech, matched_states);
                if let Some(payload) = response.speech.get_mut("plain") {
                    payload.extra_data = result.extra_data;
                }
                response
            }
            Err(err) => {
                tracing::warn!(intent = %output.intent_type, error = %err, "intent handler failed");
                Response::error(ErrorCode::HandlerFailed, err.to_string())
            }
        }
    }
}

/// Resolved slots for the response: raw captures, with the area slot
/// replaced by the concrete area id it resolved to.
fn intent_output(selection: &Selection) -> IntentOutput {
    let mut slots: BTreeMap<String, SlotValue> = selection
        .candidate
        .slots
        .iter()
        .map(|(name, value)| (name.clone(), SlotValue::text(value.clone())))
        .collect();
    if let Some(area) = &selection.target.area {
        slots.insert("area".to_string(), SlotValue::text(area.id.to_string()));
    }
    IntentOutput {
        intent_type: selection.candidate.intent.clone(),
        slots,
    }
}

fn unknown_language_response(language: &str) -> Response {
    Response::error(
        ErrorCode::UnknownLanguage,
        format!("Language {language} is not supported"),
    )
}

fn query_speech(count: usize, state: Option<&str>) -> String {
    match (count, state) {
        (0, Some(state)) => format!("No devices are {state}"),
        (1, Some(state)) => format!("1 device is {state}"),
        (count, Some(state)) => format!("{count} devices are {state}"),
        (1, None) => "1 device".to_string(),
        (count, None) => format!("{count} devices"),
    }
}
