//! Match selector — pick the best outcome among recognized candidates.
//!
//! Candidates arrive in descending specificity order. The first one whose
//! resolution succeeds wins and lower-ranked candidates are never evaluated.
//! When everything fails, the failure of the most specific grammar match is
//! reported, as it is the most informative one to speak back.

use parlor_domain::registry::RegistrySnapshot;
use parlor_domain::utterance::ConverseContext;

use crate::config::AgentConfig;
use crate::recognize::IntentCandidate;
use crate::resolve::{ResolveFailure, ResolvedTarget, resolve};

/// The winning candidate and its resolved targets.
#[derive(Debug, Clone)]
pub struct Selection {
    pub candidate: IntentCandidate,
    pub target: ResolvedTarget,
}

/// Why no candidate produced targets. The two cases map to distinct error
/// codes on the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionFailure {
    /// The recognizer produced no candidates at all.
    NoIntentMatch,
    /// At least one template matched but every resolution failed; carries
    /// the highest-ranked candidate's failure.
    NoValidTargets(ResolveFailure),
}

/// Resolve candidates in order and pick the first success.
///
/// # Errors
///
/// Returns [`SelectionFailure`] when no candidate resolves.
pub fn select(
    candidates: Vec<IntentCandidate>,
    context: &ConverseContext,
    snapshot: &RegistrySnapshot,
    config: &AgentConfig,
) -> Result<Selection, SelectionFailure> {
    let mut first_failure: Option<ResolveFailure> = None;
    for candidate in candidates {
        match resolve(&candidate, context, snapshot, config) {
            Ok(target) => return Ok(Selection { candidate, target }),
            Err(failure) => {
                if first_failure.is_none() {
                    tracing::debug!(intent = %candidate.intent, ?failure, "best candidate failed to resolve");
                    first_failure = Some(failure);
                }
            }
        }
    }
    match first_failure {
        Some(failure) => Err(SelectionFailure::NoValidTargets(failure)),
        None => Err(SelectionFailure::NoIntentMatch),
    }
}
