//! Edition completion gate.
//!
//! The client side tracks which rows report all-confirmed and guards the
//! irreversible request behind a typed phrase. The server side re-checks
//! the ledger for every tracked action before completing.

use std::collections::HashSet;

use super::ledger::ActiveConfirmations;
use super::row::CompletionChange;
use super::steps::ContentTrack;
use crate::error::CoreError;
use crate::roles::Actor;
use crate::types::DbId;

/// Phrase the user must type before an edition is completed.
pub const COMPLETION_PHRASE: &str = "COMPLETAR";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("Debes escribir \"COMPLETAR\" para confirmar")]
    PhraseMismatch,

    #[error("El link de publicación es requerido")]
    MissingPublicationLink,
}

/// Set of campaign actions currently reporting all-confirmed.
#[derive(Debug, Clone, Default)]
pub struct CompletionTracker {
    completed: HashSet<DbId>,
}

impl CompletionTracker {
    pub fn apply(&mut self, change: CompletionChange) {
        if change.all_confirmed {
            self.completed.insert(change.campaign_action_id);
        } else {
            self.completed.remove(&change.campaign_action_id);
        }
    }

    pub fn is_complete(&self, campaign_action_id: DbId) -> bool {
        self.completed.contains(&campaign_action_id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Forget an action that left the edition (e.g. it was moved).
    pub fn remove(&mut self, campaign_action_id: DbId) {
        self.completed.remove(&campaign_action_id);
    }
}

/// Whether the "Complete edition" control is offered.
///
/// `tracked_action_ids` is the edition's current set of tracked actions.
/// Ids the tracker still holds for actions that left the edition do not count.
pub fn can_offer_completion(
    edition_completed: bool,
    tracked_action_ids: &[DbId],
    tracker: &CompletionTracker,
    actor: &Actor,
) -> bool {
    !edition_completed
        && !tracked_action_ids.is_empty()
        && tracked_action_ids.iter().all(|id| tracker.is_complete(*id))
        && actor.can_complete_edition()
}

/// Body of `PUT /magazines/{id}/complete`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompleteEditionRequest {
    pub publication_link: String,
}

/// Check the typed phrase and link before sending the completion request.
pub fn prepare_completion(phrase: &str, publication_link: &str) -> Result<CompleteEditionRequest, GateError> {
    if phrase != COMPLETION_PHRASE {
        return Err(GateError::PhraseMismatch);
    }
    if publication_link.trim().is_empty() {
        return Err(GateError::MissingPublicationLink);
    }
    Ok(CompleteEditionRequest {
        publication_link: publication_link.to_string(),
    })
}

/// Server-side check that an edition can be completed.
///
/// `actions` holds each tracked campaign action with its active
/// confirmations. At least one action is required.
pub fn ensure_completable<'a>(
    actions: impl IntoIterator<Item = (DbId, ContentTrack, &'a ActiveConfirmations)>,
) -> Result<(), CoreError> {
    let mut total = 0usize;
    let mut incomplete = Vec::new();
    for (id, track, active) in actions {
        total += 1;
        if !active.all_confirmed(track) {
            incomplete.push(id);
        }
    }
    if total == 0 {
        return Err(CoreError::Conflict(
            "The edition has no campaign actions with deadlines to confirm".to_string(),
        ));
    }
    if !incomplete.is_empty() {
        let ids: Vec<String> = incomplete.iter().map(ToString::to_string).collect();
        return Err(CoreError::Conflict(format!(
            "Campaign actions with pending deadlines: {}",
            ids.join(", ")
        )));
    }
    Ok(())
}
