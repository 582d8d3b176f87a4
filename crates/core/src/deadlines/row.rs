//! Per-campaign-action row controller.
//!
//! Reconciles the calculated deadline dates with the ledger's confirmation
//! list to decide which step is current, which affordances to offer, and
//! when to report the row as fully confirmed to the edition page.
//!
//! The controller never performs I/O. Operations that need the ledger
//! return a request value; the caller sends it, and on success feeds the
//! re-fetched confirmation list back through [`RowController::apply_ledger`].

use serde::Serialize;

use super::ledger::{active_entry, can_confirm, ActiveConfirmations, ConfirmationRecord};
use super::schedule::{days_until, DeadlineSchedule, Urgency};
use super::steps::{steps_for, ContentTrack, DeadlineStep, DeadlineType};
use crate::roles::Actor;
use crate::types::{CalendarDate, DbId};

/// Prompt shown when a link-requiring step is submitted with a blank link.
pub const MISSING_LINK_MESSAGE: &str = "Por favor ingresa un link";

/// Confirmation prompt before a revert on an open edition.
pub const REVERT_PROMPT: &str = "¿Estás seguro de revertir esta confirmación?";

/// Confirmation prompt before a revert that reopens a completed edition.
pub const REVERT_REOPENS_EDITION_PROMPT: &str = "⚠️ ATENCIÓN: Al revertir esta confirmación, la revista volverá a estado NO PUBLICADA y se eliminará el link de publicación.\n\n¿Estás seguro de continuar?";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("Por favor ingresa un link")]
    MissingLink,

    #[error("The edition is completed; confirmations are read-only")]
    EditionLocked,

    #[error("All deadlines are already confirmed")]
    NothingToConfirm,

    #[error("Not permitted to confirm '{0}'")]
    NotPermitted(DeadlineType),

    #[error("Not waiting for a link")]
    NotAwaitingLink,

    #[error("Only administrators can revert confirmations")]
    RevertNotPermitted,

    #[error("No active confirmation with id {0}")]
    UnknownConfirmation(DbId),
}

/// Observable state of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RowState {
    /// Showing the current-deadline summary.
    Idle,
    /// The user is typing the link for a link-requiring step.
    AwaitingLinkInput { deadline_type: DeadlineType },
    /// Every step of the track is actively confirmed.
    AllConfirmed,
}

/// What the current step's confirm control should look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmAffordance {
    /// No confirm control.
    Hidden,
    /// A one-click confirm.
    Direct,
    /// A button that opens the link input.
    OpenLinkInput,
    /// The link input is open with submit and cancel controls.
    LinkInput,
}

/// A confirm request ready to be sent to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub campaign_action_id: DbId,
    pub deadline_type: DeadlineType,
    pub link: Option<String>,
}

/// A revert request ready to be sent to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevertRequest {
    pub confirmation_id: DbId,
    /// Prompt the user must accept before the request is sent.
    pub prompt: &'static str,
    /// The revert will reopen the completed edition.
    pub reopens_edition: bool,
}

/// Emitted when a row's all-confirmed flag flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionChange {
    pub campaign_action_id: DbId,
    pub all_confirmed: bool,
}

/// The current step with its countdown, for the row summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentDeadline {
    pub step: DeadlineStep,
    pub date: Option<CalendarDate>,
    pub days_remaining: i64,
    pub urgency: Urgency,
    pub confirmed: bool,
}

/// UI state machine for one campaign action inside an edition.
#[derive(Debug, Clone)]
pub struct RowController {
    campaign_action_id: DbId,
    track: ContentTrack,
    edition_completed: bool,
    confirmations: Vec<ConfirmationRecord>,
    active: ActiveConfirmations,
    awaiting_link: Option<DeadlineType>,
    link_input: String,
    /// Last value reported upward; the parent starts with nothing completed.
    reported_complete: bool,
}

impl RowController {
    pub fn new(campaign_action_id: DbId, track: ContentTrack, edition_completed: bool) -> Self {
        Self {
            campaign_action_id,
            track,
            edition_completed,
            confirmations: Vec::new(),
            active: ActiveConfirmations::default(),
            awaiting_link: None,
            link_input: String::new(),
            reported_complete: false,
        }
    }

    pub fn campaign_action_id(&self) -> DbId {
        self.campaign_action_id
    }

    pub fn track(&self) -> ContentTrack {
        self.track
    }

    pub fn confirmations(&self) -> &[ConfirmationRecord] {
        &self.confirmations
    }

    pub fn link_input(&self) -> &str {
        &self.link_input
    }

    pub fn is_edition_completed(&self) -> bool {
        self.edition_completed
    }

    /// Update the edition lock after the parent page reloads the edition.
    pub fn set_edition_completed(&mut self, completed: bool) {
        self.edition_completed = completed;
        if completed {
            self.awaiting_link = None;
            self.link_input.clear();
        }
    }

    pub fn state(&self) -> RowState {
        if self.all_confirmed() {
            RowState::AllConfirmed
        } else if let Some(deadline_type) = self.awaiting_link {
            RowState::AwaitingLinkInput { deadline_type }
        } else {
            RowState::Idle
        }
    }

    pub fn all_confirmed(&self) -> bool {
        self.active.all_confirmed(self.track)
    }

    pub fn is_confirmed(&self, deadline_type: DeadlineType) -> bool {
        self.active.is_confirmed(deadline_type)
    }

    pub fn current_step(&self) -> &'static DeadlineStep {
        self.active.current_step(self.track)
    }

    /// Replace the confirmation list with a fresh ledger read.
    ///
    /// Returns a [`CompletionChange`] only when the all-confirmed flag differs
    /// from what was last reported.
    pub fn apply_ledger(&mut self, confirmations: Vec<ConfirmationRecord>) -> Option<CompletionChange> {
        self.active = ActiveConfirmations::from_entries(&confirmations);
        self.confirmations = confirmations;

        if let Some(awaiting) = self.awaiting_link {
            if self.current_step().deadline_type != awaiting || self.all_confirmed() {
                self.awaiting_link = None;
                self.link_input.clear();
            }
        }

        let all_confirmed = self.all_confirmed();
        if all_confirmed == self.reported_complete {
            return None;
        }
        self.reported_complete = all_confirmed;
        Some(CompletionChange {
            campaign_action_id: self.campaign_action_id,
            all_confirmed,
        })
    }

    /// The current step with its date and countdown relative to `today`.
    pub fn current_deadline(&self, schedule: &DeadlineSchedule, today: CalendarDate) -> CurrentDeadline {
        let step = *self.current_step();
        let date = schedule.for_track(self.track).date(step.date_key);
        let days_remaining = date.map_or(0, |d| days_until(d, today));
        CurrentDeadline {
            step,
            date,
            days_remaining,
            urgency: Urgency::from_days(days_remaining),
            confirmed: self.is_confirmed(step.deadline_type),
        }
    }

    /// Which confirm control to render for the current step.
    pub fn confirm_affordance(&self, actor: &Actor) -> ConfirmAffordance {
        if self.edition_completed || self.all_confirmed() {
            return ConfirmAffordance::Hidden;
        }
        let step = self.current_step();
        if self.awaiting_link == Some(step.deadline_type) {
            return ConfirmAffordance::LinkInput;
        }
        if !can_confirm(actor, step, &self.active) {
            return ConfirmAffordance::Hidden;
        }
        if step.requires_link {
            ConfirmAffordance::OpenLinkInput
        } else {
            ConfirmAffordance::Direct
        }
    }

    /// The user activates "confirm" on the current step.
    ///
    /// Link-requiring steps move the row to [`RowState::AwaitingLinkInput`]
    /// and return `None`; other steps return the request to send.
    pub fn begin_confirm(&mut self, actor: &Actor) -> Result<Option<ConfirmRequest>, RowError> {
        if self.edition_completed {
            return Err(RowError::EditionLocked);
        }
        if self.all_confirmed() {
            return Err(RowError::NothingToConfirm);
        }
        let step = self.current_step();
        if !can_confirm(actor, step, &self.active) {
            return Err(RowError::NotPermitted(step.deadline_type));
        }
        if step.requires_link {
            self.awaiting_link = Some(step.deadline_type);
            return Ok(None);
        }
        Ok(Some(ConfirmRequest {
            campaign_action_id: self.campaign_action_id,
            deadline_type: step.deadline_type,
            link: None,
        }))
    }

    pub fn set_link_input(&mut self, value: impl Into<String>) {
        self.link_input = value.into();
    }

    /// Leave the link input without sending anything.
    pub fn cancel_link(&mut self) {
        self.awaiting_link = None;
        self.link_input.clear();
    }

    /// Submit the typed link for the awaited step.
    ///
    /// A blank input short-circuits with [`RowError::MissingLink`] and leaves
    /// the row awaiting input. The link is sent exactly as typed.
    pub fn submit_link(&self) -> Result<ConfirmRequest, RowError> {
        if self.edition_completed {
            return Err(RowError::EditionLocked);
        }
        let deadline_type = self.awaiting_link.ok_or(RowError::NotAwaitingLink)?;
        if self.link_input.trim().is_empty() {
            return Err(RowError::MissingLink);
        }
        Ok(ConfirmRequest {
            campaign_action_id: self.campaign_action_id,
            deadline_type,
            link: Some(self.link_input.clone()),
        })
    }

    /// Clear transient input after the ledger accepted a confirmation.
    pub fn confirm_accepted(&mut self) {
        self.awaiting_link = None;
        self.link_input.clear();
    }

    /// Whether `actor` sees revert controls in the history panel.
    pub fn can_revert(&self, actor: &Actor) -> bool {
        actor.can_revert_confirmation()
    }

    /// Build a revert request for an active confirmation from the history.
    pub fn begin_revert(&self, actor: &Actor, confirmation_id: DbId) -> Result<RevertRequest, RowError> {
        if !self.can_revert(actor) {
            return Err(RowError::RevertNotPermitted);
        }
        let exists = self
            .confirmations
            .iter()
            .any(|c| c.id == confirmation_id && !c.reverted);
        if !exists {
            return Err(RowError::UnknownConfirmation(confirmation_id));
        }
        let (prompt, reopens_edition) = if self.edition_completed {
            (REVERT_REOPENS_EDITION_PROMPT, true)
        } else {
            (REVERT_PROMPT, false)
        };
        Ok(RevertRequest {
            confirmation_id,
            prompt,
            reopens_edition,
        })
    }

    /// Active confirmations in step order, for the history panel.
    pub fn history(&self) -> Vec<(&'static DeadlineStep, &ConfirmationRecord)> {
        steps_for(self.track)
            .iter()
            .filter_map(|step| {
                active_entry(&self.confirmations, step.deadline_type).map(|c| (step, c))
            })
            .collect()
    }
}
