//! Reconciliation of ledger entries with a track's step template.
//!
//! The ledger itself is server-owned. This module only answers questions
//! about a list of entries: which steps are actively confirmed, which step
//! is current, and whether a new confirmation is admissible.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::steps::{find_step, steps_for, ContentTrack, DeadlineStep, DeadlineType};
use crate::error::CoreError;
use crate::roles::Actor;
use crate::types::{DbId, Timestamp};

/// Anything that looks like a row of the confirmation ledger.
///
/// Implemented by the wire record below and by the database row model, so
/// the same reconciliation rules apply on both sides of the API.
pub trait LedgerEntry {
    /// The raw `deadline_type` column. Unknown values are ignored.
    fn deadline_type(&self) -> &str;
    fn is_reverted(&self) -> bool;
}

/// A confirmation record as returned by the ledger endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationRecord {
    pub id: DbId,
    pub campaign_action_id: DbId,
    pub deadline_type: String,
    pub confirmed_by: DbId,
    pub confirmed_by_name: String,
    pub confirmed_by_email: String,
    pub confirmed_at: Timestamp,
    pub link: Option<String>,
    pub reverted: bool,
    pub reverted_at: Option<Timestamp>,
    pub reverted_by: Option<DbId>,
    pub reverted_by_name: Option<String>,
}

impl LedgerEntry for ConfirmationRecord {
    fn deadline_type(&self) -> &str {
        &self.deadline_type
    }

    fn is_reverted(&self) -> bool {
        self.reverted
    }
}

/// The first non-reverted entry for a step, if any.
pub fn active_entry<E: LedgerEntry>(entries: &[E], deadline_type: DeadlineType) -> Option<&E> {
    entries
        .iter()
        .find(|e| !e.is_reverted() && e.deadline_type() == deadline_type.as_str())
}

/// The set of steps holding an active (non-reverted) confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveConfirmations {
    confirmed: HashSet<DeadlineType>,
}

impl ActiveConfirmations {
    pub fn from_entries<E: LedgerEntry>(entries: &[E]) -> Self {
        let confirmed = entries
            .iter()
            .filter(|e| !e.is_reverted())
            .filter_map(|e| e.deadline_type().parse::<DeadlineType>().ok())
            .collect();
        Self { confirmed }
    }

    pub fn from_types(types: impl IntoIterator<Item = DeadlineType>) -> Self {
        Self {
            confirmed: types.into_iter().collect(),
        }
    }

    pub fn is_confirmed(&self, deadline_type: DeadlineType) -> bool {
        self.confirmed.contains(&deadline_type)
    }

    /// The first step of the track without an active confirmation, or the
    /// last step when every step is confirmed.
    pub fn current_step(&self, track: ContentTrack) -> &'static DeadlineStep {
        let steps = steps_for(track);
        steps
            .iter()
            .find(|step| !self.is_confirmed(step.deadline_type))
            .unwrap_or(&steps[steps.len() - 1])
    }

    pub fn all_confirmed(&self, track: ContentTrack) -> bool {
        steps_for(track)
            .iter()
            .all(|step| self.is_confirmed(step.deadline_type))
    }

    /// Steps of the track still lacking an active confirmation, in order.
    pub fn pending(&self, track: ContentTrack) -> Vec<DeadlineType> {
        steps_for(track)
            .iter()
            .map(|step| step.deadline_type)
            .filter(|t| !self.is_confirmed(*t))
            .collect()
    }

    fn unmet_dependency(&self, step: &DeadlineStep) -> Option<DeadlineType> {
        step.depends_on.filter(|dep| !self.is_confirmed(*dep))
    }
}

/// Check whether `actor` may confirm `step` given the active set.
///
/// A declared dependency must be confirmed first, for every actor. After
/// that, administrators may confirm anything; other users need the step's
/// responsible role, and steps without one are administrator-only.
pub fn authorize_confirm(
    actor: &Actor,
    step: &DeadlineStep,
    active: &ActiveConfirmations,
) -> Result<(), CoreError> {
    if let Some(dep) = active.unmet_dependency(step) {
        return Err(CoreError::Validation(format!(
            "Deadline '{}' requires '{dep}' to be confirmed first",
            step.deadline_type
        )));
    }
    if actor.is_admin() {
        return Ok(());
    }
    match step.responsible {
        Some(responsible) if actor.has_role(responsible.role_name()) => Ok(()),
        Some(responsible) => Err(CoreError::Forbidden(format!(
            "Only '{}' users can confirm '{}'",
            responsible.role_name(),
            step.deadline_type
        ))),
        None => Err(CoreError::Forbidden(format!(
            "Only administrators can confirm '{}'",
            step.deadline_type
        ))),
    }
}

/// Boolean form of [`authorize_confirm`] for deciding which affordances to show.
pub fn can_confirm(actor: &Actor, step: &DeadlineStep, active: &ActiveConfirmations) -> bool {
    authorize_confirm(actor, step, active).is_ok()
}

/// Validate a confirm request against the track and the current ledger.
///
/// Authorization is checked separately by [`authorize_confirm`].
pub fn validate_confirmation(
    track: ContentTrack,
    deadline_type: DeadlineType,
    link: Option<&str>,
    active: &ActiveConfirmations,
) -> Result<&'static DeadlineStep, CoreError> {
    let step = find_step(track, deadline_type).ok_or_else(|| {
        CoreError::Validation(format!(
            "Deadline '{deadline_type}' does not apply to {} content",
            track.as_str()
        ))
    })?;

    if active.is_confirmed(deadline_type) {
        return Err(CoreError::Conflict(format!(
            "Deadline '{deadline_type}' is already confirmed"
        )));
    }

    if step.requires_link && link.map_or(true, |l| l.trim().is_empty()) {
        return Err(CoreError::Validation(format!(
            "A link is required to confirm '{deadline_type}'"
        )));
    }

    Ok(step)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::roles::{ROLE_ADMIN, ROLE_ANALISTA, ROLE_COMERCIAL, ROLE_POST_VENTA};

    struct Entry(&'static str, bool);

    impl LedgerEntry for Entry {
        fn deadline_type(&self) -> &str {
            self.0
        }
        fn is_reverted(&self) -> bool {
            self.1
        }
    }

    fn active(types: &[DeadlineType]) -> ActiveConfirmations {
        ActiveConfirmations::from_types(types.iter().copied())
    }

    #[test]
    fn reverted_entries_are_not_active() {
        let entries = [Entry("client", true), Entry("send_to_edition", false)];
        let set = ActiveConfirmations::from_entries(&entries);
        assert!(!set.is_confirmed(DeadlineType::Client));
        assert!(set.is_confirmed(DeadlineType::SendToEdition));
    }

    #[test]
    fn unknown_deadline_types_are_ignored() {
        let entries = [Entry("book_assembly", false)];
        let set = ActiveConfirmations::from_entries(&entries);
        assert_eq!(set, ActiveConfirmations::default());
    }

    #[test]
    fn active_entry_skips_reverted_history() {
        let entries = [Entry("client", true), Entry("client", false)];
        let found = active_entry(&entries, DeadlineType::Client).unwrap();
        assert!(!found.is_reverted());
        assert!(active_entry(&entries, DeadlineType::Edition).is_none());
    }

    #[test]
    fn current_step_is_first_unconfirmed() {
        let set = active(&[DeadlineType::Client]);
        assert_eq!(
            set.current_step(ContentTrack::Technical).deadline_type,
            DeadlineType::SendToEdition
        );
    }

    #[test]
    fn current_step_follows_definition_order_not_confirmation_order() {
        // A later step confirmed out of order does not skip an earlier gap.
        let set = active(&[DeadlineType::Edition]);
        assert_eq!(
            set.current_step(ContentTrack::Technical).deadline_type,
            DeadlineType::Client
        );
    }

    #[test]
    fn current_step_is_last_when_all_confirmed() {
        let set = active(&[DeadlineType::Client, DeadlineType::ClientPostSale]);
        assert!(set.all_confirmed(ContentTrack::Ad));
        assert_eq!(
            set.current_step(ContentTrack::Ad).deadline_type,
            DeadlineType::ClientPostSale
        );
        // Idempotent without ledger changes.
        assert_eq!(set.current_step(ContentTrack::Ad), set.current_step(ContentTrack::Ad));
    }

    #[test]
    fn all_confirmed_flips_on_last_step() {
        let steps: Vec<_> = steps_for(ContentTrack::Technical)
            .iter()
            .map(|s| s.deadline_type)
            .collect();
        let (last, rest) = steps.split_last().unwrap();
        let mut set = active(rest);
        assert!(!set.all_confirmed(ContentTrack::Technical));
        assert_eq!(set.pending(ContentTrack::Technical), vec![*last]);
        set = active(&steps);
        assert!(set.all_confirmed(ContentTrack::Technical));
        assert!(set.pending(ContentTrack::Technical).is_empty());
    }

    #[test]
    fn dependency_blocks_even_eligible_role() {
        let step = find_step(ContentTrack::Ad, DeadlineType::ClientPostSale).unwrap();
        let post_venta = Actor::new(7, [ROLE_POST_VENTA]);
        let admin = Actor::new(1, [ROLE_ADMIN]);
        let empty = ActiveConfirmations::default();
        assert_matches!(
            authorize_confirm(&post_venta, step, &empty),
            Err(CoreError::Validation(_))
        );
        assert!(!can_confirm(&admin, step, &empty));

        let with_client = active(&[DeadlineType::Client]);
        assert!(can_confirm(&post_venta, step, &with_client));
        assert!(can_confirm(&admin, step, &with_client));
    }

    #[test]
    fn responsible_role_is_required_for_non_admins() {
        let step = find_step(ContentTrack::Technical, DeadlineType::SendToEdition).unwrap();
        let comercial = Actor::new(2, [ROLE_COMERCIAL]);
        let analista = Actor::new(3, [ROLE_ANALISTA]);
        let empty = ActiveConfirmations::default();
        assert_matches!(
            authorize_confirm(&comercial, step, &empty),
            Err(CoreError::Forbidden(_))
        );
        assert!(!can_confirm(&analista, step, &empty));
        assert!(can_confirm(&Actor::new(4, [ROLE_POST_VENTA]), step, &empty));
    }

    #[test]
    fn step_without_responsible_is_admin_only() {
        let step = DeadlineStep {
            responsible: None,
            ..*find_step(ContentTrack::Technical, DeadlineType::Edition).unwrap()
        };
        let empty = ActiveConfirmations::default();
        assert!(!can_confirm(&Actor::new(2, [ROLE_POST_VENTA]), &step, &empty));
        assert!(can_confirm(&Actor::new(1, [ROLE_ADMIN]), &step, &empty));
    }

    #[test]
    fn validation_rejects_foreign_step() {
        let result = validate_confirmation(
            ContentTrack::Ad,
            DeadlineType::SendToEdition,
            Some("https://x"),
            &ActiveConfirmations::default(),
        );
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn validation_requires_non_blank_link() {
        let empty = ActiveConfirmations::default();
        for link in [None, Some(""), Some("   ")] {
            assert_matches!(
                validate_confirmation(ContentTrack::Technical, DeadlineType::SendToEdition, link, &empty),
                Err(CoreError::Validation(msg)) if msg.contains("link")
            );
        }
        assert!(validate_confirmation(
            ContentTrack::Technical,
            DeadlineType::SendToEdition,
            Some("https://drive.example/article.docx"),
            &empty,
        )
        .is_ok());
    }

    #[test]
    fn validation_rejects_second_active_confirmation() {
        let set = active(&[DeadlineType::Client]);
        assert_matches!(
            validate_confirmation(ContentTrack::Technical, DeadlineType::Client, None, &set),
            Err(CoreError::Conflict(_))
        );
    }
}
