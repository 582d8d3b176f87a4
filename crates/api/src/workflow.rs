//! Transactional deadline workflow operations.
//!
//! Each operation runs in one transaction and locks the rows its checks
//! depend on before reading them. Lock order is always action or
//! confirmation first, then edition.
//!
//! [`PgDeadlineLedger`] exposes the confirm/revert/list operations through
//! the [`DeadlineLedger`] seam so a [`pressdesk_core::deadlines::session::RowSession`]
//! can run directly against the database.

use std::collections::HashMap;

use async_trait::async_trait;
use pressdesk_core::deadlines::gate::ensure_completable;
use pressdesk_core::deadlines::ledger::{
    authorize_confirm, validate_confirmation, ActiveConfirmations, ConfirmationRecord,
};
use pressdesk_core::deadlines::row::ConfirmRequest;
use pressdesk_core::deadlines::session::DeadlineLedger;
use pressdesk_core::deadlines::steps::{ContentTrack, DeadlineType};
use pressdesk_core::edition::{validate_publication_link, REOPENED_STATUS};
use pressdesk_core::error::CoreError;
use pressdesk_core::roles::Actor;
use pressdesk_core::types::DbId;
use pressdesk_db::models::deadline_confirmation::{
    CreateDeadlineConfirmation, DeadlineConfirmation,
};
use pressdesk_db::repositories::{
    CampaignActionRepo, DeadlineConfirmationRepo, MagazineEditionRepo,
};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Result of a successful revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevertOutcome {
    pub campaign_action_id: DbId,
    pub edition_id: Option<DbId>,
    /// The owning edition was completed and has been reopened.
    pub edition_reopened: bool,
}

fn action_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "CampaignAction",
        id,
    })
}

fn edition_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "MagazineEdition",
        id,
    })
}

/// Confirm one deadline step of a campaign action.
///
/// Returns the action's full confirmation list after the insert.
pub async fn confirm_deadline(
    pool: &PgPool,
    actor: &Actor,
    campaign_action_id: DbId,
    deadline_type: &str,
    link: Option<&str>,
) -> AppResult<Vec<DeadlineConfirmation>> {
    let mut tx = pool.begin().await?;

    let action = CampaignActionRepo::lock(&mut tx, campaign_action_id)
        .await?
        .ok_or_else(|| action_not_found(campaign_action_id))?;

    if action.edition_id.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "The campaign action is not assigned to an edition".to_string(),
        )));
    }
    let track = action.track().ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "The campaign action has no magazine content type".to_string(),
        ))
    })?;
    if action.edition_completed == Some(true) {
        return Err(AppError::Core(CoreError::Conflict(
            "The edition is completed; confirmations are locked".to_string(),
        )));
    }

    let deadline_type: DeadlineType = deadline_type
        .parse()
        .map_err(|e: String| AppError::Core(CoreError::Validation(e)))?;

    let existing = DeadlineConfirmationRepo::list_for_action_tx(&mut tx, campaign_action_id).await?;
    let active = ActiveConfirmations::from_entries(&existing);
    let step = validate_confirmation(track, deadline_type, link, &active)?;
    authorize_confirm(actor, step, &active)?;

    let link = link.filter(|l| !l.trim().is_empty());
    let id = DeadlineConfirmationRepo::create(
        &mut tx,
        &CreateDeadlineConfirmation {
            campaign_action_id,
            deadline_type: deadline_type.as_str().to_string(),
            confirmed_by: actor.user_id,
            link: link.map(str::to_string),
        },
    )
    .await?;

    let confirmations =
        DeadlineConfirmationRepo::list_for_action_tx(&mut tx, campaign_action_id).await?;
    tx.commit().await?;

    tracing::info!(
        confirmation_id = id,
        campaign_action_id,
        deadline_type = %deadline_type,
        user_id = actor.user_id,
        "Deadline confirmed",
    );

    Ok(confirmations)
}

/// Revert a confirmation. Reopens the owning edition when it was completed.
pub async fn revert_confirmation(
    pool: &PgPool,
    actor: &Actor,
    confirmation_id: DbId,
) -> AppResult<RevertOutcome> {
    if !actor.can_revert_confirmation() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only administrators can revert confirmations".to_string(),
        )));
    }

    let mut tx = pool.begin().await?;

    let target = DeadlineConfirmationRepo::lock_for_revert(&mut tx, confirmation_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DeadlineConfirmation",
            id: confirmation_id,
        }))?;

    let already_reverted = || {
        AppError::Core(CoreError::Conflict(
            "The confirmation is already reverted".to_string(),
        ))
    };
    if target.reverted {
        return Err(already_reverted());
    }
    if !DeadlineConfirmationRepo::mark_reverted(&mut tx, target.id, actor.user_id).await? {
        return Err(already_reverted());
    }

    let mut edition_reopened = false;
    if let Some(edition_id) = target.edition_id {
        let edition = MagazineEditionRepo::lock(&mut tx, edition_id).await?;
        if edition.is_some_and(|e| e.is_completed) {
            MagazineEditionRepo::reopen(&mut tx, edition_id, REOPENED_STATUS).await?;
            edition_reopened = true;
        }
    }

    tx.commit().await?;

    tracing::info!(
        confirmation_id,
        campaign_action_id = target.campaign_action_id,
        deadline_type = %target.deadline_type,
        edition_id = ?target.edition_id,
        edition_reopened,
        user_id = actor.user_id,
        "Deadline confirmation reverted",
    );

    Ok(RevertOutcome {
        campaign_action_id: target.campaign_action_id,
        edition_id: target.edition_id,
        edition_reopened,
    })
}

/// Complete an edition once every tracked action has all steps confirmed.
///
/// Returns the stored publication link.
pub async fn complete_edition(
    pool: &PgPool,
    actor: &Actor,
    edition_id: DbId,
    publication_link: &str,
) -> AppResult<String> {
    if !actor.can_complete_edition() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only administrators and post-venta users can complete an edition".to_string(),
        )));
    }
    validate_publication_link(publication_link)
        .map_err(|e| AppError::Core(CoreError::Validation(e)))?;

    let mut tx = pool.begin().await?;

    let edition = MagazineEditionRepo::lock(&mut tx, edition_id)
        .await?
        .ok_or_else(|| edition_not_found(edition_id))?;
    if edition.is_completed {
        return Err(AppError::Core(CoreError::Conflict(
            "The edition is already completed".to_string(),
        )));
    }

    let actions = CampaignActionRepo::list_for_edition_tx(&mut tx, edition_id).await?;
    let mut active: HashMap<DbId, Vec<DeadlineType>> = HashMap::new();
    for step in DeadlineConfirmationRepo::active_for_edition(&mut tx, edition_id).await? {
        if let Ok(deadline_type) = step.deadline_type.parse::<DeadlineType>() {
            active.entry(step.campaign_action_id).or_default().push(deadline_type);
        }
    }

    let tracked: Vec<(DbId, ContentTrack, ActiveConfirmations)> = actions
        .iter()
        .filter_map(|a| {
            let track = a.track()?;
            let confirmed = active.remove(&a.campaign_action_id).unwrap_or_default();
            Some((
                a.campaign_action_id,
                track,
                ActiveConfirmations::from_types(confirmed),
            ))
        })
        .collect();
    ensure_completable(tracked.iter().map(|(id, track, set)| (*id, *track, set)))?;

    MagazineEditionRepo::complete(&mut tx, edition_id, publication_link).await?;
    tx.commit().await?;

    tracing::info!(
        edition_id,
        tracked_actions = tracked.len(),
        user_id = actor.user_id,
        "Magazine edition completed",
    );

    Ok(publication_link.to_string())
}

/// Move a campaign action to another edition, keeping its ledger history.
pub async fn move_action(
    pool: &PgPool,
    actor: &Actor,
    campaign_action_id: DbId,
    target_edition_id: DbId,
) -> AppResult<()> {
    if !actor.can_move_action() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only administrators and comercial users can move campaign actions".to_string(),
        )));
    }

    let mut tx = pool.begin().await?;

    let action = CampaignActionRepo::lock(&mut tx, campaign_action_id)
        .await?
        .ok_or_else(|| action_not_found(campaign_action_id))?;

    if action.edition_id == Some(target_edition_id) {
        return Err(AppError::Core(CoreError::Validation(
            "The campaign action is already in that edition".to_string(),
        )));
    }
    // Source and target are locked in ascending id order so a concurrent
    // completion of either edition is observed.
    let mut edition_ids: Vec<DbId> = action.edition_id.into_iter().collect();
    edition_ids.push(target_edition_id);
    edition_ids.sort_unstable();
    let mut source = None;
    let mut target = None;
    for id in edition_ids {
        let locked = MagazineEditionRepo::lock(&mut tx, id).await?;
        if id == target_edition_id {
            target = locked;
        } else {
            source = locked;
        }
    }

    if source.is_some_and(|edition| edition.is_completed) {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot move an action out of a completed edition".to_string(),
        )));
    }
    let target = target.ok_or_else(|| edition_not_found(target_edition_id))?;
    if target.is_completed {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot move an action into a completed edition".to_string(),
        )));
    }

    CampaignActionRepo::move_to_edition(&mut tx, campaign_action_id, target_edition_id).await?;
    tx.commit().await?;

    tracing::info!(
        campaign_action_id,
        from_edition_id = ?action.edition_id,
        edition_id = target_edition_id,
        user_id = actor.user_id,
        "Campaign action moved",
    );

    Ok(())
}

/// The ledger operations bound to one acting user.
#[derive(Clone)]
pub struct PgDeadlineLedger {
    pool: PgPool,
    actor: Actor,
}

impl PgDeadlineLedger {
    pub fn new(pool: PgPool, actor: Actor) -> Self {
        Self { pool, actor }
    }
}

fn into_records(rows: Vec<DeadlineConfirmation>) -> Vec<ConfirmationRecord> {
    rows.into_iter().map(ConfirmationRecord::from).collect()
}

#[async_trait]
impl DeadlineLedger for PgDeadlineLedger {
    async fn list_confirmations(
        &self,
        campaign_action_id: DbId,
    ) -> Result<Vec<ConfirmationRecord>, CoreError> {
        DeadlineConfirmationRepo::list_for_action(&self.pool, campaign_action_id)
            .await
            .map(into_records)
            .map_err(|e| AppError::from(e).into_core())
    }

    async fn confirm(&self, request: &ConfirmRequest) -> Result<Vec<ConfirmationRecord>, CoreError> {
        confirm_deadline(
            &self.pool,
            &self.actor,
            request.campaign_action_id,
            request.deadline_type.as_str(),
            request.link.as_deref(),
        )
        .await
        .map(into_records)
        .map_err(AppError::into_core)
    }

    async fn revert(&self, confirmation_id: DbId) -> Result<(), CoreError> {
        revert_confirmation(&self.pool, &self.actor, confirmation_id)
            .await
            .map(|_| ())
            .map_err(AppError::into_core)
    }
}
