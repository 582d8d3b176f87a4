//! Async driver that runs a [`RowController`] against a deadline ledger.
//!
//! Every successful mutation is followed by a full re-fetch of the action's
//! confirmations; the session never patches ledger state locally. A failed
//! request leaves the controller exactly as it was, so the user can retry.

use async_trait::async_trait;

use super::ledger::ConfirmationRecord;
use super::row::{CompletionChange, ConfirmRequest, RevertRequest, RowController, RowError};
use crate::error::CoreError;
use crate::roles::Actor;
use crate::types::DbId;

/// Remote operations of the confirmation ledger.
#[async_trait]
pub trait DeadlineLedger: Send + Sync {
    /// All confirmation records for a campaign action, reverted ones included.
    async fn list_confirmations(
        &self,
        campaign_action_id: DbId,
    ) -> Result<Vec<ConfirmationRecord>, CoreError>;

    /// Create a confirmation; returns the action's updated confirmation list.
    async fn confirm(&self, request: &ConfirmRequest) -> Result<Vec<ConfirmationRecord>, CoreError>;

    /// Flag a confirmation as reverted.
    async fn revert(&self, confirmation_id: DbId) -> Result<(), CoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Rejected locally before any request was sent.
    #[error(transparent)]
    Row(#[from] RowError),

    /// Rejected by the ledger; carries the server's message.
    #[error("{}", .0.message())]
    Ledger(#[from] CoreError),
}

/// One row bound to a ledger.
pub struct RowSession<L> {
    ledger: L,
    row: RowController,
}

impl<L: DeadlineLedger> RowSession<L> {
    pub fn new(ledger: L, row: RowController) -> Self {
        Self { ledger, row }
    }

    pub fn row(&self) -> &RowController {
        &self.row
    }

    pub fn row_mut(&mut self) -> &mut RowController {
        &mut self.row
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Fetch the ledger and reconcile.
    pub async fn load(&mut self) -> Result<Option<CompletionChange>, SessionError> {
        let confirmations = self
            .ledger
            .list_confirmations(self.row.campaign_action_id())
            .await?;
        Ok(self.row.apply_ledger(confirmations))
    }

    /// Activate "confirm" on the current step.
    ///
    /// For link-requiring steps this only opens the link input.
    pub async fn confirm_current(
        &mut self,
        actor: &Actor,
    ) -> Result<Option<CompletionChange>, SessionError> {
        match self.row.begin_confirm(actor)? {
            Some(request) => self.send_confirm(request).await,
            None => Ok(None),
        }
    }

    pub fn set_link_input(&mut self, value: impl Into<String>) {
        self.row.set_link_input(value);
    }

    pub fn cancel_link(&mut self) {
        self.row.cancel_link();
    }

    /// Submit the typed link. A blank link fails without contacting the ledger.
    pub async fn submit_link(&mut self) -> Result<Option<CompletionChange>, SessionError> {
        let request = self.row.submit_link()?;
        self.send_confirm(request).await
    }

    /// Revert a confirmation from the history panel.
    ///
    /// `accept` is shown the request's prompt and decides whether to proceed;
    /// returning `false` cancels without any request.
    pub async fn revert(
        &mut self,
        actor: &Actor,
        confirmation_id: DbId,
        accept: impl FnOnce(&RevertRequest) -> bool + Send,
    ) -> Result<Option<CompletionChange>, SessionError> {
        let request = self.row.begin_revert(actor, confirmation_id)?;
        if !accept(&request) {
            return Ok(None);
        }
        self.ledger.revert(request.confirmation_id).await?;
        if request.reopens_edition {
            self.row.set_edition_completed(false);
        }
        self.load().await
    }

    async fn send_confirm(
        &mut self,
        request: ConfirmRequest,
    ) -> Result<Option<CompletionChange>, SessionError> {
        self.ledger.confirm(&request).await?;
        self.row.confirm_accepted();
        self.load().await
    }
}
