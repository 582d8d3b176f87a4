//! Deadline workflow for magazine editions.
//!
//! - [`schedule`]: publication date to deadline dates.
//! - [`steps`]: per-track step templates.
//! - [`ledger`]: reconciliation of confirmation records with a template.
//! - [`row`]: per-campaign-action UI state machine.
//! - [`session`]: async driver for a row over a [`session::DeadlineLedger`].
//! - [`gate`]: edition completion gate.

pub mod gate;
pub mod ledger;
pub mod row;
pub mod schedule;
pub mod session;
pub mod steps;
