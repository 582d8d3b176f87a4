//! Domain logic for the magazine edition deadline workflow.
//!
//! This crate has zero internal dependencies so it can be shared by the
//! repository layer, the HTTP server, and any client that drives the
//! per-action confirmation rows.

pub mod deadlines;
pub mod edition;
pub mod error;
pub mod roles;
pub mod types;
