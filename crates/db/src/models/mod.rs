//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Optionally an update DTO (all `Option` fields) for patches

pub mod action;
pub mod campaign;
pub mod campaign_action;
pub mod company;
pub mod deadline_confirmation;
pub mod magazine_edition;
pub mod medium;
pub mod user;
