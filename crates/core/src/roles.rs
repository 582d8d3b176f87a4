//! Well-known role names and the acting-user capability checks.
//!
//! Role names must match the values stored in `users.roles` (see
//! `20260301000001_create_users.sql`). Every permission decision takes an
//! explicit [`Actor`] rather than reading ambient session state.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_COMERCIAL: &str = "comercial";
pub const ROLE_POST_VENTA: &str = "post-venta";
pub const ROLE_ANALISTA: &str = "analista";

/// All role names accepted when creating or updating a user.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_COMERCIAL, ROLE_POST_VENTA, ROLE_ANALISTA];

/// The identity and role set of whoever is performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: DbId,
    pub roles: Vec<String>,
}

impl Actor {
    pub fn new(user_id: DbId, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            user_id,
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    /// Holds the elevated administrative capability.
    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    /// Users, companies, contacts, mediums, channels and action types.
    pub fn can_manage_master_data(&self) -> bool {
        self.is_admin()
    }

    pub fn can_create_campaigns(&self) -> bool {
        self.has_any_role(&[ROLE_ADMIN, ROLE_COMERCIAL])
    }

    pub fn can_update_action_status(&self) -> bool {
        self.has_any_role(&[ROLE_ADMIN, ROLE_POST_VENTA])
    }

    /// Moving a campaign action between editions.
    pub fn can_move_action(&self) -> bool {
        self.has_any_role(&[ROLE_ADMIN, ROLE_COMERCIAL])
    }

    /// Marking an edition as completed once every action is confirmed.
    pub fn can_complete_edition(&self) -> bool {
        self.has_any_role(&[ROLE_ADMIN, ROLE_POST_VENTA])
    }

    /// Reverting a deadline confirmation is restricted to administrators.
    pub fn can_revert_confirmation(&self) -> bool {
        self.is_admin()
    }
}

/// Validate that every role name is one of [`VALID_ROLES`].
pub fn validate_roles(roles: &[String]) -> Result<(), String> {
    if roles.is_empty() {
        return Err("At least one role is required".to_string());
    }
    for role in roles {
        if !VALID_ROLES.contains(&role.as_str()) {
            return Err(format!(
                "Invalid role '{role}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ));
        }
    }
    Ok(())
}
