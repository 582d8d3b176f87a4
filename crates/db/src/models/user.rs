//! User entity model and DTOs.

use pressdesk_core::roles::Actor;
use pressdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.roles.iter().cloned())
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    pub roles: Vec<String>,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            surname: user.surname.clone(),
            email: user.email.clone(),
            roles: user.roles.clone(),
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. The password must already be hashed.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub surname: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<String>,
}
