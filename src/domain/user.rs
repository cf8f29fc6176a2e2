//! User accounts and authenticated identities

use crate::domain::ids::UserId;
use crate::domain::role::Role;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of a successful authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
}

/// Stored user row
///
/// `password_digest` is the unsalted SHA-256 hex digest of the password.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: UserId,
    pub username: String,
    pub password_digest: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// Account to be inserted by seeding
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_digest: String,
    pub role: Role,
}
