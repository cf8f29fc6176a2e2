//! Credential check against stored digests

use crate::adapters::database::traits::UserStore;
use crate::domain::Identity;
use crate::log_store_fault;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Lowercase hex SHA-256 digest of a password
///
/// Unsalted: equal passwords share a digest across accounts.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    format!("{digest:x}")
}

/// Validates username/password pairs
#[derive(Clone)]
pub struct Authenticator {
    users: Arc<dyn UserStore>,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Identity of the matching account, if any
    ///
    /// The username match is exact and case-sensitive. Store faults are
    /// logged and reported as a failed authentication, never as an error.
    pub async fn authenticate(&self, username: &str, password: &str) -> Option<Identity> {
        let digest = hash_password(password);
        match self.users.find_by_credentials(username, &digest).await {
            Ok(Some(user)) => {
                tracing::info!(
                    user_id = %user.user_id,
                    role = %user.role,
                    "Authentication succeeded"
                );
                Some(user.identity())
            }
            Ok(None) => {
                tracing::info!("Authentication failed: unknown username or wrong password");
                None
            }
            Err(e) => {
                log_store_fault!(&e, "authenticate");
                None
            }
        }
    }
}
