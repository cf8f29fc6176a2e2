//! Default account seeding

use crate::adapters::database::traits::UserStore;
use crate::core::auth::authenticator::hash_password;
use crate::domain::{NewUser, Result, Role};

/// Account created on first initialization
#[derive(Debug, Clone, Copy)]
pub struct DefaultAccount {
    pub username: &'static str,
    pub password: &'static str,
    pub role: Role,
}

pub const DEFAULT_ACCOUNTS: [DefaultAccount; 3] = [
    DefaultAccount {
        username: "admin",
        password: "admin123",
        role: Role::Admin,
    },
    DefaultAccount {
        username: "dr_bob",
        password: "doc123",
        role: Role::Doctor,
    },
    DefaultAccount {
        username: "alice_recep",
        password: "rec123",
        role: Role::Receptionist,
    },
];

/// Insert [`DEFAULT_ACCOUNTS`] if the users table is empty
///
/// Returns the number of accounts created (0 when any account exists).
pub async fn seed_default_accounts(users: &dyn UserStore) -> Result<usize> {
    let existing = users.count_users().await?;
    if existing > 0 {
        tracing::debug!(existing, "Users present, skipping seed");
        return Ok(0);
    }

    let accounts: Vec<NewUser> = DEFAULT_ACCOUNTS
        .iter()
        .map(|a| NewUser {
            username: a.username.to_string(),
            password_digest: hash_password(a.password),
            role: a.role,
        })
        .collect();

    users.insert_users(&accounts).await?;
    tracing::info!(accounts = accounts.len(), "Seeded default accounts");
    Ok(accounts.len())
}
