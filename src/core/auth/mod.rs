//! Authentication and account seeding
//!
//! Passwords are stored as unsalted SHA-256 hex digests. This is weak
//! against precomputed tables and kept only for compatibility with existing
//! account rows; see [`hash_password`].

pub mod authenticator;
pub mod seed;

pub use authenticator::{hash_password, Authenticator};
pub use seed::{seed_default_accounts, DefaultAccount, DEFAULT_ACCOUNTS};
