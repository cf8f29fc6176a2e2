//! Per-session state passed explicitly to every operation

use crate::domain::audit::{AuditAction, NewAuditEvent};
use crate::domain::errors::CarevaultError;
use crate::domain::role::Role;
use crate::domain::user::Identity;
use crate::domain::Result;
use chrono::{DateTime, Utc};

/// Authenticated session
///
/// Created by a successful login and consumed by logout. Consent starts
/// unset and is flipped once by the consent operation.
#[derive(Debug, Clone)]
pub struct SessionContext {
    identity: Identity,
    started_at: DateTime<Utc>,
    consent_given: bool,
}

impl SessionContext {
    pub fn new(identity: Identity, started_at: DateTime<Utc>) -> Self {
        Self {
            identity,
            started_at,
            consent_given: false,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn role(&self) -> Role {
        self.identity.role
    }

    pub fn username(&self) -> &str {
        &self.identity.username
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn consent_given(&self) -> bool {
        self.consent_given
    }

    pub(crate) fn record_consent(&mut self) {
        self.consent_given = true;
    }

    /// Uptime of the session as (hours, minutes)
    pub fn uptime(&self, now: DateTime<Utc>) -> (i64, i64) {
        let elapsed = (now - self.started_at).num_minutes().max(0);
        (elapsed / 60, elapsed % 60)
    }

    /// Fail unless the session's role is one of `allowed`
    ///
    /// # Errors
    ///
    /// Returns [`CarevaultError::Authorization`] naming the operation.
    pub fn require_role(&self, allowed: &[Role], operation: &str) -> Result<()> {
        if allowed.contains(&self.role()) {
            Ok(())
        } else {
            Err(CarevaultError::Authorization {
                role: self.role(),
                operation: operation.to_string(),
            })
        }
    }

    /// Fail unless data-processing consent was given
    ///
    /// # Errors
    ///
    /// Returns [`CarevaultError::ConsentRequired`].
    pub fn require_consent(&self) -> Result<()> {
        if self.consent_given {
            Ok(())
        } else {
            Err(CarevaultError::ConsentRequired)
        }
    }

    /// Audit event attributed to this session's user
    pub fn event(&self, action: AuditAction, details: impl Into<String>) -> NewAuditEvent {
        NewAuditEvent::new(
            Some(self.identity.user_id),
            Some(self.identity.role),
            action,
            details,
        )
    }
}
