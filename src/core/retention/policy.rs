//! Retention deadline computation

use crate::config::schema::RetentionConfig;
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Number of days a record is kept after creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    window_days: u32,
}

impl RetentionPolicy {
    pub const DEFAULT_WINDOW_DAYS: u32 = 90;

    pub fn new(window_days: u32) -> Self {
        Self { window_days }
    }

    pub fn from_config(config: &RetentionConfig) -> Self {
        Self::new(config.window_days)
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// UTC creation date plus the window
    ///
    /// Computed once when the record is inserted and never recomputed.
    pub fn compute_deadline(&self, created_at: DateTime<Utc>) -> NaiveDate {
        created_at.date_naive() + Duration::days(i64::from(self.window_days))
    }

    /// A deadline has passed once it is strictly before `today`
    pub fn is_expired(deadline: NaiveDate, today: NaiveDate) -> bool {
        deadline < today
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW_DAYS)
    }
}
