//! Activity analytics and the overview metrics

use crate::adapters::database::traits::{AuditStore, PatientStore};
use crate::domain::{
    ActionCount, AuditEntry, AuditFilter, PatientCounts, PatientSummaryRow, Result,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Days covered by the activity charts
pub const ACTIVITY_WINDOW_DAYS: i64 = 7;

/// Rows shown in the overview's recent lists
pub const RECENT_LIMIT: usize = 10;

/// Audit events on one UTC date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// Audit events in one hour of one UTC date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub hour: u32,
    pub count: i64,
}

/// Activity charts for the analytics page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityReport {
    pub daily: Vec<DailyCount>,
    pub actions: Vec<ActionCount>,
    pub heatmap: Vec<HeatmapCell>,
}

/// Dashboard overview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub counts: PatientCounts,
    pub anonymized_percentage: f64,
    pub today_activity: usize,
    pub recent_activity: Vec<AuditEntry>,
    pub recent_additions: Vec<PatientSummaryRow>,
}

/// Read-only aggregation over the patient and audit stores
#[derive(Clone)]
pub struct Analytics {
    patients: Arc<dyn PatientStore>,
    audit: Arc<dyn AuditStore>,
}

impl Analytics {
    pub fn new(patients: Arc<dyn PatientStore>, audit: Arc<dyn AuditStore>) -> Self {
        Self { patients, audit }
    }

    /// Daily counts and hour-of-day heatmap for the last 7 days, plus the
    /// action distribution over every stored event
    pub async fn activity(&self, now: DateTime<Utc>) -> Result<ActivityReport> {
        let stamps = self
            .audit
            .timestamps_since(now - Duration::days(ACTIVITY_WINDOW_DAYS))
            .await?;
        let actions = self.audit.action_counts().await?;

        Ok(ActivityReport {
            daily: daily_counts(&stamps),
            actions,
            heatmap: heatmap(&stamps),
        })
    }

    pub async fn overview(&self, now: DateTime<Utc>) -> Result<Overview> {
        let counts = self.patients.counts(now.date_naive()).await?;
        let start_of_day = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let today_activity = self.audit.timestamps_since(start_of_day).await?.len();
        let recent_activity = self.audit.entries(&AuditFilter::latest(RECENT_LIMIT)).await?;
        let recent_additions = self.patients.list_summaries(Some(RECENT_LIMIT)).await?;

        Ok(Overview {
            anonymized_percentage: percentage(counts.anonymized, counts.total),
            counts,
            today_activity,
            recent_activity,
            recent_additions,
        })
    }
}

fn percentage(part: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

fn daily_counts(stamps: &[DateTime<Utc>]) -> Vec<DailyCount> {
    let mut days: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for ts in stamps {
        *days.entry(ts.date_naive()).or_default() += 1;
    }
    days.into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

fn heatmap(stamps: &[DateTime<Utc>]) -> Vec<HeatmapCell> {
    let mut cells: BTreeMap<(NaiveDate, u32), i64> = BTreeMap::new();
    for ts in stamps {
        *cells.entry((ts.date_naive(), ts.hour())).or_default() += 1;
    }
    cells
        .into_iter()
        .map(|((date, hour), count)| HeatmapCell { date, hour, count })
        .collect()
}
