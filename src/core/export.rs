//! CSV exports and system backup
//!
//! Files are written to `export.output_dir` with a UTC timestamp in the
//! name, e.g. `patients_20250314_093000.csv`. Headers come from the row
//! type's field names; an empty row set produces an empty file.

use crate::core::access::PatientView;
use crate::domain::context::ResultExt;
use crate::domain::{AuditEntry, PatientRecord, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Paths written by a system backup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupFiles {
    pub patients: PathBuf,
    pub logs: PathBuf,
}

/// Writes delimited exports into one directory
#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export the caller's projected patient view
    pub fn export_patients(&self, view: &PatientView, now: DateTime<Utc>) -> Result<PathBuf> {
        let path = self.file_path("patients", now)?;
        match view {
            PatientView::Full(rows) => write_rows(&path, rows)?,
            PatientView::Masked(rows) => write_rows(&path, rows)?,
            PatientView::Restricted(rows) => write_rows(&path, rows)?,
        }
        tracing::info!(path = %path.display(), rows = view.len(), "Patient export written");
        Ok(path)
    }

    /// Export an already filtered audit view
    pub fn export_audit(&self, entries: &[AuditEntry], now: DateTime<Utc>) -> Result<PathBuf> {
        let path = self.file_path("audit_logs", now)?;
        write_rows(&path, entries)?;
        tracing::info!(path = %path.display(), rows = entries.len(), "Audit export written");
        Ok(path)
    }

    /// Dump the full patients and logs tables
    pub fn backup(
        &self,
        patients: &[PatientRecord],
        logs: &[AuditEntry],
        now: DateTime<Utc>,
    ) -> Result<BackupFiles> {
        let files = BackupFiles {
            patients: self.file_path("patients_backup", now)?,
            logs: self.file_path("logs_backup", now)?,
        };
        write_rows(&files.patients, patients)?;
        write_rows(&files.logs, logs)?;

        tracing::info!(
            patients = patients.len(),
            logs = logs.len(),
            dir = %self.output_dir.display(),
            "System backup written"
        );
        Ok(files)
    }

    fn file_path(&self, prefix: &str, now: DateTime<Utc>) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create export directory: {}",
                self.output_dir.display()
            )
        })?;
        Ok(self
            .output_dir
            .join(format!("{prefix}_{}.csv", now.format("%Y%m%d_%H%M%S"))))
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::access::{RestrictedPatientView, HIDDEN};
    use crate::domain::PatientId;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_restricted_export_has_no_diagnosis() {
        let dir = TempDir::new().unwrap();
        let exporter = CsvExporter::new(dir.path().join("out"));
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();

        let view = PatientView::Restricted(vec![RestrictedPatientView {
            patient_id: PatientId::new(4),
            name: HIDDEN,
            contact: HIDDEN,
            diagnosis: HIDDEN,
            date_added: now,
        }]);

        let path = exporter.export_patients(&view, now).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "patients_20250314_093000.csv"
        );

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "patient_id,name,contact,diagnosis,date_added"
        );
        assert!(lines.next().unwrap().starts_with("4,HIDDEN,HIDDEN,HIDDEN,"));
    }

    #[test]
    fn test_backup_file_names() {
        let dir = TempDir::new().unwrap();
        let exporter = CsvExporter::new(dir.path());
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 23, 5, 9).unwrap();

        let files = exporter.backup(&[], &[], now).unwrap();
        assert!(files.patients.ends_with("patients_backup_20251201_230509.csv"));
        assert!(files.logs.ends_with("logs_backup_20251201_230509.csv"));
        assert!(files.patients.exists());
        assert!(files.logs.exists());
    }
}
