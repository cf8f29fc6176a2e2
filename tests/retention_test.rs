//! Retention deadlines and purge through the dispatcher

mod common;

use carevault::core::dashboard::{Command, CommandOutput};
use carevault::core::retention::RetentionPolicy;
use carevault::domain::PatientId;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use common::{harness, patient, start_time, ADMIN};

#[test]
fn test_deadline_is_creation_date_plus_window() {
    let policy = RetentionPolicy::default();
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 23, 30, 0).unwrap();
    assert_eq!(
        policy.compute_deadline(created),
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
    );
    assert_eq!(
        RetentionPolicy::new(30).compute_deadline(created),
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
    );
}

#[tokio::test]
async fn test_record_expires_the_day_after_its_deadline() {
    let h = harness().await;
    let mut admin = h.session(ADMIN).await;
    let id = h.add(&mut admin, patient("Jane Roe", "555-123-4567", "Flu")).await;
    assert_eq!(
        h.store.patient(id).unwrap().data_retention_date,
        (start_time() + Duration::days(90)).date_naive()
    );

    h.clock.advance(Duration::days(90));
    let CommandOutput::Expired(expired) = h
        .dashboard
        .execute(&mut admin, Command::ListExpired)
        .await
        .unwrap()
    else {
        panic!("expected expired list");
    };
    assert!(expired.is_empty());

    h.clock.advance(Duration::days(1));
    let CommandOutput::Expired(expired) = h
        .dashboard
        .execute(&mut admin, Command::ListExpired)
        .await
        .unwrap()
    else {
        panic!("expected expired list");
    };
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].patient_id, id);
}

#[tokio::test]
async fn test_purge_deletes_expired_with_one_event() {
    let h = harness().await;
    let mut admin = h.session(ADMIN).await;
    let old = h.add(&mut admin, patient("Jane Roe", "555-123-4567", "Flu")).await;
    h.clock.advance(Duration::days(30));
    let recent = h.add(&mut admin, patient("John Doe", "555-987-6543", "Cold")).await;

    h.clock.advance(Duration::days(61));
    let before = h.store.audit_len();
    let output = h
        .dashboard
        .execute(&mut admin, Command::PurgeExpired)
        .await
        .unwrap();

    assert!(matches!(output, CommandOutput::Purged(1)));
    assert!(h.store.patient(old).is_none());
    assert!(h.store.patient(recent).is_some());
    assert_eq!(h.store.audit_len(), before + 1);

    let log = h.audit_log().await;
    let retention: Vec<_> = log.iter().filter(|e| e.action == "Data Retention").collect();
    assert_eq!(retention.len(), 1);
    assert_eq!(retention[0].details, "Deleted 1 expired records");
}

#[tokio::test]
async fn test_purge_with_nothing_expired_is_still_audited() {
    let h = harness().await;
    let mut admin = h.session(ADMIN).await;
    h.add(&mut admin, patient("Jane Roe", "555-123-4567", "Flu")).await;
    let before = h.store.audit_len();

    let output = h
        .dashboard
        .execute(&mut admin, Command::PurgeExpired)
        .await
        .unwrap();
    assert!(matches!(output, CommandOutput::Purged(0)));
    assert_eq!(h.store.audit_len(), before + 1);
}

#[tokio::test]
async fn test_failed_purge_keeps_every_record() {
    let h = harness().await;
    let mut admin = h.session(ADMIN).await;
    for name in ["A One", "B Two"] {
        h.add(&mut admin, patient(name, "555-123-4567", "Flu")).await;
    }
    h.clock.advance(Duration::days(120));
    let before = h.store.audit_len();

    h.store.fail_next_purge();
    assert!(h
        .dashboard
        .execute(&mut admin, Command::PurgeExpired)
        .await
        .is_err());

    assert!(h.store.patient(PatientId::new(1)).is_some());
    assert!(h.store.patient(PatientId::new(2)).is_some());
    assert_eq!(h.store.audit_len(), before);
}

#[tokio::test]
async fn test_purge_commits_even_when_audit_append_fails() {
    let h = harness().await;
    let mut admin = h.session(ADMIN).await;
    let id = h.add(&mut admin, patient("Jane Roe", "555-123-4567", "Flu")).await;
    h.clock.advance(Duration::days(91));
    let before = h.store.audit_len();

    h.store.set_audit_failure(true);
    assert!(h
        .dashboard
        .execute(&mut admin, Command::PurgeExpired)
        .await
        .is_err());
    h.store.set_audit_failure(false);

    // The delete has committed; only the event is missing.
    assert!(h.store.patient(id).is_none());
    assert_eq!(h.store.audit_len(), before);
    let log = h.audit_log().await;
    assert!(log.iter().all(|e| e.action != "Data Retention"));
}
