//! User drift reporting tests against in-memory directories.

mod common;

use std::sync::Arc;

use common::{auth_user, init_tracing, nomis_user, FakeSource, FakeTarget};
use dirsync_engine::{SyncError, UpdateType, UserDriftReporter};

#[tokio::test]
async fn identical_users_produce_empty_report() {
    let source = Arc::new(FakeSource::with_users(vec![auth_user(
        "JBLOGGS",
        Some("joe@example.com"),
    )]));
    let target = Arc::new(FakeTarget::with_users(vec![nomis_user(
        "JBLOGGS",
        Some("joe@example.com"),
    )]));

    let report = UserDriftReporter::new(source, target)
        .report_user_drift()
        .await
        .unwrap();

    assert!(report.is_empty());
}

#[tokio::test]
async fn null_and_empty_email_compare_as_equal() {
    let source = Arc::new(FakeSource::with_users(vec![auth_user("JBLOGGS", None)]));
    let target = Arc::new(FakeTarget::with_users(vec![nomis_user("JBLOGGS", Some(""))]));

    let report = UserDriftReporter::new(source, target)
        .report_user_drift()
        .await
        .unwrap();

    assert!(report.is_empty());
}

#[tokio::test]
async fn email_drift_is_reported_with_update_type_none() {
    init_tracing();
    let source = Arc::new(FakeSource::with_users(vec![auth_user(
        "JBLOGGS",
        Some("joe.bloggs@justice.example"),
    )]));
    let target = Arc::new(FakeTarget::with_users(vec![nomis_user(
        "JBLOGGS",
        Some("jbloggs@old.example"),
    )]));

    let report = UserDriftReporter::new(source, target.clone())
        .report_user_drift()
        .await
        .unwrap();

    let outcome = report.get("JBLOGGS").expect("drift outcome");
    assert_eq!(outcome.update_type, UpdateType::None);
    assert_eq!(
        outcome.differences,
        "email: (jbloggs@old.example, joe.bloggs@justice.example)"
    );

    // Purely observational: no corrective call is ever issued.
    assert_eq!(target.write_count(), 0);
}

#[tokio::test]
async fn one_sided_users_are_reported_and_not_stripped() {
    let source = Arc::new(FakeSource::with_users(vec![
        auth_user("ONLY_IN_AUTH", Some("a@example.com")),
        auth_user("SHARED", None),
    ]));
    let target = Arc::new(FakeTarget::with_users(vec![
        nomis_user("ONLY_IN_NOMIS", Some("b@example.com")),
        nomis_user("SHARED", Some("")),
    ]));

    let report = UserDriftReporter::new(source, target)
        .report_user_drift()
        .await
        .unwrap();

    // SHARED is equal; the two one-sided users stay in the report even
    // though their update type is NONE.
    assert_eq!(report.len(), 2);

    let only_source = report.get("ONLY_IN_AUTH").unwrap();
    assert_eq!(only_source.update_type, UpdateType::None);
    assert_eq!(
        only_source.differences,
        "only in source: email=a@example.com, userName=ONLY_IN_AUTH"
    );

    let only_target = report.get("ONLY_IN_NOMIS").unwrap();
    assert_eq!(only_target.update_type, UpdateType::None);
    assert_eq!(
        only_target.differences,
        "only in target: email=b@example.com, userName=ONLY_IN_NOMIS"
    );
}

#[tokio::test]
async fn report_is_keyed_by_username_in_json() {
    let source = Arc::new(FakeSource::with_users(vec![auth_user(
        "JBLOGGS",
        Some("joe@example.com"),
    )]));
    let target = Arc::new(FakeTarget::with_users(vec![nomis_user("JBLOGGS", None)]));

    let report = UserDriftReporter::new(source, target)
        .report_user_drift()
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["JBLOGGS"]["updateType"], "NONE");
    assert_eq!(
        json["JBLOGGS"]["differences"],
        "email: (, joe@example.com)"
    );
}

#[tokio::test]
async fn source_fetch_failure_is_fatal() {
    let source = Arc::new(FakeSource::failing_user_fetch());
    let target = Arc::new(FakeTarget::default());

    let err = UserDriftReporter::new(source, target)
        .report_user_drift()
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::SourceFetch(_)));
}

#[tokio::test]
async fn target_fetch_failure_is_fatal() {
    let source = Arc::new(FakeSource::with_users(vec![auth_user("JBLOGGS", None)]));
    let target = Arc::new(FakeTarget::failing_user_fetch());

    let err = UserDriftReporter::new(source, target)
        .report_user_drift()
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::TargetFetch(_)));
}
