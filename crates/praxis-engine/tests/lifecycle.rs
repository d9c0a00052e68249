mod common;

use jiff::SignedDuration;
use praxis_core::{ClientStatus, Questionnaire};
use praxis_engine::{Clock, DELETION_GRACE, EngineError, SweepConfig};
use praxis_store::Store;
use serde_json::json;

use common::engine;

#[test]
fn registration_normalizes_and_is_get_or_create() {
    let (engine, _) = engine();
    let first = engine.register_client("  Jane@Example.COM ").unwrap();
    assert_eq!(first.email, "jane@example.com");

    let second = engine.register_client("jane@example.com").unwrap();
    assert_eq!(second.id, first.id);

    let err = engine.register_client("   ").unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[test]
fn deactivation_schedules_erasure_a_year_out() {
    let (engine, clock) = engine();
    let client = engine.register_client("jane@example.com").unwrap();

    let client = engine.deactivate(client.id).unwrap();
    assert_eq!(client.status, ClientStatus::Inactive);
    assert_eq!(client.inactivated_at, Some(clock.now()));
    assert_eq!(client.delete_after, Some(clock.now() + DELETION_GRACE));
}

#[test]
fn deactivation_leaves_existing_links_alone() {
    let (engine, clock) = engine();
    let client = engine.register_client("jane@example.com").unwrap();
    let form = engine.issue(client.id, Questionnaire::Bai).unwrap();

    engine.deactivate(client.id).unwrap();
    let stored = engine.store().form_by_token(&form.token).unwrap().unwrap();
    assert!(stored.is_usable(clock.now()));
}

#[test]
fn activation_clears_the_schedule_and_is_idempotent() {
    let (engine, _) = engine();
    let client = engine.register_client("jane@example.com").unwrap();
    engine.deactivate(client.id).unwrap();

    let client = engine.activate(client.id).unwrap();
    assert_eq!(client.status, ClientStatus::Active);
    assert!(client.inactivated_at.is_none());
    assert!(client.delete_after.is_none());

    let again = engine.activate(client.id).unwrap();
    assert_eq!(again.status, ClientStatus::Active);
}

#[test]
fn delete_by_email_erases_the_client_and_every_form() {
    let (engine, _) = engine();
    let client = engine.register_client("jane@example.com").unwrap();
    engine.issue_all(client.id).unwrap();
    assert_eq!(engine.store().form_count(), 4);

    engine.delete_by_email("  Jane@example.com ").unwrap();
    assert_eq!(engine.store().client_count(), 0);
    assert_eq!(engine.store().form_count(), 0);
}

#[test]
fn delete_by_unknown_email_fails_generically() {
    let (engine, _) = engine();
    let err = engine.delete_by_email("nobody@example.com").unwrap_err();
    assert!(matches!(err, EngineError::ClientNotFound));
}

#[test]
fn a_mid_transaction_failure_leaves_every_row_untouched() {
    let (engine, clock) = engine();
    let client = engine.register_client("jane@example.com").unwrap();
    engine.issue(client.id, Questionnaire::Bai).unwrap();
    engine.issue(client.id, Questionnaire::Ysq).unwrap();
    engine.issue(client.id, Questionnaire::Smi).unwrap();

    engine.store().fail_delete_of(client.id);
    let err = engine.delete_by_email("jane@example.com").unwrap_err();
    assert!(matches!(err, EngineError::Internal(_)));

    // All four rows survive, and the in-transaction retirement of active
    // links was rolled back with everything else.
    assert_eq!(engine.store().client_count(), 1);
    assert_eq!(engine.store().form_count(), 3);
    let forms = engine.store().forms_for_client(client.id, None).unwrap();
    assert!(forms.iter().all(|f| f.is_usable(clock.now())));
}

#[test]
fn sweep_erases_only_clients_past_their_grace_period() {
    let (engine, clock) = engine();
    let due = engine.register_client("due@example.com").unwrap();
    engine.deactivate(due.id).unwrap();
    engine.issue(due.id, Questionnaire::Bdi).unwrap();

    clock.advance(SignedDuration::from_hours(6 * 30 * 24));
    let late = engine.register_client("later@example.com").unwrap();
    engine.deactivate(late.id).unwrap();
    engine.register_client("active@example.com").unwrap();

    // Six months in: nobody is due yet.
    let report = engine.sweep();
    assert_eq!(report.scanned, 0);

    // Past the first client's grace period, before the second's.
    clock.advance(SignedDuration::from_hours(7 * 30 * 24));
    let report = engine.sweep();
    assert_eq!(report.scanned, 1);
    assert_eq!(report.deleted, 1);
    assert_eq!(report.failed, 0);

    assert!(engine.store().client_by_id(due.id).unwrap().is_none());
    assert!(engine.store().client_by_id(late.id).unwrap().is_some());
    assert_eq!(engine.store().form_count(), 0);
}

#[test]
fn one_failing_deletion_does_not_abort_the_sweep() {
    let (engine, clock) = engine();
    let first = engine.register_client("first@example.com").unwrap();
    engine.deactivate(first.id).unwrap();
    clock.advance(SignedDuration::from_hours(1));
    let second = engine.register_client("second@example.com").unwrap();
    engine.deactivate(second.id).unwrap();
    clock.advance(SignedDuration::from_hours(1));
    let third = engine.register_client("third@example.com").unwrap();
    engine.deactivate(third.id).unwrap();

    engine.store().fail_delete_of(second.id);
    clock.advance(DELETION_GRACE);

    let report = engine.sweep();
    assert_eq!(report.scanned, 3);
    assert_eq!(report.deleted, 2);
    assert_eq!(report.failed, 1);

    assert!(engine.store().client_by_id(first.id).unwrap().is_none());
    assert!(engine.store().client_by_id(second.id).unwrap().is_some());
    assert!(engine.store().client_by_id(third.id).unwrap().is_none());
}

#[test]
fn sweep_config_defaults_to_an_enabled_monthly_run() {
    // The host scheduler reads this config; an empty config block must come
    // out as the documented default cadence.
    let config: SweepConfig = serde_json::from_str("{}").unwrap();
    assert!(config.enabled);
    assert_eq!(config.schedule, "0 0 1 * *");

    let config: SweepConfig = serde_json::from_str(r#"{"enabled": false}"#).unwrap();
    assert!(!config.enabled);
    assert_eq!(config.schedule, SweepConfig::default().schedule);
}

#[test]
fn revocation_retires_all_active_links_for_the_pair() {
    let (engine, clock) = engine();
    let client = engine.register_client("jane@example.com").unwrap();
    let form = engine.issue(client.id, Questionnaire::Bai).unwrap();

    let info = engine.revoke(client.id, Questionnaire::Bai).unwrap();
    assert_eq!(info.revoked, 1);
    assert_eq!(info.last_revoked_at, clock.now());

    let stored = engine.store().form_by_token(&form.token).unwrap().unwrap();
    assert!(!stored.active);
    assert_eq!(stored.revoked_at, Some(clock.now()));
}

#[test]
fn revoking_with_nothing_active_is_a_conflict() {
    let (engine, _) = engine();
    let client = engine.register_client("jane@example.com").unwrap();

    let err = engine.revoke(client.id, Questionnaire::Bai).unwrap_err();
    assert!(matches!(err, EngineError::NoActiveToken));

    // A submitted link is no longer active either.
    let form = engine.issue(client.id, Questionnaire::Bdi).unwrap();
    engine
        .submit(
            &form.token,
            &praxis_engine::Submission {
                name: None,
                date_of_birth: None,
                answers: praxis_scoring::Answers::Bdi(vec![json!(1)]),
            },
        )
        .unwrap();
    let err = engine.revoke(client.id, Questionnaire::Bdi).unwrap_err();
    assert!(matches!(err, EngineError::NoActiveToken));
}
