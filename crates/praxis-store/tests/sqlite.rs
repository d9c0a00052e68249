use std::collections::BTreeMap;

use jiff::Timestamp;
use praxis_core::{Client, ClientStatus, Form, Questionnaire, ScoreValue};
use praxis_store::{FormFilter, FormPatch, SqliteStore, Store, StoreError};
use uuid::Uuid;

fn ts(s: &str) -> Timestamp {
    s.parse().unwrap()
}

fn client(email: &str) -> Client {
    Client::new(email, ts("2026-03-01T09:00:00Z"))
}

fn form(client_id: Uuid, questionnaire: Questionnaire, token: &str) -> Form {
    Form {
        id: Uuid::new_v4(),
        client_id,
        questionnaire,
        token: token.to_string(),
        issued_at: ts("2026-03-01T10:00:00Z"),
        expires_at: ts("2026-03-15T10:00:00Z"),
        active: true,
        submitted_at: None,
        revoked_at: None,
        scores: BTreeMap::new(),
    }
}

#[test]
fn clients_round_trip() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut c = client("jane@example.com");
    c.name = Some("Jane".to_string());
    c.date_of_birth = Some("1991-06-20".parse().unwrap());
    store.create_client(&c).unwrap();

    let by_id = store.client_by_id(c.id).unwrap().unwrap();
    assert_eq!(by_id.email, "jane@example.com");
    assert_eq!(by_id.name.as_deref(), Some("Jane"));
    assert_eq!(by_id.date_of_birth, c.date_of_birth);
    assert_eq!(by_id.created_at, c.created_at);

    let by_email = store.client_by_email("jane@example.com").unwrap().unwrap();
    assert_eq!(by_email.id, c.id);
    assert!(store.client_by_email("nobody@example.com").unwrap().is_none());
}

#[test]
fn duplicate_email_is_rejected() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.create_client(&client("dup@example.com")).unwrap();
    let err = store.create_client(&client("dup@example.com")).unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(_)));
}

#[test]
fn forms_round_trip_with_scores() {
    let store = SqliteStore::open_in_memory().unwrap();
    let c = client("jane@example.com");
    store.create_client(&c).unwrap();

    let mut f = form(c.id, Questionnaire::Smi, "tok-1");
    f.scores = BTreeMap::from([
        ("vulnerable_child".to_string(), ScoreValue::new(4.33, "High")),
        ("healthy_adult".to_string(), ScoreValue::new(2.0, "High")),
    ]);
    store.create_form(&f).unwrap();

    let loaded = store.form_by_token("tok-1").unwrap().unwrap();
    assert_eq!(loaded.questionnaire, Questionnaire::Smi);
    assert_eq!(loaded.expires_at, f.expires_at);
    assert_eq!(loaded.scores["vulnerable_child"].to_string(), "4.33-High");
    assert!(store.form_by_token("missing").unwrap().is_none());
}

#[test]
fn a_negative_total_does_not_poison_the_stored_row() {
    let store = SqliteStore::open_in_memory().unwrap();
    let c = client("jane@example.com");
    store.create_client(&c).unwrap();

    let mut f = form(c.id, Questionnaire::Bdi, "tok-neg");
    f.scores = BTreeMap::from([("total".to_string(), ScoreValue::new(-2.0, "Minimal"))]);
    store.create_form(&f).unwrap();

    let loaded = store.form_by_token("tok-neg").unwrap().unwrap();
    assert_eq!(loaded.scores["total"].value, -2.0);
    assert_eq!(loaded.scores["total"].label, "Minimal");
}

#[test]
fn forms_for_client_filters_by_type_and_orders_by_issuance() {
    let store = SqliteStore::open_in_memory().unwrap();
    let c = client("jane@example.com");
    store.create_client(&c).unwrap();

    let mut first = form(c.id, Questionnaire::Bdi, "tok-a");
    first.issued_at = ts("2026-03-01T10:00:00Z");
    let mut second = form(c.id, Questionnaire::Bdi, "tok-b");
    second.issued_at = ts("2026-03-05T10:00:00Z");
    store.create_form(&second).unwrap();
    store.create_form(&first).unwrap();
    store.create_form(&form(c.id, Questionnaire::Bai, "tok-c")).unwrap();

    let all = store.forms_for_client(c.id, None).unwrap();
    assert_eq!(all.len(), 3);

    let bdi = store.forms_for_client(c.id, Some(Questionnaire::Bdi)).unwrap();
    assert_eq!(bdi.len(), 2);
    assert_eq!(bdi[0].token, "tok-a");
    assert_eq!(bdi[1].token, "tok-b");
}

#[test]
fn update_forms_applies_patch_and_reports_count() {
    let store = SqliteStore::open_in_memory().unwrap();
    let c = client("jane@example.com");
    store.create_client(&c).unwrap();
    store.create_form(&form(c.id, Questionnaire::Bai, "tok-a")).unwrap();
    store.create_form(&form(c.id, Questionnaire::Bai, "tok-b")).unwrap();
    store.create_form(&form(c.id, Questionnaire::Ysq, "tok-c")).unwrap();

    let revoked_at = ts("2026-03-02T12:00:00Z");
    let count = store
        .update_forms(
            &FormFilter {
                client_id: Some(c.id),
                questionnaire: Some(Questionnaire::Bai),
                active: Some(true),
                ..Default::default()
            },
            &FormPatch {
                active: Some(false),
                revoked_at: Some(revoked_at),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(count, 2);

    let a = store.form_by_token("tok-a").unwrap().unwrap();
    assert!(!a.active);
    assert_eq!(a.revoked_at, Some(revoked_at));

    // The YSQ form was outside the predicate.
    let c_form = store.form_by_token("tok-c").unwrap().unwrap();
    assert!(c_form.active);
    assert!(c_form.revoked_at.is_none());

    // An empty patch touches nothing.
    let count = store
        .update_forms(&FormFilter::default(), &FormPatch::default())
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn update_forms_by_explicit_ids() {
    let store = SqliteStore::open_in_memory().unwrap();
    let c = client("jane@example.com");
    store.create_client(&c).unwrap();
    let f1 = form(c.id, Questionnaire::Bai, "tok-a");
    let f2 = form(c.id, Questionnaire::Bdi, "tok-b");
    store.create_form(&f1).unwrap();
    store.create_form(&f2).unwrap();

    let count = store
        .update_forms(
            &FormFilter {
                ids: Some(vec![f1.id]),
                ..Default::default()
            },
            &FormPatch {
                active: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(count, 1);
    assert!(!store.form_by_token("tok-a").unwrap().unwrap().active);
    assert!(store.form_by_token("tok-b").unwrap().unwrap().active);
}

#[test]
fn due_for_deletion_scan_respects_status_and_date() {
    let store = SqliteStore::open_in_memory().unwrap();
    let now = ts("2026-03-01T00:00:00Z");

    let mut due = client("due@example.com");
    due.status = ClientStatus::Inactive;
    due.inactivated_at = Some(ts("2025-01-01T00:00:00Z"));
    due.delete_after = Some(ts("2026-01-01T00:00:00Z"));

    let mut not_yet = client("later@example.com");
    not_yet.status = ClientStatus::Inactive;
    not_yet.inactivated_at = Some(ts("2026-02-01T00:00:00Z"));
    not_yet.delete_after = Some(ts("2027-02-01T00:00:00Z"));

    let active = client("active@example.com");

    store.create_client(&due).unwrap();
    store.create_client(&not_yet).unwrap();
    store.create_client(&active).unwrap();

    let scanned = store.clients_due_for_deletion(now).unwrap();
    assert_eq!(scanned.len(), 1);
    assert_eq!(scanned[0].email, "due@example.com");
}

#[test]
fn transaction_rolls_back_every_write_on_error() {
    let store = SqliteStore::open_in_memory().unwrap();
    let c = client("jane@example.com");
    store.create_client(&c).unwrap();
    store.create_form(&form(c.id, Questionnaire::Bai, "tok-a")).unwrap();
    store.create_form(&form(c.id, Questionnaire::Ysq, "tok-b")).unwrap();

    let result = store.in_transaction(&mut |tx| {
        tx.delete_forms_for_client(c.id)?;
        tx.delete_client(c.id)?;
        Err(StoreError::Backend("forced failure".to_string()))
    });
    assert!(result.is_err());

    // All three rows are back untouched.
    assert!(store.client_by_id(c.id).unwrap().is_some());
    assert_eq!(store.forms_for_client(c.id, None).unwrap().len(), 2);
}

#[test]
fn transaction_commits_on_success() {
    let store = SqliteStore::open_in_memory().unwrap();
    let c = client("jane@example.com");
    store.create_client(&c).unwrap();
    store.create_form(&form(c.id, Questionnaire::Bai, "tok-a")).unwrap();

    store
        .in_transaction(&mut |tx| {
            tx.delete_forms_for_client(c.id)?;
            tx.delete_client(c.id)
        })
        .unwrap();

    assert!(store.client_by_id(c.id).unwrap().is_none());
    assert!(store.forms_for_client(c.id, None).unwrap().is_empty());
}
