#![forbid(unsafe_code)]

mod common;

use common::*;
use rusqlite::Connection;
use std::sync::Arc;
use survey_core::clock::FixedClock;
use survey_storage::{JournalMode, SqliteStore, StoreConfig, StoreError};

#[test]
fn configured_file_name_and_journal_mode_are_used() {
    let config = StoreConfig::from_json_str(
        r#"{"db_file_name": "alumni.db", "journal_mode": "delete", "eligible_lookahead_ms": 0}"#,
    )
    .expect("parse config");
    assert_eq!(config.journal_mode, JournalMode::Delete);

    let mut h = Harness::open_with(ts(2024, 3, 15), config);
    assert_eq!(h.store.storage_dir(), h.dir.path());
    assert!(h.store.storage_dir().join("alumni.db").exists());
    assert_eq!(h.store.config().eligible_lookahead_ms, 0);

    // Without lookahead a form opening tomorrow is not listed yet.
    h.store
        .create_form(definition(
            header("Tomorrow", ts(2024, 3, 16), ts(2024, 4, 16)),
            vec![text(1, "Plans?")],
        ))
        .expect("create form");
    let alum = h.register(1, 2018, None, None);
    assert!(h.store.eligible_forms(alum).expect("eligible").is_empty());
}

#[test]
fn invalid_config_fails_before_touching_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let target = dir.path().join("nested");
    let config = StoreConfig {
        busy_timeout_ms: 0,
        ..StoreConfig::default()
    };

    let err = SqliteStore::open_with(&target, config, Arc::new(FixedClock::new(0)))
        .expect_err("zero busy timeout");
    assert!(matches!(err, StoreError::Config(_)));
    assert_eq!(err.code(), "CONFIG");
    assert!(!target.exists());
}

#[test]
fn reopening_keeps_data() {
    let mut h = Harness::open_at(ts(2024, 3, 15));
    let form_id = h
        .store
        .create_form(definition(
            header("Durable", ts(2024, 3, 1), ts(2024, 4, 1)),
            vec![text(1, "Still here?")],
        ))
        .expect("create form");
    let alum = h.register(7, 2015, Some(2019), Some("law"));

    let reopened = h.reopen();
    assert_eq!(
        reopened.get_form(form_id).expect("get form"),
        h.store.get_form(form_id).expect("get form")
    );
    let respondent = reopened.get_respondent(alum).expect("get respondent");
    assert_eq!(respondent.name, "Alum 7");
    assert_eq!(respondent.cohort.graduate_year, Some(2019));
    assert_eq!(respondent.program.as_ref().map(|p| p.as_str()), Some("law"));
}

#[test]
fn registering_again_refreshes_the_respondent() {
    let mut h = Harness::open_at(ts(2024, 3, 15));
    let alum = h.register(3, 2018, None, None);
    h.register(3, 2018, Some(2022), Some("cs"));

    let respondent = h.store.get_respondent(alum).expect("get respondent");
    assert_eq!(respondent.cohort.graduate_year, Some(2022));

    let err = h
        .store
        .register_respondent(survey_storage::RegisterRespondentRequest {
            id: alum,
            name: "  ".to_string(),
            cohort: respondent.cohort,
            program: None,
        })
        .expect_err("blank name");
    assert_eq!(err.code(), "INVALID_INPUT");
}

#[test]
fn foreign_tables_require_a_reset() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = StoreConfig::default();
    {
        let conn = Connection::open(dir.path().join(&config.db_file_name)).expect("open raw db");
        conn.execute_batch("CREATE TABLE legacy_forms (id INTEGER PRIMARY KEY);")
            .expect("create foreign table");
    }

    let err = SqliteStore::open_with(dir.path(), config, Arc::new(FixedClock::new(0)))
        .expect_err("foreign schema");
    assert_eq!(err.code(), "RESET_REQUIRED");
    assert!(!err.is_retryable());
}
