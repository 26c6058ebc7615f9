#![forbid(unsafe_code)]

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Barrier};
use survey_core::eligibility::EligibilityError;
use survey_core::form::{CohortFilter, EntityKind, Form};
use survey_core::ids::{QuestionId, RespondentId};
use survey_storage::{AnswerValue, EVENT_RESPONSE_SUBMITTED, StoreError, SubmitResponseRequest};

fn open_form(h: &mut Harness, cohort: CohortFilter) -> Form {
    let mut form_header = header("Alumni check-in", ts(2024, 3, 1), ts(2024, 4, 1));
    form_header.cohort = cohort;
    let form_id = h
        .store
        .create_form(definition(
            form_header,
            vec![
                radio(1, "Employed?", &["yes", "no"]),
                checkbox(2, "Skills", &["rust", "sql", "go"]),
                range(3, "Satisfaction", 1, 5),
                text(4, "Comments"),
            ],
        ))
        .expect("create form");
    h.store.get_form(form_id).expect("get form")
}

fn full_answers(form: &Form, respondent: RespondentId) -> SubmitResponseRequest {
    submission(
        respondent,
        [
            (form.questions[0].id, single("yes")),
            (form.questions[1].id, multiple(&["rust", "sql"])),
            (form.questions[2].id, single("4")),
            (form.questions[3].id, single("great program")),
        ],
    )
}

#[test]
fn one_response_per_respondent_and_form() {
    let mut h = Harness::open_at(ts(2024, 3, 15));
    let form = open_form(&mut h, CohortFilter::default());
    let alum = h.register(1, 2018, Some(2022), Some("cs"));

    h.store
        .submit_response(full_answers(&form, alum))
        .expect("first submission");
    assert_eq!(h.store.response_count(form.id).expect("count"), 1);

    let err = h
        .store
        .submit_response(full_answers(&form, alum))
        .expect_err("second submission");
    assert!(matches!(
        err,
        StoreError::Ineligible(EligibilityError::AlreadyResponded)
    ));
    assert_eq!(err.code(), "INELIGIBLE");
    assert_eq!(h.store.response_count(form.id).expect("count"), 1);

    let events = h.store.form_events(form.id, 5).expect("form events");
    assert_eq!(events[0].event_type, EVENT_RESPONSE_SUBMITTED);
    let payload: serde_json::Value =
        serde_json::from_str(&events[0].payload_json).expect("payload json");
    // The checkbox answer fans out into two rows.
    assert_eq!(payload["answers"], 5);
}

#[test]
fn unknown_question_is_not_found_and_writes_nothing() {
    let mut h = Harness::open_at(ts(2024, 3, 15));
    let form = open_form(&mut h, CohortFilter::default());
    let alum = h.register(1, 2018, None, None);

    let err = h
        .store
        .submit_response(submission(alum, [(QuestionId::new(9_999), single("x"))]))
        .expect_err("unknown question");
    assert!(matches!(
        err,
        StoreError::NotFound {
            entity: EntityKind::Question,
            id: 9_999
        }
    ));

    let err = h
        .store
        .submit_response(submission(
            alum,
            [
                (form.questions[0].id, single("yes")),
                (QuestionId::new(9_999), single("x")),
            ],
        ))
        .expect_err("unknown trailing question");
    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(h.store.response_count(form.id).expect("count"), 0);
}

#[test]
fn admission_filter_rejects_earlier_cohorts() {
    let mut h = Harness::open_at(ts(2024, 3, 15));
    let form = open_form(
        &mut h,
        CohortFilter {
            admission_year_from: Some(2020),
            ..CohortFilter::default()
        },
    );
    let early = h.register(1, 2019, None, None);
    let later = h.register(2, 2021, None, None);

    let err = h
        .store
        .submit_response(full_answers(&form, early))
        .expect_err("2019 cohort is filtered out");
    assert_eq!(
        err.to_string(),
        StoreError::Ineligible(EligibilityError::AdmissionYearMismatch {
            year: 2019,
            from: 2020,
            to: 2024
        })
        .to_string()
    );
    assert_eq!(h.store.response_count(form.id).expect("count"), 0);

    h.store
        .submit_response(full_answers(&form, later))
        .expect("2021 cohort is admitted");
}

#[test]
fn graduate_filter_skips_respondents_without_graduation() {
    let mut h = Harness::open_at(ts(2024, 3, 15));
    let form = open_form(
        &mut h,
        CohortFilter {
            graduate_year_to: Some(2020),
            ..CohortFilter::default()
        },
    );
    let student = h.register(1, 2022, None, None);
    let recent = h.register(2, 2018, Some(2022), None);

    h.store
        .submit_response(full_answers(&form, student))
        .expect("no graduate year, no graduate check");
    let err = h
        .store
        .submit_response(full_answers(&form, recent))
        .expect_err("graduated after the filter");
    assert!(matches!(
        err,
        StoreError::Ineligible(EligibilityError::GraduateYearMismatch { year: 2022, .. })
    ));
}

#[test]
fn window_is_checked_before_cohort() {
    let mut h = Harness::open_at(ts(2024, 2, 1));
    let form = open_form(
        &mut h,
        CohortFilter {
            admission_year_from: Some(2020),
            ..CohortFilter::default()
        },
    );
    let early = h.register(1, 2019, None, None);

    let err = h
        .store
        .submit_response(full_answers(&form, early))
        .expect_err("not open yet");
    assert!(matches!(
        err,
        StoreError::Ineligible(EligibilityError::NotYetOpen { .. })
    ));

    h.clock.set(ts(2024, 4, 2));
    let err = h
        .store
        .submit_response(full_answers(&form, early))
        .expect_err("closed");
    assert!(matches!(
        err,
        StoreError::Ineligible(EligibilityError::Closed { .. })
    ));
}

#[test]
fn malformed_submissions_are_invalid_input() {
    let mut h = Harness::open_at(ts(2024, 3, 15));
    let form = open_form(&mut h, CohortFilter::default());
    let other = open_form(&mut h, CohortFilter::default());
    let alum = h.register(1, 2018, None, None);

    let cases = [
        submission(alum, Vec::<(QuestionId, AnswerValue)>::new()),
        submission(alum, [(form.questions[1].id, multiple(&[]))]),
        submission(alum, [(form.questions[0].id, single("maybe"))]),
        submission(alum, [(form.questions[0].id, multiple(&["yes", "no"]))]),
        submission(alum, [(form.questions[1].id, multiple(&["rust", "rust"]))]),
        submission(alum, [(form.questions[2].id, single("9"))]),
        submission(alum, [(form.questions[3].id, single("   "))]),
        submission(
            alum,
            [
                (form.questions[3].id, single("mine")),
                (other.questions[3].id, single("theirs")),
            ],
        ),
    ];
    for request in cases {
        let err = h
            .store
            .submit_response(request.clone())
            .expect_err("malformed submission");
        assert_eq!(err.code(), "INVALID_INPUT", "request: {request:?}");
    }
    assert_eq!(h.store.response_count(form.id).expect("count"), 0);

    let err = h
        .store
        .submit_response(full_answers(&form, RespondentId::new(77)))
        .expect_err("unknown respondent");
    assert!(matches!(
        err,
        StoreError::NotFound {
            entity: EntityKind::Respondent,
            id: 77
        }
    ));
}

#[test]
fn eligible_listing_uses_lookahead_and_flags_answered_forms() {
    let mut h = Harness::open_at(ts(2024, 3, 15));
    let open = open_form(&mut h, CohortFilter::default());

    let mut soon = header("Soon", ts(2024, 3, 18), ts(2024, 4, 18));
    soon.kind = survey_core::ids::FormKind::try_new("career").expect("form kind");
    let soon_id = h
        .store
        .create_form(definition(soon, vec![text(1, "Plans?")]))
        .expect("create soon");
    h.store
        .create_form(definition(
            header("Later", ts(2024, 5, 1), ts(2024, 6, 1)),
            vec![text(1, "Plans?")],
        ))
        .expect("create later");
    h.store
        .create_form(definition(
            header("Closed", ts(2024, 1, 1), ts(2024, 2, 1)),
            vec![text(1, "Plans?")],
        ))
        .expect("create closed");
    let mut restricted = header("Restricted", ts(2024, 3, 1), ts(2024, 4, 1));
    restricted.cohort.admission_year_from = Some(2023);
    h.store
        .create_form(definition(restricted, vec![text(1, "Plans?")]))
        .expect("create restricted");

    let alum = h.register(1, 2018, Some(2022), None);
    let listed = h.store.eligible_forms(alum).expect("eligible forms");
    let titles: Vec<&str> = listed.iter().map(|form| form.title.as_str()).collect();
    assert_eq!(titles, vec!["Alumni check-in", "Soon"]);
    assert!(!listed[0].opens_in_future);
    assert!(listed[1].opens_in_future);
    assert_eq!(listed[1].id, soon_id);
    assert!(listed.iter().all(|form| !form.already_responded));

    h.store
        .submit_response(full_answers(&open, alum))
        .expect("submit");
    let listed = h.store.eligible_forms(alum).expect("eligible forms");
    assert!(listed[0].already_responded);
    assert!(!listed[1].already_responded);

    let err = h
        .store
        .eligible_forms(RespondentId::new(404))
        .expect_err("unknown respondent");
    assert_eq!(err.code(), "NOT_FOUND");
}

#[test]
fn concurrent_duplicate_submissions_record_exactly_one() {
    let mut h = Harness::open_at(ts(2024, 3, 15));
    let form = open_form(&mut h, CohortFilter::default());
    let alum = h.register(1, 2018, None, None);

    let barrier = Arc::new(Barrier::new(2));
    let workers: Vec<_> = (0..2)
        .map(|_| {
            let mut store = h.reopen();
            let request = full_answers(&form, alum);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                store.submit_response(request)
            })
        })
        .collect();

    let outcomes: Vec<_> = workers
        .into_iter()
        .map(|worker| worker.join().expect("worker thread"))
        .collect();
    let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert_eq!(successes, 1, "outcomes: {outcomes:?}");
    assert!(outcomes.iter().any(|outcome| matches!(
        outcome,
        Err(StoreError::Ineligible(EligibilityError::AlreadyResponded))
    )));
    assert_eq!(h.store.response_count(form.id).expect("count"), 1);
}
