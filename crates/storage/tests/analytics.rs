#![forbid(unsafe_code)]

mod common;

use common::*;
use pretty_assertions::assert_eq;
use survey_core::analytics::{AnalyticsMode, AnalyticsReport, Breakdown};
use survey_core::form::{EntityKind, Form, FormDiff};
use survey_core::ids::{FormId, ProgramId};
use survey_core::scope::ViewerScope;
use survey_storage::StoreError;

fn surveyed() -> (Harness, Form) {
    let mut h = Harness::open_at(ts(2024, 3, 15));
    let form_id = h
        .store
        .create_form(definition(
            header("Outcomes", ts(2024, 3, 1), ts(2024, 4, 1)),
            vec![
                radio(1, "Employed?", &["yes", "no"]),
                checkbox(2, "Skills", &["rust", "sql"]),
                text(3, "Comments"),
                range(4, "Satisfaction", 1, 5),
            ],
        ))
        .expect("create form");
    let form = h.store.get_form(form_id).expect("get form");
    let q = |index: usize| form.questions[index].id;

    let ada = h.register(1, 2016, Some(2020), Some("cs"));
    let bo = h.register(2, 2017, Some(2021), Some("cs"));
    let cy = h.register(3, 2017, Some(2021), Some("math"));

    h.store
        .submit_response(submission(
            ada,
            [
                (q(0), single("yes")),
                (q(1), multiple(&["rust", "sql"])),
                (q(2), single("great")),
                (q(3), single("5")),
            ],
        ))
        .expect("submit ada");
    h.store
        .submit_response(submission(
            bo,
            [(q(0), single("no")), (q(1), multiple(&["rust"])), (q(3), single("3"))],
        ))
        .expect("submit bo");
    h.store
        .submit_response(submission(cy, [(q(2), single("ok")), (q(3), single("4"))]))
        .expect("submit cy");

    (h, form)
}

#[test]
fn summary_reports_counts_and_rounded_percentages() {
    let (h, form) = surveyed();
    let report = h
        .store
        .form_analytics(form.id, AnalyticsMode::Summary, &ViewerScope::All)
        .expect("analytics");
    let AnalyticsReport::Summary {
        total_respondents,
        questions,
        title,
        ..
    } = report
    else {
        panic!("expected summary report");
    };
    assert_eq!(title, "Outcomes");
    assert_eq!(total_respondents, 3);

    let Breakdown::Radio { options } = &questions[0].breakdown else {
        panic!("expected radio breakdown");
    };
    let split: Vec<(&str, usize, f64)> = options
        .iter()
        .map(|o| (o.label.as_str(), o.selection_count, o.percentage))
        .collect();
    assert_eq!(split, vec![("yes", 1, 33.33), ("no", 1, 33.33)]);
    let radio_total: f64 = options.iter().map(|o| o.percentage).sum();
    assert!(radio_total <= 100.0);

    let Breakdown::Checkbox { options } = &questions[1].breakdown else {
        panic!("expected checkbox breakdown");
    };
    assert_eq!(options[0].selection_count, 2);
    assert_eq!(options[0].percentage, 66.67);

    assert_eq!(
        questions[2].breakdown,
        Breakdown::Text {
            answers: vec!["great".to_string(), "ok".to_string()]
        }
    );

    let Breakdown::Range { mean, values } = &questions[3].breakdown else {
        panic!("expected range breakdown");
    };
    assert_eq!(*mean, Some(4.0));
    assert_eq!(values.len(), 3);
}

#[test]
fn program_scope_narrows_totals() {
    let (h, form) = surveyed();
    let scope = ViewerScope::Program(ProgramId::try_new("cs").expect("program id"));
    let report = h
        .store
        .form_analytics(form.id, AnalyticsMode::Summary, &scope)
        .expect("analytics");
    let AnalyticsReport::Summary {
        total_respondents,
        questions,
        ..
    } = report
    else {
        panic!("expected summary report");
    };
    assert_eq!(total_respondents, 2);
    assert_eq!(
        questions[2].breakdown,
        Breakdown::Text {
            answers: vec!["great".to_string()]
        }
    );

    let report = h
        .store
        .form_analytics(form.id, AnalyticsMode::PerRespondent, &scope)
        .expect("analytics");
    let AnalyticsReport::PerRespondent { rows, .. } = report else {
        panic!("expected per-respondent report");
    };
    let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, vec!["Alum 1", "Alum 2"]);
}

#[test]
fn per_respondent_rows_carry_cohort_and_ordered_answers() {
    let (h, form) = surveyed();
    let report = h
        .store
        .form_analytics(form.id, AnalyticsMode::PerRespondent, &ViewerScope::All)
        .expect("analytics");
    let AnalyticsReport::PerRespondent {
        total_respondents,
        rows,
        ..
    } = report
    else {
        panic!("expected per-respondent report");
    };
    assert_eq!(total_respondents, 3);
    assert_eq!(rows.len(), 3);

    let ada = &rows[0];
    assert_eq!(ada.enrollment_year, 2016);
    assert_eq!(ada.graduate_year, Some(2020));
    assert_eq!(ada.submitted_at_ms, ts(2024, 3, 15));
    let prompts: Vec<&str> = ada.answers.iter().map(|a| a.prompt.as_str()).collect();
    assert_eq!(prompts, vec!["Employed?", "Skills", "Comments", "Satisfaction"]);
    assert_eq!(ada.answers[1].values, vec!["rust".to_string(), "sql".to_string()]);

    let cy = &rows[2];
    let orders: Vec<u32> = cy.answers.iter().map(|a| a.order).collect();
    assert_eq!(orders, vec![3, 4]);
}

#[test]
fn form_without_answers_returns_its_schema() {
    let mut h = Harness::open_at(ts(2024, 3, 15));
    let form_id = h
        .store
        .create_form(definition(
            header("Quiet", ts(2024, 3, 1), ts(2024, 4, 1)),
            vec![radio(1, "Anyone?", &["yes"])],
        ))
        .expect("create form");

    let report = h
        .store
        .form_analytics(form_id, AnalyticsMode::Summary, &ViewerScope::All)
        .expect("analytics");
    assert_eq!(
        report,
        AnalyticsReport::NoResponses {
            form: h.store.get_form(form_id).expect("get form")
        }
    );

    let err = h
        .store
        .form_analytics(FormId::new(9_999), AnalyticsMode::Summary, &ViewerScope::All)
        .expect_err("unknown form");
    assert!(matches!(
        err,
        StoreError::NotFound {
            entity: EntityKind::Form,
            ..
        }
    ));
}

#[test]
fn deleting_a_question_drops_its_answers() {
    let (mut h, form) = surveyed();
    let comments = form.questions[2].id;
    h.store
        .edit_form(
            form.id,
            FormDiff {
                header: form.header.clone(),
                new_questions: Vec::new(),
                updated_questions: Vec::new(),
                deleted_questions: vec![comments],
            },
        )
        .expect("edit form");

    let report = h
        .store
        .form_analytics(form.id, AnalyticsMode::Summary, &ViewerScope::All)
        .expect("analytics");
    let AnalyticsReport::Summary {
        total_respondents,
        questions,
        ..
    } = report
    else {
        panic!("expected summary report");
    };
    assert_eq!(total_respondents, 3);
    assert_eq!(questions.len(), 3);
    assert!(
        questions
            .iter()
            .all(|question| !matches!(question.breakdown, Breakdown::Text { .. }))
    );
}
