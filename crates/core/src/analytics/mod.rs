#![forbid(unsafe_code)]

mod types;

pub use types::*;

use crate::form::{ChoiceOption, Form, Question, QuestionKind};
use crate::ids::{QuestionId, RespondentId};
use crate::scope::ViewerScope;
use std::collections::{BTreeMap, BTreeSet};

/// Builds the report for `form` from its stored responses.
///
/// `scope` is applied first: out-of-scope respondents contribute neither
/// answers nor the respondent total.
pub fn build_report(
    form: &Form,
    responses: &[ResponseRecord],
    mode: AnalyticsMode,
    scope: &ViewerScope,
) -> AnalyticsReport {
    let scoped: Vec<&ResponseRecord> = responses
        .iter()
        .filter(|record| scope.admits(record.respondent.program.as_ref()))
        .collect();

    if scoped.iter().all(|record| record.answers.is_empty()) {
        return AnalyticsReport::NoResponses { form: form.clone() };
    }

    let total_respondents = scoped.len();
    match mode {
        AnalyticsMode::Summary => AnalyticsReport::Summary {
            form_id: form.id,
            title: form.header.title.clone(),
            total_respondents,
            questions: summarize(form, &scoped, total_respondents),
        },
        AnalyticsMode::PerRespondent => AnalyticsReport::PerRespondent {
            form_id: form.id,
            title: form.header.title.clone(),
            total_respondents,
            rows: respondent_rows(form, &scoped),
        },
    }
}

/// `count / total * 100` rounded to two decimals; zero when `total` is zero.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

type AnswersByQuestion<'a> = BTreeMap<QuestionId, Vec<(RespondentId, &'a str)>>;

fn group_by_question<'a>(records: &[&'a ResponseRecord]) -> AnswersByQuestion<'a> {
    let mut out: AnswersByQuestion<'a> = BTreeMap::new();
    for record in records {
        for answer in &record.answers {
            out.entry(answer.question_id)
                .or_default()
                .push((record.respondent.id, answer.value.as_str()));
        }
    }
    out
}

fn summarize(form: &Form, records: &[&ResponseRecord], total: usize) -> Vec<QuestionStats> {
    let grouped = group_by_question(records);
    let empty = Vec::new();

    form.questions
        .iter()
        .map(|question| {
            let answers = grouped.get(&question.id).unwrap_or(&empty);
            QuestionStats {
                question_id: question.id,
                order: question.order,
                prompt: question.prompt.clone(),
                breakdown: breakdown(question, answers, total),
            }
        })
        .collect()
}

fn breakdown(question: &Question, answers: &[(RespondentId, &str)], total: usize) -> Breakdown {
    match &question.kind {
        QuestionKind::Text => Breakdown::Text {
            answers: answers.iter().map(|(_, value)| value.to_string()).collect(),
        },
        QuestionKind::Radio { options } => Breakdown::Radio {
            options: option_stats(options, answers, total),
        },
        QuestionKind::Checkbox { options } => Breakdown::Checkbox {
            options: option_stats(options, answers, total),
        },
        QuestionKind::Range { .. } => range_stats(answers, total),
    }
}

fn option_stats(
    options: &[ChoiceOption],
    answers: &[(RespondentId, &str)],
    total: usize,
) -> Vec<OptionStats> {
    options
        .iter()
        .map(|option| {
            let selected: BTreeSet<RespondentId> = answers
                .iter()
                .filter(|(_, value)| *value == option.label)
                .map(|(respondent, _)| *respondent)
                .collect();
            OptionStats {
                option_id: option.id,
                label: option.label.clone(),
                selection_count: selected.len(),
                percentage: percentage(selected.len(), total),
            }
        })
        .collect()
}

fn range_stats(answers: &[(RespondentId, &str)], total: usize) -> Breakdown {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    let mut sum = 0i64;
    let mut n = 0usize;
    for (_, raw) in answers {
        // Non-numeric values cannot be placed on the scale.
        let Ok(value) = raw.trim().parse::<i32>() else {
            continue;
        };
        *counts.entry(value).or_default() += 1;
        sum += i64::from(value);
        n += 1;
    }

    let mean = (n > 0).then(|| {
        let raw = sum as f64 / n as f64;
        (raw * 100.0).round() / 100.0
    });

    Breakdown::Range {
        values: counts
            .into_iter()
            .map(|(value, count)| RangeValueStats {
                value,
                count,
                percentage: percentage(count, total),
            })
            .collect(),
        mean,
    }
}

fn respondent_rows(form: &Form, records: &[&ResponseRecord]) -> Vec<RespondentRow> {
    let mut rows: Vec<RespondentRow> = records
        .iter()
        .filter(|record| !record.answers.is_empty())
        .map(|record| {
            let mut by_question: BTreeMap<QuestionId, Vec<String>> = BTreeMap::new();
            for answer in &record.answers {
                by_question
                    .entry(answer.question_id)
                    .or_default()
                    .push(answer.value.clone());
            }
            let answers = form
                .questions
                .iter()
                .filter_map(|question| {
                    by_question
                        .remove(&question.id)
                        .map(|values| RespondentAnswer {
                            question_id: question.id,
                            order: question.order,
                            prompt: question.prompt.clone(),
                            values,
                        })
                })
                .collect();
            let respondent = &record.respondent;
            RespondentRow {
                respondent_id: respondent.id,
                name: respondent.name.clone(),
                enrollment_year: respondent.cohort.enrollment_year,
                graduate_year: respondent.cohort.graduate_year,
                program: respondent.program.clone(),
                submitted_at_ms: record.submitted_at_ms,
                answers,
            }
        })
        .collect();
    rows.sort_by_key(|row| row.respondent_id);
    rows
}
