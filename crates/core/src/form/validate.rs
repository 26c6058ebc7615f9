#![forbid(unsafe_code)]

use super::types::{FormDefinition, FormHeader, OptionDefinition, QuestionBody, QuestionDefinition};
use crate::ids::{OptionId, QuestionId};
use std::collections::BTreeSet;
use thiserror::Error;

/// A structural rule broken by a form definition or edit.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("start time {start_ms} must be before end time {end_ms}")]
    InvalidTimeWindow { start_ms: i64, end_ms: i64 },
    #[error("admission year range is inverted ({from} > {to})")]
    InvalidAdmissionRange { from: i32, to: i32 },
    #[error("graduate year range is inverted ({from} > {to})")]
    InvalidGraduateRange { from: i32, to: i32 },
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("question order {order} is used more than once")]
    DuplicateQuestionOrder { order: u32 },
    #[error("question order {order} is already taken in the edited form")]
    QuestionOrderCollision { order: u32 },
    #[error("question {order} requires at least one option")]
    MissingOptions { order: u32 },
    #[error("question {question_order} uses option order {order} more than once")]
    DuplicateOptionOrder { question_order: u32, order: u32 },
    #[error("range question {order} requires both bounds")]
    MissingRangeBound { order: u32 },
    #[error("range question {order} has from {from} greater than to {to}")]
    InvalidRange { order: u32, from: i32, to: i32 },
    #[error("question {order} prompt must not be empty")]
    EmptyPrompt { order: u32 },
    #[error("question {question_order} option {order} label must not be empty")]
    EmptyOptionLabel { question_order: u32, order: u32 },
    #[error("question {question_order} has option label {label:?} more than once")]
    DuplicateOptionLabel { question_order: u32, label: String },
    #[error("question {id} is updated more than once")]
    DuplicateQuestionUpdate { id: QuestionId },
    #[error("question {id} is both updated and deleted")]
    QuestionUpdatedAndDeleted { id: QuestionId },
    #[error("option {id} is updated more than once")]
    DuplicateOptionUpdate { id: OptionId },
    #[error("option {id} is both updated and deleted")]
    OptionUpdatedAndDeleted { id: OptionId },
    #[error("question {id} would be left without options")]
    NoOptionsLeft { id: QuestionId },
}

impl SchemaViolation {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTimeWindow { .. } => "INVALID_TIME_WINDOW",
            Self::InvalidAdmissionRange { .. } => "INVALID_ADMISSION_RANGE",
            Self::InvalidGraduateRange { .. } => "INVALID_GRADUATE_RANGE",
            Self::EmptyTitle => "EMPTY_TITLE",
            Self::DuplicateQuestionOrder { .. } => "DUPLICATE_QUESTION_ORDER",
            Self::QuestionOrderCollision { .. } => "QUESTION_ORDER_COLLISION",
            Self::MissingOptions { .. } => "MISSING_OPTIONS",
            Self::DuplicateOptionOrder { .. } => "DUPLICATE_OPTION_ORDER",
            Self::MissingRangeBound { .. } => "MISSING_RANGE_BOUND",
            Self::InvalidRange { .. } => "INVALID_RANGE",
            Self::EmptyPrompt { .. } => "EMPTY_PROMPT",
            Self::EmptyOptionLabel { .. } => "EMPTY_OPTION_LABEL",
            Self::DuplicateOptionLabel { .. } => "DUPLICATE_OPTION_LABEL",
            Self::DuplicateQuestionUpdate { .. } => "DUPLICATE_QUESTION_UPDATE",
            Self::QuestionUpdatedAndDeleted { .. } => "QUESTION_UPDATED_AND_DELETED",
            Self::DuplicateOptionUpdate { .. } => "DUPLICATE_OPTION_UPDATE",
            Self::OptionUpdatedAndDeleted { .. } => "OPTION_UPDATED_AND_DELETED",
            Self::NoOptionsLeft { .. } => "NO_OPTIONS_LEFT",
        }
    }
}

/// First broken rule of `form`, if any.
pub fn validate_form(form: &FormDefinition) -> Result<(), SchemaViolation> {
    match form_violations(form).into_iter().next() {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

/// Every broken rule of `form`, in rule order: header, question order
/// uniqueness, option lists, range bounds, then text fields and label
/// uniqueness.
pub fn form_violations(form: &FormDefinition) -> Vec<SchemaViolation> {
    let mut out = header_violations(&form.header);
    out.extend(question_set_violations(&form.questions));
    out
}

pub fn validate_header(header: &FormHeader) -> Result<(), SchemaViolation> {
    match header_violations(header).into_iter().next() {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

/// Validates `questions` as a standalone set: orders only need to be unique
/// among themselves.
pub fn validate_questions(questions: &[QuestionDefinition]) -> Result<(), SchemaViolation> {
    match question_set_violations(questions).into_iter().next() {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

fn header_violations(header: &FormHeader) -> Vec<SchemaViolation> {
    let mut out = Vec::new();
    let window = header.window;
    if window.start_ms >= window.end_ms {
        out.push(SchemaViolation::InvalidTimeWindow {
            start_ms: window.start_ms,
            end_ms: window.end_ms,
        });
    }
    let cohort = header.cohort;
    if let (Some(from), Some(to)) = (cohort.admission_year_from, cohort.admission_year_to)
        && from > to
    {
        out.push(SchemaViolation::InvalidAdmissionRange { from, to });
    }
    if let (Some(from), Some(to)) = (cohort.graduate_year_from, cohort.graduate_year_to)
        && from > to
    {
        out.push(SchemaViolation::InvalidGraduateRange { from, to });
    }
    if header.title.trim().is_empty() {
        out.push(SchemaViolation::EmptyTitle);
    }
    out
}

fn question_set_violations(questions: &[QuestionDefinition]) -> Vec<SchemaViolation> {
    let mut out = Vec::new();

    if let Some(order) = first_duplicate(questions.iter().map(|question| question.order)) {
        out.push(SchemaViolation::DuplicateQuestionOrder { order });
    }

    for question in questions {
        if let Some(violation) = option_list_violation(question.order, &question.body) {
            out.push(violation);
        }
    }

    for question in questions {
        if let QuestionBody::Range { from, to } = question.body
            && let Err(violation) = check_range(question.order, from, to)
        {
            out.push(violation);
        }
    }

    for question in questions {
        if question.prompt.trim().is_empty() {
            out.push(SchemaViolation::EmptyPrompt {
                order: question.order,
            });
        }
        if let Some(violation) = empty_label(question.order, question.body.options()) {
            out.push(violation);
        }
        let labels = question.body.options().iter().map(|option| option.label.as_str());
        if let Some(violation) = duplicate_label(question.order, labels) {
            out.push(violation);
        }
    }

    out
}

fn option_list_violation(question_order: u32, body: &QuestionBody) -> Option<SchemaViolation> {
    if !body.question_type().is_choice() {
        return None;
    }
    let options = body.options();
    if options.is_empty() {
        return Some(SchemaViolation::MissingOptions {
            order: question_order,
        });
    }
    first_duplicate(options.iter().map(|option| option.order)).map(|order| {
        SchemaViolation::DuplicateOptionOrder {
            question_order,
            order,
        }
    })
}

pub(super) fn check_range(
    order: u32,
    from: Option<i32>,
    to: Option<i32>,
) -> Result<(i32, i32), SchemaViolation> {
    let (Some(from), Some(to)) = (from, to) else {
        return Err(SchemaViolation::MissingRangeBound { order });
    };
    if from > to {
        return Err(SchemaViolation::InvalidRange { order, from, to });
    }
    Ok((from, to))
}

fn empty_label(question_order: u32, options: &[OptionDefinition]) -> Option<SchemaViolation> {
    options
        .iter()
        .find(|option| option.label.trim().is_empty())
        .map(|option| SchemaViolation::EmptyOptionLabel {
            question_order,
            order: option.order,
        })
}

/// Answers are stored by trimmed label, so labels must stay distinct after
/// trimming.
pub(super) fn duplicate_label<'a>(
    question_order: u32,
    labels: impl IntoIterator<Item = &'a str>,
) -> Option<SchemaViolation> {
    let mut seen = BTreeSet::new();
    labels
        .into_iter()
        .map(str::trim)
        .find(|label| !seen.insert(*label))
        .map(|label| SchemaViolation::DuplicateOptionLabel {
            question_order,
            label: label.to_string(),
        })
}

pub(super) fn first_duplicate<T: Ord + Copy>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut seen = BTreeSet::new();
    values.into_iter().find(|value| !seen.insert(*value))
}
