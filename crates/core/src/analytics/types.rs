#![forbid(unsafe_code)]

use crate::form::Form;
use crate::ids::{FormId, OptionId, ProgramId, QuestionId, RespondentId};
use crate::respondent::Respondent;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsMode {
    #[default]
    Summary,
    PerRespondent,
}

/// One stored response with its answer rows, as loaded for reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseRecord {
    pub respondent: Respondent,
    pub submitted_at_ms: i64,
    pub answers: Vec<AnswerRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalyticsReport {
    /// Nobody in scope answered anything yet; carries the raw schema.
    NoResponses { form: Form },
    Summary {
        form_id: FormId,
        title: String,
        total_respondents: usize,
        questions: Vec<QuestionStats>,
    },
    PerRespondent {
        form_id: FormId,
        title: String,
        total_respondents: usize,
        rows: Vec<RespondentRow>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestionStats {
    pub question_id: QuestionId,
    pub order: u32,
    pub prompt: String,
    #[serde(flatten)]
    pub breakdown: Breakdown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Breakdown {
    Text { answers: Vec<String> },
    Radio { options: Vec<OptionStats> },
    Checkbox { options: Vec<OptionStats> },
    Range {
        values: Vec<RangeValueStats>,
        mean: Option<f64>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptionStats {
    pub option_id: OptionId,
    pub label: String,
    pub selection_count: usize,
    /// `selection_count / total_respondents * 100`, rounded to two decimals.
    /// Kept numeric; callers that print it use `{:.2}`, so `50.0` renders
    /// as `50.00`.
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeValueStats {
    pub value: i32,
    pub count: usize,
    /// Rounded the same way as [`OptionStats::percentage`].
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentRow {
    pub respondent_id: RespondentId,
    pub name: String,
    pub enrollment_year: i32,
    pub graduate_year: Option<i32>,
    pub program: Option<ProgramId>,
    pub submitted_at_ms: i64,
    pub answers: Vec<RespondentAnswer>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentAnswer {
    pub question_id: QuestionId,
    pub order: u32,
    pub prompt: String,
    pub values: Vec<String>,
}
