#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use survey_core::ids::{ProgramId, QuestionId, RespondentId};
use survey_core::respondent::Cohort;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRespondentRequest {
    pub id: RespondentId,
    pub name: String,
    #[serde(flatten)]
    pub cohort: Cohort,
    #[serde(default)]
    pub program: Option<ProgramId>,
}

/// A submitted answer: one value, or every selected value of a CHECKBOX.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Multiple(Vec<String>),
}

impl AnswerValue {
    pub fn values(&self) -> &[String] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multiple(values) => values,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponseRequest {
    pub respondent_id: RespondentId,
    pub answers: BTreeMap<QuestionId, AnswerValue>,
}
