#![forbid(unsafe_code)]

use crate::ids::{ProgramId, RespondentId};
use serde::{Deserialize, Serialize};

/// Cohort attributes used for eligibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cohort {
    pub enrollment_year: i32,
    /// `None` while the respondent has not graduated.
    #[serde(default)]
    pub graduate_year: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respondent {
    pub id: RespondentId,
    pub name: String,
    #[serde(flatten)]
    pub cohort: Cohort,
    #[serde(default)]
    pub program: Option<ProgramId>,
}
