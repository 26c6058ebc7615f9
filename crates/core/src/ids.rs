#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! row_id {
    ($name:ident) => {
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(FormId);
row_id!(QuestionId);
row_id!(OptionId);
row_id!(RespondentId);
row_id!(ResponseId);

/// Free-form category tag of a form (e.g. "graduation", "career").
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FormKind(String);

impl FormKind {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn try_new(value: impl Into<String>) -> Result<Self, FormKindError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(FormKindError::Empty);
        }
        if trimmed.len() > 64 {
            return Err(FormKindError::TooLong);
        }
        if trimmed.chars().any(|c| c.is_control()) {
            return Err(FormKindError::ContainsControl);
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for FormKind {
    type Error = FormKindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<FormKind> for String {
    fn from(value: FormKind) -> Self {
        value.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FormKindError {
    #[error("form kind must not be empty")]
    Empty,
    #[error("form kind is too long")]
    TooLong,
    #[error("form kind contains control characters")]
    ContainsControl,
}

/// Program (department/major) a respondent belongs to; also the unit a scoped
/// viewer is bound to.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProgramId(String);

impl ProgramId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn try_new(value: impl Into<String>) -> Result<Self, ProgramIdError> {
        let value = value.into();
        validate_program_id(&value)?;
        Ok(Self(value))
    }
}

impl TryFrom<String> for ProgramId {
    type Error = ProgramIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<ProgramId> for String {
    fn from(value: ProgramId) -> Self {
        value.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProgramIdError {
    #[error("program id must not be empty")]
    Empty,
    #[error("program id is too long")]
    TooLong,
    #[error("program id has invalid character {ch:?} at {index}")]
    InvalidChar { ch: char, index: usize },
}

fn validate_program_id(value: &str) -> Result<(), ProgramIdError> {
    if value.is_empty() {
        return Err(ProgramIdError::Empty);
    }
    if value.len() > 64 {
        return Err(ProgramIdError::TooLong);
    }
    for (index, ch) in value.chars().enumerate() {
        if ch.is_alphanumeric() || matches!(ch, '.' | '_' | '-') {
            continue;
        }
        return Err(ProgramIdError::InvalidChar { ch, index });
    }
    Ok(())
}
