#![forbid(unsafe_code)]

use super::types::{FormHeader, OptionDefinition, QuestionDefinition, QuestionType};
use crate::ids::{OptionId, QuestionId};
use serde::{Deserialize, Serialize};

/// Requested edit of a persisted form: replacement header plus three disjoint
/// question operation sets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDiff {
    pub header: FormHeader,
    #[serde(default)]
    pub new_questions: Vec<QuestionDefinition>,
    #[serde(default)]
    pub updated_questions: Vec<QuestionUpdate>,
    #[serde(default)]
    pub deleted_questions: Vec<QuestionId>,
}

impl FormDiff {
    /// A diff that only replaces the header.
    pub fn header_only(header: FormHeader) -> Self {
        Self {
            header,
            new_questions: Vec::new(),
            updated_questions: Vec::new(),
            deleted_questions: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionUpdate {
    pub id: QuestionId,
    pub order: u32,
    pub prompt: String,
    #[serde(flatten)]
    pub body: QuestionUpdateBody,
}

/// Target type of an updated question. Choice types carry their option
/// operations; switching to TEXT or RANGE drops every remaining option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionUpdateBody {
    Text,
    Radio {
        #[serde(default)]
        options: OptionDiff,
    },
    Checkbox {
        #[serde(default)]
        options: OptionDiff,
    },
    Range {
        #[serde(default)]
        from: Option<i32>,
        #[serde(default)]
        to: Option<i32>,
    },
}

impl QuestionUpdateBody {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::Text => QuestionType::Text,
            Self::Radio { .. } => QuestionType::Radio,
            Self::Checkbox { .. } => QuestionType::Checkbox,
            Self::Range { .. } => QuestionType::Range,
        }
    }

    pub fn option_diff(&self) -> Option<&OptionDiff> {
        match self {
            Self::Radio { options } | Self::Checkbox { options } => Some(options),
            Self::Text | Self::Range { .. } => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDiff {
    #[serde(default)]
    pub new: Vec<OptionDefinition>,
    #[serde(default)]
    pub updated: Vec<OptionUpdate>,
    #[serde(default)]
    pub deleted: Vec<OptionId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionUpdate {
    pub id: OptionId,
    pub label: String,
    pub order: u32,
}
