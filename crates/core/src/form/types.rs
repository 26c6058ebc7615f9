#![forbid(unsafe_code)]

use crate::ids::{FormId, FormKind, OptionId, QuestionId};
use serde::{Deserialize, Serialize};

/// Open/close instants of a form, epoch milliseconds, both inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeWindow {
    pub fn contains(&self, ts_ms: i64) -> bool {
        self.start_ms <= ts_ms && ts_ms <= self.end_ms
    }
}

/// Cohort eligibility bounds. `None` leaves that side unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortFilter {
    #[serde(default)]
    pub admission_year_from: Option<i32>,
    #[serde(default)]
    pub admission_year_to: Option<i32>,
    #[serde(default)]
    pub graduate_year_from: Option<i32>,
    #[serde(default)]
    pub graduate_year_to: Option<i32>,
}

impl CohortFilter {
    pub fn filters_admission(&self) -> bool {
        self.admission_year_from.is_some() || self.admission_year_to.is_some()
    }

    pub fn filters_graduation(&self) -> bool {
        self.graduate_year_from.is_some() || self.graduate_year_to.is_some()
    }
}

/// Scalar fields of a form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormHeader {
    pub kind: FormKind,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub window: TimeWindow,
    #[serde(default)]
    pub cohort: CohortFilter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    Text,
    Radio,
    Checkbox,
    Range,
}

impl QuestionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Radio => "RADIO",
            Self::Checkbox => "CHECKBOX",
            Self::Range => "RANGE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "TEXT" => Some(Self::Text),
            "RADIO" => Some(Self::Radio),
            "CHECKBOX" => Some(Self::Checkbox),
            "RANGE" => Some(Self::Range),
            _ => None,
        }
    }

    pub fn is_choice(self) -> bool {
        matches!(self, Self::Radio | Self::Checkbox)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDefinition {
    pub label: String,
    pub order: u32,
}

/// Type-specific part of a question as submitted by an author.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionBody {
    Text,
    Radio {
        #[serde(default)]
        options: Vec<OptionDefinition>,
    },
    Checkbox {
        #[serde(default)]
        options: Vec<OptionDefinition>,
    },
    Range {
        #[serde(default)]
        from: Option<i32>,
        #[serde(default)]
        to: Option<i32>,
    },
}

impl QuestionBody {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::Text => QuestionType::Text,
            Self::Radio { .. } => QuestionType::Radio,
            Self::Checkbox { .. } => QuestionType::Checkbox,
            Self::Range { .. } => QuestionType::Range,
        }
    }

    pub fn options(&self) -> &[OptionDefinition] {
        match self {
            Self::Radio { options } | Self::Checkbox { options } => options,
            Self::Text | Self::Range { .. } => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub order: u32,
    pub prompt: String,
    #[serde(flatten)]
    pub body: QuestionBody,
}

/// A complete form as submitted to `create`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    #[serde(flatten)]
    pub header: FormHeader,
    #[serde(default)]
    pub questions: Vec<QuestionDefinition>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: OptionId,
    pub label: String,
    pub order: u32,
}

/// Type-specific part of a persisted question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionKind {
    Text,
    Radio { options: Vec<ChoiceOption> },
    Checkbox { options: Vec<ChoiceOption> },
    Range { from: i32, to: i32 },
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::Text => QuestionType::Text,
            Self::Radio { .. } => QuestionType::Radio,
            Self::Checkbox { .. } => QuestionType::Checkbox,
            Self::Range { .. } => QuestionType::Range,
        }
    }

    pub fn options(&self) -> &[ChoiceOption] {
        match self {
            Self::Radio { options } | Self::Checkbox { options } => options,
            Self::Text | Self::Range { .. } => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub order: u32,
    pub prompt: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// A persisted form with its question tree, questions and options sorted by order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    #[serde(flatten)]
    pub header: FormHeader,
    pub questions: Vec<Question>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Form {
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }
}

/// Listing entry for a form, without its question tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSummary {
    pub id: FormId,
    pub kind: FormKind,
    pub title: String,
    pub description: Option<String>,
    pub window: TimeWindow,
    pub question_count: usize,
    /// Listed through the lookahead window but not yet accepting responses.
    pub opens_in_future: bool,
    pub already_responded: bool,
}
