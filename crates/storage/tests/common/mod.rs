#![forbid(unsafe_code)]
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use survey_core::clock::{FixedClock, date_ms};
use survey_core::form::{
    CohortFilter, FormDefinition, FormHeader, OptionDefinition, QuestionBody, QuestionDefinition,
    TimeWindow,
};
use survey_core::ids::{FormKind, ProgramId, QuestionId, RespondentId};
use survey_core::respondent::Cohort;
use survey_storage::{
    AnswerValue, RegisterRespondentRequest, SqliteStore, StoreConfig, SubmitResponseRequest,
};
use tempfile::TempDir;

pub fn ts(year: i32, month: u8, day: u8) -> i64 {
    date_ms(year, month, day).expect("valid calendar date")
}

/// Store plus the clock driving it. `store` is declared first so it closes
/// before the directory is removed.
pub struct Harness {
    pub store: SqliteStore,
    pub clock: Arc<FixedClock>,
    pub dir: TempDir,
}

impl Harness {
    pub fn open_at(now_ms: i64) -> Self {
        Self::open_with(now_ms, StoreConfig::default())
    }

    pub fn open_with(now_ms: i64, config: StoreConfig) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let clock = Arc::new(FixedClock::new(now_ms));
        let store =
            SqliteStore::open_with(dir.path(), config, clock.clone()).expect("open store");
        Self { store, clock, dir }
    }

    /// Second connection on the same database, sharing the clock.
    pub fn reopen(&self) -> SqliteStore {
        SqliteStore::open_with(
            self.dir.path(),
            self.store.config().clone(),
            self.clock.clone(),
        )
        .expect("reopen store")
    }

    pub fn register(
        &mut self,
        id: i64,
        enrollment_year: i32,
        graduate_year: Option<i32>,
        program: Option<&str>,
    ) -> RespondentId {
        let respondent = self
            .store
            .register_respondent(RegisterRespondentRequest {
                id: RespondentId::new(id),
                name: format!("Alum {id}"),
                cohort: Cohort {
                    enrollment_year,
                    graduate_year,
                },
                program: program.map(|value| ProgramId::try_new(value).expect("program id")),
            })
            .expect("register respondent");
        respondent.id
    }
}

pub fn header(title: &str, start_ms: i64, end_ms: i64) -> FormHeader {
    FormHeader {
        kind: FormKind::try_new("graduation").expect("form kind"),
        title: title.to_string(),
        description: Some(format!("{title} survey")),
        window: TimeWindow { start_ms, end_ms },
        cohort: CohortFilter::default(),
    }
}

pub fn definition(header: FormHeader, questions: Vec<QuestionDefinition>) -> FormDefinition {
    FormDefinition { header, questions }
}

pub fn options(labels: &[&str]) -> Vec<OptionDefinition> {
    labels
        .iter()
        .zip(1u32..)
        .map(|(label, order)| OptionDefinition {
            label: label.to_string(),
            order,
        })
        .collect()
}

pub fn text(order: u32, prompt: &str) -> QuestionDefinition {
    QuestionDefinition {
        order,
        prompt: prompt.to_string(),
        body: QuestionBody::Text,
    }
}

pub fn radio(order: u32, prompt: &str, labels: &[&str]) -> QuestionDefinition {
    QuestionDefinition {
        order,
        prompt: prompt.to_string(),
        body: QuestionBody::Radio {
            options: options(labels),
        },
    }
}

pub fn checkbox(order: u32, prompt: &str, labels: &[&str]) -> QuestionDefinition {
    QuestionDefinition {
        order,
        prompt: prompt.to_string(),
        body: QuestionBody::Checkbox {
            options: options(labels),
        },
    }
}

pub fn range(order: u32, prompt: &str, from: i32, to: i32) -> QuestionDefinition {
    QuestionDefinition {
        order,
        prompt: prompt.to_string(),
        body: QuestionBody::Range {
            from: Some(from),
            to: Some(to),
        },
    }
}

pub fn single(value: &str) -> AnswerValue {
    AnswerValue::Single(value.to_string())
}

pub fn multiple(values: &[&str]) -> AnswerValue {
    AnswerValue::Multiple(values.iter().map(|value| value.to_string()).collect())
}

pub fn submission(
    respondent_id: RespondentId,
    answers: impl IntoIterator<Item = (QuestionId, AnswerValue)>,
) -> SubmitResponseRequest {
    SubmitResponseRequest {
        respondent_id,
        answers: answers.into_iter().collect::<BTreeMap<_, _>>(),
    }
}
