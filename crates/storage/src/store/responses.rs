#![forbid(unsafe_code)]

use super::*;
use rusqlite::{TransactionBehavior, params};
use serde_json::json;
use survey_core::eligibility::{EligibilityError, check_eligibility};
use survey_core::form::{EntityKind, Form, QuestionKind};
use survey_core::ids::{QuestionId, ResponseId};

impl SqliteStore {
    /// Records one response and its answers atomically.
    ///
    /// The form is resolved from the first answered question. Eligibility is
    /// evaluated inside an immediate transaction, so two concurrent
    /// submissions for the same respondent and form serialize; the loser
    /// fails with [`EligibilityError::AlreadyResponded`].
    pub fn submit_response(
        &mut self,
        request: SubmitResponseRequest,
    ) -> Result<ResponseId, StoreError> {
        let SubmitResponseRequest {
            respondent_id,
            answers,
        } = request;
        let Some(first_question) = answers.keys().next().copied() else {
            return Err(StoreError::InvalidInput(
                "submission must answer at least one question",
            ));
        };
        if answers.values().all(|answer| answer.values().is_empty()) {
            return Err(StoreError::InvalidInput("submission carries no answer values"));
        }

        let now_ms = self.now_ms();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(form_id) = question_form_id(&tx, first_question)? else {
            return Err(StoreError::not_found(
                EntityKind::Question,
                first_question.get(),
            ));
        };
        for question_id in answers.keys().skip(1) {
            match question_form_id(&tx, *question_id)? {
                None => {
                    return Err(StoreError::not_found(
                        EntityKind::Question,
                        question_id.get(),
                    ));
                }
                Some(other) if other != form_id => {
                    return Err(StoreError::InvalidInput(
                        "answered questions must belong to a single form",
                    ));
                }
                Some(_) => {}
            }
        }
        let Some(form) = load_form(&tx, form_id)? else {
            return Err(StoreError::not_found(EntityKind::Form, form_id.get()));
        };
        for (question_id, answer) in &answers {
            check_answer_shape(&form, *question_id, answer)?;
        }

        let Some(respondent) = load_respondent(&tx, respondent_id)? else {
            return Err(StoreError::not_found(
                EntityKind::Respondent,
                respondent_id.get(),
            ));
        };
        let already_responded = response_exists(&tx, form_id, respondent_id)?;
        if let Err(reason) =
            check_eligibility(&form.header, &respondent.cohort, now_ms, already_responded)
        {
            tracing::warn!(
                form_id = form_id.get(),
                respondent_id = respondent_id.get(),
                code = reason.code(),
                "submission rejected"
            );
            return Err(reason.into());
        }

        let insert = tx.execute(
            "INSERT INTO responses(form_id, respondent_id, submitted_at_ms) VALUES (?1, ?2, ?3)",
            params![form_id.get(), respondent_id.get(), now_ms],
        );
        if let Err(err) = insert {
            if is_constraint_violation(&err) {
                tracing::warn!(
                    form_id = form_id.get(),
                    respondent_id = respondent_id.get(),
                    "duplicate submission lost the race"
                );
                return Err(EligibilityError::AlreadyResponded.into());
            }
            return Err(err.into());
        }
        let response_id = ResponseId::new(tx.last_insert_rowid());

        let mut rows = 0usize;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO answers(response_id, question_id, value) VALUES (?1, ?2, ?3)",
            )?;
            for (question_id, answer) in &answers {
                for value in answer.values() {
                    stmt.execute(params![response_id.get(), question_id.get(), value.trim()])?;
                    rows += 1;
                }
            }
        }
        insert_form_event_tx(
            &tx,
            form_id,
            now_ms,
            EVENT_RESPONSE_SUBMITTED,
            &json!({
                "response_id": response_id.get(),
                "respondent_id": respondent_id.get(),
                "answers": rows,
            }),
        )?;
        tx.commit()?;

        tracing::info!(
            form_id = form_id.get(),
            respondent_id = respondent_id.get(),
            response_id = response_id.get(),
            answers = rows,
            "response recorded"
        );
        Ok(response_id)
    }
}

/// Per-question value rules: choices must name an existing option, a RADIO
/// takes one value, a RANGE value must be an integer inside its bounds.
fn check_answer_shape(
    form: &Form,
    question_id: QuestionId,
    answer: &AnswerValue,
) -> Result<(), StoreError> {
    let Some(question) = form.question(question_id) else {
        return Err(StoreError::not_found(EntityKind::Question, question_id.get()));
    };
    let values = answer.values();
    if values.iter().any(|value| value.trim().is_empty()) {
        return Err(StoreError::InvalidInput("answer values must not be empty"));
    }

    match &question.kind {
        QuestionKind::Text => Ok(()),
        QuestionKind::Radio { options } => {
            if values.len() != 1 {
                return Err(StoreError::InvalidInput(
                    "a RADIO answer takes exactly one value",
                ));
            }
            if !options.iter().any(|option| option.label == values[0].trim()) {
                return Err(StoreError::InvalidInput(
                    "answer value does not match any option",
                ));
            }
            Ok(())
        }
        QuestionKind::Checkbox { options } => {
            let unknown = values
                .iter()
                .any(|value| !options.iter().any(|option| option.label == value.trim()));
            if unknown {
                return Err(StoreError::InvalidInput(
                    "answer value does not match any option",
                ));
            }
            let mut seen = std::collections::BTreeSet::new();
            if !values.iter().all(|value| seen.insert(value.trim())) {
                return Err(StoreError::InvalidInput(
                    "a CHECKBOX answer must not repeat a value",
                ));
            }
            Ok(())
        }
        QuestionKind::Range { from, to } => {
            if values.len() != 1 {
                return Err(StoreError::InvalidInput(
                    "a RANGE answer takes exactly one value",
                ));
            }
            match values[0].trim().parse::<i32>() {
                Ok(value) if (*from..=*to).contains(&value) => Ok(()),
                _ => Err(StoreError::InvalidInput(
                    "RANGE answer must be an integer inside the question bounds",
                )),
            }
        }
    }
}
