#![forbid(unsafe_code)]

use super::super::*;
use serde_json::json;
use survey_core::form::{FormDefinition, validate_form};
use survey_core::ids::FormId;

impl SqliteStore {
    /// Validates and persists a new form with its questions and options.
    pub fn create_form(&mut self, definition: FormDefinition) -> Result<FormId, StoreError> {
        if let Err(violation) = validate_form(&definition) {
            tracing::warn!(code = violation.code(), %violation, "form definition rejected");
            return Err(violation.into());
        }

        let now_ms = self.now_ms();
        let tx = self.conn.transaction()?;
        let form_id = insert_form_tx(&tx, &definition.header, now_ms)?;
        for question in &definition.questions {
            insert_question_tx(&tx, form_id, question)?;
        }
        insert_form_event_tx(
            &tx,
            form_id,
            now_ms,
            EVENT_FORM_CREATED,
            &json!({
                "kind": definition.header.kind.as_str(),
                "title": definition.header.title.trim(),
                "questions": definition.questions.len(),
            }),
        )?;
        tx.commit()?;

        tracing::info!(
            form_id = form_id.get(),
            questions = definition.questions.len(),
            "form created"
        );
        Ok(form_id)
    }
}
