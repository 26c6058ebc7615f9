#![forbid(unsafe_code)]

use super::super::*;
use rusqlite::params;
use serde_json::json;
use survey_core::form::EntityKind;
use survey_core::ids::FormId;

impl SqliteStore {
    /// Deletes a form outside its window, cascading to questions, options,
    /// responses and answers.
    pub fn delete_form(&mut self, form_id: FormId) -> Result<FormId, StoreError> {
        let now_ms = self.now_ms();
        let tx = self.conn.transaction()?;
        let Some(row) = form_row(&tx, form_id)? else {
            return Err(StoreError::not_found(EntityKind::Form, form_id.get()));
        };
        if row.header.window.contains(now_ms) {
            tracing::warn!(form_id = form_id.get(), now_ms, "form delete refused in active period");
            return Err(StoreError::ActivePeriod { form_id });
        }

        let responses = tx.query_row(
            "SELECT COUNT(1) FROM responses WHERE form_id=?1",
            params![form_id.get()],
            |row| row.get::<_, i64>(0),
        )?;
        tx.execute("DELETE FROM forms WHERE id=?1", params![form_id.get()])?;
        insert_form_event_tx(
            &tx,
            form_id,
            now_ms,
            EVENT_FORM_DELETED,
            &json!({ "title": row.header.title, "responses": responses }),
        )?;
        tx.commit()?;

        tracing::info!(form_id = form_id.get(), responses, "form deleted");
        Ok(form_id)
    }
}
