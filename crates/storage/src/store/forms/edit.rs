#![forbid(unsafe_code)]

use super::super::*;
use rusqlite::TransactionBehavior;
use serde_json::json;
use survey_core::form::{EditSummary, EntityKind, FormDiff, PersistedSchema};
use survey_core::ids::FormId;

impl SqliteStore {
    /// Applies `diff` to a persisted form in one transaction.
    ///
    /// Self-contained rules are checked before the store is touched; targets
    /// are then resolved against the stored schema inside the same write
    /// transaction that applies the change, so a failure leaves the form as
    /// it was.
    pub fn edit_form(&mut self, form_id: FormId, diff: FormDiff) -> Result<EditSummary, StoreError> {
        let checked = match diff.check() {
            Ok(checked) => checked,
            Err(violation) => {
                tracing::warn!(
                    form_id = form_id.get(),
                    code = violation.code(),
                    %violation,
                    "form edit rejected"
                );
                return Err(violation.into());
            }
        };

        let now_ms = self.now_ms();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(current) = load_form(&tx, form_id)? else {
            return Err(StoreError::not_found(EntityKind::Form, form_id.get()));
        };
        let persisted = PersistedSchema::from_form(&current);

        let plan = match checked.stage(&persisted) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(form_id = form_id.get(), error = %err, "form edit rejected");
                return Err(err.into());
            }
        };
        let summary = plan.summary();
        tracing::debug!(form_id = form_id.get(), ?summary, "form edit staged");

        apply_edit_plan_tx(&tx, form_id, &plan, now_ms)?;
        insert_form_event_tx(
            &tx,
            form_id,
            now_ms,
            EVENT_FORM_EDITED,
            &json!({ "summary": summary }),
        )?;
        tx.commit()?;

        tracing::info!(
            form_id = form_id.get(),
            questions_inserted = summary.questions_inserted,
            questions_updated = summary.questions_updated,
            questions_deleted = summary.questions_deleted,
            "form edited"
        );
        Ok(summary)
    }
}
