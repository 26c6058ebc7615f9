#![forbid(unsafe_code)]

use super::super::{FormEventRow, StoreError};
use rusqlite::{Transaction, params};
use survey_core::ids::FormId;

pub(in crate::store) fn insert_form_event_tx(
    tx: &Transaction<'_>,
    form_id: FormId,
    ts_ms: i64,
    event_type: &str,
    payload: &serde_json::Value,
) -> Result<FormEventRow, StoreError> {
    let payload_json = payload.to_string();
    tx.execute(
        r#"
        INSERT INTO form_events(form_id, ts_ms, type, payload_json)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![form_id.get(), ts_ms, event_type, payload_json],
    )?;
    let seq = tx.last_insert_rowid();
    Ok(FormEventRow {
        seq,
        form_id,
        ts_ms,
        event_type: event_type.to_string(),
        payload_json,
    })
}
