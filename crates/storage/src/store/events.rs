#![forbid(unsafe_code)]

use super::*;
use rusqlite::params;
use survey_core::ids::FormId;

impl SqliteStore {
    /// Most recent audit events of a form, newest first. Events of deleted
    /// forms remain readable.
    pub fn form_events(&self, form_id: FormId, limit: usize) -> Result<Vec<FormEventRow>, StoreError> {
        let limit = to_sqlite_i64(limit)?;
        let mut stmt = self.conn.prepare(
            r#"
            SELECT seq, form_id, ts_ms, type, payload_json
            FROM form_events
            WHERE form_id = ?1
            ORDER BY seq DESC
            LIMIT ?2
            "#,
        )?;
        let mut rows = stmt.query(params![form_id.get(), limit])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(FormEventRow {
                seq: row.get(0)?,
                form_id: FormId::new(row.get(1)?),
                ts_ms: row.get(2)?,
                event_type: row.get(3)?,
                payload_json: row.get(4)?,
            });
        }
        Ok(out)
    }
}
