#![forbid(unsafe_code)]

use super::*;
use rusqlite::{Connection, params};
use std::collections::BTreeMap;
use survey_core::analytics::{
    AnalyticsMode, AnalyticsReport, AnswerRecord, ResponseRecord, build_report,
};
use survey_core::form::EntityKind;
use survey_core::ids::{FormId, QuestionId};
use survey_core::scope::ViewerScope;

impl SqliteStore {
    /// Aggregates the stored responses of a form for a viewer limited to `scope`.
    pub fn form_analytics(
        &self,
        form_id: FormId,
        mode: AnalyticsMode,
        scope: &ViewerScope,
    ) -> Result<AnalyticsReport, StoreError> {
        let Some(form) = load_form(&self.conn, form_id)? else {
            return Err(StoreError::not_found(EntityKind::Form, form_id.get()));
        };
        let records = response_records(&self.conn, form_id)?;
        tracing::debug!(
            form_id = form_id.get(),
            responses = records.len(),
            ?mode,
            "analytics inputs loaded"
        );
        Ok(build_report(&form, &records, mode, scope))
    }

    /// Number of respondents that answered the form.
    pub fn response_count(&self, form_id: FormId) -> Result<usize, StoreError> {
        if form_row(&self.conn, form_id)?.is_none() {
            return Err(StoreError::not_found(EntityKind::Form, form_id.get()));
        }
        let count = self.conn.query_row(
            "SELECT COUNT(DISTINCT respondent_id) FROM responses WHERE form_id=?1",
            params![form_id.get()],
            |row| row.get::<_, i64>(0),
        )?;
        usize::try_from(count).map_err(|_| StoreError::InvalidInput("invalid response count"))
    }
}

fn response_records(
    conn: &Connection,
    form_id: FormId,
) -> Result<Vec<ResponseRecord>, StoreError> {
    let mut answers: BTreeMap<i64, Vec<AnswerRecord>> = BTreeMap::new();
    {
        let mut stmt = conn.prepare(
            r#"
            SELECT a.response_id, a.question_id, a.value
            FROM answers a
            JOIN responses r ON r.id = a.response_id
            WHERE r.form_id = ?1
            ORDER BY a.response_id ASC, a.id ASC
            "#,
        )?;
        let mut rows = stmt.query(params![form_id.get()])?;
        while let Some(row) = rows.next()? {
            answers
                .entry(row.get(0)?)
                .or_default()
                .push(AnswerRecord {
                    question_id: QuestionId::new(row.get(1)?),
                    value: row.get(2)?,
                });
        }
    }

    let mut stmt = conn.prepare(&format!(
        r#"
        SELECT r.id, r.submitted_at_ms, {columns}
        FROM responses r
        JOIN respondents p ON p.id = r.respondent_id
        WHERE r.form_id = ?1
        ORDER BY r.id ASC
        "#,
        columns = prefixed_respondent_columns("p"),
    ))?;
    let mut rows = stmt.query(params![form_id.get()])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let response_id: i64 = row.get(0)?;
        out.push(ResponseRecord {
            respondent: respondent_from_row(row, 2)?,
            submitted_at_ms: row.get(1)?,
            answers: answers.remove(&response_id).unwrap_or_default(),
        });
    }
    Ok(out)
}

fn prefixed_respondent_columns(alias: &str) -> String {
    RESPONDENT_COLUMNS
        .split(", ")
        .map(|column| format!("{alias}.{column}"))
        .collect::<Vec<_>>()
        .join(", ")
}
