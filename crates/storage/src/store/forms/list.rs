#![forbid(unsafe_code)]

use super::super::*;
use rusqlite::params;
use std::collections::BTreeSet;
use survey_core::eligibility::is_listed;
use survey_core::form::{EntityKind, FormSummary};
use survey_core::ids::{FormId, RespondentId};

impl SqliteStore {
    /// Every form, earliest window first.
    pub fn list_forms(&self) -> Result<Vec<FormSummary>, StoreError> {
        let now_ms = self.now_ms();
        let counts = question_counts(&self.conn)?;
        Ok(form_rows(&self.conn)?
            .into_iter()
            .map(|row| summarize(row, &counts, now_ms, false))
            .collect())
    }

    /// Forms the respondent's cohort matches that are open now or open within
    /// the configured lookahead. Answered forms stay listed and are flagged.
    pub fn eligible_forms(
        &self,
        respondent_id: RespondentId,
    ) -> Result<Vec<FormSummary>, StoreError> {
        let Some(respondent) = load_respondent(&self.conn, respondent_id)? else {
            return Err(StoreError::not_found(
                EntityKind::Respondent,
                respondent_id.get(),
            ));
        };

        let now_ms = self.now_ms();
        let lookahead_ms = self.config.eligible_lookahead_ms;
        let answered = answered_forms(&self.conn, respondent_id)?;
        let counts = question_counts(&self.conn)?;

        let out: Vec<FormSummary> = form_rows(&self.conn)?
            .into_iter()
            .filter(|row| is_listed(&row.header, &respondent.cohort, now_ms, lookahead_ms))
            .map(|row| {
                let responded = answered.contains(&row.id);
                summarize(row, &counts, now_ms, responded)
            })
            .collect();

        tracing::debug!(
            respondent_id = respondent_id.get(),
            listed = out.len(),
            "eligible forms resolved"
        );
        Ok(out)
    }
}

fn answered_forms(
    conn: &rusqlite::Connection,
    respondent_id: RespondentId,
) -> Result<BTreeSet<FormId>, StoreError> {
    let mut stmt = conn.prepare("SELECT form_id FROM responses WHERE respondent_id=?1")?;
    let mut rows = stmt.query(params![respondent_id.get()])?;
    let mut out = BTreeSet::new();
    while let Some(row) = rows.next()? {
        out.insert(FormId::new(row.get(0)?));
    }
    Ok(out)
}

fn summarize(
    row: FormRow,
    counts: &std::collections::BTreeMap<FormId, usize>,
    now_ms: i64,
    already_responded: bool,
) -> FormSummary {
    FormSummary {
        id: row.id,
        question_count: counts.get(&row.id).copied().unwrap_or(0),
        opens_in_future: now_ms < row.header.window.start_ms,
        already_responded,
        kind: row.header.kind,
        title: row.header.title,
        description: row.header.description,
        window: row.header.window,
    }
}
