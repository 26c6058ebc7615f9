#![forbid(unsafe_code)]

use super::*;
use rusqlite::params;
use survey_core::form::EntityKind;
use survey_core::ids::RespondentId;
use survey_core::respondent::Respondent;

impl SqliteStore {
    /// Inserts or refreshes a respondent record. Identity is resolved outside
    /// the store; this only mirrors what the resolver knows.
    pub fn register_respondent(
        &mut self,
        request: RegisterRespondentRequest,
    ) -> Result<Respondent, StoreError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("respondent name must not be empty"));
        }
        if let Some(graduate_year) = request.cohort.graduate_year
            && graduate_year < request.cohort.enrollment_year
        {
            return Err(StoreError::InvalidInput(
                "graduate_year must not precede enrollment_year",
            ));
        }

        let now_ms = self.now_ms();
        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO respondents(id, name, enrollment_year, graduate_year, program, created_at_ms, updated_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            ON CONFLICT(id) DO UPDATE SET
              name=excluded.name,
              enrollment_year=excluded.enrollment_year,
              graduate_year=excluded.graduate_year,
              program=excluded.program,
              updated_at_ms=excluded.updated_at_ms
            "#,
            params![
                request.id.get(),
                name,
                request.cohort.enrollment_year,
                request.cohort.graduate_year,
                request.program.as_ref().map(|program| program.as_str()),
                now_ms,
            ],
        )?;
        tx.commit()?;

        tracing::debug!(respondent_id = request.id.get(), "respondent registered");
        Ok(Respondent {
            id: request.id,
            name: name.to_string(),
            cohort: request.cohort,
            program: request.program,
        })
    }

    pub fn get_respondent(&self, respondent_id: RespondentId) -> Result<Respondent, StoreError> {
        load_respondent(&self.conn, respondent_id)?.ok_or_else(|| {
            StoreError::not_found(EntityKind::Respondent, respondent_id.get())
        })
    }
}
