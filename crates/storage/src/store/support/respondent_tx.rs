#![forbid(unsafe_code)]

use super::super::StoreError;
use rusqlite::{Connection, OptionalExtension, Row, params};
use survey_core::ids::{FormId, ProgramId, RespondentId};
use survey_core::respondent::{Cohort, Respondent};

pub(in crate::store) const RESPONDENT_COLUMNS: &str =
    "id, name, enrollment_year, graduate_year, program";

pub(in crate::store) fn respondent_from_row(
    row: &Row<'_>,
    offset: usize,
) -> Result<Respondent, StoreError> {
    let program = row
        .get::<_, Option<String>>(offset + 4)?
        .map(ProgramId::try_new)
        .transpose()
        .map_err(|_| StoreError::InvalidInput("invalid program row"))?;
    Ok(Respondent {
        id: RespondentId::new(row.get(offset)?),
        name: row.get(offset + 1)?,
        cohort: Cohort {
            enrollment_year: row.get(offset + 2)?,
            graduate_year: row.get(offset + 3)?,
        },
        program,
    })
}

pub(in crate::store) fn load_respondent(
    conn: &Connection,
    respondent_id: RespondentId,
) -> Result<Option<Respondent>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RESPONDENT_COLUMNS} FROM respondents WHERE id=?1"
    ))?;
    let mut rows = stmt.query(params![respondent_id.get()])?;
    match rows.next()? {
        Some(row) => Ok(Some(respondent_from_row(row, 0)?)),
        None => Ok(None),
    }
}

pub(in crate::store) fn response_exists(
    conn: &Connection,
    form_id: FormId,
    respondent_id: RespondentId,
) -> Result<bool, StoreError> {
    Ok(conn
        .query_row(
            "SELECT 1 FROM responses WHERE form_id=?1 AND respondent_id=?2",
            params![form_id.get(), respondent_id.get()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some())
}
