#![forbid(unsafe_code)]

use super::super::StoreError;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use std::collections::BTreeMap;
use survey_core::form::{
    ChoiceOption, CohortFilter, EditPlan, Form, FormHeader, OptionDefinition, Question,
    QuestionBody, QuestionDefinition, QuestionKind, QuestionType, StagedQuestionUpdate,
    TimeWindow,
};
use survey_core::ids::{FormId, FormKind, OptionId, QuestionId};

const FORM_COLUMNS: &str = "id, kind, title, description, start_ms, end_ms, \
     admission_year_from, admission_year_to, graduate_year_from, graduate_year_to, \
     created_at_ms, updated_at_ms";

/// A `forms` row without its question tree.
#[derive(Clone, Debug)]
pub(in crate::store) struct FormRow {
    pub(in crate::store) id: FormId,
    pub(in crate::store) header: FormHeader,
    pub(in crate::store) created_at_ms: i64,
    pub(in crate::store) updated_at_ms: i64,
}

struct RawFormRow {
    id: i64,
    kind: String,
    title: String,
    description: Option<String>,
    window: TimeWindow,
    cohort: CohortFilter,
    created_at_ms: i64,
    updated_at_ms: i64,
}

fn raw_form_row(row: &Row<'_>) -> rusqlite::Result<RawFormRow> {
    Ok(RawFormRow {
        id: row.get(0)?,
        kind: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        window: TimeWindow {
            start_ms: row.get(4)?,
            end_ms: row.get(5)?,
        },
        cohort: CohortFilter {
            admission_year_from: row.get(6)?,
            admission_year_to: row.get(7)?,
            graduate_year_from: row.get(8)?,
            graduate_year_to: row.get(9)?,
        },
        created_at_ms: row.get(10)?,
        updated_at_ms: row.get(11)?,
    })
}

impl TryFrom<RawFormRow> for FormRow {
    type Error = StoreError;

    fn try_from(raw: RawFormRow) -> Result<Self, Self::Error> {
        let kind =
            FormKind::try_new(raw.kind).map_err(|_| StoreError::InvalidInput("invalid form kind row"))?;
        Ok(Self {
            id: FormId::new(raw.id),
            header: FormHeader {
                kind,
                title: raw.title,
                description: raw.description,
                window: raw.window,
                cohort: raw.cohort,
            },
            created_at_ms: raw.created_at_ms,
            updated_at_ms: raw.updated_at_ms,
        })
    }
}

pub(in crate::store) fn form_row(
    conn: &Connection,
    form_id: FormId,
) -> Result<Option<FormRow>, StoreError> {
    let raw = conn
        .query_row(
            &format!("SELECT {FORM_COLUMNS} FROM forms WHERE id=?1"),
            params![form_id.get()],
            raw_form_row,
        )
        .optional()?;
    raw.map(FormRow::try_from).transpose()
}

/// Every form, earliest window first.
pub(in crate::store) fn form_rows(conn: &Connection) -> Result<Vec<FormRow>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {FORM_COLUMNS} FROM forms ORDER BY start_ms ASC, id ASC"
    ))?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(FormRow::try_from(raw_form_row(row)?)?);
    }
    Ok(out)
}

pub(in crate::store) fn question_counts(
    conn: &Connection,
) -> Result<BTreeMap<FormId, usize>, StoreError> {
    let mut stmt = conn.prepare("SELECT form_id, COUNT(1) FROM questions GROUP BY form_id")?;
    let mut rows = stmt.query([])?;
    let mut out = BTreeMap::new();
    while let Some(row) = rows.next()? {
        let count = usize::try_from(row.get::<_, i64>(1)?)
            .map_err(|_| StoreError::InvalidInput("invalid question count"))?;
        out.insert(FormId::new(row.get(0)?), count);
    }
    Ok(out)
}

/// Loads a form with its questions and options, each sorted by order.
pub(in crate::store) fn load_form(
    conn: &Connection,
    form_id: FormId,
) -> Result<Option<Form>, StoreError> {
    let Some(row) = form_row(conn, form_id)? else {
        return Ok(None);
    };

    let mut options: BTreeMap<QuestionId, Vec<ChoiceOption>> = BTreeMap::new();
    {
        let mut stmt = conn.prepare(
            r#"
            SELECT o.question_id, o.id, o.label, o.ord
            FROM options o
            JOIN questions q ON q.id = o.question_id
            WHERE q.form_id = ?1
            ORDER BY o.question_id ASC, o.ord ASC, o.id ASC
            "#,
        )?;
        let mut rows = stmt.query(params![form_id.get()])?;
        while let Some(r) = rows.next()? {
            options
                .entry(QuestionId::new(r.get(0)?))
                .or_default()
                .push(ChoiceOption {
                    id: OptionId::new(r.get(1)?),
                    label: r.get(2)?,
                    order: r.get(3)?,
                });
        }
    }

    let mut questions = Vec::new();
    let mut stmt = conn.prepare(
        r#"
        SELECT id, ord, prompt, kind, range_from, range_to
        FROM questions
        WHERE form_id = ?1
        ORDER BY ord ASC, id ASC
        "#,
    )?;
    let mut rows = stmt.query(params![form_id.get()])?;
    while let Some(r) = rows.next()? {
        let id = QuestionId::new(r.get(0)?);
        let kind_raw: String = r.get(3)?;
        let question_type = QuestionType::parse(&kind_raw)
            .ok_or(StoreError::InvalidInput("invalid question kind row"))?;
        let question_options = options.remove(&id).unwrap_or_default();
        let kind = match question_type {
            QuestionType::Text => QuestionKind::Text,
            QuestionType::Radio => QuestionKind::Radio {
                options: question_options,
            },
            QuestionType::Checkbox => QuestionKind::Checkbox {
                options: question_options,
            },
            QuestionType::Range => {
                let from: Option<i32> = r.get(4)?;
                let to: Option<i32> = r.get(5)?;
                let (Some(from), Some(to)) = (from, to) else {
                    return Err(StoreError::InvalidInput("range question row without bounds"));
                };
                QuestionKind::Range { from, to }
            }
        };
        questions.push(Question {
            id,
            order: r.get(1)?,
            prompt: r.get(2)?,
            kind,
        });
    }

    Ok(Some(Form {
        id: row.id,
        header: row.header,
        questions,
        created_at_ms: row.created_at_ms,
        updated_at_ms: row.updated_at_ms,
    }))
}

/// Resolves the owning form of a question.
pub(in crate::store) fn question_form_id(
    conn: &Connection,
    question_id: QuestionId,
) -> Result<Option<FormId>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT form_id FROM questions WHERE id=?1",
            params![question_id.get()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .map(FormId::new))
}

pub(in crate::store) fn insert_form_tx(
    tx: &Transaction<'_>,
    header: &FormHeader,
    now_ms: i64,
) -> Result<FormId, StoreError> {
    tx.execute(
        r#"
        INSERT INTO forms(kind, title, description, start_ms, end_ms,
                          admission_year_from, admission_year_to,
                          graduate_year_from, graduate_year_to,
                          created_at_ms, updated_at_ms)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
        "#,
        params![
            header.kind.as_str(),
            header.title.trim(),
            header.description,
            header.window.start_ms,
            header.window.end_ms,
            header.cohort.admission_year_from,
            header.cohort.admission_year_to,
            header.cohort.graduate_year_from,
            header.cohort.graduate_year_to,
            now_ms,
        ],
    )?;
    Ok(FormId::new(tx.last_insert_rowid()))
}

fn update_form_header_tx(
    tx: &Transaction<'_>,
    form_id: FormId,
    header: &FormHeader,
    now_ms: i64,
) -> Result<(), StoreError> {
    tx.execute(
        r#"
        UPDATE forms
        SET kind=?2, title=?3, description=?4, start_ms=?5, end_ms=?6,
            admission_year_from=?7, admission_year_to=?8,
            graduate_year_from=?9, graduate_year_to=?10,
            updated_at_ms=?11
        WHERE id=?1
        "#,
        params![
            form_id.get(),
            header.kind.as_str(),
            header.title.trim(),
            header.description,
            header.window.start_ms,
            header.window.end_ms,
            header.cohort.admission_year_from,
            header.cohort.admission_year_to,
            header.cohort.graduate_year_from,
            header.cohort.graduate_year_to,
            now_ms,
        ],
    )?;
    Ok(())
}

pub(in crate::store) fn insert_question_tx(
    tx: &Transaction<'_>,
    form_id: FormId,
    question: &QuestionDefinition,
) -> Result<QuestionId, StoreError> {
    let (range_from, range_to) = match &question.body {
        QuestionBody::Range { from, to } => (*from, *to),
        QuestionBody::Text | QuestionBody::Radio { .. } | QuestionBody::Checkbox { .. } => {
            (None, None)
        }
    };
    tx.execute(
        r#"
        INSERT INTO questions(form_id, ord, prompt, kind, range_from, range_to)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            form_id.get(),
            question.order,
            question.prompt.trim(),
            question.body.question_type().as_str(),
            range_from,
            range_to,
        ],
    )?;
    let question_id = QuestionId::new(tx.last_insert_rowid());
    for option in question.body.options() {
        insert_option_tx(tx, question_id, option)?;
    }
    Ok(question_id)
}

fn insert_option_tx(
    tx: &Transaction<'_>,
    question_id: QuestionId,
    option: &OptionDefinition,
) -> Result<OptionId, StoreError> {
    tx.execute(
        "INSERT INTO options(question_id, label, ord) VALUES (?1, ?2, ?3)",
        params![question_id.get(), option.label.trim(), option.order],
    )?;
    Ok(OptionId::new(tx.last_insert_rowid()))
}

fn apply_question_update_tx(
    tx: &Transaction<'_>,
    form_id: FormId,
    update: &StagedQuestionUpdate,
) -> Result<(), StoreError> {
    let (range_from, range_to) = match update.range {
        Some((from, to)) => (Some(from), Some(to)),
        None => (None, None),
    };
    tx.execute(
        r#"
        UPDATE questions
        SET ord=?3, prompt=?4, kind=?5, range_from=?6, range_to=?7
        WHERE id=?1 AND form_id=?2
        "#,
        params![
            update.id.get(),
            form_id.get(),
            update.order,
            update.prompt.trim(),
            update.question_type.as_str(),
            range_from,
            range_to,
        ],
    )?;

    for option_id in &update.delete_options {
        tx.execute(
            "DELETE FROM options WHERE id=?1 AND question_id=?2",
            params![option_id.get(), update.id.get()],
        )?;
    }
    for option in &update.update_options {
        tx.execute(
            "UPDATE options SET label=?3, ord=?4 WHERE id=?1 AND question_id=?2",
            params![
                option.id.get(),
                update.id.get(),
                option.label.trim(),
                option.order
            ],
        )?;
    }
    for option in &update.insert_options {
        insert_option_tx(tx, update.id, option)?;
    }
    Ok(())
}

/// Writes a staged edit. The caller owns the transaction; nothing here commits.
pub(in crate::store) fn apply_edit_plan_tx(
    tx: &Transaction<'_>,
    form_id: FormId,
    plan: &EditPlan,
    now_ms: i64,
) -> Result<(), StoreError> {
    update_form_header_tx(tx, form_id, &plan.header, now_ms)?;

    for question_id in &plan.delete_questions {
        tx.execute(
            "DELETE FROM questions WHERE id=?1 AND form_id=?2",
            params![question_id.get(), form_id.get()],
        )?;
    }
    for update in &plan.update_questions {
        apply_question_update_tx(tx, form_id, update)?;
    }
    for question in &plan.insert_questions {
        insert_question_tx(tx, form_id, question)?;
    }
    Ok(())
}
