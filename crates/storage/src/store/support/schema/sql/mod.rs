#![forbid(unsafe_code)]

mod core;
mod events;
mod forms;
mod indexes;
mod responses;

pub(super) const TABLES: &[&str] = &[
    "store_state",
    "forms",
    "questions",
    "options",
    "respondents",
    "responses",
    "answers",
    "form_events",
];

pub(super) fn full_schema_sql() -> String {
    let mut sql = String::new();
    sql.push_str(core::SQL);
    sql.push_str(forms::SQL);
    sql.push_str(responses::SQL);
    sql.push_str(events::SQL);
    sql.push_str(indexes::SQL);
    sql
}
