#![forbid(unsafe_code)]

use serde::Serialize;
use survey_core::ids::FormId;

/// One entry of a form's audit trail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FormEventRow {
    pub seq: i64,
    pub form_id: FormId,
    pub ts_ms: i64,
    pub event_type: String,
    pub payload_json: String,
}

impl FormEventRow {
    pub fn event_id(&self) -> String {
        format!("evt_{:016}", self.seq)
    }
}

pub const EVENT_FORM_CREATED: &str = "form_created";
pub const EVENT_FORM_EDITED: &str = "form_edited";
pub const EVENT_FORM_DELETED: &str = "form_deleted";
pub const EVENT_RESPONSE_SUBMITTED: &str = "response_submitted";
