#![forbid(unsafe_code)]

use super::super::*;
use survey_core::form::{EntityKind, Form};
use survey_core::ids::FormId;

impl SqliteStore {
    pub fn get_form(&self, form_id: FormId) -> Result<Form, StoreError> {
        load_form(&self.conn, form_id)?
            .ok_or_else(|| StoreError::not_found(EntityKind::Form, form_id.get()))
    }
}
