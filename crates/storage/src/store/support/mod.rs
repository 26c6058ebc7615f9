#![forbid(unsafe_code)]

mod events_tx;
mod form_tx;
mod respondent_tx;
mod schema;

pub(super) use events_tx::*;
pub(super) use form_tx::*;
pub(super) use respondent_tx::*;
pub(super) use schema::{install_schema, preflight_gate};
