#![forbid(unsafe_code)]

mod diff;
mod reconcile;
mod types;
mod validate;

pub use diff::*;
pub use reconcile::*;
pub use types::*;
pub use validate::{SchemaViolation, form_violations, validate_form, validate_header, validate_questions};
