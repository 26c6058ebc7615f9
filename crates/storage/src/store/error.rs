#![forbid(unsafe_code)]

use survey_core::eligibility::EligibilityError;
use survey_core::form::{EntityKind, ReconcileError, ReferentialError, SchemaViolation};
use survey_core::ids::FormId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("config: {0}")]
    Config(String),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("schema violation: {0}")]
    Schema(#[from] SchemaViolation),
    #[error(transparent)]
    Referential(#[from] ReferentialError),
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: i64 },
    #[error("not eligible: {0}")]
    Ineligible(#[from] EligibilityError),
    #[error("form {form_id} is inside its active period")]
    ActivePeriod { form_id: FormId },
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO",
            Self::Sql(_) => "STORE",
            Self::Config(_) => "CONFIG",
            Self::InvalidInput(message) if message.starts_with("RESET_REQUIRED") => {
                "RESET_REQUIRED"
            }
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Schema(_) => "STRUCTURAL_VALIDATION",
            Self::Referential(_) => "ENTITY_NOT_FOUND_FOR_EDIT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Ineligible(_) => "INELIGIBLE",
            Self::ActivePeriod { .. } => "ACTIVE_PERIOD",
        }
    }

    /// Transient store failures are the only ones worth retrying as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Sql(_) | Self::Io(_))
    }

    pub(crate) fn not_found(entity: EntityKind, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<ReconcileError> for StoreError {
    fn from(value: ReconcileError) -> Self {
        match value {
            ReconcileError::Structural(violation) => Self::Schema(violation),
            ReconcileError::Referential(missing) => Self::Referential(missing),
        }
    }
}
