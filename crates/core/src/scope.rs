#![forbid(unsafe_code)]

use crate::ids::ProgramId;
use serde::{Deserialize, Serialize};

/// What slice of respondents a caller may see in reports.
///
/// Resolved by the host's identity layer and passed explicitly into every
/// analytics call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "program", rename_all = "snake_case")]
pub enum ViewerScope {
    #[default]
    All,
    Program(ProgramId),
}

impl ViewerScope {
    pub fn admits(&self, program: Option<&ProgramId>) -> bool {
        match self {
            Self::All => true,
            Self::Program(scoped) => program == Some(scoped),
        }
    }
}
