#![forbid(unsafe_code)]

pub mod analytics;
pub mod clock;
pub mod eligibility;
pub mod form;
pub mod ids;
pub mod respondent;
pub mod scope;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ids::{FormId, FormKind, OptionId, ProgramId, QuestionId, RespondentId, ResponseId};
pub use respondent::{Cohort, Respondent};
pub use scope::ViewerScope;
