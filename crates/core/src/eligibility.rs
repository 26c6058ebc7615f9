#![forbid(unsafe_code)]

use crate::clock::calendar_year;
use crate::form::{CohortFilter, FormHeader, TimeWindow};
use crate::respondent::Cohort;
use thiserror::Error;

/// Lower bound applied when a filter only sets its upper side.
pub const OPEN_LOWER_YEAR: i32 = 0;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EligibilityError {
    #[error("form opens at {start_ms}")]
    NotYetOpen { start_ms: i64 },
    #[error("form closed at {end_ms}")]
    Closed { end_ms: i64 },
    #[error("enrollment year {year} outside admission range {from}..={to}")]
    AdmissionYearMismatch { year: i32, from: i32, to: i32 },
    #[error("graduate year {year} outside graduate range {from}..={to}")]
    GraduateYearMismatch { year: i32, from: i32, to: i32 },
    #[error("respondent already responded to this form")]
    AlreadyResponded,
}

impl EligibilityError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotYetOpen { .. } | Self::Closed { .. } => "FORM_NOT_OPEN",
            Self::AdmissionYearMismatch { .. } => "ADMISSION_YEAR_MISMATCH",
            Self::GraduateYearMismatch { .. } => "GRADUATE_YEAR_MISMATCH",
            Self::AlreadyResponded => "ALREADY_RESPONDED",
        }
    }
}

/// Full gate for a submission at `now_ms`. Checks run in a fixed order: time
/// window, admission cohort, graduate cohort, prior response.
pub fn check_eligibility(
    header: &FormHeader,
    cohort: &Cohort,
    now_ms: i64,
    already_responded: bool,
) -> Result<(), EligibilityError> {
    check_window(&header.window, now_ms)?;
    check_cohort(&header.cohort, cohort, calendar_year(now_ms))?;
    if already_responded {
        return Err(EligibilityError::AlreadyResponded);
    }
    Ok(())
}

pub fn check_window(window: &TimeWindow, now_ms: i64) -> Result<(), EligibilityError> {
    if now_ms < window.start_ms {
        return Err(EligibilityError::NotYetOpen {
            start_ms: window.start_ms,
        });
    }
    if now_ms > window.end_ms {
        return Err(EligibilityError::Closed {
            end_ms: window.end_ms,
        });
    }
    Ok(())
}

/// Cohort part of the gate. An unset side of a filter defaults to
/// [`OPEN_LOWER_YEAR`] below and `current_year` above.
pub fn check_cohort(
    filter: &CohortFilter,
    cohort: &Cohort,
    current_year: i32,
) -> Result<(), EligibilityError> {
    if filter.filters_admission() {
        let from = filter.admission_year_from.unwrap_or(OPEN_LOWER_YEAR);
        let to = filter.admission_year_to.unwrap_or(current_year);
        let year = cohort.enrollment_year;
        if year < from || year > to {
            return Err(EligibilityError::AdmissionYearMismatch { year, from, to });
        }
    }

    if filter.filters_graduation()
        && let Some(year) = cohort.graduate_year
    {
        let from = filter.graduate_year_from.unwrap_or(OPEN_LOWER_YEAR);
        let to = filter.graduate_year_to.unwrap_or(current_year);
        if year < from || year > to {
            return Err(EligibilityError::GraduateYearMismatch { year, from, to });
        }
    }

    Ok(())
}

/// Whether a form should be listed to `cohort` at `now_ms`: the cohort
/// matches and `now_ms` falls in the window widened by `lookahead_ms` before
/// the start.
pub fn is_listed(header: &FormHeader, cohort: &Cohort, now_ms: i64, lookahead_ms: i64) -> bool {
    let widened = TimeWindow {
        start_ms: header.window.start_ms.saturating_sub(lookahead_ms.max(0)),
        end_ms: header.window.end_ms,
    };
    widened.contains(now_ms) && check_cohort(&header.cohort, cohort, calendar_year(now_ms)).is_ok()
}
