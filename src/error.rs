use thiserror::Error;

use crate::phase::Phase;

/// Errors raised by the date utilities and the schedule generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid date '{input}': expected a real calendar date in YYYY-MM-DD form")]
    InvalidDateFormat { input: String },
    #[error("invalid duration for {phase} phase: {days} days (must be at least 1 and fit within years 0000-9999)")]
    InvalidDurationConfig { phase: Phase, days: i64 },
}

impl ScheduleError {
    pub(crate) fn invalid_date(input: impl Into<String>) -> Self {
        ScheduleError::InvalidDateFormat {
            input: input.into(),
        }
    }

    /// Stable machine-readable code, used by the HTTP layer.
    pub fn code(&self) -> &'static str {
        match self {
            ScheduleError::InvalidDateFormat { .. } => "invalid_date_format",
            ScheduleError::InvalidDurationConfig { .. } => "invalid_duration_config",
        }
    }
}
