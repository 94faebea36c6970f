use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::date::{CalendarDate, parse_date};
use crate::error::ScheduleError;
use crate::phase::{Phase, PhaseDurationConfig};

/// A single phase window. Both dates are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePhase {
    pub name: String,
    pub phase: Phase,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
    pub duration: i64,
}

impl SchedulePhase {
    fn spanning(phase: Phase, start_date: CalendarDate, duration: i64) -> Option<Self> {
        let end_date = start_date.checked_add_days(duration - 1)?;
        Some(Self {
            name: phase.label().to_string(),
            phase,
            start_date,
            end_date,
            duration,
        })
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Structural problems found when rebuilding a schedule from external data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleIntegrityError {
    #[error("expected {expected} phases, found {found}")]
    PhaseCount { expected: usize, found: usize },
    #[error("phase #{index} should be {expected}, found {found}")]
    PhaseOrder {
        index: usize,
        expected: Phase,
        found: Phase,
    },
    #[error("{phase} phase has non-positive duration {duration}")]
    NonPositiveDuration { phase: Phase, duration: i64 },
    #[error("{phase} phase ends {end} but {start} + {duration} days - 1 was expected")]
    EndMismatch {
        phase: Phase,
        start: CalendarDate,
        end: CalendarDate,
        duration: i64,
    },
    #[error("{phase} phase starts {start} but the previous phase ended {previous_end}")]
    NotContiguous {
        phase: Phase,
        start: CalendarDate,
        previous_end: CalendarDate,
    },
}

/// Three contiguous phases in planning, shooting, editing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SchedulePhase>", into = "Vec<SchedulePhase>")]
pub struct ScheduleResult {
    phases: [SchedulePhase; 3],
}

impl ScheduleResult {
    /// Rebuilds a schedule from loose phases, checking every invariant that
    /// [`generate_auto_schedule`] guarantees.
    pub fn from_phases(phases: Vec<SchedulePhase>) -> Result<Self, ScheduleIntegrityError> {
        let phases: [SchedulePhase; 3] =
            phases
                .try_into()
                .map_err(|rest: Vec<SchedulePhase>| ScheduleIntegrityError::PhaseCount {
                    expected: Phase::ALL.len(),
                    found: rest.len(),
                })?;
        let schedule = Self { phases };
        schedule.validate_contiguity()?;
        Ok(schedule)
    }

    pub fn validate_contiguity(&self) -> Result<(), ScheduleIntegrityError> {
        let mut previous_end: Option<CalendarDate> = None;
        for (index, (entry, expected)) in self.phases.iter().zip(Phase::ALL).enumerate() {
            if entry.phase != expected {
                return Err(ScheduleIntegrityError::PhaseOrder {
                    index,
                    expected,
                    found: entry.phase,
                });
            }
            if entry.duration < 1 {
                return Err(ScheduleIntegrityError::NonPositiveDuration {
                    phase: entry.phase,
                    duration: entry.duration,
                });
            }
            if entry.start_date.checked_add_days(entry.duration - 1) != Some(entry.end_date) {
                return Err(ScheduleIntegrityError::EndMismatch {
                    phase: entry.phase,
                    start: entry.start_date,
                    end: entry.end_date,
                    duration: entry.duration,
                });
            }
            if let Some(prev) = previous_end {
                if prev.checked_add_days(1) != Some(entry.start_date) {
                    return Err(ScheduleIntegrityError::NotContiguous {
                        phase: entry.phase,
                        start: entry.start_date,
                        previous_end: prev,
                    });
                }
            }
            previous_end = Some(entry.end_date);
        }
        Ok(())
    }

    pub fn phases(&self) -> &[SchedulePhase] {
        &self.phases
    }

    pub fn phase(&self, phase: Phase) -> &SchedulePhase {
        // Order is enforced at construction.
        &self.phases[phase as usize]
    }

    pub fn start_date(&self) -> CalendarDate {
        self.phases[0].start_date
    }

    pub fn end_date(&self) -> CalendarDate {
        self.phases[2].end_date
    }

    pub fn total_duration(&self) -> i64 {
        self.phases.iter().map(|p| p.duration).sum()
    }

    /// The durations this schedule was generated with.
    pub fn config(&self) -> PhaseDurationConfig {
        PhaseDurationConfig::new(
            self.phases[0].duration,
            self.phases[1].duration,
            self.phases[2].duration,
        )
    }

    /// Phase active on `date`, if the date falls inside the schedule.
    pub fn phase_on(&self, date: CalendarDate) -> Option<&SchedulePhase> {
        self.phases.iter().find(|p| p.contains(date))
    }

    pub fn to_cli_summary(&self) -> String {
        format!(
            "{} -> {} ({} days)",
            self.start_date(),
            self.end_date(),
            self.total_duration()
        )
    }
}

impl TryFrom<Vec<SchedulePhase>> for ScheduleResult {
    type Error = ScheduleIntegrityError;

    fn try_from(value: Vec<SchedulePhase>) -> Result<Self, Self::Error> {
        Self::from_phases(value)
    }
}

impl From<ScheduleResult> for Vec<SchedulePhase> {
    fn from(value: ScheduleResult) -> Self {
        value.phases.into()
    }
}

impl<'a> IntoIterator for &'a ScheduleResult {
    type Item = &'a SchedulePhase;
    type IntoIter = std::slice::Iter<'a, SchedulePhase>;

    fn into_iter(self) -> Self::IntoIter {
        self.phases.iter()
    }
}

/// Lays out planning, shooting and editing back to back starting on `anchor`.
///
/// `None` uses [`PhaseDurationConfig::default`]. The anchor is parsed before
/// the config is validated, so an input with both problems reports the date.
pub fn generate_auto_schedule(
    anchor: &str,
    config: Option<&PhaseDurationConfig>,
) -> Result<ScheduleResult, ScheduleError> {
    let anchor = parse_date(anchor)?;
    generate_auto_schedule_from(anchor, config)
}

pub fn generate_auto_schedule_from(
    anchor: CalendarDate,
    config: Option<&PhaseDurationConfig>,
) -> Result<ScheduleResult, ScheduleError> {
    let config = config.copied().unwrap_or_default();
    config.validate()?;

    let build = |phase: Phase, start: CalendarDate| {
        let days = config.days(phase);
        SchedulePhase::spanning(phase, start, days)
            .ok_or(ScheduleError::InvalidDurationConfig { phase, days })
    };
    let next_start = |prev: &SchedulePhase, next: Phase| {
        prev.end_date
            .checked_add_days(1)
            .ok_or(ScheduleError::InvalidDurationConfig {
                phase: next,
                days: config.days(next),
            })
    };

    let planning = build(Phase::Planning, anchor)?;
    let shooting = build(Phase::Shooting, next_start(&planning, Phase::Shooting)?)?;
    let editing = build(Phase::Editing, next_start(&shooting, Phase::Editing)?)?;

    debug!(
        anchor = %anchor,
        planning = config.planning,
        shooting = config.shooting,
        editing = config.editing,
        end = %editing.end_date,
        "generated auto schedule"
    );

    Ok(ScheduleResult {
        phases: [planning, shooting, editing],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> CalendarDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn from_phases_rejects_gaps() {
        let mut phases: Vec<SchedulePhase> = generate_auto_schedule("2025-01-01", None)
            .unwrap()
            .into();
        phases[1].start_date = d("2025-01-09");
        phases[1].end_date = d("2025-01-09");
        let err = ScheduleResult::from_phases(phases).unwrap_err();
        assert!(matches!(
            err,
            ScheduleIntegrityError::NotContiguous {
                phase: Phase::Shooting,
                ..
            }
        ));
    }

    #[test]
    fn from_phases_rejects_wrong_count_and_order() {
        let mut phases: Vec<SchedulePhase> = generate_auto_schedule("2025-01-01", None)
            .unwrap()
            .into();
        let err = ScheduleResult::from_phases(phases[..2].to_vec()).unwrap_err();
        assert_eq!(
            err,
            ScheduleIntegrityError::PhaseCount {
                expected: 3,
                found: 2
            }
        );

        phases.swap(0, 1);
        assert!(matches!(
            ScheduleResult::from_phases(phases).unwrap_err(),
            ScheduleIntegrityError::PhaseOrder { index: 0, .. }
        ));
    }

    #[test]
    fn unrepresentable_span_is_a_duration_error() {
        let config = PhaseDurationConfig::new(i64::MAX, 1, 1);
        let err = generate_auto_schedule("2025-01-01", Some(&config)).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InvalidDurationConfig {
                phase: Phase::Planning,
                days: i64::MAX
            }
        );
    }
}
