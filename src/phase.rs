use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScheduleError;

/// One of the three sequential production stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Planning,
    Shooting,
    Editing,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Planning, Phase::Shooting, Phase::Editing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Planning => "planning",
            Phase::Shooting => "shooting",
            Phase::Editing => "editing",
        }
    }

    /// Label shown to users of the project-creation flow.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Planning => "기획",
            Phase::Shooting => "촬영",
            Phase::Editing => "편집",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|phase| phase.label() == label)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planning" => Ok(Phase::Planning),
            "shooting" => Ok(Phase::Shooting),
            "editing" => Ok(Phase::Editing),
            _ => Err(()),
        }
    }
}

/// Number of days allotted to each phase.
///
/// Values are plain integers so configs read from JSON, env vars or the CLI
/// can hold bad input; call [`PhaseDurationConfig::validate`] (every consumer
/// in this crate does) before relying on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurationConfig {
    pub planning: i64,
    pub shooting: i64,
    pub editing: i64,
}

impl PhaseDurationConfig {
    pub const DEFAULT_PLANNING_DAYS: i64 = 7;
    pub const DEFAULT_SHOOTING_DAYS: i64 = 1;
    pub const DEFAULT_EDITING_DAYS: i64 = 14;

    pub fn new(planning: i64, shooting: i64, editing: i64) -> Self {
        Self {
            planning,
            shooting,
            editing,
        }
    }

    pub fn days(&self, phase: Phase) -> i64 {
        match phase {
            Phase::Planning => self.planning,
            Phase::Shooting => self.shooting,
            Phase::Editing => self.editing,
        }
    }

    pub fn set_days(&mut self, phase: Phase, days: i64) {
        match phase {
            Phase::Planning => self.planning = days,
            Phase::Shooting => self.shooting = days,
            Phase::Editing => self.editing = days,
        }
    }

    /// Checks phases in order and reports the first non-positive duration.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for phase in Phase::ALL {
            let days = self.days(phase);
            if days < 1 {
                return Err(ScheduleError::InvalidDurationConfig { phase, days });
            }
        }
        Ok(())
    }

    /// Sum of the three durations. The phase whose addition overflows `i64`
    /// is reported as [`ScheduleError::InvalidDurationConfig`].
    pub fn total_days(&self) -> Result<i64, ScheduleError> {
        self.validate()?;
        Phase::ALL.into_iter().try_fold(0i64, |total, phase| {
            let days = self.days(phase);
            total
                .checked_add(days)
                .ok_or(ScheduleError::InvalidDurationConfig { phase, days })
        })
    }
}

impl Default for PhaseDurationConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_PLANNING_DAYS,
            Self::DEFAULT_SHOOTING_DAYS,
            Self::DEFAULT_EDITING_DAYS,
        )
    }
}

/// Sum of all configured phase durations; `None` means the default config.
pub fn calculate_total_duration(
    config: Option<&PhaseDurationConfig>,
) -> Result<i64, ScheduleError> {
    config.copied().unwrap_or_default().total_days()
}
