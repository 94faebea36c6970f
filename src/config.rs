use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use crate::error::ScheduleError;
use crate::phase::{Phase, PhaseDurationConfig};
use crate::ttl_store::MAX_TTL;

pub const ENV_HTTP_ADDR: &str = "VRIDGE_SCHEDULE_HTTP_ADDR";
pub const ENV_PLANNING_DAYS: &str = "VRIDGE_SCHEDULE_PLANNING_DAYS";
pub const ENV_SHOOTING_DAYS: &str = "VRIDGE_SCHEDULE_SHOOTING_DAYS";
pub const ENV_EDITING_DAYS: &str = "VRIDGE_SCHEDULE_EDITING_DAYS";
pub const ENV_INVITE_TTL_SECS: &str = "VRIDGE_SCHEDULE_INVITE_TTL_SECS";
pub const ENV_INVITE_CAPACITY: &str = "VRIDGE_SCHEDULE_INVITE_CAPACITY";

const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_INVITE_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_INVITE_CAPACITY: usize = 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}: cannot parse '{value}': {reason}")]
    Parse {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
    #[error("{var} must be at most {max}")]
    TooLarge { var: &'static str, max: u64 },
    #[error(transparent)]
    Durations(#[from] ScheduleError),
}

/// Runtime settings for the binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub http_addr: SocketAddr,
    pub durations: PhaseDurationConfig,
    pub invite_ttl: Duration,
    pub invite_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            durations: PhaseDurationConfig::default(),
            invite_ttl: Duration::from_secs(DEFAULT_INVITE_TTL_SECS),
            invite_capacity: DEFAULT_INVITE_CAPACITY,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from an arbitrary variable source; unset variables
    /// fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &'static str| lookup(var).filter(|v| !v.trim().is_empty());

        let http_addr = parse_var(
            ENV_HTTP_ADDR,
            read(ENV_HTTP_ADDR).unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string()),
        )?;

        let mut durations = PhaseDurationConfig::default();
        for (var, phase) in [
            (ENV_PLANNING_DAYS, Phase::Planning),
            (ENV_SHOOTING_DAYS, Phase::Shooting),
            (ENV_EDITING_DAYS, Phase::Editing),
        ] {
            if let Some(raw) = read(var) {
                durations.set_days(phase, parse_var(var, raw)?);
            }
        }
        durations.validate()?;

        let invite_ttl_secs: u64 = match read(ENV_INVITE_TTL_SECS) {
            Some(raw) => parse_var(ENV_INVITE_TTL_SECS, raw)?,
            None => DEFAULT_INVITE_TTL_SECS,
        };
        if invite_ttl_secs == 0 {
            return Err(ConfigError::Zero {
                var: ENV_INVITE_TTL_SECS,
            });
        }
        if invite_ttl_secs > MAX_TTL.as_secs() {
            return Err(ConfigError::TooLarge {
                var: ENV_INVITE_TTL_SECS,
                max: MAX_TTL.as_secs(),
            });
        }

        let invite_capacity: usize = match read(ENV_INVITE_CAPACITY) {
            Some(raw) => parse_var(ENV_INVITE_CAPACITY, raw)?,
            None => DEFAULT_INVITE_CAPACITY,
        };
        if invite_capacity == 0 {
            return Err(ConfigError::Zero {
                var: ENV_INVITE_CAPACITY,
            });
        }

        Ok(Self {
            http_addr,
            durations,
            invite_ttl: Duration::from_secs(invite_ttl_secs),
            invite_capacity,
        })
    }
}

fn parse_var<T>(var: &'static str, raw: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|err| ConfigError::Parse {
        var,
        value: raw.clone(),
        reason: err.to_string(),
    })
}
