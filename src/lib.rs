pub mod config;
pub mod date;
pub mod error;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod invite;
pub mod persistence;
pub mod phase;
pub mod schedule;
pub mod ttl_store;

pub use config::{ConfigError, ServiceConfig};
pub use date::{CalendarDate, add_days, format_date, parse_date};
pub use error::ScheduleError;
pub use invite::{InviteError, InviteRegistry, ProjectInvite};
pub use persistence::{
    PersistenceError, load_schedule_from_csv, load_schedule_from_json, save_schedule_to_csv,
    save_schedule_to_json,
};
pub use phase::{Phase, PhaseDurationConfig, calculate_total_duration};
pub use schedule::{
    ScheduleIntegrityError, SchedulePhase, ScheduleResult, generate_auto_schedule,
    generate_auto_schedule_from,
};
pub use ttl_store::{Clock, MAX_TTL, ManualClock, SystemClock, TtlStore, TtlStoreError};
