use super::{PersistenceError, PersistenceResult};
use crate::{
    CalendarDate, Phase, PhaseDurationConfig, ScheduleResult, date::parse_date,
    schedule::SchedulePhase,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct ScheduleSnapshot {
    anchor: CalendarDate,
    config: PhaseDurationConfig,
    phases: Vec<SchedulePhase>,
}

impl ScheduleSnapshot {
    fn from_schedule(schedule: &ScheduleResult) -> Self {
        Self {
            anchor: schedule.start_date(),
            config: schedule.config(),
            phases: schedule.phases().to_vec(),
        }
    }

    fn into_schedule(self) -> PersistenceResult<ScheduleResult> {
        let schedule = ScheduleResult::from_phases(self.phases)?;
        if schedule.start_date() != self.anchor {
            return Err(PersistenceError::InvalidData(format!(
                "anchor {} does not match first phase start {}",
                self.anchor,
                schedule.start_date()
            )));
        }
        if schedule.config() != self.config {
            return Err(PersistenceError::InvalidData(
                "stored durations do not match phase durations".into(),
            ));
        }
        Ok(schedule)
    }
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    schedule: &ScheduleResult,
    path: P,
) -> PersistenceResult<()> {
    let snapshot = ScheduleSnapshot::from_schedule(schedule);
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    debug!(path = %path.as_ref().display(), "saved schedule json");
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<ScheduleResult> {
    let file = File::open(path)?;
    let snapshot: ScheduleSnapshot = serde_json::from_reader(file)?;
    snapshot.into_schedule()
}

#[derive(Debug, Serialize, Deserialize)]
struct PhaseCsvRecord {
    phase: String,
    name: String,
    start_date: String,
    end_date: String,
    duration: i64,
}

impl From<&SchedulePhase> for PhaseCsvRecord {
    fn from(entry: &SchedulePhase) -> Self {
        Self {
            phase: entry.phase.as_str().to_string(),
            name: entry.name.clone(),
            start_date: entry.start_date.to_string(),
            end_date: entry.end_date.to_string(),
            duration: entry.duration,
        }
    }
}

impl PhaseCsvRecord {
    fn into_phase(self) -> PersistenceResult<SchedulePhase> {
        let phase = self.phase.parse::<Phase>().map_err(|_| {
            PersistenceError::InvalidData(format!("unknown phase '{}'", self.phase))
        })?;
        Ok(SchedulePhase {
            name: self.name,
            phase,
            start_date: parse_csv_date(&self.start_date)?,
            end_date: parse_csv_date(&self.end_date)?,
            duration: self.duration,
        })
    }
}

pub fn save_schedule_to_csv<P: AsRef<Path>>(
    schedule: &ScheduleResult,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = csv::Writer::from_writer(file);
    for entry in schedule {
        writer.serialize(PhaseCsvRecord::from(entry))?;
    }
    writer.flush()?;
    debug!(path = %path.as_ref().display(), "saved schedule csv");
    Ok(())
}

pub fn load_schedule_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<ScheduleResult> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut phases = Vec::with_capacity(Phase::ALL.len());
    for record in reader.deserialize::<PhaseCsvRecord>() {
        phases.push(record?.into_phase()?);
    }
    if phases.is_empty() {
        return Err(PersistenceError::InvalidData(
            "CSV file contained no phases".into(),
        ));
    }
    Ok(ScheduleResult::from_phases(phases)?)
}

fn parse_csv_date(input: &str) -> PersistenceResult<CalendarDate> {
    parse_date(input.trim())
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}
