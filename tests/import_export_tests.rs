use std::fs;
use tempfile::NamedTempFile;
use vridge_schedule::{
    PersistenceError, PhaseDurationConfig, ScheduleResult, generate_auto_schedule,
    load_schedule_from_csv, load_schedule_from_json, save_schedule_to_csv, save_schedule_to_json,
};

fn sample_schedule() -> ScheduleResult {
    let config = PhaseDurationConfig::new(5, 2, 10);
    generate_auto_schedule("2025-01-25", Some(&config)).unwrap()
}

#[test]
fn json_round_trip_preserves_schedule() {
    let schedule = sample_schedule();
    let file = NamedTempFile::new().unwrap();

    save_schedule_to_json(&schedule, file.path()).unwrap();
    let loaded = load_schedule_from_json(file.path()).unwrap();

    assert_eq!(loaded, schedule);
    assert_eq!(loaded.config(), PhaseDurationConfig::new(5, 2, 10));
}

#[test]
fn csv_round_trip_preserves_schedule() {
    let schedule = sample_schedule();
    let file = NamedTempFile::new().unwrap();

    save_schedule_to_csv(&schedule, file.path()).unwrap();
    let contents = fs::read_to_string(file.path()).unwrap();
    assert!(contents.starts_with("phase,name,start_date,end_date,duration"));
    assert!(contents.contains("shooting,촬영,2025-01-30,2025-01-31,2"));

    let loaded = load_schedule_from_csv(file.path()).unwrap();
    assert_eq!(loaded, schedule);
}

#[test]
fn schedule_ending_on_9999_12_31_reloads_from_both_formats() {
    let schedule = generate_auto_schedule("9999-12-10", None).unwrap();

    let json_file = NamedTempFile::new().unwrap();
    save_schedule_to_json(&schedule, json_file.path()).unwrap();
    assert_eq!(load_schedule_from_json(json_file.path()).unwrap(), schedule);

    let csv_file = NamedTempFile::new().unwrap();
    save_schedule_to_csv(&schedule, csv_file.path()).unwrap();
    assert_eq!(load_schedule_from_csv(csv_file.path()).unwrap(), schedule);
}

#[test]
fn json_with_mismatched_anchor_is_rejected() {
    let schedule = sample_schedule();
    let file = NamedTempFile::new().unwrap();
    save_schedule_to_json(&schedule, file.path()).unwrap();

    let mut value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(file.path()).unwrap()).unwrap();
    value["anchor"] = serde_json::json!("2025-01-01");
    fs::write(file.path(), serde_json::to_string(&value).unwrap()).unwrap();

    let err = load_schedule_from_json(file.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)), "{err}");
}

#[test]
fn csv_with_gap_between_phases_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        "phase,name,start_date,end_date,duration\n\
         planning,기획,2025-01-01,2025-01-07,7\n\
         shooting,촬영,2025-01-09,2025-01-09,1\n\
         editing,편집,2025-01-10,2025-01-23,14\n",
    )
    .unwrap();

    let err = load_schedule_from_csv(file.path()).unwrap_err();
    match err {
        PersistenceError::InvalidData(msg) => assert!(msg.contains("shooting"), "{msg}"),
        other => panic!("expected InvalidData, got {other:?}"),
    }
}

#[test]
fn csv_with_bad_date_or_phase_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        "phase,name,start_date,end_date,duration\nplanning,기획,2025-13-01,2025-01-07,7\n",
    )
    .unwrap();
    assert!(matches!(
        load_schedule_from_csv(file.path()),
        Err(PersistenceError::InvalidData(_))
    ));

    fs::write(
        file.path(),
        "phase,name,start_date,end_date,duration\nwrapping,?,2025-01-01,2025-01-07,7\n",
    )
    .unwrap();
    assert!(matches!(
        load_schedule_from_csv(file.path()),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn empty_csv_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), "phase,name,start_date,end_date,duration\n").unwrap();
    assert!(matches!(
        load_schedule_from_csv(file.path()),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    assert!(matches!(
        load_schedule_from_json(&path),
        Err(PersistenceError::Io(_))
    ));
}
