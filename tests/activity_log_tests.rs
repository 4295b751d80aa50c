use chrono::{NaiveDate, NaiveDateTime};
use manatee::ManateeError;
use manatee::log::{
    ActivityKind, ActivityLog, CountingActivity, CountingEntry, TimingActivity, TimingEntry,
};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, month, day).expect("valid date")
}

fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
    date(month, day).and_hms_opt(hour, 0, 0).expect("valid time")
}

fn sample_log() -> ActivityLog {
    let mut log = ActivityLog::new("training", "sam");
    log.add_counting_activity(CountingActivity::new("push-ups").with_unit("reps"))
        .expect("add push-ups");
    log.add_counting_activity(CountingActivity::new("bike"))
        .expect("add bike");
    log.add_timing_activity(TimingActivity::new("work"))
        .expect("add work");
    log
}

#[test]
fn activities_iterate_in_name_order() {
    let log = sample_log();

    let names: Vec<&str> = log
        .counting_activities()
        .map(|activity| activity.name.as_str())
        .collect();
    assert_eq!(names, vec!["bike", "push-ups"]);
    assert_eq!(log.counting_activity("bike").expect("bike").unit, "none");
    assert_eq!(log.activity_kind("work").expect("kind"), ActivityKind::Timing);
}

#[test]
fn a_name_belongs_to_one_kind_only() {
    let mut log = sample_log();

    let err = log
        .add_timing_activity(TimingActivity::new("bike"))
        .expect_err("name taken");
    assert!(matches!(err, ManateeError::DuplicateActivity { .. }));
    assert!(log.add_counting_activity(CountingActivity::new("work")).is_err());
}

#[test]
fn entries_stay_sorted() {
    let mut log = sample_log();
    for (day, n) in [(3, 10.0), (1, 20.0), (1, 15.0), (2, 5.0)] {
        log.add_counting_entry("push-ups", CountingEntry::new(date(1, day), n).expect("entry"))
            .expect("add entry");
    }

    let keys: Vec<(u32, f64)> = log
        .counting_entries("push-ups")
        .expect("entries")
        .iter()
        .map(|entry| (chrono::Datelike::day(&entry.date), entry.n))
        .collect();
    assert_eq!(keys, vec![(1, 15.0), (1, 20.0), (2, 5.0), (3, 10.0)]);
}

#[test]
fn using_the_wrong_kind_is_reported() {
    let mut log = sample_log();

    let err = log
        .add_counting_entry("work", CountingEntry::new(date(1, 1), 1.0).expect("entry"))
        .expect_err("work is a timing activity");
    match err {
        ManateeError::ActivityKindMismatch {
            expected, actual, ..
        } => {
            assert_eq!(expected, "counting");
            assert_eq!(actual, "timing");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        log.timing_entries("missing"),
        Err(ManateeError::UnknownActivity(_))
    ));
}

#[test]
fn timing_entries_must_not_end_before_they_start() {
    assert!(TimingEntry::new(at(1, 2, 10), at(1, 2, 9)).is_err());

    let entry = TimingEntry::new(at(1, 2, 9), at(1, 2, 17)).expect("entry");
    assert_eq!(entry.duration(), chrono::TimeDelta::hours(8));
    assert!((entry.overlap_hours(at(1, 2, 12), at(1, 3, 0)) - 5.0).abs() < 1e-12);
}

#[test]
fn entries_can_be_removed() {
    let mut log = sample_log();
    let entry = TimingEntry::new(at(1, 2, 9), at(1, 2, 17))
        .expect("entry")
        .with_note("office");
    log.add_timing_entry("work", entry.clone()).expect("add");

    assert!(log.remove_timing_entry("work", &entry).expect("remove"));
    assert!(!log.remove_timing_entry("work", &entry).expect("remove again"));
    assert!(log.timing_entries("work").expect("entries").is_empty());
}

#[test]
fn change_units_rescales_quantities_and_errors() {
    let mut log = sample_log();
    log.add_counting_entry(
        "bike",
        CountingEntry::with_error(date(1, 1), 10.0, 0.5).expect("entry"),
    )
    .expect("add");

    log.change_units("bike", "m", 1_000.0).expect("change units");

    let activity = log.counting_activity("bike").expect("bike");
    let entry = &log.counting_entries("bike").expect("entries")[0];
    assert_eq!(activity.unit, "m");
    assert_eq!(entry.n, 10_000.0);
    assert_eq!(entry.error, 500.0);
    assert!(log.change_units("work", "h", 2.0).is_err());
    assert!(log.change_units("bike", "x", f64::NAN).is_err());
}

#[test]
fn rename_and_remove_keep_entries_with_their_activity() {
    let mut log = sample_log();
    log.add_counting_entry("bike", CountingEntry::new(date(1, 1), 3.0).expect("entry"))
        .expect("add");

    log.rename_activity("bike", "cycling").expect("rename");
    assert!(log.counting_entries("bike").is_err());
    assert_eq!(log.counting_entries("cycling").expect("entries").len(), 1);
    assert_eq!(log.counting_activity("cycling").expect("activity").name, "cycling");
    assert!(log.rename_activity("cycling", "work").is_err());

    assert_eq!(log.remove_activity("cycling").expect("remove"), ActivityKind::Counting);
    assert!(!log.contains_activity("cycling"));
}

#[test]
fn spans_cover_every_activity() {
    let mut log = sample_log();
    log.add_counting_entry("bike", CountingEntry::new(date(2, 1), 3.0).expect("entry"))
        .expect("add");
    log.add_counting_entry("push-ups", CountingEntry::new(date(1, 5), 3.0).expect("entry"))
        .expect("add");
    log.add_timing_entry("work", TimingEntry::new(at(1, 3, 8), at(1, 4, 2)).expect("entry"))
        .expect("add");
    log.add_timing_entry("work", TimingEntry::new(at(1, 3, 9), at(1, 3, 10)).expect("entry"))
        .expect("add");

    assert_eq!(log.counting_date_span(), Some((date(1, 5), date(2, 1))));
    assert_eq!(log.timing_time_span(), Some((at(1, 3, 8), at(1, 4, 2))));
    assert_eq!(ActivityLog::default().counting_date_span(), None);
}

#[test]
fn json_snapshot_round_trips() {
    let mut log = sample_log();
    log.add_counting_entry(
        "push-ups",
        CountingEntry::with_error(date(1, 1), 25.0, 2.0)
            .expect("entry")
            .with_note("morning"),
    )
    .expect("add");
    log.add_timing_entry("work", TimingEntry::new(at(1, 1, 9), at(1, 1, 12)).expect("entry"))
        .expect("add");

    let json = log.to_json_pretty().expect("serialize");
    let restored = ActivityLog::from_json(&json).expect("deserialize");

    assert_eq!(restored, log);
    assert_eq!(restored.title, "training");
    assert!(matches!(
        ActivityLog::from_json("{ not json"),
        Err(ManateeError::Snapshot(_))
    ));
}
