use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime};
use manatee::core::Viewport;
use manatee::log::{
    ActivityKind, ActivityLog, CountingActivity, CountingEntry, TimingActivity, TimingEntry,
};
use manatee::plot::{AxisTarget, PlotSurface};
use manatee::render::Color;
use manatee::summary::{
    DateBinning, TIMING_BLOCK_ALPHA, counting_amounts, counting_blocks, counting_lane,
    display_scale, draw_blocks, timing_amounts, timing_blocks,
};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, month, day).expect("valid date")
}

fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
    date(month, day).and_hms_opt(hour, 0, 0).expect("valid time")
}

#[test]
fn counting_amounts_average_per_day_with_quadrature_errors() {
    let edges = DateBinning::EveryDays(2)
        .date_edges(date(1, 1), date(1, 3))
        .expect("edges");
    assert_eq!(edges, vec![at(1, 1, 0), at(1, 3, 0), at(1, 5, 0)]);

    let entries = vec![
        CountingEntry::with_error(date(1, 1), 10.0, 3.0).expect("entry"),
        CountingEntry::with_error(date(1, 2), 6.0, 4.0).expect("entry"),
        CountingEntry::with_error(date(1, 3), 4.0, 0.0).expect("entry"),
    ];
    let series = counting_amounts(&entries, &edges).expect("amounts");

    assert_eq!(series.values(), &[8.0, 2.0]);
    assert_relative_eq!(series.errors()[0], 12.5f64.sqrt());
    assert_eq!(series.errors()[1], 0.0);
}

#[test]
fn timing_amounts_split_intervals_across_bins() {
    let edges = DateBinning::EveryDays(1)
        .date_edges(date(1, 1), date(1, 3))
        .expect("edges");
    let entries = vec![
        TimingEntry::new(at(1, 1, 20), at(1, 2, 4)).expect("entry"),
        TimingEntry::new(at(1, 2, 9), at(1, 2, 11)).expect("entry"),
    ];

    let series = timing_amounts(&entries, &edges).expect("amounts");

    assert_relative_eq!(series.values()[0], 4.0);
    assert_relative_eq!(series.values()[1], 6.0);
    assert_relative_eq!(series.values()[2], 0.0);
    assert!(series.errors().iter().all(|error| *error == 0.0));
}

#[test]
fn monthly_summary_divides_by_month_length() {
    let mut log = ActivityLog::default();
    log.add_counting_activity(CountingActivity::new("steps"))
        .expect("activity");
    log.add_counting_entry("steps", CountingEntry::new(date(2, 10), 28_000.0).expect("entry"))
        .expect("entry");

    let series = log
        .amount_summary("steps", DateBinning::Monthly)
        .expect("summary")
        .expect("entries present");

    assert_eq!(series.bins(), &[at(2, 1, 0), at(3, 1, 0)]);
    assert_relative_eq!(series.values()[0], 1_000.0);
    assert_eq!(series.bin_centers(), vec![at(2, 15, 0)]);
}

#[test]
fn weekly_timing_summary_spans_first_start_to_last_end() {
    let mut log = ActivityLog::default();
    log.add_timing_activity(TimingActivity::new("work"))
        .expect("activity");
    // 2021-01-06 is a Wednesday.
    log.add_timing_entry("work", TimingEntry::new(at(1, 6, 9), at(1, 6, 16)).expect("entry"))
        .expect("entry");
    log.add_timing_entry("work", TimingEntry::new(at(1, 11, 22), at(1, 12, 6)).expect("entry"))
        .expect("entry");

    let series = log
        .amount_summary("work", DateBinning::Weekly)
        .expect("summary")
        .expect("entries present");

    assert_eq!(series.bins(), &[at(1, 4, 0), at(1, 11, 0), at(1, 18, 0)]);
    assert_relative_eq!(series.values()[0], 1.0);
    assert_relative_eq!(series.values()[1], 8.0 / 7.0);
}

#[test]
fn activity_without_entries_has_no_summary() {
    let mut log = ActivityLog::default();
    log.add_counting_activity(CountingActivity::new("steps"))
        .expect("activity");

    assert!(
        log.amount_summary("steps", DateBinning::default())
            .expect("summary")
            .is_none()
    );
    assert!(log.amount_summary("missing", DateBinning::Weekly).is_err());
}

#[test]
fn display_scale_is_a_tenth_of_the_peak_rounded_up() {
    let edges = DateBinning::EveryDays(1)
        .date_edges(date(1, 1), date(1, 1))
        .expect("edges");
    let entries = vec![CountingEntry::with_error(date(1, 1), 42.0, 3.0).expect("entry")];
    let series = counting_amounts(&entries, &edges).expect("amounts");

    assert_eq!(display_scale(&series), 5.0);
}

#[test]
fn timing_blocks_split_at_midnight() {
    let entries = vec![
        TimingEntry::new(at(1, 1, 22), at(1, 3, 2)).expect("entry"),
        TimingEntry::new(at(1, 4, 9), at(1, 4, 9)).expect("entry"),
    ];

    let blocks = timing_blocks(&entries);

    let spans: Vec<(NaiveDate, f64, f64)> = blocks
        .iter()
        .map(|block| (block.day, block.y_low, block.y_high))
        .collect();
    assert_eq!(
        spans,
        vec![
            (date(1, 1), 22.0, 24.0),
            (date(1, 2), 0.0, 24.0),
            (date(1, 3), 0.0, 2.0),
        ]
    );
    assert!(blocks.iter().all(|block| block.alpha == TIMING_BLOCK_ALPHA));
}

#[test]
fn counting_blocks_shade_by_share_of_the_largest_amount() {
    let entries = vec![
        CountingEntry::new(date(1, 1), 50.0).expect("entry"),
        CountingEntry::new(date(1, 2), 13.0).expect("entry"),
        CountingEntry::new(date(1, 3), 1.0).expect("entry"),
        CountingEntry::new(date(1, 4), -5.0).expect("entry"),
    ];

    let blocks = counting_blocks(&entries, counting_lane(0, 1));

    let alphas: Vec<(NaiveDate, f64)> = blocks.iter().map(|block| (block.day, block.alpha)).collect();
    assert_eq!(
        alphas,
        vec![(date(1, 1), 1.0), (date(1, 2), 0.25), (date(1, 3), 0.0)]
    );
    assert!(blocks.iter().all(|block| (block.y_low, block.y_high) == (-3.0, -1.0)));
}

#[test]
fn block_summary_lays_out_counting_lanes_and_draws_rects() {
    let mut log = ActivityLog::default();
    log.add_counting_activity(CountingActivity::new("bike"))
        .expect("activity");
    log.add_counting_activity(CountingActivity::new("push-ups"))
        .expect("activity");
    log.add_timing_activity(TimingActivity::new("work"))
        .expect("activity");
    log.add_counting_entry("push-ups", CountingEntry::new(date(1, 2), 10.0).expect("entry"))
        .expect("entry");
    log.add_timing_entry("work", TimingEntry::new(at(1, 2, 9), at(1, 2, 17)).expect("entry"))
        .expect("entry");

    let summary = log.block_summary().expect("blocks");

    let names: Vec<&str> = summary.iter().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, vec!["bike", "push-ups", "work"]);
    assert!(summary[0].blocks.is_empty());
    assert_eq!(summary[1].blocks[0].y_low, -3.0);
    assert_eq!(summary[2].kind, ActivityKind::Timing);

    let mut surface = PlotSurface::new();
    for entry in &summary {
        draw_blocks(&mut surface, AxisTarget::Main, &entry.blocks, Color::rgb(0.0, 0.0, 1.0));
    }
    let frame = surface.compose(Viewport::new(640, 480)).expect("compose");
    frame.validate().expect("valid frame");
    // Frame background plus one rect per block.
    assert_eq!(frame.rects.len(), 3);
    assert_eq!(frame.rects[2].fill_color, Color::rgba(0.0, 0.0, 1.0, 0.6));
    assert!(frame.rects[2].height > frame.rects[1].height);
}
