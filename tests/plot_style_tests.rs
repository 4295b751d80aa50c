use manatee::plot::style::{CAP_SIZE, ERROR_LINE_WIDTH, LINE_WIDTH, MARKER, NO_MARKER};
use manatee::plot::{SeriesStyle, StyleOverrides, StyleValue};
use manatee::render::{Color, MarkerShape};

#[test]
fn default_style_draws_only_the_line() {
    let style = SeriesStyle::new();

    assert!(style.line());
    assert!(!style.markers());
    assert!(!style.errorbars());
    assert!(!style.errorcaps());
    assert_eq!(style.option(MARKER), Some(&StyleValue::from(NO_MARKER)));
    assert_eq!(style.marker_shape(), None);
    assert_eq!(style.option(CAP_SIZE), Some(&StyleValue::Number(0.0)));
    assert!(style.option(ERROR_LINE_WIDTH).is_some());
}

#[test]
fn enabling_markers_picks_a_default_shape() {
    let style = SeriesStyle::new().with_markers(true);
    assert_eq!(style.marker_shape(), Some(MarkerShape::Circle));

    let square = SeriesStyle::new()
        .with_option(MARKER, "s")
        .with_markers(true);
    assert_eq!(square.marker_shape(), Some(MarkerShape::Square));

    let hidden = square.with_markers(false);
    assert_eq!(hidden.marker_shape(), None);
}

#[test]
fn enabling_errorbars_and_caps_clears_derived_entries() {
    let style = SeriesStyle::new()
        .with_option(LINE_WIDTH, 2.0)
        .with_errorbars(true)
        .with_errorcaps(true);

    assert!(style.option(ERROR_LINE_WIDTH).is_none());
    assert!(style.option(CAP_SIZE).is_none());
    assert_eq!(style.error_line_width(), 2.0);
    assert_eq!(style.cap_size(), 3.0);
}

#[test]
fn copy_with_only_touches_given_switches() {
    let base = SeriesStyle::new()
        .with_errorbars(true)
        .with_option(LINE_WIDTH, 1.4);

    let copy = base.copy_with(
        StyleOverrides::new()
            .markers(true)
            .label("push-ups")
            .color(Color::rgb(0.0, 0.5, 0.0)),
    );

    assert!(copy.errorbars());
    assert!(copy.markers());
    assert_eq!(copy.line_width(), 1.4);
    assert_eq!(copy.label(), Some("push-ups"));
    assert_eq!(copy.color(), Some(Color::rgb(0.0, 0.5, 0.0)));
    assert!(!base.markers());
    assert_eq!(base.label(), None);
}

#[test]
fn explicit_options_win_over_switch_entries() {
    let style = SeriesStyle::from_overrides(
        StyleOverrides::new()
            .errorcaps(false)
            .option(CAP_SIZE, 5.0),
    );

    assert_eq!(style.cap_size(), 5.0);
}

#[test]
fn options_keep_insertion_order() {
    let style = SeriesStyle::new()
        .with_option("zorder", 3.0)
        .with_option("alpha", 0.4)
        .with_option("label", "run");

    let keys: Vec<&str> = style.options().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![MARKER, ERROR_LINE_WIDTH, CAP_SIZE, "zorder", "alpha", "label"]
    );
    assert_eq!(style.zorder(), 3.0);
    assert_eq!(style.alpha(), Some(0.4));
}

#[test]
fn hex_color_text_is_accepted() {
    let style = SeriesStyle::new().with_option("color", "#0000ff");
    assert_eq!(style.color(), Some(Color::rgb(0.0, 0.0, 1.0)));
}

#[test]
fn style_round_trips_through_json() {
    let style = SeriesStyle::new()
        .with_markers(true)
        .with_option("label", "km run");

    let json = serde_json::to_string(&style).expect("serialize");
    let restored: SeriesStyle = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, style);
}
