use approx::assert_relative_eq;
use manatee::ManateeError;
use manatee::hist::{BinSpec, Binner};

#[test]
fn unweighted_counts_follow_equal_width_bins() {
    let binner = Binner::new(BinSpec::count(4));
    let hist = binner
        .hist_unweighted(&[0.0, 1.0, 1.5, 2.5, 3.9, 4.0])
        .expect("hist");

    assert_eq!(hist.bins(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_eq!(hist.values(), &[1.0, 2.0, 1.0, 2.0]);
    assert_relative_eq!(hist.errors()[1], 2f64.sqrt());
}

#[test]
fn weighted_errors_are_root_sum_of_squared_weights() {
    let binner = Binner::new(BinSpec::edges(vec![0.0, 10.0, 20.0]));
    let hist = binner
        .hist(&[1.0, 2.0, 15.0], Some(&[3.0, 4.0, 0.5]))
        .expect("hist");

    assert_eq!(hist.values(), &[7.0, 0.5]);
    assert_relative_eq!(hist.errors()[0], 5.0);
    assert_relative_eq!(hist.errors()[1], 0.5);
}

#[test]
fn non_finite_pairs_are_dropped() {
    let binner = Binner::new(BinSpec::count_in(2, 0.0, 2.0));
    let hist = binner
        .hist(
            &[0.5, f64::NAN, 1.5, 1.5],
            Some(&[1.0, 1.0, f64::INFINITY, 2.0]),
        )
        .expect("hist");

    assert_eq!(hist.values(), &[1.0, 2.0]);
}

#[test]
fn samples_outside_the_range_are_ignored() {
    let binner = Binner::new(BinSpec::count_in(2, 0.0, 2.0));
    let hist = binner
        .hist_unweighted(&[-0.1, 0.0, 2.0, 2.1])
        .expect("hist");

    assert_eq!(hist.values(), &[1.0, 1.0]);
    assert_eq!(hist.sum(), 2.0);
}

#[test]
fn empty_input_keeps_edges_from_placeholder_sample() {
    let binner: Binner<f64> = Binner::new(BinSpec::count(2));
    let hist = binner.hist_unweighted(&[]).expect("hist");

    assert_eq!(hist.bins(), &[0.5, 1.0, 1.5]);
    assert_eq!(hist.values(), &[0.0, 0.0]);
    assert_eq!(hist.errors(), &[0.0, 0.0]);
}

#[test]
fn all_non_finite_input_uses_the_requested_range() {
    let binner = Binner::new(BinSpec::count_in(4, 0.0, 8.0));
    let hist = binner
        .hist_unweighted(&[f64::NAN, f64::NEG_INFINITY])
        .expect("hist");

    assert_eq!(hist.bins(), &[0.0, 2.0, 4.0, 6.0, 8.0]);
    assert!(hist.values().iter().all(|value| *value == 0.0));
    assert!(hist.errors().iter().all(|error| *error == 0.0));
}

#[test]
fn single_distinct_sample_gets_a_unit_wide_range() {
    let binner = Binner::new(BinSpec::count(1));
    let hist = binner.hist_unweighted(&[3.0, 3.0]).expect("hist");

    assert_eq!(hist.bins(), &[2.5, 3.5]);
    assert_eq!(hist.values(), &[2.0]);
}

#[test]
fn mismatched_weight_length_is_rejected() {
    let binner = Binner::<f64>::default();
    let err = binner
        .hist(&[1.0, 2.0], Some(&[1.0]))
        .expect_err("length mismatch must fail");
    assert!(matches!(err, ManateeError::InvalidData(_)));
}

#[test]
fn unsorted_edges_are_rejected() {
    let binner = Binner::new(BinSpec::edges(vec![0.0, 2.0, 1.0]));
    let err = binner
        .hist_unweighted(&[0.5])
        .expect_err("unsorted edges must fail");
    assert!(matches!(err, ManateeError::InvalidBins(_)));
}

#[test]
fn inverted_range_is_rejected() {
    let binner = Binner::new(BinSpec::count_in(3, 5.0, 1.0));
    assert!(binner.hist_unweighted(&[2.0]).is_err());
}
