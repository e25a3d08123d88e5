use chrono::NaiveDate;
use stockchart::core::{Extent, TimeScale};
use stockchart::ChartError;

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, month, day).expect("date")
}

fn week_with_weekend_gap() -> Vec<NaiveDate> {
    vec![
        date(1, 4),
        date(1, 5),
        date(1, 6),
        date(1, 7),
        date(1, 8),
        date(1, 11),
        date(1, 12),
    ]
}

#[test]
fn weekend_gap_takes_no_horizontal_space() {
    let scale = TimeScale::build(week_with_weekend_gap(), (50.0, 750.0), 150).expect("scale");

    let friday = scale.index_of(date(1, 8)).expect("friday");
    let monday = scale.index_of(date(1, 11)).expect("monday");
    assert_eq!(monday, friday + 1);

    let slot = scale.slot_width().expect("slot");
    let step =
        scale.pixel_of(monday).expect("monday px") - scale.pixel_of(friday).expect("friday px");
    assert!((step - slot).abs() <= 1e-9);
    assert!((slot - 100.0).abs() <= 1e-9);
    assert_eq!(scale.index_of(date(1, 9)), None);
}

#[test]
fn nearest_index_inverts_pixel_of_and_clamps_outside_extent() {
    let scale = TimeScale::build(week_with_weekend_gap(), (50.0, 750.0), 150).expect("scale");
    for index in 0..scale.len() {
        let px = scale.pixel_of(index).expect("pixel");
        assert_eq!(scale.nearest_index(px), Some(index));
    }
    assert_eq!(scale.nearest_index(-1_000.0), Some(0));
    assert_eq!(scale.nearest_index(10_000.0), Some(6));
    assert_eq!(scale.nearest_index(f64::NAN), None);
}

#[test]
fn extent_is_clamped_and_reset_to_latest_bars() {
    let mut scale = TimeScale::build(week_with_weekend_gap(), (0.0, 700.0), 3).expect("scale");
    assert_eq!(scale.extent(), Some(Extent { start: 4, end: 6 }));

    assert_eq!(scale.set_extent(5, 2), Some(Extent { start: 2, end: 5 }));
    assert_eq!(scale.set_extent(1, 40), Some(Extent { start: 1, end: 6 }));
    assert_eq!(scale.pan_by_bars(-10), Some(Extent { start: 0, end: 5 }));
    assert_eq!(scale.reset_extent(), Some(Extent { start: 4, end: 6 }));
}

#[test]
fn empty_scale_has_no_extent_or_lookups() {
    let scale = TimeScale::build(Vec::new(), (0.0, 100.0), 150).expect("scale");
    assert!(scale.is_empty());
    assert_eq!(scale.extent(), None);
    assert_eq!(scale.pixel_of(0), None);
    assert_eq!(scale.nearest_index(10.0), None);
}

#[test]
fn duplicate_dates_are_rejected() {
    let dates = vec![date(1, 4), date(1, 5), date(1, 5)];
    let err = TimeScale::build(dates, (0.0, 100.0), 150).expect_err("duplicate");
    assert!(matches!(err, ChartError::UnsortedInput { index: 2, .. }));
}

#[test]
fn zoom_keeps_anchor_inside_extent_and_respects_minimum() {
    let dates: Vec<NaiveDate> = (1..=28).map(|day| date(2, day)).collect();
    let mut scale = TimeScale::build(dates, (0.0, 280.0), 20).expect("scale");
    assert_eq!(scale.extent(), Some(Extent { start: 8, end: 27 }));

    let zoomed = scale.zoom_by_factor(2.0, 18, 5).expect("zoom").expect("extent");
    assert_eq!(zoomed.len(), 10);
    assert!(zoomed.contains(18));

    let clamped = scale.zoom_by_factor(100.0, 18, 5).expect("zoom").expect("extent");
    assert_eq!(clamped.len(), 5);
    assert!(scale.zoom_by_factor(0.0, 18, 5).is_err());
}

#[test]
fn dates_days_apart_are_adjacent_indices() {
    let scale =
        TimeScale::build(vec![date(1, 4), date(1, 8)], (0.0, 200.0), 150).expect("scale");
    assert_eq!(scale.index_of(date(1, 4)), Some(0));
    assert_eq!(scale.index_of(date(1, 8)), Some(1));

    let first = scale.pixel_of(0).expect("first");
    let second = scale.pixel_of(1).expect("second");
    assert!((first - 50.0).abs() <= 1e-9);
    assert!((second - 150.0).abs() <= 1e-9);
}
