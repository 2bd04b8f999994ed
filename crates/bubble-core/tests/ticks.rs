// File: crates/bubble-core/tests/ticks.rs
// Purpose: Calendar tick selection and multi-scale tick labels.

use bubble_core::record::parse_date;
use bubble_core::ticks::{format_tick, tick_step, time_ticks};
use chrono::{TimeZone, Utc};

fn ms(date: &str) -> f64 {
    parse_date(date).unwrap().timestamp_millis() as f64
}

#[test]
fn nice_steps() {
    assert_eq!(tick_step(0.0, 10.0, 5), 2.0);
    assert_eq!(tick_step(0.0, 100.0, 3), 50.0);
    assert_eq!(tick_step(5.0, 5.0, 5), 0.0);
}

#[test]
fn month_ticks_over_five_months() {
    let ticks = time_ticks(ms("2020-01-01"), ms("2020-06-01"), 5);
    let expected: Vec<_> = (1..=6).map(|m| Utc.with_ymd_and_hms(2020, m, 1, 0, 0, 0).unwrap()).collect();
    assert_eq!(ticks, expected);

    let labels: Vec<String> = ticks.into_iter().map(format_tick).collect();
    assert_eq!(labels[0], "2020");
    assert_eq!(labels[1], "February");
    assert_eq!(labels[5], "June");
}

#[test]
fn day_ticks_inside_a_week() {
    let ticks = time_ticks(ms("2020-01-01T06:00:00"), ms("2020-01-06T06:00:00"), 5);
    assert_eq!(ticks.first().copied(), Some(Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap()));
    assert_eq!(ticks.len(), 5);
}

#[test]
fn reversed_domain_yields_reversed_ticks() {
    let forward = time_ticks(ms("2020-01-01"), ms("2020-06-01"), 5);
    let mut backward = time_ticks(ms("2020-06-01"), ms("2020-01-01"), 5);
    backward.reverse();
    assert_eq!(forward, backward);
}

#[test]
fn non_finite_bounds_have_no_ticks() {
    assert!(time_ticks(f64::NAN, 1.0, 5).is_empty());
    assert!(time_ticks(0.0, 1.0, 0).is_empty());
}

#[test]
fn multi_scale_labels() {
    let at = |s: &str| parse_date(s).unwrap();
    assert_eq!(format_tick(at("2021-01-01")), "2021");
    assert_eq!(format_tick(at("2020-03-01")), "March");
    assert_eq!(format_tick(at("2020-01-05")), "Jan 05"); // a Sunday
    assert_eq!(format_tick(at("2020-01-04")), "Sat 04");
    assert_eq!(format_tick(at("2020-01-04T15:00:00")), "03 PM");
    assert_eq!(format_tick(at("2020-01-04T15:30:00")), "03:30");
    assert_eq!(format_tick(at("2020-01-04T15:30:12")), ":12");
    assert_eq!(format_tick(at("2020-01-04T15:30:12.250")), ".250");
}
