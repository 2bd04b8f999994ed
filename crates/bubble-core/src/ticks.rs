// File: crates/bubble-core/src/ticks.rs
// Summary: Tick generation and labelling for the time axis (UTC calendar intervals).

use chrono::{DateTime, Datelike, Duration, Months, TimeZone, Timelike, Utc};

const SECOND: f64 = 1_000.0;
const MINUTE: f64 = SECOND * 60.0;
const HOUR: f64 = MINUTE * 60.0;
const DAY: f64 = HOUR * 24.0;
const WEEK: f64 = DAY * 7.0;
const MONTH: f64 = DAY * 30.0;
const YEAR: f64 = DAY * 365.0;

// Hard stop for interval walks; a sane tick interval never gets close.
const MAX_STEPS: usize = 10_000;

/// Calendar unit of a tick interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

const INTERVALS: [(TimeUnit, u32, f64); 18] = [
    (TimeUnit::Second, 1, SECOND),
    (TimeUnit::Second, 5, 5.0 * SECOND),
    (TimeUnit::Second, 15, 15.0 * SECOND),
    (TimeUnit::Second, 30, 30.0 * SECOND),
    (TimeUnit::Minute, 1, MINUTE),
    (TimeUnit::Minute, 5, 5.0 * MINUTE),
    (TimeUnit::Minute, 15, 15.0 * MINUTE),
    (TimeUnit::Minute, 30, 30.0 * MINUTE),
    (TimeUnit::Hour, 1, HOUR),
    (TimeUnit::Hour, 3, 3.0 * HOUR),
    (TimeUnit::Hour, 6, 6.0 * HOUR),
    (TimeUnit::Hour, 12, 12.0 * HOUR),
    (TimeUnit::Day, 1, DAY),
    (TimeUnit::Day, 2, 2.0 * DAY),
    (TimeUnit::Week, 1, WEEK),
    (TimeUnit::Month, 1, MONTH),
    (TimeUnit::Month, 3, 3.0 * MONTH),
    (TimeUnit::Year, 1, YEAR),
];

pub fn ms_to_datetime(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    Utc.timestamp_millis_opt(ms.round() as i64).single()
}

/// A "nice" step (1, 2 or 5 times a power of ten) giving about `count` steps.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let raw = (stop - start).abs() / count.max(1) as f64;
    if !(raw > 0.0) || !raw.is_finite() {
        return 0.0;
    }
    let mut step = 10f64.powf(raw.log10().floor());
    let error = raw / step;
    if error >= 50f64.sqrt() {
        step *= 10.0;
    } else if error >= 10f64.sqrt() {
        step *= 5.0;
    } else if error >= 2f64.sqrt() {
        step *= 2.0;
    }
    step
}

fn floor(unit: TimeUnit, t: DateTime<Utc>) -> DateTime<Utc> {
    let day = || {
        Utc.with_ymd_and_hms(t.year(), t.month(), t.day(), 0, 0, 0).single().unwrap_or(t)
    };
    match unit {
        TimeUnit::Second => t.with_nanosecond(0).unwrap_or(t),
        TimeUnit::Minute => t.with_nanosecond(0).and_then(|t| t.with_second(0)).unwrap_or(t),
        TimeUnit::Hour => t
            .with_nanosecond(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_minute(0))
            .unwrap_or(t),
        TimeUnit::Day => day(),
        TimeUnit::Week => day() - Duration::days(t.weekday().num_days_from_sunday() as i64),
        TimeUnit::Month => Utc.with_ymd_and_hms(t.year(), t.month(), 1, 0, 0, 0).single().unwrap_or(t),
        TimeUnit::Year => Utc.with_ymd_and_hms(t.year(), 1, 1, 0, 0, 0).single().unwrap_or(t),
    }
}

fn offset(unit: TimeUnit, t: DateTime<Utc>, n: u32) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Second => t.checked_add_signed(Duration::seconds(n as i64)),
        TimeUnit::Minute => t.checked_add_signed(Duration::minutes(n as i64)),
        TimeUnit::Hour => t.checked_add_signed(Duration::hours(n as i64)),
        TimeUnit::Day => t.checked_add_signed(Duration::days(n as i64)),
        TimeUnit::Week => t.checked_add_signed(Duration::weeks(n as i64)),
        TimeUnit::Month => t.checked_add_months(Months::new(n)),
        TimeUnit::Year => t.checked_add_months(Months::new(12 * n)),
    }
}

/// Field an `every(step)` interval filters on.
fn field(unit: TimeUnit, t: DateTime<Utc>) -> i64 {
    match unit {
        TimeUnit::Second => t.second() as i64,
        TimeUnit::Minute => t.minute() as i64,
        TimeUnit::Hour => t.hour() as i64,
        TimeUnit::Day => t.day0() as i64,
        TimeUnit::Week => 0,
        TimeUnit::Month => t.month0() as i64,
        TimeUnit::Year => t.year() as i64,
    }
}

/// Boundaries of `unit` in `[start, stop)` whose field is a multiple of `step`.
fn interval_range(unit: TimeUnit, step: u32, start: DateTime<Utc>, stop: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let mut out = Vec::new();
    let floored = floor(unit, start);
    let mut t = if floored < start {
        match offset(unit, floored, 1) {
            Some(t) => t,
            None => return out,
        }
    } else {
        floored
    };
    for _ in 0..MAX_STEPS {
        if t >= stop {
            break;
        }
        if field(unit, t).rem_euclid(step.max(1) as i64) == 0 {
            out.push(t);
        }
        t = match offset(unit, t, 1) {
            Some(next) => next,
            None => break,
        };
    }
    out
}

/// Roughly `count` ticks between two epoch-millisecond bounds (inclusive).
pub fn time_ticks(d0: f64, d1: f64, count: usize) -> Vec<DateTime<Utc>> {
    if count == 0 || !d0.is_finite() || !d1.is_finite() {
        return Vec::new();
    }
    let reverse = d1 < d0;
    let (start, stop) = if reverse { (d1, d0) } else { (d0, d1) };
    let target = (stop - start) / count as f64;

    let mut ticks = match INTERVALS.iter().position(|&(_, _, d)| d > target) {
        // finer than a second: plain millisecond multiples
        Some(0) => {
            let step = tick_step(start, stop, count).max(1.0);
            let first = (start / step).ceil() as i64;
            let last = (stop / step).floor() as i64;
            (first..=last)
                .take(MAX_STEPS)
                .filter_map(|i| ms_to_datetime(i as f64 * step))
                .collect()
        }
        Some(i) => {
            let (lo, hi) = (INTERVALS[i - 1], INTERVALS[i]);
            let (unit, step, _) = if target / lo.2 < hi.2 / target { lo } else { hi };
            range_ms(unit, step, start, stop)
        }
        None => {
            let step = tick_step(start / YEAR, stop / YEAR, count).max(1.0);
            range_ms(TimeUnit::Year, step as u32, start, stop)
        }
    };
    if reverse {
        ticks.reverse();
    }
    ticks
}

fn range_ms(unit: TimeUnit, step: u32, start: f64, stop: f64) -> Vec<DateTime<Utc>> {
    match (ms_to_datetime(start), ms_to_datetime(stop + 1.0)) {
        (Some(a), Some(b)) => interval_range(unit, step, a, b),
        _ => Vec::new(),
    }
}

/// Multi-scale label: the coarsest calendar unit the instant is not aligned to decides
/// the format, so month starts read "February" and year starts read "2020".
pub fn format_tick(t: DateTime<Utc>) -> String {
    let pattern = if floor(TimeUnit::Second, t) < t {
        ".%3f"
    } else if floor(TimeUnit::Minute, t) < t {
        ":%S"
    } else if floor(TimeUnit::Hour, t) < t {
        "%I:%M"
    } else if floor(TimeUnit::Day, t) < t {
        "%I %p"
    } else if floor(TimeUnit::Month, t) < t {
        if floor(TimeUnit::Week, t) < t { "%a %d" } else { "%b %d" }
    } else if floor(TimeUnit::Year, t) < t {
        "%B"
    } else {
        "%Y"
    };
    t.format(pattern).to_string()
}
