// File: crates/bubble-core/src/record.rs
// Summary: Heterogeneous data records and the coercions the visual channels apply to them.
// Notes:
// - Keys are literal: "duration.start" is a single key, not a nested path.
// - Coercions never fail. Unparseable dates and sizes become NaN and flow into the
//   scales unchanged, so a malformed record yields degenerate geometry, not an error.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::{ChartError, Result};

/// A primitive field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Date(DateTime<Utc>),
    Text(String),
}

/// Category value for the y and color channels. A missing field is its own category.
pub type Category = Option<String>;

impl Value {
    /// Milliseconds since the Unix epoch, or NaN when the value is not a date.
    pub fn as_timestamp_ms(&self) -> f64 {
        match self {
            Value::Date(d) => d.timestamp_millis() as f64,
            Value::Number(n) => *n,
            Value::Text(s) => match parse_date(s) {
                Some(d) => d.timestamp_millis() as f64,
                None => {
                    tracing::trace!(value = %s, "unparseable date");
                    f64::NAN
                }
            },
        }
    }

    /// Leading-integer parse: `"400"` is 400, `"12.7"` is 12, `"abc"` is NaN.
    pub fn as_int(&self) -> f64 {
        match self {
            Value::Number(n) if n.is_finite() => n.trunc(),
            Value::Number(_) | Value::Date(_) => f64::NAN,
            Value::Text(s) => parse_int_prefix(s),
        }
    }

    /// Key used by keyed joins and categorical scales.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => fmt_number(*n, f),
            Value::Date(d) => f.write_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Text(s.to_string()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::Text(s) }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self { Value::Number(n) }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self { Value::Number(n as f64) }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self { Value::Date(d) }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        write!(f, "{:.0}", n)
    } else {
        write!(f, "{}", n)
    }
}

/// Parse the date notations the sample data uses. Date-only and zone-less forms are UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|n| Utc.from_utc_datetime(&n));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(n) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&n));
        }
    }
    None
}

fn parse_int_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    match rest[..end].parse::<f64>() {
        Ok(v) => sign * v,
        Err(_) => {
            tracing::trace!(value = %s, "unparseable integer");
            f64::NAN
        }
    }
}

/// One observation: a mapping from field names to primitive values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Date channel: epoch milliseconds, NaN when absent or unparseable.
    pub fn timestamp_ms(&self, field: &str) -> f64 {
        self.get(field).map_or(f64::NAN, Value::as_timestamp_ms)
    }

    /// Size channel: leading-integer value, NaN when absent or unparseable.
    pub fn int(&self, field: &str) -> f64 {
        self.get(field).map_or(f64::NAN, Value::as_int)
    }

    /// Category channels (y, color): display string of the value.
    pub fn category(&self, field: &str) -> Category {
        self.get(field).map(Value::key)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Map a loaded field onto a value. Strings stay text even when they look like dates;
/// the date channel parses them on read. `null` means the field is absent.
fn json_field(v: serde_json::Value) -> Option<Value> {
    match v {
        serde_json::Value::Null => None,
        serde_json::Value::Number(n) => Some(n.as_f64().map_or_else(|| Value::Text(n.to_string()), Value::Number)),
        serde_json::Value::String(s) => Some(Value::Text(s)),
        serde_json::Value::Bool(b) => Some(Value::Text(b.to_string())),
        nested => Some(Value::Text(nested.to_string())),
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(d)?;
        Ok(raw.into_iter().filter_map(|(k, v)| Some((k, json_field(v)?))).collect())
    }
}

/// Label for a category, including the missing one.
pub fn category_label(c: &Category) -> &str {
    c.as_deref().unwrap_or("(none)")
}

/// Parse a JSON array of flat objects into records.
pub fn records_from_json(input: &str) -> Result<Vec<Record>> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    if !value.is_array() {
        let kind = match value {
            serde_json::Value::Object(_) => "an object",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Number(_) => "a number",
            _ => "a scalar",
        };
        return Err(ChartError::NotAnArray(kind));
    }
    Ok(serde_json::from_value(value)?)
}

/// Read records from CSV with a header row. Every cell is kept as text, the way the
/// sample stories carry their values; empty cells are left out of the record.
pub fn records_from_csv<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut out = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let record = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(h, cell)| (h.to_string(), Value::Text(cell.to_string())))
            .collect();
        out.push(record);
    }
    Ok(out)
}
