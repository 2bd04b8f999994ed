// File: crates/bubble-core/src/scale.rs
// Summary: The four scales of the bubble chart: time (x), point (y), log (radius), ordinal (color).

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Utc};

use crate::ticks;

/// Normalize `x` into `[0, 1]` over `[a, b]`; a collapsed domain maps to the midpoint.
#[inline]
fn normalize(a: f64, b: f64, x: f64) -> f64 {
    let span = b - a;
    if span != 0.0 && !span.is_nan() {
        (x - a) / span
    } else if span.is_nan() {
        f64::NAN
    } else {
        0.5
    }
}

/// Linear map from epoch milliseconds to pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    d0: f64,
    d1: f64,
    r0: f64,
    r1: f64,
}

impl TimeScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { d0: domain.0, d1: domain.1, r0: range.0, r1: range.1 }
    }

    /// Domain bounds in epoch milliseconds.
    pub fn domain(&self) -> (f64, f64) { (self.d0, self.d1) }

    pub fn range(&self) -> (f64, f64) { (self.r0, self.r1) }

    #[inline]
    pub fn to_px(&self, ms: f64) -> f64 {
        self.r0 + normalize(self.d0, self.d1, ms) * (self.r1 - self.r0)
    }

    /// Roughly `count` ticks on calendar boundaries.
    pub fn ticks(&self, count: usize) -> Vec<DateTime<Utc>> {
        ticks::time_ticks(self.d0, self.d1, count)
    }
}

/// Evenly spaced positions for an ordered set of categories.
#[derive(Clone, Debug)]
pub struct PointScale<K> {
    domain: Vec<K>,
    index: HashMap<K, usize>,
    range: (f64, f64),
    padding: f64,
    positions: Vec<f64>,
}

impl<K: Clone + Eq + Hash> PointScale<K> {
    /// Duplicates in `domain` are dropped; first occurrence wins.
    pub fn new(domain: impl IntoIterator<Item = K>, range: (f64, f64), padding: f64) -> Self {
        let mut s = Self {
            domain: Vec::new(),
            index: HashMap::new(),
            range,
            padding,
            positions: Vec::new(),
        };
        for k in domain {
            if !s.index.contains_key(&k) {
                s.index.insert(k.clone(), s.domain.len());
                s.domain.push(k);
            }
        }
        s.rescale();
        s
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let reverse = r1 < r0;
        let (start, stop) = if reverse { (r1, r0) } else { (r0, r1) };
        // point scale == band scale with inner padding 1
        let step = (stop - start) / (n - 1.0 + self.padding * 2.0).max(1.0);
        let first = start + (stop - start - step * (n - 1.0)) * 0.5;
        let mut positions: Vec<f64> = (0..self.domain.len()).map(|i| first + step * i as f64).collect();
        if reverse {
            positions.reverse();
        }
        self.positions = positions;
    }

    pub fn domain(&self) -> &[K] { &self.domain }
    pub fn range(&self) -> (f64, f64) { self.range }

    /// Position of `key`, NaN when it is not in the domain.
    pub fn position(&self, key: &K) -> f64 {
        self.index.get(key).map_or(f64::NAN, |&i| self.positions[i])
    }
}

/// Logarithmic map for strictly positive domains.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogScale {
    d0: f64,
    d1: f64,
    r0: f64,
    r1: f64,
    // cached log endpoints
    log_d0: f64,
    log_d1: f64,
}

impl LogScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            d0: domain.0,
            d1: domain.1,
            r0: range.0,
            r1: range.1,
            log_d0: domain.0.ln(),
            log_d1: domain.1.ln(),
        }
    }

    pub fn domain(&self) -> (f64, f64) { (self.d0, self.d1) }
    pub fn range(&self) -> (f64, f64) { (self.r0, self.r1) }

    /// Zero maps to negative infinity, negatives to NaN; callers decide how to clamp.
    #[inline]
    pub fn map(&self, x: f64) -> f64 {
        self.r0 + normalize(self.log_d0, self.log_d1, x.ln()) * (self.r1 - self.r0)
    }
}

/// Categorical lookup into a cyclic output range.
#[derive(Clone, Debug)]
pub struct OrdinalScale<K, V> {
    domain: Vec<K>,
    index: HashMap<K, usize>,
    range: Vec<V>,
}

impl<K: Clone + Eq + Hash, V: Clone> OrdinalScale<K, V> {
    /// Duplicates in `domain` are dropped; first occurrence wins.
    pub fn new(domain: impl IntoIterator<Item = K>, range: Vec<V>) -> Self {
        let mut index = HashMap::new();
        let mut uniq = Vec::new();
        for k in domain {
            if !index.contains_key(&k) {
                index.insert(k.clone(), uniq.len());
                uniq.push(k);
            }
        }
        Self { domain: uniq, index, range }
    }

    pub fn domain(&self) -> &[K] { &self.domain }

    /// `None` for keys outside the domain or when the range is empty.
    pub fn get(&self, key: &K) -> Option<V> {
        if self.range.is_empty() {
            return None;
        }
        self.index.get(key).map(|&i| self.range[i % self.range.len()].clone())
    }
}

