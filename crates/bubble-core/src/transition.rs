// File: crates/bubble-core/src/transition.rs
// Summary: Timed interpolation of mark geometry, fill and opacity, advanced by the host.

use std::time::Duration;

use crate::surface::Circle;
use crate::theme::Color;

/// Symmetric cubic easing of linear progress `t` in `[0, 1]`.
pub fn cubic_in_out(t: f64) -> f64 {
    let t2 = t.clamp(0.0, 1.0) * 2.0;
    if t2 <= 1.0 { t2 * t2 * t2 / 2.0 } else { ((t2 - 2.0) * (t2 - 2.0) * (t2 - 2.0) + 2.0) / 2.0 }
}

/// The animatable state of a node as it is displayed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    pub circle: Option<Circle>,
    pub fill: Option<Color>,
    pub opacity: f64,
}

impl Snapshot {
    /// Interpolate towards `to`. Channels missing on either side jump to `to`.
    pub fn lerp(&self, to: &Snapshot, t: f64) -> Snapshot {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Snapshot {
            circle: match (self.circle, to.circle) {
                (Some(a), Some(b)) => Some(Circle { cx: mix(a.cx, b.cx), cy: mix(a.cy, b.cy), r: mix(a.r, b.r) }),
                (_, b) => b,
            },
            fill: match (self.fill, to.fill) {
                (Some(a), Some(b)) => Some(a.lerp(b, t)),
                (_, b) => b,
            },
            opacity: mix(self.opacity, to.opacity),
        }
    }
}

/// A running transition. The target is always the node's own attributes, so a node
/// re-targeted mid-flight restarts from what is on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub from: Snapshot,
    pub duration: Duration,
    pub elapsed: Duration,
}

impl Transition {
    pub fn new(from: Snapshot, duration: Duration) -> Self {
        Self { from, duration, elapsed: Duration::ZERO }
    }

    /// Cubic in-out progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        cubic_in_out(self.elapsed.as_secs_f64() / self.duration.as_secs_f64())
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}
