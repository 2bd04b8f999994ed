// File: crates/bubble-core/src/types.rs
// Summary: Shared types and constants (surface size, margins, points).

/// Default view box width in pixels.
pub const WIDTH: u32 = 954;
/// Default view box height in pixels.
pub const HEIGHT: u32 = 500;

/// Screen margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    /// Create new insets (non-negative by type).
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right).
    pub const fn hsum(&self) -> u32 { self.left + self.right }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(110, 10, 10, 30)
    }
}

/// View box size plus the margins around the plot area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub margins: Insets,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32, margins: Insets) -> Self {
        Self { width, height, margins }
    }

    /// Horizontal extent of the x range: `[0, width - right - left]`.
    pub fn plot_width(&self) -> f64 {
        self.width as f64 - self.margins.hsum() as f64
    }

    /// Baseline of the x-axis inside the translated plot group.
    pub fn baseline(&self) -> f64 {
        self.height as f64 - self.margins.bottom as f64
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(WIDTH, HEIGHT, Insets::default())
    }
}

/// A point in surface (view box) coordinates unless stated otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}
