// File: crates/bubble-core/src/theme.rs
// Summary: Colors, categorical palettes and light/dark chart themes.

use std::fmt;
use std::str::FromStr;

/// RGBA color with 8-bit components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::from_argb(0, 0, 0, 0);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Unpack a 24-bit `0xRRGGBB` value as an opaque color.
    pub const fn hex(rgb: u32) -> Self {
        Self::rgb(((rgb >> 16) & 0xFF) as u8, ((rgb >> 8) & 0xFF) as u8, (rgb & 0xFF) as u8)
    }

    /// Channel-wise linear interpolation; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, to: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color { r: mix(self.r, to.r), g: mix(self.g, to.g), b: mix(self.b, to.b), a: mix(self.a, to.a) }
    }
}

impl fmt::Display for Color {
    /// CSS hex notation, `#rrggbb`; alpha is carried separately as opacity.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    /// Accepts `#rrggbb`, `#rgb` and the keywords `black`, `white` and `none`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "black" => return Ok(Color::BLACK),
            "white" => return Ok(Color::WHITE),
            "none" | "transparent" => return Ok(Color::TRANSPARENT),
            _ => {}
        }
        let hex = s.strip_prefix('#').ok_or_else(|| format!("unsupported color `{s}`"))?;
        let digits = match hex.len() {
            6 => hex.to_string(),
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(format!("unsupported color `{s}`")),
        };
        u32::from_str_radix(&digits, 16).map(Color::hex).map_err(|e| format!("bad color `{s}`: {e}"))
    }
}

impl TryFrom<String> for Color {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

const CATEGORY10: [Color; 10] = [
    Color::hex(0x1f77b4),
    Color::hex(0xff7f0e),
    Color::hex(0x2ca02c),
    Color::hex(0xd62728),
    Color::hex(0x9467bd),
    Color::hex(0x8c564b),
    Color::hex(0xe377c2),
    Color::hex(0x7f7f7f),
    Color::hex(0xbcbd22),
    Color::hex(0x17becf),
];

const SET2: [Color; 8] = [
    Color::hex(0x66c2a5),
    Color::hex(0xfc8d62),
    Color::hex(0x8da0cb),
    Color::hex(0xe78ac3),
    Color::hex(0xa6d854),
    Color::hex(0xffd92f),
    Color::hex(0xe5c494),
    Color::hex(0xb3b3b3),
];

/// Categorical palette used by the color channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
pub enum Palette {
    #[default]
    #[serde(alias = "category10", alias = "schemeCategory10")]
    Category10,
    #[serde(alias = "set2", alias = "schemeSet2")]
    Set2,
}

impl Palette {
    pub fn colors(&self) -> &'static [Color] {
        match self {
            Palette::Category10 => &CATEGORY10,
            Palette::Set2 => &SET2,
        }
    }
}

/// Non-data colors of the chart: background, axes, tooltip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Color,
    pub axis_line: Color,
    pub axis_label: Color,
    pub tooltip_background: Color,
    pub tooltip_text: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            background: Color::rgb(255, 255, 255),
            axis_line: Color::rgb(0, 0, 0),
            axis_label: Color::rgb(0, 0, 0),
            tooltip_background: Color::rgb(0, 0, 0),
            tooltip_text: Color::rgb(255, 255, 255),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: Color::rgb(18, 18, 20),
            axis_line: Color::rgb(180, 180, 190),
            axis_label: Color::rgb(235, 235, 245),
            tooltip_background: Color::rgb(235, 235, 245),
            tooltip_text: Color::rgb(18, 18, 20),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::light()
    }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    for t in presets() { if t.name.eq_ignore_ascii_case(name) { return t; } }
    Theme::light()
}
