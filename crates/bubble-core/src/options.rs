// File: crates/bubble-core/src/options.rs
// Summary: Field mapping and render configuration with documented defaults.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::record::{category_label, Record};
use crate::theme::{Color, Palette, Theme};
use crate::types::Dimensions;

pub const DEFAULT_DATE_PARAM: &str = "duration.start";
pub const DEFAULT_Y_PARAM: &str = "entity.state";
pub const DEFAULT_SIZE_PARAM: &str = "value";
pub const DEFAULT_COLOR_PARAM: &str = "indicator";

/// Caller-supplied tooltip text for a record. Compared by identity.
#[derive(Clone)]
pub struct TooltipFormatter(Arc<dyn Fn(&Record) -> String + Send + Sync>);

impl TooltipFormatter {
    pub fn new(f: impl Fn(&Record) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn format(&self, record: &Record) -> String {
        (self.0)(record)
    }
}

impl fmt::Debug for TooltipFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TooltipFormatter(..)")
    }
}

impl PartialEq for TooltipFormatter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Presentation of the circles themselves.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkStyle {
    /// Resting fill opacity.
    pub opacity: f64,
    /// Persistent outline; `None` draws no stroke.
    pub stroke: Option<Color>,
    /// Outline applied while the pointer is over a mark.
    pub hover_stroke: Option<Color>,
}

impl Default for MarkStyle {
    fn default() -> Self {
        Self { opacity: 1.0, stroke: None, hover_stroke: None }
    }
}

fn theme_by_name<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Theme, D::Error> {
    let name = String::deserialize(d)?;
    Ok(crate::theme::find(&name))
}

/// Field mapping plus everything else a render needs.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOptions {
    /// Record key feeding the x (time) channel.
    pub date_param: String,
    /// Explicit `[start, end]` for the x domain; either bound may be left to the data.
    pub date_domain: [Option<DateTime<Utc>>; 2],
    /// Record key feeding the y (category) channel.
    pub y_param: String,
    /// Explicit y categories, in display order from the bottom up.
    pub y_domain: Option<Vec<String>>,
    /// Record key feeding the radius channel.
    pub size_param: String,
    /// Record key feeding the color channel.
    pub color_param: String,
    /// When set, marks are joined by this field's value instead of array position.
    pub key_param: Option<String>,
    /// Tick count hint for the x-axis.
    pub x_ticks: usize,
    pub palette: Palette,
    /// Built-in theme, by name (`"light"`, `"dark"`).
    #[serde(deserialize_with = "theme_by_name")]
    pub theme: Theme,
    pub dimensions: Dimensions,
    pub mark_style: MarkStyle,
    pub font_size: f64,
    pub font_family: String,
    pub transition_ms: u64,
    pub tooltip_fade_ms: u64,
    #[serde(skip)]
    pub tooltip: Option<TooltipFormatter>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            date_param: DEFAULT_DATE_PARAM.to_string(),
            date_domain: [None, None],
            y_param: DEFAULT_Y_PARAM.to_string(),
            y_domain: None,
            size_param: DEFAULT_SIZE_PARAM.to_string(),
            color_param: DEFAULT_COLOR_PARAM.to_string(),
            key_param: None,
            x_ticks: 5,
            palette: Palette::default(),
            theme: Theme::default(),
            dimensions: Dimensions::default(),
            mark_style: MarkStyle::default(),
            font_size: 14.0,
            font_family: "Roboto sans-serif".to_string(),
            transition_ms: 750,
            tooltip_fade_ms: 200,
            tooltip: None,
        }
    }
}

impl ChartOptions {
    pub fn with_date_param(mut self, field: impl Into<String>) -> Self {
        self.date_param = field.into();
        self
    }

    pub fn with_y_param(mut self, field: impl Into<String>) -> Self {
        self.y_param = field.into();
        self
    }

    pub fn with_size_param(mut self, field: impl Into<String>) -> Self {
        self.size_param = field.into();
        self
    }

    pub fn with_color_param(mut self, field: impl Into<String>) -> Self {
        self.color_param = field.into();
        self
    }

    pub fn with_key_param(mut self, field: impl Into<String>) -> Self {
        self.key_param = Some(field.into());
        self
    }

    pub fn with_y_domain<S: Into<String>>(mut self, domain: impl IntoIterator<Item = S>) -> Self {
        self.y_domain = Some(domain.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_date_domain(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.date_domain = [start, end];
        self
    }

    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_mark_style(mut self, style: MarkStyle) -> Self {
        self.mark_style = style;
        self
    }

    pub fn with_tooltip(mut self, f: impl Fn(&Record) -> String + Send + Sync + 'static) -> Self {
        self.tooltip = Some(TooltipFormatter::new(f));
        self
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn tooltip_fade(&self) -> Duration {
        Duration::from_millis(self.tooltip_fade_ms)
    }

    /// Tooltip text for `record`: the caller's formatter, or `"<y> - <size>"`.
    pub fn tooltip_text(&self, record: &Record) -> String {
        match &self.tooltip {
            Some(f) => f.format(record),
            None => {
                let y = record.category(&self.y_param);
                let size = record.get(&self.size_param).map(|v| v.to_string());
                format!("{} - {}", category_label(&y), size.as_deref().unwrap_or("(none)"))
            }
        }
    }
}
