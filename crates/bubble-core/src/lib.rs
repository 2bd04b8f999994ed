// File: crates/bubble-core/src/lib.rs
// Summary: Core library entry point; exports the bubble chart renderer and its drawing surface.

pub mod axis;
pub mod chart;
pub mod error;
pub mod join;
pub mod options;
pub mod record;
pub mod scale;
pub mod surface;
pub mod svg;
pub mod theme;
pub mod ticks;
pub mod transition;
pub mod types;
#[cfg(feature = "raster")]
pub mod raster;

pub use chart::{BubbleChart, Scales};
pub use error::{ChartError, Result};
pub use join::{join_by_index, join_by_key, Join};
pub use options::{ChartOptions, MarkStyle, TooltipFormatter};
pub use record::{records_from_csv, records_from_json, Category, Record, Value};
pub use surface::{Circle, Element, Node, NodeId, Surface};
pub use theme::{Color, Palette, Theme};
pub use types::{Dimensions, Insets, Point};
#[cfg(feature = "raster")]
pub use raster::RasterOptions;
