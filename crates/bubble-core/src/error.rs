// File: crates/bubble-core/src/error.rs
// Summary: Error type for the fallible edges of the crate (loading records, rasterizing, file output).
// Rendering itself never fails: malformed values degrade into NaN geometry instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV input: {0}")]
    Csv(#[from] csv::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("expected a JSON array of objects, found {0}")]
    NotAnArray(&'static str),
    #[error("raster backend: {0}")]
    Raster(String),
}
