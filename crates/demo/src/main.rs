// File: crates/demo/src/main.rs
// Summary: Story harness: renders the sample stories, a JSON story file or a CSV file to SVG/PNG.
// Usage:
//   bubble-demo                 render both embedded samples, the second over the first
//   bubble-demo story.json      render a `{ "data": [...], "args": {...} }` story
//   bubble-demo records.csv     render CSV rows with the default field mapping

use anyhow::{Context, Result};
use bubble_core::{records_from_csv, BubbleChart, ChartOptions, RasterOptions, Record, Surface, Theme};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SAMPLE: &str = include_str!("../stories/sample.json");
const SAMPLE2: &str = include_str!("../stories/sample2.json");

/// A story: records plus the chart arguments they are meant to be shown with.
#[derive(Debug, Deserialize)]
struct Story {
    data: Vec<Record>,
    #[serde(default)]
    args: ChartOptions,
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    match std::env::args().nth(1) {
        None => render_samples(),
        Some(raw) => render_file(Path::new(&raw)),
    }
}

fn parse_story(name: &str, json: &str) -> Result<Story> {
    serde_json::from_str(json).with_context(|| format!("parsing story '{name}'"))
}

/// Sample, then Sample2 on the same surface: the second render reconciles against the
/// first, so its marks move from where the first left them.
fn render_samples() -> Result<()> {
    let first = parse_story("sample", SAMPLE)?;
    let second = parse_story("sample2", SAMPLE2)?;

    let mut surface = Surface::new();
    let chart = BubbleChart::new(first.args);
    chart.render(Some(&mut surface), &first.data);
    surface.settle();
    write_outputs(&surface, "sample", &chart.options().theme)?;

    let before = BubbleChart::marks(&surface);
    let chart = BubbleChart::new(second.args);
    chart.render(Some(&mut surface), &second.data);
    let after = BubbleChart::marks(&surface);
    let kept = after.iter().filter(|id| before.contains(id)).count();
    tracing::info!(kept, entered = after.len() - kept, exited = before.len() - kept, "sample2 over sample");

    // SVG mid-flight carries <animate> elements; the PNG shows the halfway frame
    let half = chart.options().transition() / 2;
    surface.advance(half);
    write_outputs(&surface, "sample2_transition", &chart.options().theme)?;

    surface.advance(Duration::from_secs(1));
    write_outputs(&surface, "sample2", &chart.options().theme)?;
    Ok(())
}

fn render_file(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("file not found: {}", path.display());
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    let story = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
            let data = records_from_csv(file).with_context(|| format!("failed to load CSV '{}'", path.display()))?;
            Story { data, args: ChartOptions::default() }
        }
        "json" => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            parse_story(&path.display().to_string(), &json)?
        }
        other => anyhow::bail!("unsupported input extension '{other}' (expected .csv or .json)"),
    };
    tracing::info!(records = story.data.len(), input = %path.display(), "loaded");
    if story.data.is_empty() {
        tracing::warn!("no records loaded; the chart will only show axes");
    }

    let mut surface = Surface::new();
    let chart = BubbleChart::new(story.args);
    chart.render(Some(&mut surface), &story.data);
    surface.settle();
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("chart");
    write_outputs(&surface, stem, &chart.options().theme)
}

/// Produce output file names like target/out/bubble_<stem>.{svg,png}
fn out_path(stem: &str, ext: &str) -> PathBuf {
    PathBuf::from("target/out").join(format!("bubble_{stem}.{ext}"))
}

fn write_outputs(surface: &Surface, stem: &str, theme: &Theme) -> Result<()> {
    let svg = out_path(stem, "svg");
    if let Some(dir) = svg.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    std::fs::write(&svg, surface.to_svg()).with_context(|| format!("writing {}", svg.display()))?;
    tracing::info!(path = %svg.display(), "wrote");

    let png = out_path(stem, "png");
    surface
        .render_to_png(&RasterOptions::themed(theme), &png)
        .with_context(|| format!("writing {}", png.display()))?;
    tracing::info!(path = %png.display(), "wrote");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_stories_parse_with_their_args() {
        let story = parse_story("sample", SAMPLE).unwrap();
        assert_eq!(story.data.len(), 6);
        assert_eq!(story.args.y_param, "entity.State");
        let y = BubbleChart::new(story.args).scales(&story.data).y;
        assert_eq!(y.domain().len(), 3, "Kerala, Maharashtra, Karnataka");

        assert_eq!(parse_story("sample2", SAMPLE2).unwrap().data.len(), 6);
    }
}
