// File: crates/bubble-dioxus/src/lib.rs
// Summary: Host integration for the bubble chart: a props-driven ChartHost plus a Dioxus view.
// Notes:
// - ChartHost is headless and owns the Surface. It re-renders only when the props it is
//   given differ from the last ones, so a host can call `set_props` on every frame.
// - The Dioxus component lives behind the `desktop` feature, so the workspace builds
//   without fetching Dioxus unless explicitly enabled.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use bubble_core::{BubbleChart, ChartOptions, NodeId, Point, RasterOptions, Record, Surface};

/// Everything a render depends on. Equal props never trigger a render.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartProps {
    pub data: Vec<Record>,
    pub options: ChartOptions,
}

impl ChartProps {
    pub fn new(data: Vec<Record>, options: ChartOptions) -> Self {
        Self { data, options }
    }
}

#[derive(Debug, Default)]
pub struct ChartHost {
    chart: BubbleChart,
    surface: Surface,
    last: Option<ChartProps>,
    hovered: Option<NodeId>,
    pointer: Option<Point>,
    clock: Option<Instant>,
}

impl ChartHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply new props. Returns true when they differed and the chart was re-rendered.
    pub fn set_props(&mut self, props: ChartProps) -> bool {
        if self.last.as_ref() == Some(&props) {
            return false;
        }
        self.chart.set_options(props.options.clone());
        self.chart.render(Some(&mut self.surface), &props.data);
        tracing::debug!(records = props.data.len(), "host re-rendered");

        // the hovered mark may have left with the old data, or been rebound to another record
        match (self.hovered, self.pointer) {
            (Some(id), Some(p)) if self.surface.contains(id) => self.chart.pointer_over(&mut self.surface, id, p),
            (Some(_), _) => {
                self.hovered = None;
                self.chart.pointer_leave(&mut self.surface, None);
            }
            (None, _) => {}
        }
        self.last = Some(props);
        true
    }

    pub fn props(&self) -> Option<&ChartProps> {
        self.last.as_ref()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Advance running transitions by `dt`. Returns true while any is still running.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.surface.advance(dt)
    }

    /// Advance transitions by the wall time elapsed since the previous call.
    pub fn advance_to(&mut self, now: Instant) -> bool {
        let dt = self.clock.map(|prev| now.saturating_duration_since(prev)).unwrap_or_default();
        self.clock = Some(now);
        self.tick(dt)
    }

    pub fn settle(&mut self) {
        self.surface.settle();
    }

    /// Pointer moved to `p` (surface coordinates). Enter, move and leave are derived from
    /// which mark, if any, lies under the pointer.
    pub fn pointer_move(&mut self, p: Point) -> Option<NodeId> {
        let hit = self.surface.hit_test(p);
        match (self.hovered, hit) {
            (Some(prev), Some(id)) if prev == id => self.chart.pointer_move(&mut self.surface, p),
            (prev, Some(id)) => {
                if prev.is_some() {
                    self.chart.pointer_leave(&mut self.surface, prev);
                }
                self.chart.pointer_over(&mut self.surface, id, p);
            }
            (Some(prev), None) => self.chart.pointer_leave(&mut self.surface, Some(prev)),
            (None, None) => {}
        }
        self.hovered = hit;
        self.pointer = Some(p);
        hit
    }

    /// Pointer left the chart entirely.
    pub fn pointer_leave(&mut self) {
        self.pointer = None;
        if let Some(id) = self.hovered.take() {
            self.chart.pointer_leave(&mut self.surface, Some(id));
        }
    }

    pub fn svg(&self) -> String {
        self.surface.to_svg()
    }

    pub fn png(&self, opts: &RasterOptions) -> Result<Vec<u8>> {
        self.surface.render_to_png_bytes(opts).context("rasterizing chart")
    }
}

#[cfg(feature = "desktop")]
pub mod ui {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Instant;

    use base64::Engine as _;
    use bubble_core::{ChartOptions, Point, RasterOptions, Record};
    use dioxus::prelude::*;

    use super::{ChartHost, ChartProps};

    #[derive(Props, Clone, PartialEq)]
    pub struct BubbleChartViewProps {
        pub data: Vec<Record>,
        #[props(default)]
        pub options: ChartOptions,
        /// Show a PNG snapshot of the settled chart instead of live SVG markup.
        #[props(default = false)]
        pub raster: bool,
    }

    enum Content {
        Svg(String),
        Png(String),
        Failed(String),
    }

    /// Mounts a ChartHost and injects its output. SVG mode animates through the SMIL
    /// elements the surface emits; the host clock keeps the retained state in step.
    #[component]
    pub fn BubbleChartView(props: BubbleChartViewProps) -> Element {
        let host = use_hook(|| Rc::new(RefCell::new(ChartHost::new())));
        // bumped by pointer events so the markup is regenerated
        let mut version = use_signal(|| 0u64);
        let _ = version();

        let dims = props.options.dimensions;
        let (width, height) = (dims.width, dims.height);
        let content = {
            let mut h = host.borrow_mut();
            h.advance_to(Instant::now());
            h.set_props(ChartProps::new(props.data.clone(), props.options.clone()));
            if props.raster {
                h.settle();
                let opts = RasterOptions { width: width as i32, height: height as i32, ..RasterOptions::default() };
                match h.png(&opts) {
                    Ok(bytes) => Content::Png(format!(
                        "data:image/png;base64,{}",
                        base64::engine::general_purpose::STANDARD.encode(bytes)
                    )),
                    Err(e) => Content::Failed(format!("{e:#}")),
                }
            } else {
                Content::Svg(h.svg())
            }
        };

        let moved = host.clone();
        let left = host.clone();
        rsx! {
            div {
                style: "position:relative; width:{width}px; height:{height}px;",
                onmousemove: move |evt: MouseEvent| {
                    let p = evt.element_coordinates();
                    moved.borrow_mut().pointer_move(Point::new(p.x, p.y));
                    version += 1;
                },
                onmouseleave: move |_| {
                    left.borrow_mut().pointer_leave();
                    version += 1;
                },
                {match content {
                    Content::Svg(markup) => rsx! { div { style: "width:100%; height:100%;", dangerous_inner_html: markup } },
                    Content::Png(src) => rsx! { img { style: "width:100%; height:100%;", src } },
                    Content::Failed(msg) => rsx! { pre { "{msg}" } },
                }}
            }
        }
    }

    /// Tiny demo launcher: two datasets toggled by a button, to watch marks enter,
    /// move and exit.
    pub fn run_demo_ui() -> Result<(), String> {
        use dioxus::prelude::*;

        fn dataset(second: bool) -> Vec<Record> {
            let rows: &[(&str, &str, &str, &str)] = if second {
                &[
                    ("2020-01-01", "Kerala", "1", "Confirmed"),
                    ("2020-02-01", "Kerala", "4", "Confirmed"),
                    ("2020-02-15", "Goa", "12", "Deceased"),
                    ("2020-03-10", "Assam", "80", "Recovered"),
                ]
            } else {
                &[
                    ("2020-01-01", "Kerala", "1", "Confirmed"),
                    ("2020-01-20", "Goa", "3", "Confirmed"),
                    ("2020-02-01", "Kerala", "4", "Deceased"),
                ]
            };
            rows.iter()
                .map(|(d, s, v, i)| {
                    Record::new()
                        .with("id", format!("{s}-{d}"))
                        .with("duration.start", *d)
                        .with("entity.state", *s)
                        .with("value", *v)
                        .with("indicator", *i)
                })
                .collect()
        }

        #[component]
        fn App() -> Element {
            let mut second = use_signal(|| false);
            let options = ChartOptions::default().with_key_param("id");
            rsx! {
                div {
                    button { onclick: move |_| second.toggle(), "Toggle data" }
                    super::ui::BubbleChartView { data: dataset(second()), options }
                }
            }
        }

        let cfg = dioxus_desktop::Config::new()
            .with_prerendered("<style>html,body{margin:0;font-family:sans-serif}</style>".to_string());
        let providers: Vec<Box<dyn Fn() -> Box<dyn std::any::Any> + Send + Sync>> = Vec::new();
        let globals: Vec<Box<dyn std::any::Any>> = vec![Box::new(cfg)];
        dioxus_desktop::launch::launch(App, providers, globals)
    }
}

/// Fallback when the `desktop` feature is not enabled.
#[cfg(not(feature = "desktop"))]
pub fn run_demo_ui() -> Result<(), &'static str> {
    Err("bubble-dioxus built without `desktop` feature; enable features to run UI demo")
}
