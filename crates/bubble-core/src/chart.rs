// File: crates/bubble-core/src/chart.rs
// Summary: BubbleChart: derives scales from records and reconciles circle marks into a Surface.

use chrono::Utc;

use crate::axis::Axis;
use crate::join::{join_by_index, join_by_key, Join};
use crate::options::ChartOptions;
use crate::record::{Category, Record};
use crate::scale::{LogScale, OrdinalScale, PointScale, TimeScale};
use crate::surface::{Circle, Element, NodeId, Rect, Surface, Text};
use crate::theme::Color;
use crate::transition::Snapshot;
use crate::types::Point;

pub const GRAPH_CLASS: &str = "graphContainer";
pub const X_AXIS_CLASS: &str = "xAxis";
pub const Y_AXIS_CLASS: &str = "yAxis";
pub const TOOLTIP_CLASS: &str = "tooltip";
pub const MARK_CLASS: &str = "dot";

/// Share of the date span added on each side of the x domain.
pub const X_PADDING: f64 = 0.05;
/// Lower bound of the size domain; keeps the log scale defined at small values.
pub const SIZE_DOMAIN_MIN: f64 = 1e-7;
/// Upper bound of the size domain when the data has no usable maximum.
pub const SIZE_FALLBACK_MAX: f64 = 1000.0;
pub const RADIUS_RANGE: (f64, f64) = (1.0, 4.0);

const TOOLTIP_OFFSET: f64 = 30.0;
const TOOLTIP_PADDING: f64 = 10.0;

/// The four scales of one render.
#[derive(Clone, Debug)]
pub struct Scales {
    pub x: TimeScale,
    pub y: PointScale<Category>,
    pub size: LogScale,
    pub color: OrdinalScale<Category, Color>,
}

/// Bubble chart renderer. Holds configuration only; all visual state lives in the
/// `Surface` it renders into.
#[derive(Clone, Debug, Default)]
pub struct BubbleChart {
    options: ChartOptions,
}

impl BubbleChart {
    pub fn new(options: ChartOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ChartOptions) {
        self.options = options;
    }

    /// Derive the scales for `data` under the current options.
    pub fn scales(&self, data: &[Record]) -> Scales {
        let o = &self.options;
        let dims = o.dimensions;

        let (lo, hi) = data
            .iter()
            .map(|r| r.timestamp_ms(&o.date_param))
            .filter(|t| !t.is_nan())
            .fold((None, None), |(lo, hi): (Option<f64>, Option<f64>), t| {
                (Some(lo.map_or(t, |v| v.min(t))), Some(hi.map_or(t, |v| v.max(t))))
            });
        let min_x = o.date_domain[0].map(|d| d.timestamp_millis() as f64).or(lo).unwrap_or(0.0);
        let max_x = o.date_domain[1]
            .map(|d| d.timestamp_millis() as f64)
            .or(hi)
            .unwrap_or_else(|| Utc::now().timestamp_millis() as f64);
        let pad = (max_x - min_x) * X_PADDING;
        let x = TimeScale::new((min_x - pad, max_x + pad), (0.0, dims.plot_width()));

        let y_domain: Vec<Category> = match &o.y_domain {
            Some(domain) => domain.iter().cloned().map(Some).collect(),
            None => data.iter().map(|r| r.category(&o.y_param)).collect(),
        };
        let y = PointScale::new(y_domain, (dims.baseline(), 0.0), 1.0);

        let size_max = data
            .iter()
            .map(|r| r.int(&o.size_param))
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));
        let size_max = match size_max {
            Some(m) if m != 0.0 => m,
            _ => SIZE_FALLBACK_MAX,
        };
        let size = LogScale::new((SIZE_DOMAIN_MIN, size_max), RADIUS_RANGE);

        let color = OrdinalScale::new(
            data.iter().map(|r| r.category(&o.color_param)),
            o.palette.colors().to_vec(),
        );

        Scales { x, y, size, color }
    }

    /// Geometry and fill of the mark bound to `record`.
    pub fn mark_for(&self, scales: &Scales, record: &Record) -> (Circle, Color) {
        let o = &self.options;
        let r = scales.size.map(record.int(&o.size_param));
        let circle = Circle {
            cx: scales.x.to_px(record.timestamp_ms(&o.date_param)),
            cy: scales.y.position(&record.category(&o.y_param)),
            // a radius that is NaN, infinite or negative draws nothing
            r: if r.is_finite() && r > 0.0 { r } else { 0.0 },
        };
        let fill = scales.color.get(&record.category(&o.color_param)).unwrap_or(Color::BLACK);
        (circle, fill)
    }

    /// Render `data` into `container`. Repeated calls reconcile against what the previous
    /// call left behind. A missing container makes this a no-op.
    pub fn render(&self, container: Option<&mut Surface>, data: &[Record]) {
        let Some(surface) = container else {
            tracing::debug!("no container; render skipped");
            return;
        };
        let o = &self.options;
        let dims = o.dimensions;
        surface.set_view_box(dims.width as f64, dims.height as f64);

        let root = surface.root();
        let (graph, _) = surface.singleton(root, GRAPH_CLASS, || Element::Group);
        if let Some(g) = surface.node_mut(graph) {
            g.translate = Point::new(dims.margins.left as f64, dims.margins.top as f64);
            g.style.font_size = Some(o.font_size);
            g.style.font_family = Some(o.font_family.clone());
        }

        let scales = self.scales(data);

        let (x_axis, _) = surface.singleton(graph, X_AXIS_CLASS, || Element::Group);
        if let Some(g) = surface.node_mut(x_axis) {
            g.translate = Point::new(0.0, dims.baseline());
        }
        Axis::bottom(&scales.x, o.x_ticks).draw(surface, x_axis, &o.theme);

        let (y_axis, _) = surface.singleton(graph, Y_AXIS_CLASS, || Element::Group);
        Axis::left(&scales.y).draw(surface, y_axis, &o.theme);

        let (tooltip, created) = surface.singleton(graph, TOOLTIP_CLASS, || Element::Group);
        if created {
            if let Some(t) = surface.node_mut(tooltip) {
                t.style.opacity = 0.0;
            }
        }

        let join = self.join_marks(surface, graph, data);
        let mut ordered = vec![None; data.len()];

        for id in &join.exit {
            surface.remove(*id);
        }

        for &(i, id) in &join.update {
            let from = surface.node(id).map(|n| n.displayed());
            let (circle, fill) = self.mark_for(&scales, &data[i]);
            if let Some(n) = surface.node_mut(id) {
                n.element = Element::Circle(circle);
                n.datum = Some(data[i].clone());
                n.style.fill = Some(fill);
                n.style.stroke = o.mark_style.stroke;
                n.style.opacity = o.mark_style.opacity;
            }
            if let Some(from) = from {
                surface.animate(id, from, o.transition());
            }
            ordered[i] = Some(id);
        }

        for &i in &join.enter {
            let (circle, fill) = self.mark_for(&scales, &data[i]);
            let id = surface.append(graph, Element::Circle(circle), MARK_CLASS);
            if let Some(n) = surface.node_mut(id) {
                n.datum = Some(data[i].clone());
                n.style.fill = Some(fill);
                n.style.stroke = o.mark_style.stroke;
                n.style.opacity = o.mark_style.opacity;
            }
            let from = Snapshot { circle: Some(Circle { r: 0.0, ..circle }), fill: Some(fill), opacity: 0.0 };
            surface.animate(id, from, o.transition());
            ordered[i] = Some(id);
        }

        if o.key_param.is_some() {
            let order: Vec<NodeId> = ordered.into_iter().flatten().collect();
            surface.reorder(graph, &order);
        }
        surface.raise(tooltip);

        tracing::debug!(
            enter = join.enter.len(),
            update = join.update.len(),
            exit = join.exit.len(),
            "reconciled marks"
        );
    }

    fn join_marks(&self, surface: &Surface, graph: NodeId, data: &[Record]) -> Join {
        let existing = surface.select_class(graph, MARK_CLASS);
        match &self.options.key_param {
            None => join_by_index(&existing, data.len()),
            Some(key) => {
                let nodes: Vec<(NodeId, Category)> = existing
                    .iter()
                    .map(|id| (*id, surface.node(*id).and_then(|n| n.datum.as_ref()).and_then(|d| d.category(key))))
                    .collect();
                let keys: Vec<Category> = data.iter().map(|r| r.category(key)).collect();
                join_by_key(&nodes, &keys)
            }
        }
    }

    /// The plot group created by the first render, if any.
    pub fn graph(surface: &Surface) -> Option<NodeId> {
        surface.select_class(surface.root(), GRAPH_CLASS).first().copied()
    }

    /// Mark nodes in document order.
    pub fn marks(surface: &Surface) -> Vec<NodeId> {
        Self::graph(surface).map(|g| surface.select_class(g, MARK_CLASS)).unwrap_or_default()
    }

    fn tooltip(surface: &Surface) -> Option<NodeId> {
        let graph = Self::graph(surface)?;
        surface.select_class(graph, TOOLTIP_CLASS).first().copied()
    }

    /// Pointer entered `mark` at `pointer` (surface coordinates): show the tooltip.
    pub fn pointer_over(&self, surface: &mut Surface, mark: NodeId, pointer: Point) {
        let o = &self.options;
        let (Some(graph), Some(tooltip)) = (Self::graph(surface), Self::tooltip(surface)) else { return };
        let Some(text) = surface.node(mark).and_then(|n| n.datum.as_ref()).map(|d| o.tooltip_text(d)) else {
            return;
        };

        if let Some(stroke) = o.mark_style.hover_stroke {
            if let Some(n) = surface.node_mut(mark) {
                n.style.stroke = Some(stroke);
            }
        }

        let label_w = text.chars().count() as f64 * o.font_size * 0.6;
        let (bg, _) = surface.singleton(tooltip, "tooltipBackground", || {
            Element::Rect(Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0, rx: 5.0 })
        });
        if let Some(n) = surface.node_mut(bg) {
            n.element = Element::Rect(Rect {
                x: -TOOLTIP_PADDING,
                y: -(o.font_size + TOOLTIP_PADDING),
                width: label_w + 2.0 * TOOLTIP_PADDING,
                height: o.font_size + 2.0 * TOOLTIP_PADDING,
                rx: 5.0,
            });
            n.style.fill = Some(o.theme.tooltip_background);
        }
        let (label, _) = surface.singleton(tooltip, "tooltipText", || {
            Element::Text(Text { x: 0.0, y: 0.0, dy: 0.0, content: String::new() })
        });
        if let Some(n) = surface.node_mut(label) {
            n.element = Element::Text(Text { x: 0.0, y: 0.0, dy: 0.0, content: text });
            n.style.fill = Some(o.theme.tooltip_text);
        }

        let origin = surface.absolute_offset(graph);
        self.fade_tooltip(surface, tooltip, 1.0);
        if let Some(n) = surface.node_mut(tooltip) {
            n.translate = Point::new(pointer.x - origin.x + TOOLTIP_OFFSET, pointer.y - origin.y + TOOLTIP_OFFSET);
        }
    }

    /// Pointer moved while over a mark: the tooltip follows it.
    pub fn pointer_move(&self, surface: &mut Surface, pointer: Point) {
        let (Some(graph), Some(tooltip)) = (Self::graph(surface), Self::tooltip(surface)) else { return };
        let origin = surface.absolute_offset(graph);
        if let Some(n) = surface.node_mut(tooltip) {
            n.translate = Point::new(pointer.x - origin.x + TOOLTIP_OFFSET, pointer.y - origin.y + TOOLTIP_OFFSET);
        }
    }

    /// Pointer left `mark`: fade the tooltip out and drop any hover outline.
    pub fn pointer_leave(&self, surface: &mut Surface, mark: Option<NodeId>) {
        if let Some(id) = mark {
            let stroke = self.options.mark_style.stroke;
            if let Some(n) = surface.node_mut(id) {
                n.style.stroke = stroke;
            }
        }
        if let Some(tooltip) = Self::tooltip(surface) {
            self.fade_tooltip(surface, tooltip, 0.0);
        }
    }

    fn fade_tooltip(&self, surface: &mut Surface, tooltip: NodeId, to: f64) {
        let Some(from) = surface.node(tooltip).map(|n| n.displayed()) else { return };
        if let Some(n) = surface.node_mut(tooltip) {
            n.style.opacity = to;
        }
        surface.animate(tooltip, from, self.options.tooltip_fade());
    }
}
