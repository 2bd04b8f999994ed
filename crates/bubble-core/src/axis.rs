// File: crates/bubble-core/src/axis.rs
// Summary: Axis model (ticks + labels) and its drawing into a surface group.

use crate::record::{category_label, Category};
use crate::scale::{PointScale, TimeScale};
use crate::surface::{Anchor, Element, Line, NodeId, Surface, Text};
use crate::theme::Theme;
use crate::ticks::format_tick;
use crate::types::Point;

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const FONT_SIZE: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orient {
    Bottom,
    Left,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisTick {
    /// Position along the axis, in pixels.
    pub offset: f64,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub orient: Orient,
    pub range: (f64, f64),
    pub ticks: Vec<AxisTick>,
}

impl Axis {
    /// Bottom axis for a time scale with about `count` ticks.
    pub fn bottom(scale: &TimeScale, count: usize) -> Self {
        let ticks = scale
            .ticks(count)
            .into_iter()
            .map(|t| AxisTick { offset: scale.to_px(t.timestamp_millis() as f64), label: format_tick(t) })
            .collect();
        Self { orient: Orient::Bottom, range: scale.range(), ticks }
    }

    /// Left axis for a point scale: one tick per category.
    pub fn left(scale: &PointScale<Category>) -> Self {
        let ticks = scale
            .domain()
            .iter()
            .map(|c| AxisTick { offset: scale.position(c), label: category_label(c).to_string() })
            .collect();
        Self { orient: Orient::Left, range: scale.range(), ticks }
    }

    fn domain_path(&self) -> Vec<Point> {
        let (r0, r1) = self.range;
        match self.orient {
            Orient::Bottom => vec![
                Point::new(r0, TICK_SIZE),
                Point::new(r0, 0.0),
                Point::new(r1, 0.0),
                Point::new(r1, TICK_SIZE),
            ],
            Orient::Left => vec![
                Point::new(-TICK_SIZE, r0),
                Point::new(0.0, r0),
                Point::new(0.0, r1),
                Point::new(-TICK_SIZE, r1),
            ],
        }
    }

    /// Redraw the axis inside `group`, replacing whatever was drawn before.
    pub fn draw(&self, surface: &mut Surface, group: NodeId, theme: &Theme) {
        surface.clear_children(group);
        if let Some(g) = surface.node_mut(group) {
            g.style.font_size = Some(FONT_SIZE);
            g.style.font_family = Some("sans-serif".to_string());
            g.style.anchor = Some(match self.orient {
                Orient::Bottom => Anchor::Middle,
                Orient::Left => Anchor::End,
            });
        }

        let domain = surface.append(group, Element::Path(self.domain_path()), "domain");
        if let Some(n) = surface.node_mut(domain) {
            n.style.stroke = Some(theme.axis_line);
        }

        for tick in &self.ticks {
            let (translate, line, text) = match self.orient {
                Orient::Bottom => (
                    Point::new(tick.offset, 0.0),
                    Line { x1: 0.0, y1: 0.0, x2: 0.0, y2: TICK_SIZE },
                    Text { x: 0.0, y: TICK_SIZE + TICK_PADDING, dy: 0.71, content: tick.label.clone() },
                ),
                Orient::Left => (
                    Point::new(0.0, tick.offset),
                    Line { x1: 0.0, y1: 0.0, x2: -TICK_SIZE, y2: 0.0 },
                    Text { x: -(TICK_SIZE + TICK_PADDING), y: 0.0, dy: 0.32, content: tick.label.clone() },
                ),
            };
            let g = surface.append(group, Element::Group, "tick");
            if let Some(n) = surface.node_mut(g) {
                n.translate = translate;
            }
            let l = surface.append(g, Element::Line(line), "");
            if let Some(n) = surface.node_mut(l) {
                n.style.stroke = Some(theme.axis_line);
            }
            let t = surface.append(g, Element::Text(text), "");
            if let Some(n) = surface.node_mut(t) {
                n.style.fill = Some(theme.axis_label);
            }
        }
    }
}
