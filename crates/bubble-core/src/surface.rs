// File: crates/bubble-core/src/surface.rs
// Summary: Retained drawing surface: an SVG-like node tree the chart reconciles into.
// Notes:
// - Node ids are never reused. A mark that survives a re-render keeps its id, which is
//   how "updated in place" differs from "removed and recreated". Removed nodes are
//   dropped from storage; only the id counter keeps growing.
// - Geometry stored on a node is its target state; a running transition describes how
//   the displayed state converges to it.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::record::Record;
use crate::theme::Color;
use crate::transition::{Snapshot, Transition};
use crate::types::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Circle {
    pub fn contains(&self, p: Point) -> bool {
        let (dx, dy) = (p.x - self.cx, p.y - self.cy);
        dx * dx + dy * dy <= self.r * self.r
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rx: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    pub x: f64,
    pub y: f64,
    /// Baseline shift in ems.
    pub dy: f64,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Svg,
    Group,
    Circle(Circle),
    Line(Line),
    Rect(Rect),
    /// Open polyline.
    Path(Vec<Point>),
    Text(Text),
}

impl Element {
    pub fn tag(&self) -> &'static str {
        match self {
            Element::Svg => "svg",
            Element::Group => "g",
            Element::Circle(_) => "circle",
            Element::Line(_) => "line",
            Element::Rect(_) => "rect",
            Element::Path(_) => "path",
            Element::Text(_) => "text",
        }
    }
}

/// Presentation attributes. `None` inherits from the parent the way SVG does.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f64,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub anchor: Option<Anchor>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
            font_size: None,
            font_family: None,
            anchor: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub element: Element,
    pub class: String,
    pub translate: Point,
    pub style: Style,
    /// Record bound by a data join.
    pub datum: Option<Record>,
    pub transition: Option<Transition>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(element: Element, class: &str, parent: Option<NodeId>) -> Self {
        Self {
            element,
            class: class.to_string(),
            translate: Point::default(),
            style: Style::default(),
            datum: None,
            transition: None,
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> { self.parent }
    pub fn children(&self) -> &[NodeId] { &self.children }

    pub fn has_class(&self, class: &str) -> bool {
        self.class.split_whitespace().any(|c| c == class)
    }

    pub fn circle(&self) -> Option<Circle> {
        match self.element {
            Element::Circle(c) => Some(c),
            _ => None,
        }
    }

    /// Target state, ignoring any running transition.
    pub fn target(&self) -> Snapshot {
        Snapshot { circle: self.circle(), fill: self.style.fill, opacity: self.style.opacity }
    }

    /// State as currently displayed.
    pub fn displayed(&self) -> Snapshot {
        let target = self.target();
        match &self.transition {
            Some(t) => t.from.lerp(&target, t.progress()),
            None => target,
        }
    }
}

/// The container the chart draws into.
#[derive(Clone, Debug)]
pub struct Surface {
    nodes: HashMap<NodeId, Node>,
    next_id: u64,
    root: NodeId,
    view_box: Option<(f64, f64)>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    pub fn new() -> Self {
        let root = NodeId(0);
        let nodes = HashMap::from([(root, Node::new(Element::Svg, "", None))]);
        Self { nodes, next_id: 1, root, view_box: None }
    }

    pub fn root(&self) -> NodeId { self.root }

    pub fn view_box(&self) -> Option<(f64, f64)> { self.view_box }

    pub fn set_view_box(&mut self, width: f64, height: f64) {
        self.view_box = Some((width, height));
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Nodes ever created; grows monotonically.
    pub fn created(&self) -> u64 {
        self.next_id
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    /// Append a child at the end of `parent`'s children.
    pub fn append(&mut self, parent: NodeId, element: Element, class: &str) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        let attached = match self.node_mut(parent) {
            Some(p) => {
                p.children.push(id);
                Some(parent)
            }
            None => None,
        };
        self.nodes.insert(id, Node::new(element, class, attached));
        id
    }

    /// Remove a node and its subtree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root {
            return;
        }
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        if let Some(p) = node.parent.and_then(|p| self.node_mut(p)) {
            p.children.retain(|c| *c != id);
        }
        let mut stack = node.children;
        while let Some(child) = stack.pop() {
            if let Some(n) = self.nodes.remove(&child) {
                stack.extend(n.children);
            }
        }
    }

    /// Remove every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        for child in self.children(id).to_vec() {
            self.remove(child);
        }
    }

    /// Direct children of `parent` carrying `class`, in document order.
    pub fn select_class(&self, parent: NodeId, class: &str) -> Vec<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|c| self.node(*c).is_some_and(|n| n.has_class(class)))
            .collect()
    }

    /// Join a single placeholder against `parent`'s children of `class`: return the first
    /// match, or append a new node when there is none. The flag is true on creation.
    pub fn singleton(&mut self, parent: NodeId, class: &str, make: impl FnOnce() -> Element) -> (NodeId, bool) {
        match self.select_class(parent, class).first() {
            Some(id) => (*id, false),
            None => (self.append(parent, make(), class), true),
        }
    }

    /// Move `id` to the end of its parent's children so it paints last.
    pub fn raise(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).and_then(Node::parent) else { return };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != id);
            p.children.push(id);
        }
    }

    /// Rearrange the given children of `parent` into `order`, reusing the slots they
    /// already occupy. Children not listed keep their positions.
    pub fn reorder(&mut self, parent: NodeId, order: &[NodeId]) {
        let Some(p) = self.node_mut(parent) else { return };
        let wanted: HashSet<NodeId> = order.iter().copied().collect();
        let slots: Vec<usize> = p
            .children
            .iter()
            .enumerate()
            .filter(|(_, c)| wanted.contains(c))
            .map(|(i, _)| i)
            .collect();
        if slots.len() != order.len() {
            return;
        }
        for (slot, id) in slots.into_iter().zip(order) {
            p.children[slot] = *id;
        }
    }

    /// Sum of translations from the root down to and including `id`.
    pub fn absolute_offset(&self, id: NodeId) -> Point {
        let mut at = Point::default();
        let mut cur = self.node(id);
        while let Some(n) = cur {
            at = at.offset(n.translate.x, n.translate.y);
            cur = n.parent.and_then(|p| self.node(p));
        }
        at
    }

    /// Topmost data-bound circle under `p` (surface coordinates).
    pub fn hit_test(&self, p: Point) -> Option<NodeId> {
        let mut hit = None;
        self.walk(self.root, &mut |id, node| {
            if node.datum.is_none() {
                return;
            }
            let Some(circle) = node.displayed().circle else { return };
            let origin = self.absolute_offset(id);
            if circle.contains(Point::new(p.x - origin.x, p.y - origin.y)) {
                hit = Some(id);
            }
        });
        hit
    }

    /// Depth-first visit in paint order.
    pub fn walk(&self, from: NodeId, f: &mut dyn FnMut(NodeId, &Node)) {
        if let Some(node) = self.node(from) {
            f(from, node);
            for child in node.children.iter() {
                self.walk(*child, f);
            }
        }
    }

    /// Start a transition on `id` from `from` towards the node's current attributes.
    pub fn animate(&mut self, id: NodeId, from: Snapshot, duration: Duration) {
        if let Some(n) = self.node_mut(id) {
            n.transition = if duration.is_zero() { None } else { Some(Transition::new(from, duration)) };
        }
    }

    /// Advance every running transition by `dt`. Returns true while any is still running.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let mut running = false;
        for node in self.nodes.values_mut() {
            if let Some(t) = node.transition.as_mut() {
                t.elapsed += dt;
                if t.is_finished() {
                    node.transition = None;
                } else {
                    running = true;
                }
            }
        }
        running
    }

    /// Jump every transition to its end state.
    pub fn settle(&mut self) {
        for node in self.nodes.values_mut() {
            node.transition = None;
        }
    }

    pub fn is_animating(&self) -> bool {
        self.nodes.values().any(|n| n.transition.is_some())
    }
}
