// File: crates/bubble-core/src/svg.rs
// Summary: SVG serialization of a Surface. Running transitions become SMIL <animate> elements.

use std::fmt::Write;

use crate::surface::{Anchor, Element, Node, NodeId, Style, Surface};
use crate::transition::Snapshot;

/// Compact number formatting: at most three decimals, no trailing zeros.
fn num(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn style_attr(style: &Style, element: &Element) -> String {
    let mut css = Vec::new();
    match (style.fill, element) {
        (Some(c), _) if c.a == 0 => css.push("fill: none".to_string()),
        (Some(c), _) => css.push(format!("fill: {c}")),
        (None, Element::Path(_)) => css.push("fill: none".to_string()),
        _ => {}
    }
    match style.stroke {
        Some(c) => {
            css.push(format!("stroke: {c}"));
            if style.stroke_width != 1.0 {
                css.push(format!("stroke-width: {}", num(style.stroke_width)));
            }
        }
        None if matches!(element, Element::Circle(_)) => css.push("stroke: none".to_string()),
        None => {}
    }
    if style.opacity != 1.0 {
        css.push(format!("opacity: {}", num(style.opacity)));
    }
    if let Some(size) = style.font_size {
        css.push(format!("font-size: {}px", num(size)));
    }
    if let Some(family) = &style.font_family {
        css.push(format!("font-family: {}", escape(family)));
    }
    css.join("; ")
}

fn animate_tags(out: &mut String, node: &Node) {
    let Some(t) = &node.transition else { return };
    let from = node.displayed();
    let to = node.target();
    let dur = t.remaining().as_millis();
    let mut tag = |name: &str, a: String, b: String| {
        if a != b {
            let _ = write!(
                out,
                r#"<animate attributeName="{name}" from="{a}" to="{b}" dur="{dur}ms" fill="freeze"/>"#
            );
        }
    };
    if let (Some(a), Some(b)) = (from.circle, to.circle) {
        tag("cx", num(a.cx), num(b.cx));
        tag("cy", num(a.cy), num(b.cy));
        tag("r", num(a.r), num(b.r));
    }
    if let (Some(a), Some(b)) = (from.fill, to.fill) {
        tag("fill", a.to_string(), b.to_string());
    }
    tag("opacity", num(from.opacity), num(to.opacity));
}

fn write_node(out: &mut String, surface: &Surface, id: NodeId) {
    let Some(node) = surface.node(id) else { return };
    let tag = node.element.tag();
    let _ = write!(out, "<{tag}");
    if !node.class.is_empty() {
        let _ = write!(out, r#" class="{}""#, escape(&node.class));
    }
    if node.translate.x != 0.0 || node.translate.y != 0.0 {
        let _ = write!(out, r#" transform="translate({},{})""#, num(node.translate.x), num(node.translate.y));
    }
    // the displayed state is written as the static value; <animate> carries it to the target
    let shown: Snapshot = node.displayed();
    match &node.element {
        Element::Svg | Element::Group => {}
        Element::Circle(c) => {
            let c = shown.circle.unwrap_or(*c);
            let _ = write!(out, r#" cx="{}" cy="{}" r="{}""#, num(c.cx), num(c.cy), num(c.r));
        }
        Element::Line(l) => {
            let _ = write!(out, r#" x1="{}" y1="{}" x2="{}" y2="{}""#, num(l.x1), num(l.y1), num(l.x2), num(l.y2));
        }
        Element::Rect(r) => {
            let _ = write!(
                out,
                r#" x="{}" y="{}" width="{}" height="{}" rx="{}""#,
                num(r.x),
                num(r.y),
                num(r.width),
                num(r.height),
                num(r.rx)
            );
        }
        Element::Path(points) => {
            let d: Vec<String> = points
                .iter()
                .enumerate()
                .map(|(i, p)| format!("{}{},{}", if i == 0 { 'M' } else { 'L' }, num(p.x), num(p.y)))
                .collect();
            let _ = write!(out, r#" d="{}""#, d.concat());
        }
        Element::Text(t) => {
            let _ = write!(out, r#" x="{}" y="{}""#, num(t.x), num(t.y));
            if t.dy != 0.0 {
                let _ = write!(out, r#" dy="{}em""#, num(t.dy));
            }
        }
    }
    if let Some(anchor) = node.style.anchor {
        let a = match anchor {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        };
        let _ = write!(out, r#" text-anchor="{a}""#);
    }
    let mut style = node.style.clone();
    style.fill = shown.fill.or(style.fill);
    style.opacity = shown.opacity;
    let css = style_attr(&style, &node.element);
    if !css.is_empty() {
        let _ = write!(out, r#" style="{css}""#);
    }
    out.push('>');
    animate_tags(out, node);
    if let Element::Text(t) = &node.element {
        out.push_str(&escape(&t.content));
    }
    for child in node.children() {
        write_node(out, surface, *child);
    }
    let _ = write!(out, "</{tag}>");
}

impl Surface {
    /// Serialize the whole tree as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="100%""#);
        if let Some((w, h)) = self.view_box() {
            let _ = write!(out, r#" viewBox="0 0 {} {}""#, num(w), num(h));
        }
        out.push('>');
        for child in self.children(self.root()) {
            write_node(&mut out, self, *child);
        }
        out.push_str("</svg>");
        out
    }
}
