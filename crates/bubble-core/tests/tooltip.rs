// File: crates/bubble-core/tests/tooltip.rs
// Purpose: Pointer-driven tooltip and hit testing on a settled chart.

use std::time::Duration;

use bubble_core::chart::TOOLTIP_CLASS;
use bubble_core::surface::Element;
use bubble_core::{BubbleChart, ChartOptions, Color, MarkStyle, NodeId, Point, Record, Surface};

fn kerala() -> Record {
    Record::new()
        .with("duration.start", "2020-01-01")
        .with("entity.state", "Kerala")
        .with("value", "100")
        .with("indicator", "Confirmed")
}

fn rendered(options: ChartOptions) -> (BubbleChart, Surface, NodeId) {
    let chart = BubbleChart::new(options);
    let mut surface = Surface::new();
    chart.render(Some(&mut surface), &[kerala()]);
    surface.settle();
    let mark = BubbleChart::marks(&surface)[0];
    (chart, surface, mark)
}

fn tooltip(surface: &Surface) -> NodeId {
    let graph = BubbleChart::graph(surface).expect("graph");
    surface.select_class(graph, TOOLTIP_CLASS)[0]
}

fn tooltip_text(surface: &Surface) -> String {
    let label = surface.select_class(tooltip(surface), "tooltipText")[0];
    match &surface.node(label).unwrap().element {
        Element::Text(t) => t.content.clone(),
        other => panic!("unexpected element {other:?}"),
    }
}

#[test]
fn tooltip_starts_hidden() {
    let (_, surface, _) = rendered(ChartOptions::default());
    let t = surface.node(tooltip(&surface)).unwrap();
    assert_eq!(t.displayed().opacity, 0.0);
    assert!(t.children().is_empty());
}

#[test]
fn pointer_over_shows_default_text_offset_from_pointer() {
    let (chart, mut surface, mark) = rendered(ChartOptions::default());
    chart.pointer_over(&mut surface, mark, Point::new(200.0, 100.0));

    let t = surface.node(tooltip(&surface)).unwrap();
    assert_eq!(t.translate, Point::new(120.0, 120.0));
    assert_eq!(tooltip_text(&surface), "Kerala - 100");

    // fades in over 200ms
    assert_eq!(t.displayed().opacity, 0.0);
    surface.advance(Duration::from_millis(100));
    let halfway = surface.node(tooltip(&surface)).unwrap().displayed().opacity;
    assert!((halfway - 0.5).abs() < 1e-9);
    assert!(!surface.advance(Duration::from_millis(100)));
    assert_eq!(surface.node(tooltip(&surface)).unwrap().displayed().opacity, 1.0);
}

#[test]
fn custom_formatter_replaces_default_text() {
    let options = ChartOptions::default().with_tooltip(|r| format!("{} cases", r.get("value").unwrap()));
    let (chart, mut surface, mark) = rendered(options);
    chart.pointer_over(&mut surface, mark, Point::new(0.0, 0.0));
    assert_eq!(tooltip_text(&surface), "100 cases");
}

#[test]
fn tooltip_follows_the_pointer() {
    let (chart, mut surface, mark) = rendered(ChartOptions::default());
    chart.pointer_over(&mut surface, mark, Point::new(200.0, 100.0));
    chart.pointer_move(&mut surface, Point::new(300.0, 50.0));
    assert_eq!(surface.node(tooltip(&surface)).unwrap().translate, Point::new(220.0, 70.0));
}

#[test]
fn pointer_leave_fades_out() {
    let (chart, mut surface, mark) = rendered(ChartOptions::default());
    chart.pointer_over(&mut surface, mark, Point::new(200.0, 100.0));
    surface.settle();
    chart.pointer_leave(&mut surface, Some(mark));

    assert_eq!(surface.node(tooltip(&surface)).unwrap().displayed().opacity, 1.0);
    surface.advance(Duration::from_millis(200));
    assert_eq!(surface.node(tooltip(&surface)).unwrap().displayed().opacity, 0.0);
}

#[test]
fn hover_stroke_is_applied_and_restored() {
    let red = Color::rgb(255, 0, 0);
    let options = ChartOptions::default().with_mark_style(MarkStyle { hover_stroke: Some(red), ..MarkStyle::default() });
    let (chart, mut surface, mark) = rendered(options);

    chart.pointer_over(&mut surface, mark, Point::new(0.0, 0.0));
    assert_eq!(surface.node(mark).unwrap().style.stroke, Some(red));
    chart.pointer_leave(&mut surface, Some(mark));
    assert_eq!(surface.node(mark).unwrap().style.stroke, None);
}

#[test]
fn hit_test_finds_mark_in_surface_coordinates() {
    let (_, surface, mark) = rendered(ChartOptions::default());
    let c = surface.node(mark).unwrap().circle().unwrap();
    assert_eq!(surface.hit_test(Point::new(c.cx + 110.0, c.cy + 10.0)), Some(mark));
    assert_eq!(surface.hit_test(Point::new(c.cx + 110.0 + 2.0 * c.r, c.cy + 10.0)), None);
    assert_eq!(surface.hit_test(Point::new(0.0, 0.0)), None);
}

#[test]
fn pointer_events_without_a_chart_are_ignored() {
    let chart = BubbleChart::default();
    let mut surface = Surface::new();
    chart.pointer_move(&mut surface, Point::new(1.0, 1.0));
    chart.pointer_leave(&mut surface, None);
    assert!(surface.is_empty());
}
