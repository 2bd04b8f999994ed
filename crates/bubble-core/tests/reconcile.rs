// File: crates/bubble-core/tests/reconcile.rs
// Purpose: Enter/update/exit behaviour of marks across repeated renders.

use std::time::Duration;

use bubble_core::{BubbleChart, ChartOptions, Record, Surface};

fn record(date: &str, state: &str, value: &str) -> Record {
    Record::new()
        .with("duration.start", date)
        .with("entity.state", state)
        .with("value", value)
        .with("indicator", "Dengue")
}

fn sample() -> Vec<Record> {
    vec![
        record("2020-01-01", "Kerala", "100"),
        record("2020-01-04", "Maharashtra", "400"),
        record("2020-01-24", "Maharashtra", "300"),
        record("2020-02-04", "Maharashtra", "10"),
        record("2020-05-04", "Maharashtra", "10"),
        record("2020-03-04", "Karnataka", "5"),
    ]
}

#[test]
fn one_mark_per_record_bound_by_position() {
    let chart = BubbleChart::default();
    let mut surface = Surface::new();
    let data = sample();
    chart.render(Some(&mut surface), &data);

    let marks = BubbleChart::marks(&surface);
    assert_eq!(marks.len(), data.len());
    for (i, id) in marks.iter().enumerate() {
        let node = surface.node(*id).expect("mark exists");
        assert_eq!(node.datum.as_ref(), Some(&data[i]), "mark {i} bound to record {i}");
        assert_eq!(node.element.tag(), "circle");
    }
}

#[test]
fn rerender_with_same_input_is_idempotent() {
    let chart = BubbleChart::default();
    let mut surface = Surface::new();
    let data = sample();

    chart.render(Some(&mut surface), &data);
    let first: Vec<_> = BubbleChart::marks(&surface)
        .into_iter()
        .map(|id| (id, surface.node(id).unwrap().target()))
        .collect();

    chart.render(Some(&mut surface), &data);
    let second: Vec<_> = BubbleChart::marks(&surface)
        .into_iter()
        .map(|id| (id, surface.node(id).unwrap().target()))
        .collect();

    assert_eq!(first, second);
}

#[test]
fn superset_enters_only_the_new_records() {
    let chart = BubbleChart::default();
    let mut surface = Surface::new();
    let data = sample();

    chart.render(Some(&mut surface), &data[..3]);
    let before = BubbleChart::marks(&surface);
    assert_eq!(before.len(), 3);

    chart.render(Some(&mut surface), &data);
    let after = BubbleChart::marks(&surface);
    assert_eq!(after.len(), 6);
    assert_eq!(&after[..3], &before[..], "existing marks are updated in place");
    assert!(after[3..].iter().all(|id| !before.contains(id)), "new records get new marks");
    assert!(after[3..].iter().all(|id| *id > before[2]));
}

#[test]
fn subset_removes_only_the_missing_records() {
    let chart = BubbleChart::default();
    let mut surface = Surface::new();
    let data = sample();

    chart.render(Some(&mut surface), &data);
    let before = BubbleChart::marks(&surface);

    chart.render(Some(&mut surface), &data[..4]);
    let after = BubbleChart::marks(&surface);
    assert_eq!(after, before[..4].to_vec());
    assert!(!surface.contains(before[4]));
    assert!(!surface.contains(before[5]));
}

#[test]
fn keyed_join_keeps_marks_with_their_key() {
    let chart = BubbleChart::new(ChartOptions::default().with_key_param("entity.state"));
    let mut surface = Surface::new();

    let first = vec![
        record("2020-01-01", "Kerala", "100"),
        record("2020-01-02", "Goa", "200"),
        record("2020-01-03", "Assam", "300"),
    ];
    chart.render(Some(&mut surface), &first);
    let ids = BubbleChart::marks(&surface);
    let (kerala, goa, assam) = (ids[0], ids[1], ids[2]);

    let second = vec![
        record("2020-02-01", "Assam", "50"),
        record("2020-02-02", "Kerala", "60"),
        record("2020-02-03", "Punjab", "70"),
    ];
    chart.render(Some(&mut surface), &second);
    let marks = BubbleChart::marks(&surface);

    assert_eq!(marks.len(), 3);
    assert_eq!(marks[0], assam);
    assert_eq!(marks[1], kerala);
    assert!(!ids.contains(&marks[2]));
    assert!(!surface.contains(goa));
    assert_eq!(surface.node(assam).unwrap().datum.as_ref(), Some(&second[0]));
}

#[test]
fn missing_container_is_a_noop() {
    let chart = BubbleChart::default();
    chart.render(None, &sample());
}

#[test]
fn tooltip_stays_above_marks() {
    let chart = BubbleChart::default();
    let mut surface = Surface::new();
    chart.render(Some(&mut surface), &sample()[..2]);
    chart.render(Some(&mut surface), &sample());

    let graph = BubbleChart::graph(&surface).expect("graph group");
    let last = *surface.children(graph).last().unwrap();
    assert!(surface.node(last).unwrap().has_class("tooltip"));
}

#[test]
fn container_groups_are_created_once() {
    let chart = BubbleChart::default();
    let mut surface = Surface::new();
    chart.render(Some(&mut surface), &sample());
    chart.render(Some(&mut surface), &sample()[..1]);
    chart.render(Some(&mut surface), &[]);

    assert_eq!(surface.children(surface.root()).len(), 1);
    let graph = BubbleChart::graph(&surface).unwrap();
    for class in ["xAxis", "yAxis", "tooltip"] {
        assert_eq!(surface.select_class(graph, class).len(), 1, "{class}");
    }
}

#[test]
fn transitions_converge_on_the_target() {
    let chart = BubbleChart::default();
    let mut surface = Surface::new();
    chart.render(Some(&mut surface), &sample());
    assert!(surface.is_animating());

    let mark = BubbleChart::marks(&surface)[0];
    let entering = surface.node(mark).unwrap().displayed();
    assert_eq!(entering.opacity, 0.0);
    assert_eq!(entering.circle.unwrap().r, 0.0);

    assert!(surface.advance(Duration::from_millis(375)));
    let halfway = surface.node(mark).unwrap().displayed();
    assert!((halfway.opacity - 0.5).abs() < 1e-9);

    assert!(!surface.advance(Duration::from_millis(375)));
    let node = surface.node(mark).unwrap();
    assert_eq!(node.displayed(), node.target());
}

#[test]
fn update_animates_from_the_previous_position() {
    let chart = BubbleChart::default();
    let mut surface = Surface::new();
    let data = sample();
    chart.render(Some(&mut surface), &data);
    surface.settle();

    let mark = BubbleChart::marks(&surface)[0];
    let old = surface.node(mark).unwrap().target().circle.unwrap();

    // moving the first record to the end of the range shifts it right
    let mut moved = data.clone();
    moved[0] = record("2020-06-01", "Kerala", "100");
    chart.render(Some(&mut surface), &moved);

    let node = surface.node(mark).unwrap();
    let transition = node.transition.as_ref().expect("update is animated");
    assert_eq!(transition.from.circle.unwrap(), old);
    assert!(node.target().circle.unwrap().cx > old.cx);
}

#[test]
fn repeated_renders_keep_storage_bounded() {
    let chart = BubbleChart::default();
    let mut surface = Surface::new();
    let data = sample();
    chart.render(Some(&mut surface), &data);
    let stored = surface.len();
    let created = surface.created();

    for _ in 0..1_000 {
        chart.render(Some(&mut surface), &data);
    }
    // axes are rebuilt with fresh ids each time, but removed nodes leave no residue
    assert_eq!(surface.len(), stored);
    assert!(surface.created() > created);

    surface.settle();
    assert!(!surface.is_animating());
}
