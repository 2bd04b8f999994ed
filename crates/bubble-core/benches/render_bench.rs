// File: crates/bubble-core/benches/render_bench.rs
// Summary: Reconcile, SVG and PNG throughput for charts of a few thousand records.

use anyhow::Result;
use bubble_core::{BubbleChart, ChartOptions, RasterOptions, Record, Surface};
use criterion::{criterion_group, criterion_main, Criterion, black_box};

const STATES: [&str; 8] = ["Kerala", "Goa", "Assam", "Punjab", "Bihar", "Sikkim", "Odisha", "Manipur"];
const INDICATORS: [&str; 3] = ["Confirmed", "Deceased", "Recovered"];

fn build_records(n: usize, shift: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let day = (i + shift) % 365;
            Record::new()
                .with("id", i.to_string())
                .with("duration.start", format!("2020-{:02}-{:02}", day / 31 % 12 + 1, day % 28 + 1))
                .with("entity.state", STATES[i % STATES.len()])
                .with("value", ((i * 37 + shift) % 5_000).to_string())
                .with("indicator", INDICATORS[i % INDICATORS.len()])
        })
        .collect()
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    for &n in &[1_000usize, 5_000usize] {
        let chart = BubbleChart::new(ChartOptions::default().with_key_param("id"));
        let first = build_records(n, 0);
        let second = build_records(n, 7);
        group.bench_function(format!("keyed_{n}"), |b| {
            b.iter(|| {
                let mut surface = Surface::new();
                chart.render(Some(&mut surface), &first);
                chart.render(Some(&mut surface), &second);
                black_box(surface.len());
            });
        });
    }
    group.finish();
}

fn bench_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("output");
    let data = build_records(5_000, 0);
    let mut surface = Surface::new();
    BubbleChart::default().render(Some(&mut surface), &data);
    surface.settle();

    group.bench_function("svg_5000", |b| b.iter(|| black_box(surface.to_svg())));
    group.bench_function("png_5000", |b| {
        let opts = RasterOptions { width: 800, height: 500, draw_labels: false, ..RasterOptions::default() };
        b.iter(|| -> Result<()> {
            let bytes = surface.render_to_png_bytes(&opts)?;
            black_box(bytes);
            Ok(())
        });
    });
    group.finish();
}

criterion_group!(benches, bench_reconcile, bench_output);
criterion_main!(benches);
