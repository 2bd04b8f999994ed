// File: crates/bubble-core/tests/smoke.rs
// Purpose: Basic end-to-end render smoke test writing a PNG.
#![cfg(feature = "raster")]

use bubble_core::{records_from_json, BubbleChart, ChartOptions, RasterOptions, Surface};

#[test]
fn render_smoke_png() {
    let data = records_from_json(
        r#"[
            {"duration.start": "2020-03-01", "entity.State": "Kerala", "value": "120", "indicator": "Confirmed"},
            {"duration.start": "2020-03-15", "entity.State": "Goa", "value": "8", "indicator": "Deceased"},
            {"duration.start": "2020-04-02", "entity.State": "Kerala", "value": "400", "indicator": "Recovered"}
        ]"#,
    )
    .expect("records");
    let chart = BubbleChart::new(ChartOptions::default().with_y_param("entity.State"));
    let mut surface = Surface::new();
    chart.render(Some(&mut surface), &data);
    surface.settle();

    let opts = RasterOptions::default();
    let out = std::path::PathBuf::from("target/test_out/smoke.png");
    surface.render_to_png(&opts, &out).expect("render should succeed");
    let meta = std::fs::metadata(&out).expect("output exists");
    assert!(meta.len() > 0, "png should be non-empty");

    let bytes = surface.render_to_png_bytes(&opts).expect("render bytes");
    assert!(bytes.starts_with(&[137, 80, 78, 71]), "should be PNG header");
}
