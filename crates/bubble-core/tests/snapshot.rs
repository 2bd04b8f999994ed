// File: crates/bubble-core/tests/snapshot.rs
// Purpose: Golden snapshot harness with bless flow.
// Behavior:
// - Renders a deterministic small bubble chart to PNG bytes, labels off.
// - If env UPDATE_SNAPSHOTS=1, (re)writes the snapshot file.
// - Else, if snapshot exists, compares decoded pixels for an exact match.
// - Else, logs a note and returns (skips) without failing to ease first run.
#![cfg(feature = "raster")]

use bubble_core::{BubbleChart, ChartOptions, RasterOptions, Record, Surface};

fn render_bytes() -> Vec<u8> {
    let rows = [
        ("2020-01-01", "Kerala", "3", "Confirmed"),
        ("2020-01-15", "Goa", "40", "Confirmed"),
        ("2020-02-01", "Kerala", "250", "Deceased"),
        ("2020-02-20", "Assam", "900", "Recovered"),
    ];
    let data: Vec<Record> = rows
        .iter()
        .map(|(d, s, v, i)| {
            Record::new().with("duration.start", *d).with("entity.state", *s).with("value", *v).with("indicator", *i)
        })
        .collect();

    let mut surface = Surface::new();
    BubbleChart::new(ChartOptions::default()).render(Some(&mut surface), &data);
    surface.settle();

    let opts = RasterOptions { draw_labels: false, ..RasterOptions::default() };
    surface.render_to_png_bytes(&opts).expect("render png")
}

#[test]
fn golden_basic_chart() {
    let bytes = render_bytes();
    let snap_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__");
    let snap_path = snap_dir.join("basic_chart.png");

    let update = std::env::var("UPDATE_SNAPSHOTS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if update {
        std::fs::create_dir_all(&snap_dir).expect("create snapshots dir");
        std::fs::write(&snap_path, &bytes).expect("write snapshot");
        eprintln!("[snapshot] Updated {} ({} bytes)", snap_path.display(), bytes.len());
        return;
    }

    if snap_path.exists() {
        let want = std::fs::read(&snap_path).expect("read snapshot");
        let got_img = image::load_from_memory(&bytes).expect("decode got").to_rgba8();
        let want_img = image::load_from_memory(&want).expect("decode want").to_rgba8();
        assert_eq!(got_img.as_raw(), want_img.as_raw(), "rendered pixels differ from golden snapshot: {}", snap_path.display());
    } else {
        eprintln!("[snapshot] Missing snapshot {}; set UPDATE_SNAPSHOTS=1 to bless.", snap_path.display());
    }
}
