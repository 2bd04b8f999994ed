// File: crates/bubble-dioxus/src/bin/desktop_demo.rs
// Purpose: Minimal launcher for the Dioxus desktop BubbleChartView demo.

#[cfg(feature = "desktop")]
fn main() {
    if let Err(e) = bubble_dioxus::ui::run_demo_ui() {
        eprintln!("bubble-dioxus demo error: {e}");
    }
}

#[cfg(not(feature = "desktop"))]
fn main() {
    if let Err(e) = bubble_dioxus::run_demo_ui() {
        eprintln!("{e}");
    }
}
