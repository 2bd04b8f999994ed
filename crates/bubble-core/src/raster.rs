// File: crates/bubble-core/src/raster.rs
// Summary: Headless rasterization of a Surface using Skia CPU raster surfaces (PNG / RGBA).

use skia_safe as skia;

use crate::error::{ChartError, Result};
use crate::surface::{Anchor, Element, Node, NodeId, Surface};
use crate::theme::{Color, Theme};
use crate::types::{HEIGHT, WIDTH};

pub struct RasterOptions {
    /// Output size in pixels; the view box is scaled to fit.
    pub width: i32,
    pub height: i32,
    pub background: Color,
    /// Text is platform dependent; tests turn it off for stable pixels.
    pub draw_labels: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { width: WIDTH as i32, height: HEIGHT as i32, background: Color::WHITE, draw_labels: true }
    }
}

impl RasterOptions {
    /// Default size on the theme's background.
    pub fn themed(theme: &Theme) -> Self {
        Self { background: theme.background, ..Self::default() }
    }
}

fn sk(c: Color, opacity: f64) -> skia::Color {
    let a = (c.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
    skia::Color::from_argb(a, c.r, c.g, c.b)
}

/// Inherited presentation state while walking the tree.
#[derive(Clone, Copy)]
struct Inherited {
    fill: Color,
    opacity: f64,
    font_size: f32,
    anchor: Anchor,
}

impl Surface {
    fn paint(&self, canvas: &skia::Canvas, id: NodeId, inherited: Inherited, opts: &RasterOptions) {
        let Some(node) = self.node(id) else { return };
        let shown = node.displayed();
        let state = Inherited {
            fill: shown.fill.or(node.style.fill).unwrap_or(inherited.fill),
            opacity: inherited.opacity * shown.opacity,
            font_size: node.style.font_size.map(|s| s as f32).unwrap_or(inherited.font_size),
            anchor: node.style.anchor.unwrap_or(inherited.anchor),
        };
        if state.opacity <= 0.0 {
            return;
        }

        canvas.save();
        canvas.translate((node.translate.x as f32, node.translate.y as f32));
        draw_element(canvas, node, &state, opts);
        for child in node.children() {
            self.paint(canvas, *child, state, opts);
        }
        canvas.restore();
    }

    /// Render into a fresh raster surface and return it.
    fn rasterize(&self, opts: &RasterOptions) -> Result<skia::Surface> {
        let mut surface = skia::surfaces::raster_n32_premul((opts.width.max(1), opts.height.max(1)))
            .ok_or_else(|| ChartError::Raster("failed to create raster surface".into()))?;
        let canvas = surface.canvas();
        canvas.clear(sk(opts.background, 1.0));

        if let Some((vw, vh)) = self.view_box() {
            if vw > 0.0 && vh > 0.0 {
                let s = (opts.width as f64 / vw).min(opts.height as f64 / vh) as f32;
                canvas.scale((s, s));
            }
        }
        let root = Inherited { fill: Color::BLACK, opacity: 1.0, font_size: 16.0, anchor: Anchor::Start };
        self.paint(canvas, self.root(), root, opts);
        Ok(surface)
    }

    /// Render to an unpremultiplied RGBA8 buffer. Returns `(pixels, width, height, row_bytes)`.
    pub fn render_to_rgba8(&self, opts: &RasterOptions) -> Result<(Vec<u8>, u32, u32, usize)> {
        let mut surface = self.rasterize(opts)?;
        let (w, h) = (surface.width(), surface.height());
        let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
        let row_bytes = w as usize * 4;
        let mut pixels = vec![0u8; row_bytes * h as usize];
        if !surface.read_pixels(&info, &mut pixels, row_bytes, (0, 0)) {
            return Err(ChartError::Raster("read_pixels failed".into()));
        }
        Ok((pixels, w as u32, h as u32, row_bytes))
    }

    /// Render to PNG bytes in memory.
    pub fn render_to_png_bytes(&self, opts: &RasterOptions) -> Result<Vec<u8>> {
        let mut surface = self.rasterize(opts)?;
        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| ChartError::Raster("encode PNG failed".into()))?;
        Ok(data.as_bytes().to_vec())
    }

    /// Render to a PNG file, creating parent directories as needed.
    pub fn render_to_png(&self, opts: &RasterOptions, output_png_path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.render_to_png_bytes(opts)?;
        if let Some(parent) = output_png_path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output_png_path, bytes)?;
        Ok(())
    }
}

fn draw_element(canvas: &skia::Canvas, node: &Node, state: &Inherited, opts: &RasterOptions) {
    let mut fill = skia::Paint::default();
    fill.set_anti_alias(true);
    fill.set_style(skia::paint::Style::Fill);
    fill.set_color(sk(state.fill, state.opacity));

    let mut stroke = skia::Paint::default();
    stroke.set_anti_alias(true);
    stroke.set_style(skia::paint::Style::Stroke);
    stroke.set_stroke_width(node.style.stroke_width as f32);
    if let Some(c) = node.style.stroke {
        stroke.set_color(sk(c, state.opacity));
    }

    match &node.element {
        Element::Svg | Element::Group => {}
        Element::Circle(target) => {
            let c = node.displayed().circle.unwrap_or(*target);
            if !(c.cx.is_finite() && c.cy.is_finite() && c.r > 0.0) {
                return;
            }
            let center = (c.cx as f32, c.cy as f32);
            canvas.draw_circle(center, c.r as f32, &fill);
            if node.style.stroke.is_some() {
                canvas.draw_circle(center, c.r as f32, &stroke);
            }
        }
        Element::Line(l) => {
            if node.style.stroke.is_some() {
                canvas.draw_line((l.x1 as f32, l.y1 as f32), (l.x2 as f32, l.y2 as f32), &stroke);
            }
        }
        Element::Rect(r) => {
            let rect = skia::Rect::from_xywh(r.x as f32, r.y as f32, r.width as f32, r.height as f32);
            canvas.draw_round_rect(rect, r.rx as f32, r.rx as f32, &fill);
        }
        Element::Path(points) => {
            if node.style.stroke.is_none() || points.len() < 2 {
                return;
            }
            let mut path = skia::Path::new();
            path.move_to((points[0].x as f32, points[0].y as f32));
            for p in points.iter().skip(1) {
                path.line_to((p.x as f32, p.y as f32));
            }
            canvas.draw_path(&path, &stroke);
        }
        Element::Text(t) => {
            if !opts.draw_labels || t.content.is_empty() {
                return;
            }
            let mut font = skia::Font::default();
            font.set_size(state.font_size);
            let (width, _) = font.measure_str(&t.content, Some(&fill));
            let x = t.x as f32
                - match state.anchor {
                    Anchor::Start => 0.0,
                    Anchor::Middle => width / 2.0,
                    Anchor::End => width,
                };
            let y = t.y as f32 + t.dy as f32 * state.font_size;
            canvas.draw_str(&t.content, (x, y), &font, &fill);
        }
    }
}
