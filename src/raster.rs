//! PNG rasterisation of a surface through plotters' bitmap backend.

use crate::error::{ChartError, Result};
use crate::palette::parse_color;
use crate::scene::{valid_size, Primitive, Shape, Style, Surface, TextAnchor};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt::Display;
use tracing::warn;

const ARC_SEGMENTS: usize = 128;

fn render_error<E: Display>(err: E) -> ChartError {
    ChartError::Render(err.to_string())
}

fn pixels(v: f64) -> u32 {
    v.round().max(1.0) as u32
}

fn rgba(name: &str, alpha: f64) -> RGBAColor {
    let (r, g, b) = parse_color(name);
    RGBColor(r, g, b).mix(alpha.clamp(0.0, 1.0))
}

/// Fill colour; closed shapes without one paint black.
fn fill_of(style: &Style) -> Option<RGBAColor> {
    let name = style.fill.as_deref().unwrap_or("black");
    (name != "none").then(|| rgba(name, style.opacity.unwrap_or(1.0)))
}

fn stroke_of(style: &Style) -> Option<ShapeStyle> {
    let name = style.stroke.as_deref().filter(|s| *s != "none")?;
    let alpha = style.opacity.unwrap_or(1.0) * style.stroke_opacity.unwrap_or(1.0);
    let width = style.stroke_width.unwrap_or(1.0).round().max(1.0) as u32;
    Some(rgba(name, alpha).stroke_width(width))
}

fn draw_primitive<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    p: &Primitive,
    (ox, oy): (f64, f64),
) -> Result<()> {
    let at = |x: f64, y: f64| ((x + ox).round() as i32, (y + oy).round() as i32);
    let fill = fill_of(&p.style);
    let stroke = stroke_of(&p.style);

    match &p.shape {
        Shape::Circle { cx, cy, r } => {
            let radius = r.round().max(1.0) as i32;
            if let Some(c) = fill {
                root.draw(&Circle::new(at(*cx, *cy), radius, c.filled()))
                    .map_err(render_error)?;
            }
            if let Some(s) = stroke {
                root.draw(&Circle::new(at(*cx, *cy), radius, s)).map_err(render_error)?;
            }
        }
        Shape::Rect { x, y, width, height } => {
            let corners = [at(*x, *y), at(x + width, y + height)];
            if let Some(c) = fill {
                root.draw(&Rectangle::new(corners, c.filled())).map_err(render_error)?;
            }
            if let Some(s) = stroke {
                root.draw(&Rectangle::new(corners, s)).map_err(render_error)?;
            }
        }
        Shape::Line { x1, y1, x2, y2 } => {
            if let Some(s) = stroke {
                root.draw(&PathElement::new(vec![at(*x1, *y1), at(*x2, *y2)], s))
                    .map_err(render_error)?;
            }
        }
        Shape::Polyline { points } => {
            if let Some(s) = stroke {
                let path: Vec<(i32, i32)> = points.iter().map(|(x, y)| at(*x, *y)).collect();
                root.draw(&PathElement::new(path, s)).map_err(render_error)?;
            }
        }
        Shape::Arc(arc) => {
            let mut outline: Vec<(i32, i32)> =
                arc.outline(ARC_SEGMENTS).iter().map(|(x, y)| at(*x, *y)).collect();
            if outline.is_empty() {
                return Ok(());
            }
            if let Some(c) = fill {
                root.draw(&Polygon::new(outline.clone(), c.filled())).map_err(render_error)?;
            }
            if let Some(s) = stroke {
                outline.push(outline[0]);
                root.draw(&PathElement::new(outline, s)).map_err(render_error)?;
            }
        }
        Shape::Text { x, y, text, anchor, rotate } => {
            let Some(color) = fill else {
                return Ok(());
            };
            let h = match anchor {
                TextAnchor::Start => HPos::Left,
                TextAnchor::Middle => HPos::Center,
                TextAnchor::End => HPos::Right,
            };
            let size = p.style.font_size.unwrap_or(10.0);
            let mut font = ("sans-serif", size).into_font();
            if (*rotate - 90.0).abs() < 1e-9 {
                font = font.transform(FontTransform::Rotate90);
            } else if (*rotate + 90.0).abs() < 1e-9 {
                font = font.transform(FontTransform::Rotate270);
            }
            let style = font.color(&color).pos(Pos::new(h, VPos::Bottom));
            // Missing system fonts only cost the labels.
            if let Err(err) = root.draw(&Text::new(text.clone(), at(*x, *y), style)) {
                warn!(text = text.as_str(), error = %err, "skipping text");
            }
        }
    }
    Ok(())
}

/// Rasterise `surface` on a white background and encode it as PNG.
pub fn to_png(surface: &Surface) -> Result<Vec<u8>> {
    if !valid_size(surface.width(), surface.height()) {
        return Err(ChartError::Render(format!(
            "cannot rasterise a {}x{} surface",
            surface.width(),
            surface.height()
        )));
    }
    let (width, height) = (pixels(surface.width()), pixels(surface.height()));
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| ChartError::Render(format!("{width}x{height} bitmap overflows")))?;
    let mut buffer = vec![0u8; len];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut failure = None;
        surface.walk(|p, offset| {
            if failure.is_none() {
                failure = draw_primitive(&root, p, offset).err();
            }
        });
        if let Some(err) = failure {
            return Err(err);
        }
        root.present().map_err(render_error)?;
    }

    let mut png_bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png_bytes)
        .write_image(&buffer, width, height, image::ColorType::Rgb8)
        .map_err(render_error)?;
    Ok(png_bytes)
}
