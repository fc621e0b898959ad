//! SVG serialisation of a surface.

use crate::scene::{ArcShape, Node, Primitive, Shape, Style, Surface, TextAnchor};
use std::fmt::Write;

/// Two decimals at most, no trailing zeros, no negative zero.
fn num(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0 + 0.0;
    format!("{}", rounded)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn style_attrs(style: &Style, open_path: bool) -> String {
    let mut out = String::new();
    match &style.fill {
        Some(fill) => {
            let _ = write!(out, r#" fill="{}""#, escape(fill));
        }
        None if open_path => out.push_str(r#" fill="none""#),
        None => {}
    }
    if let Some(stroke) = &style.stroke {
        let _ = write!(out, r#" stroke="{}""#, escape(stroke));
    }
    if let Some(w) = style.stroke_width {
        let _ = write!(out, r#" stroke-width="{}""#, num(w));
    }
    if let Some(o) = style.opacity {
        let _ = write!(out, r#" opacity="{}""#, num(o));
    }
    if let Some(o) = style.stroke_opacity {
        let _ = write!(out, r#" stroke-opacity="{}""#, num(o));
    }
    out
}

/// Path data for an annular sector, `A` commands on both radii.
pub fn arc_path(arc: &ArcShape) -> String {
    let Some((o0, o1)) = arc.padded_angles(arc.outer_radius) else {
        return String::new();
    };
    let (ro, ri) = (arc.outer_radius, arc.inner_radius);
    let large = |a0: f64, a1: f64| if a1 - a0 > std::f64::consts::PI { 1 } else { 0 };
    let (sx, sy) = ArcShape::point(o0, ro);
    let (ex, ey) = ArcShape::point(o1, ro);
    let mut d = format!(
        "M{},{}A{},{},0,{},1,{},{}",
        num(sx), num(sy), num(ro), num(ro), large(o0, o1), num(ex), num(ey)
    );
    match arc.padded_angles(ri) {
        Some((i0, i1)) if ri > 0.0 => {
            let (ix, iy) = ArcShape::point(i1, ri);
            let (jx, jy) = ArcShape::point(i0, ri);
            let _ = write!(
                d,
                "L{},{}A{},{},0,{},0,{},{}Z",
                num(ix), num(iy), num(ri), num(ri), large(i0, i1), num(jx), num(jy)
            );
        }
        _ => d.push_str("L0,0Z"),
    }
    d
}

fn write_primitive(out: &mut String, p: &Primitive, depth: usize) {
    let indent = "  ".repeat(depth);
    let mut attrs = String::new();
    if let Some(class) = &p.class {
        let _ = write!(attrs, r#" class="{}""#, escape(class));
    }
    if let Some(datum) = p.datum {
        let _ = write!(attrs, r#" data-index="{}""#, datum);
    }
    let _ = match &p.shape {
        Shape::Circle { cx, cy, r } => writeln!(
            out,
            r#"{}<circle{} cx="{}" cy="{}" r="{}"{}/>"#,
            indent, attrs, num(*cx), num(*cy), num(*r), style_attrs(&p.style, false)
        ),
        Shape::Rect { x, y, width, height } => writeln!(
            out,
            r#"{}<rect{} x="{}" y="{}" width="{}" height="{}"{}/>"#,
            indent, attrs, num(*x), num(*y), num(*width), num(*height), style_attrs(&p.style, false)
        ),
        Shape::Line { x1, y1, x2, y2 } => writeln!(
            out,
            r#"{}<line{} x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
            indent, attrs, num(*x1), num(*y1), num(*x2), num(*y2), style_attrs(&p.style, true)
        ),
        Shape::Polyline { points } => {
            let d: Vec<String> = points
                .iter()
                .enumerate()
                .map(|(i, (x, y))| format!("{}{},{}", if i == 0 { "M" } else { "L" }, num(*x), num(*y)))
                .collect();
            writeln!(out, r#"{}<path{} d="{}"{}/>"#, indent, attrs, d.concat(), style_attrs(&p.style, true))
        }
        Shape::Arc(arc) => writeln!(
            out,
            r#"{}<path{} d="{}"{}/>"#,
            indent, attrs, arc_path(arc), style_attrs(&p.style, false)
        ),
        Shape::Text { x, y, text, anchor, rotate } => {
            let anchor = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let mut extra = String::new();
            if let Some(size) = p.style.font_size {
                let _ = write!(extra, r#" font-size="{}""#, num(size));
            }
            if *rotate != 0.0 {
                let _ = write!(extra, r#" transform="rotate({},{},{})""#, num(*rotate), num(*x), num(*y));
            }
            writeln!(
                out,
                r#"{}<text{} x="{}" y="{}" text-anchor="{}"{}{}>{}</text>"#,
                indent, attrs, num(*x), num(*y), anchor, extra, style_attrs(&p.style, false), escape(text)
            )
        }
    };
}

fn write_nodes(out: &mut String, nodes: &[Node], depth: usize) {
    for node in nodes {
        match node {
            Node::Primitive(p) => write_primitive(out, p, depth),
            Node::Group(g) => {
                let indent = "  ".repeat(depth);
                let class = g
                    .class
                    .as_deref()
                    .map(|c| format!(r#" class="{}""#, escape(c)))
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    r#"{}<g{} transform="translate({},{})">"#,
                    indent, class, num(g.translate.0), num(g.translate.1)
                );
                write_nodes(out, &g.children, depth + 1);
                let _ = writeln!(out, "{}</g>", indent);
            }
        }
    }
}

/// Serialise `surface` as a standalone SVG document on a white background.
pub fn to_svg(surface: &Surface) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="{}" width="{}" height="{}" viewBox="0 0 {} {}" font-family="sans-serif">"#,
        escape(surface.id()),
        num(surface.width()),
        num(surface.height()),
        num(surface.width()),
        num(surface.height())
    );
    let _ = writeln!(
        out,
        r#"  <rect width="{}" height="{}" fill="white"/>"#,
        num(surface.width()),
        num(surface.height())
    );
    write_nodes(&mut out, surface.nodes(), 1);
    out.push_str("</svg>\n");
    out
}
