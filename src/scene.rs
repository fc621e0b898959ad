//! Retained vector scene: what a chart draws into a surface.
//!
//! Shapes are stored in local coordinates under translated groups, the way
//! an SVG document nests `<g transform>` elements. Interactive primitives
//! carry the index of the datum they are bound to.

use std::f64::consts::PI;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
    pub opacity: Option<f64>,
    pub stroke_opacity: Option<f64>,
    pub font_size: Option<f64>,
}

impl Style {
    pub fn fill(color: &str) -> Self {
        Self {
            fill: Some(color.to_string()),
            ..Self::default()
        }
    }

    pub fn stroke(color: &str, width: f64) -> Self {
        Self {
            stroke: Some(color.to_string()),
            stroke_width: Some(width),
            ..Self::default()
        }
    }

    pub fn with_fill(mut self, color: &str) -> Self {
        self.fill = Some(color.to_string());
        self
    }

    pub fn with_stroke(mut self, color: &str, width: f64) -> Self {
        self.stroke = Some(color.to_string());
        self.stroke_width = Some(width);
        self
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// Annular sector. Angles are radians clockwise from twelve o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcShape {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub pad_angle: f64,
    pub pad_radius: f64,
}

impl ArcShape {
    /// Midpoint of the sector, halfway between the radii.
    pub fn centroid(&self) -> (f64, f64) {
        let r = (self.inner_radius + self.outer_radius) / 2.0;
        let a = (self.start_angle + self.end_angle) / 2.0 - PI / 2.0;
        (a.cos() * r, a.sin() * r)
    }

    // Angular inset at radius `r` so the gap between neighbours has the
    // constant width `pad_radius * pad_angle`.
    fn inset(&self, r: f64) -> f64 {
        if r <= 0.0 || self.pad_angle <= 0.0 {
            return 0.0;
        }
        let half_gap = self.pad_radius * (self.pad_angle / 2.0).sin();
        (half_gap / r).clamp(-1.0, 1.0).asin()
    }

    /// Drawn angular extent at radius `r` after padding, or `None` when the
    /// padding swallows the slice.
    pub fn padded_angles(&self, r: f64) -> Option<(f64, f64)> {
        let inset = self.inset(r);
        let (a0, a1) = (self.start_angle + inset, self.end_angle - inset);
        if a1 > a0 {
            Some((a0, a1))
        } else if self.end_angle > self.start_angle {
            let mid = (self.start_angle + self.end_angle) / 2.0;
            Some((mid, mid))
        } else {
            None
        }
    }

    /// Point at angle `a` and radius `r`, in the sector's local frame.
    pub fn point(a: f64, r: f64) -> (f64, f64) {
        (r * a.sin(), -r * a.cos())
    }

    /// Outline flattened to a polygon, `segments` steps per full circle.
    pub fn outline(&self, segments: usize) -> Vec<(f64, f64)> {
        let mut points = Vec::new();
        let Some((o0, o1)) = self.padded_angles(self.outer_radius) else {
            return points;
        };
        let steps = |a0: f64, a1: f64| {
            (((a1 - a0) / (2.0 * PI)) * segments as f64).ceil().max(1.0) as usize
        };
        let n = steps(o0, o1);
        for i in 0..=n {
            let a = o0 + (o1 - o0) * i as f64 / n as f64;
            points.push(Self::point(a, self.outer_radius));
        }
        match self.padded_angles(self.inner_radius) {
            Some((i0, i1)) if self.inner_radius > 0.0 => {
                let n = steps(i0, i1);
                for i in (0..=n).rev() {
                    let a = i0 + (i1 - i0) * i as f64 / n as f64;
                    points.push(Self::point(a, self.inner_radius));
                }
            }
            _ => points.push((0.0, 0.0)),
        }
        points
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        let r = (x * x + y * y).sqrt();
        if r < self.inner_radius || r > self.outer_radius {
            return false;
        }
        let mut a = x.atan2(-y);
        if a < 0.0 {
            a += 2.0 * PI;
        }
        a >= self.start_angle && a <= self.end_angle
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { cx: f64, cy: f64, r: f64 },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Polyline { points: Vec<(f64, f64)> },
    Arc(ArcShape),
    Text {
        x: f64,
        y: f64,
        text: String,
        anchor: TextAnchor,
        rotate: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub shape: Shape,
    pub style: Style,
    pub class: Option<String>,
    /// Index of the bound datum in the owning chart, if interactive.
    pub datum: Option<usize>,
}

impl Primitive {
    pub fn new(shape: Shape, style: Style) -> Self {
        Self {
            shape,
            style,
            class: None,
            datum: None,
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    pub fn bind(mut self, datum: usize) -> Self {
        self.datum = Some(datum);
        self
    }

    fn hit(&self, x: f64, y: f64) -> bool {
        match &self.shape {
            Shape::Circle { cx, cy, r } => (x - cx).powi(2) + (y - cy).powi(2) <= r * r,
            Shape::Rect {
                x: rx,
                y: ry,
                width,
                height,
            } => x >= *rx && x <= rx + width && y >= *ry && y <= ry + height,
            Shape::Arc(arc) => arc.contains(x, y),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    pub class: Option<String>,
    pub translate: (f64, f64),
    pub children: Vec<Node>,
}

impl Group {
    pub fn new(translate: (f64, f64)) -> Self {
        Self {
            translate,
            ..Self::default()
        }
    }

    pub fn class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.children.push(Node::Primitive(primitive));
    }

    pub fn push_group(&mut self, group: Group) {
        self.children.push(Node::Group(group));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Group(Group),
    Primitive(Primitive),
}

/// Largest width or height, in pixels, a surface may take.
pub const MAX_SURFACE_SIZE: f64 = 16_384.0;

/// Whether both sides are finite, positive and within [`MAX_SURFACE_SIZE`].
pub fn valid_size(width: f64, height: f64) -> bool {
    [width, height]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0 && *v <= MAX_SURFACE_SIZE)
}

/// A drawing surface addressed by a container id. Its size is the host's
/// current bounding box and is read by every chart construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    id: String,
    width: f64,
    height: f64,
    nodes: Vec<Node>,
}

impl Surface {
    pub fn new(id: &str, width: f64, height: f64) -> Self {
        Self {
            id: id.to_string(),
            width,
            height,
            nodes: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Remove everything previously drawn.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Visit every primitive with its absolute offset, in paint order.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&Primitive, (f64, f64)),
    {
        fn recurse<F: FnMut(&Primitive, (f64, f64))>(
            nodes: &[Node],
            offset: (f64, f64),
            visit: &mut F,
        ) {
            for node in nodes {
                match node {
                    Node::Primitive(p) => visit(p, offset),
                    Node::Group(g) => recurse(
                        &g.children,
                        (offset.0 + g.translate.0, offset.1 + g.translate.1),
                        visit,
                    ),
                }
            }
        }
        recurse(&self.nodes, (0.0, 0.0), &mut visit);
    }

    pub fn primitive_count(&self) -> usize {
        let mut n = 0;
        self.walk(|_, _| n += 1);
        n
    }

    /// Datum indices of bound primitives, in paint order.
    pub fn bound_data(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.walk(|p, _| out.extend(p.datum));
        out
    }

    /// Primitives carrying `class`, in paint order.
    pub fn find_class(&self, class: &str) -> Vec<Primitive> {
        let mut out = Vec::new();
        self.walk(|p, _| {
            if p.class.as_deref() == Some(class) {
                out.push(p.clone());
            }
        });
        out
    }

    /// Datum bound to the topmost interactive primitive under `(x, y)`.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        let mut hit = None;
        self.walk(|p, (ox, oy)| {
            if let Some(datum) = p.datum {
                if p.hit(x - ox, y - oy) {
                    hit = Some(datum);
                }
            }
        });
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_surface() -> Surface {
        let mut surface = Surface::new("chart", 200.0, 100.0);
        let mut g = Group::new((50.0, 10.0));
        g.push(Primitive::new(Shape::Circle { cx: 10.0, cy: 10.0, r: 7.0 }, Style::fill("red")).bind(0));
        g.push(Primitive::new(Shape::Circle { cx: 14.0, cy: 10.0, r: 7.0 }, Style::fill("blue")).bind(1));
        g.push(Primitive::new(
            Shape::Rect { x: 100.0, y: 0.0, width: 20.0, height: 50.0 },
            Style::fill("green"),
        ).bind(2));
        surface.push(Node::Group(g));
        surface
    }

    #[test]
    fn test_hit_test_topmost_wins() {
        let surface = sample_surface();
        assert_eq!(surface.hit_test(62.0, 20.0), Some(1));
        assert_eq!(surface.hit_test(55.0, 20.0), Some(0));
        assert_eq!(surface.hit_test(160.0, 30.0), Some(2));
        assert_eq!(surface.hit_test(5.0, 5.0), None);
    }

    #[test]
    fn test_valid_size() {
        assert!(valid_size(960.0, 500.0));
        assert!(valid_size(MAX_SURFACE_SIZE, 1.0));
        assert!(!valid_size(0.0, 500.0));
        assert!(!valid_size(960.0, -1.0));
        assert!(!valid_size(f64::NAN, 500.0));
        assert!(!valid_size(f64::INFINITY, 500.0));
        assert!(!valid_size(40_000.0, 40_000.0));
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut surface = sample_surface();
        assert_eq!(surface.primitive_count(), 3);
        assert_eq!(surface.bound_data(), vec![0, 1, 2]);
        surface.clear();
        assert!(surface.is_empty());
        assert_eq!(surface.primitive_count(), 0);
    }

    #[test]
    fn test_arc_contains_and_centroid() {
        let arc = ArcShape {
            inner_radius: 50.0,
            outer_radius: 100.0,
            start_angle: 0.0,
            end_angle: PI / 2.0,
            pad_angle: 0.0,
            pad_radius: 0.0,
        };
        // Quarter from twelve to three o'clock.
        assert!(arc.contains(50.0, -50.0));
        assert!(!arc.contains(-50.0, -50.0));
        assert!(!arc.contains(10.0, -10.0));
        let (cx, cy) = arc.centroid();
        assert!(cx > 0.0 && cy < 0.0);
        assert!(((cx * cx + cy * cy).sqrt() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_arc_padding_shrinks_outline() {
        let arc = ArcShape {
            inner_radius: 70.0,
            outer_radius: 100.0,
            start_angle: 0.0,
            end_angle: PI,
            pad_angle: 0.01,
            pad_radius: 70.0,
        };
        let (a0, a1) = arc.padded_angles(100.0).unwrap();
        assert!(a0 > 0.0 && a1 < PI);
        let outline = arc.outline(64);
        assert!(outline.len() > 4);
    }
}
