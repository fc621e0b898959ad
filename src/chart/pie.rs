use super::{require, ChartConfig, ChartFrame, ChartKind, ChartRenderer, Margin};
use crate::aggregate::{aggregate, Reduce};
use crate::data::{Column, Dataset};
use crate::error::Result;
use crate::interaction::{PointerEvent, Response};
use crate::palette::ColorPalette;
use crate::scene::{ArcShape, Group, Node, Primitive, Shape, Style, Surface, TextAnchor};
use std::f64::consts::TAU;

const MARGIN: Margin = Margin::new(60.0, 20.0, 30.0, 30.0);
const PAD_ANGLE: f64 = 0.01;

/// A slice of the pie: its group and angular extent in radians, clockwise
/// from twelve o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub key: String,
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSlice {
    /// Share of the full circle swept by this slice.
    pub fn fraction(&self) -> f64 {
        (self.end_angle - self.start_angle) / TAU
    }

    /// `key/percent`, e.g. `usa/67%`.
    pub fn label(&self) -> String {
        format!("{}/{}%", self.key, (self.fraction() * 100.0).round())
    }
}

/// Sweep proportional to value. Angles are handed out largest value first;
/// slices keep their input order.
pub fn pie_layout(groups: &[(String, f64)]) -> Vec<PieSlice> {
    let total: f64 = groups.iter().map(|(_, v)| v.max(0.0)).sum();
    let mut slices: Vec<PieSlice> = groups
        .iter()
        .map(|(key, value)| PieSlice {
            key: key.clone(),
            value: *value,
            start_angle: 0.0,
            end_angle: 0.0,
        })
        .collect();
    if total <= 0.0 {
        return slices;
    }

    let k = TAU / total;
    let mut order: Vec<usize> = (0..slices.len()).collect();
    order.sort_by(|&a, &b| groups[b].1.total_cmp(&groups[a].1));

    let mut angle = 0.0;
    for i in order {
        let slice = &mut slices[i];
        slice.start_angle = angle;
        angle += slice.value.max(0.0) * k;
        slice.end_angle = angle;
    }
    slices
}

/// Donut of row counts per category.
#[derive(Debug, Clone)]
pub struct PieChart {
    data: Dataset,
    title: String,
    frame: ChartFrame,
    group_col: Column,
    outer_radius: f64,
    inner_radius: f64,
    center: (f64, f64),
    color: ColorPalette,
    slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn build(data: &Dataset, config: &ChartConfig, width: f64, height: f64) -> Result<Self> {
        let group_col = require(data, config.group_field.as_deref(), "group", ChartKind::Pie)?;

        let groups: Vec<(String, f64)> = aggregate(data, &group_col, &Reduce::Rows)
            .into_iter()
            .map(|g| (g.key, g.value))
            .collect();
        let slices = pie_layout(&groups);

        let frame = ChartFrame::new(width, height, MARGIN);
        let outer_radius = width.min(height).max(0.0) / 2.5;
        let inner_radius = outer_radius * config.inner_radius.clamp(0.0, 1.0);
        let color = ColorPalette::tableau10().with_domain(slices.iter().map(|s| s.key.as_str()));

        Ok(Self {
            data: data.clone(),
            title: config.title.clone(),
            frame,
            group_col,
            outer_radius,
            inner_radius,
            center: (width / 2.0, height / 1.8),
            color,
            slices,
        })
    }

    pub fn slices(&self) -> &[PieSlice] {
        &self.slices
    }

    pub fn group_field(&self) -> &str {
        &self.group_col.name
    }

    pub fn radii(&self) -> (f64, f64) {
        (self.inner_radius, self.outer_radius)
    }

    fn arc(&self, slice: &PieSlice) -> ArcShape {
        ArcShape {
            inner_radius: self.inner_radius,
            outer_radius: self.outer_radius,
            start_angle: slice.start_angle,
            end_angle: slice.end_angle,
            pad_angle: PAD_ANGLE,
            pad_radius: self.inner_radius,
        }
    }
}

impl ChartRenderer for PieChart {
    fn draw(&self, surface: &mut Surface) {
        if !self.title.is_empty() {
            let mut title = Group::new((0.0, 0.0)).class("title");
            title.push(
                Primitive::new(
                    Shape::Text { x: 20.0, y: 20.0, text: self.title.clone(), anchor: TextAnchor::Start, rotate: 0.0 },
                    Style::fill("black"),
                )
                .class("chart_title"),
            );
            surface.push(Node::Group(title));
        }

        let mut pie = Group::new(self.center).class("pie");
        for (i, slice) in self.slices.iter().enumerate() {
            pie.push(
                Primitive::new(Shape::Arc(self.arc(slice)), Style::fill(self.color.color(&slice.key)))
                    .class("piepath")
                    .bind(i),
            );
        }
        for slice in &self.slices {
            let (x, y) = self.arc(slice).centroid();
            pie.push(
                Primitive::new(
                    Shape::Text { x, y, text: slice.label(), anchor: TextAnchor::Start, rotate: 0.0 },
                    Style::fill("black").with_font_size(12.0),
                )
                .class("linetext"),
            );
        }
        surface.push(Node::Group(pie));
    }

    fn respond(&self, _event: &PointerEvent) -> Response {
        Response::None
    }

    fn datum_count(&self) -> usize {
        self.slices.len()
    }

    fn data(&self) -> &Dataset {
        &self.data
    }

    fn frame(&self) -> &ChartFrame {
        &self.frame
    }
}
