use super::{axis_label, draw_title, require, ChartConfig, ChartFrame, ChartKind, ChartRenderer, Margin};
use crate::axis::{linear_ticks, render_axis, Orient};
use crate::data::{report_skipped, Column, Dataset};
use crate::error::Result;
use crate::interaction::{PointerEvent, PointerKind, Response};
use crate::palette::ColorPalette;
use crate::scale::LinearScale;
use crate::scene::{Group, Node, Primitive, Shape, Style, Surface};

const MARGIN: Margin = Margin::new(50.0, 20.0, 50.0, 40.0);
const RADIUS: f64 = 7.0;
const FILL_OPACITY: f64 = 0.6;
const STROKE_OPACITY: f64 = 0.3;

/// One circle: the row it stands for and its data coordinates.
#[derive(Debug, Clone, PartialEq)]
struct ScatterPoint {
    row: usize,
    x: f64,
    y: f64,
}

/// One circle per row over two numeric dimensions, coloured by category.
#[derive(Debug, Clone)]
pub struct ScatterChart {
    data: Dataset,
    title: String,
    frame: ChartFrame,
    x_col: Column,
    y_col: Column,
    label_col: Column,
    color_col: Column,
    x: LinearScale,
    y: LinearScale,
    color: ColorPalette,
    points: Vec<ScatterPoint>,
    /// Malformed values excluded from the x and y dimensions.
    skipped: (usize, usize),
}

impl ScatterChart {
    pub fn build(data: &Dataset, config: &ChartConfig, width: f64, height: f64) -> Result<Self> {
        let x_col = require(data, config.x_dim.as_deref(), "x", ChartKind::Scatter)?;
        let y_col = require(data, config.y_dim.as_deref(), "y", ChartKind::Scatter)?;
        let label_col = data.column(&config.label_field)?;
        let color_col = data.column(&config.color_field)?;

        let mut skipped = (0usize, 0usize);
        let points: Vec<ScatterPoint> = data
            .rows()
            .iter()
            .enumerate()
            .filter_map(|(row, r)| {
                let (x, y) = (r.number(&x_col), r.number(&y_col));
                skipped.0 += usize::from(x.is_none());
                skipped.1 += usize::from(y.is_none());
                Some(ScatterPoint { row, x: x?, y: y? })
            })
            .collect();
        report_skipped(&x_col, skipped.0);
        report_skipped(&y_col, skipped.1);

        let frame = ChartFrame::new(width, height, MARGIN);
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        let x = LinearScale::from_values(&xs, (0.0, frame.inner_width), &x_col.name);
        let y = LinearScale::from_values(&ys, (frame.inner_height, 0.0), &y_col.name);
        let color = ColorPalette::tableau10().with_domain(data.distinct(&color_col));

        Ok(Self {
            data: data.clone(),
            title: config.title.clone(),
            frame,
            x_col,
            y_col,
            label_col,
            color_col,
            x,
            y,
            color,
            points,
            skipped,
        })
    }

    pub fn x_scale(&self) -> &LinearScale {
        &self.x
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.color
    }

    pub fn skipped(&self) -> (usize, usize) {
        self.skipped
    }

    fn tooltip_lines(&self, index: usize) -> Option<Vec<String>> {
        let point = self.points.get(index)?;
        let row = self.data.rows().get(point.row)?;
        Some(vec![
            row.text(&self.label_col).to_string(),
            row.text(&self.color_col).to_string(),
            format!("{}:  {}", self.x_col.name, row.text(&self.x_col)),
            format!("{}:  {}", self.y_col.name, row.text(&self.y_col)),
        ])
    }
}

impl ChartRenderer for ScatterChart {
    fn draw(&self, surface: &mut Surface) {
        let frame = &self.frame;
        let mut area = Group::new(frame.origin()).class("chart-area");

        area.push_group(render_axis(
            Orient::Bottom,
            &linear_ticks(&self.x),
            self.x.range(),
            (0.0, frame.inner_height),
        ));
        area.push_group(render_axis(Orient::Left, &linear_ticks(&self.y), self.y.range(), (0.0, 0.0)));

        area.push(axis_label(
            frame.inner_width - 50.0,
            frame.inner_height + frame.margin.bottom - 50.0,
            &self.x_col.name,
            0.0,
        ));
        area.push(axis_label(0.0, 10.0, &self.y_col.name, 0.0));

        for (i, point) in self.points.iter().enumerate() {
            let category = self.data.rows()[point.row].text(&self.color_col);
            let color = self.color.color(category);
            let style = Style {
                opacity: Some(FILL_OPACITY),
                stroke_opacity: Some(STROKE_OPACITY),
                ..Style::fill(color).with_stroke(color, 1.0)
            };
            area.push(
                Primitive::new(
                    Shape::Circle { cx: self.x.map(point.x), cy: self.y.map(point.y), r: RADIUS },
                    style,
                )
                .class("point")
                .bind(i),
            );
        }

        surface.push(Node::Group(area));
        draw_title(surface, &self.title, frame.width);
    }

    fn respond(&self, event: &PointerEvent) -> Response {
        match (event.kind, event.target) {
            (PointerKind::Enter, Some(i)) => match self.tooltip_lines(i) {
                Some(lines) => Response::ShowTooltip { x: event.x, y: event.y, lines },
                None => Response::None,
            },
            (PointerKind::Leave, _) => Response::HideTooltip,
            _ => Response::None,
        }
    }

    fn datum_count(&self) -> usize {
        self.points.len()
    }

    fn data(&self) -> &Dataset {
        &self.data
    }

    fn frame(&self) -> &ChartFrame {
        &self.frame
    }
}
