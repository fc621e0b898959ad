//! The four chart renderers and their shared construction lifecycle.
//!
//! Every construction builds the complete chart first (dimension checks,
//! aggregation, frame, scales) and only then clears the target surface and
//! draws, so a failed construction never leaves a half-cleared surface.

pub mod bar;
pub mod frame;
pub mod line;
pub mod pie;
pub mod scatter;

use crate::data::{Column, Dataset};
use crate::error::{ChartError, Result};
use crate::interaction::{PointerEvent, Response, UiContext};
use crate::scene::{Group, Primitive, Shape, Style, Surface, TextAnchor};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub use bar::BarChart;
pub use frame::{ChartFrame, Margin};
pub use line::LineChart;
pub use pie::PieChart;
pub use scatter::ScatterChart;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Scatter,
    Pie,
    Line,
    Bar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [ChartKind::Scatter, ChartKind::Pie, ChartKind::Line, ChartKind::Bar];

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Scatter => "scatter",
            ChartKind::Pie => "pie",
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        ChartKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ChartError::Config(format!("unknown chart type '{}'", s)))
    }
}

/// Arguments of one chart construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub title: String,
    pub x_dim: Option<String>,
    pub y_dim: Option<String>,
    /// Donut hole as a fraction of the outer radius.
    pub inner_radius: f64,
    pub group_field: Option<String>,
    /// Field shown as the heading of scatter tooltips.
    pub label_field: String,
    /// Categorical field colouring scatter points.
    pub color_field: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            x_dim: None,
            y_dim: None,
            inner_radius: 0.7,
            group_field: None,
            label_field: "car_name".to_string(),
            color_field: "origin".to_string(),
        }
    }
}

impl ChartConfig {
    pub fn xy(x: &str, y: &str) -> Self {
        Self {
            x_dim: Some(x.to_string()),
            y_dim: Some(y.to_string()),
            ..Self::default()
        }
    }

    pub fn grouped(field: &str, inner_radius: f64) -> Self {
        Self {
            group_field: Some(field.to_string()),
            inner_radius,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }
}

/// Behaviour shared by the chart variants once built.
pub trait ChartRenderer {
    /// Draw into a surface that has already been cleared.
    fn draw(&self, surface: &mut Surface);

    /// React to a pointer event on this chart's surface.
    fn respond(&self, event: &PointerEvent) -> Response;

    /// Number of data items bound to primitives.
    fn datum_count(&self) -> usize;

    /// The rows this chart was built from.
    fn data(&self) -> &Dataset;

    fn frame(&self) -> &ChartFrame;
}

/// A built chart of one of the four kinds.
#[derive(Debug, Clone)]
pub enum Chart {
    Scatter(ScatterChart),
    Line(LineChart),
    Bar(BarChart),
    Pie(PieChart),
}

impl Chart {
    pub fn build(kind: ChartKind, data: &Dataset, config: &ChartConfig, width: f64, height: f64) -> Result<Chart> {
        Ok(match kind {
            ChartKind::Scatter => Chart::Scatter(ScatterChart::build(data, config, width, height)?),
            ChartKind::Line => Chart::Line(LineChart::build(data, config, width, height)?),
            ChartKind::Bar => Chart::Bar(BarChart::build(data, config, width, height)?),
            ChartKind::Pie => Chart::Pie(PieChart::build(data, config, width, height)?),
        })
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            Chart::Scatter(_) => ChartKind::Scatter,
            Chart::Line(_) => ChartKind::Line,
            Chart::Bar(_) => ChartKind::Bar,
            Chart::Pie(_) => ChartKind::Pie,
        }
    }

    fn renderer(&self) -> &dyn ChartRenderer {
        match self {
            Chart::Scatter(c) => c,
            Chart::Line(c) => c,
            Chart::Bar(c) => c,
            Chart::Pie(c) => c,
        }
    }
}

impl ChartRenderer for Chart {
    fn draw(&self, surface: &mut Surface) {
        self.renderer().draw(surface)
    }

    fn respond(&self, event: &PointerEvent) -> Response {
        self.renderer().respond(event)
    }

    fn datum_count(&self) -> usize {
        self.renderer().datum_count()
    }

    fn data(&self) -> &Dataset {
        self.renderer().data()
    }

    fn frame(&self) -> &ChartFrame {
        self.renderer().frame()
    }
}

/// Build a chart of `kind` from `data` and replace the content of the
/// surface `container` with it.
pub fn render(
    ui: &mut UiContext,
    container: &str,
    kind: ChartKind,
    data: &Dataset,
    config: &ChartConfig,
) -> Result<Chart> {
    let surface = ui.surface(container)?;
    let chart = Chart::build(kind, data, config, surface.width(), surface.height())?;

    let surface = ui.surface_mut(container)?;
    surface.clear();
    chart.draw(surface);
    // Primitives the tooltip described are gone.
    ui.tooltip_mut().hide();

    debug!(
        container,
        kind = %kind,
        rows = data.len(),
        bound = chart.datum_count(),
        "rendered chart"
    );
    Ok(chart)
}

/// Resolve a required dimension, failing fast when it is absent.
pub(crate) fn require(data: &Dataset, dim: Option<&str>, role: &str, kind: ChartKind) -> Result<Column> {
    let name = dim.ok_or_else(|| ChartError::Config(format!("{} chart requires a {} dimension", kind, role)))?;
    data.column(name)
}

/// Title text with an underline rule, placed above the plotting area.
pub(crate) fn draw_title(surface: &mut Surface, title: &str, width: f64) {
    if title.is_empty() {
        return;
    }
    let mut group = Group::new((0.0, 0.0)).class("title");
    group.push(
        Primitive::new(
            Shape::Text { x: 5.0, y: 35.0, text: title.to_string(), anchor: TextAnchor::Start, rotate: 0.0 },
            Style::fill("black").with_font_size(19.2),
        )
        .class("chart_title"),
    );
    group.push(
        Primitive::new(
            Shape::Rect { x: 0.0, y: 45.0, width, height: 0.5 },
            Style::stroke("lightgray", 1.0),
        )
        .class("chart_title_rect"),
    );
    surface.push(crate::scene::Node::Group(group));
}

pub(crate) fn axis_label(x: f64, y: f64, text: &str, rotate: f64) -> Primitive {
    Primitive::new(
        Shape::Text { x, y, text: text.to_string(), anchor: TextAnchor::Start, rotate },
        Style::fill("black").with_font_size(12.0),
    )
    .class("axis-label")
}

/// One decimal place, as shown in line and bar tooltips.
pub(crate) fn format_value(value: f64) -> String {
    format!("{:.1}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_dataset() -> Dataset {
        Dataset::new(
            vec!["mpg".to_string(), "horsepower".to_string(), "origin".to_string(), "car_name".to_string()],
            vec![
                vec!["18".to_string(), "130".to_string(), "usa".to_string(), "chevelle".to_string()],
                vec!["24".to_string(), "95".to_string(), "japan".to_string(), "corona".to_string()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_chart_kind_parse() {
        assert_eq!("Bar".parse::<ChartKind>().unwrap(), ChartKind::Bar);
        assert!("area".parse::<ChartKind>().is_err());
        assert_eq!(ChartKind::Pie.to_string(), "pie");
    }

    #[test]
    fn test_render_replaces_surface_content() {
        let data = make_dataset();
        let mut ui = UiContext::new();
        ui.mount("chart", 800.0, 600.0);
        let config = ChartConfig::xy("mpg", "horsepower");

        render(&mut ui, "chart", ChartKind::Scatter, &data, &config).unwrap();
        let once = ui.surface("chart").unwrap().clone();
        render(&mut ui, "chart", ChartKind::Scatter, &data, &config).unwrap();
        let twice = ui.surface("chart").unwrap();

        assert_eq!(once.primitive_count(), twice.primitive_count());
        assert_eq!(once.bound_data(), twice.bound_data());
    }

    #[test]
    fn test_failed_render_keeps_previous_chart() {
        let data = make_dataset();
        let mut ui = UiContext::new();
        ui.mount("chart", 800.0, 600.0);
        render(&mut ui, "chart", ChartKind::Scatter, &data, &ChartConfig::xy("mpg", "horsepower")).unwrap();
        let before = ui.surface("chart").unwrap().clone();

        let result = render(&mut ui, "chart", ChartKind::Scatter, &data, &ChartConfig::xy("mpg", "weight"));
        assert!(matches!(result, Err(ChartError::Dimension { ref dimension, .. }) if dimension == "weight"));
        assert_eq!(ui.surface("chart").unwrap(), &before);
    }

    #[test]
    fn test_missing_dimension_argument() {
        let data = make_dataset();
        let mut ui = UiContext::new();
        ui.mount("chart", 800.0, 600.0);
        let result = render(&mut ui, "chart", ChartKind::Bar, &data, &ChartConfig::default());
        assert!(matches!(result, Err(ChartError::Config(_))));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(17.0), "17.0");
        assert_eq!(format_value(23.456), "23.5");
    }
}
