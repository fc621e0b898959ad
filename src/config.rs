use crate::chart::{ChartConfig, ChartKind};
use crate::error::{ChartError, Result};
use crate::scene::valid_size;
use crate::RenderOptions;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Chart arguments for one selectable view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub title: String,
    pub x_dim: Option<String>,
    pub y_dim: Option<String>,
    pub inner_radius: f64,
    pub group_field: Option<String>,
    /// Whether the view comes with the year range control.
    pub range_control: bool,
}

fn default_inner_radius() -> f64 { 0.7 }

impl ViewConfig {
    fn xy(x: &str, y: &str, range_control: bool) -> Self {
        Self {
            title: String::new(),
            x_dim: Some(x.to_string()),
            y_dim: Some(y.to_string()),
            inner_radius: default_inner_radius(),
            group_field: None,
            range_control,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(from = "ViewsFile")]
pub struct Views {
    pub scatter: ViewConfig,
    pub pie: ViewConfig,
    pub line: ViewConfig,
    pub bar: ViewConfig,
}

/// Fields set for a view in the config file. Unset fields keep the view's
/// own default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViewOverride {
    title: Option<String>,
    x_dim: Option<String>,
    y_dim: Option<String>,
    inner_radius: Option<f64>,
    group_field: Option<String>,
    range_control: Option<bool>,
}

impl ViewOverride {
    fn apply(self, base: ViewConfig) -> ViewConfig {
        ViewConfig {
            title: self.title.unwrap_or(base.title),
            x_dim: self.x_dim.or(base.x_dim),
            y_dim: self.y_dim.or(base.y_dim),
            inner_radius: self.inner_radius.unwrap_or(base.inner_radius),
            group_field: self.group_field.or(base.group_field),
            range_control: self.range_control.unwrap_or(base.range_control),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ViewsFile {
    scatter: ViewOverride,
    pie: ViewOverride,
    line: ViewOverride,
    bar: ViewOverride,
}

impl From<ViewsFile> for Views {
    fn from(file: ViewsFile) -> Self {
        Self {
            scatter: file.scatter.apply(default_scatter()),
            pie: file.pie.apply(default_pie()),
            line: file.line.apply(default_line()),
            bar: file.bar.apply(default_bar()),
        }
    }
}

fn default_scatter() -> ViewConfig { ViewConfig::xy("mpg", "horsepower", true) }
fn default_line() -> ViewConfig { ViewConfig::xy("model_year", "mpg", false) }
fn default_bar() -> ViewConfig { ViewConfig::xy("cylinders", "mpg", true) }
fn default_pie() -> ViewConfig {
    ViewConfig {
        title: String::new(),
        x_dim: None,
        y_dim: None,
        inner_radius: default_inner_radius(),
        group_field: Some("origin".to_string()),
        range_control: true,
    }
}

impl Default for Views {
    fn default() -> Self {
        Self {
            scatter: default_scatter(),
            pie: default_pie(),
            line: default_line(),
            bar: default_bar(),
        }
    }
}

/// Dashboard settings. Every field has a default, so `{}` is a valid file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DashboardConfig {
    #[serde(default)]
    pub render: RenderOptions,
    #[serde(default = "default_year_field")]
    pub year_field: String,
    #[serde(default = "default_label_field")]
    pub label_field: String,
    #[serde(default = "default_color_field")]
    pub color_field: String,
    /// Range control bounds used when the dataset has no usable years.
    #[serde(default = "default_year_min")]
    pub year_min: i64,
    #[serde(default = "default_year_max")]
    pub year_max: i64,
    #[serde(default = "default_initial_view")]
    pub initial_view: ChartKind,
    #[serde(default)]
    pub views: Views,
}

fn default_year_field() -> String { "model_year".to_string() }
fn default_label_field() -> String { "car_name".to_string() }
fn default_color_field() -> String { "origin".to_string() }
fn default_year_min() -> i64 { 70 }
fn default_year_max() -> i64 { 82 }
fn default_initial_view() -> ChartKind { ChartKind::Scatter }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            year_field: default_year_field(),
            label_field: default_label_field(),
            color_field: default_color_field(),
            year_min: default_year_min(),
            year_max: default_year_max(),
            initial_view: default_initial_view(),
            views: Views::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| ChartError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ChartError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.year_min > self.year_max {
            return Err(ChartError::Config(format!(
                "year_min ({}) is greater than year_max ({})",
                self.year_min, self.year_max
            )));
        }
        if !valid_size(self.render.width as f64, self.render.height as f64) {
            return Err(ChartError::Config(format!(
                "surface size {}x{} must be non-zero and at most {} per side",
                self.render.width,
                self.render.height,
                crate::scene::MAX_SURFACE_SIZE
            )));
        }
        Ok(())
    }

    pub fn view(&self, kind: ChartKind) -> &ViewConfig {
        match kind {
            ChartKind::Scatter => &self.views.scatter,
            ChartKind::Pie => &self.views.pie,
            ChartKind::Line => &self.views.line,
            ChartKind::Bar => &self.views.bar,
        }
    }

    /// Chart construction arguments for a view.
    pub fn chart_config(&self, kind: ChartKind) -> ChartConfig {
        let view = self.view(kind);
        ChartConfig {
            title: view.title.clone(),
            x_dim: view.x_dim.clone(),
            y_dim: view.y_dim.clone(),
            inner_radius: view.inner_radius,
            group_field: view.group_field.clone(),
            label_field: self.label_field.clone(),
            color_field: self.color_field.clone(),
        }
    }
}
