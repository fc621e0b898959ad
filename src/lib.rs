// Library exports for dashgraph

pub mod aggregate;
pub mod axis;
pub mod chart;
pub mod config;
pub mod csv_reader;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod interaction;
pub mod palette;
pub mod parser;
pub mod raster;
pub mod runtime;
pub mod scale;
pub mod scene;
pub mod svg;
pub mod temporal;

pub use chart::{render, Chart, ChartConfig, ChartKind, ChartRenderer};
pub use config::DashboardConfig;
pub use dashboard::{Action, Dashboard, DashboardState};
pub use data::Dataset;
pub use error::{ChartError, Result};

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            format: OutputFormat::Png,
        }
    }
}
