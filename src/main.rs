use anyhow::{Context, Result};
use clap::Parser;
use dashgraph::chart::ChartKind;
use dashgraph::config::DashboardConfig;
use dashgraph::csv_reader::read_dataset;
use dashgraph::dashboard::{Action, Dashboard};
use dashgraph::parser::parse_script;
use dashgraph::runtime::{encode, format_for_path, run_script};
use dashgraph::OutputFormat;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dashgraph")]
#[command(about = "Render an interactive chart dashboard over a CSV dataset", long_about = None)]
struct Args {
    /// Dataset file (CSV, or JSON array of objects); '-' reads CSV from stdin
    dataset: String,

    /// Dashboard configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chart shown first
    #[arg(long, value_enum)]
    view: Option<ChartKind>,

    /// Year selected on the range control
    #[arg(long)]
    year: Option<i64>,

    /// Interaction script to replay before writing the output
    #[arg(long)]
    script: Option<PathBuf>,

    /// Output format; defaults to the output file extension, then the config
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(view) = args.view {
        config.initial_view = view;
    }

    let dataset = read_dataset(&args.dataset)
        .with_context(|| format!("Failed to read dataset {}", args.dataset))?;

    let mut dashboard = Dashboard::new(dataset, config).context("Failed to build dashboard")?;
    if let Some(year) = args.year {
        dashboard
            .dispatch(Action::SetYear(year))
            .context("Failed to apply year filter")?;
    }

    if let Some(path) = &args.script {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        let commands = parse_script(&text)?;
        let written = run_script(&mut dashboard, &commands).context("Script failed")?;
        info!(commands = commands.len(), snapshots = written.len(), "script finished");
    }

    let fallback = dashboard.config().render.format;
    let format = match (args.format, &args.output) {
        (Some(format), _) => format,
        (None, Some(path)) => format_for_path(path, fallback),
        (None, None) => fallback,
    };
    let bytes = encode(dashboard.surface()?, format).context("Failed to render chart")?;

    match &args.output {
        Some(path) => fs::write(path, &bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(&bytes).context("Failed to write chart to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
