// Script executor and output encoding

use crate::dashboard::{Action, Dashboard};
use crate::error::{ChartError, Result};
use crate::parser::ScriptCommand;
use crate::scene::Surface;
use crate::{raster, svg, OutputFormat};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Encode a surface in the requested format.
pub fn encode(surface: &Surface, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Png => raster::to_png(surface),
        OutputFormat::Svg => Ok(svg::to_svg(surface).into_bytes()),
    }
}

/// Output format implied by a file extension, or `fallback`.
pub fn format_for_path(path: &Path, fallback: OutputFormat) -> OutputFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("svg") => OutputFormat::Svg,
        Some(ext) if ext.eq_ignore_ascii_case("png") => OutputFormat::Png,
        _ => fallback,
    }
}

/// Encode the dashboard's surface and write it to `path`.
pub fn write_snapshot(dashboard: &Dashboard, path: &Path, fallback: OutputFormat) -> Result<()> {
    let format = format_for_path(path, fallback);
    let bytes = encode(dashboard.surface()?, format)?;
    fs::write(path, bytes).map_err(|source| ChartError::Output {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), format = format.extension(), "wrote snapshot");
    Ok(())
}

/// Apply one script command to the dashboard.
pub fn execute(dashboard: &mut Dashboard, command: &ScriptCommand) -> Result<()> {
    debug!(?command, "executing");
    match command {
        ScriptCommand::View(kind) => dashboard.dispatch(Action::SelectView(*kind)),
        ScriptCommand::Year(year) => dashboard.dispatch(Action::SetYear(*year)),
        ScriptCommand::Hover { x, y } => dashboard.pointer_move(*x, *y),
        ScriptCommand::Leave => dashboard.pointer_leave(),
        ScriptCommand::Click { x, y } => dashboard.click(*x, *y),
        ScriptCommand::DoubleClick { x, y } => dashboard.double_click(*x, *y),
        ScriptCommand::Resize { width, height } => dashboard.resize(*width, *height),
        ScriptCommand::Snapshot(path) => {
            let fallback = dashboard.config().render.format;
            write_snapshot(dashboard, path, fallback)
        }
    }
}

/// Run every command in order, stopping at the first failure. Returns the
/// snapshot paths written.
pub fn run_script(dashboard: &mut Dashboard, commands: &[ScriptCommand]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for command in commands {
        execute(dashboard, command)?;
        if let ScriptCommand::Snapshot(path) = command {
            written.push(path.clone());
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartKind;
    use crate::config::DashboardConfig;
    use crate::data::Dataset;
    use crate::parser::parse_script;
    use crate::ChartRenderer;

    fn make_dashboard() -> Dashboard {
        let rows = [
            ["18", "130", "8", "70", "usa", "chevelle"],
            ["24", "95", "4", "70", "japan", "corona"],
            ["36", "58", "4", "82", "europe", "rabbit"],
        ];
        let data = Dataset::new(
            ["mpg", "horsepower", "cylinders", "model_year", "origin", "car_name"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
        .unwrap();
        Dashboard::new(data, DashboardConfig::default()).unwrap()
    }

    #[test]
    fn test_format_for_path() {
        assert_eq!(format_for_path(Path::new("a.SVG"), OutputFormat::Png), OutputFormat::Svg);
        assert_eq!(format_for_path(Path::new("a.png"), OutputFormat::Svg), OutputFormat::Png);
        assert_eq!(format_for_path(Path::new("a"), OutputFormat::Svg), OutputFormat::Svg);
    }

    #[test]
    fn test_encode_svg() {
        let dashboard = make_dashboard();
        let bytes = encode(dashboard.surface().unwrap(), OutputFormat::Svg).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("<svg"));
        assert_eq!(text.matches(r#"class="point""#).count(), 3);
    }

    #[test]
    fn test_run_script_drives_dashboard() {
        let mut dashboard = make_dashboard();
        let commands = parse_script("view pie\nyear 70\nleave\n").unwrap();
        let written = run_script(&mut dashboard, &commands).unwrap();
        assert!(written.is_empty());
        assert_eq!(dashboard.state().active_chart, ChartKind::Pie);
        assert_eq!(dashboard.chart().data().len(), 2);
    }

    #[test]
    fn test_snapshot_written() {
        let mut dashboard = make_dashboard();
        let path = std::env::temp_dir().join(format!("dashgraph-runtime-{}.svg", std::process::id()));
        let commands = vec![ScriptCommand::Snapshot(path.clone())];
        let written = run_script(&mut dashboard, &commands).unwrap();
        assert_eq!(written, vec![path.clone()]);
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("</svg>"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_snapshot_bad_directory() {
        let dashboard = make_dashboard();
        let path = Path::new("/nonexistent-dir-for-dashgraph/out.svg");
        let err = write_snapshot(&dashboard, path, OutputFormat::Svg).unwrap_err();
        assert!(matches!(err, ChartError::Output { .. }));
    }
}
