// Script AST

use crate::chart::ChartKind;
use std::path::PathBuf;

/// One line of an interaction script.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    /// Switch the dashboard to another chart.
    View(ChartKind),
    /// Move the year range control.
    Year(i64),
    /// Move the pointer to surface coordinates.
    Hover { x: f64, y: f64 },
    /// Pointer leaves the surface.
    Leave,
    Click { x: f64, y: f64 },
    /// Double-click, at the origin unless coordinates are given.
    DoubleClick { x: f64, y: f64 },
    Resize { width: f64, height: f64 },
    /// Write the current surface to a file; format follows the extension.
    Snapshot(PathBuf),
}
