use crate::data::{parse_numeric, Dataset};
use crate::error::{ChartError, Result};
use crate::scene::Surface;
use crate::temporal::parse_year;
use chrono::NaiveDate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Enter,
    Leave,
    Click,
    DoubleClick,
}

/// A pointer event delivered to a chart. `target` is the datum index of the
/// primitive under the pointer, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
    pub target: Option<usize>,
}

/// Row predicate produced by clicking a chart primitive or moving the range
/// control.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Field equals a value. Numeric text compares numerically.
    Equals { field: String, value: String },
    /// Field parses to a year falling on the same day as `date`.
    SameDay { field: String, date: NaiveDate },
}

impl Selector {
    pub fn field(&self) -> &str {
        match self {
            Selector::Equals { field, .. } | Selector::SameDay { field, .. } => field,
        }
    }

    /// Rows of `data` matching the selector.
    pub fn apply(&self, data: &Dataset) -> Result<Dataset> {
        let column = data.column(self.field())?;
        Ok(match self {
            Selector::Equals { value, .. } => match parse_numeric(value) {
                Some(target) => data.filter(|row| row.number(&column) == Some(target)),
                None => data.filter(|row| row.text(&column) == value.as_str()),
            },
            Selector::SameDay { date, .. } => {
                data.filter(|row| parse_year(row.text(&column)) == Some(*date))
            }
        })
    }
}

/// What a chart asks its host to do in reaction to a pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    None,
    ShowTooltip { x: f64, y: f64, lines: Vec<String> },
    HideTooltip,
    CrossFilter(Selector),
    Reset,
}

/// The single hover overlay shared by every chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tooltip {
    visible: bool,
    position: (f64, f64),
    lines: Vec<String>,
}

impl Tooltip {
    pub fn show(&mut self, x: f64, y: f64, lines: Vec<String>) {
        self.visible = true;
        self.position = (x, y);
        self.lines = lines;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Drawing surfaces and the tooltip, handed to every renderer instead of
/// looking elements up by global id.
#[derive(Debug, Default)]
pub struct UiContext {
    surfaces: BTreeMap<String, Surface>,
    tooltip: Tooltip,
}

impl UiContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount (or re-mount, clearing) a surface of the given size.
    pub fn mount(&mut self, id: &str, width: f64, height: f64) {
        self.surfaces.insert(id.to_string(), Surface::new(id, width, height));
    }

    pub fn surface(&self, id: &str) -> Result<&Surface> {
        self.surfaces
            .get(id)
            .ok_or_else(|| ChartError::UnknownSurface(id.to_string()))
    }

    pub fn surface_mut(&mut self, id: &str) -> Result<&mut Surface> {
        self.surfaces
            .get_mut(id)
            .ok_or_else(|| ChartError::UnknownSurface(id.to_string()))
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn tooltip_mut(&mut self) -> &mut Tooltip {
        &mut self.tooltip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_dataset() -> Dataset {
        Dataset::new(
            vec!["model_year".to_string(), "origin".to_string()],
            vec![
                vec!["70".to_string(), "usa".to_string()],
                vec!["82".to_string(), "japan".to_string()],
                vec!["82.0".to_string(), "usa".to_string()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_equals_numeric() {
        let data = make_dataset();
        let sel = Selector::Equals { field: "model_year".into(), value: "82".into() };
        assert_eq!(sel.apply(&data).unwrap().len(), 2);
    }

    #[test]
    fn test_equals_text() {
        let data = make_dataset();
        let sel = Selector::Equals { field: "origin".into(), value: "usa".into() };
        assert_eq!(sel.apply(&data).unwrap().len(), 2);
    }

    #[test]
    fn test_same_day() {
        let data = make_dataset();
        let sel = Selector::SameDay {
            field: "model_year".into(),
            date: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
        };
        assert_eq!(sel.apply(&data).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_field() {
        let data = make_dataset();
        let sel = Selector::Equals { field: "weight".into(), value: "1".into() };
        assert!(matches!(sel.apply(&data), Err(ChartError::Dimension { .. })));
    }

    #[test]
    fn test_single_tooltip_rewritten() {
        let mut ui = UiContext::new();
        ui.tooltip_mut().show(1.0, 2.0, vec!["a".into()]);
        ui.tooltip_mut().show(5.0, 6.0, vec!["b".into()]);
        assert_eq!(ui.tooltip().position(), (5.0, 6.0));
        assert_eq!(ui.tooltip().lines(), &["b".to_string()]);
        ui.tooltip_mut().hide();
        assert!(!ui.tooltip().is_visible());
    }

    #[test]
    fn test_unknown_surface() {
        let ui = UiContext::new();
        assert!(matches!(ui.surface("chart"), Err(ChartError::UnknownSurface(_))));
    }
}
