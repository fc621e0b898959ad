//! Filter coordination: which chart is showing, which rows it is showing,
//! and the year range control that narrows them.

use crate::chart::{render, Chart, ChartKind, ChartRenderer};
use crate::config::DashboardConfig;
use crate::data::Dataset;
use crate::error::{ChartError, Result};
use crate::interaction::{PointerEvent, PointerKind, Response, Selector, Tooltip, UiContext};
use crate::scene::{valid_size, Surface};
use crate::temporal::year_label;
use tracing::{debug, info};

/// Container id of the shared chart surface.
pub const CHART_SURFACE: &str = "chart";

/// Integer slider over the years present in the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeControl {
    min: i64,
    max: i64,
    step: i64,
    value: Option<i64>,
}

impl RangeControl {
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
            step: 1,
            value: None,
        }
    }

    /// Bounds from the year field of `data`, or `fallback` when it has none.
    pub fn from_dataset(data: &Dataset, year_field: &str, fallback: (i64, i64)) -> Self {
        let years: Vec<f64> = match data.column(year_field) {
            Ok(col) => data.numbers(&col),
            Err(_) => Vec::new(),
        };
        match crate::scale::extent(&years) {
            Some((lo, hi)) => Self::new(lo.round() as i64, hi.round() as i64),
            None => Self::new(fallback.0, fallback.1),
        }
    }

    pub fn bounds(&self) -> (i64, i64) {
        (self.min, self.max)
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    pub fn value(&self) -> Option<i64> {
        self.value
    }

    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min, self.max)
    }

    pub fn set(&mut self, value: i64) -> i64 {
        let value = self.clamp(value);
        self.value = Some(value);
        value
    }

    /// Visible label, e.g. `1982`. Empty until a value is chosen.
    pub fn label(&self) -> String {
        self.value
            .map(|v| year_label(&v.to_string()))
            .unwrap_or_default()
    }
}

/// Rows narrowing applied on top of the full dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub year: Option<i64>,
    pub selection: Option<Selector>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub active_chart: ChartKind,
    pub active_filter: FilterState,
}

impl DashboardState {
    pub fn new(active_chart: ChartKind) -> Self {
        Self {
            active_chart,
            active_filter: FilterState::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectView(ChartKind),
    SetYear(i64),
    CrossFilter(Selector),
    ResetSelection,
}

/// State transition for one action.
///
/// Switching views starts from the unfiltered dataset. A new year drops any
/// click selection. Year changes are ignored by views without a range control.
pub fn reduce(state: &DashboardState, action: &Action, config: &DashboardConfig) -> DashboardState {
    match action {
        Action::SelectView(kind) => DashboardState::new(*kind),
        Action::SetYear(year) if config.view(state.active_chart).range_control => DashboardState {
            active_chart: state.active_chart,
            active_filter: FilterState {
                year: Some(*year),
                selection: None,
            },
        },
        Action::SetYear(year) => {
            debug!(view = %state.active_chart, year, "view has no range control; ignoring year");
            state.clone()
        }
        Action::CrossFilter(selector) => DashboardState {
            active_chart: state.active_chart,
            active_filter: FilterState {
                year: state.active_filter.year,
                selection: Some(selector.clone()),
            },
        },
        Action::ResetSelection => DashboardState {
            active_chart: state.active_chart,
            active_filter: FilterState {
                year: state.active_filter.year,
                selection: None,
            },
        },
    }
}

/// Owns the dataset, the chart surface and the active chart, and turns user
/// input into re-renders.
#[derive(Debug)]
pub struct Dashboard {
    dataset: Dataset,
    config: DashboardConfig,
    ui: UiContext,
    state: DashboardState,
    chart: Chart,
    range: Option<RangeControl>,
    hovered: Option<usize>,
}

impl Dashboard {
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Result<Self> {
        let mut ui = UiContext::new();
        ui.mount(
            CHART_SURFACE,
            config.render.width as f64,
            config.render.height as f64,
        );
        let state = DashboardState::new(config.initial_view);
        let chart = render(
            &mut ui,
            CHART_SURFACE,
            state.active_chart,
            &dataset,
            &config.chart_config(state.active_chart),
        )?;
        let range = Self::range_for(&dataset, &config, state.active_chart);
        info!(view = %state.active_chart, rows = dataset.len(), "dashboard ready");

        Ok(Self {
            dataset,
            config,
            ui,
            state,
            chart,
            range,
            hovered: None,
        })
    }

    fn range_for(dataset: &Dataset, config: &DashboardConfig, kind: ChartKind) -> Option<RangeControl> {
        config.view(kind).range_control.then(|| {
            RangeControl::from_dataset(dataset, &config.year_field, (config.year_min, config.year_max))
        })
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn range_control(&self) -> Option<&RangeControl> {
        self.range.as_ref()
    }

    pub fn tooltip(&self) -> &Tooltip {
        self.ui.tooltip()
    }

    pub fn surface(&self) -> Result<&Surface> {
        self.ui.surface(CHART_SURFACE)
    }

    /// Apply an action and replace the chart. On failure the previous state
    /// and chart stay in place.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        let action = match (action, self.range.as_ref()) {
            (Action::SetYear(year), Some(range)) => Action::SetYear(range.clamp(year)),
            (action, _) => action,
        };
        let next = reduce(&self.state, &action, &self.config);
        if matches!(action, Action::SetYear(_)) && next == self.state {
            return Ok(());
        }
        self.commit(next, matches!(action, Action::SelectView(_)))
    }

    fn commit(&mut self, next: DashboardState, new_view: bool) -> Result<()> {
        let data = self.filtered(&next.active_filter)?;
        let chart = render(
            &mut self.ui,
            CHART_SURFACE,
            next.active_chart,
            &data,
            &self.config.chart_config(next.active_chart),
        )?;

        if new_view {
            self.range = Self::range_for(&self.dataset, &self.config, next.active_chart);
        }
        if let (Some(range), Some(year)) = (self.range.as_mut(), next.active_filter.year) {
            range.set(year);
        }
        info!(
            view = %next.active_chart,
            year = ?next.active_filter.year,
            selection = ?next.active_filter.selection,
            rows = data.len(),
            "dashboard updated"
        );
        self.state = next;
        self.chart = chart;
        self.hovered = None;
        Ok(())
    }

    /// Rows visible under a filter state.
    pub fn filtered(&self, filter: &FilterState) -> Result<Dataset> {
        let mut data = self.dataset.clone();
        if let Some(year) = filter.year {
            let by_year = Selector::Equals {
                field: self.config.year_field.clone(),
                value: year.to_string(),
            };
            data = by_year.apply(&data)?;
        }
        if let Some(selection) = &filter.selection {
            data = selection.apply(&data)?;
        }
        Ok(data)
    }

    /// Resize the chart surface and rebuild the chart for the new size.
    /// A rejected size or a failed rebuild leaves the surface as it was.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        if !valid_size(width, height) {
            return Err(ChartError::Config(format!("invalid surface size {}x{}", width, height)));
        }
        let surface = self.ui.surface_mut(CHART_SURFACE)?;
        let previous = (surface.width(), surface.height());
        surface.resize(width, height);
        let result = self.commit(self.state.clone(), false);
        if result.is_err() {
            self.ui.surface_mut(CHART_SURFACE)?.resize(previous.0, previous.1);
        }
        result
    }

    /// Pointer moved to `(x, y)` on the chart surface.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<()> {
        let target = self.surface()?.hit_test(x, y);
        if target == self.hovered {
            return Ok(());
        }
        if self.hovered.take().is_some() {
            self.deliver(PointerKind::Leave, x, y, None)?;
        }
        if target.is_some() {
            self.hovered = target;
            self.deliver(PointerKind::Enter, x, y, target)?;
        }
        Ok(())
    }

    /// Pointer left the chart surface.
    pub fn pointer_leave(&mut self) -> Result<()> {
        if self.hovered.take().is_some() {
            self.deliver(PointerKind::Leave, 0.0, 0.0, None)?;
        }
        Ok(())
    }

    pub fn click(&mut self, x: f64, y: f64) -> Result<()> {
        let target = self.surface()?.hit_test(x, y);
        if target.is_some() {
            self.deliver(PointerKind::Click, x, y, target)?;
        }
        Ok(())
    }

    pub fn double_click(&mut self, x: f64, y: f64) -> Result<()> {
        let target = self.surface()?.hit_test(x, y);
        self.deliver(PointerKind::DoubleClick, x, y, target)
    }

    fn deliver(&mut self, kind: PointerKind, x: f64, y: f64, target: Option<usize>) -> Result<()> {
        let event = PointerEvent { kind, x, y, target };
        match self.chart.respond(&event) {
            Response::None => Ok(()),
            Response::ShowTooltip { x, y, lines } => {
                self.ui.tooltip_mut().show(x, y, lines);
                Ok(())
            }
            Response::HideTooltip => {
                self.ui.tooltip_mut().hide();
                Ok(())
            }
            Response::CrossFilter(selector) => self.dispatch(Action::CrossFilter(selector)),
            Response::Reset => self.dispatch(Action::ResetSelection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_dataset() -> Dataset {
        let rows = vec![
            vec!["18", "130", "8", "70", "usa", "chevrolet chevelle malibu"],
            vec!["24", "95", "4", "70", "japan", "toyota corona mark ii"],
            vec!["22", "95", "6", "71", "usa", "plymouth duster"],
            vec!["36", "58", "4", "82", "europe", "vw rabbit"],
            vec!["31", "82", "4", "82", "japan", "datsun 310"],
        ];
        Dataset::new(
            ["mpg", "horsepower", "cylinders", "model_year", "origin", "car_name"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    fn make_dashboard() -> Dashboard {
        Dashboard::new(make_dataset(), DashboardConfig::default()).unwrap()
    }

    #[test]
    fn test_reduce_select_view_clears_filters() {
        let config = DashboardConfig::default();
        let state = DashboardState {
            active_chart: ChartKind::Bar,
            active_filter: FilterState {
                year: Some(82),
                selection: Some(Selector::Equals { field: "cylinders".into(), value: "4".into() }),
            },
        };
        let next = reduce(&state, &Action::SelectView(ChartKind::Pie), &config);
        assert_eq!(next, DashboardState::new(ChartKind::Pie));
    }

    #[test]
    fn test_reduce_year_ignored_without_range_control() {
        let config = DashboardConfig::default();
        let state = DashboardState::new(ChartKind::Line);
        assert_eq!(reduce(&state, &Action::SetYear(80), &config), state);
    }

    #[test]
    fn test_reduce_reset_keeps_year() {
        let config = DashboardConfig::default();
        let state = DashboardState {
            active_chart: ChartKind::Bar,
            active_filter: FilterState {
                year: Some(70),
                selection: Some(Selector::Equals { field: "cylinders".into(), value: "4".into() }),
            },
        };
        let next = reduce(&state, &Action::ResetSelection, &config);
        assert_eq!(next.active_filter, FilterState { year: Some(70), selection: None });
    }

    #[test]
    fn test_range_control_bounds_from_data() {
        let range = RangeControl::from_dataset(&make_dataset(), "model_year", (0, 1));
        assert_eq!(range.bounds(), (70, 82));
        assert_eq!(range.step(), 1);
        assert_eq!(range.label(), "");
    }

    #[test]
    fn test_range_control_fallback_and_clamp() {
        let mut range = RangeControl::from_dataset(&make_dataset(), "year", (70, 82));
        assert_eq!(range.bounds(), (70, 82));
        assert_eq!(range.set(99), 82);
        assert_eq!(range.label(), "1982");
    }

    #[test]
    fn test_year_filter_rerenders_active_chart() {
        let mut dash = make_dashboard();
        assert_eq!(dash.chart().datum_count(), 5);
        dash.dispatch(Action::SetYear(82)).unwrap();
        assert_eq!(dash.chart().kind(), ChartKind::Scatter);
        assert_eq!(dash.chart().data().len(), 2);
        assert_eq!(dash.range_control().unwrap().label(), "1982");
    }

    #[test]
    fn test_view_switch_resets_range_control() {
        let mut dash = make_dashboard();
        dash.dispatch(Action::SetYear(70)).unwrap();
        dash.dispatch(Action::SelectView(ChartKind::Line)).unwrap();
        assert!(dash.range_control().is_none());
        assert_eq!(dash.chart().data().len(), 5);
        dash.dispatch(Action::SetYear(70)).unwrap();
        assert_eq!(dash.state().active_filter.year, None);
    }

    #[test]
    fn test_bar_click_and_double_click() {
        let mut dash = make_dashboard();
        dash.dispatch(Action::SelectView(ChartKind::Bar)).unwrap();
        let groups_before = dash.chart().datum_count();
        assert_eq!(groups_before, 3);

        let Chart::Bar(bar) = dash.chart() else {
            panic!("expected bar chart");
        };
        let frame = *bar.frame();
        let x = frame.margin.left + bar.x_scale().center("4").unwrap();
        let y = frame.margin.top + frame.inner_height - 1.0;

        dash.click(x, y).unwrap();
        assert_eq!(dash.chart().data().len(), 3);
        assert_eq!(dash.chart().datum_count(), 1);

        dash.double_click(5.0, 5.0).unwrap();
        assert_eq!(dash.chart().data().len(), 5);
        assert_eq!(dash.chart().datum_count(), groups_before);
    }

    #[test]
    fn test_hover_shows_and_hides_tooltip() {
        let mut dash = make_dashboard();
        dash.dispatch(Action::SelectView(ChartKind::Bar)).unwrap();
        let Chart::Bar(bar) = dash.chart() else {
            panic!("expected bar chart");
        };
        let frame = *bar.frame();
        let x = frame.margin.left + bar.x_scale().center("8").unwrap();
        let y = frame.margin.top + frame.inner_height - 1.0;

        dash.pointer_move(x, y).unwrap();
        assert!(dash.tooltip().is_visible());
        assert_eq!(dash.tooltip().lines(), &["8".to_string(), "18.0".to_string()]);
        assert_eq!(dash.tooltip().position(), (x, y));

        dash.pointer_move(1.0, 1.0).unwrap();
        assert!(!dash.tooltip().is_visible());
    }

    #[test]
    fn test_failed_view_keeps_state() {
        let mut config = DashboardConfig::default();
        config.views.bar.y_dim = Some("weight".to_string());
        let mut dash = Dashboard::new(make_dataset(), config).unwrap();
        let before = dash.surface().unwrap().clone();
        assert!(dash.dispatch(Action::SelectView(ChartKind::Bar)).is_err());
        assert_eq!(dash.state().active_chart, ChartKind::Scatter);
        assert_eq!(dash.surface().unwrap(), &before);
    }

    #[test]
    fn test_resize_rebuilds_frame() {
        let mut dash = make_dashboard();
        dash.resize(400.0, 300.0).unwrap();
        assert_eq!(dash.chart().frame().width, 400.0);
        assert_eq!(dash.chart().frame().inner_width, 330.0);
    }

    #[test]
    fn test_resize_rejects_bad_sizes() {
        let mut dash = make_dashboard();
        let before = dash.surface().unwrap().clone();
        for (w, h) in [(40_000.0, 40_000.0), (0.0, 300.0), (400.0, -1.0), (f64::NAN, 300.0)] {
            let err = dash.resize(w, h).unwrap_err();
            assert!(matches!(err, ChartError::Config(_)), "{w}x{h}: {err}");
        }
        assert_eq!(dash.surface().unwrap(), &before);
        assert_eq!(dash.chart().frame().width, before.width());
    }

    #[test]
    fn test_cross_filter_to_zero_rows() {
        let mut dash = make_dashboard();
        dash.dispatch(Action::SelectView(ChartKind::Line)).unwrap();
        let empty = Selector::Equals { field: "cylinders".into(), value: "5".into() };
        dash.dispatch(Action::CrossFilter(empty.clone())).unwrap();
        assert_eq!(dash.state().active_filter.selection, Some(empty));
        assert_eq!(dash.chart().data().len(), 0);
        assert_eq!(dash.chart().datum_count(), 0);
        assert!(dash.surface().unwrap().bound_data().is_empty());
        assert!(!dash.surface().unwrap().is_empty());

        dash.dispatch(Action::ResetSelection).unwrap();
        assert_eq!(dash.chart().data().len(), 5);
    }
}
