use super::{axis_label, draw_title, format_value, require, ChartConfig, ChartFrame, ChartKind, ChartRenderer, Margin};
use crate::aggregate::{aggregate, sort_by_key, Reduce};
use crate::axis::{linear_ticks, render_axis, time_ticks, Orient};
use crate::data::{Column, Dataset};
use crate::error::Result;
use crate::interaction::{PointerEvent, PointerKind, Response, Selector};
use crate::scale::{LinearScale, TimeScale};
use crate::scene::{Group, Node, Primitive, Shape, Style, Surface};
use crate::temporal::{format_date, parse_year};
use chrono::NaiveDate;
use tracing::warn;

const MARGIN: Margin = Margin::new(50.0, 20.0, 60.0, 30.0);
const MARKER_RADIUS: f64 = 10.0;
const COLOR: &str = "#ed9a9b";

/// One aggregated point of the series.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePoint {
    pub key: String,
    pub date: NaiveDate,
    pub value: f64,
}

/// Count of a field per year, drawn as a path with a marker per year.
#[derive(Debug, Clone)]
pub struct LineChart {
    data: Dataset,
    title: String,
    frame: ChartFrame,
    x_col: Column,
    y_col: Column,
    x: TimeScale,
    y: LinearScale,
    points: Vec<LinePoint>,
}

impl LineChart {
    pub fn build(data: &Dataset, config: &ChartConfig, width: f64, height: f64) -> Result<Self> {
        let x_col = require(data, config.x_dim.as_deref(), "x", ChartKind::Line)?;
        let y_col = require(data, config.y_dim.as_deref(), "y", ChartKind::Line)?;

        let mut groups = aggregate(data, &x_col, &Reduce::Count(y_col.clone()));
        sort_by_key(&mut groups);

        let points: Vec<LinePoint> = groups
            .into_iter()
            .filter_map(|g| match parse_year(&g.key) {
                Some(date) => Some(LinePoint { key: g.key, date, value: g.value }),
                None => {
                    warn!(dimension = %x_col.name, key = %g.key, "dropping group with unparsable year");
                    None
                }
            })
            .collect();

        let frame = ChartFrame::new(width, height, MARGIN);
        let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();
        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        let x = TimeScale::from_dates(&dates, (0.0, frame.inner_width), &x_col.name);
        let y = LinearScale::from_zero(&values, (frame.inner_height, 0.0), &y_col.name);

        Ok(Self {
            data: data.clone(),
            title: config.title.clone(),
            frame,
            x_col,
            y_col,
            x,
            y,
            points,
        })
    }

    pub fn points(&self) -> &[LinePoint] {
        &self.points
    }

    pub fn x_scale(&self) -> &TimeScale {
        &self.x
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y
    }
}

impl ChartRenderer for LineChart {
    fn draw(&self, surface: &mut Surface) {
        let frame = &self.frame;
        let mut area = Group::new(frame.origin()).class("chart-area");

        area.push(axis_label(frame.inner_width / 2.0, frame.inner_height + 30.0, &self.x_col.name, 0.0));
        area.push(axis_label(-frame.margin.left + 10.0, frame.inner_height / 4.0, &self.y_col.name, 90.0));

        area.push_group(render_axis(Orient::Left, &linear_ticks(&self.y), self.y.range(), (0.0, 0.0)));
        area.push_group(render_axis(
            Orient::Bottom,
            &time_ticks(&self.x),
            self.x.range(),
            (0.0, frame.inner_height),
        ));

        let mut draw_area = Group::new((0.0, 0.0)).class("draw-area");
        let coords: Vec<(f64, f64)> = self
            .points
            .iter()
            .map(|p| (self.x.map(p.date), self.y.map(p.value)))
            .collect();
        if coords.len() > 1 {
            draw_area.push(Primitive::new(Shape::Polyline { points: coords.clone() }, Style::stroke(COLOR, 1.0)).class("line"));
        }
        for (i, (cx, cy)) in coords.into_iter().enumerate() {
            draw_area.push(
                Primitive::new(
                    Shape::Circle { cx, cy, r: MARKER_RADIUS },
                    Style::fill(COLOR).with_stroke(COLOR, 1.0),
                )
                .class("marker")
                .bind(i),
            );
        }
        area.push_group(draw_area);

        surface.push(Node::Group(area));
        draw_title(surface, &self.title, frame.width);
    }

    fn respond(&self, event: &PointerEvent) -> Response {
        let point = event.target.and_then(|i| self.points.get(i));
        match (event.kind, point) {
            (PointerKind::Enter, Some(p)) => Response::ShowTooltip {
                x: event.x,
                y: event.y,
                lines: vec![format_date(p.date), format_value(p.value)],
            },
            (PointerKind::Leave, _) => Response::HideTooltip,
            (PointerKind::Click, Some(p)) => Response::CrossFilter(Selector::SameDay {
                field: self.x_col.name.clone(),
                date: p.date,
            }),
            (PointerKind::DoubleClick, _) => Response::Reset,
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

#[cfg(test)]
mod tests {
    use super::*;

    fn make_dataset(rows: Vec<Vec<&str>>) -> Dataset {
        Dataset::new(
            vec!["model_year".to_string(), "mpg".to_string()],
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    fn sample() -> Dataset {
        make_dataset(vec![
            vec!["82", "30"],
            vec!["70", "18"],
            vec!["71", "21"],
            vec!["70", "16"],
            vec!["82", "34"],
            vec!["82", "?"],
        ])
    }

    #[test]
    fn test_counts_sorted_by_year() {
        let chart = LineChart::build(&sample(), &ChartConfig::xy("model_year", "mpg"), 800.0, 600.0).unwrap();
        let summary: Vec<(i32, f64)> = chart
            .points()
            .iter()
            .map(|p| (chrono::Datelike::year(&p.date), p.value))
            .collect();
        assert_eq!(summary, vec![(1970, 2.0), (1971, 1.0), (1982, 2.0)]);
        assert_eq!(chart.y_scale().domain(), (0.0, 2.0));
    }

    #[test]
    fn test_draws_path_and_markers() {
        let chart = LineChart::build(&sample(), &ChartConfig::xy("model_year", "mpg"), 800.0, 600.0).unwrap();
        let mut surface = Surface::new("chart", 800.0, 600.0);
        chart.draw(&mut surface);

        let lines = surface.find_class("line");
        assert_eq!(lines.len(), 1);
        assert!(matches!(&lines[0].shape, Shape::Polyline { points } if points.len() == 3));
        let markers = surface.find_class("marker");
        assert_eq!(markers.len(), 3);
        assert!(matches!(markers[0].shape, Shape::Circle { cx, r, .. } if cx == 0.0 && r == MARKER_RADIUS));
    }

    #[test]
    fn test_click_filters_by_day() {
        let data = sample();
        let chart = LineChart::build(&data, &ChartConfig::xy("model_year", "mpg"), 800.0, 600.0).unwrap();
        let click = PointerEvent { kind: PointerKind::Click, x: 0.0, y: 0.0, target: Some(2) };
        match chart.respond(&click) {
            Response::CrossFilter(selector) => {
                let subset = selector.apply(&data).unwrap();
                assert_eq!(subset.len(), 3);
            }
            other => panic!("unexpected response: {:?}", other),
        }
        let dbl = PointerEvent { kind: PointerKind::DoubleClick, x: 0.0, y: 0.0, target: None };
        assert_eq!(chart.respond(&dbl), Response::Reset);
    }

    #[test]
    fn test_tooltip_formats_date_and_value() {
        let chart = LineChart::build(&sample(), &ChartConfig::xy("model_year", "mpg"), 800.0, 600.0).unwrap();
        let hover = PointerEvent { kind: PointerKind::Enter, x: 3.0, y: 4.0, target: Some(0) };
        assert_eq!(
            chart.respond(&hover),
            Response::ShowTooltip { x: 3.0, y: 4.0, lines: vec!["01/01/1970".to_string(), "2.0".to_string()] }
        );
    }

    #[test]
    fn test_single_year_is_degenerate_but_drawn() {
        let data = make_dataset(vec![vec!["82", "30"], vec!["82", "34"]]);
        let chart = LineChart::build(&data, &ChartConfig::xy("model_year", "mpg"), 800.0, 600.0).unwrap();
        assert!(chart.x_scale().is_degenerate());
        let mut surface = Surface::new("chart", 800.0, 600.0);
        chart.draw(&mut surface);
        let markers = surface.find_class("marker");
        assert_eq!(markers.len(), 1);
        assert!(matches!(markers[0].shape, Shape::Circle { cx, cy, .. } if cx.is_finite() && cy.is_finite()));
        assert!(surface.find_class("line").is_empty());
    }

    #[test]
    fn test_empty_after_filter() {
        let data = make_dataset(vec![]);
        let chart = LineChart::build(&data, &ChartConfig::xy("model_year", "mpg"), 800.0, 600.0).unwrap();
        assert_eq!(chart.datum_count(), 0);

        let mut surface = Surface::new("chart", 800.0, 600.0);
        chart.draw(&mut surface);
        assert!(surface.find_class("marker").is_empty());
        assert!(surface.find_class("line").is_empty());
        assert!(surface.bound_data().is_empty());

        let ticks = surface.find_class("tick");
        assert!(!ticks.is_empty());
        let mut finite = true;
        surface.walk(|p, _| {
            finite &= match &p.shape {
                Shape::Line { x1, y1, x2, y2 } => [x1, y1, x2, y2].iter().all(|v| v.is_finite()),
                Shape::Text { x, y, .. } => x.is_finite() && y.is_finite(),
                Shape::Polyline { points } => points.iter().all(|(x, y)| x.is_finite() && y.is_finite()),
                _ => true,
            };
        });
        assert!(finite);
    }

    #[test]
    fn test_unparsable_years_dropped() {
        let data = make_dataset(vec![vec!["70", "18"], vec!["n/a", "20"]]);
        let chart = LineChart::build(&data, &ChartConfig::xy("model_year", "mpg"), 800.0, 600.0).unwrap();
        assert_eq!(chart.datum_count(), 1);
    }
}
