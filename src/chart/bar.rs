use super::{axis_label, draw_title, format_value, require, ChartConfig, ChartFrame, ChartKind, ChartRenderer, Margin};
use crate::aggregate::{aggregate, sort_by_key, AggregatedGroup, Reduce};
use crate::axis::{band_ticks, linear_ticks, render_axis, Orient};
use crate::data::{Column, Dataset};
use crate::error::Result;
use crate::interaction::{PointerEvent, PointerKind, Response, Selector};
use crate::scale::{BandScale, LinearScale};
use crate::scene::{Group, Node, Primitive, Shape, Style, Surface};

const MARGIN: Margin = Margin::new(60.0, 20.0, 50.0, 30.0);
const BAND_PADDING: f64 = 0.3;
const FILL: &str = "#4e79a7";

/// Mean of a numeric field per category, one rectangle per category.
#[derive(Debug, Clone)]
pub struct BarChart {
    data: Dataset,
    title: String,
    frame: ChartFrame,
    x_col: Column,
    y_col: Column,
    x: BandScale,
    y: LinearScale,
    groups: Vec<AggregatedGroup>,
}

impl BarChart {
    pub fn build(data: &Dataset, config: &ChartConfig, width: f64, height: f64) -> Result<Self> {
        let x_col = require(data, config.x_dim.as_deref(), "x", ChartKind::Bar)?;
        let y_col = require(data, config.y_dim.as_deref(), "y", ChartKind::Bar)?;

        let mut groups = aggregate(data, &x_col, &Reduce::Mean(y_col.clone()));
        sort_by_key(&mut groups);

        let frame = ChartFrame::new(width, height, MARGIN);
        let keys: Vec<String> = groups.iter().map(|g| g.key.clone()).collect();
        let values: Vec<f64> = groups.iter().map(|g| g.value).collect();
        let x = BandScale::new(keys, (0.0, frame.inner_width), BAND_PADDING);
        let y = LinearScale::from_zero(&values, (frame.inner_height, 0.0), &y_col.name);

        Ok(Self {
            data: data.clone(),
            title: config.title.clone(),
            frame,
            x_col,
            y_col,
            x,
            y,
            groups,
        })
    }

    pub fn groups(&self) -> &[AggregatedGroup] {
        &self.groups
    }

    pub fn x_scale(&self) -> &BandScale {
        &self.x
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y
    }
}

impl ChartRenderer for BarChart {
    fn draw(&self, surface: &mut Surface) {
        let frame = &self.frame;
        let mut area = Group::new(frame.origin()).class("chart-area");

        area.push(axis_label(frame.inner_width / 2.0, frame.inner_height + 30.0, &self.x_col.name, 0.0));
        area.push(axis_label(-55.0, frame.inner_height / 4.0, &self.y_col.name, 90.0));

        area.push_group(render_axis(Orient::Left, &linear_ticks(&self.y), self.y.range(), (0.0, 0.0)));
        area.push_group(render_axis(
            Orient::Bottom,
            &band_ticks(&self.x),
            self.x.range(),
            (0.0, frame.inner_height),
        ));

        let mut draw_area = Group::new((0.0, 0.0)).class("draw-area");
        for (i, group) in self.groups.iter().enumerate() {
            let Some(x) = self.x.position(&group.key) else {
                continue;
            };
            let y = self.y.map(group.value);
            draw_area.push(
                Primitive::new(
                    Shape::Rect {
                        x,
                        y,
                        width: self.x.bandwidth(),
                        height: frame.inner_height - y,
                    },
                    Style::fill(FILL).with_stroke("black", 0.25),
                )
                .class("bar")
                .bind(i),
            );
        }
        area.push_group(draw_area);

        surface.push(Node::Group(area));
        draw_title(surface, &self.title, frame.width);
    }

    fn respond(&self, event: &PointerEvent) -> Response {
        let group = event.target.and_then(|i| self.groups.get(i));
        match (event.kind, group) {
            (PointerKind::Enter, Some(g)) => Response::ShowTooltip {
                x: event.x,
                y: event.y,
                lines: vec![g.key.clone(), format_value(g.value)],
            },
            (PointerKind::Leave, _) => Response::HideTooltip,
            (PointerKind::Click, Some(g)) => Response::CrossFilter(Selector::Equals {
                field: self.x_col.name.clone(),
                value: g.key.clone(),
            }),
            (PointerKind::DoubleClick, _) => Response::Reset,
            _ => Response::None,
        }
    }

    fn datum_count(&self) -> usize {
        self.groups.len()
    }

    fn data(&self) -> &Dataset {
        &self.data
    }

    fn frame(&self) -> &ChartFrame {
        &self.frame
    }
}
