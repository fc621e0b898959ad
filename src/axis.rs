use crate::scale::{BandScale, LinearScale, TimeScale};
use crate::scene::{Group, Primitive, Shape, Style, TextAnchor};

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const FONT_SIZE: f64 = 10.0;
pub const TICK_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orient {
    Bottom,
    Left,
}

/// A tick at `offset` pixels along the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub offset: f64,
    pub label: String,
}

pub fn linear_ticks(scale: &LinearScale) -> Vec<Tick> {
    scale
        .ticks(TICK_COUNT)
        .into_iter()
        .map(|v| Tick {
            offset: scale.map(v),
            label: scale.tick_label(v, TICK_COUNT),
        })
        .collect()
}

pub fn band_ticks(scale: &BandScale) -> Vec<Tick> {
    scale
        .domain()
        .iter()
        .filter_map(|key| {
            scale.center(key).map(|offset| Tick {
                offset,
                label: key.clone(),
            })
        })
        .collect()
}

pub fn time_ticks(scale: &TimeScale) -> Vec<Tick> {
    scale
        .ticks(TICK_COUNT)
        .into_iter()
        .map(|(date, label)| Tick {
            offset: scale.map(date),
            label,
        })
        .collect()
}

/// Domain line plus one tick mark and label per tick. No grid lines.
pub fn render_axis(orient: Orient, ticks: &[Tick], range: (f64, f64), translate: (f64, f64)) -> Group {
    let class = match orient {
        Orient::Bottom => "axis axis-bottom",
        Orient::Left => "axis axis-left",
    };
    let mut group = Group::new(translate).class(class);
    let line_style = Style::stroke("currentColor", 1.0);
    let (r0, r1) = range;

    let domain = match orient {
        Orient::Bottom => vec![(r0, TICK_SIZE), (r0, 0.0), (r1, 0.0), (r1, TICK_SIZE)],
        Orient::Left => vec![(-TICK_SIZE, r0), (0.0, r0), (0.0, r1), (-TICK_SIZE, r1)],
    };
    group.push(Primitive::new(Shape::Polyline { points: domain }, line_style.clone()).class("domain"));

    let text_style = Style::fill("currentColor").with_font_size(FONT_SIZE);
    for tick in ticks {
        let (mark, label) = match orient {
            Orient::Bottom => (
                Shape::Line { x1: tick.offset, y1: 0.0, x2: tick.offset, y2: TICK_SIZE },
                Shape::Text {
                    x: tick.offset,
                    y: TICK_SIZE + TICK_PADDING + FONT_SIZE * 0.71,
                    text: tick.label.clone(),
                    anchor: TextAnchor::Middle,
                    rotate: 0.0,
                },
            ),
            Orient::Left => (
                Shape::Line { x1: -TICK_SIZE, y1: tick.offset, x2: 0.0, y2: tick.offset },
                Shape::Text {
                    x: -(TICK_SIZE + TICK_PADDING),
                    y: tick.offset + FONT_SIZE * 0.32,
                    text: tick.label.clone(),
                    anchor: TextAnchor::End,
                    rotate: 0.0,
                },
            ),
        };
        group.push(Primitive::new(mark, line_style.clone()).class("tick"));
        group.push(Primitive::new(label, text_style.clone()).class("tick-label"));
    }
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Node;

    #[test]
    fn test_linear_ticks_positions() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        let ticks = linear_ticks(&scale);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[5].offset, 50.0);
        assert_eq!(ticks[5].label, "5");
    }

    #[test]
    fn test_band_ticks_at_centers() {
        let scale = BandScale::new(vec!["a".into(), "b".into()], (0.0, 100.0), 0.0);
        let ticks = band_ticks(&scale);
        assert_eq!(ticks[0].offset, 25.0);
        assert_eq!(ticks[1].label, "b");
    }

    #[test]
    fn test_render_axis_structure() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        let ticks = linear_ticks(&scale);
        let group = render_axis(Orient::Bottom, &ticks, scale.range(), (0.0, 300.0));
        assert_eq!(group.translate, (0.0, 300.0));
        // domain + (mark, label) per tick
        assert_eq!(group.children.len(), 1 + 2 * ticks.len());
        let grid = group.children.iter().any(|n| match n {
            Node::Primitive(p) => p.class.as_deref() == Some("grid"),
            Node::Group(_) => false,
        });
        assert!(!grid);
    }
}
