/// Space reserved around the plotting area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margin {
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self { left, right, top, bottom }
    }
}

/// Outer size of the surface and the drawable rectangle inside the margins.
/// Computed fresh for every chart construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrame {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub inner_width: f64,
    pub inner_height: f64,
}

impl ChartFrame {
    pub fn new(width: f64, height: f64, margin: Margin) -> Self {
        Self {
            width,
            height,
            margin,
            inner_width: (width - margin.left - margin.right).max(0.0),
            inner_height: (height - margin.top - margin.bottom).max(0.0),
        }
    }

    /// Translation of the plotting area's origin.
    pub fn origin(&self) -> (f64, f64) {
        (self.margin.left, self.margin.top)
    }
}
