use crate::temporal::{from_ordinal_days, ordinal_days};
use chrono::{Datelike, NaiveDate};
use tracing::warn;

/// Continuous mapping from a numeric domain to a pixel range.
///
/// A collapsed domain (min == max) stays as-is so the reported extent is
/// still exact; every value then maps to the middle of the range.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Scale over the extent of `values`. Empty input yields a collapsed
    /// domain at zero.
    pub fn from_values(values: &[f64], range: (f64, f64), dimension: &str) -> Self {
        let domain = extent(values).unwrap_or((0.0, 0.0));
        let scale = Self::new(domain, range);
        scale.warn_if_degenerate(dimension);
        scale
    }

    /// Scale over `[0, max(values)]`, used for count and mean axes.
    pub fn from_zero(values: &[f64], range: (f64, f64), dimension: &str) -> Self {
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let domain = if max.is_finite() { (0.0, max) } else { (0.0, 0.0) };
        let scale = Self::new(domain, range);
        scale.warn_if_degenerate(dimension);
        scale
    }

    fn warn_if_degenerate(&self, dimension: &str) {
        if self.is_degenerate() {
            warn!(dimension, value = self.domain.0, "degenerate scale domain");
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn is_degenerate(&self) -> bool {
        self.domain.0 == self.domain.1
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if self.is_degenerate() {
            return (r0 + r1) / 2.0;
        }
        let t = (value - d0) / (d1 - d0);
        r0 * (1.0 - t) + r1 * t
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }

    /// Label a tick value with the precision implied by the tick step.
    pub fn tick_label(&self, value: f64, count: usize) -> String {
        let step = tick_step(self.domain.0, self.domain.1, count).abs();
        let precision = if step > 0.0 && step.is_finite() {
            (-step.log10().floor()).max(0.0) as usize
        } else {
            0
        };
        format_number(value, precision)
    }
}

/// Minimum and maximum of finite values.
pub fn extent(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

// Step between ticks using the 1-2-5 rule. Negative results encode the
// inverse of a fractional step, which keeps tick values exact.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    if start == stop {
        return 0.0;
    }
    let (lo, hi) = if start < stop { (start, stop) } else { (stop, start) };
    let inc = tick_increment(lo, hi, count);
    if inc < 0.0 {
        1.0 / -inc
    } else {
        inc
    }
}

/// Upper bound on generated ticks for a single axis.
const MAX_TICKS: usize = 1_000;

/// Evenly spaced round values covering `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() || count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let inc = tick_increment(lo, hi, count);
    if inc == 0.0 || !inc.is_finite() {
        return Vec::new();
    }

    // Tick `i` sits at `i / inv` for fractional steps and at `i * inc` otherwise.
    let to_value = |i: f64| if inc < 0.0 { i / -inc } else { i * inc };
    let (i1, i2) = if inc < 0.0 {
        let inv = -inc;
        let mut i1 = (lo * inv).round();
        let mut i2 = (hi * inv).round();
        if i1 / inv < lo {
            i1 += 1.0;
        }
        if i2 / inv > hi {
            i2 -= 1.0;
        }
        (i1, i2)
    } else {
        let mut i1 = (lo / inc).round();
        let mut i2 = (hi / inc).round();
        if i1 * inc < lo {
            i1 += 1.0;
        }
        if i2 * inc > hi {
            i2 -= 1.0;
        }
        (i1, i2)
    };

    let n = i2 - i1 + 1.0;
    if !n.is_finite() || n < 1.0 {
        return Vec::new();
    }
    if n > MAX_TICKS as f64 {
        warn!(start, stop, count = n, "too many ticks; skipping tick generation");
        return Vec::new();
    }
    let mut out: Vec<f64> = (0..n as usize).map(|k| to_value(i1 + k as f64)).collect();
    if reverse {
        out.reverse();
    }
    out
}

/// Fixed-precision number with thousands separators.
pub fn format_number(value: f64, precision: usize) -> String {
    let text = format!("{:.*}", precision, value);
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) if rest.chars().any(|c| c != '0' && c != '.') => ("-", rest),
        Some(rest) => ("", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match digits.find('.') {
        Some(pos) => digits.split_at(pos),
        None => (digits, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}{}", sign, grouped, frac_part)
}

/// Ordinal band scale: one equal-width band per key with a padding fraction
/// used both between bands and at the outer edges.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    range: (f64, f64),
    padding: f64,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new(domain: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        let padding = padding.clamp(0.0, 1.0);
        let n = domain.len() as f64;
        let (r0, r1) = range;
        let span = r1 - r0;
        let step = span / (n - padding + padding * 2.0).max(1.0);
        let start = r0 + (span - step * (n - padding)) * 0.5;
        let bandwidth = step * (1.0 - padding);
        Self {
            domain,
            range,
            padding,
            start,
            step,
            bandwidth,
        }
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Left edge of the band for `key`.
    pub fn position(&self, key: &str) -> Option<f64> {
        self.domain
            .iter()
            .position(|k| k == key)
            .map(|i| self.start + self.step * i as f64)
    }

    pub fn center(&self, key: &str) -> Option<f64> {
        self.position(key).map(|x| x + self.bandwidth / 2.0)
    }
}

/// Temporal scale over calendar dates, linear in days.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeScale {
    domain: (NaiveDate, NaiveDate),
    linear: LinearScale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeInterval {
    Years(i32),
    Months(u32),
    Days(i64),
}

impl TimeScale {
    pub fn from_dates(dates: &[NaiveDate], range: (f64, f64), dimension: &str) -> Self {
        let fallback = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN);
        let lo = dates.iter().min().copied().unwrap_or(fallback);
        let hi = dates.iter().max().copied().unwrap_or(lo);
        let linear = LinearScale::new((ordinal_days(lo), ordinal_days(hi)), range);
        linear.warn_if_degenerate(dimension);
        Self {
            domain: (lo, hi),
            linear,
        }
    }

    pub fn domain(&self) -> (NaiveDate, NaiveDate) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.linear.range()
    }

    pub fn is_degenerate(&self) -> bool {
        self.linear.is_degenerate()
    }

    pub fn map(&self, date: NaiveDate) -> f64 {
        self.linear.map(ordinal_days(date))
    }

    fn interval(&self, count: usize) -> TimeInterval {
        let (lo, hi) = self.domain;
        let span_days = (hi - lo).num_days() as f64;
        let target = span_days / count.max(1) as f64;
        if target >= 182.0 {
            let step = tick_step(lo.year() as f64, hi.year() as f64, count).max(1.0);
            TimeInterval::Years(step.round() as i32)
        } else if target >= 45.0 {
            TimeInterval::Months(3)
        } else if target >= 20.0 {
            TimeInterval::Months(1)
        } else if target >= 5.0 {
            TimeInterval::Days(7)
        } else {
            TimeInterval::Days(1)
        }
    }

    /// Tick dates within the domain with their labels.
    pub fn ticks(&self, count: usize) -> Vec<(NaiveDate, String)> {
        let (lo, hi) = self.domain;
        if lo == hi {
            return vec![(lo, label_date(lo))];
        }

        let mut out = Vec::new();
        match self.interval(count) {
            TimeInterval::Years(step) => {
                let first = if lo.ordinal() == 1 { lo.year() } else { lo.year() + 1 };
                let mut year = (first as f64 / step as f64).ceil() as i32 * step;
                while let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1) {
                    if date > hi {
                        break;
                    }
                    out.push(date);
                    year += step;
                }
            }
            TimeInterval::Months(step) => {
                let mut year = lo.year();
                let mut month = lo.month0();
                if lo.day() != 1 {
                    month += 1;
                }
                month = month.div_ceil(step) * step;
                loop {
                    year += (month / 12) as i32;
                    month %= 12;
                    let Some(date) = NaiveDate::from_ymd_opt(year, month + 1, 1) else {
                        break;
                    };
                    if date > hi {
                        break;
                    }
                    out.push(date);
                    month += step;
                }
            }
            TimeInterval::Days(step) => {
                let mut days = ordinal_days(lo);
                let end = ordinal_days(hi);
                while days <= end {
                    if let Some(date) = from_ordinal_days(days) {
                        out.push(date);
                    }
                    days += step as f64;
                }
            }
        }
        out.into_iter().map(|d| (d, label_date(d))).collect()
    }
}

fn label_date(date: NaiveDate) -> String {
    if date.ordinal() == 1 {
        date.format("%Y").to_string()
    } else if date.day() == 1 {
        date.format("%B").to_string()
    } else {
        date.format("%a %d").to_string()
    }
}
