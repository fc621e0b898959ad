use crate::data::{parse_numeric, report_skipped, Column, Dataset};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::warn;

/// How the rows of one group collapse to a single value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reduce {
    /// Number of rows in the group.
    Rows,
    /// Number of rows whose field holds a valid number.
    Count(Column),
    /// Arithmetic mean of the valid numbers of a field.
    Mean(Column),
}

/// One bucket of an aggregation: the grouping key, its reduced value and the
/// number of input rows that fell into it.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedGroup {
    pub key: String,
    pub value: f64,
    pub rows: usize,
}

#[derive(Default)]
struct Accumulator {
    rows: usize,
    valid: usize,
    sum: f64,
}

/// Group rows by `key` and reduce each group. Groups come out in first-seen
/// key order; callers that need key order sort with [`sort_by_key`].
///
/// A `Mean` group with no valid numbers has no defined value and is dropped.
pub fn aggregate(data: &Dataset, key: &Column, reduce: &Reduce) -> Vec<AggregatedGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<(&str, Accumulator)> = Vec::new();
    let mut skipped = 0usize;

    for row in data.rows() {
        let k = row.text(key);
        let slot = *index.entry(k).or_insert_with(|| {
            order.push((k, Accumulator::default()));
            order.len() - 1
        });
        let acc = &mut order[slot].1;
        acc.rows += 1;

        let field = match reduce {
            Reduce::Rows => continue,
            Reduce::Count(c) | Reduce::Mean(c) => c,
        };
        match parse_numeric(row.text(field)) {
            Some(v) => {
                acc.valid += 1;
                acc.sum += v;
            }
            None => skipped += 1,
        }
    }

    if let Reduce::Count(c) | Reduce::Mean(c) = reduce {
        report_skipped(c, skipped);
    }

    order
        .into_iter()
        .filter_map(|(k, acc)| {
            let value = match reduce {
                Reduce::Rows => acc.rows as f64,
                Reduce::Count(_) => acc.valid as f64,
                Reduce::Mean(_) if acc.valid == 0 => {
                    warn!(key = k, "dropping group without numeric values");
                    return None;
                }
                Reduce::Mean(_) => acc.sum / acc.valid as f64,
            };
            Some(AggregatedGroup {
                key: k.to_string(),
                value,
                rows: acc.rows,
            })
        })
        .collect()
}

/// Sort groups ascending by key. Numeric keys compare numerically and come
/// before non-numeric keys, which compare lexically.
pub fn sort_by_key(groups: &mut [AggregatedGroup]) {
    groups.sort_by(|a, b| compare_keys(&a.key, &b.key));
}

pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (parse_numeric(a), parse_numeric(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
