use crate::error::{ChartError, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// One immutable record. Values are kept as the raw text of the source so
/// that categorical fields survive untouched and numeric fields are parsed
/// on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<String>,
}

impl Row {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn text(&self, column: &Column) -> &str {
        self.values.get(column.index).map(String::as_str).unwrap_or("")
    }

    /// Numeric value of a field, or `None` when the text is empty or malformed.
    pub fn number(&self, column: &Column) -> Option<f64> {
        parse_numeric(self.text(column))
    }
}

/// A resolved field of the dataset schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub index: usize,
    pub name: String,
}

/// Ordered, read-only sequence of rows sharing one header row.
///
/// Cloning and filtering are cheap: subsets share both the header list and
/// the row allocations of the dataset they were cut from.
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Arc<[String]>,
    rows: Vec<Arc<Row>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if headers.is_empty() {
            return Err(ChartError::DataFetch("dataset has no header row".to_string()));
        }
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut values| {
                values.resize(width, String::new());
                Arc::new(Row::new(values))
            })
            .collect();
        Ok(Self {
            headers: headers.into(),
            rows,
        })
    }

    /// Create a Dataset from a JSON array of objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value.as_array().ok_or_else(|| {
            ChartError::DataFetch("input data must be a JSON array of objects".to_string())
        })?;

        let first_obj = array
            .first()
            .and_then(Value::as_object)
            .ok_or_else(|| ChartError::DataFetch("input data array is empty".to_string()))?;
        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::with_capacity(array.len());
        for item in array {
            let obj = item.as_object().ok_or_else(|| {
                ChartError::DataFetch("items in array must be objects".to_string())
            })?;
            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let text = match obj.get(header) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => String::new(),
                    _ => {
                        return Err(ChartError::DataFetch(format!(
                            "unsupported value type for field '{}'",
                            header
                        )))
                    }
                };
                row.push(text);
            }
            rows.push(row);
        }

        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Arc<Row>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve a field name (case-insensitive) against the header row.
    pub fn column(&self, name: &str) -> Result<Column> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .map(|index| Column {
                index,
                name: self.headers[index].clone(),
            })
            .ok_or_else(|| ChartError::Dimension {
                dimension: name.to_string(),
                available: self.headers.to_vec(),
            })
    }

    /// New subset holding the rows that satisfy `keep`, in original order.
    pub fn filter<F>(&self, mut keep: F) -> Dataset
    where
        F: FnMut(&Row) -> bool,
    {
        Dataset {
            headers: Arc::clone(&self.headers),
            rows: self.rows.iter().filter(|r| keep(r.as_ref())).cloned().collect(),
        }
    }

    /// Numeric values of a column with malformed entries excluded.
    /// Logs one diagnostic when anything was dropped.
    pub fn numbers(&self, column: &Column) -> Vec<f64> {
        let mut skipped = 0usize;
        let values: Vec<f64> = self
            .rows
            .iter()
            .filter_map(|row| {
                let v = row.number(column);
                if v.is_none() {
                    skipped += 1;
                }
                v
            })
            .collect();
        report_skipped(column, skipped);
        values
    }

    /// Distinct text values of a column in first-seen order.
    pub fn distinct(&self, column: &Column) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for row in &self.rows {
            let text = row.text(column);
            if seen.insert(text) {
                out.push(text.to_string());
            }
        }
        out
    }
}

/// Parse numeric text, refusing empty, malformed and non-finite input.
pub fn parse_numeric(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub(crate) fn report_skipped(column: &Column, skipped: usize) {
    if skipped > 0 {
        warn!(
            column = %column.name,
            skipped,
            "excluded rows with missing or malformed numeric values"
        );
    }
}
