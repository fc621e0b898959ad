use crate::data::Dataset;
use crate::error::{ChartError, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

/// Read a delimited file with a header row into a Dataset.
pub fn read_csv_from_reader<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    let dataset = Dataset::new(headers, rows)?;
    debug!(rows = dataset.len(), columns = dataset.headers().len(), "loaded dataset");
    Ok(dataset)
}

pub fn read_csv_from_path(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| ChartError::DataFetch(format!("{}: {}", path.display(), e)))?;
    read_csv_from_reader(file)
}

pub fn read_csv_from_stdin() -> Result<Dataset> {
    read_csv_from_reader(io::stdin().lock())
}

/// Load the dataset named on the command line: `-` reads CSV from stdin,
/// a `.json` file is read as an array of objects, anything else as CSV.
pub fn read_dataset(source: &str) -> Result<Dataset> {
    if source == "-" {
        return read_csv_from_stdin();
    }
    let path = Path::new(source);
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if !is_json {
        return read_csv_from_path(path);
    }
    let file = File::open(path)
        .map_err(|e| ChartError::DataFetch(format!("{}: {}", path.display(), e)))?;
    let value: serde_json::Value = serde_json::from_reader(io::BufReader::new(file))?;
    let dataset = Dataset::from_json(&value)?;
    debug!(rows = dataset.len(), "loaded json dataset");
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_basic() {
        let csv = "mpg,cylinders,origin\n18,8,usa\n 24 ,4, japan\n";
        let data = read_csv_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(data.headers(), &["mpg", "cylinders", "origin"]);
        assert_eq!(data.len(), 2);
        let origin = data.column("origin").unwrap();
        assert_eq!(data.rows()[1].text(&origin), "japan");
    }

    #[test]
    fn test_read_csv_empty_input_fails() {
        let result = read_csv_from_reader("".as_bytes());
        assert!(matches!(result, Err(ChartError::DataFetch(_))));
    }

    #[test]
    fn test_read_csv_missing_file() {
        let result = read_csv_from_path("definitely/not/here.csv");
        assert!(matches!(result, Err(ChartError::DataFetch(_))));
    }

    #[test]
    fn test_read_dataset_json() {
        let path = std::env::temp_dir().join(format!("dashgraph-reader-{}.json", std::process::id()));
        std::fs::write(&path, r#"[{"mpg": 18, "origin": "usa"}, {"mpg": null, "origin": "japan"}]"#).unwrap();
        let data = read_dataset(path.to_str().unwrap()).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(data.len(), 2);
        let mpg = data.column("mpg").unwrap();
        assert_eq!(data.rows()[0].number(&mpg), Some(18.0));
        assert_eq!(data.rows()[1].number(&mpg), None);
    }
}
