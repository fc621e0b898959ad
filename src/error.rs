use thiserror::Error;

/// Errors raised while loading data or constructing charts.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The dataset source could not be read or decoded.
    #[error("failed to load dataset: {0}")]
    DataFetch(String),

    /// A chart asked for a field the dataset does not have.
    #[error("dimension '{dimension}' not found (available: {})", available.join(", "))]
    Dimension {
        dimension: String,
        available: Vec<String>,
    },

    #[error("no surface mounted with id '{0}'")]
    UnknownSurface(String),

    #[error("render backend failed: {0}")]
    Render(String),

    #[error("script error on line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to write '{}': {source}", path.display())]
    Output {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for ChartError {
    fn from(err: csv::Error) -> Self {
        ChartError::DataFetch(err.to_string())
    }
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::DataFetch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
