// src/error.rs

use std::path::PathBuf;

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

/// Failures the pipeline distinguishes. Each variant is scoped to one unit
/// of work (a request, a season, a table) and never aborts a batch on its own.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Every configured mirror failed for one request.
    #[error("all mirrors failed for {path}: {last_error}")]
    UpstreamUnavailable { path: String, last_error: String },

    /// The schedule listing for a season came back empty.
    #[error("no rounds returned for season {0}")]
    NoRoundsFound(u32),

    /// Two year files of the same table disagree on their header line.
    #[error(
        "header mismatch while combining {table}\n  - {first_file}: {first_header}\n  - {other_file}: {other_header}"
    )]
    HeaderMismatch {
        table: String,
        first_file: String,
        first_header: String,
        other_file: String,
        other_header: String,
    },

    /// None of the accepted aliases for a logical column exist in a table.
    #[error("no column matching any of [{}]; found: {}", wanted.join(", "), found_list(found))]
    MissingRequiredColumn { wanted: Vec<String>, found: Vec<String> },

    #[error("directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

fn found_list(found: &[String]) -> String {
    if found.is_empty() {
        "(none)".to_string()
    } else {
        found.join(", ")
    }
}

/// Attach the offending path to an `std::io::Error`.
pub(crate) trait IoContext<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| PipelineError::Io {
            path: path.into(),
            source,
        })
    }
}
