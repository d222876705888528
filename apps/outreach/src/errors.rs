use std::path::PathBuf;

use thiserror::Error;

/// Application-level error type for the CLI stages (file I/O and input data).
/// Per-company generation failures never become an `AppError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid input in {path}, row {row}: {message}")]
    Input {
        path: PathBuf,
        row: usize,
        message: String,
    },

    #[error("No scraped company data found in {0}. Run `outreach scrape` first.")]
    NoScrapedData(PathBuf),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        AppError::Csv {
            path: path.into(),
            source,
        }
    }
}
