use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinsortError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("CSV is missing required column: '{0}'")]
    MissingColumn(String),

    #[error("Invalid rule table: {0}")]
    Rules(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FinsortError>;
