//! Error type shared by every core operation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid grade {0}: expected 0 (Again), 1 (Hard), 2 (Good) or 3 (Easy)")]
    InvalidGrade(i64),

    #[error("Unknown frame id: {0}")]
    UnknownFrame(i64),

    #[error("Unknown course: {0}")]
    UnknownCourse(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("A question needs at least one option, got {0}")]
    InvalidOptionCount(usize),

    #[error("Unsupported file format: .{0}")]
    UnsupportedFileType(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Excel(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(feature = "python")]
impl From<CoreError> for pyo3::PyErr {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidGrade(_)
            | CoreError::UnknownFrame(_)
            | CoreError::UnknownCourse(_)
            | CoreError::InvalidCatalog(_)
            | CoreError::InvalidOptionCount(_) => {
                pyo3::exceptions::PyValueError::new_err(err.to_string())
            }
            other => pyo3::exceptions::PyRuntimeError::new_err(other.to_string()),
        }
    }
}
