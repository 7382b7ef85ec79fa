//! mdmatch Error Types
//!
//! Centralized error handling for the reconciliation pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Central error type for mdmatch
#[derive(Error, Debug)]
pub enum MdMatchError {
    #[error("Table read error: {0}")]
    TableRead(String),

    #[error("Table decode error: {0}")]
    TableDecode(String),

    #[error("Title column error: {0}")]
    TitleColumn(String),

    #[error("Source directory does not exist: {}", .0.display())]
    SourceDirMissing(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for mdmatch operations
pub type MdResult<T> = Result<T, MdMatchError>;

impl MdMatchError {
    /// True for failures raised while loading the input table
    pub fn is_table_failure(&self) -> bool {
        matches!(
            self,
            MdMatchError::TableRead(_)
                | MdMatchError::TableDecode(_)
                | MdMatchError::TitleColumn(_)
                | MdMatchError::Csv(_)
        )
    }
}
