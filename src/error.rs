//! Error types for stocktake

use std::path::PathBuf;

/// Unified error type for stocktake operations
#[derive(Debug, thiserror::Error)]
pub enum StocktakeError {
    /// Inventory file or folder does not exist
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),
    /// File extension is not one of the supported tabular formats
    #[error("Unsupported inventory file type: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    /// Required column missing from the inventory table
    #[error("No {0} column found in the inventory file")]
    Schema(String),
    /// Rejected user input (empty scan, unknown barcode, bad backup name)
    #[error("{0}")]
    Validation(String),
    /// Invalid or ambiguous configuration
    #[error("Configuration error: {0}")]
    Config(String),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to read or write CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Failed to read a spreadsheet
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    /// Failed to write a spreadsheet
    #[error("Export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
    /// Failed to serialize JSON output
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StocktakeError {
    /// Validation errors are local to one scan; everything else halts the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StocktakeError::Validation(_))
    }
}

/// Result alias for stocktake operations
pub type Result<T> = std::result::Result<T, StocktakeError>;
