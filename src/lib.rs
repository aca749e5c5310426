//! Stocktake - barcode scanning against an inventory export
//!
//! Loads a product table (CSV or XLSX), records scanned barcodes in a CSV scan log
//! with a backup taken before every change, and reconciles the log against the
//! inventory to show what was scanned, what was scanned twice and what is missing.

pub mod barcode;
pub mod config;
pub mod error;
pub mod export;
pub mod formatters;
pub mod inventory;
pub mod models;
pub mod reconcile;
pub mod scan_log;
pub mod session;
pub mod table;
pub mod utils;

// Re-export commonly used items
pub use barcode::normalize;
pub use config::Config;
pub use error::{Result, StocktakeError};
pub use export::{ExportFormat, ExportKind};
pub use models::{MergedRecord, ScanEvent, ScanLog, StocktakeSummary};
pub use scan_log::ScanLogStore;
pub use session::{ScanOutcome, Stocktake};
pub use table::Table;
