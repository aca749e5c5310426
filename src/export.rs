//! CSV and XLSX export of scanned and missing tables.

use crate::error::{Result, StocktakeError};
use crate::table::Table;
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

/// Which table is exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportKind {
    Scanned,
    Missing,
}

impl ExportKind {
    /// Default download name, e.g. `stocktake_scanned.csv`
    pub fn default_file_name(&self, format: ExportFormat) -> String {
        let stem = match self {
            ExportKind::Scanned => "stocktake_scanned",
            ExportKind::Missing => "stocktake_missing",
        };
        format!("{}.{}", stem, format.extension())
    }
}

/// UTF-8, comma separated, header row first
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(table.headers())?;
    for row in table.rows() {
        wtr.write_record(row)?;
    }
    wtr.into_inner()
        .map_err(|e| StocktakeError::Io(e.into_error()))
}

/// Single-sheet workbook with a header row; all cells written as text
pub fn to_xlsx_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in table.headers().iter().enumerate() {
        worksheet.write_string(0, col as u16, header)?;
    }
    for (row_idx, row) in table.rows().iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(row_idx as u32 + 1, col as u16, value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Serialize `table` in `format`
pub fn to_bytes(table: &Table, format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => to_csv_bytes(table),
        ExportFormat::Xlsx => to_xlsx_bytes(table),
    }
}

/// Write `table` to `path` in `format`
pub fn write_table<P: AsRef<Path>>(table: &Table, path: P, format: ExportFormat) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_bytes(table, format)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    log::info!("Exported {} row(s) to {}", table.len(), path.display());
    Ok(())
}
