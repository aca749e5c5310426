//! Inventory loading.
//!
//! The inventory is a product table exported from the shop system as CSV or XLSX.
//! Every cell is read as a string so barcode comparison and display behave the same
//! regardless of how the spreadsheet typed the column.

use crate::error::{Result, StocktakeError};
use crate::table::Table;
use crate::utils::path_exists;
use calamine::{open_workbook_auto, Data, DataType, Reader};
use std::path::{Path, PathBuf};

/// Column holding the product barcode
pub const BARCODE_COLUMN: &str = "BARCODE";

/// Columns shown in views and exports, in display order
pub const DISPLAY_COLUMNS: [&str; 23] = [
    "BARCODE",
    "LOCATION",
    "FRAMENUM",
    "MANUFACT",
    "MODEL",
    "SIZE",
    "FCOLOUR",
    "FRAMETYPE",
    "F GROUP",
    "SUPPLIER",
    "QUANTITY",
    "F TYPE",
    "TEMPLE",
    "DEPTH",
    "DIAG",
    "BASECURVE",
    "RRP",
    "EXCOSTPR",
    "COST PRICE",
    "TAXPC",
    "FRSTATUS",
    "AVAILFROM",
    "NOTE",
];

/// Supported inventory file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryFormat {
    Csv,
    Xlsx,
}

impl InventoryFormat {
    /// Detect the format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(InventoryFormat::Csv),
            "xlsx" => Some(InventoryFormat::Xlsx),
            _ => None,
        }
    }
}

/// Load an inventory table, requiring a `BARCODE` column
pub fn load<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    if !path_exists(path) {
        return Err(StocktakeError::NotFound(path.to_path_buf()));
    }

    let format = InventoryFormat::from_path(path)
        .ok_or_else(|| StocktakeError::UnsupportedFormat(path.to_path_buf()))?;

    let table = match format {
        InventoryFormat::Csv => read_csv_table(path)?,
        InventoryFormat::Xlsx => read_xlsx_table(path)?,
    };

    if !table.has_column(BARCODE_COLUMN) {
        return Err(StocktakeError::Schema(BARCODE_COLUMN.to_string()));
    }

    log::info!(
        "Loaded inventory {} ({} rows, {} columns)",
        path.display(),
        table.len(),
        table.headers().len()
    );
    Ok(table)
}

fn read_csv_table(path: &Path) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)?;

    let headers = rdr.headers()?.iter().map(str::to_string).collect();
    let mut table = Table::new(headers);

    for result in rdr.records() {
        let record = result?;
        table.push_row(record.iter().map(str::to_string).collect());
    }

    Ok(table)
}

fn read_xlsx_table(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(Table::default()),
    };

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|c| cell_to_string(c).trim().to_string())
            .collect(),
        None => return Ok(Table::default()),
    };

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(cell_to_string).collect());
    }
    Ok(table)
}

/// String form of a spreadsheet cell
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => (if *b { "True" } else { "False" }).to_string(),
        Data::DateTime(_) => match cell.as_datetime() {
            Some(dt) if dt.time() == chrono::NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => cell.to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

/// Display columns present in `table`, in display order
pub fn display_columns(table: &Table) -> Vec<&'static str> {
    DISPLAY_COLUMNS
        .iter()
        .copied()
        .filter(|c| table.has_column(c))
        .collect()
}

/// Names of the inventory files (`.csv` / `.xlsx`) in `folder`, sorted
pub fn list_inventory_files<P: AsRef<Path>>(folder: P) -> Result<Vec<String>> {
    let folder = folder.as_ref();
    if !folder.is_dir() {
        return Err(StocktakeError::NotFound(folder.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && InventoryFormat::from_path(&path).is_some() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push(name.to_string());
            }
        }
    }
    files.sort();
    log::debug!("Found {} inventory file(s) in {}", files.len(), folder.display());
    Ok(files)
}

/// Pick the inventory file to use from `folder`.
///
/// With an explicit `selection` that file is used. Without one, the folder must
/// contain exactly one candidate.
pub fn resolve_inventory<P: AsRef<Path>>(folder: P, selection: Option<&str>) -> Result<PathBuf> {
    let folder = folder.as_ref();
    if let Some(name) = selection {
        return Ok(folder.join(name));
    }

    let files = list_inventory_files(folder)?;
    match files.as_slice() {
        [] => Err(StocktakeError::NotFound(folder.to_path_buf())),
        [only] => Ok(folder.join(only)),
        many => Err(StocktakeError::Config(format!(
            "several inventory files found, select one with --inventory: {}",
            many.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(InventoryFormat::from_path(Path::new("a.CSV")), Some(InventoryFormat::Csv));
        assert_eq!(InventoryFormat::from_path(Path::new("a.xlsx")), Some(InventoryFormat::Xlsx));
        assert_eq!(InventoryFormat::from_path(Path::new("a.xls")), None);
        assert_eq!(InventoryFormat::from_path(Path::new("inventory")), None);
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Float(4001.0)), "4001");
        assert_eq!(cell_to_string(&Data::Float(12.5)), "12.5");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Bool(true)), "True");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String(" Ray-Ban ".into())), " Ray-Ban ");
    }

    #[test]
    fn test_display_columns_preserve_order() {
        let table = Table::new(vec!["NOTE".into(), "EXTRA".into(), "BARCODE".into(), "MODEL".into()]);
        assert_eq!(display_columns(&table), vec!["BARCODE", "MODEL", "NOTE"]);
    }
}
