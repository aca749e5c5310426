//! Reconciliation of the scan log against the inventory.
//!
//! Everything here is a pure function of an inventory table and a scan log snapshot.

use crate::barcode::normalize;
use crate::inventory::{display_columns, BARCODE_COLUMN};
use crate::models::{MergedRecord, ScanLog, StocktakeSummary};
use crate::table::Table;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Distinct barcodes present in the log
pub fn scanned_set(log: &ScanLog) -> HashSet<String> {
    log.events().iter().map(|e| e.barcode.clone()).collect()
}

/// Barcodes scanned two or more times
pub fn duplicates(log: &ScanLog) -> HashSet<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for event in log.events() {
        *counts.entry(event.barcode.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(barcode, _)| barcode.to_string())
        .collect()
}

/// Inventory rows whose barcode has not been scanned
pub fn missing(inventory: &Table, log: &ScanLog) -> Table {
    let scanned = scanned_set(log);
    partition_rows(inventory, |barcode| !scanned.contains(barcode))
}

/// Inventory rows whose barcode has been scanned at least once
pub fn scanned_rows(inventory: &Table, log: &ScanLog) -> Table {
    let scanned = scanned_set(log);
    partition_rows(inventory, |barcode| scanned.contains(barcode))
}

fn partition_rows<F>(inventory: &Table, keep: F) -> Table
where
    F: Fn(&str) -> bool,
{
    match inventory.column_index(BARCODE_COLUMN) {
        Some(col) => inventory.filter_rows(|row| keep(&normalize(&row[col]))),
        None => inventory.filter_rows(|_| false),
    }
}

/// Normalized barcode -> row index of its first occurrence in the inventory
fn barcode_index(inventory: &Table) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    if let Some(values) = inventory.column_values(BARCODE_COLUMN) {
        for (row, value) in values.enumerate() {
            index.entry(normalize(value)).or_insert(row);
        }
    }
    index
}

/// Set of normalized inventory barcodes
pub fn inventory_barcodes(inventory: &Table) -> HashSet<String> {
    barcode_index(inventory).into_keys().collect()
}

/// Scans joined with their inventory rows, most recent scan first.
///
/// Scans without an inventory match are kept with blank product fields. With a
/// non-empty `search`, only rows where some column (including `Timestamp` and
/// `Duplicate`) contains the text, case-insensitively, are returned.
pub fn merged_view(inventory: &Table, log: &ScanLog, search: Option<&str>) -> Vec<MergedRecord> {
    let index = barcode_index(inventory);
    let dupes = duplicates(log);
    let columns = display_columns(inventory);

    let needle = search.filter(|s| !s.is_empty()).map(str::to_lowercase);

    log.iter_recent_first()
        .map(|event| {
            let row = index.get(&event.barcode).copied();
            let fields: BTreeMap<String, String> = columns
                .iter()
                .map(|col| {
                    let value = row
                        .and_then(|r| inventory.cell(r, col))
                        .unwrap_or("")
                        .to_string();
                    (col.to_string(), value)
                })
                .collect();

            MergedRecord {
                barcode: event.barcode.clone(),
                timestamp: event.timestamp.clone(),
                duplicate: dupes.contains(&event.barcode),
                fields,
                matched: row.is_some(),
            }
        })
        .filter(|record| needle.as_deref().map_or(true, |n| record_matches(record, n)))
        .collect()
}

fn record_matches(record: &MergedRecord, needle: &str) -> bool {
    std::iter::once(record.barcode.as_str())
        .chain(std::iter::once(record.timestamp.as_str()))
        .chain(std::iter::once(record.duplicate_label()))
        .chain(record.fields.values().map(String::as_str))
        .any(|value| value.to_lowercase().contains(needle))
}

/// Merged view laid out as a table for display and export:
/// `barcode, Timestamp, Duplicate, <inventory display columns>`
pub fn merged_table(inventory: &Table, records: &[MergedRecord]) -> Table {
    let columns = display_columns(inventory);
    let mut headers = vec![
        "barcode".to_string(),
        "Timestamp".to_string(),
        "Duplicate".to_string(),
    ];
    headers.extend(columns.iter().map(|c| c.to_string()));

    let mut table = Table::new(headers);
    for record in records {
        let mut row = vec![
            record.barcode.clone(),
            record.timestamp.clone(),
            record.duplicate_label().to_string(),
        ];
        row.extend(columns.iter().map(|c| record.field(c).to_string()));
        table.push_row(row);
    }
    table
}

/// Counts for the current inventory and log
pub fn summary(inventory: &Table, log: &ScanLog) -> StocktakeSummary {
    let matched_rows = scanned_rows(inventory, log).len();
    StocktakeSummary {
        inventory_rows: inventory.len(),
        scan_events: log.len(),
        distinct_scanned: scanned_set(log).len(),
        matched_rows,
        missing_rows: inventory.len() - matched_rows,
        duplicate_barcodes: duplicates(log).len(),
    }
}
