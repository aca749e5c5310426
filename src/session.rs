//! A stocktake session: one inventory plus the scan log store.
//!
//! This is the surface a front end (the CLI here) talks to. The inventory is loaded
//! once and never changes; the scan log is read fresh from disk for every query.

use crate::barcode;
use crate::config::Config;
use crate::error::{Result, StocktakeError};
use crate::export::{self, ExportFormat, ExportKind};
use crate::inventory;
use crate::models::{MergedRecord, ScanEvent, ScanLog, StocktakeSummary};
use crate::reconcile;
use crate::scan_log::ScanLogStore;
use crate::table::Table;
use crate::utils::time::{Clock, SystemClock};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Result of an accepted scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub event: ScanEvent,
    /// How many times the barcode is now in the log (2+ means a re-scan)
    pub times_scanned: usize,
}

impl ScanOutcome {
    pub fn is_duplicate(&self) -> bool {
        self.times_scanned > 1
    }
}

pub struct Stocktake<C: Clock = SystemClock> {
    inventory_path: PathBuf,
    inventory: Table,
    inventory_barcodes: HashSet<String>,
    store: ScanLogStore<C>,
}

impl Stocktake<SystemClock> {
    /// Resolve and load the inventory named by `config` and open its scan log
    pub fn open(config: &Config) -> Result<Self> {
        let path = inventory::resolve_inventory(&config.inventory_dir, config.inventory_file.as_deref())?;
        let inventory = Self::load_inventory(&path)?;
        let store = ScanLogStore::new(config.scan_log_path(), config.backup_dir());
        Ok(Self::new(path, inventory, store))
    }
}

impl<C: Clock> Stocktake<C> {
    pub fn new(inventory_path: impl Into<PathBuf>, inventory: Table, store: ScanLogStore<C>) -> Self {
        let inventory_barcodes = reconcile::inventory_barcodes(&inventory);
        Self {
            inventory_path: inventory_path.into(),
            inventory,
            inventory_barcodes,
            store,
        }
    }

    /// Read an inventory table from `path`
    pub fn load_inventory(path: &Path) -> Result<Table> {
        inventory::load(path)
    }

    pub fn inventory(&self) -> &Table {
        &self.inventory
    }

    pub fn inventory_path(&self) -> &Path {
        &self.inventory_path
    }

    pub fn load_scan_log(&self) -> Result<ScanLog> {
        self.store.load()
    }

    /// Validate and record a raw scan.
    ///
    /// Empty input and barcodes not in the inventory are rejected with
    /// [`StocktakeError::Validation`] and leave the log untouched. Re-scans are
    /// accepted; the outcome reports how often the barcode has now been scanned.
    pub fn append_scan(&self, raw: &str) -> Result<ScanOutcome> {
        let cleaned = barcode::normalize(raw);
        if cleaned.is_empty() {
            return Err(StocktakeError::Validation(
                "Please scan or enter a barcode.".to_string(),
            ));
        }
        if !self.inventory_barcodes.contains(&cleaned) {
            return Err(StocktakeError::Validation(format!(
                "Barcode {cleaned} not found in inventory."
            )));
        }

        let event = self.store.append(&cleaned)?;
        let times_scanned = self.store.load()?.count_of(&cleaned);
        if times_scanned > 1 {
            log::warn!("Barcode {} scanned {} times", cleaned, times_scanned);
        }
        Ok(ScanOutcome {
            event,
            times_scanned,
        })
    }

    /// Drop the most recent scan; false if there was nothing to undo
    pub fn undo_last(&self) -> Result<bool> {
        self.store.undo()
    }

    /// Remove scans of `barcode`: one timestamp, or all of them when none is given
    pub fn remove_scan(&self, barcode: &str, timestamp: Option<&str>) -> Result<usize> {
        self.store.remove(&barcode::normalize(barcode), timestamp)
    }

    pub fn clear_log(&self) -> Result<()> {
        self.store.clear()
    }

    /// Scans joined with inventory, most recent first, optionally filtered
    pub fn merged_view(&self, search: Option<&str>) -> Result<Vec<MergedRecord>> {
        let log = self.store.load()?;
        Ok(reconcile::merged_view(&self.inventory, &log, search))
    }

    /// Merged view as an export-ready table
    pub fn scanned_table(&self, search: Option<&str>) -> Result<Table> {
        let records = self.merged_view(search)?;
        Ok(reconcile::merged_table(&self.inventory, &records))
    }

    /// Inventory rows not scanned yet
    pub fn missing_view(&self) -> Result<Table> {
        let log = self.store.load()?;
        Ok(reconcile::missing(&self.inventory, &log))
    }

    pub fn duplicates(&self) -> Result<HashSet<String>> {
        Ok(reconcile::duplicates(&self.store.load()?))
    }

    pub fn summary(&self) -> Result<StocktakeSummary> {
        let log = self.store.load()?;
        Ok(reconcile::summary(&self.inventory, &log))
    }

    pub fn list_backups(&self) -> Result<Vec<String>> {
        self.store.list_backups()
    }

    pub fn restore_backup(&self, name: &str) -> Result<()> {
        self.store.restore_backup(name)
    }

    /// Table for `kind`: the scanned export or the missing rows
    pub fn export_table(&self, kind: ExportKind) -> Result<Table> {
        match kind {
            ExportKind::Scanned => self.scanned_table(None),
            ExportKind::Missing => self.missing_view(),
        }
    }

    /// Write the `kind` table to `path`
    pub fn export(&self, kind: ExportKind, format: ExportFormat, path: &Path) -> Result<usize> {
        let table = self.export_table(kind)?;
        export::write_table(&table, path, format)?;
        Ok(table.len())
    }
}
