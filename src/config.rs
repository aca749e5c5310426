//! Paths used by a stocktake session.

use std::path::PathBuf;

/// File name of the live scan log inside the data directory
pub const SCAN_LOG_FILE: &str = "scanned_barcodes.csv";
/// Backup folder inside the data directory
pub const BACKUP_DIR: &str = "backups";
/// Inventory folder used when none is given
pub const DEFAULT_INVENTORY_DIR: &str = "Inventory";

/// Where the inventory is read from and where scan data is kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Folder holding the inventory export(s)
    pub inventory_dir: PathBuf,
    /// Inventory file name within `inventory_dir`; required when several exist
    pub inventory_file: Option<String>,
    /// Folder holding the scan log and its backups
    pub data_dir: PathBuf,
}

impl Config {
    pub fn scan_log_path(&self) -> PathBuf {
        self.data_dir.join(SCAN_LOG_FILE)
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.data_dir.join(BACKUP_DIR)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inventory_dir: PathBuf::from(DEFAULT_INVENTORY_DIR),
            inventory_file: None,
            data_dir: default_data_dir(),
        }
    }
}

/// Returns the default data directory: ~/.local/share/stocktake
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stocktake")
}
