//! Persistent scan log with backup-before-mutate.
//!
//! The live log is a CSV file (`barcode,timestamp`) that is re-read for every
//! operation and rewritten in full on every change. Before any change the current
//! file is copied into the backup directory as `scanned_barcodes_<YYYYMMDD_HHMMSS>.csv`,
//! so every earlier state can be restored. There is no locking: the last writer wins.

use crate::barcode::normalize;
use crate::error::{Result, StocktakeError};
use crate::models::{ScanEvent, ScanLog};
use crate::utils::time::{self, Clock, SystemClock, BACKUP_FORMAT};
use std::fs;
use std::path::{Path, PathBuf};

/// Header row of the persisted log
pub const LOG_HEADERS: [&str; 2] = ["barcode", "timestamp"];

const BACKUP_PREFIX: &str = "scanned_barcodes_";
const BACKUP_EXT: &str = ".csv";

/// File-backed scan log
#[derive(Debug, Clone)]
pub struct ScanLogStore<C: Clock = SystemClock> {
    log_path: PathBuf,
    backup_dir: PathBuf,
    clock: C,
}

impl ScanLogStore<SystemClock> {
    pub fn new(log_path: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(log_path, backup_dir, SystemClock)
    }
}

impl<C: Clock> ScanLogStore<C> {
    /// Store that takes scan timestamps and backup names from `clock`
    pub fn with_clock(log_path: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            log_path: log_path.into(),
            backup_dir: backup_dir.into(),
            clock,
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Read the persisted log. A missing file is an empty log.
    pub fn load(&self) -> Result<ScanLog> {
        if !self.log_path.exists() {
            log::debug!("No scan log at {}, starting empty", self.log_path.display());
            return Ok(ScanLog::new());
        }

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.log_path)?;

        let mut log = ScanLog::new();
        let mut repaired = 0;
        for result in rdr.deserialize() {
            let mut event: ScanEvent = result?;
            event.barcode = normalize(&event.barcode);
            if event.timestamp.is_empty() {
                repaired += 1;
            }
            log.push(event);
        }

        if repaired > 0 {
            log::warn!("{} scan log row(s) have no timestamp, defaulted to empty", repaired);
        }
        log::debug!("Loaded {} scan event(s) from {}", log.len(), self.log_path.display());
        Ok(log)
    }

    /// Overwrite the live log with `log`. Takes no backup.
    pub fn save(&self, log: &ScanLog) -> Result<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.log_path, encode(log)?)?;
        log::debug!("Saved {} scan event(s) to {}", log.len(), self.log_path.display());
        Ok(())
    }

    /// Record a scan of `barcode` (already normalized) at the current time
    pub fn append(&self, barcode: &str) -> Result<ScanEvent> {
        self.backup()?;
        let mut log = self.load()?;
        let event = ScanEvent::new(barcode, time::timestamp(&self.clock));
        log.push(event.clone());
        self.save(&log)?;
        log::info!("Scanned {} at {}", event.barcode, event.timestamp);
        Ok(event)
    }

    /// Drop the most recent scan. Returns false, without a backup, if the log is empty.
    pub fn undo(&self) -> Result<bool> {
        let mut log = self.load()?;
        if log.is_empty() {
            log::info!("Nothing to undo");
            return Ok(false);
        }

        self.backup()?;
        if let Some(event) = log.pop() {
            log::info!("Undid scan of {} at {}", event.barcode, event.timestamp);
        }
        self.save(&log)?;
        Ok(true)
    }

    /// Remove scans of `barcode`.
    ///
    /// With a `timestamp` only events with that exact timestamp go; without one every
    /// event for the barcode is removed. Returns the number of removed events.
    pub fn remove(&self, barcode: &str, timestamp: Option<&str>) -> Result<usize> {
        self.backup()?;
        let mut log = self.load()?;
        let removed = log.remove_matching(barcode, timestamp);
        self.save(&log)?;
        match timestamp {
            Some(ts) => log::info!("Removed {} scan(s) of {} at {}", removed, barcode, ts),
            None => log::info!("Removed all {} scan(s) of {}", removed, barcode),
        }
        Ok(removed)
    }

    /// Remove every scan
    pub fn clear(&self) -> Result<()> {
        self.backup()?;
        self.save(&ScanLog::new())?;
        log::info!("Cleared scan log");
        Ok(())
    }

    /// Copy the live log into a new backup file and return its path.
    ///
    /// Before the first scan there is no live file; the backup then holds the empty
    /// log (header row only).
    pub fn backup(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.backup_dir)?;
        let path = self.next_backup_path();

        if self.log_path.exists() {
            fs::copy(&self.log_path, &path)?;
        } else {
            fs::write(&path, encode(&ScanLog::new())?)?;
        }

        log::debug!("Backed up scan log to {}", path.display());
        Ok(path)
    }

    /// First free backup path for the current second (`_<n>` added on collision)
    fn next_backup_path(&self) -> PathBuf {
        let stamp = self.clock.now().format(BACKUP_FORMAT).to_string();
        let mut path = self.backup_dir.join(format!("{BACKUP_PREFIX}{stamp}{BACKUP_EXT}"));
        let mut n = 1;
        while path.exists() {
            path = self
                .backup_dir
                .join(format!("{BACKUP_PREFIX}{stamp}_{n}{BACKUP_EXT}"));
            n += 1;
        }
        path
    }

    /// Backup file names, newest first
    pub fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backup_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut backups: Vec<(BackupName, String)> = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)? {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if let Some(parsed) = BackupName::parse(name) {
                    backups.push((parsed, name.to_string()));
                }
            }
        }

        backups.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(backups.into_iter().map(|(_, name)| name).collect())
    }

    /// Overwrite the live log with the bytes of backup `name`.
    ///
    /// No backup of the current log is taken first.
    pub fn restore_backup(&self, name: &str) -> Result<()> {
        if BackupName::parse(name).is_none() {
            return Err(StocktakeError::Validation(format!(
                "'{name}' is not a scan log backup name"
            )));
        }

        let source = self.backup_dir.join(name);
        if !source.is_file() {
            return Err(StocktakeError::NotFound(source));
        }

        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&source, &self.log_path)?;
        log::info!("Restored scan log from backup {}", name);
        Ok(())
    }
}

/// Serialize a log to CSV bytes, header row always present
fn encode(log: &ScanLog) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(LOG_HEADERS)?;
    for event in log.events() {
        wtr.write_record([event.barcode.as_str(), event.timestamp.as_str()])?;
    }
    wtr.into_inner()
        .map_err(|e| StocktakeError::Io(e.into_error()))
}

/// Sort key parsed from a backup file name
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct BackupName {
    stamp: String,
    seq: u32,
}

impl BackupName {
    fn parse(name: &str) -> Option<Self> {
        if name.contains(|c| c == '/' || c == '\\') {
            return None;
        }
        let body = name.strip_prefix(BACKUP_PREFIX)?.strip_suffix(BACKUP_EXT)?;
        // YYYYMMDD_HHMMSS is 15 characters
        if body.len() < 15 || !body.is_char_boundary(15) {
            return None;
        }
        let (stamp, rest) = body.split_at(15);
        chrono::NaiveDateTime::parse_from_str(stamp, BACKUP_FORMAT).ok()?;
        let seq = match rest {
            "" => 0,
            _ => rest.strip_prefix('_')?.parse().ok()?,
        };
        Some(Self {
            stamp: stamp.to_string(),
            seq,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_name_parse() {
        let plain = BackupName::parse("scanned_barcodes_20261018_101500.csv").unwrap();
        assert_eq!(plain.seq, 0);
        let suffixed = BackupName::parse("scanned_barcodes_20261018_101500_12.csv").unwrap();
        assert_eq!(suffixed.seq, 12);
        assert!(suffixed > plain);
    }

    #[test]
    fn test_backup_name_rejects_foreign_names() {
        assert!(BackupName::parse("scanned_barcodes.csv").is_none());
        assert!(BackupName::parse("scanned_barcodes_2026_x.csv").is_none());
        assert!(BackupName::parse("../scanned_barcodes_20261018_101500.csv").is_none());
        assert!(BackupName::parse("scanned_barcodes_20261018_101500.txt").is_none());
        assert!(BackupName::parse("scanned_barcodes_20261018_101500-1.csv").is_none());
    }

    #[test]
    fn test_encode_empty_log_has_header() {
        let bytes = encode(&ScanLog::new()).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "barcode,timestamp\n");
    }
}
