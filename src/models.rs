use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One accepted scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub barcode: String,
    /// `YYYY-MM-DD HH:MM:SS`; empty for legacy rows written without one
    #[serde(default)]
    pub timestamp: String,
}

impl ScanEvent {
    pub fn new(barcode: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            timestamp: timestamp.into(),
        }
    }

    /// True if this event matches `barcode` and, when given, `timestamp`
    pub fn matches(&self, barcode: &str, timestamp: Option<&str>) -> bool {
        self.barcode == barcode && timestamp.map_or(true, |ts| self.timestamp == ts)
    }
}

/// Scan events in append order (oldest first)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanLog {
    events: Vec<ScanEvent>,
}

impl ScanLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ScanEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn push(&mut self, event: ScanEvent) {
        self.events.push(event);
    }

    /// Drop the most recently appended event
    pub fn pop(&mut self) -> Option<ScanEvent> {
        self.events.pop()
    }

    /// Remove every event matching `barcode` (and `timestamp` if given).
    /// Returns how many were removed.
    pub fn remove_matching(&mut self, barcode: &str, timestamp: Option<&str>) -> usize {
        let before = self.events.len();
        self.events.retain(|e| !e.matches(barcode, timestamp));
        before - self.events.len()
    }

    /// Events most recent first
    pub fn iter_recent_first(&self) -> impl Iterator<Item = &ScanEvent> {
        self.events.iter().rev()
    }

    /// Number of events recorded for `barcode`
    pub fn count_of(&self, barcode: &str) -> usize {
        self.events.iter().filter(|e| e.barcode == barcode).count()
    }
}

impl FromIterator<ScanEvent> for ScanLog {
    fn from_iter<I: IntoIterator<Item = ScanEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

/// One row of the merged view: a scan joined with its inventory record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedRecord {
    pub barcode: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Duplicate")]
    pub duplicate: bool,
    /// Inventory display columns; blank when the barcode is not in the inventory
    pub fields: BTreeMap<String, String>,
    /// False when no inventory row matched this scan
    #[serde(skip)]
    pub matched: bool,
}

impl MergedRecord {
    /// `True` / `False`, the way the flag is rendered in views and exports
    pub fn duplicate_label(&self) -> &'static str {
        if self.duplicate {
            "True"
        } else {
            "False"
        }
    }

    /// Inventory field by column name (empty when absent)
    pub fn field(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }
}

/// Counts describing the current stocktake state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StocktakeSummary {
    pub inventory_rows: usize,
    pub scan_events: usize,
    pub distinct_scanned: usize,
    pub matched_rows: usize,
    pub missing_rows: usize,
    pub duplicate_barcodes: usize,
}
