//! In-memory string table used for inventory data and exports.

/// Cell values that stand for "no value" in spreadsheet exports
const NAN_MARKERS: [&str; 2] = ["nan", "NaN"];

/// Rectangular table of string cells with an ordered header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given headers
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded, long rows truncated, NaN markers blanked.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        if row.len() > self.headers.len() {
            log::warn!(
                "Row {} has {} cells but only {} columns, dropping the extra cells",
                self.rows.len() + 1,
                row.len(),
                self.headers.len()
            );
        }
        row.resize(self.headers.len(), String::new());
        for cell in row.iter_mut() {
            if NAN_MARKERS.contains(&cell.as_str()) {
                cell.clear();
            }
        }
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact header name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at (row, column name), if both exist
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }

    /// Values of one column, top to bottom
    pub fn column_values<'a>(&'a self, column: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let col = self.column_index(column)?;
        Some(self.rows.iter().map(move |r| r[col].as_str()))
    }

    /// New table with the same headers holding only the rows accepted by `keep`
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[String]) -> bool,
    {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}
