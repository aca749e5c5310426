use crate::models::StocktakeSummary;
use crate::table::Table;

/// Widest a column is allowed to get in terminal output
const MAX_COLUMN_WIDTH: usize = 24;

/// Render a table as aligned plain text, one line per row
pub fn format_table(table: &Table) -> String {
    if table.is_empty() {
        return "(no rows)\n".to_string();
    }

    let widths: Vec<usize> = table
        .headers()
        .iter()
        .enumerate()
        .map(|(i, header)| {
            table
                .rows()
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let mut output = String::new();
    push_line(&mut output, table.headers(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut output, &rule, &widths);
    for row in table.rows() {
        push_line(&mut output, row, &widths);
    }
    output
}

fn push_line(output: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", truncate(cell, *width), width = *width))
        .collect();
    output.push_str(line.join("  ").trim_end());
    output.push('\n');
}

fn truncate(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        cell.to_string()
    } else {
        let mut cut: String = cell.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

pub fn format_summary(summary: &StocktakeSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!("Inventory rows:      {}\n", summary.inventory_rows));
    output.push_str(&format!("Scan events:         {}\n", summary.scan_events));
    output.push_str(&format!("Distinct scanned:    {}\n", summary.distinct_scanned));
    output.push_str(&format!("Matched rows:        {}\n", summary.matched_rows));
    output.push_str(&format!("Missing rows:        {}\n", summary.missing_rows));
    output.push_str(&format!("Duplicate barcodes:  {}\n", summary.duplicate_barcodes));
    output
}
