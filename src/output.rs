//! Output formatting for aggregated score tables.
//!
//! Supports a fixed-width text table, CSV and JSON.

use anyhow::Result;
use csv::WriterBuilder;
use std::fmt::Write as _;
use std::io;
use tracing::debug;

use crate::scores::types::{DailyTentScore, ScoreTable, tent_numbers};

/// Shown under the text table.
pub const DUPLICATE_NOTE: &str =
    "When a tent received more than one score on a single day, the table shows that day's average.";

const DATE_HEADER: &str = "Date";
const CELL_WIDTH: usize = 5;

/// Formats one tent cell: one decimal place, `-` when absent or undefined.
pub fn format_cell(entries: &[DailyTentScore], tent: u8) -> String {
    match ScoreTable::tent_score(entries, tent) {
        Some(score) if score.is_finite() => format!("{score:.1}"),
        _ => "-".to_string(),
    }
}

/// Renders the table with a date column and one column per tent.
pub fn render_table(table: &ScoreTable) -> String {
    let date_width = table
        .rows()
        .map(|(label, _)| label.chars().count())
        .chain(std::iter::once(DATE_HEADER.len()))
        .max()
        .unwrap_or(DATE_HEADER.len());

    let mut output = String::new();

    let _ = write!(output, "{DATE_HEADER:<date_width$}");
    for tent in tent_numbers() {
        let _ = write!(output, " | {tent:>CELL_WIDTH$}");
    }
    let _ = writeln!(output);

    let _ = write!(output, "{}", "-".repeat(date_width));
    for _ in tent_numbers() {
        let _ = write!(output, "-+-{}", "-".repeat(CELL_WIDTH));
    }
    let _ = writeln!(output);

    for (label, entries) in table.rows() {
        let _ = write!(output, "{label:<date_width$}");
        for tent in tent_numbers() {
            let _ = write!(output, " | {:>CELL_WIDTH$}", format_cell(entries, tent));
        }
        let _ = writeln!(output);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "{DUPLICATE_NOTE}");

    output
}

/// Writes the table as CSV with a `date,1,...,10` header.
pub fn write_csv<W: io::Write>(table: &ScoreTable, writer: W) -> Result<()> {
    let mut csv = WriterBuilder::new().has_headers(false).from_writer(writer);

    let header: Vec<String> = std::iter::once("date".to_string())
        .chain(tent_numbers().map(|t| t.to_string()))
        .collect();
    csv.write_record(&header)?;

    for (label, entries) in table.rows() {
        let row: Vec<String> = std::iter::once(label.to_string())
            .chain(tent_numbers().map(|t| format_cell(entries, t)))
            .collect();
        csv.write_record(&row)?;
    }

    csv.flush()?;
    debug!(rows = table.day_count() + 1, "Wrote CSV table");
    Ok(())
}

/// Serializes the table as pretty JSON. Undefined averages become `null`.
pub fn to_json(table: &ScoreTable) -> Result<String> {
    Ok(serde_json::to_string_pretty(table)?)
}
