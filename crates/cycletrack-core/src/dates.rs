//! Text formats for dates.
//!
//! Dates are read day-first (`dd/mm/yyyy`), the layout used by the
//! spreadsheet the history is exported to, with ISO `yyyy-mm-dd` also
//! accepted. The sheet format is a `Date` header followed by one date per
//! line.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::history::History;

/// Format written to sheet exports.
pub const SHEET_FORMAT: &str = "%d/%m/%Y";
/// Header line of sheet exports.
pub const SHEET_HEADER: &str = "Date";

const ACCEPTED_FORMATS: [&str; 3] = ["%Y-%m-%d", SHEET_FORMAT, "%d-%m-%Y"];

/// Parse a single date, day-first.
///
/// # Errors
/// Returns [`ValidationError::InvalidDate`] when no accepted format matches.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| ValidationError::InvalidDate {
            input: input.to_string(),
        })
}

/// `05 Mar`
pub fn format_short(date: NaiveDate) -> String {
    date.format("%d %b").to_string()
}

/// Render a history in sheet format, oldest first.
pub fn export_sheet(history: &History) -> String {
    let mut out = String::from(SHEET_HEADER);
    out.push('\n');
    for date in history.as_slice() {
        out.push_str(&date.format(SHEET_FORMAT).to_string());
        out.push('\n');
    }
    out
}

/// Result of reading a sheet export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetImport {
    pub dates: Vec<NaiveDate>,
    /// Rows that were not blank and could not be parsed
    pub skipped: Vec<String>,
}

/// Read sheet text.
///
/// The header line is optional, blank lines are ignored, and rows that do
/// not parse are collected in [`SheetImport::skipped`] instead of failing
/// the whole import. Only the first comma-separated column is read.
pub fn import_sheet(text: &str) -> SheetImport {
    let mut dates = Vec::new();
    let mut skipped = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let cell = line.split(',').next().unwrap_or("").trim();
        if cell.is_empty() {
            continue;
        }
        if idx == 0 && cell.eq_ignore_ascii_case(SHEET_HEADER) {
            continue;
        }
        match parse_date(cell) {
            Ok(date) => dates.push(date),
            Err(_) => skipped.push(cell.to_string()),
        }
    }

    SheetImport { dates, skipped }
}
