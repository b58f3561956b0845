//! DST sheet sources.
//!
//! The DST sheet supplies entity definitions via named ranges. Two sources
//! are supported:
//!
//! - [`google::GoogleSheetClient`] - the Google Sheets values REST API
//! - [`csv::CsvDirSource`] - a directory of per-range CSV exports
//!
//! Both yield ordered sequences of [`RawRecord`]; the first row of a range
//! is the header row. The rest of the pipeline only consumes the records and
//! does not care where they came from.

pub mod csv;
pub mod google;

use crate::models::RawRecord;

/// Named range holding bundle (block type) definitions.
pub const BUNDLES: &str = "bundles";

/// Named range holding field definitions for all bundles.
pub const FIELDS: &str = "fields";

/// Named range holding menu definitions.
pub const MENUS: &str = "menus";

/// Named range holding user role definitions.
pub const USER_ROLES: &str = "user_roles";

/// Build records from a value grid: first row is the header row, remaining
/// rows become [`RawRecord`]s. Fully empty rows are skipped.
pub fn records_from_grid(grid: &[Vec<String>]) -> Vec<RawRecord> {
    let Some((headers, rows)) = grid.split_first() else {
        return Vec::new();
    };

    rows.iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| RawRecord::from_row(headers, row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect()
    }

    #[test]
    fn test_records_from_grid() {
        let grid = grid(&[
            &["Name", "Machine Name", "Description"],
            &["Hero Block", "hero_block", "Homepage hero"],
            &["", "", ""],
            &["Card", "card", ""],
        ]);
        let records = records_from_grid(&grid);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("machine_name"), Some("hero_block"));
        assert_eq!(records[1].get("name"), Some("Card"));
        assert_eq!(records[1].get_non_empty("description"), None);
    }

    #[test]
    fn test_empty_grid() {
        assert!(records_from_grid(&[]).is_empty());
        // Header only: no data rows.
        let header_only = grid(&[&["name", "machine_name"]]);
        assert!(records_from_grid(&header_only).is_empty());
    }
}
