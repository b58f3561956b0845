//! CSV-export source for DST ranges.
//!
//! Reads a directory holding one `<range>.csv` per named range, as produced
//! by a per-tab spreadsheet export. Export tools disagree on encoding, so
//! bytes are auto-detected and decoded before parsing.

use std::path::{Path, PathBuf};

use super::records_from_grid;
use crate::error::{SheetError, SheetResult};
use crate::models::RawRecord;

/// Source reading `<dir>/<range>.csv` files.
#[derive(Debug, Clone)]
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Fetch a named range from its export file. A missing file yields an
    /// empty list (the tab was not exported), matching the Sheets client's
    /// empty-range behavior.
    pub async fn fetch(&self, range: &str) -> SheetResult<Vec<RawRecord>> {
        let path = self.dir.join(format!("{}.csv", range));
        if !path.exists() {
            return Ok(Vec::new());
        }
        parse_csv_file(&path)
    }
}

/// Detect the encoding of raw bytes using chardet, normalizing charset names.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the detected encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> SheetResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string()),
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.to_string()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        _ => String::from_utf8_lossy(bytes).to_string(),
    };
    Ok(decoded)
}

/// Parse a CSV export file with encoding auto-detection.
pub fn parse_csv_file(path: &Path) -> SheetResult<Vec<RawRecord>> {
    let bytes = std::fs::read(path)?;
    parse_csv_bytes(&bytes)
}

/// Parse CSV bytes with encoding auto-detection.
pub fn parse_csv_bytes(bytes: &[u8]) -> SheetResult<Vec<RawRecord>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    parse_csv_str(&content)
}

/// Parse decoded CSV content into records.
fn parse_csv_str(content: &str) -> SheetResult<Vec<RawRecord>> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut grid: Vec<Vec<String>> = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| SheetError::CsvError(e.to_string()))?;
        grid.push(row.iter().map(|cell| cell.trim().to_string()).collect());
    }

    Ok(records_from_grid(&grid))
}
