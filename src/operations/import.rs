use crate::models::sales::Row;
use std::fs;
use std::path::Path;
use tracing::debug;

pub const DELIMITER: u8 = b';';

/// Reads the raw bytes of an uploaded file.
pub fn read_upload(path: &Path) -> Result<Vec<u8>, String> {
    fs::read(path).map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))
}

/// Splits an uploaded file into rows of fields. Rows are allowed to have
/// different field counts; the header is returned like any other row.
pub fn read_csv(bytes: &[u8]) -> Result<Vec<Row>, String> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| format!("The CSV file is not valid UTF-8: {}", e))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (line_index, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| format!("CSV parse error on line {}: {}", line_index + 1, e))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    if rows.is_empty() {
        return Err("The CSV file is empty.".to_string());
    }

    debug!(rows = rows.len(), "parsed csv");
    Ok(rows)
}
