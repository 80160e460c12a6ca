//! Delimited text reading with delimiter auto-detection.
//!
//! Timing exports arrive as either semicolon- or comma-separated text. The
//! semicolon variant is tried first; if the header row yields one field or
//! fewer under `;`, the table is re-read with `,`. The reader works over the
//! in-memory string only — no file access happens in the engine.

use tracing::warn;

use super::RawTable;

/// Detect the field delimiter from the header line.
fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    if header.split(';').count() > 1 { b';' } else { b',' }
}

/// Read delimited text into a [`RawTable`].
///
/// Rows shorter or longer than the header are accepted as-is; missing cells
/// read as empty during parsing. Rows the CSV layer cannot decode at all
/// (broken quoting) are skipped with a warning — cell-level noise is the
/// parser's job, not this reader's.
pub fn read_delimited(text: &str) -> RawTable {
    let delimiter = detect_delimiter(text);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map(|h| h.iter().map(|f| f.trim().to_string()).collect())
        .unwrap_or_default();

    let mut rows = Vec::new();
    for record in reader.records() {
        match record {
            Ok(record) => rows.push(record.iter().map(|f| f.to_string()).collect()),
            Err(error) => warn!(%error, "skipping undecodable delimited row"),
        }
    }

    RawTable { columns, rows }
}
