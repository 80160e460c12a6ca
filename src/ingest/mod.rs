//! Input normalization: delimited text and embedded containers → canonical
//! [`ParsedLap`](crate::types::ParsedLap) records.
//!
//! Both input paths funnel through the same three steps:
//! 1. shape the source into a [`RawTable`] of string cells
//! 2. resolve its header row against the canonical schema
//!    ([`columns::ColumnMap`]), detecting the source dialect
//! 3. parse each row tolerantly, keeping every row that carries a time
//!    signal ([`parser::parse_rows`])
//!
//! Only two things can fail hard here: unresolvable required columns and a
//! dataset with zero retained rows. Everything else degrades per-field.

pub mod columns;
pub mod container;
pub mod delimited;
pub mod parser;

use serde::{Deserialize, Serialize};

pub use columns::{Column, ColumnMap, Dialect};
pub use container::{TableContainer, parse_container};
pub use parser::{TimeUnit, should_retain};

use crate::error::Result;
use crate::types::ParsedLap;

/// An in-memory table of string cells: one header row plus data rows.
///
/// This is the shape both input paths normalize to before column resolution.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct RawTable {
    /// Header names, in source order
    pub columns: Vec<String>,
    /// Data rows; lengths may differ from the header
    pub rows: Vec<Vec<String>>,
}

/// Parse delimited text (auto-detected `;` or `,`) into canonical records.
pub fn parse_delimited(text: &str) -> Result<Vec<ParsedLap>> {
    let table = delimited::read_delimited(text);
    parser::parse_rows(&table, None)
}

/// Parse an already-shaped raw table into canonical records, with the time
/// unit following the detected dialect.
pub fn parse_table(table: &RawTable) -> Result<Vec<ParsedLap>> {
    parser::parse_rows(table, None)
}
