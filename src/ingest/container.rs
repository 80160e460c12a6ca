//! Embedded-database container input.
//!
//! Desktop timing software stores sessions in an embedded database exposing
//! named tables. The engine performs no file I/O itself; callers implement
//! [`TableContainer`] over whatever container format they read, and the
//! engine locates the lap-level table by case- and punctuation-insensitive
//! name match, then parses it in millisecond mode through the same column
//! normalizer and record parser as delimited text.

use tracing::debug;

use super::RawTable;
use super::parser::{self, TimeUnit};
use crate::error::{ImportError, Result};
use crate::types::ParsedLap;

/// A binary container exposing named tables of string cells.
///
/// Implementations own all decoding of the on-disk format; the engine only
/// sees table names and rows.
pub trait TableContainer {
    /// Names of all tables in the container.
    fn table_names(&self) -> Vec<String>;

    /// Read one table by its exact name.
    fn table(&self, name: &str) -> Option<RawTable>;
}

/// Lap-level table names searched for, compared case- and
/// punctuation-insensitively ("Lap Times", "lap_times" and "LapTimes" all
/// match).
const LAP_TABLE_CANDIDATES: [&str; 4] = ["laps", "lap_times", "laptimes", "rounds"];

/// Strip punctuation and case for table-name comparison.
fn normalize_table_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Locate and parse the lap-level table of a container.
///
/// Container time fields are milliseconds; lap time, sector times, pit
/// duration and both elapsed counters are converted to seconds at parse
/// time. The result is the same canonical [`ParsedLap`] shape as the
/// delimited-text path and must be validated and cached identically.
pub fn parse_container(container: &dyn TableContainer) -> Result<Vec<ParsedLap>> {
    let names = container.table_names();
    let found = names.iter().find(|name| {
        let normalized = normalize_table_name(name);
        LAP_TABLE_CANDIDATES
            .iter()
            .any(|candidate| normalize_table_name(candidate) == normalized)
    });

    let Some(name) = found else {
        return Err(ImportError::table_not_found(LAP_TABLE_CANDIDATES));
    };
    debug!(table = %name, "located lap table in container");

    let table = container
        .table(name)
        .ok_or_else(|| ImportError::table_not_found(LAP_TABLE_CANDIDATES))?;

    parser::parse_rows(&table, Some(TimeUnit::Milliseconds))
}
