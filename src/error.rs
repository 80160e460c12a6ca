//! Error types for telemetry import.
//!
//! Import has exactly two hard failure modes on the delimited-text path:
//! required columns that cannot be resolved from the header, and a dataset
//! where no row survives the retention rule. The embedded-container path adds
//! a third for a container that exposes no lap-level table. Everything past
//! parsing is a total function — missing or insufficient data is signalled
//! through `None`/empty results, never through an error.
//!
//! Errors carry structured context and can be flattened into the
//! human-readable message list that UI layers display:
//!
//! ```rust
//! use lapboard::ImportError;
//!
//! let error = ImportError::missing_columns(["track", "driver"]);
//! for message in error.messages() {
//!     println!("{}", message);
//! }
//! ```

use thiserror::Error;

/// Result type alias for import operations.
pub type Result<T, E = ImportError> = std::result::Result<T, E>;

/// Main error type for telemetry import.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImportError {
    #[error("Missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// Canonical names of the columns that could not be resolved
        columns: Vec<String>,
    },

    #[error("No rows survived parsing; the input carries no time signal")]
    EmptyDataset,

    #[error("No lap table found in container; tried: {}", candidates.join(", "))]
    TableNotFound {
        /// Table name candidates that were searched for
        candidates: Vec<String>,
    },
}

impl ImportError {
    /// Helper constructor for missing-column errors.
    pub fn missing_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ImportError::MissingColumns {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Helper constructor for container lap-table lookup failures.
    pub fn table_not_found<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ImportError::TableNotFound {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    /// Flatten this error into the human-readable message list reported to
    /// callers. Column errors yield one message per absent field so a UI can
    /// render them individually.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ImportError::MissingColumns { columns } => columns
                .iter()
                .map(|c| format!("Required column '{}' is missing from the input", c))
                .collect(),
            ImportError::EmptyDataset => {
                vec![
                    "No importable laps: every row lacked both a lap time and an elapsed-time value"
                        .to_string(),
                ]
            }
            ImportError::TableNotFound { candidates } => {
                vec![format!(
                    "Container has no lap-level table (searched for: {})",
                    candidates.join(", ")
                )]
            }
        }
    }
}
