//! Lap-by-lap race telemetry analytics engine.
//!
//! Lapboard ingests heterogeneous lap telemetry — delimited text exports and
//! embedded desktop-database tables — normalizes it into one canonical
//! record shape, flags data-quality anomalies without discarding rows, and
//! derives the layered statistics used for performance analysis: session
//! KPIs, scoped comparisons, track benchmarks, setup-performance indices,
//! rollup caches and chart-ready downsampled series.
//!
//! # Features
//!
//! - **Tolerant ingestion**: every row carrying a time signal is kept;
//!   malformed cells degrade instead of failing
//! - **Robust validation**: median/MAD outlier bounds, ordering and
//!   duplicate-timestamp checks, flagged not filtered
//! - **Pure analysis**: every derived statistic is a deterministic function
//!   of the dataset, safe to recompute on any UI interaction
//! - **Scale**: single-pass rollups and bounded downsampling for 100k+ row
//!   sessions
//!
//! # Quick Start
//!
//! ```rust
//! use lapboard::{AnalysisScope, Lapboard};
//!
//! fn analyze(csv: &str) -> lapboard::Result<()> {
//!     let session = Lapboard::from_delimited(csv)?;
//!
//!     let kpis = session.kpis(false);
//!     println!("best lap: {:?}", kpis.best_lap);
//!
//!     let scope = AnalysisScope::for_drivers(["Alice"]);
//!     if let Some(comparison) = session.compare(&scope, false) {
//!         println!("relative pace: {:?}", comparison.relative_pace);
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
pub mod types;

// Pipeline stages
pub mod analysis;
pub mod ingest;
mod session;
mod validate;

// Core exports
pub use error::*;
pub use types::*;

// Pipeline exports
pub use ingest::{RawTable, TableContainer};
pub use session::{SessionDataset, parse_timestamp_epoch};
pub use validate::validate_laps;

/// Unified entry point for building a session dataset from raw input.
///
/// Both paths produce the same canonical, validated [`SessionDataset`]: sort
/// keys assigned, records stably sorted, anomalies flagged. The engine does
/// no I/O — callers hand it in-memory text or a [`TableContainer`] over an
/// already-opened container file.
///
/// # Examples
///
/// ## Delimited text
/// ```rust
/// use lapboard::Lapboard;
///
/// let csv = "session_id;track;car_model;driver;stint;lap_number;lap_time_s\n\
///            s1;Spa;GT3;Alice;1;1;102.4\n";
/// let session = Lapboard::from_delimited(csv)?;
/// assert_eq!(session.len(), 1);
/// # Ok::<(), lapboard::ImportError>(())
/// ```
pub struct Lapboard;

impl Lapboard {
    /// Import delimited text (`;` or `,`, auto-detected).
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::MissingColumns`] when required columns cannot
    /// be resolved from the header, or [`ImportError::EmptyDataset`] when no
    /// row survives the retention rule.
    pub fn from_delimited(text: &str) -> Result<SessionDataset> {
        Ok(SessionDataset::from_parsed(ingest::parse_delimited(text)?))
    }

    /// Import an already-shaped in-memory table.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Lapboard::from_delimited`].
    pub fn from_table(table: &RawTable) -> Result<SessionDataset> {
        Ok(SessionDataset::from_parsed(ingest::parse_table(table)?))
    }

    /// Import the lap-level table of an embedded-database container.
    ///
    /// Container time fields are milliseconds and are converted to seconds
    /// at parse time.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::TableNotFound`] when the container exposes no
    /// lap-level table, plus the failure modes of
    /// [`Lapboard::from_delimited`].
    pub fn from_container(container: &dyn TableContainer) -> Result<SessionDataset> {
        Ok(SessionDataset::from_parsed(ingest::parse_container(container)?))
    }
}
