//! Session cache rollup types.
//!
//! The cache is a disposable aggregation over the canonical dataset: rebuilt
//! whole whenever the dataset changes, never patched in place. It exists so
//! that UI interactions over 100k+ row sessions do not re-scan the full
//! array per widget.

use serde::{Deserialize, Serialize};

/// Per-(driver, stint) rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct StintRollup {
    /// Driver name
    pub driver: String,
    /// Stint number
    pub stint: u32,
    /// Total records in the stint, pit laps included
    pub lap_count: usize,
    /// Records that are valid with a positive lap time
    pub valid_lap_count: usize,
    /// Fastest valid positive-time lap
    pub best_lap: Option<f64>,
    /// Running mean of valid positive-time laps
    pub avg_lap: Option<f64>,
    /// Earliest session-elapsed value seen in the stint
    pub elapsed_start: Option<f64>,
    /// Latest session-elapsed value seen in the stint
    pub elapsed_end: Option<f64>,
}

/// Per-driver rollup across all of the driver's stints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct DriverRollup {
    /// Driver name
    pub driver: String,
    /// Total records for the driver
    pub lap_count: usize,
    /// Records that are valid with a positive lap time
    pub valid_lap_count: usize,
    /// Number of distinct stints driven
    pub stint_count: usize,
    /// Fastest valid positive-time lap
    pub best_lap: Option<f64>,
    /// Mean of the driver's valid positive-time laps
    pub avg_lap: Option<f64>,
}

/// Derived, rebuildable aggregation over one session's canonical dataset.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SessionCache {
    /// Rollups per (driver, stint), ordered by driver then stint
    pub stints: Vec<StintRollup>,
    /// Rollups per driver, ordered by driver name
    pub drivers: Vec<DriverRollup>,
    /// Total records in the dataset
    pub total_laps: usize,
    /// Records that are valid with a positive lap time
    pub total_valid_laps: usize,
    /// Session-wide fastest valid positive-time lap
    pub session_best: Option<f64>,
}

/// One point of the rolling time-windowed pace series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct PacePoint {
    /// Session-elapsed seconds of the lap that closes the window
    pub elapsed_s: f64,
    /// Mean lap time over the window
    pub avg_pace_s: f64,
    /// Number of laps inside the window
    pub lap_count: usize,
}
