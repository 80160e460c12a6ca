//! Canonical lap record types.
//!
//! Parsing and validation are two distinct stages with two distinct types:
//! [`ParsedLap`] is the immutable output of the record parser and carries no
//! derived state; [`ValidatedLap`] wraps it with the sort key, status and
//! anomaly flags written exactly once by the validator. Everything downstream
//! of validation reads these records, nothing mutates them.

use serde::{Deserialize, Serialize};

/// One completed lap or pit event, as parsed from a raw input row.
///
/// String identity fields may be empty when the source did not provide them.
/// A `lap_time_s` of `0.0` means the time is unknown, not that the lap took
/// zero seconds; such rows are retained as long as they carry a
/// session-elapsed value (see [`crate::ingest::should_retain`]).
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ParsedLap {
    /// Session identifier
    pub session_id: String,
    /// Track name
    pub track: String,
    /// Car model
    pub car_model: String,
    /// Driver name
    pub driver: String,
    /// Car brand / manufacturer
    pub brand: String,
    /// Stint number within the session
    pub stint: u32,
    /// Lap number as reported by the source
    pub lap_number: i32,
    /// Lap time in seconds, 0.0 = unknown
    pub lap_time_s: f64,
    /// First sector time in seconds
    pub sector1_s: Option<f64>,
    /// Second sector time in seconds
    pub sector2_s: Option<f64>,
    /// Third sector time in seconds
    pub sector3_s: Option<f64>,
    /// Raw session date string, as exported
    pub date: Option<String>,
    /// Pit event type; empty string = not a pit lap
    pub pit_type: String,
    /// Pit stop duration in seconds
    pub pit_time_s: Option<f64>,
    /// Raw per-lap timestamp string, as exported
    pub timestamp: Option<String>,
    /// Lane / track position number
    pub lane: Option<u32>,
    /// Driving station number
    pub driving_station: Option<u32>,
    /// Team number
    pub team_number: Option<u32>,
    /// Elapsed seconds since the start of the stint
    pub stint_elapsed_s: Option<f64>,
    /// Elapsed seconds since the start of the session
    pub session_elapsed_s: Option<f64>,
}

impl ParsedLap {
    /// Whether this record is a pit event.
    pub fn is_pit(&self) -> bool {
        !self.pit_type.is_empty()
    }
}

/// Validation status derived for each lap record.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "snake_case")]
pub enum LapStatus {
    /// No anomalies detected
    #[default]
    Valid,
    /// One or more anomaly flags, but the lap time itself is usable
    Suspect,
    /// Non-positive lap time; excluded from timing statistics
    Invalid,
}

/// Anomaly tags attached to a record by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "snake_case")]
pub enum LapFlag {
    /// Lap time is zero or negative
    NonPositiveTime,
    /// Lap time falls outside the session's median/MAD bounds
    StatisticalOutlier,
    /// Session-elapsed value moved backwards relative to the previous record
    NegativeTimeDelta,
    /// Timestamp string is shared with at least one other record
    DuplicateTimestamp,
}

/// A lap record after validation: the immutable parsed record plus the
/// derived sort key, status and flag set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ValidatedLap {
    /// The parsed record; identity fields are never mutated after parsing
    pub record: ParsedLap,
    /// Monotonic ordering key (see sort-key precedence in `session`)
    pub sort_key: f64,
    /// Derived validation status
    pub status: LapStatus,
    /// Derived anomaly flags; empty for a clean record
    pub flags: Vec<LapFlag>,
}

impl ValidatedLap {
    /// Whether the given anomaly flag is set on this record.
    pub fn has_flag(&self, flag: LapFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Shorthand for `record.is_pit()`.
    pub fn is_pit(&self) -> bool {
        self.record.is_pit()
    }

    /// Whether this lap contributes to timing statistics: validated clean
    /// with a strictly positive lap time.
    pub fn is_timed_valid(&self) -> bool {
        self.status == LapStatus::Valid && self.record.lap_time_s > 0.0
    }
}
