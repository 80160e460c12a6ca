//! Column normalization and source dialect detection.
//!
//! Raw tables arrive with arbitrary header spellings from several exporters.
//! This module maps them onto one canonical schema through a static alias
//! table and a pure resolver — an explicit ordered candidate list, never
//! reflection — and decides which structured source dialect produced the
//! rows.

use std::collections::HashMap;
use tracing::debug;

use crate::error::{ImportError, Result};

/// Canonical columns of the lap record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    SessionId,
    Track,
    CarModel,
    Driver,
    Brand,
    Stint,
    LapNumber,
    LapTime,
    Sector1,
    Sector2,
    Sector3,
    Date,
    PitType,
    PitTime,
    Timestamp,
    Lane,
    DrivingStation,
    TeamNumber,
    StintElapsed,
    SessionElapsed,
}

impl Column {
    /// Canonical header name for this column.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Column::SessionId => "session_id",
            Column::Track => "track",
            Column::CarModel => "car_model",
            Column::Driver => "driver",
            Column::Brand => "brand",
            Column::Stint => "stint",
            Column::LapNumber => "lap_number",
            Column::LapTime => "lap_time_s",
            Column::Sector1 => "sector1_s",
            Column::Sector2 => "sector2_s",
            Column::Sector3 => "sector3_s",
            Column::Date => "date",
            Column::PitType => "pit_type",
            Column::PitTime => "pit_time_s",
            Column::Timestamp => "timestamp",
            Column::Lane => "lane",
            Column::DrivingStation => "driving_station",
            Column::TeamNumber => "team_number",
            Column::StintElapsed => "stint_elapsed_s",
            Column::SessionElapsed => "session_elapsed_s",
        }
    }

    /// Columns that must resolve for an import to proceed. Lap time is
    /// checked separately because it arrives under several aliases.
    pub const REQUIRED: [Column; 6] = [
        Column::SessionId,
        Column::Track,
        Column::CarModel,
        Column::Driver,
        Column::Stint,
        Column::LapNumber,
    ];

    /// Every canonical column.
    pub const ALL: [Column; 20] = [
        Column::SessionId,
        Column::Track,
        Column::CarModel,
        Column::Driver,
        Column::Brand,
        Column::Stint,
        Column::LapNumber,
        Column::LapTime,
        Column::Sector1,
        Column::Sector2,
        Column::Sector3,
        Column::Date,
        Column::PitType,
        Column::PitTime,
        Column::Timestamp,
        Column::Lane,
        Column::DrivingStation,
        Column::TeamNumber,
        Column::StintElapsed,
        Column::SessionElapsed,
    ];
}

/// Known alternate spellings, lowercase, mapped to canonical columns.
///
/// Includes the SmartRace-style export's foreign-key names (`driver_id`,
/// `team_id`, `controller_id`) so that dialect resolves through the same
/// table once detected.
const ALIASES: &[(&str, Column)] = &[
    ("session", Column::SessionId),
    ("heat_id", Column::SessionId),
    ("heat", Column::SessionId),
    ("event_id", Column::SessionId),
    ("track_name", Column::Track),
    ("circuit", Column::Track),
    ("car", Column::CarModel),
    ("car_name", Column::CarModel),
    ("model", Column::CarModel),
    ("vehicle", Column::CarModel),
    ("driver_name", Column::Driver),
    ("pilot", Column::Driver),
    ("driver_id", Column::Driver),
    ("manufacturer", Column::Brand),
    ("make", Column::Brand),
    ("stint_no", Column::Stint),
    ("stint_number", Column::Stint),
    ("lap", Column::LapNumber),
    ("lap_no", Column::LapNumber),
    ("lapnumber", Column::LapNumber),
    ("round", Column::LapNumber),
    ("lap_time", Column::LapTime),
    ("laptime", Column::LapTime),
    ("time", Column::LapTime),
    ("lap_time_ms", Column::LapTime),
    ("sector1", Column::Sector1),
    ("sector_1", Column::Sector1),
    ("s1", Column::Sector1),
    ("sector2", Column::Sector2),
    ("sector_2", Column::Sector2),
    ("s2", Column::Sector2),
    ("sector3", Column::Sector3),
    ("sector_3", Column::Sector3),
    ("s3", Column::Sector3),
    ("session_date", Column::Date),
    ("pit", Column::PitType),
    ("pit_event", Column::PitType),
    ("pit_time", Column::PitTime),
    ("pit_duration", Column::PitTime),
    ("pit_time_ms", Column::PitTime),
    ("time_stamp", Column::Timestamp),
    ("recorded_at", Column::Timestamp),
    ("slot", Column::Lane),
    ("track_position", Column::Lane),
    ("controller_id", Column::Lane),
    ("station", Column::DrivingStation),
    ("station_no", Column::DrivingStation),
    ("team", Column::TeamNumber),
    ("team_no", Column::TeamNumber),
    ("team_id", Column::TeamNumber),
    ("stint_elapsed", Column::StintElapsed),
    ("stint_time_ms", Column::StintElapsed),
    ("session_elapsed", Column::SessionElapsed),
    ("elapsed", Column::SessionElapsed),
    ("elapsed_ms", Column::SessionElapsed),
    ("total_time_ms", Column::SessionElapsed),
    ("session_time", Column::SessionElapsed),
];

/// Structured source dialect that produced a raw table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Generic delimited export; time fields in seconds
    #[default]
    Generic,
    /// SmartRace-style export; time fields in milliseconds, foreign-key
    /// column names for driver/team/lane
    SmartRace,
}

/// Column names that must ALL be present verbatim in the raw header for a
/// table to be treated as the SmartRace dialect. A partial match stays
/// generic.
const SMARTRACE_SIGNATURE: [&str; 4] = ["lap_time_ms", "driver_id", "controller_id", "event_id"];

/// Resolve a single raw header to a canonical column.
///
/// Tries the canonical name first, then the alias table. Matching is
/// case-insensitive on the trimmed header.
pub fn resolve(header: &str) -> Option<Column> {
    let key = header.trim().to_ascii_lowercase();
    Column::ALL
        .into_iter()
        .find(|c| c.canonical_name() == key)
        .or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| *alias == key)
                .map(|(_, column)| *column)
        })
}

/// Name → canonical mapping for one raw table, plus the dialect decision.
///
/// Built once per import from the header row; cell lookups during parsing go
/// through the precomputed column → header-index map.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    /// Header index per canonical column; canonical-name hits beat aliases
    indices: HashMap<Column, usize>,
    dialect: Dialect,
}

impl ColumnMap {
    /// Build the mapping from a header row.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let trimmed: Vec<&str> = headers.iter().map(|h| h.as_ref().trim()).collect();

        let dialect = if SMARTRACE_SIGNATURE.iter().all(|sig| trimmed.contains(sig)) {
            Dialect::SmartRace
        } else {
            Dialect::Generic
        };

        // Direct canonical-name hits take precedence over alias hits; within
        // each kind the first header wins
        let mut indices = HashMap::new();
        for (index, header) in trimmed.iter().enumerate() {
            let key = header.to_ascii_lowercase();
            if let Some(column) = Column::ALL.into_iter().find(|c| c.canonical_name() == key) {
                indices.entry(column).or_insert(index);
            }
        }
        for (index, header) in trimmed.iter().enumerate() {
            if let Some(column) = resolve(header) {
                indices.entry(column).or_insert(index);
            }
        }

        debug!(?dialect, columns = indices.len(), "resolved header row");
        Self { indices, dialect }
    }

    /// Which structured dialect produced the table.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Header index of a canonical column, if any header resolved to it.
    pub fn index_of(&self, column: Column) -> Option<usize> {
        self.indices.get(&column).copied()
    }

    /// Whether any header resolves to the canonical column.
    pub fn has(&self, column: Column) -> bool {
        self.indices.contains_key(&column)
    }

    /// Whether all three sector columns resolve. Sector cells are only
    /// parsed when this holds; stray values in a partial sector table are
    /// forced null.
    pub fn has_sector_data(&self) -> bool {
        self.has(Column::Sector1) && self.has(Column::Sector2) && self.has(Column::Sector3)
    }

    /// Check that all required columns plus a lap-time column resolve.
    pub fn ensure_required(&self) -> Result<()> {
        let mut missing: Vec<String> = Column::REQUIRED
            .iter()
            .filter(|c| !self.has(**c))
            .map(|c| c.canonical_name().to_string())
            .collect();

        // Lap time may arrive under several aliases; checked on its own
        if !self.has(Column::LapTime) {
            missing.push(Column::LapTime.canonical_name().to_string());
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ImportError::MissingColumns { columns: missing })
        }
    }
}
