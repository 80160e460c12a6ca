//! Raw row → [`ParsedLap`] conversion.
//!
//! Parsing never throws and never silently drops a usable row: malformed
//! numeric cells degrade to `0` (lap time) or `None` (optional fields), and a
//! row is discarded only when it carries no time signal at all — lap time
//! exactly 0 AND no session-elapsed value. Noisy partial telemetry is the
//! expected norm; anomalies are the validator's job, not the parser's.

use tracing::debug;

use super::RawTable;
use super::columns::{Column, ColumnMap, Dialect};
use crate::error::{ImportError, Result};
use crate::types::ParsedLap;

/// Unit of the source's time-valued cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// Values are seconds; stored as-is
    Seconds,
    /// Values are milliseconds; divided by 1000 at parse time
    Milliseconds,
}

impl TimeUnit {
    fn scale(self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Milliseconds => 1e-3,
        }
    }
}

/// Row retention predicate: a parsed row is kept iff it carries a time
/// signal — a non-zero lap time or a session-elapsed value. This is the
/// single place the "never silently drop a row" contract is decided.
pub fn should_retain(lap: &ParsedLap) -> bool {
    lap.lap_time_s != 0.0 || lap.session_elapsed_s.is_some()
}

/// Parse every row of a normalized table into [`ParsedLap`] records.
///
/// `unit_override` forces a time unit regardless of dialect (the embedded
/// container path always stores milliseconds); without it the unit follows
/// the detected dialect.
pub fn parse_rows(table: &RawTable, unit_override: Option<TimeUnit>) -> Result<Vec<ParsedLap>> {
    let map = ColumnMap::from_headers(&table.columns);
    map.ensure_required()?;

    let unit = unit_override.unwrap_or(match map.dialect() {
        Dialect::Generic => TimeUnit::Seconds,
        Dialect::SmartRace => TimeUnit::Milliseconds,
    });
    let scale = unit.scale();
    let has_sectors = map.has_sector_data();

    let mut laps = Vec::with_capacity(table.rows.len());
    let mut dropped = 0usize;
    for row in &table.rows {
        let lap = parse_row(row, &map, scale, has_sectors);
        if should_retain(&lap) {
            laps.push(lap);
        } else {
            dropped += 1;
        }
    }

    debug!(retained = laps.len(), dropped, ?unit, "parsed raw table");

    if laps.is_empty() {
        return Err(ImportError::EmptyDataset);
    }
    Ok(laps)
}

fn parse_row(row: &[String], map: &ColumnMap, scale: f64, has_sectors: bool) -> ParsedLap {
    let time_cell = |column: Column| parse_f64(cell(row, map, column)).map(|v| v * scale);

    ParsedLap {
        session_id: string_cell(row, map, Column::SessionId),
        track: string_cell(row, map, Column::Track),
        car_model: string_cell(row, map, Column::CarModel),
        driver: string_cell(row, map, Column::Driver),
        brand: string_cell(row, map, Column::Brand),
        stint: parse_u32(cell(row, map, Column::Stint)).unwrap_or(0),
        lap_number: parse_i32(cell(row, map, Column::LapNumber)).unwrap_or(0),
        lap_time_s: time_cell(Column::LapTime).unwrap_or(0.0),
        sector1_s: if has_sectors { time_cell(Column::Sector1) } else { None },
        sector2_s: if has_sectors { time_cell(Column::Sector2) } else { None },
        sector3_s: if has_sectors { time_cell(Column::Sector3) } else { None },
        date: optional_string_cell(row, map, Column::Date),
        pit_type: string_cell(row, map, Column::PitType),
        pit_time_s: time_cell(Column::PitTime),
        timestamp: optional_string_cell(row, map, Column::Timestamp),
        lane: parse_u32(cell(row, map, Column::Lane)),
        driving_station: parse_u32(cell(row, map, Column::DrivingStation)),
        team_number: parse_u32(cell(row, map, Column::TeamNumber)),
        stint_elapsed_s: time_cell(Column::StintElapsed),
        session_elapsed_s: time_cell(Column::SessionElapsed),
    }
}

/// Trimmed, non-empty cell value for a canonical column.
fn cell<'a>(row: &'a [String], map: &ColumnMap, column: Column) -> Option<&'a str> {
    let index = map.index_of(column)?;
    let value = row.get(index)?.trim();
    if value.is_empty() { None } else { Some(value) }
}

fn string_cell(row: &[String], map: &ColumnMap, column: Column) -> String {
    cell(row, map, column).unwrap_or_default().to_string()
}

fn optional_string_cell(row: &[String], map: &ColumnMap, column: Column) -> Option<String> {
    cell(row, map, column).map(str::to_string)
}

/// Locale-agnostic float parsing: a plain decimal point is tried first, then
/// a comma decimal separator.
fn parse_f64(value: Option<&str>) -> Option<f64> {
    let value = value?;
    value
        .parse::<f64>()
        .ok()
        .or_else(|| value.replace(',', ".").parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn parse_i32(value: Option<&str>) -> Option<i32> {
    let value = value?;
    value.parse::<i32>().ok().or_else(|| parse_f64(Some(value)).map(|v| v as i32))
}

fn parse_u32(value: Option<&str>) -> Option<u32> {
    let value = value?;
    value.parse::<u32>().ok().or_else(|| {
        parse_f64(Some(value)).filter(|v| *v >= 0.0).map(|v| v as u32)
    })
}
