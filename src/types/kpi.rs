//! Session KPI value objects.

use serde::{Deserialize, Serialize};

/// Key performance indicators for a (sub)set of laps.
///
/// Numeric fields are `None` when the input does not define them: no timed
/// laps ⇒ no best lap, fewer than two timed laps ⇒ no consistency, fewer
/// than ten ⇒ no degradation. Callers must treat `None` as "not computable",
/// not as an error.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct KpiData {
    /// Fastest timed lap in seconds
    pub best_lap: Option<f64>,
    /// Mean timed lap in seconds
    pub average_pace: Option<f64>,
    /// Sample standard deviation of timed laps (N−1 denominator)
    pub consistency: Option<f64>,
    /// Average pace minus best lap
    pub pace_delta: Option<f64>,
    /// Mean of the last ten timed laps minus mean of the first ten
    pub degradation: Option<f64>,
    /// Subset size, pit laps included
    pub total_laps: usize,
    /// Number of pit events in the subset
    pub pit_stops: usize,
    /// Summed pit durations in seconds; missing durations count as 0
    pub total_pit_time_s: f64,
}

/// Result of running the metrics engine in two contexts, scoped vs. global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ScopeComparison {
    /// Scoped average pace minus global average pace
    pub relative_pace: Option<f64>,
    /// Scoped consistency minus global consistency
    pub relative_consistency: Option<f64>,
    /// Lap counts formatted as `"{scoped} / {global}"`
    pub lap_count_ratio: String,
    /// KPIs of the scoped subset
    pub scoped: KpiData,
    /// KPIs of the full dataset
    pub global: KpiData,
}
