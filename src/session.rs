//! Session dataset construction and the analysis facade.
//!
//! A [`SessionDataset`] is built once per imported session: every parsed
//! record gets a sort key, the set is stably sorted ascending, and the
//! validator writes the derived status/flag fields. From then on the dataset
//! is read-only; all analysis operations are deterministic pure functions of
//! it plus the caller's parameters, safe to recompute on every UI
//! interaction.
//!
//! ## Sort-key precedence
//!
//! 1. session-elapsed seconds, when present and non-negative
//! 2. the raw timestamp parsed to epoch seconds, when parseable
//! 3. the original row index, as a stable fallback
//!
//! Ties keep their original relative order — the stable sort is load-bearing
//! for the validator's adjacent-record checks.

use chrono::{DateTime, NaiveDateTime};
use tracing::debug;

use crate::analysis::{benchmark, cache, kpi, scope};
use crate::types::{
    AnalysisScope, KpiData, PacePoint, ParsedLap, ScopeComparison, SessionCache,
    SetupPerformanceMetrics, TrackBenchmark, ValidatedLap,
};
use crate::validate;

/// Timestamp formats tried in order after a plain numeric epoch.
const TIMESTAMP_FORMATS: [&str; 3] =
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%d.%m.%Y %H:%M:%S"];

/// Parse a raw timestamp string to epoch seconds.
///
/// Ordered candidates: numeric epoch (fractional accepted), RFC 3339, then
/// the literal formats in [`TIMESTAMP_FORMATS`]. Returns `None` when nothing
/// matches; the caller falls through to the row-index key.
pub fn parse_timestamp_epoch(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = trimmed.parse::<f64>() {
        if value.is_finite() {
            return Some(value);
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.timestamp_millis() as f64 / 1000.0);
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc().timestamp_millis() as f64 / 1000.0);
        }
    }

    None
}

/// Sort key for one record, by source-reliability precedence.
fn sort_key_for(record: &ParsedLap, index: usize) -> f64 {
    if let Some(elapsed) = record.session_elapsed_s {
        if elapsed >= 0.0 {
            return elapsed;
        }
    }
    if let Some(timestamp) = &record.timestamp {
        if let Some(epoch) = parse_timestamp_epoch(timestamp) {
            return epoch;
        }
    }
    index as f64
}

/// The canonical, validated dataset of one imported session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDataset {
    laps: Vec<ValidatedLap>,
}

impl SessionDataset {
    /// Build the canonical dataset: assign sort keys, sort stably, validate.
    pub fn from_parsed(parsed: Vec<ParsedLap>) -> Self {
        let mut laps: Vec<ValidatedLap> = parsed
            .into_iter()
            .enumerate()
            .map(|(index, record)| ValidatedLap {
                sort_key: sort_key_for(&record, index),
                record,
                status: Default::default(),
                flags: Vec::new(),
            })
            .collect();

        laps.sort_by(|a, b| a.sort_key.total_cmp(&b.sort_key));
        validate::validate_laps(&mut laps);

        debug!(laps = laps.len(), "built session dataset");
        Self { laps }
    }

    /// The canonical record set, in sort order.
    pub fn laps(&self) -> &[ValidatedLap] {
        &self.laps
    }

    pub fn len(&self) -> usize {
        self.laps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.laps.is_empty()
    }

    /// Session KPIs over the full dataset.
    pub fn kpis(&self, include_pit_laps: bool) -> KpiData {
        let all: Vec<&ValidatedLap> = self.laps.iter().collect();
        kpi::compute_kpis(&all, include_pit_laps)
    }

    /// Virtual subset of the canonical set under a scope. References into
    /// the canonical array — positions do NOT correspond to canonical
    /// indices once filtering applies.
    pub fn scoped(&self, scope: &AnalysisScope) -> Vec<&ValidatedLap> {
        scope::apply_scope(&self.laps, scope)
    }

    /// Scoped-vs-global KPI comparison; `None` unless the scope is enabled
    /// and the dataset non-empty.
    pub fn compare(&self, scope: &AnalysisScope, include_pit_laps: bool) -> Option<ScopeComparison> {
        scope::compare_contexts(&self.laps, scope, include_pit_laps)
    }

    /// Session-wide benchmark from the full unscoped dataset.
    pub fn benchmark(&self) -> TrackBenchmark {
        benchmark::compute_benchmark(&self.laps)
    }

    /// Setup performance of a subset against this session's benchmark.
    pub fn setup_performance(&self, subset: &[&ValidatedLap]) -> SetupPerformanceMetrics {
        benchmark::setup_performance(subset, &self.benchmark())
    }

    /// Single-pass rollup cache; rebuilt whole, never patched.
    pub fn cache(&self) -> SessionCache {
        cache::build_session_cache(&self.laps)
    }

    /// Rolling time-windowed pace series with the default window and point
    /// cap.
    pub fn pace_series(&self) -> Vec<PacePoint> {
        cache::rolling_pace(&self.laps, cache::DEFAULT_PACE_WINDOW_S, cache::DEFAULT_MAX_PACE_POINTS)
    }

    /// Rolling pace series with an explicit window and point cap.
    pub fn pace_series_with(&self, window_s: f64, max_points: usize) -> Vec<PacePoint> {
        cache::rolling_pace(&self.laps, window_s, max_points)
    }
}
