//! Session KPI computation (the metrics engine).
//!
//! Operates on any chronologically-ordered lap subset — the full dataset, a
//! scoped view, or a single stint. Callers are responsible for passing laps
//! in chronological order; degradation compares the first and last ten
//! timing laps in the order given.

use crate::types::{KpiData, ValidatedLap};

/// Mean of a slice; `None` when empty.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (N−1 denominator); `None` below two samples.
pub(crate) fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Number of timing laps at each end used for degradation.
const DEGRADATION_SPAN: usize = 10;

/// Compute session KPIs over a lap subset.
///
/// The timing set is the non-pit ("clean") laps; `include_pit_laps` widens
/// it to every lap in the subset. `total_laps` is always the subset size and
/// the pit counters never depend on the flag.
pub fn compute_kpis(laps: &[&ValidatedLap], include_pit_laps: bool) -> KpiData {
    let timing: Vec<f64> = laps
        .iter()
        .filter(|lap| include_pit_laps || !lap.is_pit())
        .map(|lap| lap.record.lap_time_s)
        .collect();

    let best_lap = timing.iter().copied().min_by(f64::total_cmp);
    let average_pace = mean(&timing);
    let pace_delta = average_pace.zip(best_lap).map(|(avg, best)| avg - best);
    let consistency = sample_stddev(&timing);

    let degradation = if timing.len() >= DEGRADATION_SPAN {
        let first = mean(&timing[..DEGRADATION_SPAN]);
        let last = mean(&timing[timing.len() - DEGRADATION_SPAN..]);
        last.zip(first).map(|(l, f)| l - f)
    } else {
        None
    };

    let pit_stops = laps.iter().filter(|lap| lap.is_pit()).count();
    let total_pit_time_s = laps
        .iter()
        .filter(|lap| lap.is_pit())
        .map(|lap| lap.record.pit_time_s.unwrap_or(0.0))
        .sum();

    KpiData {
        best_lap,
        average_pace,
        consistency,
        pace_delta,
        degradation,
        total_laps: laps.len(),
        pit_stops,
        total_pit_time_s,
    }
}
