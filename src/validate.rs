//! Lap validation: robust statistical bounds and per-record anomaly flags.
//!
//! Validation runs once per imported session, after sorting, over the FULL
//! record set — bounds computed from a filtered subset would not reflect the
//! session. It writes only the two derived fields (`status`, `flags`) on each
//! record and is idempotent: re-running it on an already-validated set yields
//! identical results.
//!
//! Anomalous rows are flagged, never removed. A record with a non-positive
//! lap time becomes `Invalid`; any other flag demotes it to `Suspect`.

use std::collections::HashMap;
use tracing::debug;

use crate::types::{LapFlag, LapStatus, ValidatedLap};

/// Minimum number of positive lap times before statistical outlier detection
/// is attempted at all.
const MIN_SAMPLES_FOR_BOUNDS: usize = 5;

/// Bound width in MADs around the median.
const MAD_MULTIPLIER: f64 = 4.0;

/// Median of a non-empty slice.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Median/MAD outlier bounds over strictly-positive lap times.
///
/// Returns `None` below [`MIN_SAMPLES_FOR_BOUNDS`] samples. A zero MAD is
/// floored to 1 second so a session of identical times does not produce a
/// zero-width band.
fn outlier_bounds(times: &[f64]) -> Option<(f64, f64)> {
    if times.len() < MIN_SAMPLES_FOR_BOUNDS {
        return None;
    }
    let center = median(times);
    let deviations: Vec<f64> = times.iter().map(|t| (t - center).abs()).collect();
    let mut mad = median(&deviations);
    if mad == 0.0 {
        mad = 1.0;
    }
    Some((center - MAD_MULTIPLIER * mad, center + MAD_MULTIPLIER * mad))
}

/// Validate a sorted record set in place.
///
/// Expects `laps` in sort-key order; the `negative_time_delta` walk depends
/// on it. Recomputes `flags` and `status` from the parsed fields alone, so
/// calling this twice is a no-op the second time.
pub fn validate_laps(laps: &mut [ValidatedLap]) {
    let positive: Vec<f64> = laps
        .iter()
        .map(|l| l.record.lap_time_s)
        .filter(|t| *t > 0.0)
        .collect();
    let bounds = outlier_bounds(&positive);
    match bounds {
        Some((lower, upper)) => {
            debug!(lower, upper, samples = positive.len(), "computed statistical bounds")
        }
        None => debug!(samples = positive.len(), "too few samples for statistical bounds"),
    }

    // Frequency pass over non-empty timestamps for duplicate detection
    let mut timestamp_counts: HashMap<String, usize> = HashMap::new();
    for lap in laps.iter() {
        if let Some(ts) = &lap.record.timestamp {
            if !ts.is_empty() {
                *timestamp_counts.entry(ts.clone()).or_default() += 1;
            }
        }
    }

    let mut prev_elapsed: Option<f64> = None;
    for lap in laps.iter_mut() {
        let mut flags = Vec::new();
        let time = lap.record.lap_time_s;

        if time <= 0.0 {
            flags.push(LapFlag::NonPositiveTime);
        } else if let Some((lower, upper)) = bounds {
            if time < lower || time > upper {
                flags.push(LapFlag::StatisticalOutlier);
            }
        }

        if let (Some(prev), Some(current)) = (prev_elapsed, lap.record.session_elapsed_s) {
            if current < prev {
                flags.push(LapFlag::NegativeTimeDelta);
            }
        }

        if let Some(ts) = &lap.record.timestamp {
            if timestamp_counts.get(ts).is_some_and(|count| *count >= 2) {
                flags.push(LapFlag::DuplicateTimestamp);
            }
        }

        lap.status = if flags.contains(&LapFlag::NonPositiveTime) {
            LapStatus::Invalid
        } else if !flags.is_empty() {
            LapStatus::Suspect
        } else {
            LapStatus::Valid
        };
        lap.flags = flags;

        prev_elapsed = lap.record.session_elapsed_s;
    }
}
