//! Session cache building and the rolling pace series.
//!
//! The cache is the one aggregation that exists purely for scale: 100k+ row
//! sessions cannot be re-scanned per UI interaction. Per-(driver, stint) and
//! per-driver rollups are accumulated in a strict single pass with
//! incremental running means; the driver-level final average is the one
//! exception and takes a second scan restricted to that driver. The cache is
//! rebuilt whole whenever the dataset changes — there is no partial-update
//! path.

use std::collections::HashMap;
use tracing::debug;

use crate::types::{DriverRollup, PacePoint, SessionCache, StintRollup, ValidatedLap};

/// Default sliding-window duration for the rolling pace series.
pub const DEFAULT_PACE_WINDOW_S: f64 = 300.0;

/// Default maximum number of pace points before decimation.
pub const DEFAULT_MAX_PACE_POINTS: usize = 500;

/// Build the session cache in one pass over the validated dataset.
pub fn build_session_cache(laps: &[ValidatedLap]) -> SessionCache {
    let mut stints: Vec<StintRollup> = Vec::new();
    let mut stint_index: HashMap<(String, u32), usize> = HashMap::new();
    let mut drivers: Vec<DriverRollup> = Vec::new();
    let mut driver_index: HashMap<String, usize> = HashMap::new();

    let mut total_valid_laps = 0usize;
    let mut session_best: Option<f64> = None;

    for lap in laps {
        let driver = lap.record.driver.clone();
        let stint = lap.record.stint;
        let timed_valid = lap.is_timed_valid();
        let time = lap.record.lap_time_s;

        let stint_slot = *stint_index
            .entry((driver.clone(), stint))
            .or_insert_with(|| {
                stints.push(StintRollup {
                    driver: driver.clone(),
                    stint,
                    lap_count: 0,
                    valid_lap_count: 0,
                    best_lap: None,
                    avg_lap: None,
                    elapsed_start: None,
                    elapsed_end: None,
                });
                stints.len() - 1
            });

        let driver_slot = *driver_index.entry(driver.clone()).or_insert_with(|| {
            drivers.push(DriverRollup {
                driver: driver.clone(),
                lap_count: 0,
                valid_lap_count: 0,
                stint_count: 0,
                best_lap: None,
                avg_lap: None,
            });
            drivers.len() - 1
        });

        let stint_rollup = &mut stints[stint_slot];
        if stint_rollup.lap_count == 0 {
            drivers[driver_slot].stint_count += 1;
        }
        stint_rollup.lap_count += 1;
        if timed_valid {
            stint_rollup.valid_lap_count += 1;
            stint_rollup.best_lap = Some(match stint_rollup.best_lap {
                Some(best) => best.min(time),
                None => time,
            });
            // Incremental running mean over the stint's valid laps
            let count = stint_rollup.valid_lap_count as f64;
            let avg = stint_rollup.avg_lap.unwrap_or(0.0);
            stint_rollup.avg_lap = Some(avg + (time - avg) / count);
        }
        if let Some(elapsed) = lap.record.session_elapsed_s {
            stint_rollup.elapsed_start = Some(match stint_rollup.elapsed_start {
                Some(start) => start.min(elapsed),
                None => elapsed,
            });
            stint_rollup.elapsed_end = Some(match stint_rollup.elapsed_end {
                Some(end) => end.max(elapsed),
                None => elapsed,
            });
        }

        let driver_rollup = &mut drivers[driver_slot];
        driver_rollup.lap_count += 1;
        if timed_valid {
            driver_rollup.valid_lap_count += 1;
            driver_rollup.best_lap = Some(match driver_rollup.best_lap {
                Some(best) => best.min(time),
                None => time,
            });
            total_valid_laps += 1;
            session_best = Some(match session_best {
                Some(best) => best.min(time),
                None => time,
            });
        }
    }

    // Driver averages cost one extra scan of the full array per driver;
    // accepted so the main pass stays a single forward walk.
    for rollup in &mut drivers {
        let times: Vec<f64> = laps
            .iter()
            .filter(|lap| lap.record.driver == rollup.driver && lap.is_timed_valid())
            .map(|lap| lap.record.lap_time_s)
            .collect();
        if !times.is_empty() {
            rollup.avg_lap = Some(times.iter().sum::<f64>() / times.len() as f64);
        }
    }

    stints.sort_by(|a, b| a.driver.cmp(&b.driver).then(a.stint.cmp(&b.stint)));
    drivers.sort_by(|a, b| a.driver.cmp(&b.driver));

    debug!(
        stints = stints.len(),
        drivers = drivers.len(),
        total_laps = laps.len(),
        "rebuilt session cache"
    );

    SessionCache {
        stints,
        drivers,
        total_laps: laps.len(),
        total_valid_laps,
        session_best,
    }
}

/// Rolling time-windowed pace over valid, positive-time, elapsed-bearing
/// laps, sorted by elapsed time.
///
/// One point per lap: the mean lap time over the trailing `window_s`
/// seconds, via a two-pointer walk — the window start only moves forward,
/// so the whole series is O(n). Series longer than `max_points` are
/// decimated by fixed stride, always keeping the final point.
pub fn rolling_pace(laps: &[ValidatedLap], window_s: f64, max_points: usize) -> Vec<PacePoint> {
    let mut eligible: Vec<(f64, f64)> = laps
        .iter()
        .filter(|lap| lap.is_timed_valid())
        .filter_map(|lap| lap.record.session_elapsed_s.map(|e| (e, lap.record.lap_time_s)))
        .collect();
    eligible.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut points = Vec::with_capacity(eligible.len());
    let mut start = 0usize;
    let mut window_sum = 0.0;
    for (index, (elapsed, time)) in eligible.iter().enumerate() {
        window_sum += time;
        while eligible[start].0 < elapsed - window_s {
            window_sum -= eligible[start].1;
            start += 1;
        }
        let lap_count = index - start + 1;
        points.push(PacePoint {
            elapsed_s: *elapsed,
            avg_pace_s: window_sum / lap_count as f64,
            lap_count,
        });
    }

    decimate(points, max_points)
}

/// Uniform fixed-stride decimation that always keeps the final point.
fn decimate(points: Vec<PacePoint>, max_points: usize) -> Vec<PacePoint> {
    if max_points == 0 || points.len() <= max_points {
        return points;
    }
    let stride = points.len().div_ceil(max_points);
    let last_index = points.len() - 1;
    let mut out: Vec<PacePoint> = points.iter().copied().step_by(stride).collect();
    if last_index % stride != 0 {
        out.push(points[last_index]);
    }
    out
}
