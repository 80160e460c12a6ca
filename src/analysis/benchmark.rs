//! Track benchmark computation and setup performance normalization.
//!
//! The benchmark is computed once per session from the FULL unfiltered
//! dataset — never a scope-reduced subset — so that every setup or driver is
//! normalized against the same reference. Only validated non-pit laps
//! contribute.

use super::kpi::mean;
use crate::types::{
    LapStatus, Sector, SetupPerformanceMetrics, TrackBenchmark, ValidatedLap,
};

fn sector_time(lap: &ValidatedLap, sector: Sector) -> Option<f64> {
    match sector {
        Sector::S1 => lap.record.sector1_s,
        Sector::S2 => lap.record.sector2_s,
        Sector::S3 => lap.record.sector3_s,
    }
}

fn is_benchmark_lap(lap: &ValidatedLap) -> bool {
    lap.status == LapStatus::Valid && !lap.is_pit()
}

/// Compute session-wide reference values from the unscoped dataset.
///
/// Sector minima are independent: a lap missing S2 still contributes its S1
/// and S3. The theoretical best exists only when every sector has at least
/// one reporting lap.
pub fn compute_benchmark(laps: &[ValidatedLap]) -> TrackBenchmark {
    let eligible: Vec<&ValidatedLap> = laps.iter().filter(|l| is_benchmark_lap(l)).collect();

    let best_lap = eligible
        .iter()
        .map(|lap| lap.record.lap_time_s)
        .min_by(f64::total_cmp);

    let best_of = |sector: Sector| {
        eligible
            .iter()
            .filter_map(|lap| sector_time(lap, sector))
            .min_by(f64::total_cmp)
    };
    let best_sector1 = best_of(Sector::S1);
    let best_sector2 = best_of(Sector::S2);
    let best_sector3 = best_of(Sector::S3);

    // Theoretical best exists exactly when every sector reports
    let theoretical_best = match (best_sector1, best_sector2, best_sector3) {
        (Some(s1), Some(s2), Some(s3)) => Some(s1 + s2 + s3),
        _ => None,
    };
    let has_sector_data = theoretical_best.is_some();

    TrackBenchmark {
        best_lap,
        best_sector1,
        best_sector2,
        best_sector3,
        theoretical_best,
        has_sector_data,
    }
}

/// Population standard deviation (N denominator). The metrics engine's
/// consistency uses the sample form; this one intentionally does not.
fn population_stddev(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Express a lap subset's performance as ratios against the benchmark.
///
/// An empty valid non-pit subset or a benchmark without a best lap yields
/// the all-null result — an expected state, not an error.
pub fn setup_performance(
    subset: &[&ValidatedLap],
    benchmark: &TrackBenchmark,
) -> SetupPerformanceMetrics {
    let eligible: Vec<&ValidatedLap> =
        subset.iter().copied().filter(|l| is_benchmark_lap(l)).collect();

    let Some(best_lap) = benchmark.best_lap else {
        return SetupPerformanceMetrics::default();
    };
    if eligible.is_empty() {
        return SetupPerformanceMetrics::default();
    }

    let ratios: Vec<f64> =
        eligible.iter().map(|lap| lap.record.lap_time_s / best_lap).collect();
    let performance_index = mean(&ratios);
    let consistency_score = population_stddev(&ratios);

    let mut sector_deltas = [None; 3];
    for sector in Sector::ALL {
        let reported: Vec<f64> =
            eligible.iter().filter_map(|lap| sector_time(lap, sector)).collect();
        if let (Some(sector_mean), Some(sector_best)) =
            (mean(&reported), benchmark.best_sector(sector))
        {
            sector_deltas[sector.index()] = Some(sector_mean - sector_best);
        }
    }

    // Ties resolve to the earlier sector in S1 → S2 → S3 order
    let mut weakest_sector = None;
    let mut strongest_sector = None;
    for sector in Sector::ALL {
        let Some(delta) = sector_deltas[sector.index()] else { continue };
        if weakest_sector
            .and_then(|s: Sector| sector_deltas[s.index()])
            .is_none_or(|current| delta > current)
        {
            weakest_sector = Some(sector);
        }
        if strongest_sector
            .and_then(|s: Sector| sector_deltas[s.index()])
            .is_none_or(|current| delta < current)
        {
            strongest_sector = Some(sector);
        }
    }

    SetupPerformanceMetrics {
        lap_count: eligible.len(),
        performance_index,
        consistency_score,
        sector_deltas,
        weakest_sector,
        strongest_sector,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParsedLap;

    fn lap(time: f64, sectors: [Option<f64>; 3]) -> ValidatedLap {
        ValidatedLap {
            record: ParsedLap {
                lap_time_s: time,
                sector1_s: sectors[0],
                sector2_s: sectors[1],
                sector3_s: sectors[2],
                ..ParsedLap::default()
            },
            sort_key: 0.0,
            status: LapStatus::Valid,
            flags: Vec::new(),
        }
    }

    #[test]
    fn benchmark_takes_minima_over_valid_non_pit_laps() {
        let mut pit = lap(28.0, [None, None, None]);
        pit.record.pit_type = "fuel".to_string();
        let mut invalid = lap(-1.0, [None, None, None]);
        invalid.status = LapStatus::Invalid;
        let laps = vec![
            lap(30.0, [Some(9.5), Some(10.2), Some(10.3)]),
            lap(30.5, [Some(9.4), Some(10.5), Some(10.6)]),
            pit,
            invalid,
        ];

        let benchmark = compute_benchmark(&laps);
        assert_eq!(benchmark.best_lap, Some(30.0));
        assert_eq!(benchmark.best_sector1, Some(9.4));
        assert_eq!(benchmark.best_sector2, Some(10.2));
        assert_eq!(benchmark.best_sector3, Some(10.3));
        assert!(benchmark.has_sector_data);
        assert!((benchmark.theoretical_best.unwrap() - 29.9).abs() < 1e-9);
    }

    #[test]
    fn theoretical_best_never_exceeds_best_lap() {
        let laps = vec![
            lap(30.0, [Some(9.5), Some(10.2), Some(10.3)]),
            lap(30.5, [Some(9.4), Some(10.5), Some(10.6)]),
        ];
        let benchmark = compute_benchmark(&laps);
        assert!(benchmark.theoretical_best.unwrap() <= benchmark.best_lap.unwrap());
    }

    #[test]
    fn laps_with_partial_sectors_contribute_independently() {
        let laps = vec![
            lap(30.0, [Some(9.0), None, Some(10.0)]),
            lap(31.0, [Some(9.5), Some(10.5), None]),
        ];
        let benchmark = compute_benchmark(&laps);
        assert_eq!(benchmark.best_sector1, Some(9.0));
        assert_eq!(benchmark.best_sector2, Some(10.5));
        assert_eq!(benchmark.best_sector3, Some(10.0));
        assert!(benchmark.has_sector_data);
    }

    #[test]
    fn missing_sector_column_disables_theoretical_best() {
        let laps = vec![lap(30.0, [Some(9.0), None, None])];
        let benchmark = compute_benchmark(&laps);
        assert!(!benchmark.has_sector_data);
        assert_eq!(benchmark.theoretical_best, None);
    }

    #[test]
    fn empty_dataset_gives_empty_benchmark() {
        let benchmark = compute_benchmark(&[]);
        assert_eq!(benchmark.best_lap, None);
        assert!(!benchmark.has_sector_data);
    }

    #[test]
    fn performance_index_and_population_consistency() {
        let benchmark = TrackBenchmark { best_lap: Some(30.0), ..TrackBenchmark::default() };
        let laps = vec![lap(30.3, [None; 3]), lap(30.6, [None; 3])];
        let refs: Vec<&ValidatedLap> = laps.iter().collect();

        let metrics = setup_performance(&refs, &benchmark);
        assert_eq!(metrics.lap_count, 2);
        assert!((metrics.performance_index.unwrap() - 1.015).abs() < 1e-9);
        // population stddev of [1.01, 1.02], N denominator
        assert!((metrics.consistency_score.unwrap() - 0.005).abs() < 1e-9);
    }

    #[test]
    fn missing_benchmark_best_yields_null_metrics() {
        let laps = vec![lap(30.0, [None; 3])];
        let refs: Vec<&ValidatedLap> = laps.iter().collect();

        let metrics = setup_performance(&refs, &TrackBenchmark::default());
        assert_eq!(metrics, SetupPerformanceMetrics::default());
    }

    #[test]
    fn empty_eligible_subset_yields_null_metrics() {
        let benchmark = TrackBenchmark { best_lap: Some(30.0), ..TrackBenchmark::default() };
        let mut pit = lap(31.0, [None; 3]);
        pit.record.pit_type = "fuel".to_string();
        let laps = vec![pit];
        let refs: Vec<&ValidatedLap> = laps.iter().collect();

        let metrics = setup_performance(&refs, &benchmark);
        assert_eq!(metrics, SetupPerformanceMetrics::default());
    }

    #[test]
    fn weakest_and_strongest_sectors() {
        let benchmark = TrackBenchmark {
            best_lap: Some(30.0),
            best_sector1: Some(9.0),
            best_sector2: Some(10.0),
            best_sector3: Some(10.0),
            theoretical_best: Some(29.0),
            has_sector_data: true,
        };
        // deltas: S1 = 0.5, S2 = 0.1, S3 = 0.9
        let laps = vec![lap(30.5, [Some(9.5), Some(10.1), Some(10.9)])];
        let refs: Vec<&ValidatedLap> = laps.iter().collect();

        let metrics = setup_performance(&refs, &benchmark);
        assert_eq!(metrics.weakest_sector, Some(Sector::S3));
        assert_eq!(metrics.strongest_sector, Some(Sector::S2));
    }

    #[test]
    fn sector_ties_resolve_in_track_order() {
        let benchmark = TrackBenchmark {
            best_lap: Some(30.0),
            best_sector1: Some(9.0),
            best_sector2: Some(10.0),
            best_sector3: Some(10.0),
            theoretical_best: Some(29.0),
            has_sector_data: true,
        };
        // all deltas equal → S1 is both weakest and strongest
        let laps = vec![lap(30.6, [Some(9.2), Some(10.2), Some(10.2)])];
        let refs: Vec<&ValidatedLap> = laps.iter().collect();

        let metrics = setup_performance(&refs, &benchmark);
        assert_eq!(metrics.weakest_sector, Some(Sector::S1));
        assert_eq!(metrics.strongest_sector, Some(Sector::S1));
    }

    #[test]
    fn sector_delta_requires_reporting_laps_and_benchmark_value() {
        let benchmark = TrackBenchmark {
            best_lap: Some(30.0),
            best_sector1: Some(9.0),
            best_sector2: None,
            best_sector3: Some(10.0),
            theoretical_best: None,
            has_sector_data: false,
        };
        // S2 reported but no benchmark value; S3 never reported
        let laps = vec![lap(30.5, [Some(9.5), Some(10.1), None])];
        let refs: Vec<&ValidatedLap> = laps.iter().collect();

        let metrics = setup_performance(&refs, &benchmark);
        assert!(metrics.sector_deltas[0].is_some());
        assert_eq!(metrics.sector_deltas[1], None);
        assert_eq!(metrics.sector_deltas[2], None);
        assert_eq!(metrics.weakest_sector, Some(Sector::S1));
    }
}
