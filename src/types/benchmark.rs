//! Track benchmark and setup performance value objects.

use serde::{Deserialize, Serialize};

/// Sector label, in track order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    S1,
    S2,
    S3,
}

impl Sector {
    /// All sectors in stable S1 → S2 → S3 iteration order.
    pub const ALL: [Sector; 3] = [Sector::S1, Sector::S2, Sector::S3];

    /// Zero-based index of this sector.
    pub fn index(self) -> usize {
        match self {
            Sector::S1 => 0,
            Sector::S2 => 1,
            Sector::S3 => 2,
        }
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sector::S1 => write!(f, "S1"),
            Sector::S2 => write!(f, "S2"),
            Sector::S3 => write!(f, "S3"),
        }
    }
}

/// Session-wide reference values, computed once per unscoped dataset from
/// validated non-pit laps.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TrackBenchmark {
    /// Fastest valid non-pit lap in seconds
    pub best_lap: Option<f64>,
    /// Fastest first sector across laps that report it
    pub best_sector1: Option<f64>,
    /// Fastest second sector across laps that report it
    pub best_sector2: Option<f64>,
    /// Fastest third sector across laps that report it
    pub best_sector3: Option<f64>,
    /// Sum of the three sector bests; only set when `has_sector_data`
    pub theoretical_best: Option<f64>,
    /// Whether every sector has at least one reporting lap
    pub has_sector_data: bool,
}

impl TrackBenchmark {
    /// Sector best by label.
    pub fn best_sector(&self, sector: Sector) -> Option<f64> {
        match sector {
            Sector::S1 => self.best_sector1,
            Sector::S2 => self.best_sector2,
            Sector::S3 => self.best_sector3,
        }
    }
}

/// A lap subset's performance expressed as ratios against a
/// [`TrackBenchmark`].
///
/// All outputs are `None`/zero when the subset has no valid non-pit laps or
/// the benchmark carries no best lap; that is an expected state, not an
/// error.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SetupPerformanceMetrics {
    /// Number of valid non-pit laps analyzed
    pub lap_count: usize,
    /// Mean of lap-time ÷ benchmark-best-lap ratios; 1.0 = benchmark pace
    pub performance_index: Option<f64>,
    /// Population standard deviation of the normalized ratios (N denominator)
    pub consistency_score: Option<f64>,
    /// Mean sector time minus benchmark sector best, indexed S1, S2, S3
    pub sector_deltas: [Option<f64>; 3],
    /// Sector with the largest computed delta
    pub weakest_sector: Option<Sector>,
    /// Sector with the smallest computed delta
    pub strongest_sector: Option<Sector>,
}
