//! Scope filtering and dual-context comparison.
//!
//! A scope is applied as a reference list over the canonical array — the
//! canonical dataset is never copied or mutated. Consumers of a scoped view
//! must not assume its positions correspond to canonical indices.

use super::kpi;
use crate::types::{AnalysisScope, ScopeComparison, ValidatedLap};

/// Whether one record passes an enabled scope. The three axes are
/// AND-combined; an empty set places no restriction on its axis.
fn matches_scope(lap: &ValidatedLap, scope: &AnalysisScope) -> bool {
    let driver_ok = scope.drivers.is_empty() || scope.drivers.contains(&lap.record.driver);

    let entity_ok = scope.entities.is_empty()
        || scope.entities.contains(&lap.record.car_model)
        || lap
            .record
            .team_number
            .is_some_and(|team| scope.entities.contains(&team.to_string()));

    // Lane constraint only applies to records that carry a lane
    let lane_ok = scope.lanes.is_empty()
        || match lap.record.lane {
            Some(lane) => scope.lanes.contains(&lane),
            None => true,
        };

    driver_ok && entity_ok && lane_ok
}

/// Produce the virtual subset of `laps` selected by `scope`.
///
/// A disabled scope returns every record unchanged, regardless of set
/// contents.
pub fn apply_scope<'a>(laps: &'a [ValidatedLap], scope: &AnalysisScope) -> Vec<&'a ValidatedLap> {
    if !scope.enabled {
        return laps.iter().collect();
    }
    laps.iter().filter(|lap| matches_scope(lap, scope)).collect()
}

/// Run the metrics engine in both contexts — scoped and global — and derive
/// the relative deltas. `None` unless the scope is enabled and the dataset
/// non-empty.
pub fn compare_contexts(
    laps: &[ValidatedLap],
    scope: &AnalysisScope,
    include_pit_laps: bool,
) -> Option<ScopeComparison> {
    if !scope.enabled || laps.is_empty() {
        return None;
    }

    let scoped_laps = apply_scope(laps, scope);
    let all: Vec<&ValidatedLap> = laps.iter().collect();

    let scoped = kpi::compute_kpis(&scoped_laps, include_pit_laps);
    let global = kpi::compute_kpis(&all, include_pit_laps);

    let relative_pace = scoped.average_pace.zip(global.average_pace).map(|(s, g)| s - g);
    let relative_consistency = scoped.consistency.zip(global.consistency).map(|(s, g)| s - g);
    let lap_count_ratio = format!("{} / {}", scoped.total_laps, global.total_laps);

    Some(ScopeComparison { relative_pace, relative_consistency, lap_count_ratio, scoped, global })
}
