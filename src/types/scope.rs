//! Analysis scope specification.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A virtual filter over the canonical dataset: entity identifiers, driver
/// names and lane numbers, AND-combined per axis.
///
/// An empty constraint set means "no restriction on that axis", not "exclude
/// everything". The engine treats `enabled == false` as "no filtering"
/// regardless of set contents; keeping `enabled` false while all three sets
/// are empty is the caller's responsibility.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct AnalysisScope {
    /// Entity identifiers, matched against car model or team number
    pub entities: HashSet<String>,
    /// Driver names
    pub drivers: HashSet<String>,
    /// Lane / track-position numbers
    pub lanes: HashSet<u32>,
    /// Whether the scope is applied at all
    pub enabled: bool,
}

impl AnalysisScope {
    /// Scope restricted to a set of drivers.
    pub fn for_drivers<I, S>(drivers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            drivers: drivers.into_iter().map(Into::into).collect(),
            enabled: true,
            ..Self::default()
        }
    }

    /// Whether all three constraint sets are empty.
    pub fn is_unconstrained(&self) -> bool {
        self.entities.is_empty() && self.drivers.is_empty() && self.lanes.is_empty()
    }
}
