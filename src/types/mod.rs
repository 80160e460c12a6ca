//! Core types for lap telemetry analytics.
//!
//! The type system follows the pipeline's two-stage record design:
//! - [`ParsedLap`] is the immutable canonical record produced by ingestion
//! - [`ValidatedLap`] wraps it with the derived sort key, status and flags
//! - [`AnalysisScope`] describes a virtual filter over the canonical set
//! - [`KpiData`], [`TrackBenchmark`], [`SetupPerformanceMetrics`],
//!   [`SessionCache`] and [`PacePoint`] are the derived result values
//!
//! All result types are plain serializable values with no hidden state; a
//! caller may discard and recompute any of them at any time.

mod benchmark;
mod cache;
mod kpi;
mod record;
mod scope;

pub use benchmark::{Sector, SetupPerformanceMetrics, TrackBenchmark};
pub use cache::{DriverRollup, PacePoint, SessionCache, StintRollup};
pub use kpi::{KpiData, ScopeComparison};
pub use record::{LapFlag, LapStatus, ParsedLap, ValidatedLap};
pub use scope::AnalysisScope;
