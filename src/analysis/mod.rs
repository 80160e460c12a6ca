//! Read-only analysis over the canonical dataset.
//!
//! Every function here is a deterministic pure function of a validated lap
//! set plus caller-chosen parameters (scope, pit-inclusion, window). Nothing
//! mutates the dataset; everything may be discarded and recomputed at any
//! time.

pub mod benchmark;
pub mod cache;
pub mod downsample;
pub mod kpi;
pub mod scope;

pub use benchmark::{compute_benchmark, setup_performance};
pub use cache::{
    DEFAULT_MAX_PACE_POINTS, DEFAULT_PACE_WINDOW_S, build_session_cache, rolling_pace,
};
pub use downsample::downsample_lttb;
pub use kpi::compute_kpis;
pub use scope::{apply_scope, compare_contexts};
