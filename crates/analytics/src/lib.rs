//! # TradeLens Analytics Engine
//!
//! This crate turns a normalized trade list into performance and risk figures. It
//! acts as the "unbiased judge" of a strategy's track record.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O and no knowledge of where trades come from. It depends
//!   only on `core-types`.
//! - **Stateless calculation:** every entry point takes trades in and returns a fresh
//!   value. Caching is opt-in and caller-held (`SnapshotCache`).
//! - **Infallible once ingested:** numeric edge cases (empty series, zero variance,
//!   zero denominators) resolve to documented sentinels instead of errors.
//!
//! ## Public API
//!
//! - `compute_metrics` / `AnalyticsEngine`: the `MetricsSnapshot` calculator.
//! - `build_equity_curve`: the exit-time-ordered cumulative P&L and drawdown series.
//! - `aggregate_time_buckets`, `best_windows`, `worst_windows`: time-of-week analysis.
//! - `DrawdownTracker`: the peak/drawdown step, reused by the simulator.

// Declare the modules that constitute this crate.
pub mod buckets;
pub mod cache;
pub mod engine;
pub mod equity;
pub mod report;
pub mod stats;

// Re-export the key components to create a clean, public-facing API.
pub use buckets::{aggregate_time_buckets, best_windows, worst_windows, TimeBucket};
pub use cache::{input_digest, SnapshotCache};
pub use engine::{AnalyticsEngine, PERIODS_PER_YEAR};
pub use equity::{
    build_equity_curve, build_equity_curve_with_benchmark, chronological, DrawdownTracker,
    EquityCurve,
};
pub use report::{MetricsSnapshot, Ratio};

use core_types::TradeRecord;

/// Computes a fresh `MetricsSnapshot` for `trades`.
pub fn compute_metrics(trades: &[TradeRecord], benchmark: Option<&[f64]>) -> MetricsSnapshot {
    AnalyticsEngine::new().calculate(trades, benchmark)
}
