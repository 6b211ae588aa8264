//! # TradeLens Risk Simulator
//!
//! Forward-looking Monte Carlo projections of an account under a chosen market
//! regime. Each path is a daily multiplicative random walk with Normally
//! distributed returns.
//!
//! Runs are fully reproducible: the same scenario, inputs and seed always yield a
//! bit-identical `SimulationResult`.

pub mod error;
pub mod monte_carlo;
pub mod result;
pub mod scenario;

pub use error::SimulationConfigError;
pub use monte_carlo::{simulate, DEFAULT_HORIZON_DAYS, DEFAULT_PATH_COUNT};
pub use result::SimulationResult;
pub use scenario::{SimulationScenario, PRESET_NAMES};
