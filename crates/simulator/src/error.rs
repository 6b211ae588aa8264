use crate::scenario::PRESET_NAMES;
use thiserror::Error;

/// Rejected simulation inputs. Each variant names the offending parameter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationConfigError {
    #[error("initial_capital must be a positive finite number, got {0}")]
    InvalidCapital(f64),

    #[error("path_count must be at least 1, got {0}")]
    InvalidPathCount(usize),

    #[error("horizon_days must be at least 1, got {0}")]
    InvalidHorizon(usize),

    #[error("daily_drift must be finite, got {0}")]
    InvalidDrift(f64),

    #[error("daily_volatility must be a non-negative finite number, got {0}")]
    InvalidVolatility(f64),

    #[error("Unknown scenario '{0}'. Expected one of: {names}", names = PRESET_NAMES.join(", "))]
    UnknownScenario(String),
}

impl SimulationConfigError {
    /// The name of the parameter that failed validation.
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::InvalidCapital(_) => "initial_capital",
            Self::InvalidPathCount(_) => "path_count",
            Self::InvalidHorizon(_) => "horizon_days",
            Self::InvalidDrift(_) => "daily_drift",
            Self::InvalidVolatility(_) => "daily_volatility",
            Self::UnknownScenario(_) => "scenario",
        }
    }
}
