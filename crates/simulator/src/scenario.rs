use crate::error::SimulationConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Names of the built-in market profiles, in display order.
pub const PRESET_NAMES: [&str; 5] = ["bull", "bear", "sideways", "high-volatility", "crash"];

/// A market regime expressed as the mean and standard deviation of daily returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationScenario {
    pub name: String,
    pub daily_drift: f64,
    pub daily_volatility: f64,
}

impl SimulationScenario {
    pub fn new(name: impl Into<String>, daily_drift: f64, daily_volatility: f64) -> Self {
        Self {
            name: name.into(),
            daily_drift,
            daily_volatility,
        }
    }

    /// Looks up a built-in profile by name (case-insensitive).
    pub fn preset(name: &str) -> Option<Self> {
        let (drift, volatility) = match name.to_ascii_lowercase().as_str() {
            "bull" => (0.0008, 0.012),
            "bear" => (-0.0006, 0.018),
            "sideways" => (0.0, 0.010),
            "high-volatility" => (0.0002, 0.035),
            "crash" => (-0.004, 0.050),
            _ => return None,
        };
        Some(Self::new(name.to_ascii_lowercase(), drift, volatility))
    }

    pub fn presets() -> Vec<Self> {
        PRESET_NAMES.iter().filter_map(|n| Self::preset(n)).collect()
    }

    /// Checks the return distribution parameters.
    pub fn validate(&self) -> Result<(), SimulationConfigError> {
        if !self.daily_drift.is_finite() {
            return Err(SimulationConfigError::InvalidDrift(self.daily_drift));
        }
        if !self.daily_volatility.is_finite() || self.daily_volatility < 0.0 {
            return Err(SimulationConfigError::InvalidVolatility(self.daily_volatility));
        }
        Ok(())
    }
}

impl FromStr for SimulationScenario {
    type Err = SimulationConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::preset(s).ok_or_else(|| SimulationConfigError::UnknownScenario(s.to_string()))
    }
}

impl fmt::Display for SimulationScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (drift {:+.4}%/day, volatility {:.4}%/day)",
            self.name,
            self.daily_drift * 100.0,
            self.daily_volatility * 100.0
        )
    }
}
