use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; missing sections fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub simulation: SimulationDefaults,
    /// Scenario profiles keyed by name. Entries here override the built-in
    /// profiles of the same name or add new ones.
    #[serde(default)]
    pub scenarios: HashMap<String, ScenarioParams>,
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Contains parameters for the tracing subscriber.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// Default filter directive, e.g. "info" or "analytics=debug". `RUST_LOG` wins when set.
    pub level: String,
    pub format: LogFormat,
    /// When set, log lines are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            directory: None,
        }
    }
}

/// Default inputs for a Monte Carlo run when the caller does not override them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationDefaults {
    /// The starting capital for every simulated path.
    pub initial_capital: f64,
    /// Number of trading days to project.
    pub horizon_days: usize,
    /// Number of independent paths to generate.
    pub path_count: usize,
    /// Seed for the per-path random streams.
    pub seed: u64,
}

impl Default for SimulationDefaults {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            horizon_days: 252,
            path_count: 100,
            seed: 42,
        }
    }
}

/// Daily drift and volatility of a named scenario profile.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScenarioParams {
    pub daily_drift: f64,
    pub daily_volatility: f64,
}
