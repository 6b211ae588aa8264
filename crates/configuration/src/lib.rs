use crate::error::ConfigError;
use config::{Environment, File};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError as Error;
pub use logging::init_tracing;
pub use settings::{LogFormat, Logging, ScenarioParams, Settings, SimulationDefaults};

/// Default file stem looked up in the working directory when no path is given.
const DEFAULT_CONFIG_NAME: &str = "tradelens";

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads `path` if given (must exist), otherwise an optional `tradelens.toml`.
/// 2. Merges settings from environment variables (e.g. `TRADELENS__SIMULATION__SEED=7`).
///
/// Anything left unset falls back to the defaults in `settings`.
pub fn load_config(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix("TRADELENS")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    validate(&settings)?;

    tracing::debug!(
        scenarios = settings.scenarios.len(),
        horizon_days = settings.simulation.horizon_days,
        path_count = settings.simulation.path_count,
        "Configuration loaded"
    );

    Ok(settings)
}

/// Rejects settings that would make every downstream operation fail.
pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    let sim = &settings.simulation;
    if !(sim.initial_capital.is_finite() && sim.initial_capital > 0.0) {
        return Err(ConfigError::ValidationError(format!(
            "simulation.initial_capital must be positive, got {}",
            sim.initial_capital
        )));
    }
    if sim.horizon_days < 1 {
        return Err(ConfigError::ValidationError(
            "simulation.horizon_days must be at least 1".to_string(),
        ));
    }
    if sim.path_count < 1 {
        return Err(ConfigError::ValidationError(
            "simulation.path_count must be at least 1".to_string(),
        ));
    }

    for (name, params) in &settings.scenarios {
        if !params.daily_drift.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "scenarios.{}.daily_drift must be finite",
                name
            )));
        }
        if !(params.daily_volatility.is_finite() && params.daily_volatility >= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "scenarios.{}.daily_volatility must be a non-negative number, got {}",
                name, params.daily_volatility
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_apply_to_an_empty_file() {
        let file = write_config("");
        let settings = load_config(Some(file.path())).unwrap();

        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, LogFormat::Pretty);
        assert_eq!(settings.simulation.horizon_days, 252);
        assert_eq!(settings.simulation.path_count, 100);
        assert!(settings.scenarios.is_empty());
    }

    #[test]
    fn reads_sections_and_scenarios() {
        let file = write_config(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [simulation]
            initial_capital = 50000.0
            horizon_days = 60
            path_count = 500
            seed = 7

            [scenarios.melt_up]
            daily_drift = 0.004
            daily_volatility = 0.01
            "#,
        );
        let settings = load_config(Some(file.path())).unwrap();

        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.simulation.initial_capital, 50_000.0);
        assert_eq!(settings.simulation.seed, 7);
        let melt_up = settings.scenarios.get("melt_up").unwrap();
        assert_eq!(melt_up.daily_drift, 0.004);
    }

    #[test]
    fn rejects_invalid_simulation_defaults() {
        let file = write_config("[simulation]\npath_count = 0\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn rejects_negative_scenario_volatility() {
        let file = write_config("[scenarios.broken]\ndaily_drift = 0.0\ndaily_volatility = -0.1\n");
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("scenarios.broken"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config(Some(Path::new("/definitely/not/here/tradelens.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}
