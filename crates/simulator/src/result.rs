use crate::scenario::SimulationScenario;
use serde::Serialize;

/// Summary statistics and raw paths of one Monte Carlo run.
///
/// All monetary fields are in the units of `initial_capital`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    // --- Inputs ---
    pub scenario: SimulationScenario,
    pub initial_capital: f64,
    pub horizon_days: usize,
    pub path_count: usize,
    pub seed: u64,

    // --- Outcome ---
    pub expected_return_pct: f64,
    /// Mean of the per-path maximum drawdowns.
    pub max_drawdown_pct: f64,
    /// 5th percentile of final equity.
    pub var_95: f64,
    pub probability_of_loss_pct: f64,
    pub best_case: f64,
    pub worst_case: f64,
    pub median_final_equity: f64,

    /// One equity series per path, each `horizon_days + 1` long.
    pub paths: Vec<Vec<f64>>,
}

impl SimulationResult {
    pub fn final_equities(&self) -> impl Iterator<Item = f64> + '_ {
        self.paths.iter().filter_map(|p| p.last().copied())
    }
}
