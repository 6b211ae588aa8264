use crate::error::SimulationConfigError;
use crate::result::SimulationResult;
use crate::scenario::SimulationScenario;
use analytics::DrawdownTracker;
use analytics::stats::{mean, percentile};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use tracing::{debug, info};

pub const DEFAULT_HORIZON_DAYS: usize = 252;
pub const DEFAULT_PATH_COUNT: usize = 100;

/// Golden-ratio increment; spreads consecutive path indices across the seed space.
const PATH_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

struct SimulatedPath {
    equity: Vec<f64>,
    max_drawdown_pct: f64,
}

/// Runs `path_count` independent multiplicative random walks of `horizon_days` steps.
///
/// Every path draws from its own `StdRng`, seeded from `seed` and the path index,
/// so the output is bit-identical for the same inputs regardless of how rayon
/// schedules the work.
pub fn simulate(
    scenario: &SimulationScenario,
    initial_capital: f64,
    horizon_days: usize,
    path_count: usize,
    seed: u64,
) -> Result<SimulationResult, SimulationConfigError> {
    if !initial_capital.is_finite() || initial_capital <= 0.0 {
        return Err(SimulationConfigError::InvalidCapital(initial_capital));
    }
    if path_count < 1 {
        return Err(SimulationConfigError::InvalidPathCount(path_count));
    }
    if horizon_days < 1 {
        return Err(SimulationConfigError::InvalidHorizon(horizon_days));
    }
    scenario.validate()?;

    let returns = Normal::new(scenario.daily_drift, scenario.daily_volatility)
        .map_err(|_| SimulationConfigError::InvalidVolatility(scenario.daily_volatility))?;

    debug!(
        scenario = %scenario.name,
        initial_capital,
        horizon_days,
        path_count,
        seed,
        "Starting Monte Carlo run"
    );

    let simulated: Vec<SimulatedPath> = (0..path_count)
        .into_par_iter()
        .map(|index| simulate_path(&returns, initial_capital, horizon_days, path_seed(seed, index)))
        .collect();

    let finals: Vec<f64> = simulated
        .iter()
        .filter_map(|p| p.equity.last().copied())
        .collect();
    let drawdowns: Vec<f64> = simulated.iter().map(|p| p.max_drawdown_pct).collect();
    let losing_paths = finals.iter().filter(|&&f| f < initial_capital).count();

    let worst_case = percentile(&finals, 5.0);
    let result = SimulationResult {
        scenario: scenario.clone(),
        initial_capital,
        horizon_days,
        path_count,
        seed,
        expected_return_pct: (mean(&finals) - initial_capital) / initial_capital * 100.0,
        max_drawdown_pct: mean(&drawdowns),
        var_95: worst_case,
        probability_of_loss_pct: losing_paths as f64 / path_count as f64 * 100.0,
        best_case: percentile(&finals, 95.0),
        worst_case,
        median_final_equity: percentile(&finals, 50.0),
        paths: simulated.into_iter().map(|p| p.equity).collect(),
    };

    info!(
        scenario = %scenario.name,
        expected_return_pct = result.expected_return_pct,
        probability_of_loss_pct = result.probability_of_loss_pct,
        "Monte Carlo run complete"
    );
    Ok(result)
}

fn path_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64).wrapping_add(1).wrapping_mul(PATH_SEED_STRIDE)
}

fn simulate_path(
    returns: &Normal<f64>,
    initial_capital: f64,
    horizon_days: usize,
    seed: u64,
) -> SimulatedPath {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut tracker = DrawdownTracker::new(initial_capital);
    let mut equity = Vec::with_capacity(horizon_days + 1);
    let mut current = initial_capital;
    equity.push(current);

    for _ in 0..horizon_days {
        current *= 1.0 + returns.sample(&mut rng);
        tracker.update(current);
        equity.push(current);
    }

    SimulatedPath {
        equity,
        max_drawdown_pct: tracker.max_drawdown_pct(),
    }
}
