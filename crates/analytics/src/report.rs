use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A ratio that may legitimately be unbounded (e.g. profit factor with no losses).
///
/// Serialized as a plain number, or the string `"inf"` for the unbounded case, so
/// it survives formats such as JSON that have no infinity literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    Finite(f64),
    Infinite,
}

impl Ratio {
    /// `numerator / denominator`, resolving a zero denominator to `Infinite` when
    /// there is something to divide and to `0` when both sides are zero.
    pub fn of(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            if numerator > 0.0 {
                Ratio::Infinite
            } else {
                Ratio::Finite(0.0)
            }
        } else {
            Ratio::Finite(numerator / denominator)
        }
    }

    /// The ratio as a float, with `Infinite` mapped to `f64::INFINITY`.
    pub fn value(&self) -> f64 {
        match self {
            Ratio::Finite(v) => *v,
            Ratio::Infinite => f64::INFINITY,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Ratio::Infinite)
    }
}

impl Default for Ratio {
    fn default() -> Self {
        Ratio::Finite(0.0)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Finite(v) => write!(f, "{:.4}", v),
            Ratio::Infinite => f.write_str("inf"),
        }
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Ratio::Finite(v) => serializer.serialize_f64(*v),
            Ratio::Infinite => serializer.serialize_str("inf"),
        }
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(Ratio::Finite(v)),
            Repr::Text(s) if s.eq_ignore_ascii_case("inf") || s.eq_ignore_ascii_case("infinity") => {
                Ok(Ratio::Infinite)
            }
            Repr::Text(s) => Err(de::Error::custom(format!("invalid ratio '{}'", s))),
        }
    }
}

/// A comprehensive, standardized snapshot of a trade list's performance.
///
/// This struct is the final output of the `AnalyticsEngine`. It is always computed
/// fresh from a trade list and never patched in place. Percent-based statistics
/// (Sharpe through Treynor) are computed over per-trade `pnl_percentage`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    // I. Counts
    pub total_trades: usize,
    pub winners: usize,
    pub losers: usize,
    pub breakeven: usize,

    // II. Profitability (capital units)
    pub total_pnl: f64,
    pub gross_profit: f64,
    /// Absolute value of the summed losses.
    pub gross_loss: f64,
    pub win_rate: f64,
    pub profit_factor: Ratio,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub payoff_ratio: f64,
    pub expectancy: f64,
    pub largest_win: f64,
    pub largest_loss: f64,

    // III. Risk-adjusted return
    pub annualized_return_pct: f64,
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
    pub omega_ratio: Ratio,

    // IV. Tail risk and sizing
    pub var_95: f64,
    pub var_99: f64,
    pub cvar_95: f64,
    pub kelly_pct: f64,

    // V. Benchmark-relative (zero without a benchmark)
    pub beta: f64,
    pub alpha: f64,
    pub information_ratio: f64,
    pub treynor_ratio: f64,

    // VI. Behaviour
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    #[serde(with = "humantime_serde")]
    pub average_holding_period: Duration,
}

impl MetricsSnapshot {
    /// Creates a new, zeroed-out snapshot, the result for an empty trade list.
    pub fn new() -> Self {
        Self::default()
    }
}
