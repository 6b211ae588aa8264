use crate::equity::{build_equity_curve, chronological};
use crate::report::{MetricsSnapshot, Ratio};
use crate::stats::{covariance, mean, percentile, std_dev, variance};
use core_types::TradeRecord;
use std::time::Duration;

/// Trading periods per year used to annualize per-trade statistics.
pub const PERIODS_PER_YEAR: f64 = 252.0;

/// A stateless calculator for deriving performance metrics from a trade list.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating performance metrics.
    ///
    /// # Arguments
    ///
    /// * `trades` - The normalized trades, in any order.
    /// * `benchmark` - Optional benchmark returns (percent), aligned by position with
    ///   the trades in exit-time order.
    ///
    /// Numeric edge cases resolve to the sentinels documented on `MetricsSnapshot`,
    /// so this never fails.
    pub fn calculate(&self, trades: &[TradeRecord], benchmark: Option<&[f64]>) -> MetricsSnapshot {
        let mut report = MetricsSnapshot::new();

        if trades.is_empty() {
            // If there are no trades, every metric is zero.
            return report;
        }

        let ordered = chronological(trades);
        let returns: Vec<f64> = ordered.iter().map(|t| t.pnl_percentage()).collect();

        self.calculate_profitability(trades, &mut report);
        self.calculate_drawdown(trades, &mut report);
        self.calculate_ratios(&returns, &mut report);
        self.calculate_tail_risk(&returns, &mut report);
        self.calculate_kelly(&mut report);
        self.calculate_benchmark_relative(&returns, benchmark, &mut report);
        self.calculate_streaks(&ordered, &mut report);
        self.calculate_time_metrics(trades, &mut report);

        tracing::debug!(
            total_trades = report.total_trades,
            win_rate = report.win_rate,
            sharpe = report.sharpe_ratio,
            max_drawdown_pct = report.max_drawdown_pct,
            "Computed metrics snapshot"
        );

        report
    }

    /// Counts, gross figures and the ratios derived directly from them.
    fn calculate_profitability(&self, trades: &[TradeRecord], report: &mut MetricsSnapshot) {
        report.total_trades = trades.len();

        for trade in trades {
            let pnl = trade.pnl();
            report.total_pnl += pnl;

            if pnl > 0.0 {
                report.gross_profit += pnl;
                report.winners += 1;
                report.largest_win = report.largest_win.max(pnl);
            } else if pnl < 0.0 {
                report.gross_loss += pnl.abs();
                report.losers += 1;
                report.largest_loss = report.largest_loss.min(pnl);
            } else {
                report.breakeven += 1;
            }
        }

        report.profit_factor = Ratio::of(report.gross_profit, report.gross_loss);
        report.win_rate = report.winners as f64 / report.total_trades as f64 * 100.0;
        report.expectancy = report.total_pnl / report.total_trades as f64;

        if report.winners > 0 {
            report.avg_win = report.gross_profit / report.winners as f64;
        }
        if report.losers > 0 {
            report.avg_loss = report.gross_loss / report.losers as f64;
            report.payoff_ratio = report.avg_win / report.avg_loss;
        }
    }

    /// Maximum drawdown of the exit-time-ordered equity curve.
    fn calculate_drawdown(&self, trades: &[TradeRecord], report: &mut MetricsSnapshot) {
        report.max_drawdown_pct = build_equity_curve(trades).max_drawdown_pct;
    }

    /// Sharpe, Sortino, Calmar and Omega over per-trade percent returns.
    fn calculate_ratios(&self, returns: &[f64], report: &mut MetricsSnapshot) {
        let mean_return = mean(returns);
        let annualizer = PERIODS_PER_YEAR.sqrt();

        let sd = std_dev(returns);
        if sd > 0.0 {
            report.sharpe_ratio = mean_return / sd * annualizer;
        }

        let negatives: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
        let downside_sd = std_dev(&negatives);
        if downside_sd > 0.0 {
            report.sortino_ratio = mean_return / downside_sd * annualizer;
        }

        report.annualized_return_pct = mean_return * PERIODS_PER_YEAR;
        if report.max_drawdown_pct != 0.0 {
            report.calmar_ratio = report.annualized_return_pct / report.max_drawdown_pct.abs();
        }

        let upside: f64 = returns.iter().filter(|r| **r > 0.0).sum();
        let downside: f64 = returns.iter().filter(|r| **r < 0.0).map(|r| r.abs()).sum();
        report.omega_ratio = Ratio::of(upside, downside);
    }

    /// Historical VaR at 95% / 99% and the expected shortfall beyond VaR 95.
    fn calculate_tail_risk(&self, returns: &[f64], report: &mut MetricsSnapshot) {
        report.var_95 = percentile(returns, 5.0);
        report.var_99 = percentile(returns, 1.0);

        let tail: Vec<f64> = returns.iter().copied().filter(|r| *r <= report.var_95).collect();
        report.cvar_95 = mean(&tail);
    }

    /// Kelly fraction in percent, clamped to `[0, 100]`.
    fn calculate_kelly(&self, report: &mut MetricsSnapshot) {
        if report.avg_loss == 0.0 || report.avg_win == 0.0 {
            return;
        }
        let win_fraction = report.win_rate / 100.0;
        let payoff = report.avg_win / report.avg_loss;
        let kelly = win_fraction - (1.0 - win_fraction) / payoff;
        report.kelly_pct = (kelly * 100.0).clamp(0.0, 100.0);
    }

    /// Beta, alpha, information ratio and Treynor against an index-aligned benchmark.
    fn calculate_benchmark_relative(
        &self,
        returns: &[f64],
        benchmark: Option<&[f64]>,
        report: &mut MetricsSnapshot,
    ) {
        let Some(benchmark) = benchmark.filter(|b| !b.is_empty()) else {
            return;
        };

        let n = returns.len().min(benchmark.len());
        if returns.len() != benchmark.len() {
            tracing::warn!(
                trades = returns.len(),
                benchmark = benchmark.len(),
                aligned = n,
                "Benchmark length differs from trade count; using the common prefix"
            );
        }
        let (strategy, benchmark) = (&returns[..n], &benchmark[..n]);

        let benchmark_variance = variance(benchmark);
        if benchmark_variance > 0.0 {
            report.beta = covariance(strategy, benchmark) / benchmark_variance;
        }
        report.alpha = mean(strategy) - report.beta * mean(benchmark);

        let excess: Vec<f64> = strategy.iter().zip(benchmark).map(|(s, b)| s - b).collect();
        let mean_excess = mean(&excess);
        let excess_sd = std_dev(&excess);
        if excess_sd > 0.0 {
            report.information_ratio = mean_excess / excess_sd;
        }
        if report.beta != 0.0 {
            report.treynor_ratio = mean_excess / report.beta;
        }
    }

    /// Longest runs of consecutive winners and losers in exit-time order.
    /// A breakeven trade interrupts both.
    fn calculate_streaks(&self, ordered: &[&TradeRecord], report: &mut MetricsSnapshot) {
        let (mut wins, mut losses) = (0usize, 0usize);

        for trade in ordered {
            if trade.is_winner() {
                wins += 1;
                losses = 0;
            } else if trade.is_loser() {
                losses += 1;
                wins = 0;
            } else {
                wins = 0;
                losses = 0;
            }
            report.max_consecutive_wins = report.max_consecutive_wins.max(wins);
            report.max_consecutive_losses = report.max_consecutive_losses.max(losses);
        }
    }

    /// Calculates time-based metrics.
    fn calculate_time_metrics(&self, trades: &[TradeRecord], report: &mut MetricsSnapshot) {
        // Summed in i128: tens of thousands of multi-millennium holds overflow i64 millis.
        let total_millis: i128 = trades
            .iter()
            .map(|t| i128::from(t.holding_period().num_milliseconds().max(0)))
            .sum();

        let avg_millis = total_millis / trades.len() as i128;
        report.average_holding_period =
            Duration::from_millis(u64::try_from(avg_millis).unwrap_or(u64::MAX));
    }
}
