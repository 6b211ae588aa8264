use core_types::{EquityPoint, TradeRecord};
use serde::{Deserialize, Serialize};

/// Running peak and drawdown over a sequence of equity values.
///
/// Shared by the historical curve builder and the Monte Carlo simulator so both
/// measure drawdown the same way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawdownTracker {
    peak: f64,
    max_drawdown: f64,
    max_drawdown_pct: f64,
}

impl DrawdownTracker {
    /// Starts tracking with `start` as the initial peak.
    pub fn new(start: f64) -> Self {
        Self {
            peak: start,
            max_drawdown: 0.0,
            max_drawdown_pct: 0.0,
        }
    }

    /// Folds in the next equity value and returns its drawdown in percent.
    ///
    /// Drawdown is measured against a positive peak only; while the peak is at or
    /// below zero the drawdown is `0`.
    pub fn update(&mut self, equity: f64) -> f64 {
        self.peak = self.peak.max(equity);
        let drawdown_pct = if self.peak > 0.0 {
            (self.peak - equity) / self.peak * 100.0
        } else {
            0.0
        };

        self.max_drawdown_pct = self.max_drawdown_pct.max(drawdown_pct);
        if self.peak > 0.0 {
            self.max_drawdown = self.max_drawdown.max(self.peak - equity);
        }
        drawdown_pct
    }

    pub fn peak(&self) -> f64 {
        self.peak
    }

    /// Largest drawdown seen so far, in the units of the tracked values.
    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }

    pub fn max_drawdown_pct(&self) -> f64 {
        self.max_drawdown_pct
    }
}

/// The cumulative P&L curve of a trade list, in exit-time order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EquityCurve {
    pub points: Vec<EquityPoint>,
    pub max_drawdown_pct: f64,
    /// Largest peak-to-trough decline in P&L units.
    pub max_drawdown: f64,
    pub final_equity: f64,
}

/// Returns the trades ordered by exit time without touching the caller's slice.
///
/// The sort is stable: trades closing at the same instant keep their input order.
pub fn chronological(trades: &[TradeRecord]) -> Vec<&TradeRecord> {
    let mut ordered: Vec<&TradeRecord> = trades.iter().collect();
    ordered.sort_by_key(|t| t.exit_time());
    ordered
}

/// Builds the equity curve starting from zero cumulative P&L.
pub fn build_equity_curve(trades: &[TradeRecord]) -> EquityCurve {
    build_equity_curve_with_benchmark(trades, None)
}

/// Builds the equity curve and, when a benchmark return series is supplied, attaches
/// its cumulative value to each point by position. Points past the end of the
/// benchmark carry no benchmark value.
pub fn build_equity_curve_with_benchmark(
    trades: &[TradeRecord],
    benchmark: Option<&[f64]>,
) -> EquityCurve {
    let mut tracker = DrawdownTracker::new(0.0);
    let mut running_equity = 0.0;
    let mut benchmark_total = 0.0;
    let mut points = Vec::with_capacity(trades.len());

    for (i, trade) in chronological(trades).into_iter().enumerate() {
        running_equity += trade.pnl();
        let drawdown_pct = tracker.update(running_equity);

        let benchmark_value = benchmark.and_then(|b| b.get(i)).map(|r| {
            benchmark_total += r;
            benchmark_total
        });

        points.push(EquityPoint {
            timestamp: trade.exit_time(),
            equity: running_equity,
            peak_to_date: tracker.peak(),
            drawdown_pct,
            benchmark: benchmark_value,
        });
    }

    tracing::debug!(
        points = points.len(),
        max_drawdown_pct = tracker.max_drawdown_pct(),
        "Built equity curve"
    );

    EquityCurve {
        points,
        max_drawdown_pct: tracker.max_drawdown_pct(),
        max_drawdown: tracker.max_drawdown(),
        final_equity: running_equity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use core_types::TradeSide;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()
    }

    fn trade(symbol: &str, pnl: f64, exit_day: u32) -> TradeRecord {
        TradeRecord::new(symbol, TradeSide::Buy, 100.0, 100.0, 1.0, day(1), day(exit_day), Some(pnl))
    }

    #[test]
    fn peaks_and_drawdowns_follow_cumulative_pnl() {
        // Cumulative equity: 100, 150, 120, 180
        let trades = vec![
            trade("A", 100.0, 2),
            trade("B", 50.0, 3),
            trade("C", -30.0, 4),
            trade("D", 60.0, 5),
        ];
        let curve = build_equity_curve(&trades);

        let equity: Vec<f64> = curve.points.iter().map(|p| p.equity).collect();
        let peaks: Vec<f64> = curve.points.iter().map(|p| p.peak_to_date).collect();
        let drawdowns: Vec<f64> = curve.points.iter().map(|p| p.drawdown_pct).collect();

        assert_eq!(equity, vec![100.0, 150.0, 120.0, 180.0]);
        assert_eq!(peaks, vec![100.0, 150.0, 150.0, 180.0]);
        assert_eq!(drawdowns, vec![0.0, 0.0, 20.0, 0.0]);
        assert_eq!(curve.max_drawdown_pct, 20.0);
        assert_eq!(curve.max_drawdown, 30.0);
        assert_eq!(curve.final_equity, 180.0);
    }

    #[test]
    fn orders_by_exit_time_without_mutating_input() {
        let trades = vec![trade("late", -30.0, 9), trade("early", 100.0, 2)];
        let curve = build_equity_curve(&trades);

        assert_eq!(curve.points[0].timestamp, day(2));
        assert_eq!(curve.points[1].drawdown_pct, 30.0);
        assert_eq!(trades[0].symbol(), "late");
    }

    #[test]
    fn ties_keep_input_order() {
        let trades = vec![trade("first", 10.0, 3), trade("second", -5.0, 3)];
        let ordered = chronological(&trades);
        assert_eq!(ordered[0].symbol(), "first");
        assert_eq!(ordered[1].symbol(), "second");
    }

    #[test]
    fn losses_below_a_zero_peak_have_no_drawdown() {
        let trades = vec![trade("A", -10.0, 2), trade("B", -5.0, 3)];
        let curve = build_equity_curve(&trades);
        assert_eq!(curve.max_drawdown_pct, 0.0);
        assert!(curve.points.iter().all(|p| p.peak_to_date == 0.0));
    }

    #[test]
    fn empty_trade_list_has_empty_curve() {
        let curve = build_equity_curve(&[]);
        assert!(curve.points.is_empty());
        assert_eq!(curve.max_drawdown_pct, 0.0);
    }

    #[test]
    fn attaches_cumulative_benchmark() {
        let trades = vec![trade("A", 1.0, 2), trade("B", 1.0, 3), trade("C", 1.0, 4)];
        let curve = build_equity_curve_with_benchmark(&trades, Some(&[0.5, 1.0]));
        let benchmark: Vec<Option<f64>> = curve.points.iter().map(|p| p.benchmark).collect();
        assert_eq!(benchmark, vec![Some(0.5), Some(1.5), None]);
    }

    #[test]
    fn tracker_seeded_with_capital() {
        let mut tracker = DrawdownTracker::new(1_000.0);
        assert_eq!(tracker.update(900.0), 10.0);
        assert_eq!(tracker.update(1_100.0), 0.0);
        assert_eq!(tracker.max_drawdown_pct(), 10.0);
        assert_eq!(tracker.max_drawdown(), 100.0);
    }
}
