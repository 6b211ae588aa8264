use analytics::{build_equity_curve, compute_metrics};
use chrono::{DateTime, TimeZone, Utc};
use core_types::{TradeRecord, TradeSide};
use proptest::prelude::*;

fn timestamp(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn arb_trade() -> impl Strategy<Value = TradeRecord> {
    (
        any::<bool>(),
        1.0f64..1_000.0,
        1.0f64..1_000.0,
        0.1f64..100.0,
        1_600_000_000i64..1_700_000_000,
        0i64..500_000,
    )
        .prop_map(|(is_buy, entry, exit, qty, opened, held)| {
            let side = if is_buy { TradeSide::Buy } else { TradeSide::Sell };
            TradeRecord::new(
                "PROP",
                side,
                entry,
                exit,
                qty,
                timestamp(opened),
                timestamp(opened + held),
                None,
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn counts_and_rates_stay_in_range(trades in prop::collection::vec(arb_trade(), 0..60)) {
        let report = compute_metrics(&trades, None);

        prop_assert_eq!(report.total_trades, trades.len());
        prop_assert_eq!(report.winners + report.losers + report.breakeven, report.total_trades);
        prop_assert!((0.0..=100.0).contains(&report.win_rate));
        prop_assert!(report.max_drawdown_pct >= 0.0);
        prop_assert!(report.max_consecutive_wins <= report.winners);
        prop_assert!(report.max_consecutive_losses <= report.losers);
    }

    #[test]
    fn profit_factor_is_infinite_only_without_losses(trades in prop::collection::vec(arb_trade(), 0..60)) {
        let report = compute_metrics(&trades, None);
        let infinite = report.gross_loss == 0.0 && report.gross_profit > 0.0;

        prop_assert_eq!(report.profit_factor.is_infinite(), infinite);
    }

    #[test]
    fn drawdown_is_zero_exactly_when_equity_never_dips_below_a_positive_peak(
        trades in prop::collection::vec(arb_trade(), 0..60)
    ) {
        let curve = build_equity_curve(&trades);
        let dipped = curve
            .points
            .iter()
            .any(|p| p.peak_to_date > 0.0 && p.equity < p.peak_to_date);

        prop_assert_eq!(curve.max_drawdown_pct > 0.0, dipped);
        prop_assert!(curve.points.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        prop_assert!(curve.points.iter().all(|p| p.peak_to_date >= p.equity));
    }
}

#[test]
fn monotonic_winners_have_no_drawdown() {
    let trades: Vec<_> = (0..10)
        .map(|i| {
            TradeRecord::new(
                "UP",
                TradeSide::Buy,
                100.0,
                101.0 + i as f64,
                1.0,
                timestamp(1_650_000_000 + i * 60),
                timestamp(1_650_000_030 + i * 60),
                None,
            )
        })
        .collect();

    let report = compute_metrics(&trades, None);
    assert_eq!(report.max_drawdown_pct, 0.0);
    assert_eq!(report.losers, 0);
    assert!(report.profit_factor.is_infinite());
}
