use chrono::{DateTime, TimeZone, Utc};
use core_types::{TradeRecord, TradeSide};
use ingest::{ingest, to_csv};
use proptest::prelude::*;

fn timestamp(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

fn arb_trade() -> impl Strategy<Value = TradeRecord> {
    (
        "[A-Z]{1,5}",
        any::<bool>(),
        0.01f64..50_000.0,
        0.01f64..50_000.0,
        0.001f64..1_000.0,
        1_600_000_000i64..1_800_000_000,
        0i64..2_000_000,
        prop::option::of(-10_000.0f64..10_000.0),
    )
        .prop_map(|(symbol, is_buy, entry, exit, qty, opened, held, pnl)| {
            let side = if is_buy { TradeSide::Buy } else { TradeSide::Sell };
            TradeRecord::new(
                symbol,
                side,
                entry,
                exit,
                qty,
                timestamp(opened),
                timestamp(opened + held),
                pnl,
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn serialized_trades_reingest_identically(trades in prop::collection::vec(arb_trade(), 0..40)) {
        let text = to_csv(&trades).unwrap();
        let reingested = ingest(&text).unwrap();
        prop_assert_eq!(reingested, trades);
    }
}

#[test]
fn sub_second_timestamps_survive_a_round_trip() {
    let opened = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
    let closed = Utc.timestamp_opt(1_700_000_360, 5_000_000).unwrap();
    let trade = TradeRecord::new("BTC", TradeSide::Sell, 35_000.5, 34_000.25, 0.75, opened, closed, None);

    let text = to_csv(std::slice::from_ref(&trade)).unwrap();
    assert_eq!(ingest(&text).unwrap(), vec![trade]);
}
