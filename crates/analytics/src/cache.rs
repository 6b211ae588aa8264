use crate::engine::AnalyticsEngine;
use crate::report::MetricsSnapshot;
use core_types::TradeRecord;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// A caller-owned memo of snapshots keyed by a digest of their inputs.
///
/// The engine itself keeps no state; callers that recompute metrics for the same
/// upload repeatedly can hold one of these instead.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    engine: AnalyticsEngine,
    entries: HashMap<String, MetricsSnapshot>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached snapshot for these inputs, computing it on a miss.
    pub fn get_or_compute(
        &mut self,
        trades: &[TradeRecord],
        benchmark: Option<&[f64]>,
    ) -> &MetricsSnapshot {
        let key = input_digest(trades, benchmark);
        let engine = &self.engine;
        self.entries.entry(key).or_insert_with_key(|key| {
            tracing::debug!(digest = %key, "Snapshot cache miss");
            engine.calculate(trades, benchmark)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Hex SHA-256 over every field that influences a snapshot.
///
/// Trade order is part of the key: it decides tie-breaking in the equity curve.
pub fn input_digest(trades: &[TradeRecord], benchmark: Option<&[f64]>) -> String {
    let mut hasher = Sha256::new();

    hasher.update((trades.len() as u64).to_le_bytes());
    for trade in trades {
        hasher.update((trade.symbol().len() as u64).to_le_bytes());
        hasher.update(trade.symbol().as_bytes());
        hasher.update(trade.side().as_str().as_bytes());
        for value in [
            trade.entry_price(),
            trade.exit_price(),
            trade.quantity(),
            trade.pnl(),
        ] {
            hasher.update(value.to_bits().to_le_bytes());
        }
        for ts in [trade.entry_time(), trade.exit_time()] {
            hasher.update(ts.timestamp().to_le_bytes());
            hasher.update(ts.timestamp_subsec_nanos().to_le_bytes());
        }
    }

    match benchmark {
        Some(series) => {
            hasher.update([1u8]);
            hasher.update((series.len() as u64).to_le_bytes());
            for value in series {
                hasher.update(value.to_bits().to_le_bytes());
            }
        }
        None => hasher.update([0u8]),
    }

    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::TradeSide;

    fn trade(pnl: f64) -> TradeRecord {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        TradeRecord::new("BTC", TradeSide::Buy, 1.0, 1.0, 1.0, t, t, Some(pnl))
    }

    #[test]
    fn identical_inputs_share_an_entry() {
        let mut cache = SnapshotCache::new();
        let trades = vec![trade(1.0), trade(-2.0)];

        let first = cache.get_or_compute(&trades, None).clone();
        let second = cache.get_or_compute(&trades.clone(), None).clone();

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn benchmark_and_order_change_the_key() {
        let trades = vec![trade(1.0), trade(-2.0)];
        let reversed = vec![trade(-2.0), trade(1.0)];

        let base = input_digest(&trades, None);
        assert_ne!(base, input_digest(&trades, Some(&[])));
        assert_ne!(base, input_digest(&reversed, None));
        assert_eq!(base.len(), 64);
    }
}
