use chrono::{Datelike, Timelike};
use core_types::TradeRecord;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Performance of all trades entered in one `(weekday, hour)` slot.
///
/// `weekday` is `0` for Monday through `6` for Sunday; both keys are UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub weekday: u8,
    pub hour: u8,
    pub sum_pnl_pct: f64,
    pub trade_count: usize,
    pub average_pnl_pct: f64,
}

impl TimeBucket {
    pub fn key(&self) -> (u8, u8) {
        (self.weekday, self.hour)
    }

    pub fn average(&self) -> f64 {
        self.average_pnl_pct
    }
}

/// Buckets trades by the weekday and hour of their entry time.
///
/// The result holds one bucket per occupied slot, ordered by `(weekday, hour)`.
pub fn aggregate_time_buckets(trades: &[TradeRecord]) -> Vec<TimeBucket> {
    let mut slots: BTreeMap<(u8, u8), (f64, usize)> = BTreeMap::new();

    for trade in trades {
        let entry = trade.entry_time();
        let key = (entry.weekday().num_days_from_monday() as u8, entry.hour() as u8);
        let slot = slots.entry(key).or_insert((0.0, 0));
        slot.0 += trade.pnl_percentage();
        slot.1 += 1;
    }

    slots
        .into_iter()
        .map(|((weekday, hour), (sum, count))| TimeBucket {
            weekday,
            hour,
            sum_pnl_pct: sum,
            trade_count: count,
            average_pnl_pct: sum / count as f64,
        })
        .collect()
}

/// The `limit` best slots by average return, highest first.
pub fn best_windows(buckets: &[TimeBucket], limit: usize) -> Vec<TimeBucket> {
    rank(buckets, limit, |a, b| b.average().total_cmp(&a.average()))
}

/// The `limit` worst slots by average return, lowest first.
pub fn worst_windows(buckets: &[TimeBucket], limit: usize) -> Vec<TimeBucket> {
    rank(buckets, limit, |a, b| a.average().total_cmp(&b.average()))
}

/// Sorts by `by`, breaking ties on the lower `(weekday, hour)` so output is deterministic.
fn rank<F>(buckets: &[TimeBucket], limit: usize, by: F) -> Vec<TimeBucket>
where
    F: Fn(&TimeBucket, &TimeBucket) -> Ordering,
{
    buckets
        .iter()
        .sorted_by(|a, b| by(a, b).then_with(|| a.key().cmp(&b.key())))
        .take(limit)
        .cloned()
        .collect()
}
