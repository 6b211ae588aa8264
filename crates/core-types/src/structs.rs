use crate::enums::TradeSide;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single closed trade, normalized and immutable once constructed.
///
/// `pnl` and `pnl_percentage` are derived at construction time so every consumer
/// sees the same figures regardless of how the record was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    symbol: String,
    side: TradeSide,
    entry_price: f64,
    exit_price: f64,
    quantity: f64,
    entry_time: DateTime<Utc>,
    exit_time: DateTime<Utc>,
    pnl: f64,
    pnl_percentage: f64,
}

impl TradeRecord {
    /// Builds a trade record, deriving the P&L fields.
    ///
    /// When `reported_pnl` is `None` or exactly zero the P&L is recomputed from
    /// prices: `(exit - entry) * quantity`, sign-flipped for a sell.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: impl Into<String>,
        side: TradeSide,
        entry_price: f64,
        exit_price: f64,
        quantity: f64,
        entry_time: DateTime<Utc>,
        exit_time: DateTime<Utc>,
        reported_pnl: Option<f64>,
    ) -> Self {
        let pnl = match reported_pnl {
            Some(pnl) if pnl != 0.0 => pnl,
            _ => (exit_price - entry_price) * quantity * side.direction(),
        };

        let notional = entry_price * quantity;
        let pnl_percentage = if notional == 0.0 {
            0.0
        } else {
            pnl / notional * 100.0
        };

        Self {
            symbol: symbol.into(),
            side,
            entry_price,
            exit_price,
            quantity,
            entry_time,
            exit_time,
            pnl,
            pnl_percentage,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn side(&self) -> TradeSide {
        self.side
    }

    pub fn entry_price(&self) -> f64 {
        self.entry_price
    }

    pub fn exit_price(&self) -> f64 {
        self.exit_price
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn entry_time(&self) -> DateTime<Utc> {
        self.entry_time
    }

    pub fn exit_time(&self) -> DateTime<Utc> {
        self.exit_time
    }

    pub fn pnl(&self) -> f64 {
        self.pnl
    }

    pub fn pnl_percentage(&self) -> f64 {
        self.pnl_percentage
    }

    /// Time the position was held open.
    pub fn holding_period(&self) -> Duration {
        self.exit_time - self.entry_time
    }

    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    pub fn is_loser(&self) -> bool {
        self.pnl < 0.0
    }
}

/// One point on the cumulative equity curve, emitted per trade in exit-time order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    /// Cumulative P&L after this trade.
    pub equity: f64,
    pub peak_to_date: f64,
    /// Always `>= 0`.
    pub drawdown_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<f64>,
}
