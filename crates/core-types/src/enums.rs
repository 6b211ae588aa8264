use serde::{Deserialize, Serialize};
use std::fmt;

/// The direction of a closed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Parses a side leniently: the value is trimmed and lower-cased, and anything
    /// other than `sell` is treated as `buy`.
    pub fn from_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "sell" => TradeSide::Sell,
            _ => TradeSide::Buy,
        }
    }

    /// Returns `1.0` for a long trade and `-1.0` for a short one.
    pub fn direction(&self) -> f64 {
        match self {
            TradeSide::Buy => 1.0,
            TradeSide::Sell => -1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parsing_defaults_to_buy() {
        assert_eq!(TradeSide::from_lenient("SELL"), TradeSide::Sell);
        assert_eq!(TradeSide::from_lenient(" Sell "), TradeSide::Sell);
        assert_eq!(TradeSide::from_lenient("buy"), TradeSide::Buy);
        assert_eq!(TradeSide::from_lenient("short"), TradeSide::Buy);
        assert_eq!(TradeSide::from_lenient(""), TradeSide::Buy);
    }

    #[test]
    fn direction_signs_pnl() {
        assert_eq!(TradeSide::Buy.direction(), 1.0);
        assert_eq!(TradeSide::Sell.direction(), -1.0);
        assert_eq!(TradeSide::Sell.to_string(), "sell");
    }
}
