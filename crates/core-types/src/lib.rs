//! Shared domain types for the TradeLens engine.
//!
//! Every other crate in the workspace speaks in terms of these types: the ingestion
//! stage produces `TradeRecord`s, the analytics stage turns them into `EquityPoint`s
//! and snapshots.

pub mod enums;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::TradeSide;
pub use structs::{EquityPoint, TradeRecord};
