//! # TradeLens Record Ingestion
//!
//! Turns raw tabular trade exports into a validated, strongly typed trade list.
//!
//! The pipeline runs in explicit stages:
//!
//! 1. **Header resolution** (`alias`): every physical column is matched against an
//!    enumerated alias table, producing a `ColumnMap`.
//! 2. **Validation** (`row`): each data row is wrapped as a `RawRow` of string cells
//!    and checked against the minimal schema, yielding a typed `ValidatedRow`.
//! 3. **Coercion**: a `ValidatedRow` becomes an immutable `TradeRecord` with its
//!    P&L fields derived.
//!
//! Ingestion is all-or-nothing: the first failing row aborts the run.

pub mod alias;
pub mod benchmark;
pub mod error;
pub mod row;
pub mod writer;

pub use alias::{ColumnMap, Field};
pub use benchmark::parse_benchmark;
pub use error::IngestionError;
pub use row::{RawRow, ValidatedRow};
pub use writer::{template, to_csv};

use core_types::TradeRecord;

/// Columns without which a row cannot become a `TradeRecord`.
const REQUIRED_FIELDS: [Field; 4] = [Field::Symbol, Field::Side, Field::EntryTime, Field::ExitTime];

/// Parses `raw_text` (header row + data rows) into trades, preserving row order.
pub fn ingest(raw_text: &str) -> Result<Vec<TradeRecord>, IngestionError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(raw_text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|source| IngestionError::Malformed { row: 0, source })?
        .clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestionError::MissingHeader);
    }

    let columns = ColumnMap::resolve(&headers);
    columns.require(&REQUIRED_FIELDS)?;

    let mut trades = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|source| IngestionError::Malformed { row: index, source })?;
        let validated = RawRow::new(index, &record, &columns).validate()?;
        trades.push(validated.into_record());
    }

    tracing::debug!(trades = trades.len(), "Ingested trade file");
    Ok(trades)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::TradeSide;

    const SAMPLE: &str = "\
symbol,side,entry_price,exit_price,quantity,entry_time,exit_time
AAPL,buy,100,110,2,2024-01-02T09:30:00Z,2024-01-02T15:00:00Z
TSLA,SELL,200,190,1,2024-01-03T10:00:00Z,2024-01-04T10:00:00Z
MSFT,hold,50,45,4,2024-01-05T11:00:00Z,2024-01-05T12:00:00Z
";

    #[test]
    fn ingests_reference_template() {
        let trades = ingest(SAMPLE).unwrap();
        assert_eq!(trades.len(), 3);

        assert_eq!(trades[0].symbol(), "AAPL");
        assert_eq!(trades[0].pnl(), 20.0);
        assert!((trades[0].pnl_percentage() - 10.0).abs() < 1e-12);

        assert_eq!(trades[1].side(), TradeSide::Sell);
        assert_eq!(trades[1].pnl(), 10.0);

        // Unknown side defaults to buy.
        assert_eq!(trades[2].side(), TradeSide::Buy);
        assert_eq!(trades[2].pnl(), -20.0);
    }

    #[test]
    fn resolves_aliased_and_reordered_columns() {
        let text = "\
PnL,Qty,ExitPrice,EntryPrice,SIDE,Symbol,exit_date,entry_date
15,1,0,0,buy,ETH,2024-02-02,2024-02-01
0,3,12,10,sell,SOL,2024-02-03,2024-02-02
";
        let trades = ingest(text).unwrap();
        assert_eq!(trades[0].pnl(), 15.0);
        assert_eq!(trades[0].pnl_percentage(), 0.0);
        // Reported zero pnl is re-derived from prices.
        assert_eq!(trades[1].pnl(), -6.0);
    }

    #[test]
    fn preserves_input_order() {
        let text = "\
symbol,side,entry_time,exit_time
C,buy,2024-01-03,2024-01-03
A,buy,2024-01-01,2024-01-01
B,buy,2024-01-02,2024-01-02
";
        let symbols: Vec<_> = ingest(text).unwrap().iter().map(|t| t.symbol().to_string()).collect();
        assert_eq!(symbols, vec!["C", "A", "B"]);
    }

    #[test]
    fn missing_side_column_aborts() {
        let text = "symbol,entry_time,exit_time\nAAPL,2024-01-01,2024-01-02\n";
        let err = ingest(text).unwrap_err();
        assert!(matches!(err, IngestionError::MissingColumn { column: "side" }));
    }

    #[test]
    fn one_bad_row_aborts_everything() {
        let text = "\
symbol,side,entry_time,exit_time
AAPL,buy,2024-01-01,2024-01-02
MSFT,,2024-01-01,2024-01-02
";
        let err = ingest(text).unwrap_err();
        assert_eq!(err.row(), Some(1));
        assert_eq!(err.column(), Some("side"));
    }

    #[test]
    fn bad_timestamp_names_row_and_column() {
        let text = "symbol,side,entry_time,exit_time\nAAPL,buy,yesterday,2024-01-02\n";
        let err = ingest(text).unwrap_err();
        match err {
            IngestionError::InvalidTimestamp { row, column, value } => {
                assert_eq!(row, 0);
                assert_eq!(column, "entry_time");
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(matches!(ingest(""), Err(IngestionError::MissingHeader)));
    }

    #[test]
    fn header_only_yields_no_trades() {
        let trades = ingest("symbol,side,entry_time,exit_time\n").unwrap();
        assert!(trades.is_empty());
    }

    #[test]
    fn template_matches_reference_layout() {
        assert_eq!(
            template(),
            "symbol,side,entry_price,exit_price,quantity,entry_time,exit_time"
        );
    }
}
