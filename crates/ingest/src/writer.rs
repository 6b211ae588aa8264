use crate::alias::Field;
use crate::error::IngestionError;
use chrono::SecondsFormat;
use core_types::TradeRecord;

/// Columns of the reference upload template, in order.
const TEMPLATE_FIELDS: [Field; 7] = [
    Field::Symbol,
    Field::Side,
    Field::EntryPrice,
    Field::ExitPrice,
    Field::Quantity,
    Field::EntryTime,
    Field::ExitTime,
];

/// The header row of the reference template, without a trailing newline.
pub fn template() -> String {
    TEMPLATE_FIELDS
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(",")
}

/// Serializes trades in the template layout plus a `pnl` column.
///
/// Floats use Rust's shortest round-trip formatting and timestamps RFC 3339 in UTC,
/// so feeding the output back through `ingest` reproduces the same records.
pub fn to_csv(trades: &[TradeRecord]) -> Result<String, IngestionError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = TEMPLATE_FIELDS.iter().map(|f| f.name()).collect();
    header.push(Field::Pnl.name());
    writer
        .write_record(&header)
        .map_err(|e| IngestionError::Export(e.to_string()))?;

    for trade in trades {
        writer
            .write_record([
                trade.symbol().to_string(),
                trade.side().as_str().to_string(),
                trade.entry_price().to_string(),
                trade.exit_price().to_string(),
                trade.quantity().to_string(),
                trade.entry_time().to_rfc3339_opts(SecondsFormat::AutoSi, true),
                trade.exit_time().to_rfc3339_opts(SecondsFormat::AutoSi, true),
                trade.pnl().to_string(),
            ])
            .map_err(|e| IngestionError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| IngestionError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| IngestionError::Export(e.to_string()))
}
