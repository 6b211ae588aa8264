use crate::alias::{ColumnMap, Field};
use crate::error::IngestionError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use core_types::{TradeRecord, TradeSide};
use csv::StringRecord;

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// An untyped data row: raw string cells addressed by logical field.
pub struct RawRow<'a> {
    index: usize,
    record: &'a StringRecord,
    columns: &'a ColumnMap,
}

/// A row that passed schema validation. Every field is typed; nothing is derived yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow {
    pub symbol: String,
    pub side: TradeSide,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub pnl: Option<f64>,
}

impl<'a> RawRow<'a> {
    pub fn new(index: usize, record: &'a StringRecord, columns: &'a ColumnMap) -> Self {
        Self {
            index,
            record,
            columns,
        }
    }

    /// The trimmed cell for `field`, or `None` when the column is absent or the cell is blank.
    fn cell(&self, field: Field) -> Option<&'a str> {
        self.columns
            .position(field)
            .and_then(|position| self.record.get(position))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    fn required(&self, field: Field) -> Result<&'a str, IngestionError> {
        self.cell(field).ok_or(IngestionError::MissingField {
            row: self.index,
            column: field.name(),
        })
    }

    /// Numeric cells never fail: missing or unparseable values coerce to zero.
    fn number(&self, field: Field) -> f64 {
        match self.cell(field) {
            Some(raw) => parse_number(raw).unwrap_or_else(|| {
                tracing::warn!(row = self.index, column = field.name(), value = raw, "Unparseable number coerced to 0");
                0.0
            }),
            None => 0.0,
        }
    }

    fn timestamp(&self, field: Field) -> Result<DateTime<Utc>, IngestionError> {
        let raw = self.required(field)?;
        parse_timestamp(raw).ok_or_else(|| IngestionError::InvalidTimestamp {
            row: self.index,
            column: field.name(),
            value: raw.to_string(),
        })
    }

    /// Checks the row against the minimal schema and coerces it into typed values.
    pub fn validate(self) -> Result<ValidatedRow, IngestionError> {
        let symbol = self.required(Field::Symbol)?.to_string();

        let raw_side = self.required(Field::Side)?;
        let side = TradeSide::from_lenient(raw_side);
        if !raw_side.eq_ignore_ascii_case(side.as_str()) {
            tracing::warn!(row = self.index, value = raw_side, "Unknown side treated as buy");
        }

        let entry_time = self.timestamp(Field::EntryTime)?;
        let exit_time = self.timestamp(Field::ExitTime)?;
        if exit_time < entry_time {
            return Err(IngestionError::ExitBeforeEntry { row: self.index });
        }

        // A pnl cell that is blank or garbage means "derive it"; only a parsed value is kept.
        let pnl = self.cell(Field::Pnl).and_then(parse_number);

        Ok(ValidatedRow {
            symbol,
            side,
            entry_price: self.number(Field::EntryPrice),
            exit_price: self.number(Field::ExitPrice),
            quantity: self.number(Field::Quantity),
            entry_time,
            exit_time,
            pnl,
        })
    }
}

impl ValidatedRow {
    /// Final coercion stage: derives P&L fields and freezes the record.
    pub fn into_record(self) -> TradeRecord {
        TradeRecord::new(
            self.symbol,
            self.side,
            self.entry_price,
            self.exit_price,
            self.quantity,
            self.entry_time,
            self.exit_time,
            self.pnl,
        )
    }
}

/// Parses a finite float. `NaN` and infinities are treated as unparseable.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses the ISO-8601 shapes seen in trade exports. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(ts.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
