use crate::error::IngestionError;
use csv::StringRecord;

/// A logical column of the trade schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Symbol,
    Side,
    EntryPrice,
    ExitPrice,
    Quantity,
    EntryTime,
    ExitTime,
    Pnl,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Symbol,
        Field::Side,
        Field::EntryPrice,
        Field::ExitPrice,
        Field::Quantity,
        Field::EntryTime,
        Field::ExitTime,
        Field::Pnl,
    ];

    /// Canonical column name, as written by the exporter and used in errors.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Symbol => "symbol",
            Field::Side => "side",
            Field::EntryPrice => "entry_price",
            Field::ExitPrice => "exit_price",
            Field::Quantity => "quantity",
            Field::EntryTime => "entry_time",
            Field::ExitTime => "exit_time",
            Field::Pnl => "pnl",
        }
    }

    /// Accepted header spellings. Matching is done on the normalized form, so
    /// `SYMBOL`, `Entry Price` and `entry-price` resolve as well.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Symbol => &["symbol", "Symbol", "SYMBOL"],
            Field::Side => &["side", "Side", "SIDE"],
            Field::EntryPrice => &["entry_price", "EntryPrice", "entry"],
            Field::ExitPrice => &["exit_price", "ExitPrice", "exit"],
            Field::Quantity => &["quantity", "Quantity", "qty"],
            Field::EntryTime => &["entry_time", "EntryTime", "entry_date"],
            Field::ExitTime => &["exit_time", "ExitTime", "exit_date"],
            Field::Pnl => &["pnl", "PnL", "profit"],
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }

    fn matches(&self, normalized_header: &str) -> bool {
        self.aliases()
            .iter()
            .any(|alias| normalize_header(alias) == normalized_header)
    }
}

/// Lower-cases a header and strips separators (`_`, `-`, whitespace).
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !matches!(c, '_' | '-') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolved position of every logical field in the physical header row.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    positions: [Option<usize>; 8],
}

impl ColumnMap {
    /// Resolves the header row against the alias table. The first column that
    /// matches a field wins; unknown columns are ignored.
    pub fn resolve(headers: &StringRecord) -> Self {
        let mut map = ColumnMap::default();
        for (position, header) in headers.iter().enumerate() {
            let normalized = normalize_header(header);
            match Field::ALL.iter().find(|f| f.matches(&normalized)) {
                Some(field) if map.positions[field.index()].is_none() => {
                    map.positions[field.index()] = Some(position);
                }
                Some(field) => {
                    tracing::warn!(column = header, field = field.name(), "Duplicate column ignored");
                }
                None => {
                    tracing::debug!(column = header, "Unrecognised column ignored");
                }
            }
        }
        map
    }

    pub fn position(&self, field: Field) -> Option<usize> {
        self.positions[field.index()]
    }

    /// Fails when a structurally required column is absent from the header.
    pub fn require(&self, fields: &[Field]) -> Result<(), IngestionError> {
        match fields.iter().find(|f| self.position(**f).is_none()) {
            Some(missing) => Err(IngestionError::MissingColumn {
                column: missing.name(),
            }),
            None => Ok(()),
        }
    }
}
