use thiserror::Error;

/// Failures that abort an ingestion run. No partial trade list is ever returned
/// alongside one of these.
///
/// Row indices are zero-based and count data rows only (the header is not a row).
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Input is empty: a header row is required")]
    MissingHeader,

    #[error("Required column '{column}' not found in header")]
    MissingColumn { column: &'static str },

    #[error("Row {row}: required field '{column}' is empty")]
    MissingField { row: usize, column: &'static str },

    #[error("Row {row}: column '{column}' has an unparseable timestamp '{value}'")]
    InvalidTimestamp {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Row {row}: column '{column}' has an unparseable number '{value}'")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Row {row}: exit_time precedes entry_time")]
    ExitBeforeEntry { row: usize },

    #[error("Row {row}: malformed record: {source}")]
    Malformed {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to export trades: {0}")]
    Export(String),
}

impl IngestionError {
    /// The offending data row, when the failure is tied to one.
    pub fn row(&self) -> Option<usize> {
        match self {
            IngestionError::MissingField { row, .. }
            | IngestionError::InvalidTimestamp { row, .. }
            | IngestionError::InvalidNumber { row, .. }
            | IngestionError::ExitBeforeEntry { row }
            | IngestionError::Malformed { row, .. } => Some(*row),
            _ => None,
        }
    }

    /// The offending column, when the failure is tied to one.
    pub fn column(&self) -> Option<&'static str> {
        match self {
            IngestionError::MissingColumn { column }
            | IngestionError::MissingField { column, .. }
            | IngestionError::InvalidTimestamp { column, .. }
            | IngestionError::InvalidNumber { column, .. } => Some(column),
            _ => None,
        }
    }
}
