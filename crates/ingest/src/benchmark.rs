use crate::error::IngestionError;
use crate::row::parse_number;

const BENCHMARK_COLUMN: &str = "benchmark";

/// Reads a benchmark return series: one value per line, first column only.
///
/// A non-numeric first line is treated as a header and skipped; any later
/// non-numeric value aborts the whole read.
pub fn parse_benchmark(text: &str) -> Result<Vec<f64>, IngestionError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut series = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|source| IngestionError::Malformed { row: index, source })?;
        let Some(raw) = record.get(0).filter(|v| !v.is_empty()) else {
            continue;
        };

        match parse_number(raw) {
            Some(value) => series.push(value),
            None if index == 0 => {
                tracing::debug!(header = raw, "Skipping benchmark header");
            }
            None => {
                return Err(IngestionError::InvalidNumber {
                    row: index,
                    column: BENCHMARK_COLUMN,
                    value: raw.to_string(),
                });
            }
        }
    }

    Ok(series)
}
