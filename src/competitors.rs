//! Competitor table loader.
//!
//! Parses an uploaded comma-separated file. The whole table is kept for
//! display; the benchmark only sees rows from the `Competitor` and `Price`
//! columns whose price parses as a number.

use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Read;
use tracing::{debug, info, warn};

use crate::pricing::tiers::parse_decimal;
use crate::types::{CompetitorRow, PricingError};

/// Header naming the competitor column.
pub const COMPETITOR_COLUMN: &str = "Competitor";
/// Header naming the price column.
pub const PRICE_COLUMN: &str = "Price";

/// An uploaded competitor table.
#[derive(Debug, Clone, Serialize)]
pub struct CompetitorTable {
    /// Header row, trimmed.
    pub columns: Vec<String>,
    /// Every data row as uploaded.
    pub records: Vec<Vec<String>>,
    /// Rows usable for benchmarking. `None` when a required column is
    /// missing, which disables the benchmark.
    pub rows: Option<Vec<CompetitorRow>>,
    /// Rows excluded for a missing or non-numeric price.
    pub dropped_rows: usize,
}

impl CompetitorTable {
    /// Whether a benchmark can be run against this table.
    pub fn benchmark_enabled(&self) -> bool {
        self.rows.is_some()
    }
}

/// Load a competitor table from CSV text.
pub fn from_csv_str(text: &str) -> Result<CompetitorTable, PricingError> {
    load_competitor_table(text.as_bytes())
}

/// Load a competitor table from any CSV source.
///
/// Structural problems (ragged rows, invalid UTF-8) fail with
/// [`PricingError::Parse`]. Missing columns and bad prices do not.
pub fn load_competitor_table<R: Read>(reader: R) -> Result<CompetitorTable, PricingError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()
        .map_err(|e| csv_error(&e))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| csv_error(&e))?;
        records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let competitor_idx = columns.iter().position(|c| c == COMPETITOR_COLUMN);
    let price_idx = columns.iter().position(|c| c == PRICE_COLUMN);

    let (rows, dropped_rows) = match (competitor_idx, price_idx) {
        (Some(ci), Some(pi)) => {
            let mut rows = Vec::with_capacity(records.len());
            let mut dropped = 0usize;
            for (i, record) in records.iter().enumerate() {
                match parse_price(&record[pi]) {
                    Some(price) => rows.push(CompetitorRow::new(record[ci].clone(), price)),
                    None => {
                        debug!(row = i + 1, price = %record[pi], "Dropping competitor row with unusable price");
                        dropped += 1;
                    }
                }
            }
            (Some(rows), dropped)
        }
        _ => {
            warn!(
                columns = ?columns,
                "Competitor table lacks a '{COMPETITOR_COLUMN}' or '{PRICE_COLUMN}' column; benchmark disabled"
            );
            (None, 0)
        }
    };

    info!(
        records = records.len(),
        usable = rows.as_ref().map_or(0, Vec::len),
        dropped = dropped_rows,
        "Competitor table loaded"
    );

    Ok(CompetitorTable {
        columns,
        records,
        rows,
        dropped_rows,
    })
}

fn parse_price(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    parse_decimal(raw)
}

fn csv_error(e: &csv::Error) -> PricingError {
    // csv positions are 1-based lines; header-only failures have no position.
    let line = e.position().map_or(1, |p| p.line() as usize);
    PricingError::parse(line, format!("malformed competitor file: {e}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
