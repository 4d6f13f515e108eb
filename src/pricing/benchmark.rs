//! Competitor benchmark.
//!
//! Positions each competitor price against the recommended price. Deltas are
//! kept at full precision; rounding happens only when displayed.

use rust_decimal::Decimal;
use tracing::debug;

use crate::types::{BenchmarkRow, CompetitorRow, PricingError};

/// One benchmark row per competitor row, in input order.
///
/// `delta_vs_recommended = price - recommended_price`. An empty input gives
/// an empty benchmark; a delta outside the decimal range is an error.
pub fn benchmark_against_competitors(
    recommended_price: Decimal,
    rows: &[CompetitorRow],
) -> Result<Vec<BenchmarkRow>, PricingError> {
    let benchmark = rows
        .iter()
        .map(|row| {
            let delta = row
                .price
                .checked_sub(recommended_price)
                .ok_or_else(|| PricingError::out_of_range("delta_vs_recommended"))?;
            Ok(BenchmarkRow {
                competitor: row.competitor.clone(),
                price: row.price,
                delta_vs_recommended: delta,
            })
        })
        .collect::<Result<Vec<_>, PricingError>>()?;

    debug!(
        competitors = benchmark.len(),
        recommended = %recommended_price.round_dp(2),
        "Benchmark computed"
    );
    Ok(benchmark)
}
