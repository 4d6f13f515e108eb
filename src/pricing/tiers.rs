//! Tier table parsing.
//!
//! Tiers arrive as free text, one `min,max,price` band per line. Bands are
//! accepted as given: overlap, ordering and gaps are not checked.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use crate::types::{PricingError, TierRow};

/// Tier text pre-filled in the input form.
pub const DEFAULT_TIERS: &str = "1,100,25\n101,500,22\n501,1000,20";

/// Parse multi-line `min,max,price` text into tier rows, preserving line order.
///
/// Blank lines are skipped. Line numbers in errors are 1-based and count
/// blank lines, so they match what the user sees in the text box.
pub fn parse_tiers(text: &str) -> Result<Vec<TierRow>, PricingError> {
    let mut tiers = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [min, max, price] = fields.as_slice() else {
            return Err(PricingError::parse(
                line_no,
                format!("expected 3 fields (min,max,price), got {}", fields.len()),
            ));
        };

        let min_units: u32 = min
            .parse()
            .map_err(|_| PricingError::parse(line_no, format!("min units '{min}' is not an integer")))?;
        let max_units: u32 = max
            .parse()
            .map_err(|_| PricingError::parse(line_no, format!("max units '{max}' is not an integer")))?;
        let price = parse_decimal(price)
            .ok_or_else(|| PricingError::parse(line_no, format!("price '{price}' is not a number")))?;

        let tier = TierRow {
            min_units,
            max_units,
            price,
        };
        check_tier(&tier).map_err(|msg| PricingError::parse(line_no, msg))?;
        tiers.push(tier);
    }

    debug!(count = tiers.len(), "Tiers parsed");
    Ok(tiers)
}

/// Per-row invariants: `min >= 1`, `max >= min`, `price >= 0`.
pub(crate) fn check_tier(tier: &TierRow) -> Result<(), String> {
    if tier.min_units < 1 {
        return Err(format!("min units must be at least 1, got {}", tier.min_units));
    }
    if tier.max_units < tier.min_units {
        return Err(format!(
            "max units ({}) is below min units ({})",
            tier.max_units, tier.min_units
        ));
    }
    if tier.price < Decimal::ZERO {
        return Err(format!("price must be non-negative, got {}", tier.price));
    }
    Ok(())
}

/// Accepts plain (`22.5`) and scientific (`2.25e1`) notation.
pub(crate) fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Arithmetic mean of the tier prices, or `None` for an empty table.
///
/// Fails when the running sum leaves the decimal range.
pub fn average_price(tiers: &[TierRow]) -> Result<Option<Decimal>, PricingError> {
    if tiers.is_empty() {
        return Ok(None);
    }
    let sum = tiers
        .iter()
        .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.price))
        .ok_or_else(|| PricingError::out_of_range("tiers"))?;
    Ok(Some(sum / Decimal::from(tiers.len())))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
