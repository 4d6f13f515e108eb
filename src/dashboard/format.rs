//! Display formatting for the output surface.
//!
//! Values are rounded to cents only here; the engine keeps full precision.

use rust_decimal::{Decimal, RoundingStrategy};

/// `$1,234.56` style. Negative values render as `$-2.33`.
pub fn format_currency(value: Decimal) -> String {
    let text = format!("{:.2}", round_cents(value));
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));
    format!("${sign}{}.{frac_part}", group_thousands(int_part))
}

/// `23.08%` style.
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", round_cents(value))
}

fn round_cents(value: Decimal) -> Decimal {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // Avoid rendering "-0.00".
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
