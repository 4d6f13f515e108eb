//! Shared types for the pricing simulator.
//!
//! These types form the data model used across all modules. Every value is
//! built fresh from user input on each simulation and dropped afterwards;
//! nothing here is mutated once constructed.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Cost structure
// ---------------------------------------------------------------------------

/// Unit economics for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostStructure {
    /// Infrastructure, licensing, or base costs not tied to volume.
    pub fixed_cost: Decimal,
    /// Raw material, labour, etc. per unit.
    pub variable_cost_per_unit: Decimal,
    /// Support, training, or delivery cost per unit.
    pub service_cost_per_unit: Decimal,
}

impl CostStructure {
    /// Build a cost structure, rejecting negative fields.
    pub fn new(
        fixed_cost: Decimal,
        variable_cost_per_unit: Decimal,
        service_cost_per_unit: Decimal,
    ) -> Result<Self, PricingError> {
        let costs = Self {
            fixed_cost,
            variable_cost_per_unit,
            service_cost_per_unit,
        };
        costs.validate()?;
        Ok(costs)
    }

    /// Check that every field is non-negative.
    ///
    /// Fields are public so deserialized values can bypass `new`; the engine
    /// calls this again before pricing.
    pub fn validate(&self) -> Result<(), PricingError> {
        let fields = [
            ("fixed_cost", self.fixed_cost),
            ("variable_cost_per_unit", self.variable_cost_per_unit),
            ("service_cost_per_unit", self.service_cost_per_unit),
        ];
        for (field, value) in fields {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(PricingError::validation(
                    field,
                    format!("must be non-negative, got {value}"),
                ));
            }
        }
        Ok(())
    }

    /// Fixed + variable + service.
    pub fn total_unit_cost(&self) -> Result<Decimal, PricingError> {
        self.fixed_cost
            .checked_add(self.variable_cost_per_unit)
            .and_then(|sum| sum.checked_add(self.service_cost_per_unit))
            .ok_or_else(|| PricingError::out_of_range("total_unit_cost"))
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// Strategy selector as offered by the input form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    #[serde(rename = "Cost-Plus")]
    CostPlus,
    #[serde(rename = "Tiered")]
    Tiered,
    #[serde(rename = "Value-Based")]
    ValueBased,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [Self::CostPlus, Self::Tiered, Self::ValueBased];

    pub fn label(&self) -> &'static str {
        match self {
            Self::CostPlus => "Cost-Plus",
            Self::Tiered => "Tiered",
            Self::ValueBased => "Value-Based",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StrategyKind {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.label() == s.trim())
            .ok_or_else(|| {
                PricingError::validation("strategy", format!("unknown pricing strategy: {s}"))
            })
    }
}

/// A pricing strategy together with its strategy-specific input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PricingStrategy {
    /// Markup over total unit cost, in whole percent (0–100).
    #[serde(rename = "Cost-Plus")]
    CostPlus { margin_pct: u32 },
    /// Average of a manually entered quantity/price table.
    #[serde(rename = "Tiered")]
    Tiered { tiers: Vec<TierRow> },
    /// Price taken directly from the customer's perceived value.
    #[serde(rename = "Value-Based")]
    ValueBased { perceived_value: Decimal },
}

impl PricingStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::CostPlus { .. } => StrategyKind::CostPlus,
            Self::Tiered { .. } => StrategyKind::Tiered,
            Self::ValueBased { .. } => StrategyKind::ValueBased,
        }
    }
}

/// One quantity band of a tier table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierRow {
    pub min_units: u32,
    pub max_units: u32,
    pub price: Decimal,
}

// ---------------------------------------------------------------------------
// Competitors
// ---------------------------------------------------------------------------

/// A competitor's price as loaded from an uploaded table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorRow {
    pub competitor: String,
    pub price: Decimal,
}

impl CompetitorRow {
    pub fn new(competitor: impl Into<String>, price: Decimal) -> Self {
        Self {
            competitor: competitor.into(),
            price,
        }
    }
}

/// A competitor price positioned against the recommended price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRow {
    pub competitor: String,
    pub price: Decimal,
    /// `price - recommended_price`; negative means the competitor is cheaper.
    pub delta_vs_recommended: Decimal,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Outcome of pricing one cost structure under one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub recommended_price: Decimal,
    pub total_unit_cost: Decimal,
    pub profit_per_unit: Decimal,
    /// Profit as a percentage of price; zero when the price is zero.
    pub margin_pct: Decimal,
}

impl PricingResult {
    /// Derive profit and margin from a price and a total unit cost.
    pub fn from_price(
        recommended_price: Decimal,
        total_unit_cost: Decimal,
    ) -> Result<Self, PricingError> {
        let profit_per_unit = recommended_price
            .checked_sub(total_unit_cost)
            .ok_or_else(|| PricingError::out_of_range("profit_per_unit"))?;
        let margin_pct = if recommended_price.is_zero() {
            Decimal::ZERO
        } else {
            profit_per_unit
                .checked_div(recommended_price)
                .and_then(|ratio| ratio.checked_mul(dec!(100)))
                .ok_or_else(|| PricingError::out_of_range("margin_pct"))?
        };
        Ok(Self {
            recommended_price,
            total_unit_cost,
            profit_per_unit,
            margin_pct,
        })
    }

    /// Whether the price covers the total unit cost.
    pub fn is_profitable(&self) -> bool {
        self.profit_per_unit > Decimal::ZERO
    }
}

impl fmt::Display for PricingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "price=${} | cost=${} | profit=${} | margin={}%",
            self.recommended_price.round_dp(2),
            self.total_unit_cost.round_dp(2),
            self.profit_per_unit.round_dp(2),
            self.margin_pct.round_dp(2),
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Recoverable input errors. The caller surfaces the message and waits for
/// corrected input; nothing here is fatal to the session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl PricingError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Arithmetic on the inputs left the representable decimal range.
    pub fn out_of_range(field: &str) -> Self {
        Self::validation(field, "value out of range")
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::Parse { .. } => "parse_error",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
