//! Pricing engine — strategy dispatch, tier parsing, and competitor benchmark.
//!
//! The engine is a pure computation. Callers build a [`SimulationInput`] from
//! the current form state and call [`PricingEngine::simulate`] whenever any
//! input changes; nothing is carried between invocations.

pub mod benchmark;
pub mod tiers;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::{debug, info};

use crate::types::{
    BenchmarkRow, CompetitorRow, CostStructure, PricingError, PricingResult, PricingStrategy,
    StrategyKind, TierRow,
};

pub use benchmark::benchmark_against_competitors;
pub use tiers::{average_price, parse_tiers, DEFAULT_TIERS};

use tiers::check_tier;

/// Highest Cost-Plus markup the engine accepts, in whole percent.
pub const MAX_MARGIN_PCT: u32 = 100;

// ---------------------------------------------------------------------------
// Simulation input / output
// ---------------------------------------------------------------------------

/// Everything one recomputation needs, already parsed and in memory.
#[derive(Debug, Clone)]
pub struct SimulationInput {
    pub costs: CostStructure,
    pub strategy: PricingStrategy,
    /// Competitor rows with valid prices. `None` skips the benchmark.
    pub competitors: Option<Vec<CompetitorRow>>,
}

/// Full output of one recomputation.
#[derive(Debug, Clone, Serialize)]
pub struct Simulation {
    pub strategy: StrategyKind,
    pub result: PricingResult,
    /// The parsed tier table, present for the Tiered strategy only.
    pub tiers: Option<Vec<TierRow>>,
    /// Present whenever competitor rows were supplied, even if empty.
    pub benchmark: Option<Vec<BenchmarkRow>>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct PricingEngine;

impl PricingEngine {
    /// Price a cost structure under a strategy.
    ///
    /// - Cost-Plus: `total * (1 + margin_pct / 100)`
    /// - Tiered: mean of the tier prices (a table-wide estimate, not a
    ///   per-quantity band lookup)
    /// - Value-Based: the perceived value as-is
    ///
    /// Profit is `price - total`; margin is `profit / price * 100`, or zero
    /// when the price is zero.
    pub fn compute_price(
        costs: &CostStructure,
        strategy: &PricingStrategy,
    ) -> Result<PricingResult, PricingError> {
        costs.validate()?;
        let total = costs.total_unit_cost()?;

        let price = match strategy {
            PricingStrategy::CostPlus { margin_pct } => {
                if *margin_pct > MAX_MARGIN_PCT {
                    return Err(PricingError::validation(
                        "margin_pct",
                        format!("must be between 0 and {MAX_MARGIN_PCT}, got {margin_pct}"),
                    ));
                }
                let markup = Decimal::ONE + Decimal::from(*margin_pct) / dec!(100);
                total
                    .checked_mul(markup)
                    .ok_or_else(|| PricingError::out_of_range("recommended_price"))?
            }
            PricingStrategy::Tiered { tiers } => {
                for tier in tiers {
                    check_tier(tier).map_err(|msg| PricingError::validation("tiers", msg))?;
                }
                average_price(tiers)?.ok_or_else(|| {
                    PricingError::validation("tiers", "at least one tier is required")
                })?
            }
            PricingStrategy::ValueBased { perceived_value } => {
                if *perceived_value < Decimal::ZERO {
                    return Err(PricingError::validation(
                        "perceived_value",
                        format!("must be non-negative, got {perceived_value}"),
                    ));
                }
                *perceived_value
            }
        };

        let result = PricingResult::from_price(price, total)?;
        debug!(
            strategy = %strategy.kind(),
            price = %result.recommended_price.round_dp(2),
            margin = format!("{:.2}%", result.margin_pct.round_dp(2)),
            "Price computed"
        );
        Ok(result)
    }

    /// Recompute every output from the current inputs.
    pub fn simulate(input: &SimulationInput) -> Result<Simulation, PricingError> {
        let result = Self::compute_price(&input.costs, &input.strategy)?;

        let tiers = match &input.strategy {
            PricingStrategy::Tiered { tiers } => Some(tiers.clone()),
            _ => None,
        };

        let benchmark = input
            .competitors
            .as_deref()
            .map(|rows| benchmark_against_competitors(result.recommended_price, rows))
            .transpose()?;

        info!(
            strategy = %input.strategy.kind(),
            result = %result,
            profitable = result.is_profitable(),
            competitors = benchmark.as_ref().map_or(0, Vec::len),
            "Simulation complete"
        );

        Ok(Simulation {
            strategy: input.strategy.kind(),
            result,
            tiers,
            benchmark,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
