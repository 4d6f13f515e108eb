//! Dashboard API route handlers.
//!
//! All endpoints return JSON. The only shared state is the immutable set of
//! form defaults; each request recomputes from the inputs it carries.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::format::{format_currency, format_percent};
use crate::competitors::{self, CompetitorTable};
use crate::config::InputDefaults;
use crate::pricing::{average_price, parse_tiers, PricingEngine, SimulationInput, MAX_MARGIN_PCT};
use crate::types::{
    BenchmarkRow, CostStructure, PricingError, PricingResult, PricingStrategy, StrategyKind,
    TierRow,
};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// State shared by all route handlers. Read-only after startup.
pub struct DashboardState {
    pub defaults: InputDefaults,
    pub max_upload_bytes: usize,
}

impl DashboardState {
    pub fn new(defaults: InputDefaults, max_upload_bytes: usize) -> Self {
        Self {
            defaults,
            max_upload_bytes,
        }
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Current form state. Missing strategy inputs fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulateRequest {
    #[serde(default)]
    pub fixed_cost: Decimal,
    #[serde(default)]
    pub variable_cost: Decimal,
    #[serde(default)]
    pub service_cost: Decimal,
    pub strategy: Option<StrategyKind>,
    pub margin_pct: Option<u32>,
    pub tiers: Option<String>,
    pub perceived_value: Option<Decimal>,
    /// Raw text of the uploaded competitor file.
    pub competitor_csv: Option<String>,
}

impl SimulateRequest {
    /// Build the engine's strategy from the selector and its input field.
    fn build_strategy(&self, defaults: &InputDefaults) -> Result<PricingStrategy, PricingError> {
        let kind = self.strategy.unwrap_or(defaults.strategy);
        Ok(match kind {
            StrategyKind::CostPlus => PricingStrategy::CostPlus {
                margin_pct: self.margin_pct.unwrap_or(defaults.margin_pct),
            },
            StrategyKind::Tiered => PricingStrategy::Tiered {
                tiers: parse_tiers(self.tiers.as_deref().unwrap_or(&defaults.tiers))?,
            },
            StrategyKind::ValueBased => PricingStrategy::ValueBased {
                perceived_value: self.perceived_value.unwrap_or(Decimal::ZERO),
            },
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TiersRequest {
    pub text: Option<String>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DefaultsResponse {
    pub strategies: Vec<StrategyKind>,
    pub strategy: StrategyKind,
    pub margin_pct: u32,
    pub max_margin_pct: u32,
    pub tiers: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulateResponse {
    pub simulation_id: Uuid,
    pub computed_at: DateTime<Utc>,
    pub strategy: StrategyKind,
    pub result: PricingResult,
    pub display: DisplayMetrics,
    pub tiers: Option<Vec<TierRow>>,
    pub competitors: Option<CompetitorTable>,
    pub benchmark: Option<Vec<BenchmarkRow>>,
    pub warnings: Vec<String>,
}

/// Metrics and benchmark formatted for display.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayMetrics {
    pub recommended_price: String,
    pub profit_per_unit: String,
    pub margin_pct: String,
    pub benchmark: Vec<DisplayBenchmarkRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplayBenchmarkRow {
    pub competitor: String,
    pub price: String,
    pub delta_vs_recommended: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TiersResponse {
    pub tiers: Vec<TierRow>,
    pub average_price: Option<Decimal>,
    pub average_display: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// Engine errors become 422 responses carrying the message for the form.
#[derive(Debug)]
pub struct ApiError(pub PricingError);

impl From<PricingError> for ApiError {
    fn from(e: PricingError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.kind(),
            message: self.0.to_string(),
        };
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/defaults
pub async fn get_defaults(State(state): State<AppState>) -> Json<DefaultsResponse> {
    let d = &state.defaults;
    Json(DefaultsResponse {
        strategies: StrategyKind::ALL.to_vec(),
        strategy: d.strategy,
        margin_pct: d.margin_pct,
        max_margin_pct: MAX_MARGIN_PCT,
        tiers: d.tiers.clone(),
    })
}

/// POST /api/simulate
pub async fn simulate(
    State(state): State<AppState>,
    Json(req): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>, ApiError> {
    let simulation_id = Uuid::new_v4();
    let costs = CostStructure::new(req.fixed_cost, req.variable_cost, req.service_cost)
        .inspect_err(|e| warn!(%simulation_id, error = %e, "Rejected cost input"))?;
    let strategy = req
        .build_strategy(&state.defaults)
        .inspect_err(|e| warn!(%simulation_id, error = %e, "Rejected strategy input"))?;

    let mut warnings = Vec::new();
    let competitors = load_competitors(req.competitor_csv.as_deref(), &mut warnings);

    let input = SimulationInput {
        costs,
        strategy,
        competitors: competitors.as_ref().and_then(|t| t.rows.clone()),
    };
    let sim = PricingEngine::simulate(&input)
        .inspect_err(|e| warn!(%simulation_id, error = %e, "Simulation rejected"))?;

    info!(
        %simulation_id,
        strategy = %sim.strategy,
        price = %format_currency(sim.result.recommended_price),
        warnings = warnings.len(),
        "Simulation served"
    );

    let display = DisplayMetrics {
        recommended_price: format_currency(sim.result.recommended_price),
        profit_per_unit: format_currency(sim.result.profit_per_unit),
        margin_pct: format_percent(sim.result.margin_pct),
        benchmark: sim
            .benchmark
            .iter()
            .flatten()
            .map(|b| DisplayBenchmarkRow {
                competitor: b.competitor.clone(),
                price: format_currency(b.price),
                delta_vs_recommended: format_currency(b.delta_vs_recommended),
            })
            .collect(),
    };

    Ok(Json(SimulateResponse {
        simulation_id,
        computed_at: Utc::now(),
        strategy: sim.strategy,
        result: sim.result,
        display,
        tiers: sim.tiers,
        competitors,
        benchmark: sim.benchmark,
        warnings,
    }))
}

/// POST /api/tiers
pub async fn preview_tiers(
    State(state): State<AppState>,
    Json(req): Json<TiersRequest>,
) -> Result<Json<TiersResponse>, ApiError> {
    let tiers = parse_tiers(req.text.as_deref().unwrap_or(&state.defaults.tiers))?;
    let average = average_price(&tiers)?;
    Ok(Json(TiersResponse {
        average_display: average.map(format_currency),
        average_price: average,
        tiers,
    }))
}

/// POST /api/competitors (raw CSV body)
pub async fn preview_competitors(body: String) -> Result<Json<CompetitorTable>, ApiError> {
    Ok(Json(competitors::from_csv_str(&body)?))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Parse the uploaded table, turning every failure into a warning so the
/// price is still shown without a benchmark.
fn load_competitors(upload: Option<&str>, warnings: &mut Vec<String>) -> Option<CompetitorTable> {
    let text = upload.filter(|t| !t.trim().is_empty())?;
    match competitors::from_csv_str(text) {
        Ok(table) => {
            if !table.benchmark_enabled() {
                warnings.push(format!(
                    "Competitor file needs '{}' and '{}' columns; benchmark skipped",
                    competitors::COMPETITOR_COLUMN,
                    competitors::PRICE_COLUMN
                ));
            } else if table.dropped_rows > 0 {
                warnings.push(format!(
                    "{} competitor row(s) without a numeric price were ignored",
                    table.dropped_rows
                ));
            }
            Some(table)
        }
        Err(e) => {
            warn!(error = %e, "Competitor file unreadable; benchmark skipped");
            warnings.push(format!("{e}; benchmark skipped"));
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
