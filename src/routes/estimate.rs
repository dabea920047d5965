//! Cost estimation route.
//!
//! Thin wrapper over the pure estimator in `crate::costs`: parse the query,
//! pick a conversion rate (explicit override, live source, or the fixed
//! default, in that order), and render one response the UI can show as-is.

use axum::extract::{Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::costs::{self, CostBreakdown, RunwayEstimate};
use crate::services::rates::resolve_cycles_per_icp;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EstimateQuery {
    #[serde(default)]
    pub model_size_mb: f64,
    #[serde(default)]
    pub requests_per_day: f64,
    #[serde(default)]
    pub compute_ms: f64,
    /// Explicit conversion-rate override; non-positive values are ignored.
    pub cycles_per_icp: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct FormattedCosts {
    pub storage: String,
    pub compute: String,
    pub total: String,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub costs: CostBreakdown,
    pub formatted: FormattedCosts,
    pub cycles_per_icp: f64,
    pub icp_per_month: f64,
    pub runway: RunwayEstimate,
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn build_estimate(query: &EstimateQuery, cycles_per_icp: f64) -> EstimateResponse {
    let costs = costs::calculate_costs(query.model_size_mb, query.requests_per_day, query.compute_ms);
    EstimateResponse {
        formatted: FormattedCosts {
            storage: costs::format_number(costs.storage_cycles_per_month as f64),
            compute: costs::format_number(costs.compute_cycles_per_month as f64),
            total: costs::format_number(costs.total_cycles_per_month as f64),
        },
        cycles_per_icp,
        icp_per_month: costs::icp_per_month(&costs, cycles_per_icp),
        runway: costs::estimate_runway(&costs, cycles_per_icp),
        costs,
    }
}

/// `GET /api/estimate` — cycle costs and ICP runway for a hypothetical model.
pub async fn estimate(
    State(state): State<AppState>,
    Query(query): Query<EstimateQuery>,
) -> Json<EstimateResponse> {
    let rate = match query.cycles_per_icp {
        Some(rate) if rate > 0.0 => rate,
        _ => resolve_cycles_per_icp(state.rates.as_ref(), costs::CYCLES_PER_ICP).await,
    };
    Json(build_estimate(&query, rate))
}

#[cfg(test)]
#[path = "estimate_test.rs"]
mod tests;
