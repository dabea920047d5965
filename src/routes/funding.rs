//! Funding status route.

use axum::extract::State;
use axum::response::Json;

use crate::costs;
use crate::services::funding::{self, FundingStatus};
use crate::services::rates::resolve_cycles_per_icp;
use crate::state::AppState;

/// `GET /api/funding` — top-up account and deposit instructions.
pub async fn funding_status(State(state): State<AppState>) -> Json<FundingStatus> {
    let rate = resolve_cycles_per_icp(state.rates.as_ref(), costs::CYCLES_PER_ICP).await;
    Json(funding::funding_status(&state.funding, rate))
}
