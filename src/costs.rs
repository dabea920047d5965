//! Cycles cost estimation for hosting and serving models.
//!
//! DESIGN
//! ======
//! A handful of pure formulas mapping (model size, request rate, compute
//! time) to monthly cycle costs and ICP equivalents. No state, no I/O;
//! handlers call [`calculate_costs`] on every request and throw the result
//! away. Inputs are deliberately not clamped: the UI binds them to sliders,
//! and a standalone caller passing negative numbers gets negative costs back.
//!
//! The rates are rough public estimates, not an SLA. `CYCLES_PER_ICP` is the
//! default conversion rate; callers can override it per request or wire up a
//! live source (see `services::rates`).

use serde::Serialize;

/// Approximate cycles bought per ICP. Overridable wherever it is consumed.
pub const CYCLES_PER_ICP: f64 = 1_000_000_000_000.0;

/// Storage rate: cycles per GB-month of stable memory.
const STORAGE_CYCLES_PER_GB_MONTH: f64 = 127_000_000_000.0;

/// Compute rate: cycles per billion executed instructions.
const COMPUTE_CYCLES_PER_B_INSTRUCTIONS: f64 = 590_000.0;

/// Rough estimate: 1ms of compute is about 10M instructions.
const INSTRUCTIONS_PER_MS: f64 = 10_000_000.0;

const DAYS_PER_MONTH: f64 = 30.0;

/// Monthly cost breakdown in cycles, each term rounded to the nearest integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostBreakdown {
    pub storage_cycles_per_month: i64,
    pub compute_cycles_per_month: i64,
    pub total_cycles_per_month: i64,
}

/// ICP needed to keep a deployment funded over time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunwayEstimate {
    pub icp_per_year: f64,
    pub icp_for_ten_years: f64,
}

#[allow(clippy::cast_possible_truncation)]
fn round_cycles(value: f64) -> i64 {
    value.round() as i64
}

/// Estimate monthly hosting costs for a model.
///
/// The total is the sum of the rounded storage and compute terms, so
/// `total == storage + compute` holds exactly on the returned breakdown.
#[must_use]
pub fn calculate_costs(model_size_mb: f64, requests_per_day: f64, compute_ms: f64) -> CostBreakdown {
    let model_size_gb = model_size_mb / 1024.0;
    let storage_cycles_per_month = round_cycles(model_size_gb * STORAGE_CYCLES_PER_GB_MONTH);

    let requests_per_month = requests_per_day * DAYS_PER_MONTH;
    let instructions_per_request = compute_ms * INSTRUCTIONS_PER_MS;
    let compute_cycles_per_request =
        instructions_per_request / 1_000_000_000.0 * COMPUTE_CYCLES_PER_B_INSTRUCTIONS;
    let compute_cycles_per_month = round_cycles(compute_cycles_per_request * requests_per_month);

    CostBreakdown {
        storage_cycles_per_month,
        compute_cycles_per_month,
        total_cycles_per_month: storage_cycles_per_month.saturating_add(compute_cycles_per_month),
    }
}

/// Monthly cost in ICP at the given conversion rate.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn icp_per_month(costs: &CostBreakdown, cycles_per_icp: f64) -> f64 {
    costs.total_cycles_per_month as f64 / cycles_per_icp
}

/// Yearly and ten-year ICP runway for a monthly cost breakdown.
#[must_use]
pub fn estimate_runway(costs: &CostBreakdown, cycles_per_icp: f64) -> RunwayEstimate {
    let icp_per_year = icp_per_month(costs, cycles_per_icp) * 12.0;
    RunwayEstimate { icp_per_year, icp_for_ten_years: icp_per_year * 10.0 }
}

/// Render a magnitude with K/M/B/T suffixes, two decimals above 1e3.
#[must_use]
pub fn format_number(num: f64) -> String {
    if num >= 1_000_000_000_000.0 {
        format!("{:.2}T", num / 1_000_000_000_000.0)
    } else if num >= 1_000_000_000.0 {
        format!("{:.2}B", num / 1_000_000_000.0)
    } else if num >= 1_000_000.0 {
        format!("{:.2}M", num / 1_000_000.0)
    } else if num >= 1_000.0 {
        format!("{:.2}K", num / 1_000.0)
    } else {
        format!("{num:.0}")
    }
}

#[cfg(test)]
#[path = "costs_test.rs"]
mod tests;
