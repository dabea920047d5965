use std::sync::Arc;

use super::*;
use crate::services::rates::{CyclesRateSource, RatesError};
use crate::state::test_helpers;

fn query(model_size_mb: f64, requests_per_day: f64, compute_ms: f64) -> EstimateQuery {
    EstimateQuery { model_size_mb, requests_per_day, compute_ms, cycles_per_icp: None }
}

#[test]
fn reference_workload_breakdown() {
    let response = build_estimate(&query(1024.0, 100.0, 50.0), costs::CYCLES_PER_ICP);
    assert_eq!(response.costs.storage_cycles_per_month, 127_000_000_000);
    assert_eq!(response.costs.compute_cycles_per_month, 885_000_000);
    assert_eq!(response.costs.total_cycles_per_month, 127_885_000_000);
    assert_eq!(response.formatted.storage, "127.00B");
    assert_eq!(response.formatted.compute, "885.00M");
    assert_eq!(response.formatted.total, "127.89B");
    assert!((response.icp_per_month - 0.127_885).abs() < 1e-9);
}

#[test]
fn zero_workload_formats_as_zero() {
    let response = build_estimate(&query(0.0, 0.0, 0.0), costs::CYCLES_PER_ICP);
    assert_eq!(response.costs.total_cycles_per_month, 0);
    assert_eq!(response.formatted.total, "0");
    assert!(response.icp_per_month.abs() < f64::EPSILON);
}

#[test]
fn runway_matches_monthly_cost() {
    let response = build_estimate(&query(50.0, 100.0, 500.0), costs::CYCLES_PER_ICP);
    assert!((response.runway.icp_per_year - response.icp_per_month * 12.0).abs() < 1e-9);
    assert!((response.runway.icp_for_ten_years - response.runway.icp_per_year * 10.0).abs() < 1e-9);
}

#[test]
fn rate_override_scales_icp_terms_only() {
    let default = build_estimate(&query(1024.0, 100.0, 50.0), costs::CYCLES_PER_ICP);
    let doubled = build_estimate(&query(1024.0, 100.0, 50.0), costs::CYCLES_PER_ICP * 2.0);
    assert_eq!(default.costs.total_cycles_per_month, doubled.costs.total_cycles_per_month);
    assert!((doubled.icp_per_month * 2.0 - default.icp_per_month).abs() < 1e-9);
}

#[test]
fn response_serializes_nested_shape() {
    let json = serde_json::to_value(build_estimate(&query(1024.0, 100.0, 50.0), costs::CYCLES_PER_ICP)).unwrap();
    assert_eq!(json["costs"]["storage_cycles_per_month"], 127_000_000_000_i64);
    assert_eq!(json["formatted"]["total"], "127.89B");
    assert!(json["runway"]["icp_per_year"].is_f64());
}

struct FixedRate(f64);

#[async_trait::async_trait]
impl CyclesRateSource for FixedRate {
    async fn cycles_per_icp(&self) -> Result<f64, RatesError> {
        Ok(self.0)
    }
}

#[tokio::test]
async fn handler_prefers_live_rate_source() {
    let state = test_helpers::test_app_state_with_rates(Arc::new(FixedRate(2.0e12)));
    let Json(response) = estimate(State(state), Query(query(1024.0, 100.0, 50.0))).await;
    assert!((response.cycles_per_icp - 2.0e12).abs() < f64::EPSILON);
    assert!((response.icp_per_month - 127_885_000_000.0 / 2.0e12).abs() < 1e-12);
}

#[tokio::test]
async fn handler_falls_back_to_fixed_rate() {
    let state = test_helpers::test_app_state();
    let Json(response) = estimate(State(state), Query(query(0.0, 0.0, 0.0))).await;
    assert!((response.cycles_per_icp - costs::CYCLES_PER_ICP).abs() < f64::EPSILON);
}

#[tokio::test]
async fn handler_applies_explicit_override() {
    let state = test_helpers::test_app_state();
    let override_query = EstimateQuery {
        model_size_mb: 1024.0,
        requests_per_day: 100.0,
        compute_ms: 50.0,
        cycles_per_icp: Some(5.0e11),
    };
    let Json(response) = estimate(State(state), Query(override_query)).await;
    assert!((response.cycles_per_icp - 5.0e11).abs() < f64::EPSILON);
}

#[test]
fn query_defaults_missing_inputs_to_zero() {
    let parsed: EstimateQuery = serde_json::from_str("{}").unwrap();
    assert!(parsed.model_size_mb.abs() < f64::EPSILON);
    assert!(parsed.requests_per_day.abs() < f64::EPSILON);
    assert!(parsed.compute_ms.abs() < f64::EPSILON);
    assert!(parsed.cycles_per_icp.is_none());
}
