use super::*;

// =============================================================================
// calculate_costs
// =============================================================================

#[test]
fn zero_inputs_cost_nothing() {
    let costs = calculate_costs(0.0, 0.0, 0.0);
    assert_eq!(costs.storage_cycles_per_month, 0);
    assert_eq!(costs.compute_cycles_per_month, 0);
    assert_eq!(costs.total_cycles_per_month, 0);
}

#[test]
fn one_gb_model_storage_term() {
    // 1024 MB is exactly 1 GB, so the storage term is the raw GB-month rate.
    let costs = calculate_costs(1024.0, 100.0, 50.0);
    assert_eq!(costs.storage_cycles_per_month, 127_000_000_000);
}

#[test]
fn compute_term_for_reference_workload() {
    // 50ms -> 5e8 instructions -> 0.5B * 590_000 = 295_000 cycles/request;
    // 100 req/day -> 3000 req/month -> 885_000_000 cycles/month.
    let costs = calculate_costs(1024.0, 100.0, 50.0);
    assert_eq!(costs.compute_cycles_per_month, 885_000_000);
    assert_eq!(costs.total_cycles_per_month, 127_885_000_000);
}

#[test]
fn total_is_sum_of_terms() {
    let samples = [
        (0.0, 0.0, 0.0),
        (0.1, 1.0, 1.0),
        (1.5, 250.0, 30.0),
        (1024.0, 100.0, 50.0),
        (50.0, 100.0, 500.0),
        (10_000.0, 10_000.0, 1000.0),
    ];
    for (size, requests, compute) in samples {
        let costs = calculate_costs(size, requests, compute);
        assert_eq!(
            costs.total_cycles_per_month,
            costs.storage_cycles_per_month + costs.compute_cycles_per_month,
            "sum identity failed for ({size}, {requests}, {compute})"
        );
    }
}

#[test]
fn storage_term_monotonic_in_model_size() {
    let base = calculate_costs(10.0, 100.0, 50.0);
    let bigger = calculate_costs(20.0, 100.0, 50.0);
    assert!(bigger.storage_cycles_per_month > base.storage_cycles_per_month);
    assert_eq!(bigger.compute_cycles_per_month, base.compute_cycles_per_month);
}

#[test]
fn compute_term_monotonic_in_request_rate() {
    let base = calculate_costs(10.0, 100.0, 50.0);
    let busier = calculate_costs(10.0, 200.0, 50.0);
    assert!(busier.compute_cycles_per_month > base.compute_cycles_per_month);
    assert_eq!(busier.storage_cycles_per_month, base.storage_cycles_per_month);
}

#[test]
fn compute_term_monotonic_in_compute_time() {
    let base = calculate_costs(10.0, 100.0, 50.0);
    let slower = calculate_costs(10.0, 100.0, 100.0);
    assert!(slower.compute_cycles_per_month > base.compute_cycles_per_month);
}

#[test]
fn estimator_is_pure() {
    let first = calculate_costs(3.7, 421.0, 88.0);
    let second = calculate_costs(3.7, 421.0, 88.0);
    assert_eq!(first, second);
}

#[test]
fn negative_inputs_propagate() {
    // Permissive contract: no clamping, a negative size yields a negative cost.
    let costs = calculate_costs(-1024.0, 0.0, 0.0);
    assert_eq!(costs.storage_cycles_per_month, -127_000_000_000);
    assert_eq!(costs.total_cycles_per_month, -127_000_000_000);
}

// =============================================================================
// icp conversion + runway
// =============================================================================

#[test]
fn icp_per_month_at_default_rate() {
    let costs = calculate_costs(1024.0, 100.0, 50.0);
    let icp = icp_per_month(&costs, CYCLES_PER_ICP);
    assert!((icp - 0.127_885).abs() < 1e-9);
}

#[test]
fn runway_scales_monthly_cost() {
    let costs = calculate_costs(1024.0, 100.0, 50.0);
    let runway = estimate_runway(&costs, CYCLES_PER_ICP);
    assert!((runway.icp_per_year - 0.127_885 * 12.0).abs() < 1e-9);
    assert!((runway.icp_for_ten_years - runway.icp_per_year * 10.0).abs() < 1e-9);
}

#[test]
fn runway_respects_rate_override() {
    let costs = calculate_costs(1024.0, 100.0, 50.0);
    let cheap = estimate_runway(&costs, CYCLES_PER_ICP * 2.0);
    let default = estimate_runway(&costs, CYCLES_PER_ICP);
    assert!((cheap.icp_per_year * 2.0 - default.icp_per_year).abs() < 1e-9);
}

// =============================================================================
// format_number
// =============================================================================

#[test]
fn format_number_trillions() {
    assert_eq!(format_number(1_500_000_000_000.0), "1.50T");
}

#[test]
fn format_number_billions() {
    assert_eq!(format_number(127_000_000_000.0), "127.00B");
}

#[test]
fn format_number_millions() {
    assert_eq!(format_number(885_000_000.0), "885.00M");
}

#[test]
fn format_number_thousands_boundary() {
    assert_eq!(format_number(1_000.0), "1.00K");
}

#[test]
fn format_number_below_thousand_is_bare() {
    assert_eq!(format_number(999.0), "999");
}

#[test]
fn format_number_zero() {
    assert_eq!(format_number(0.0), "0");
}
