use super::*;

#[test]
fn instructions_name_the_account() {
    let instructions = deposit_instructions(Some("abc123-topup"));
    assert!(instructions.contains("abc123-topup"));
    assert!(instructions.contains("cycles"));
}

#[test]
fn instructions_explain_missing_account() {
    let instructions = deposit_instructions(None);
    assert!(instructions.contains("not configured"));
    assert!(instructions.contains("TOP_UP_ACCOUNT"));
}

#[test]
fn status_carries_config_and_rate() {
    let config = FundingConfig { top_up_account: Some("abc123-topup".into()) };
    let status = funding_status(&config, 1.5e12);
    assert_eq!(status.top_up_account.as_deref(), Some("abc123-topup"));
    assert!(status.deposit_instructions.contains("abc123-topup"));
    assert!((status.cycles_per_icp - 1.5e12).abs() < f64::EPSILON);
}

#[test]
fn status_with_no_account_is_explicit() {
    let config = FundingConfig { top_up_account: None };
    let status = funding_status(&config, 1e12);
    assert!(status.top_up_account.is_none());
    assert!(status.deposit_instructions.contains("not configured"));
}

#[test]
fn status_serializes_null_account() {
    let config = FundingConfig { top_up_account: None };
    let json = serde_json::to_value(funding_status(&config, 1e12)).unwrap();
    assert!(json["top_up_account"].is_null());
    assert!(json["deposit_instructions"].is_string());
}
