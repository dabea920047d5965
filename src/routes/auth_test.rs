use super::*;

// =============================================================================
// normalize_principal
// =============================================================================

#[test]
fn normalize_accepts_plain_principal() {
    assert_eq!(normalize_principal("w7x7r-cok77-xa").as_deref(), Some("w7x7r-cok77-xa"));
}

#[test]
fn normalize_trims_whitespace() {
    assert_eq!(normalize_principal("  aaaaa-aa \n").as_deref(), Some("aaaaa-aa"));
}

#[test]
fn normalize_rejects_empty() {
    assert!(normalize_principal("").is_none());
    assert!(normalize_principal("   ").is_none());
}

#[test]
fn normalize_rejects_oversized() {
    let long = "x".repeat(MAX_PRINCIPAL_LEN + 1);
    assert!(normalize_principal(&long).is_none());
}

#[test]
fn normalize_accepts_max_length() {
    let max = "x".repeat(MAX_PRINCIPAL_LEN);
    assert_eq!(normalize_principal(&max).as_deref(), Some(max.as_str()));
}

// =============================================================================
// env_bool
// =============================================================================

#[test]
fn env_bool_missing_var_is_none() {
    assert_eq!(env_bool("MODELBOARD_TEST_UNSET_VAR"), None);
}

#[test]
fn env_bool_parses_truthy_and_falsy() {
    // SAFETY: test-only env mutation, key is unique to this test.
    unsafe { std::env::set_var("MODELBOARD_TEST_BOOL_VAR", "yes") };
    assert_eq!(env_bool("MODELBOARD_TEST_BOOL_VAR"), Some(true));
    unsafe { std::env::set_var("MODELBOARD_TEST_BOOL_VAR", "0") };
    assert_eq!(env_bool("MODELBOARD_TEST_BOOL_VAR"), Some(false));
    unsafe { std::env::set_var("MODELBOARD_TEST_BOOL_VAR", "maybe") };
    assert_eq!(env_bool("MODELBOARD_TEST_BOOL_VAR"), None);
    unsafe { std::env::remove_var("MODELBOARD_TEST_BOOL_VAR") };
}
