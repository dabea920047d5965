//! Funding status — top-up account and deposit instructions.
//!
//! The hosting environment keeps running only while its cycles balance is
//! topped up; this service publishes where deposits go. The account is
//! operator configuration, not data, so it is read once from the
//! environment at startup and an unset value is an explicit "not
//! configured" state rather than an error.

use serde::Serialize;

#[derive(Debug, Clone)]
pub struct FundingConfig {
    pub top_up_account: Option<String>,
}

impl FundingConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let top_up_account = std::env::var("TOP_UP_ACCOUNT")
            .ok()
            .map(|raw| raw.trim().to_owned())
            .filter(|account| !account.is_empty());
        Self { top_up_account }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FundingStatus {
    pub top_up_account: Option<String>,
    pub deposit_instructions: String,
    /// Conversion rate the instructions were rendered against.
    pub cycles_per_icp: f64,
}

/// Build the funding status from operator config and the current rate.
#[must_use]
pub fn funding_status(config: &FundingConfig, cycles_per_icp: f64) -> FundingStatus {
    FundingStatus {
        top_up_account: config.top_up_account.clone(),
        deposit_instructions: deposit_instructions(config.top_up_account.as_deref()),
        cycles_per_icp,
    }
}

fn deposit_instructions(account: Option<&str>) -> String {
    match account {
        Some(account) => format!(
            "Send ICP to account {account}, then convert the deposit to cycles to extend the hosting runway."
        ),
        None => "No top-up account is configured. Set TOP_UP_ACCOUNT to publish deposit instructions.".to_owned(),
    }
}

#[cfg(test)]
#[path = "funding_test.rs"]
mod tests;
