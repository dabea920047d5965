//! Live cycles-per-ICP conversion rate source.
//!
//! DESIGN
//! ======
//! The estimator ships a fixed default rate, but the real rate drifts with
//! the ICP/XDR exchange rate. When `CYCLES_RATE_URL` is set, this client
//! fetches the current rate per request; when it is not, or a fetch fails,
//! callers fall back to the fixed constant. The trait seam exists so tests
//! can substitute a canned source.

use std::sync::Arc;
use std::time::Duration;

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Cycles bought per XDR, the unit the NNS quotes conversion rates in.
const CYCLES_PER_XDR: f64 = 1_000_000_000_000.0;

#[derive(Debug, thiserror::Error)]
pub enum RatesError {
    #[error("CYCLES_RATE_URL is not set")]
    Missing,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed rate response")]
    Malformed,
}

#[async_trait::async_trait]
pub trait CyclesRateSource: Send + Sync {
    /// Current cycles-per-ICP conversion rate.
    async fn cycles_per_icp(&self) -> Result<f64, RatesError>;
}

/// HTTP-backed rate source configured from the environment.
pub struct HttpRateClient {
    http: reqwest::Client,
    url: String,
}

impl HttpRateClient {
    /// Build a client from `CYCLES_RATE_URL`.
    ///
    /// # Errors
    ///
    /// Returns `Missing` if the variable is unset, or an HTTP error if the
    /// client fails to build.
    pub fn from_env() -> Result<Self, RatesError> {
        let url = std::env::var("CYCLES_RATE_URL").map_err(|_| RatesError::Missing)?;
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self { http, url })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl CyclesRateSource for HttpRateClient {
    async fn cycles_per_icp(&self) -> Result<f64, RatesError> {
        let body: serde_json::Value = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        parse_rate(&body).ok_or(RatesError::Malformed)
    }
}

/// Extract a cycles-per-ICP rate from a rate-endpoint response.
///
/// Accepts either a direct `{"cycles_per_icp": N}` shape or the NNS
/// cycles-minting shape `{"data": {"xdr_permyriad_per_icp": N}}`.
pub(crate) fn parse_rate(value: &serde_json::Value) -> Option<f64> {
    if let Some(rate) = value.get("cycles_per_icp").and_then(serde_json::Value::as_f64) {
        return Some(rate);
    }
    let permyriad = value
        .get("data")?
        .get("xdr_permyriad_per_icp")?
        .as_f64()?;
    Some(permyriad / 10_000.0 * CYCLES_PER_XDR)
}

/// Resolve the rate to use for an estimate: the live source when one is
/// configured and healthy, the fixed fallback otherwise.
pub async fn resolve_cycles_per_icp(rates: Option<&Arc<dyn CyclesRateSource>>, fallback: f64) -> f64 {
    let Some(source) = rates else {
        return fallback;
    };
    match source.cycles_per_icp().await {
        Ok(rate) if rate > 0.0 => rate,
        Ok(rate) => {
            tracing::warn!(rate, "rate source returned a non-positive rate, using fallback");
            fallback
        }
        Err(e) => {
            tracing::warn!(error = %e, "live cycles rate fetch failed, using fallback");
            fallback
        }
    }
}

#[cfg(test)]
#[path = "rates_test.rs"]
mod tests;
