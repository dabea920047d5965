mod costs;
mod db;
mod rate_limit;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use services::rates::CyclesRateSource;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let pool = db::init_pool(&database_url)
        .await
        .expect("database init failed");

    // Initialize the live conversion-rate client (non-fatal: estimates fall
    // back to the fixed rate if no source is configured).
    let rates: Option<Arc<dyn CyclesRateSource>> = match services::rates::HttpRateClient::from_env() {
        Ok(client) => {
            tracing::info!(url = client.url(), "cycles rate client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "cycles rate source not configured — estimates use the fixed rate");
            None
        }
    };

    let funding = services::funding::FundingConfig::from_env();
    let state = state::AppState::new(pool, rates, funding);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "modelboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
