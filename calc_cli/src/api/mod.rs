//! HTTP API for the sizing engine.
//!
//! One POST endpoint per calculator, a UPS PDF report endpoint and a health
//! check:
//! - `POST /calculate` (UPS), `/calculate-power`, `/calculate-transformer`,
//!   `/calculate-generator`, `/calculate-pfc`, `/calculate-lighting`,
//!   `/calculate-grounding`, `/calculate-cost`, `/calculate-motor`
//! - `POST /generate-pdf` returns `application/pdf`
//! - `GET /health`
//!
//! Calculator endpoints accept `?units=imperial` for imperial lengths and
//! temperatures.

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use calc_core::EngineSettings;

/// Immutable application state shared across all request handlers.
pub struct AppState {
    /// Engine settings loaded at startup
    pub settings: EngineSettings,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/calculate", post(handlers::calculate_ups))
        .route("/calculate-power", post(handlers::calculate_power))
        .route("/calculate-transformer", post(handlers::calculate_transformer))
        .route("/calculate-generator", post(handlers::calculate_generator))
        .route("/calculate-pfc", post(handlers::calculate_pfc))
        .route("/calculate-lighting", post(handlers::calculate_lighting))
        .route("/calculate-grounding", post(handlers::calculate_grounding))
        .route("/calculate-cost", post(handlers::calculate_cost))
        .route("/calculate-motor", post(handlers::calculate_motor))
        .route("/generate-pdf", post(handlers::generate_pdf))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Binds to the given address and serves the API.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
