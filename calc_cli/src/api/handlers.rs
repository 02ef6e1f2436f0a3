//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

use calc_core::calculations::UpsInput;
use calc_core::report::render_ups_pdf;
use calc_core::{CalcError, CalcResult, CalculationItem, CalculationOutput, UnitSystem};

use super::types::{HealthResponse, UnitsQuery};
use super::AppState;
use crate::{execute, Envelope};

/// Decode a JSON body; an empty body means "all defaults".
fn decode<T: DeserializeOwned>(body: &[u8]) -> CalcResult<T> {
    let parsed = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_str("{}")
    } else {
        serde_json::from_slice(body)
    };
    parsed.map_err(CalcError::from)
}

fn status_for(err: &CalcError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn envelope_response(result: &CalcResult<CalculationOutput>, units: UnitSystem) -> Response {
    let status = match result {
        Ok(_) => StatusCode::OK,
        Err(err) => status_for(err),
    };
    (status, Json(Envelope::from_result(result, units))).into_response()
}

fn run_calculation<T: DeserializeOwned>(
    state: &AppState,
    query: UnitsQuery,
    body: &[u8],
    wrap: fn(T) -> CalculationItem,
) -> Response {
    let units = query.units.unwrap_or(UnitSystem::Metric);
    let result = decode::<T>(body).and_then(|input| execute(&wrap(input), &state.settings, units));
    envelope_response(&result, units)
}

/// `POST /calculate` → UPS sizing envelope
pub async fn calculate_ups(State(state): State<Arc<AppState>>, Query(query): Query<UnitsQuery>, body: Bytes) -> Response {
    run_calculation(&state, query, &body, CalculationItem::Ups)
}

/// `POST /calculate-power` → cable sizing envelope
pub async fn calculate_power(State(state): State<Arc<AppState>>, Query(query): Query<UnitsQuery>, body: Bytes) -> Response {
    run_calculation(&state, query, &body, CalculationItem::Cable)
}

pub async fn calculate_transformer(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UnitsQuery>,
    body: Bytes,
) -> Response {
    run_calculation(&state, query, &body, CalculationItem::Transformer)
}

pub async fn calculate_generator(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UnitsQuery>,
    body: Bytes,
) -> Response {
    run_calculation(&state, query, &body, CalculationItem::Generator)
}

pub async fn calculate_pfc(State(state): State<Arc<AppState>>, Query(query): Query<UnitsQuery>, body: Bytes) -> Response {
    run_calculation(&state, query, &body, CalculationItem::Pfc)
}

pub async fn calculate_lighting(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UnitsQuery>,
    body: Bytes,
) -> Response {
    run_calculation(&state, query, &body, CalculationItem::Lighting)
}

pub async fn calculate_grounding(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UnitsQuery>,
    body: Bytes,
) -> Response {
    run_calculation(&state, query, &body, CalculationItem::Grounding)
}

pub async fn calculate_cost(State(state): State<Arc<AppState>>, Query(query): Query<UnitsQuery>, body: Bytes) -> Response {
    run_calculation(&state, query, &body, CalculationItem::Cost)
}

pub async fn calculate_motor(State(state): State<Arc<AppState>>, Query(query): Query<UnitsQuery>, body: Bytes) -> Response {
    run_calculation(&state, query, &body, CalculationItem::Motor)
}

/// `POST /generate-pdf` → UPS report as `application/pdf`
///
/// Typst compilation is CPU-bound and runs on the blocking pool.
pub async fn generate_pdf(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let input: UpsInput = match decode(&body) {
        Ok(input) => input,
        Err(err) => return (status_for(&err), Json(Envelope::error(&err))).into_response(),
    };

    let report_settings = state.settings.report.clone();
    let rendered = tokio::task::spawn_blocking(move || render_ups_pdf(&input, &report_settings))
        .await
        .unwrap_or_else(|e| {
            Err(CalcError::Internal {
                message: format!("report task failed: {e}"),
            })
        });

    match rendered {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"ups_report.pdf\""),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(code = err.error_code(), "report generation failed: {}", err);
            (status_for(&err), Json(Envelope::error(&err))).into_response()
        }
    }
}

/// `GET /health` → `{"status": "healthy"}`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}
