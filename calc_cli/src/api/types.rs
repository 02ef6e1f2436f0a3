//! API query and response types.

use serde::{Deserialize, Serialize};

use calc_core::UnitSystem;

/// Optional query parameters of the calculator endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct UnitsQuery {
    /// Unit system of the request body (metric when absent)
    pub units: Option<UnitSystem>,
}

/// `GET /health` body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
