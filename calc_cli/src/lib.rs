//! # calc_cli - Front End for the Sizing Engine
//!
//! Decodes request records, runs the requested calculator and wraps the
//! outcome in the response envelope shared by the command line and the HTTP
//! API:
//!
//! ```json
//! {"status": "success", "configuration": "Dual Path (A+B)", "results": {...}}
//! {"status": "error", "code": "INVALID_INPUT", "detail": "..."}
//! ```

pub mod args;
pub mod logging;

#[cfg(feature = "api")]
pub mod api;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use calc_core::{CalcError, CalcResult, CalculationItem, CalculationOutput, EngineSettings, UnitSystem};

/// Response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope {
    Success {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        configuration: Option<String>,
        results: Value,
    },
    Error {
        code: String,
        detail: String,
    },
}

impl Envelope {
    /// Wrap a calculator output.
    ///
    /// Imperial clients also get the imperial display fields of the
    /// output merged into `results`.
    pub fn success(output: &CalculationOutput, units: UnitSystem) -> Self {
        match serde_json::to_value(output) {
            Ok(mut results) => {
                if let (UnitSystem::Imperial, Value::Object(fields)) = (units, &mut results) {
                    for (key, value) in output.imperial_fields() {
                        fields.insert(key.to_string(), value);
                    }
                }
                Envelope::Success {
                    configuration: output.configuration().map(str::to_string),
                    results,
                }
            }
            Err(e) => Envelope::error(&CalcError::from(e)),
        }
    }

    /// Wrap an engine error.
    pub fn error(err: &CalcError) -> Self {
        Envelope::Error {
            code: err.error_code().to_string(),
            detail: err.to_string(),
        }
    }

    pub fn from_result(result: &CalcResult<CalculationOutput>, units: UnitSystem) -> Self {
        match result {
            Ok(output) => Envelope::success(output, units),
            Err(err) => Envelope::error(err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }
}

/// Decode a tagged request record (`{"type": "Cable", ...}`).
pub fn parse_request(text: &str) -> CalcResult<CalculationItem> {
    let value: Value = serde_json::from_str(text)?;
    if value.get("type").is_none() {
        return Err(CalcError::missing_field("type"));
    }
    Ok(serde_json::from_value(value)?)
}

/// Normalize units and run a request.
pub fn execute(item: &CalculationItem, settings: &EngineSettings, units: UnitSystem) -> CalcResult<CalculationOutput> {
    let item = item.normalized(units);
    let result = item.run(settings);
    if let Err(err) = &result {
        tracing::warn!(calc_type = item.calc_type(), code = err.error_code(), "calculation rejected: {}", err);
    }
    result
}
