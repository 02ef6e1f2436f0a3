//! # Error Types
//!
//! Structured error types for calc_core. These errors are designed to be
//! informative for both humans and API clients, providing enough context to
//! understand and fix a rejected request programmatically.
//!
//! ## Taxonomy
//!
//! - **Validation** ([`CalcError::InvalidInput`], [`CalcError::MissingField`]):
//!   the request is rejected before any formula runs.
//! - **Degenerate input** ([`CalcError::DegenerateInput`]): the inputs passed
//!   validation but make a formula undefined (zero derating, log of a
//!   non-positive argument).
//! - Saturating catalog selections are *not* errors; results carry an
//!   `exceeds_catalog` flag instead.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length_m: f64) -> CalcResult<()> {
//!     if length_m <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "length_m".to_string(),
//!             value: length_m.to_string(),
//!             reason: "Cable length must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by API consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, non-positive, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Inputs are individually valid but make a formula undefined
    #[error("Degenerate input for {quantity}: {reason}")]
    DegenerateInput { quantity: String, reason: String },

    /// Cable cross-section not present in the ampacity table
    #[error("No ampacity data for {cable_mm2} mm² {material} cable ({mounting})")]
    UnknownCableSize {
        material: String,
        mounting: String,
        cable_mm2: f64,
    },

    /// Engine settings could not be loaded or are out of range
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// PDF report could not be compiled or rendered
    #[error("Report error: {reason}")]
    ReportError { reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a DegenerateInput error
    pub fn degenerate(quantity: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::DegenerateInput {
            quantity: quantity.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config(reason: impl Into<String>) -> Self {
        CalcError::ConfigError {
            reason: reason.into(),
        }
    }

    /// Create a ReportError
    pub fn report(reason: impl Into<String>) -> Self {
        CalcError::ReportError {
            reason: reason.into(),
        }
    }

    /// True for errors caused by the request itself (map to HTTP 400)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. }
                | CalcError::MissingField { .. }
                | CalcError::DegenerateInput { .. }
                | CalcError::UnknownCableSize { .. }
                | CalcError::SerializationError { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::DegenerateInput { .. } => "DEGENERATE_INPUT",
            CalcError::UnknownCableSize { .. } => "UNKNOWN_CABLE_SIZE",
            CalcError::ConfigError { .. } => "CONFIG_ERROR",
            CalcError::ReportError { .. } => "REPORT_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}

/// Reject a value that must be strictly positive.
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Must be a positive number"));
    }
    Ok(())
}

/// Reject a negative (or non-finite) value; zero is allowed.
pub(crate) fn require_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Cannot be negative"));
    }
    Ok(())
}

/// Reject a power factor outside (0, 1].
pub(crate) fn require_power_factor(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Power factor must be greater than 0 and at most 1",
        ));
    }
    Ok(())
}

/// Reject a percentage outside (0, 100].
pub(crate) fn require_percent(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 || value > 100.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Percentage must be greater than 0 and at most 100",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("length_m", "-5", "Cable length must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("loads").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::degenerate("derating", "zero").error_code(), "DEGENERATE_INPUT");
        assert_eq!(CalcError::config("bad").error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_client_errors() {
        assert!(CalcError::invalid_input("x", "0", "bad").is_client_error());
        assert!(!CalcError::report("typst").is_client_error());
    }

    #[test]
    fn test_validators() {
        assert!(require_positive("x", 1.0).is_ok());
        assert!(require_positive("x", 0.0).is_err());
        assert!(require_positive("x", f64::NAN).is_err());
        assert!(require_non_negative("x", 0.0).is_ok());
        assert!(require_non_negative("x", -0.1).is_err());
        assert!(require_power_factor("pf", 1.0).is_ok());
        assert!(require_power_factor("pf", 0.0).is_err());
        assert!(require_power_factor("pf", 1.2).is_err());
        assert!(require_percent("eff", 100.0).is_ok());
        assert!(require_percent("eff", 0.0).is_err());
    }
}
