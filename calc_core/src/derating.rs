//! # Derating Factors
//!
//! Rated equipment capacity must be reduced when the installation
//! environment is harsher than the rating conditions. Each factor is derived
//! from a single environmental input and the factors are composed by
//! multiplication:
//!
//! ```text
//! C_total = C_alt × C_temp × ...
//! ```
//!
//! ## Factor Summary
//!
//! | Factor | Description | Threshold | Slope          |
//! |--------|-------------|-----------|----------------|
//! | C_alt  | Altitude    | 1000 m    | 3.5 % / 500 m  |
//! | C_temp | Ambient     | 40 °C     | 2 % / 5 °C     |
//!
//! Below its threshold a factor is exactly 1.0.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Altitude above which generator output is derated (m)
pub const ALTITUDE_THRESHOLD_M: f64 = 1000.0;
/// Fractional capacity lost per altitude step
pub const ALTITUDE_LOSS_PER_STEP: f64 = 0.035;
/// Altitude step (m)
pub const ALTITUDE_STEP_M: f64 = 500.0;

/// Ambient temperature above which generator output is derated (°C)
pub const TEMPERATURE_THRESHOLD_C: f64 = 40.0;
/// Fractional capacity lost per temperature step
pub const TEMPERATURE_LOSS_PER_STEP: f64 = 0.02;
/// Temperature step (°C)
pub const TEMPERATURE_STEP_C: f64 = 5.0;

/// Altitude derating factor C_alt.
///
/// ```rust
/// use calc_core::derating::altitude_factor;
///
/// assert_eq!(altitude_factor(800.0), 1.0);
/// assert!((altitude_factor(2000.0) - 0.93).abs() < 1e-12);
/// ```
pub fn altitude_factor(altitude_m: f64) -> f64 {
    if altitude_m <= ALTITUDE_THRESHOLD_M {
        return 1.0;
    }
    1.0 - ALTITUDE_LOSS_PER_STEP * (altitude_m - ALTITUDE_THRESHOLD_M) / ALTITUDE_STEP_M
}

/// Ambient temperature derating factor C_temp.
///
/// ```rust
/// use calc_core::derating::temperature_factor;
///
/// assert_eq!(temperature_factor(25.0), 1.0);
/// assert!((temperature_factor(50.0) - 0.96).abs() < 1e-12);
/// ```
pub fn temperature_factor(temperature_c: f64) -> f64 {
    if temperature_c <= TEMPERATURE_THRESHOLD_C {
        return 1.0;
    }
    1.0 - TEMPERATURE_LOSS_PER_STEP * (temperature_c - TEMPERATURE_THRESHOLD_C) / TEMPERATURE_STEP_C
}

/// One named factor in a derating chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeratingFactor {
    /// Short name (e.g., "altitude")
    pub name: String,
    /// Multiplicative factor
    pub value: f64,
}

/// Ordered list of multiplicative derating factors.
///
/// # Example
///
/// ```rust
/// use calc_core::derating::DeratingChain;
///
/// let chain = DeratingChain::new()
///     .with_factor("altitude", 0.93)
///     .with_factor("temperature", 0.96);
/// assert!((chain.combined().unwrap() - 0.8928).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeratingChain {
    pub factors: Vec<DeratingFactor>,
}

impl DeratingChain {
    /// Create an empty chain (combined factor 1.0)
    pub fn new() -> Self {
        DeratingChain::default()
    }

    /// Chain for a generator set at a given site altitude and ambient.
    pub fn for_site(altitude_m: f64, temperature_c: f64) -> Self {
        DeratingChain::new()
            .with_factor("altitude", altitude_factor(altitude_m))
            .with_factor("temperature", temperature_factor(temperature_c))
    }

    /// Append a factor (builder pattern)
    pub fn with_factor(mut self, name: impl Into<String>, value: f64) -> Self {
        self.factors.push(DeratingFactor {
            name: name.into(),
            value,
        });
        self
    }

    /// Product of all factors.
    ///
    /// Fails with [`CalcError::DegenerateInput`] when any factor is not
    /// positive: the site conditions leave no usable capacity.
    pub fn combined(&self) -> CalcResult<f64> {
        if let Some(bad) = self.factors.iter().find(|f| !(f.value > 0.0)) {
            return Err(CalcError::degenerate(
                format!("{} derating", bad.name),
                format!("factor {:.3} leaves no usable capacity", bad.value),
            ));
        }
        Ok(self.factors.iter().map(|f| f.value).product())
    }

    /// Look up a factor by name
    pub fn factor(&self, name: &str) -> Option<f64> {
        self.factors.iter().find(|f| f.name == name).map(|f| f.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_thresholds() {
        assert_eq!(altitude_factor(0.0), 1.0);
        assert_eq!(altitude_factor(1000.0), 1.0);
        assert_eq!(temperature_factor(40.0), 1.0);
        assert_eq!(temperature_factor(-10.0), 1.0);
    }

    #[test]
    fn test_linear_above_thresholds() {
        assert!((altitude_factor(1500.0) - 0.965).abs() < 1e-12);
        assert!((altitude_factor(3000.0) - 0.86).abs() < 1e-12);
        assert!((temperature_factor(45.0) - 0.98).abs() < 1e-12);
    }

    #[test]
    fn test_empty_chain_is_unity() {
        assert_eq!(DeratingChain::new().combined().unwrap(), 1.0);
    }

    #[test]
    fn test_site_chain() {
        let chain = DeratingChain::for_site(2000.0, 50.0);
        assert_eq!(chain.factor("altitude"), Some(altitude_factor(2000.0)));
        assert!((chain.combined().unwrap() - 0.93 * 0.96).abs() < 1e-12);
    }

    #[test]
    fn test_exhausted_capacity_is_degenerate() {
        // 1000 m + 500 m × (1 / 0.035) ≈ 15 286 m gives a factor of zero
        let chain = DeratingChain::for_site(20_000.0, 25.0);
        let err = chain.combined().unwrap_err();
        assert_eq!(err.error_code(), "DEGENERATE_INPUT");
    }
}
