//! # Generator Sizing
//!
//! Sizes a standby diesel generator set for a continuous load plus the
//! inrush of the largest motor start, derated for site altitude and ambient
//! temperature.
//!
//! ## Method
//!
//! ```text
//! peak_kw      = continuous_kw + 2.5 × motor_starting_kw
//! required_kva = (peak_kw / pf) / (C_alt × C_temp)
//! ```
//!
//! Under N+1 two active sets share the requirement and a third is spare.

use serde::{Deserialize, Serialize};

use crate::catalog::GENERATORS_KVA;
use crate::derating::DeratingChain;
use crate::equations::power::apparent_power_kva;
use crate::errors::{require_non_negative, require_power_factor, CalcError, CalcResult};
use crate::units::{fahrenheit_to_celsius, feet_to_meters, round_to, Liters, NormalizeUnits, UsGallons};

/// Multiplier applied to motor starting kW for the transient peak
pub const MOTOR_INRUSH_MULTIPLIER: f64 = 2.5;

/// Average loading assumed for fuel consumption
pub const FUEL_LOAD_FRACTION: f64 = 0.75;

/// Specific fuel consumption (L/kWh)
pub const FUEL_L_PER_KWH: f64 = 0.21;

/// Generator redundancy scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum GeneratorRedundancy {
    /// Single set carries the full load
    #[default]
    #[serde(rename = "N")]
    N,
    /// Two sets share the load, one spare
    #[serde(rename = "N+1")]
    NPlusOne,
}

impl GeneratorRedundancy {
    pub const ALL: [GeneratorRedundancy; 2] = [GeneratorRedundancy::N, GeneratorRedundancy::NPlusOne];

    /// Number of sets sharing the load
    pub fn active_units(&self) -> u32 {
        match self {
            GeneratorRedundancy::N => 1,
            GeneratorRedundancy::NPlusOne => 2,
        }
    }

    /// Installed sets including spares
    pub fn total_units(&self) -> u32 {
        match self {
            GeneratorRedundancy::N => 1,
            GeneratorRedundancy::NPlusOne => 3,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GeneratorRedundancy::N => "N",
            GeneratorRedundancy::NPlusOne => "N+1",
        }
    }
}

impl From<String> for GeneratorRedundancy {
    fn from(value: String) -> Self {
        match value.trim() {
            "N" => GeneratorRedundancy::N,
            "N+1" => GeneratorRedundancy::NPlusOne,
            other => {
                tracing::warn!(value = other, "unrecognised generator redundancy, using N");
                GeneratorRedundancy::N
            }
        }
    }
}

impl std::fmt::Display for GeneratorRedundancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Input parameters for generator sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorInput {
    /// Continuous load (kW)
    pub total_load_kw: f64,

    /// Largest motor started on the set (kW)
    pub motor_starting_kw: f64,

    pub power_factor: f64,

    /// Site altitude (m)
    pub altitude_m: f64,

    /// Ambient temperature (°C)
    pub temperature_c: f64,

    pub redundancy: GeneratorRedundancy,
}

impl Default for GeneratorInput {
    fn default() -> Self {
        GeneratorInput {
            total_load_kw: 0.0,
            motor_starting_kw: 0.0,
            power_factor: 0.8,
            altitude_m: 0.0,
            temperature_c: 40.0,
            redundancy: GeneratorRedundancy::N,
        }
    }
}

impl GeneratorInput {
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("total_load_kw", self.total_load_kw)?;
        require_non_negative("motor_starting_kw", self.motor_starting_kw)?;
        require_power_factor("power_factor", self.power_factor)?;
        for (field, value) in [("altitude_m", self.altitude_m), ("temperature_c", self.temperature_c)] {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must be a finite number"));
            }
        }
        Ok(())
    }
}

impl NormalizeUnits for GeneratorInput {
    /// Altitude in feet, temperature in °F
    fn to_metric(&self) -> Self {
        GeneratorInput {
            altitude_m: feet_to_meters(self.altitude_m),
            temperature_c: fahrenheit_to_celsius(self.temperature_c),
            ..self.clone()
        }
    }
}

/// Results from generator sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorResult {
    pub continuous_kva: f64,
    /// Continuous load plus motor inrush
    pub peak_kva: f64,
    /// Combined altitude × temperature factor
    pub derating_factor: f64,
    /// Total derated requirement
    pub required_kva: f64,
    /// Requirement per active set
    pub unit_required_kva: f64,
    /// Standard set rating
    pub selected_kva: f64,
    pub total_units: u32,
    pub loading_pct: f64,
    /// Fuel per running set at 75 % load (L/h)
    pub fuel_lph: f64,
    pub redundancy: String,
    pub exceeds_catalog: bool,
}

impl GeneratorResult {
    /// Fuel consumption in US gallons per hour
    pub fn fuel_gph(&self) -> f64 {
        round_to(UsGallons::from(Liters(self.fuel_lph)).value(), 1)
    }
}

/// Size a generator set.
///
/// ## Example
///
/// ```rust
/// use calc_core::calculations::generator::{calculate, GeneratorInput};
///
/// let input = GeneratorInput {
///     total_load_kw: 100.0,
///     motor_starting_kw: 20.0,
///     ..GeneratorInput::default()
/// };
/// let result = calculate(&input).unwrap();
/// assert_eq!(result.peak_kva, 187.5);
/// assert_eq!(result.selected_kva, 200.0);
/// ```
pub fn calculate(input: &GeneratorInput) -> CalcResult<GeneratorResult> {
    input.validate()?;

    let chain = DeratingChain::for_site(input.altitude_m, input.temperature_c);
    let derating = chain.combined()?;

    let continuous_kva = apparent_power_kva(input.total_load_kw, input.power_factor);
    let peak_kw = input.total_load_kw + MOTOR_INRUSH_MULTIPLIER * input.motor_starting_kw;
    let peak_kva = apparent_power_kva(peak_kw, input.power_factor);
    let required_kva = peak_kva / derating;

    let redundancy = input.redundancy;
    let unit_required = required_kva / redundancy.active_units() as f64;
    let selection = GENERATORS_KVA.select(unit_required);
    let selected = selection.value;

    let loading_pct = unit_required / selected * 100.0;
    let fuel_lph = selected * input.power_factor * FUEL_LOAD_FRACTION * FUEL_L_PER_KWH;

    tracing::debug!(
        derating,
        required_kva,
        unit_required,
        selected_kva = selected,
        redundancy = %redundancy,
        "generator sized"
    );

    Ok(GeneratorResult {
        continuous_kva: round_to(continuous_kva, 1),
        peak_kva: round_to(peak_kva, 1),
        derating_factor: round_to(derating, 3),
        required_kva: round_to(required_kva, 1),
        unit_required_kva: round_to(unit_required, 1),
        selected_kva: round_to(selected, 0),
        total_units: redundancy.total_units(),
        loading_pct: round_to(loading_pct, 1),
        fuel_lph: round_to(fuel_lph, 1),
        redundancy: redundancy.code().to_string(),
        exceeds_catalog: selection.exceeds_catalog,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_generator() -> GeneratorInput {
        GeneratorInput {
            total_load_kw: 100.0,
            motor_starting_kw: 20.0,
            ..GeneratorInput::default()
        }
    }

    #[test]
    fn test_standard_site() {
        let result = calculate(&test_generator()).unwrap();
        assert!((result.continuous_kva - 125.0).abs() < 1e-9);
        assert!((result.peak_kva - 187.5).abs() < 1e-9);
        assert_eq!(result.derating_factor, 1.0);
        assert_eq!(result.selected_kva, 200.0);
        assert_eq!(result.total_units, 1);
        assert!((result.loading_pct - 93.75).abs() < 0.1);
        // 200 × 0.8 × 0.75 × 0.21
        assert!((result.fuel_lph - 25.2).abs() < 1e-9);
        assert_eq!(result.redundancy, "N");
    }

    #[test]
    fn test_n_plus_one_splits_requirement() {
        let input = GeneratorInput { redundancy: GeneratorRedundancy::NPlusOne, ..test_generator() };
        let result = calculate(&input).unwrap();
        assert!((result.unit_required_kva - 93.8).abs() < 0.1);
        assert_eq!(result.selected_kva, 100.0);
        assert_eq!(result.total_units, 3);
        assert_eq!(result.redundancy, "N+1");
    }

    #[test]
    fn test_harsh_site_derating() {
        let input = GeneratorInput { altitude_m: 2000.0, temperature_c: 50.0, ..test_generator() };
        let result = calculate(&input).unwrap();
        assert!((result.derating_factor - 0.893).abs() < 1e-9);
        // 187.5 / 0.8928 = 210.0
        assert!((result.required_kva - 210.0).abs() < 0.1);
        assert_eq!(result.selected_kva, 250.0);
    }

    #[test]
    fn test_exhausted_derating_is_degenerate() {
        let input = GeneratorInput { altitude_m: 20_000.0, ..test_generator() };
        let err = calculate(&input).unwrap_err();
        assert_eq!(err.error_code(), "DEGENERATE_INPUT");
    }

    #[test]
    fn test_saturation_flagged() {
        let input = GeneratorInput { total_load_kw: 3000.0, motor_starting_kw: 0.0, ..test_generator() };
        let result = calculate(&input).unwrap();
        assert_eq!(result.selected_kva, 2500.0);
        assert!(result.exceeds_catalog);
    }

    #[test]
    fn test_unknown_redundancy_is_n() {
        let input: GeneratorInput = serde_json::from_str(r#"{"total_load_kw": 10, "redundancy": "2N"}"#).unwrap();
        assert_eq!(input.redundancy, GeneratorRedundancy::N);
    }

    #[test]
    fn test_imperial_site_conditions() {
        let input = GeneratorInput { altitude_m: 6561.68, temperature_c: 122.0, ..test_generator() }.to_metric();
        assert!((input.altitude_m - 2000.0).abs() < 0.01);
        assert!((input.temperature_c - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_fuel_in_gallons() {
        let result = calculate(&test_generator()).unwrap();
        // 25.2 L/h × 0.264172
        assert!((result.fuel_gph() - 6.7).abs() < 1e-9);
    }
}
