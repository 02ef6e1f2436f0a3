//! # Power / Cable Calculation
//!
//! Sizes a final circuit: load current, voltage drop, cable ampacity check,
//! protective breaker and prospective short-circuit current.
//!
//! ## Assumptions
//!
//! - Conductor resistance at 70 °C operating temperature
//! - Ampacity per IEC 60364-5-52 (PVC insulation, 30 °C ambient)
//! - Fault level limited by an assumed upstream transformer (see
//!   [`CableSettings`](crate::settings::CableSettings)) or by the cable
//!   resistance, whichever is lower
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::cable::{calculate, CableInput};
//! use calc_core::settings::EngineSettings;
//!
//! let input = CableInput { load_kw: 10.0, ..CableInput::default() };
//! let result = calculate(&input, &EngineSettings::default()).unwrap();
//!
//! assert_eq!(result.current_a, 16.04);
//! assert_eq!(result.circuit_breaker_a, 20.0);
//! assert!(result.cable_ok);
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{CableTable, Conductor, Mounting, BREAKERS_A};
use crate::equations::power::{line_current_a, transformer_fault_current_a, voltage_drop_v, Phases, SQRT_3};
use crate::errors::{require_non_negative, require_positive, require_power_factor, CalcError, CalcResult};
use crate::settings::{CableFallback, EngineSettings};
use crate::units::{closest_awg, feet_to_meters, round_to, NormalizeUnits};

/// Input parameters for a cable run.
///
/// ## JSON Example
///
/// ```json
/// {
///   "load_kw": 10.0,
///   "phases": "3F_400V",
///   "cable_mm2": 2.5,
///   "cable_type": "Cu",
///   "length_m": 10.0,
///   "mounting": "open",
///   "power_factor": 0.9
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CableInput {
    /// Connected load (kW)
    pub load_kw: f64,

    /// Supply configuration
    pub phases: Phases,

    /// Conductor cross-section (mm²)
    pub cable_mm2: f64,

    /// Conductor material
    pub cable_type: Conductor,

    /// Route length (m)
    pub length_m: f64,

    /// Installation method
    pub mounting: Mounting,

    /// Load power factor
    pub power_factor: f64,
}

impl Default for CableInput {
    fn default() -> Self {
        CableInput {
            load_kw: 0.0,
            phases: Phases::Three400,
            cable_mm2: 2.5,
            cable_type: Conductor::Copper,
            length_m: 10.0,
            mounting: Mounting::Open,
            power_factor: 0.9,
        }
    }
}

impl CableInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("load_kw", self.load_kw)?;
        if self.length_m <= 0.0 || !self.length_m.is_finite() {
            return Err(CalcError::invalid_input(
                "length_m",
                self.length_m.to_string(),
                "Cable length must be positive",
            ));
        }
        require_positive("cable_mm2", self.cable_mm2)?;
        require_power_factor("power_factor", self.power_factor)?;
        Ok(())
    }

    /// Conductor resistance per metre (Ω/m)
    pub fn resistance_per_m(&self) -> f64 {
        self.cable_type.resistivity() / self.cable_mm2
    }
}

impl NormalizeUnits for CableInput {
    /// Route length given in feet
    fn to_metric(&self) -> Self {
        CableInput {
            length_m: feet_to_meters(self.length_m),
            ..self.clone()
        }
    }
}

/// Results from a cable calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "current_a": 16.04,
///   "voltage_drop_pct": 0.63,
///   "short_circuit_ka": 2.57,
///   "cable_mm2": 2.5,
///   "cable_max_a": 27.0,
///   "circuit_breaker_a": 20.0,
///   "cable_ok": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CableResult {
    /// Load current (A)
    pub current_a: f64,

    /// Voltage drop as a percentage of nominal voltage
    pub voltage_drop_pct: f64,

    /// Prospective short-circuit current at the load end (kA)
    pub short_circuit_ka: f64,

    /// Conductor cross-section (mm²)
    pub cable_mm2: f64,

    /// Cable ampacity (A)
    pub cable_max_a: f64,

    /// Selected breaker rating (A)
    pub circuit_breaker_a: f64,

    /// Cable ampacity covers the load current
    pub cable_ok: bool,

    /// Voltage drop within the configured limit
    pub voltage_drop_ok: bool,

    /// Load current exceeds the largest standard breaker
    pub breaker_exceeds_catalog: bool,

    /// Cross-section was not in the ampacity table; `cable_max_a` is the
    /// configured fallback value
    pub ampacity_fallback_used: bool,
}

impl CableResult {
    /// Check if the circuit passes both ampacity and voltage-drop checks
    pub fn passes(&self) -> bool {
        self.cable_ok && self.voltage_drop_ok
    }

    /// Nearest AWG gauge to the conductor cross-section
    pub fn cable_awg(&self) -> &'static str {
        closest_awg(self.cable_mm2)
    }
}

/// Calculate a cable run.
///
/// # Arguments
///
/// * `input` - Cable and load parameters
/// * `settings` - Upstream supply and fallback assumptions
///
/// # Returns
///
/// * `Ok(CableResult)` - Calculation results
/// * `Err(CalcError)` - If inputs are invalid, or the cross-section is
///   unlisted under the `Reject` fallback policy
pub fn calculate(input: &CableInput, settings: &EngineSettings) -> CalcResult<CableResult> {
    input.validate()?;

    let voltage = input.phases.voltage();
    let three_phase = input.phases.is_three_phase();

    let current_a = line_current_a(input.load_kw, voltage, input.power_factor, three_phase);

    let resistance_per_m = input.resistance_per_m();
    let drop_v = voltage_drop_v(input.length_m, current_a, resistance_per_m, three_phase);
    let voltage_drop_pct = drop_v / voltage * 100.0;

    let table = CableTable::for_installation(input.cable_type, input.mounting);
    let (cable_max_a, ampacity_fallback_used) = match table.ampacity(input.cable_mm2) {
        Some(amps) => (amps, false),
        None => match settings.cable.fallback {
            CableFallback::Default { ampacity_a } => {
                tracing::warn!(
                    cable_mm2 = input.cable_mm2,
                    fallback_a = ampacity_a,
                    "cross-section not in {} {} table, using fallback ampacity",
                    input.cable_type,
                    input.mounting
                );
                (ampacity_a, true)
            }
            CableFallback::Reject => {
                return Err(CalcError::UnknownCableSize {
                    material: input.cable_type.code().to_string(),
                    mounting: input.mounting.code().to_string(),
                    cable_mm2: input.cable_mm2,
                });
            }
        },
    };

    let breaker = BREAKERS_A.select(current_a);

    // Fault level: upstream transformer contribution vs. cable-limited value
    let isc_transformer = transformer_fault_current_a(
        settings.cable.upstream_transformer_kva,
        voltage,
        settings.cable.upstream_impedance_pct,
        three_phase,
    );
    let cable_impedance = resistance_per_m * input.length_m;
    let isc_cable = voltage / (cable_impedance * SQRT_3);
    let short_circuit_ka = isc_transformer.min(isc_cable) / 1000.0;

    tracing::debug!(
        current_a,
        voltage_drop_pct,
        cable_max_a,
        breaker_a = breaker.value,
        short_circuit_ka,
        "cable sized"
    );

    Ok(CableResult {
        current_a: round_to(current_a, 2),
        voltage_drop_pct: round_to(voltage_drop_pct, 2),
        short_circuit_ka: round_to(short_circuit_ka, 2),
        cable_mm2: input.cable_mm2,
        cable_max_a: round_to(cable_max_a, 1),
        circuit_breaker_a: breaker.value,
        cable_ok: current_a <= cable_max_a,
        voltage_drop_ok: voltage_drop_pct <= settings.cable.max_voltage_drop_pct,
        breaker_exceeds_catalog: breaker.exceeds_catalog,
        ampacity_fallback_used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cable() -> CableInput {
        CableInput {
            load_kw: 10.0,
            phases: Phases::Three400,
            cable_mm2: 2.5,
            cable_type: Conductor::Copper,
            length_m: 10.0,
            mounting: Mounting::Open,
            power_factor: 0.9,
        }
    }

    #[test]
    fn test_reference_scenario() {
        let result = calculate(&test_cable(), &EngineSettings::default()).unwrap();
        // I = 10000 / (√3 × 400 × 0.9) = 16.04 A
        assert!((result.current_a - 16.04).abs() < 0.01);
        assert_eq!(result.cable_max_a, 27.0);
        assert_eq!(result.cable_awg(), "13");
        assert!(result.cable_ok);
        assert_eq!(result.circuit_breaker_a, 20.0);
        assert!(!result.ampacity_fallback_used);
        assert!(result.passes());
    }

    #[test]
    fn test_voltage_drop() {
        let result = calculate(&test_cable(), &EngineSettings::default()).unwrap();
        // ΔU = √3 × 10 × 16.04 × 0.009 = 2.5 V → 0.625 %
        assert!((result.voltage_drop_pct - 0.625).abs() < 0.01);
        // Cable-limited fault: 400 / (0.09 Ω × √3) = 2.57 kA
        assert!((result.short_circuit_ka - 2.57).abs() < 0.01);
    }

    #[test]
    fn test_single_phase_round_trip_drop() {
        let input = CableInput {
            load_kw: 2.3,
            phases: Phases::Single230,
            power_factor: 1.0,
            length_m: 50.0,
            ..test_cable()
        };
        let result = calculate(&input, &EngineSettings::default()).unwrap();
        assert!((result.current_a - 10.0).abs() < 1e-9);
        // ΔU = 2 × 50 × 10 × 0.0225 / 2.5 = 9 V → 3.91 %
        assert!((result.voltage_drop_pct - 3.91).abs() < 0.01);
        assert_eq!(result.circuit_breaker_a, 10.0);
    }

    #[test]
    fn test_short_circuit_is_minimum() {
        let settings = EngineSettings::default();
        // Short run: cable impedance is tiny, transformer limits the fault
        let short = CableInput { length_m: 0.01, cable_mm2: 240.0, ..test_cable() };
        let result = calculate(&short, &settings).unwrap();
        assert!((result.short_circuit_ka - 22.73).abs() < 0.01);

        // Long thin run: cable limits the fault
        let long = CableInput { length_m: 100.0, ..test_cable() };
        let result = calculate(&long, &settings).unwrap();
        // 400 / (0.9 Ω × √3) = 256.6 A
        assert!((result.short_circuit_ka - 0.26).abs() < 0.01);
    }

    #[test]
    fn test_conduit_table() {
        let input = CableInput { mounting: Mounting::Conduit, load_kw: 13.0, ..test_cable() };
        let result = calculate(&input, &EngineSettings::default()).unwrap();
        assert_eq!(result.cable_max_a, 21.0);
        // 13 kW → 20.85 A, still within 21 A
        assert!(result.cable_ok);
        assert_eq!(result.circuit_breaker_a, 25.0);
    }

    #[test]
    fn test_undersized_cable_flagged() {
        let input = CableInput { load_kw: 30.0, ..test_cable() };
        let result = calculate(&input, &EngineSettings::default()).unwrap();
        assert!(!result.cable_ok);
    }

    #[test]
    fn test_unlisted_section_uses_fallback() {
        let input = CableInput { cable_mm2: 3.0, ..test_cable() };
        let result = calculate(&input, &EngineSettings::default()).unwrap();
        assert!(result.ampacity_fallback_used);
        assert_eq!(result.cable_max_a, 21.0);
    }

    #[test]
    fn test_unlisted_section_rejected_by_policy() {
        let mut settings = EngineSettings::default();
        settings.cable.fallback = CableFallback::Reject;
        let input = CableInput { cable_mm2: 3.0, ..test_cable() };
        let err = calculate(&input, &settings).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_CABLE_SIZE");
    }

    #[test]
    fn test_breaker_saturation() {
        let input = CableInput { load_kw: 500.0, cable_mm2: 240.0, ..test_cable() };
        let result = calculate(&input, &EngineSettings::default()).unwrap();
        assert_eq!(result.circuit_breaker_a, 630.0);
        assert!(result.breaker_exceeds_catalog);
    }

    #[test]
    fn test_invalid_length() {
        let input = CableInput { length_m: 0.0, ..test_cable() };
        let err = calculate(&input, &EngineSettings::default()).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "length_m"));
    }

    #[test]
    fn test_invalid_cross_section() {
        let input = CableInput { cable_mm2: -2.5, ..test_cable() };
        assert!(calculate(&input, &EngineSettings::default()).is_err());
    }

    #[test]
    fn test_imperial_length() {
        let input = CableInput { length_m: 100.0, ..test_cable() }.to_metric();
        assert!((input.length_m - 30.48).abs() < 1e-9);
    }

    #[test]
    fn test_defaults_from_json() {
        let input: CableInput = serde_json::from_str(r#"{"load_kw": 10}"#).unwrap();
        assert_eq!(input, test_cable());
    }
}
