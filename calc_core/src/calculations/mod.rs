//! # Sizing Calculations
//!
//! This module contains all equipment sizing calculators. Each calculation
//! follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable, absent fields defaulted)
//! - `*Result` - Calculation results (JSON-serializable, rounded for display)
//! - `calculate(input[, settings]) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`cable`] - Load current, voltage drop, breaker and fault level
//! - [`ups`] - UPS rating and battery capacity
//! - [`transformer`] - Distribution transformer from a load schedule
//! - [`generator`] - Derated standby generator set
//! - [`pfc`] - Power factor correction capacitor bank
//! - [`lighting`] - Luminaire count and layout (lumen method)
//! - [`grounding`] - Earth rod resistance and rod count
//! - [`cost`] - Energy cost and CO2 emissions
//! - [`motor`] - Motor starting current and protection gear
//!
//! ## Dispatch
//!
//! [`CalculationItem`] wraps any input with a `"type"` tag so a single JSON
//! document can name the calculator to run:
//!
//! ```rust
//! use calc_core::calculations::CalculationItem;
//! use calc_core::settings::EngineSettings;
//!
//! let item: CalculationItem = serde_json::from_str(
//!     r#"{"type": "Ups", "it_load_kw": 100, "runtime_min": 10}"#,
//! ).unwrap();
//!
//! let output = item.run(&EngineSettings::default()).unwrap();
//! assert_eq!(output.configuration(), Some("Dual Path (A+B)"));
//! ```

pub mod cable;
pub mod cost;
pub mod generator;
pub mod grounding;
pub mod lighting;
pub mod motor;
pub mod pfc;
pub mod transformer;
pub mod ups;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::CalcResult;
use crate::settings::EngineSettings;
use crate::units::{NormalizeUnits, UnitSystem};

// Re-export commonly used types
pub use cable::{CableInput, CableResult};
pub use cost::{CostInput, CostResult};
pub use generator::{GeneratorInput, GeneratorRedundancy, GeneratorResult};
pub use grounding::{GroundingInput, GroundingResult, RodSearch};
pub use lighting::{LightingInput, LightingResult, Reflectance};
pub use motor::{MotorInput, MotorResult, StartingMethod};
pub use pfc::{PfcInput, PfcResult};
pub use transformer::{TransformerInput, TransformerLoad, TransformerResult};
pub use ups::{UpsInput, UpsRedundancy, UpsResult, UpsSizing};

/// Enum wrapper for all calculation types.
///
/// This allows a request to carry any calculator input while maintaining
/// type safety and clean serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Power/cable sizing
    Cable(CableInput),
    /// UPS and battery sizing
    Ups(UpsInput),
    Transformer(TransformerInput),
    Generator(GeneratorInput),
    /// Power factor correction
    Pfc(PfcInput),
    Lighting(LightingInput),
    Grounding(GroundingInput),
    /// Electricity cost estimate
    Cost(CostInput),
    /// Motor starting
    Motor(MotorInput),
}

impl CalculationItem {
    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Cable(_) => "Cable",
            CalculationItem::Ups(_) => "Ups",
            CalculationItem::Transformer(_) => "Transformer",
            CalculationItem::Generator(_) => "Generator",
            CalculationItem::Pfc(_) => "Pfc",
            CalculationItem::Lighting(_) => "Lighting",
            CalculationItem::Grounding(_) => "Grounding",
            CalculationItem::Cost(_) => "Cost",
            CalculationItem::Motor(_) => "Motor",
        }
    }

    /// Human-readable calculator name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            CalculationItem::Cable(_) => "Power & Cable Sizing",
            CalculationItem::Ups(_) => "UPS & Battery Sizing",
            CalculationItem::Transformer(_) => "Transformer Sizing",
            CalculationItem::Generator(_) => "Generator Sizing",
            CalculationItem::Pfc(_) => "Power Factor Correction",
            CalculationItem::Lighting(_) => "Lighting Design",
            CalculationItem::Grounding(_) => "Grounding Resistance",
            CalculationItem::Cost(_) => "Electricity Cost",
            CalculationItem::Motor(_) => "Motor Starting",
        }
    }

    /// Convert length and temperature inputs from `system` to metric.
    ///
    /// Calculators without such inputs are returned unchanged.
    pub fn normalized(&self, system: UnitSystem) -> Self {
        match self {
            CalculationItem::Cable(input) => CalculationItem::Cable(input.normalized(system)),
            CalculationItem::Generator(input) => CalculationItem::Generator(input.normalized(system)),
            CalculationItem::Lighting(input) => CalculationItem::Lighting(input.normalized(system)),
            CalculationItem::Grounding(input) => CalculationItem::Grounding(input.normalized(system)),
            other => other.clone(),
        }
    }

    /// Run the wrapped calculator.
    pub fn run(&self, settings: &EngineSettings) -> CalcResult<CalculationOutput> {
        tracing::debug!(calc_type = self.calc_type(), "running calculation");
        let output = match self {
            CalculationItem::Cable(input) => CalculationOutput::Cable(cable::calculate(input, settings)?),
            CalculationItem::Ups(input) => CalculationOutput::Ups(ups::calculate(input)?),
            CalculationItem::Transformer(input) => CalculationOutput::Transformer(transformer::calculate(input)?),
            CalculationItem::Generator(input) => CalculationOutput::Generator(generator::calculate(input)?),
            CalculationItem::Pfc(input) => CalculationOutput::Pfc(pfc::calculate(input, settings)?),
            CalculationItem::Lighting(input) => CalculationOutput::Lighting(lighting::calculate(input)?),
            CalculationItem::Grounding(input) => CalculationOutput::Grounding(grounding::calculate(input)?),
            CalculationItem::Cost(input) => CalculationOutput::Cost(cost::calculate(input, settings)?),
            CalculationItem::Motor(input) => CalculationOutput::Motor(motor::calculate(input)?),
        };
        Ok(output)
    }
}

/// Result of any calculator.
///
/// Serializes as the bare result record (no tag), which is what the
/// `"results"` field of a response carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CalculationOutput {
    Cable(CableResult),
    Ups(UpsResult),
    Transformer(TransformerResult),
    Generator(GeneratorResult),
    Pfc(PfcResult),
    Lighting(LightingResult),
    Grounding(GroundingResult),
    Cost(CostResult),
    Motor(MotorResult),
}

impl CalculationOutput {
    /// Topology label reported alongside the results (UPS only)
    pub fn configuration(&self) -> Option<&str> {
        match self {
            CalculationOutput::Ups(result) => Some(&result.configuration),
            _ => None,
        }
    }

    /// Extra display fields for imperial clients.
    ///
    /// Results stay metric; these sit alongside them (`fuel_gph`,
    /// `area_ft2`, `cable_awg`).
    pub fn imperial_fields(&self) -> Vec<(&'static str, Value)> {
        match self {
            CalculationOutput::Cable(r) => vec![("cable_awg", json!(r.cable_awg()))],
            CalculationOutput::Generator(r) => vec![("fuel_gph", json!(r.fuel_gph()))],
            CalculationOutput::Lighting(r) => vec![("area_ft2", json!(r.area_ft2()))],
            CalculationOutput::Motor(r) => vec![("cable_awg", json!(r.cable_awg()))],
            _ => Vec::new(),
        }
    }

    /// True when any standard-size selection saturated
    pub fn exceeds_catalog(&self) -> bool {
        match self {
            CalculationOutput::Cable(r) => r.breaker_exceeds_catalog,
            CalculationOutput::Transformer(r) => r.exceeds_catalog,
            CalculationOutput::Generator(r) => r.exceeds_catalog,
            CalculationOutput::Pfc(r) => r.exceeds_catalog,
            CalculationOutput::Motor(r) => r.exceeds_catalog,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_dispatch() {
        let item: CalculationItem = serde_json::from_str(r#"{"type": "Cable", "load_kw": 10}"#).unwrap();
        assert_eq!(item.calc_type(), "Cable");
        let output = item.run(&EngineSettings::default()).unwrap();
        match output {
            CalculationOutput::Cable(result) => assert_eq!(result.circuit_breaker_a, 20.0),
            other => panic!("unexpected output {:?}", other),
        }
    }

    #[test]
    fn test_output_serializes_untagged() {
        let item = CalculationItem::Motor(MotorInput { motor_kw: 10.0, ..MotorInput::default() });
        let output = item.run(&EngineSettings::default()).unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert!(json.get("type").is_none());
        assert_eq!(json["sync_rpm"], 1500.0);
        assert_eq!(output.configuration(), None);
    }

    #[test]
    fn test_ups_configuration_label() {
        let item = CalculationItem::Ups(UpsInput {
            it_load_kw: 10.0,
            redundancy_level: UpsRedundancy::NPlusOne,
            ..UpsInput::default()
        });
        let output = item.run(&EngineSettings::default()).unwrap();
        assert_eq!(output.configuration(), Some("Parallel Redundant"));
    }

    #[test]
    fn test_errors_are_isolated() {
        let bad = CalculationItem::Transformer(TransformerInput::default());
        let good = CalculationItem::Cost(CostInput { load_kw: 5.0, ..CostInput::default() });
        let settings = EngineSettings::default();
        assert!(bad.run(&settings).is_err());
        assert!(good.run(&settings).is_ok());
    }

    #[test]
    fn test_imperial_normalization() {
        let item = CalculationItem::Cable(CableInput { load_kw: 10.0, length_m: 100.0, ..CableInput::default() });
        match item.normalized(UnitSystem::Imperial) {
            CalculationItem::Cable(input) => assert!((input.length_m - 30.48).abs() < 1e-9),
            other => panic!("unexpected item {:?}", other),
        }
        // Calculators without lengths pass through
        let ups = CalculationItem::Ups(UpsInput::default());
        assert_eq!(ups.normalized(UnitSystem::Imperial), ups);
    }

    #[test]
    fn test_imperial_fields() {
        let settings = EngineSettings::default();
        let generator = CalculationItem::Generator(GeneratorInput {
            total_load_kw: 100.0,
            motor_starting_kw: 20.0,
            ..GeneratorInput::default()
        });
        let fields = generator.run(&settings).unwrap().imperial_fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0, "fuel_gph");
        assert_eq!(fields[0].1, 6.7);

        let motor = CalculationItem::Motor(MotorInput { motor_kw: 10.0, ..MotorInput::default() });
        assert_eq!(motor.run(&settings).unwrap().imperial_fields(), vec![("cable_awg", json!("13"))]);

        let cost = CalculationItem::Cost(CostInput { load_kw: 5.0, ..CostInput::default() });
        assert!(cost.run(&settings).unwrap().imperial_fields().is_empty());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: Result<CalculationItem, _> = serde_json::from_str(r#"{"type": "Battery"}"#);
        assert!(result.is_err());
    }
}
