//! # UPS and Battery Sizing
//!
//! Sizes a UPS system for an IT load: apparent power, design load with growth
//! and safety margins, per-unit rating for the chosen redundancy topology,
//! battery capacity on a 480 V DC bus and heat rejection.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::ups::{calculate, UpsInput, UpsRedundancy};
//!
//! let input = UpsInput {
//!     it_load_kw: 100.0,
//!     runtime_min: 10.0,
//!     redundancy_level: UpsRedundancy::TwoN,
//!     ..UpsInput::default()
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.configuration, "Dual Path (A+B)");
//! assert_eq!(result.design_load_kva, 146.67);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::power::apparent_power_kva;
use crate::errors::{require_non_negative, require_power_factor, CalcResult};
use crate::units::round_to;

/// Battery DC bus voltage (V)
pub const DC_BUS_V: f64 = 480.0;

/// Battery discharge/inverter efficiency
pub const BATTERY_EFFICIENCY: f64 = 0.92;

/// BTU/h per kW of dissipated power
pub const BTU_PER_KW: f64 = 3412.0;

// =============================================================================
// REDUNDANCY
// =============================================================================

/// UPS redundancy topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum UpsRedundancy {
    /// Two independent full-capacity paths
    #[default]
    #[serde(rename = "2N")]
    TwoN,
    /// Two half-capacity modules plus one spare
    #[serde(rename = "N+1")]
    NPlusOne,
    /// One full-capacity unit
    #[serde(rename = "N")]
    Single,
}

impl UpsRedundancy {
    pub const ALL: [UpsRedundancy; 3] = [UpsRedundancy::TwoN, UpsRedundancy::NPlusOne, UpsRedundancy::Single];

    /// Topology label reported as `configuration`
    pub fn configuration(&self) -> &'static str {
        match self {
            UpsRedundancy::TwoN => "Dual Path (A+B)",
            UpsRedundancy::NPlusOne => "Parallel Redundant",
            UpsRedundancy::Single => "Single Path",
        }
    }

    /// Required unit rating as a fraction of the design load
    pub fn rating_share(&self) -> f64 {
        match self {
            UpsRedundancy::NPlusOne => 0.5,
            _ => 1.0,
        }
    }

    /// Installed UPS units
    pub fn units_total(&self) -> u32 {
        match self {
            UpsRedundancy::TwoN => 2,
            UpsRedundancy::NPlusOne => 3,
            UpsRedundancy::Single => 1,
        }
    }

    /// Request code ("2N", "N+1", "N")
    pub fn code(&self) -> &'static str {
        match self {
            UpsRedundancy::TwoN => "2N",
            UpsRedundancy::NPlusOne => "N+1",
            UpsRedundancy::Single => "N",
        }
    }
}

impl From<String> for UpsRedundancy {
    fn from(value: String) -> Self {
        match value.trim() {
            "2N" => UpsRedundancy::TwoN,
            "N+1" => UpsRedundancy::NPlusOne,
            "N" => UpsRedundancy::Single,
            other => {
                tracing::warn!(value = other, "unrecognised UPS redundancy, using single path");
                UpsRedundancy::Single
            }
        }
    }
}

impl std::fmt::Display for UpsRedundancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// =============================================================================
// INPUT
// =============================================================================

/// Input parameters for UPS sizing.
///
/// Margins are percentages (20 means +20 %).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpsInput {
    /// IT load (kW)
    pub it_load_kw: f64,

    /// Required battery autonomy (minutes)
    pub runtime_min: f64,

    /// Redundancy topology
    pub redundancy_level: UpsRedundancy,

    /// Load power factor
    pub power_factor: f64,

    /// Allowance for future load growth (%)
    pub growth_margin: f64,

    /// Engineering safety margin (%)
    pub safety_margin: f64,
}

impl Default for UpsInput {
    fn default() -> Self {
        UpsInput {
            it_load_kw: 0.0,
            runtime_min: 0.0,
            redundancy_level: UpsRedundancy::TwoN,
            power_factor: 0.9,
            growth_margin: 20.0,
            safety_margin: 10.0,
        }
    }
}

impl UpsInput {
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("it_load_kw", self.it_load_kw)?;
        require_non_negative("runtime_min", self.runtime_min)?;
        require_power_factor("power_factor", self.power_factor)?;
        require_non_negative("growth_margin", self.growth_margin)?;
        require_non_negative("safety_margin", self.safety_margin)?;
        Ok(())
    }
}

// =============================================================================
// SIZING
// =============================================================================

/// Unrounded UPS sizing shared by [`calculate`] and the PDF report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsSizing {
    pub redundancy: UpsRedundancy,
    pub apparent_power_kva: f64,
    pub design_load_kva: f64,
    /// Minimum rating of each UPS unit
    pub unit_rating: f64,
    pub units_total: u32,
    pub battery_ah: f64,
    pub heat_btu_h: f64,
}

/// Compute the UPS sizing at full precision.
pub fn size_ups(input: &UpsInput) -> CalcResult<UpsSizing> {
    input.validate()?;

    let apparent = apparent_power_kva(input.it_load_kw, input.power_factor);
    let design_load = apparent * (1.0 + input.growth_margin / 100.0) * (1.0 + input.safety_margin / 100.0);

    let redundancy = input.redundancy_level;
    let unit_rating = design_load * redundancy.rating_share();

    let runtime_h = input.runtime_min / 60.0;
    let battery_ah = design_load * 1000.0 * runtime_h / (DC_BUS_V * BATTERY_EFFICIENCY);

    let sizing = UpsSizing {
        redundancy,
        apparent_power_kva: apparent,
        design_load_kva: design_load,
        unit_rating,
        units_total: redundancy.units_total(),
        battery_ah,
        heat_btu_h: design_load * BTU_PER_KW,
    };

    tracing::debug!(
        redundancy = %redundancy,
        design_load_kva = design_load,
        unit_rating,
        battery_ah,
        "UPS sized"
    );

    Ok(sizing)
}

// =============================================================================
// RESULT
// =============================================================================

/// Results from UPS sizing.
///
/// ## JSON Example
///
/// ```json
/// {
///   "configuration": "Dual Path (A+B)",
///   "ups_unit_min_kw": 146.67,
///   "ups_unit_min_kva": 162.96,
///   "total_battery_ah": 55.35,
///   "heat_dissipation_btu": 500427.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsResult {
    /// Topology label
    pub configuration: String,
    pub apparent_power_kva: f64,
    pub design_load_kva: f64,
    /// Minimum rating per UPS unit
    pub ups_unit_min_kw: f64,
    /// Unit rating divided by power factor
    pub ups_unit_min_kva: f64,
    pub units_total: u32,
    pub total_battery_ah: f64,
    /// Heat rejection (BTU/h)
    pub heat_dissipation_btu: f64,
    /// Echoed inputs
    pub power_factor: f64,
    pub growth_margin_pct: f64,
    pub safety_margin_pct: f64,
}

impl UpsResult {
    fn from_sizing(input: &UpsInput, sizing: &UpsSizing) -> Self {
        UpsResult {
            configuration: sizing.redundancy.configuration().to_string(),
            apparent_power_kva: round_to(sizing.apparent_power_kva, 2),
            design_load_kva: round_to(sizing.design_load_kva, 2),
            ups_unit_min_kw: round_to(sizing.unit_rating, 2),
            ups_unit_min_kva: round_to(sizing.unit_rating / input.power_factor, 2),
            units_total: sizing.units_total,
            total_battery_ah: round_to(sizing.battery_ah, 2),
            heat_dissipation_btu: round_to(sizing.heat_btu_h, 0),
            power_factor: input.power_factor,
            growth_margin_pct: input.growth_margin,
            safety_margin_pct: input.safety_margin,
        }
    }
}

/// Size a UPS system.
pub fn calculate(input: &UpsInput) -> CalcResult<UpsResult> {
    let sizing = size_ups(input)?;
    Ok(UpsResult::from_sizing(input, &sizing))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ups() -> UpsInput {
        UpsInput {
            it_load_kw: 100.0,
            runtime_min: 10.0,
            redundancy_level: UpsRedundancy::TwoN,
            power_factor: 0.9,
            growth_margin: 20.0,
            safety_margin: 10.0,
        }
    }

    #[test]
    fn test_reference_scenario() {
        let result = calculate(&test_ups()).unwrap();
        assert_eq!(result.configuration, "Dual Path (A+B)");
        assert!((result.apparent_power_kva - 111.11).abs() < 0.01);
        assert!((result.design_load_kva - 146.67).abs() < 0.01);
        assert!((result.ups_unit_min_kw - 146.67).abs() < 0.01);
        assert!((result.ups_unit_min_kva - 162.96).abs() < 0.01);
        assert_eq!(result.units_total, 2);
        // 146 667 W × (10/60) h / (480 V × 0.92)
        assert!((result.total_battery_ah - 55.35).abs() < 0.01);
        assert!((result.heat_dissipation_btu - 500_427.0).abs() < 1.0);
    }

    #[test]
    fn test_n_plus_one_halves_rating() {
        let input = UpsInput { redundancy_level: UpsRedundancy::NPlusOne, ..test_ups() };
        let result = calculate(&input).unwrap();
        assert_eq!(result.configuration, "Parallel Redundant");
        assert!((result.ups_unit_min_kw - 73.33).abs() < 0.01);
        assert_eq!(result.units_total, 3);
        // Battery and heat follow the full design load
        assert!((result.total_battery_ah - 55.35).abs() < 0.01);
    }

    #[test]
    fn test_unknown_redundancy_is_single_path() {
        let input: UpsInput = serde_json::from_str(r#"{"it_load_kw": 50, "redundancy_level": "3N"}"#).unwrap();
        assert_eq!(input.redundancy_level, UpsRedundancy::Single);
        let result = calculate(&input).unwrap();
        assert_eq!(result.configuration, "Single Path");
        assert_eq!(result.units_total, 1);
    }

    #[test]
    fn test_default_redundancy_is_2n() {
        let input: UpsInput = serde_json::from_str(r#"{"it_load_kw": 50}"#).unwrap();
        assert_eq!(input.redundancy_level, UpsRedundancy::TwoN);
    }

    #[test]
    fn test_rating_covers_apparent_power() {
        for redundancy in [UpsRedundancy::TwoN, UpsRedundancy::Single] {
            let sizing = size_ups(&UpsInput { redundancy_level: redundancy, ..test_ups() }).unwrap();
            assert!(sizing.unit_rating >= sizing.apparent_power_kva);
        }
    }

    #[test]
    fn test_monotone_in_margins_and_load() {
        let base = size_ups(&test_ups()).unwrap();
        let more_growth = size_ups(&UpsInput { growth_margin: 30.0, ..test_ups() }).unwrap();
        let more_safety = size_ups(&UpsInput { safety_margin: 15.0, ..test_ups() }).unwrap();
        let more_load = size_ups(&UpsInput { it_load_kw: 120.0, ..test_ups() }).unwrap();
        assert!(more_growth.design_load_kva > base.design_load_kva);
        assert!(more_safety.design_load_kva > base.design_load_kva);
        assert!(more_load.unit_rating > base.unit_rating);
    }

    #[test]
    fn test_zero_runtime_needs_no_battery() {
        let result = calculate(&UpsInput { runtime_min: 0.0, ..test_ups() }).unwrap();
        assert_eq!(result.total_battery_ah, 0.0);
    }

    #[test]
    fn test_invalid_power_factor() {
        let err = calculate(&UpsInput { power_factor: 0.0, ..test_ups() }).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(calculate(&UpsInput { power_factor: 1.2, ..test_ups() }).is_err());
    }

    #[test]
    fn test_negative_load_rejected() {
        assert!(calculate(&UpsInput { it_load_kw: -1.0, ..test_ups() }).is_err());
    }
}
