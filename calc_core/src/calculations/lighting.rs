//! # Lighting Design (Lumen Method)
//!
//! Number of luminaires needed for a target maintained illuminance on the
//! working plane, plus a regular grid layout.
//!
//! ## Method
//!
//! ```text
//! hm = room_height − work_plane
//! RI = L·W / (hm·(L + W))
//! UF = base(reflectance) × k(RI)
//! N  = ⌈E·A / (UF·MF·Φ)⌉
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::ThresholdTable;
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::units::{feet_to_meters, round_to, NormalizeUnits, SquareFeet, SquareMeters};

/// Room-index multiplier applied to the base utilisation factor
pub const ROOM_INDEX_MULTIPLIER: ThresholdTable = ThresholdTable::new(&[(1.0, 0.75), (2.0, 0.90), (3.0, 1.00)], 1.10);

/// Surface reflectance class of the room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum Reflectance {
    /// Dark surfaces
    Low,
    #[default]
    Medium,
    /// Light-coloured ceiling and walls
    High,
}

impl Reflectance {
    pub const ALL: [Reflectance; 3] = [Reflectance::Low, Reflectance::Medium, Reflectance::High];

    /// Base utilisation factor before the room-index adjustment
    pub fn base_utilization(&self) -> f64 {
        match self {
            Reflectance::Low => 0.40,
            Reflectance::Medium => 0.50,
            Reflectance::High => 0.60,
        }
    }
}

impl From<String> for Reflectance {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Reflectance::Low,
            "medium" => Reflectance::Medium,
            "high" => Reflectance::High,
            other => {
                tracing::warn!(value = other, "unrecognised room reflectance, using medium");
                Reflectance::Medium
            }
        }
    }
}

/// Input parameters for a lighting layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingInput {
    /// Room length (m)
    pub room_length: f64,
    /// Room width (m)
    pub room_width: f64,
    /// Ceiling height (m)
    pub room_height: f64,
    /// Working plane height above floor (m)
    pub work_plane: f64,
    /// Maintained illuminance (lx)
    pub target_lux: f64,
    /// Luminous flux per luminaire (lm)
    pub luminaire_lm: f64,
    /// Power per luminaire (W)
    pub luminaire_w: f64,
    pub maintenance_factor: f64,
    pub room_reflectance: Reflectance,
}

impl Default for LightingInput {
    fn default() -> Self {
        LightingInput {
            room_length: 0.0,
            room_width: 0.0,
            room_height: 3.0,
            work_plane: 0.85,
            target_lux: 500.0,
            luminaire_lm: 3600.0,
            luminaire_w: 36.0,
            maintenance_factor: 0.8,
            room_reflectance: Reflectance::Medium,
        }
    }
}

impl LightingInput {
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("room_length", self.room_length)?;
        require_positive("room_width", self.room_width)?;
        require_positive("room_height", self.room_height)?;
        require_non_negative("work_plane", self.work_plane)?;
        if self.mounting_height() <= 0.0 {
            return Err(CalcError::invalid_input(
                "work_plane",
                self.work_plane.to_string(),
                "Working plane must be below the ceiling",
            ));
        }
        require_positive("target_lux", self.target_lux)?;
        require_positive("luminaire_lm", self.luminaire_lm)?;
        require_non_negative("luminaire_w", self.luminaire_w)?;
        if !(self.maintenance_factor > 0.0 && self.maintenance_factor <= 1.0) {
            return Err(CalcError::invalid_input(
                "maintenance_factor",
                self.maintenance_factor.to_string(),
                "Maintenance factor must be greater than 0 and at most 1",
            ));
        }
        Ok(())
    }

    /// Luminaire height above the working plane (m)
    pub fn mounting_height(&self) -> f64 {
        self.room_height - self.work_plane
    }
}

impl NormalizeUnits for LightingInput {
    /// Room dimensions in feet
    fn to_metric(&self) -> Self {
        LightingInput {
            room_length: feet_to_meters(self.room_length),
            room_width: feet_to_meters(self.room_width),
            room_height: feet_to_meters(self.room_height),
            work_plane: feet_to_meters(self.work_plane),
            ..self.clone()
        }
    }
}

/// Results from a lighting layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingResult {
    pub area_m2: f64,
    pub room_index: f64,
    pub utilization_factor: f64,
    /// Installed flux required (lm)
    pub required_lumens: f64,
    pub num_luminaires: u32,
    /// Maintained illuminance achieved (lx)
    pub actual_lux: f64,
    pub layout_cols: u32,
    pub layout_rows: u32,
    pub total_power_w: f64,
    pub power_density_wm2: f64,
}

impl LightingResult {
    /// Floor area in square feet
    pub fn area_ft2(&self) -> f64 {
        round_to(SquareFeet::from(SquareMeters(self.area_m2)).value(), 1)
    }
}

/// Design a lighting layout.
///
/// ## Example
///
/// ```rust
/// use calc_core::calculations::lighting::{calculate, LightingInput};
///
/// let input = LightingInput { room_length: 10.0, room_width: 8.0, ..LightingInput::default() };
/// let result = calculate(&input).unwrap();
/// assert_eq!(result.num_luminaires, 28);
/// assert!(result.actual_lux >= 500.0);
/// ```
pub fn calculate(input: &LightingInput) -> CalcResult<LightingResult> {
    input.validate()?;

    let length = input.room_length;
    let width = input.room_width;
    let area = length * width;
    let hm = input.mounting_height();

    let room_index = area / (hm * (length + width));
    let uf = input.room_reflectance.base_utilization() * ROOM_INDEX_MULTIPLIER.lookup(room_index);
    let mf = input.maintenance_factor;

    let required_lumens = input.target_lux * area / (uf * mf);
    let fixtures = (required_lumens / input.luminaire_lm).ceil().max(1.0);
    if fixtures > u32::MAX as f64 {
        return Err(CalcError::degenerate(
            "luminaire count",
            format!("{fixtures:.3e} luminaires needed, more than a layout can hold"),
        ));
    }
    let count = fixtures as u32;
    let actual_lux = count as f64 * input.luminaire_lm * uf * mf / area;

    let aspect = length / width;
    let cols = (((count as f64 / aspect).sqrt().ceil()) as u32).max(1);
    let rows = count.div_ceil(cols);

    let total_power = count as f64 * input.luminaire_w;

    tracing::debug!(room_index, uf, count, cols, rows, "lighting layout designed");

    Ok(LightingResult {
        area_m2: round_to(area, 2),
        room_index: round_to(room_index, 2),
        utilization_factor: round_to(uf, 3),
        required_lumens: round_to(required_lumens, 0),
        num_luminaires: count,
        actual_lux: round_to(actual_lux, 0),
        layout_cols: cols,
        layout_rows: rows,
        total_power_w: round_to(total_power, 0),
        power_density_wm2: round_to(total_power / area, 2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_office() -> LightingInput {
        LightingInput {
            room_length: 10.0,
            room_width: 8.0,
            ..LightingInput::default()
        }
    }

    #[test]
    fn test_office_layout() {
        let result = calculate(&test_office()).unwrap();
        // RI = 80 / (2.15 × 18) = 2.07 → multiplier 1.0, UF 0.5
        assert!((result.room_index - 2.07).abs() < 0.005);
        assert!((result.utilization_factor - 0.5).abs() < 1e-9);
        assert!((result.required_lumens - 100_000.0).abs() < 1.0);
        assert_eq!(result.num_luminaires, 28);
        assert!((result.actual_lux - 504.0).abs() < 1.0);
        assert_eq!(result.layout_cols, 5);
        assert_eq!(result.layout_rows, 6);
        assert!((result.total_power_w - 1008.0).abs() < 1e-9);
        assert!((result.power_density_wm2 - 12.6).abs() < 1e-9);
    }

    #[test]
    fn test_achieved_lux_meets_target() {
        for reflectance in Reflectance::ALL {
            let input = LightingInput { room_reflectance: reflectance, ..test_office() };
            let result = calculate(&input).unwrap();
            assert!(result.actual_lux >= input.target_lux);
            assert!(result.layout_cols * result.layout_rows >= result.num_luminaires);
        }
    }

    #[test]
    fn test_room_index_bands() {
        assert_eq!(ROOM_INDEX_MULTIPLIER.lookup(0.5), 0.75);
        assert_eq!(ROOM_INDEX_MULTIPLIER.lookup(1.0), 0.90);
        assert_eq!(ROOM_INDEX_MULTIPLIER.lookup(2.99), 1.00);
        assert_eq!(ROOM_INDEX_MULTIPLIER.lookup(3.0), 1.10);
        assert!(ROOM_INDEX_MULTIPLIER.is_ordered());
    }

    #[test]
    fn test_minimum_one_luminaire() {
        let input = LightingInput { room_length: 1.0, room_width: 1.0, target_lux: 1.0, ..LightingInput::default() };
        let result = calculate(&input).unwrap();
        assert_eq!(result.num_luminaires, 1);
        assert_eq!(result.layout_cols, 1);
        assert_eq!(result.layout_rows, 1);
    }

    #[test]
    fn test_unbounded_fixture_count_is_degenerate() {
        let input = LightingInput {
            room_length: 1000.0,
            room_width: 1000.0,
            target_lux: 1e12,
            luminaire_lm: 1.0,
            ..LightingInput::default()
        };
        let err = calculate(&input).unwrap_err();
        assert_eq!(err.error_code(), "DEGENERATE_INPUT");
        assert!(matches!(err, CalcError::DegenerateInput { ref quantity, .. } if quantity == "luminaire count"));
    }

    #[test]
    fn test_work_plane_at_ceiling_rejected() {
        let input = LightingInput { work_plane: 3.0, ..test_office() };
        let err = calculate(&input).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "work_plane"));
    }

    #[test]
    fn test_zero_area_rejected() {
        let input = LightingInput { room_width: 0.0, ..test_office() };
        assert!(calculate(&input).is_err());
    }

    #[test]
    fn test_reflectance_parsing() {
        let input: LightingInput =
            serde_json::from_str(r#"{"room_length": 5, "room_width": 4, "room_reflectance": "HIGH"}"#).unwrap();
        assert_eq!(input.room_reflectance, Reflectance::High);
        let input: LightingInput =
            serde_json::from_str(r#"{"room_length": 5, "room_width": 4, "room_reflectance": "glossy"}"#).unwrap();
        assert_eq!(input.room_reflectance, Reflectance::Medium);
    }

    #[test]
    fn test_imperial_room() {
        let input = LightingInput { room_length: 32.8084, room_width: 26.2467, ..test_office() }.to_metric();
        assert!((input.room_length - 10.0).abs() < 1e-3);
        let result = calculate(&LightingInput { room_height: 3.0, work_plane: 0.85, ..input }).unwrap();
        assert!((result.area_ft2() - 861.1).abs() < 0.2);
    }
}
