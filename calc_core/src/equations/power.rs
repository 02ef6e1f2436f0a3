//! # Power and Current Formulas
//!
//! ## Notation
//!
//! - `P` = Real power (kW)
//! - `S` = Apparent power (kVA)
//! - `Q` = Reactive power (kVAr)
//! - `V` = Nominal voltage (V), line-to-line for three-phase
//! - `pf` = Power factor cos φ
//!
//! ```text
//!            S
//!          ╱ |
//!        ╱   | Q
//!      ╱ φ   |
//!     ───────┘
//!        P
//! ```

use serde::{Deserialize, Serialize};

/// √3, the line-to-phase factor for balanced three-phase systems
pub const SQRT_3: f64 = 1.732_050_807_568_877_2;

// =============================================================================
// SUPPLY CONFIGURATION
// =============================================================================

/// Supply phase configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum Phases {
    /// Single phase, 230 V
    #[serde(rename = "1F_230V")]
    Single230,
    /// Three phase, 400 V
    #[default]
    #[serde(rename = "3F_400V")]
    Three400,
}

impl Phases {
    /// All phase configurations for UI selection
    pub const ALL: [Phases; 2] = [Phases::Single230, Phases::Three400];

    /// Nominal voltage (V)
    pub fn voltage(&self) -> f64 {
        match self {
            Phases::Single230 => 230.0,
            Phases::Three400 => 400.0,
        }
    }

    /// True for three-phase supplies
    pub fn is_three_phase(&self) -> bool {
        matches!(self, Phases::Three400)
    }

    /// Request code ("1F_230V" / "3F_400V")
    pub fn code(&self) -> &'static str {
        match self {
            Phases::Single230 => "1F_230V",
            Phases::Three400 => "3F_400V",
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Phases::Single230 => "1F 230V",
            Phases::Three400 => "3F 400V",
        }
    }
}

impl From<String> for Phases {
    /// "1F_230V" selects single phase; any other text is three-phase 400 V.
    fn from(value: String) -> Self {
        match value.trim() {
            "1F_230V" | "1F" | "single" => Phases::Single230,
            "3F_400V" | "3F" | "three" => Phases::Three400,
            other => {
                tracing::warn!(value = other, "unrecognised phase configuration, using 3F 400V");
                Phases::Three400
            }
        }
    }
}

impl std::fmt::Display for Phases {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// =============================================================================
// CURRENT AND POWER
// =============================================================================

/// Line current drawn by a load.
///
/// # Formula
/// - Single phase: I = P·1000 / (V·pf)
/// - Three phase:  I = P·1000 / (√3·V·pf)
///
/// # Example
/// ```rust
/// use calc_core::equations::power::line_current_a;
///
/// let i = line_current_a(10.0, 400.0, 0.9, true);
/// assert!((i - 16.04).abs() < 0.01);
/// ```
pub fn line_current_a(load_kw: f64, voltage: f64, power_factor: f64, three_phase: bool) -> f64 {
    let watts = load_kw * 1000.0;
    if three_phase {
        watts / (SQRT_3 * voltage * power_factor)
    } else {
        watts / (voltage * power_factor)
    }
}

/// Apparent power S = P / pf (kVA)
#[inline]
pub fn apparent_power_kva(load_kw: f64, power_factor: f64) -> f64 {
    load_kw / power_factor
}

/// Phase angle φ = arccos(pf) in radians
#[inline]
pub fn phase_angle(power_factor: f64) -> f64 {
    power_factor.acos()
}

/// Reactive power Q = P·tan φ (kVAr)
///
/// ```rust
/// use calc_core::equations::power::reactive_power_kvar;
///
/// assert!(reactive_power_kvar(100.0, 1.0).abs() < 1e-12);
/// assert!((reactive_power_kvar(100.0, 0.8) - 75.0).abs() < 1e-9);
/// ```
#[inline]
pub fn reactive_power_kvar(load_kw: f64, power_factor: f64) -> f64 {
    load_kw * phase_angle(power_factor).tan()
}

/// Three-phase line current for an apparent power: I = S·1000 / (√3·V)
#[inline]
pub fn three_phase_current_from_kva(kva: f64, voltage: f64) -> f64 {
    kva * 1000.0 / (SQRT_3 * voltage)
}

// =============================================================================
// VOLTAGE DROP AND FAULT LEVEL
// =============================================================================

/// Voltage drop along a cable run.
///
/// # Formula
/// - Single phase (go and return): ΔU = 2·L·I·r
/// - Three phase:                  ΔU = √3·L·I·r
///
/// # Arguments
/// * `length_m` - Route length (m)
/// * `current_a` - Line current (A)
/// * `resistance_per_m` - Conductor resistance (Ω/m)
pub fn voltage_drop_v(length_m: f64, current_a: f64, resistance_per_m: f64, three_phase: bool) -> f64 {
    let factor = if three_phase { SQRT_3 } else { 2.0 };
    factor * length_m * current_a * resistance_per_m
}

/// Prospective fault current at the secondary of a transformer.
///
/// # Formula
/// - Three phase:  Isc = S·1000 / (√3·V·z)
/// - Single phase: Isc = S·1000 / (V·z)
///
/// where `z` is the per-unit short-circuit impedance.
pub fn transformer_fault_current_a(kva: f64, voltage: f64, impedance_pct: f64, three_phase: bool) -> f64 {
    let z = impedance_pct / 100.0;
    if three_phase {
        kva * 1000.0 / (SQRT_3 * voltage * z)
    } else {
        kva * 1000.0 / (voltage * z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_phase_current() {
        // 2.3 kW at 230 V, pf 1.0 = 10 A
        assert!((line_current_a(2.3, 230.0, 1.0, false) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_apparent_power() {
        assert!((apparent_power_kva(100.0, 0.9) - 111.111).abs() < 0.001);
    }

    #[test]
    fn test_voltage_drop_factors() {
        let single = voltage_drop_v(10.0, 10.0, 0.01, false);
        let three = voltage_drop_v(10.0, 10.0, 0.01, true);
        assert!((single - 2.0).abs() < 1e-12);
        assert!((three - SQRT_3).abs() < 1e-12);
    }

    #[test]
    fn test_transformer_fault_current() {
        // 630 kVA, 400 V, 4 % → ≈ 22.7 kA
        let isc = transformer_fault_current_a(630.0, 400.0, 4.0, true);
        assert!((isc / 1000.0 - 22.73).abs() < 0.01);
    }

    #[test]
    fn test_phases_parsing() {
        let p: Phases = serde_json::from_str("\"1F_230V\"").unwrap();
        assert_eq!(p, Phases::Single230);
        let p: Phases = serde_json::from_str("\"2F\"").unwrap();
        assert_eq!(p, Phases::Three400);
        assert_eq!(serde_json::to_string(&Phases::Three400).unwrap(), "\"3F_400V\"");
    }
}
