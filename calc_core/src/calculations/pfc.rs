//! # Power Factor Correction
//!
//! Sizes a capacitor bank that raises a load's displacement power factor
//! from `current_pf` to `target_pf`, and estimates the reduction in line
//! current and reactive energy penalties.
//!
//! ```text
//! Q_c = P · (tan φ1 − tan φ2)
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::CAPACITOR_BANKS_KVAR;
use crate::equations::power::{apparent_power_kva, reactive_power_kvar, three_phase_current_from_kva};
use crate::errors::{require_non_negative, require_positive, require_power_factor, CalcError, CalcResult};
use crate::settings::EngineSettings;
use crate::units::round_to;

/// Input parameters for PFC sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PfcInput {
    /// Active load (kW)
    pub load_kw: f64,
    /// Existing power factor
    pub current_pf: f64,
    /// Power factor after correction
    pub target_pf: f64,
    /// Line-to-line voltage (V)
    pub voltage: f64,
}

impl Default for PfcInput {
    fn default() -> Self {
        PfcInput {
            load_kw: 0.0,
            current_pf: 0.75,
            target_pf: 0.95,
            voltage: 400.0,
        }
    }
}

impl PfcInput {
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("load_kw", self.load_kw)?;
        require_power_factor("current_pf", self.current_pf)?;
        require_power_factor("target_pf", self.target_pf)?;
        require_positive("voltage", self.voltage)?;
        if self.target_pf < self.current_pf {
            return Err(CalcError::invalid_input(
                "target_pf",
                self.target_pf.to_string(),
                format!("Target power factor must not be below the current power factor ({})", self.current_pf),
            ));
        }
        Ok(())
    }
}

/// Results from PFC sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PfcResult {
    pub q_before_kvar: f64,
    pub q_after_kvar: f64,
    /// Compensation required (kVAr)
    pub q_required_kvar: f64,
    /// Standard capacitor bank, 0 when no compensation is needed
    pub selected_kvar: f64,
    pub kva_before: f64,
    pub kva_after: f64,
    pub current_before_a: f64,
    pub current_after_a: f64,
    pub current_reduction_pct: f64,
    /// Avoided reactive energy penalty (€/year)
    pub annual_savings_eur: f64,
    pub exceeds_catalog: bool,
}

/// Size a capacitor bank.
///
/// ## Example
///
/// ```rust
/// use calc_core::calculations::pfc::{calculate, PfcInput};
/// use calc_core::settings::EngineSettings;
///
/// let input = PfcInput { load_kw: 100.0, ..PfcInput::default() };
/// let result = calculate(&input, &EngineSettings::default()).unwrap();
/// assert_eq!(result.q_required_kvar, 55.32);
/// assert_eq!(result.selected_kvar, 60.0);
/// ```
pub fn calculate(input: &PfcInput, settings: &EngineSettings) -> CalcResult<PfcResult> {
    input.validate()?;

    let q_before = reactive_power_kvar(input.load_kw, input.current_pf);
    let q_after = reactive_power_kvar(input.load_kw, input.target_pf);
    let q_required = if input.current_pf == input.target_pf {
        0.0
    } else {
        q_before - q_after
    };

    let (selected_kvar, exceeds_catalog) = if q_required > 0.0 {
        let selection = CAPACITOR_BANKS_KVAR.select(q_required);
        (selection.value, selection.exceeds_catalog)
    } else {
        (0.0, false)
    };

    let kva_before = apparent_power_kva(input.load_kw, input.current_pf);
    let kva_after = apparent_power_kva(input.load_kw, input.target_pf);
    let current_before = three_phase_current_from_kva(kva_before, input.voltage);
    let current_after = three_phase_current_from_kva(kva_after, input.voltage);

    let current_reduction_pct = if current_before > 0.0 {
        (current_before - current_after) / current_before * 100.0
    } else {
        0.0
    };

    let tariff = &settings.tariff;
    let annual_savings = q_required * tariff.reactive_penalty_eur_per_kvarh * tariff.operating_hours_per_year;

    tracing::debug!(q_required, selected_kvar, current_reduction_pct, "capacitor bank sized");

    Ok(PfcResult {
        q_before_kvar: round_to(q_before, 2),
        q_after_kvar: round_to(q_after, 2),
        q_required_kvar: round_to(q_required, 2),
        selected_kvar: round_to(selected_kvar, 1),
        kva_before: round_to(kva_before, 2),
        kva_after: round_to(kva_after, 2),
        current_before_a: round_to(current_before, 1),
        current_after_a: round_to(current_after, 1),
        current_reduction_pct: round_to(current_reduction_pct, 1),
        annual_savings_eur: round_to(annual_savings, 0),
        exceeds_catalog,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_pfc() -> PfcInput {
        PfcInput {
            load_kw: 100.0,
            current_pf: 0.75,
            target_pf: 0.95,
            voltage: 400.0,
        }
    }

    #[test]
    fn test_reference_correction() {
        let result = calculate(&test_pfc(), &EngineSettings::default()).unwrap();
        // tan(acos 0.75) = 0.8819, tan(acos 0.95) = 0.3287
        assert!((result.q_before_kvar - 88.19).abs() < 0.01);
        assert!((result.q_after_kvar - 32.87).abs() < 0.01);
        assert!((result.q_required_kvar - 55.32).abs() < 0.01);
        assert_eq!(result.selected_kvar, 60.0);
        assert!(!result.exceeds_catalog);
    }

    #[test]
    fn test_required_is_difference() {
        let result = calculate(&test_pfc(), &EngineSettings::default()).unwrap();
        let diff = result.q_before_kvar - result.q_after_kvar;
        assert!((result.q_required_kvar - diff).abs() < 0.011);
    }

    #[test]
    fn test_current_reduction() {
        let result = calculate(&test_pfc(), &EngineSettings::default()).unwrap();
        // 133.33 kVA → 192.5 A, 105.26 kVA → 151.9 A
        assert!((result.current_before_a - 192.5).abs() < 0.1);
        assert!((result.current_after_a - 151.9).abs() < 0.1);
        // 1 − 0.75/0.95
        assert!((result.current_reduction_pct - 21.1).abs() < 0.05);
    }

    #[test]
    fn test_annual_savings() {
        let result = calculate(&test_pfc(), &EngineSettings::default()).unwrap();
        // 55.32 × 0.015 × 6000
        assert!((result.annual_savings_eur - 4979.0).abs() < 1.0);
    }

    #[test]
    fn test_equal_power_factors_need_no_bank() {
        let input = PfcInput { current_pf: 0.95, ..test_pfc() };
        let result = calculate(&input, &EngineSettings::default()).unwrap();
        assert_eq!(result.q_required_kvar, 0.0);
        assert_eq!(result.selected_kvar, 0.0);
        assert_eq!(result.current_reduction_pct, 0.0);
    }

    #[test]
    fn test_zero_load() {
        let input = PfcInput { load_kw: 0.0, ..test_pfc() };
        let result = calculate(&input, &EngineSettings::default()).unwrap();
        assert_eq!(result.current_reduction_pct, 0.0);
        assert_eq!(result.selected_kvar, 0.0);
    }

    #[test]
    fn test_target_below_current_rejected() {
        let input = PfcInput { current_pf: 0.95, target_pf: 0.9, ..test_pfc() };
        let err = calculate(&input, &EngineSettings::default()).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "target_pf"));
    }

    #[test]
    fn test_large_bank_saturates() {
        let input = PfcInput { load_kw: 2000.0, current_pf: 0.6, ..test_pfc() };
        let result = calculate(&input, &EngineSettings::default()).unwrap();
        assert_eq!(result.selected_kvar, 500.0);
        assert!(result.exceeds_catalog);
    }
}
