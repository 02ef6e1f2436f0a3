//! # Engine Settings
//!
//! Site-wide assumptions that are not part of an individual request:
//! the upstream supply used for fault-level estimates, tariff constants and
//! report header fields. Settings serialize to TOML so a deployment can
//! override them without rebuilding.
//!
//! ## Structure
//!
//! ```text
//! EngineSettings
//! ├── cable: CableSettings   (fallback policy, upstream transformer, drop limit)
//! ├── tariff: TariffSettings (reactive penalty, operating hours, CO2 factor)
//! └── report: ReportSettings (engineer, job id, title)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use calc_core::settings::EngineSettings;
//!
//! let settings = EngineSettings::from_toml_str(r#"
//!     [cable]
//!     upstream_transformer_kva = 1000.0
//!
//!     [tariff]
//!     co2_kg_per_kwh = 0.25
//! "#).unwrap();
//!
//! assert_eq!(settings.cable.upstream_transformer_kva, 1000.0);
//! assert_eq!(settings.cable.upstream_impedance_pct, 4.0); // default kept
//! ```

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Process-wide default settings
pub static DEFAULT_SETTINGS: Lazy<EngineSettings> = Lazy::new(EngineSettings::default);

/// Root settings container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Cable sizing assumptions
    pub cable: CableSettings,

    /// Tariff and emission constants
    pub tariff: TariffSettings,

    /// PDF report header fields
    pub report: ReportSettings,
}

impl EngineSettings {
    /// Parse settings from TOML text; absent fields keep their defaults.
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let settings: EngineSettings =
            toml::from_str(text).map_err(|e| CalcError::config(format!("invalid settings TOML: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn from_toml_file(path: &Path) -> CalcResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| CalcError::config(format!("cannot read '{}': {}", path.display(), e)))?;
        let settings = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "engine settings loaded");
        Ok(settings)
    }

    /// Serialize to TOML (e.g., to write a starter config file)
    pub fn to_toml_string(&self) -> CalcResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalcError::config(e.to_string()))
    }

    /// Reject non-positive physical constants.
    pub fn validate(&self) -> CalcResult<()> {
        let checks = [
            ("cable.upstream_transformer_kva", self.cable.upstream_transformer_kva),
            ("cable.upstream_impedance_pct", self.cable.upstream_impedance_pct),
            ("cable.max_voltage_drop_pct", self.cable.max_voltage_drop_pct),
            ("tariff.operating_hours_per_year", self.tariff.operating_hours_per_year),
        ];
        for (field, value) in checks {
            if !(value > 0.0) {
                return Err(CalcError::config(format!("{} must be positive, got {}", field, value)));
            }
        }
        if self.tariff.reactive_penalty_eur_per_kvarh < 0.0 || self.tariff.co2_kg_per_kwh < 0.0 {
            return Err(CalcError::config("tariff rates cannot be negative"));
        }
        if let CableFallback::Default { ampacity_a } = self.cable.fallback {
            if !(ampacity_a > 0.0) {
                return Err(CalcError::config("cable.fallback ampacity_a must be positive"));
            }
        }
        Ok(())
    }
}

/// Behaviour when a cable cross-section is missing from the ampacity table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum CableFallback {
    /// Substitute a fixed ampacity and flag the result
    Default { ampacity_a: f64 },
    /// Reject the request with `UnknownCableSize`
    Reject,
}

impl Default for CableFallback {
    fn default() -> Self {
        CableFallback::Default { ampacity_a: 21.0 }
    }
}

/// Cable sizing assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CableSettings {
    /// Unlisted cross-section policy
    pub fallback: CableFallback,

    /// Rating of the assumed upstream transformer (kVA)
    pub upstream_transformer_kva: f64,

    /// Short-circuit impedance of the upstream transformer (%)
    pub upstream_impedance_pct: f64,

    /// Voltage drop above which `voltage_drop_ok` is false (%)
    pub max_voltage_drop_pct: f64,
}

impl Default for CableSettings {
    fn default() -> Self {
        CableSettings {
            fallback: CableFallback::default(),
            upstream_transformer_kva: 630.0,
            upstream_impedance_pct: 4.0,
            max_voltage_drop_pct: 4.0,
        }
    }
}

/// Tariff and emission constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffSettings {
    /// Reactive energy penalty (€/kVArh)
    pub reactive_penalty_eur_per_kvarh: f64,

    /// Annual operating hours for savings estimates (h)
    pub operating_hours_per_year: f64,

    /// Grid emission factor (kg CO2 / kWh)
    pub co2_kg_per_kwh: f64,
}

impl Default for TariffSettings {
    fn default() -> Self {
        TariffSettings {
            reactive_penalty_eur_per_kvarh: 0.015,
            operating_hours_per_year: 6000.0,
            co2_kg_per_kwh: 0.4,
        }
    }
}

/// PDF report header fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSettings {
    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Report title prefix
    pub title: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            engineer: String::new(),
            job_id: String::new(),
            title: "Electrical Sizing Report".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.cable.upstream_transformer_kva, 630.0);
        assert_eq!(settings.cable.fallback, CableFallback::Default { ampacity_a: 21.0 });
        assert_eq!(settings.tariff.co2_kg_per_kwh, 0.4);
        assert!(settings.validate().is_ok());
        assert_eq!(*DEFAULT_SETTINGS, settings);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let settings = EngineSettings::from_toml_str("").unwrap();
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn test_reject_policy_from_toml() {
        let settings = EngineSettings::from_toml_str(
            r#"
            [cable.fallback]
            policy = "reject"
            "#,
        )
        .unwrap();
        assert_eq!(settings.cable.fallback, CableFallback::Reject);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = EngineSettings::from_toml_str("[cable]\nbogus = 1\n").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_non_positive_constant_rejected() {
        let err = EngineSettings::from_toml_str("[cable]\nupstream_impedance_pct = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("upstream_impedance_pct"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut settings = EngineSettings::default();
        settings.report.engineer = "Jane Engineer".to_string();
        let text = settings.to_toml_string().unwrap();
        let roundtrip = EngineSettings::from_toml_str(&text).unwrap();
        assert_eq!(roundtrip, settings);
    }
}
