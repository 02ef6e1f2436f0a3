//! Cable Ampacity Tables
//!
//! Maximum continuous current for PVC-insulated cables per IEC 60364-5-52,
//! one table per conductor material and installation method.
//!
//! ## Tables
//!
//! | mm²  | Cu open | Cu conduit | Al open | Al conduit |
//! |------|---------|------------|---------|------------|
//! | 1.5  | 19.5    | 15         | -       | -          |
//! | 2.5  | 27      | 21         | 21      | 16.5       |
//! | 4    | 36      | 28         | 28      | 22         |
//! | ...  |         |            |         |            |
//! | 240  | 515     | 370        | 398     | 289        |
//!
//! Aluminium conductors are not listed below 2.5 mm².

use serde::{Deserialize, Serialize};

// ============================================================================
// Conductor Material
// ============================================================================

/// Conductor material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum Conductor {
    /// Copper
    #[default]
    #[serde(rename = "Cu")]
    Copper,
    /// Aluminium
    #[serde(rename = "Al")]
    Aluminum,
}

impl Conductor {
    /// All conductor variants for UI selection
    pub const ALL: [Conductor; 2] = [Conductor::Copper, Conductor::Aluminum];

    /// Resistivity at operating temperature (70 °C) in Ω·mm²/m
    pub fn resistivity(&self) -> f64 {
        match self {
            Conductor::Copper => 0.0225,
            Conductor::Aluminum => 0.036,
        }
    }

    /// Short code used in requests ("Cu" / "Al")
    pub fn code(&self) -> &'static str {
        match self {
            Conductor::Copper => "Cu",
            Conductor::Aluminum => "Al",
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Conductor::Copper => "Copper (Cu)",
            Conductor::Aluminum => "Aluminum (Al)",
        }
    }
}

impl From<String> for Conductor {
    /// "Cu" selects copper; any other text is treated as aluminium.
    fn from(value: String) -> Self {
        match value.trim() {
            "Cu" | "cu" | "copper" | "Copper" => Conductor::Copper,
            "Al" | "al" | "aluminum" | "Aluminum" | "aluminium" => Conductor::Aluminum,
            other => {
                tracing::warn!(value = other, "unrecognised conductor material, using aluminium");
                Conductor::Aluminum
            }
        }
    }
}

impl std::fmt::Display for Conductor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Installation Method
// ============================================================================

/// Cable installation (mounting) method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum Mounting {
    /// Clipped direct / open air
    #[default]
    #[serde(rename = "open")]
    Open,
    /// Enclosed in conduit or trunking
    #[serde(rename = "conduit")]
    Conduit,
}

impl Mounting {
    /// All mounting variants for UI selection
    pub const ALL: [Mounting; 2] = [Mounting::Open, Mounting::Conduit];

    /// Request code ("open" / "conduit")
    pub fn code(&self) -> &'static str {
        match self {
            Mounting::Open => "open",
            Mounting::Conduit => "conduit",
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Mounting::Open => "Open",
            Mounting::Conduit => "In conduit",
        }
    }
}

impl From<String> for Mounting {
    /// "conduit" selects conduit; any other text is treated as open air.
    fn from(value: String) -> Self {
        match value.trim() {
            "conduit" | "Conduit" => Mounting::Conduit,
            "open" | "Open" => Mounting::Open,
            other => {
                tracing::warn!(value = other, "unrecognised mounting method, using open air");
                Mounting::Open
            }
        }
    }
}

impl std::fmt::Display for Mounting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Ampacity Tables
// ============================================================================

const CU_OPEN: &[(f64, f64)] = &[
    (1.5, 19.5),
    (2.5, 27.0),
    (4.0, 36.0),
    (6.0, 46.0),
    (10.0, 65.0),
    (16.0, 87.0),
    (25.0, 114.0),
    (35.0, 141.0),
    (50.0, 182.0),
    (70.0, 234.0),
    (95.0, 284.0),
    (120.0, 330.0),
    (150.0, 381.0),
    (185.0, 436.0),
    (240.0, 515.0),
];

const CU_CONDUIT: &[(f64, f64)] = &[
    (1.5, 15.0),
    (2.5, 21.0),
    (4.0, 28.0),
    (6.0, 36.0),
    (10.0, 50.0),
    (16.0, 68.0),
    (25.0, 89.0),
    (35.0, 110.0),
    (50.0, 134.0),
    (70.0, 171.0),
    (95.0, 207.0),
    (120.0, 239.0),
    (150.0, 275.0),
    (185.0, 314.0),
    (240.0, 370.0),
];

const AL_OPEN: &[(f64, f64)] = &[
    (2.5, 21.0),
    (4.0, 28.0),
    (6.0, 36.0),
    (10.0, 50.0),
    (16.0, 67.0),
    (25.0, 88.0),
    (35.0, 109.0),
    (50.0, 140.0),
    (70.0, 181.0),
    (95.0, 220.0),
    (120.0, 255.0),
    (150.0, 294.0),
    (185.0, 337.0),
    (240.0, 398.0),
];

const AL_CONDUIT: &[(f64, f64)] = &[
    (2.5, 16.5),
    (4.0, 22.0),
    (6.0, 28.0),
    (10.0, 39.0),
    (16.0, 53.0),
    (25.0, 70.0),
    (35.0, 86.0),
    (50.0, 104.0),
    (70.0, 133.0),
    (95.0, 161.0),
    (120.0, 186.0),
    (150.0, 215.0),
    (185.0, 245.0),
    (240.0, 289.0),
];

/// Ampacity table for one (conductor, mounting) combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CableTable {
    pub conductor: Conductor,
    pub mounting: Mounting,
    /// `(cross_section_mm2, max_current_a)` in ascending cross-section order
    pub entries: &'static [(f64, f64)],
}

impl CableTable {
    /// Select the table for a conductor and installation method.
    pub fn for_installation(conductor: Conductor, mounting: Mounting) -> Self {
        let entries = match (conductor, mounting) {
            (Conductor::Copper, Mounting::Open) => CU_OPEN,
            (Conductor::Copper, Mounting::Conduit) => CU_CONDUIT,
            (Conductor::Aluminum, Mounting::Open) => AL_OPEN,
            (Conductor::Aluminum, Mounting::Conduit) => AL_CONDUIT,
        };
        CableTable {
            conductor,
            mounting,
            entries,
        }
    }

    /// Maximum current for an exact cross-section, if listed.
    pub fn ampacity(&self, cable_mm2: f64) -> Option<f64> {
        self.entries
            .iter()
            .find(|(mm2, _)| (mm2 - cable_mm2).abs() < 1e-9)
            .map(|(_, amps)| *amps)
    }

    /// Smallest listed cross-section able to carry `current_a`.
    ///
    /// Returns `(mm2, ampacity, exceeds_catalog)`; saturates at the largest
    /// cross-section when none is sufficient.
    pub fn smallest_for(&self, current_a: f64) -> (f64, f64, bool) {
        match self.entries.iter().find(|(_, amps)| *amps >= current_a) {
            Some(&(mm2, amps)) => (mm2, amps, false),
            None => {
                let (mm2, amps) = self.entries.last().copied().unwrap_or((0.0, 0.0));
                tracing::warn!(
                    current_a,
                    selected_mm2 = mm2,
                    "current exceeds {} {} cable table, returning largest section",
                    self.conductor,
                    self.mounting
                );
                (mm2, amps, true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_selection() {
        let table = CableTable::for_installation(Conductor::Copper, Mounting::Open);
        assert_eq!(table.ampacity(2.5), Some(27.0));
        let table = CableTable::for_installation(Conductor::Aluminum, Mounting::Conduit);
        assert_eq!(table.ampacity(240.0), Some(289.0));
    }

    #[test]
    fn test_unlisted_section() {
        let table = CableTable::for_installation(Conductor::Aluminum, Mounting::Open);
        assert_eq!(table.ampacity(1.5), None);
        assert_eq!(table.ampacity(3.0), None);
    }

    #[test]
    fn test_tables_ordered() {
        for conductor in Conductor::ALL {
            for mounting in Mounting::ALL {
                let table = CableTable::for_installation(conductor, mounting);
                assert!(table.entries.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 < w[1].1));
            }
        }
    }

    #[test]
    fn test_smallest_for() {
        let table = CableTable::for_installation(Conductor::Copper, Mounting::Open);
        assert_eq!(table.smallest_for(23.6), (2.5, 27.0, false));
        assert_eq!(table.smallest_for(27.0), (2.5, 27.0, false));
        assert_eq!(table.smallest_for(600.0), (240.0, 515.0, true));
    }

    #[test]
    fn test_lenient_parsing() {
        let cu: Conductor = serde_json::from_str("\"Cu\"").unwrap();
        assert_eq!(cu, Conductor::Copper);
        let fallback: Conductor = serde_json::from_str("\"Fe\"").unwrap();
        assert_eq!(fallback, Conductor::Aluminum);
        let conduit: Mounting = serde_json::from_str("\"conduit\"").unwrap();
        assert_eq!(conduit, Mounting::Conduit);
        let other: Mounting = serde_json::from_str("\"tray\"").unwrap();
        assert_eq!(other, Mounting::Open);
    }

    #[test]
    fn test_serialization_codes() {
        assert_eq!(serde_json::to_string(&Conductor::Aluminum).unwrap(), "\"Al\"");
        assert_eq!(serde_json::to_string(&Mounting::Conduit).unwrap(), "\"conduit\"");
    }
}
