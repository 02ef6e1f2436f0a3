//! # Unit Types
//!
//! Type-safe wrappers for the units that reach the engine from imperial
//! front ends, plus the rounding rule applied when result records are built.
//!
//! ## Design Philosophy
//!
//! The engine computes in SI/metric units only. Imperial values (feet,
//! Fahrenheit) are converted once, at the input boundary, through
//! [`NormalizeUnits`]. The newtypes stay lightweight (just f64 wrappers) and
//! serialize as plain numbers.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{Feet, Meters, Fahrenheit, Celsius};
//!
//! let run: Meters = Feet(100.0).into();
//! assert!((run.0 - 30.48).abs() < 1e-9);
//!
//! let ambient: Celsius = Fahrenheit(104.0).into();
//! assert!((ambient.0 - 40.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Output Rounding
// ============================================================================

/// Round to a fixed number of decimal places.
///
/// Applied only when a result record is built; internal computation keeps
/// full precision.
///
/// ```rust
/// use calc_core::units::round_to;
///
/// assert_eq!(round_to(146.666_666, 2), 146.67);
/// assert_eq!(round_to(500_426.67, 0), 500_427.0);
/// ```
pub fn round_to(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value * scale).round() / scale
}

// ============================================================================
// Unit System Selector
// ============================================================================

/// Unit system used by a request record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// SI units (m, °C, m²). The engine's native system.
    #[default]
    Metric,
    /// US customary units (ft, °F, ft²)
    Imperial,
}

impl UnitSystem {
    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "SI",
            UnitSystem::Imperial => "IMP",
        }
    }
}

/// Inputs that carry lengths or temperatures and can be converted to metric.
pub trait NormalizeUnits: Sized {
    /// Return a copy of the record expressed in metric units.
    fn to_metric(&self) -> Self;

    /// Convert only when the record was expressed in `system`'s units.
    fn normalized(&self, system: UnitSystem) -> Self
    where
        Self: Clone,
    {
        match system {
            UnitSystem::Metric => self.clone(),
            UnitSystem::Imperial => self.to_metric(),
        }
    }
}

// ============================================================================
// Length Units
// ============================================================================

const METERS_PER_FOOT: f64 = 0.3048;

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

impl From<Feet> for Meters {
    fn from(ft: Feet) -> Self {
        Meters(ft.0 * METERS_PER_FOOT)
    }
}

impl From<Meters> for Feet {
    fn from(m: Meters) -> Self {
        Feet(m.0 / METERS_PER_FOOT)
    }
}

// ============================================================================
// Temperature Units
// ============================================================================

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Celsius(pub f64);

/// Temperature in degrees Fahrenheit
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fahrenheit(pub f64);

impl From<Fahrenheit> for Celsius {
    fn from(f: Fahrenheit) -> Self {
        Celsius((f.0 - 32.0) * 5.0 / 9.0)
    }
}

impl From<Celsius> for Fahrenheit {
    fn from(c: Celsius) -> Self {
        Fahrenheit(c.0 * 9.0 / 5.0 + 32.0)
    }
}

// ============================================================================
// Area and Volume Units
// ============================================================================

const SQUARE_METERS_PER_SQUARE_FOOT: f64 = 0.092_903;
const US_GALLONS_PER_LITER: f64 = 0.264_172;

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareFeet(pub f64);

impl From<SquareFeet> for SquareMeters {
    fn from(sqft: SquareFeet) -> Self {
        SquareMeters(sqft.0 * SQUARE_METERS_PER_SQUARE_FOOT)
    }
}

impl From<SquareMeters> for SquareFeet {
    fn from(m2: SquareMeters) -> Self {
        SquareFeet(m2.0 / SQUARE_METERS_PER_SQUARE_FOOT)
    }
}

/// Volume in liters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Liters(pub f64);

/// Volume in US gallons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsGallons(pub f64);

impl From<Liters> for UsGallons {
    fn from(l: Liters) -> Self {
        UsGallons(l.0 * US_GALLONS_PER_LITER)
    }
}

impl From<UsGallons> for Liters {
    fn from(gal: UsGallons) -> Self {
        Liters(gal.0 / US_GALLONS_PER_LITER)
    }
}

// ============================================================================
// Conductor Gauges
// ============================================================================

/// American Wire Gauge designations with their cross-section in mm².
pub const AWG_TABLE: [(&str, f64); 27] = [
    ("0000 (4/0)", 107.2),
    ("000 (3/0)", 85.0),
    ("00 (2/0)", 67.4),
    ("0 (1/0)", 53.5),
    ("1", 42.4),
    ("2", 33.6),
    ("3", 26.7),
    ("4", 21.2),
    ("5", 16.8),
    ("6", 13.3),
    ("7", 10.5),
    ("8", 8.37),
    ("9", 6.63),
    ("10", 5.26),
    ("11", 4.17),
    ("12", 3.31),
    ("13", 2.62),
    ("14", 2.08),
    ("15", 1.65),
    ("16", 1.31),
    ("17", 1.04),
    ("18", 0.823),
    ("19", 0.653),
    ("20", 0.518),
    ("22", 0.326),
    ("24", 0.205),
    ("26", 0.129),
];

/// AWG designation whose cross-section is closest to `mm2`.
///
/// Ties keep the first (larger) gauge in table order.
///
/// ```rust
/// use calc_core::units::closest_awg;
///
/// assert_eq!(closest_awg(2.5), "13");
/// assert_eq!(closest_awg(95.0), "000 (3/0)");
/// ```
pub fn closest_awg(mm2: f64) -> &'static str {
    let mut closest = AWG_TABLE[0];
    for entry in AWG_TABLE {
        if (entry.1 - mm2).abs() < (closest.1 - mm2).abs() {
            closest = entry;
        }
    }
    closest.0
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Feet);
impl_arithmetic!(SquareMeters);
impl_arithmetic!(SquareFeet);
impl_arithmetic!(Liters);
impl_arithmetic!(UsGallons);

/// Convert a length in feet to meters (raw f64 helper for input records).
pub(crate) fn feet_to_meters(ft: f64) -> f64 {
    Meters::from(Feet(ft)).value()
}

/// Convert a Fahrenheit temperature to Celsius (raw f64 helper for input records).
pub(crate) fn fahrenheit_to_celsius(f: f64) -> f64 {
    Celsius::from(Fahrenheit(f)).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(16.038, 2), 16.04);
        assert_eq!(round_to(27.0, 1), 27.0);
        assert_eq!(round_to(0.123_456, 3), 0.123);
        assert_eq!(round_to(1454.6, 0), 1455.0);
    }

    #[test]
    fn test_feet_to_meters() {
        let m: Meters = Feet(10.0).into();
        assert!((m.0 - 3.048).abs() < 1e-9);
        let back: Feet = m.into();
        assert!((back.0 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_conversion() {
        let c: Celsius = Fahrenheit(32.0).into();
        assert!(c.0.abs() < 1e-9);
        let f: Fahrenheit = Celsius(100.0).into();
        assert!((f.0 - 212.0).abs() < 1e-9);
    }

    #[test]
    fn test_area_and_volume() {
        let sqft: SquareFeet = SquareMeters(0.092_903).into();
        assert!((sqft.0 - 1.0).abs() < 1e-9);
        let gal: UsGallons = Liters(100.0).into();
        assert!((gal.0 - 26.4172).abs() < 1e-6);
    }

    #[test]
    fn test_awg_lookup() {
        assert_eq!(closest_awg(4.0), "11");
        assert_eq!(closest_awg(1000.0), "0000 (4/0)");
    }

    #[test]
    fn test_arithmetic() {
        let a = Meters(10.0);
        let b = Meters(4.0);
        assert_eq!((a + b).0, 14.0);
        assert_eq!((a - b).0, 6.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_unit_system_serialization() {
        let json = serde_json::to_string(&UnitSystem::Imperial).unwrap();
        assert_eq!(json, "\"imperial\"");
        let roundtrip: UnitSystem = serde_json::from_str("\"metric\"").unwrap();
        assert_eq!(roundtrip, UnitSystem::Metric);
    }
}
