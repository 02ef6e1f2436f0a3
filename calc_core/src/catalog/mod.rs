//! # Standard Catalogs and Band Tables
//!
//! Discrete equipment ratings and stepwise lookup tables shared by all
//! calculators.
//!
//! ## Selection Rule
//!
//! Equipment is always selected as the smallest catalog entry that is at
//! least the computed requirement. When the requirement exceeds every entry,
//! the catalog maximum is returned together with `exceeds_catalog = true`:
//!
//! ```text
//! required:   16.03 A
//! catalog:    6  10  13  16  [20]  25  32 ...
//! selected:   20 A
//! ```
//!
//! ## Band Tables
//!
//! A [`ThresholdTable`] maps a key to a value through ascending upper bounds.
//! The first band whose upper bound is strictly greater than the key wins;
//! keys at or beyond the last bound take the `otherwise` value.
//!
//! ## Submodules
//!
//! - [`standard_sizes`] - Breakers, transformers, generators, capacitor banks, contactors
//! - [`cables`] - Conductor materials, mounting methods and ampacity tables

pub mod cables;
pub mod standard_sizes;

use serde::{Deserialize, Serialize};

pub use cables::{CableTable, Conductor, Mounting};
pub use standard_sizes::{
    BREAKERS_A, CAPACITOR_BANKS_KVAR, CONTACTORS_A, GENERATORS_KVA, TRANSFORMERS_KVA,
};

// ============================================================================
// Standard Catalog
// ============================================================================

/// An ordered, strictly increasing sequence of nominal equipment ratings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardCatalog {
    /// Catalog name used in logs and reports (e.g., "circuit breaker")
    pub name: &'static str,
    /// Unit of the ratings (e.g., "A", "kVA")
    pub unit: &'static str,
    /// Ratings in ascending order
    pub ratings: &'static [f64],
}

/// The outcome of a catalog selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Selected nominal rating
    pub value: f64,
    /// True when the requirement exceeds the largest catalog entry and the
    /// maximum was returned instead
    pub exceeds_catalog: bool,
}

impl StandardCatalog {
    /// Build a catalog from a static rating list.
    pub const fn new(name: &'static str, unit: &'static str, ratings: &'static [f64]) -> Self {
        StandardCatalog { name, unit, ratings }
    }

    /// Smallest rating >= `required`, saturating at the catalog maximum.
    ///
    /// # Example
    ///
    /// ```rust
    /// use calc_core::catalog::BREAKERS_A;
    ///
    /// let pick = BREAKERS_A.select(16.03);
    /// assert_eq!(pick.value, 20.0);
    /// assert!(!pick.exceeds_catalog);
    ///
    /// let pick = BREAKERS_A.select(1000.0);
    /// assert_eq!(pick.value, 630.0);
    /// assert!(pick.exceeds_catalog);
    /// ```
    pub fn select(&self, required: f64) -> Selection {
        match self.ratings.iter().copied().find(|&rating| rating >= required) {
            Some(value) => Selection {
                value,
                exceeds_catalog: false,
            },
            None => {
                let value = self.max();
                tracing::warn!(
                    catalog = self.name,
                    required,
                    selected = value,
                    "requirement exceeds {} catalog, returning maximum {} {}",
                    self.name,
                    value,
                    self.unit
                );
                Selection {
                    value,
                    exceeds_catalog: true,
                }
            }
        }
    }

    /// Largest rating in the catalog (0.0 for an empty catalog)
    pub fn max(&self) -> f64 {
        self.ratings.last().copied().unwrap_or(0.0)
    }

    /// Check the catalog invariant: non-empty and strictly increasing.
    pub fn is_strictly_increasing(&self) -> bool {
        !self.ratings.is_empty() && self.ratings.windows(2).all(|pair| pair[0] < pair[1])
    }
}

// ============================================================================
// Threshold (Band) Tables
// ============================================================================

/// Ordered band lookup: `(upper_bound, value)` pairs plus a final value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTable {
    /// Bands in ascending order of upper bound (exclusive)
    pub bands: &'static [(f64, f64)],
    /// Value for keys at or above the last upper bound
    pub otherwise: f64,
}

impl ThresholdTable {
    /// Build a band table from static data.
    pub const fn new(bands: &'static [(f64, f64)], otherwise: f64) -> Self {
        ThresholdTable { bands, otherwise }
    }

    /// Value of the first band whose upper bound is strictly greater than `key`.
    ///
    /// ```rust
    /// use calc_core::catalog::ThresholdTable;
    ///
    /// const BANDS: ThresholdTable = ThresholdTable::new(&[(1.0, 0.6), (2.0, 0.75)], 0.9);
    /// assert_eq!(BANDS.lookup(0.5), 0.6);
    /// assert_eq!(BANDS.lookup(1.0), 0.75);
    /// assert_eq!(BANDS.lookup(2.0), 0.9);
    /// ```
    pub fn lookup(&self, key: f64) -> f64 {
        self.bands
            .iter()
            .find(|(upper, _)| key < *upper)
            .map(|(_, value)| *value)
            .unwrap_or(self.otherwise)
    }

    /// Check that upper bounds are strictly increasing.
    pub fn is_ordered(&self) -> bool {
        self.bands.windows(2).all(|pair| pair[0].0 < pair[1].0)
    }
}
