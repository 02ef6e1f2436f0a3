//! # Grounding Rod Resistance
//!
//! Resistance to earth of vertical driven rods (Dwight's formula) and the
//! number of parallel rods needed to reach a target resistance.
//!
//! ## Method
//!
//! ```text
//! R1 = ρ / (2πL) · ln(4L / d)
//! Rn = (R1 / n) / k(s / L)
//! ```
//!
//! `k` accounts for mutual resistance between closely spaced rods. A single
//! rod has no neighbours and uses `k = 1`.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::catalog::ThresholdTable;
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::units::{feet_to_meters, round_to, NormalizeUnits};

/// Coupling (utilisation) factor keyed on spacing / rod length
pub const COUPLING_FACTOR: ThresholdTable = ThresholdTable::new(&[(1.0, 0.6), (2.0, 0.75)], 0.9);

/// Upper bound of the rod-count search
pub const MAX_RODS: u32 = 50;

/// Input parameters for a rod array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundingInput {
    /// Soil resistivity (Ω·m)
    pub soil_resistivity: f64,
    /// Driven length of each rod (m)
    pub rod_length: f64,
    /// Rod diameter (m)
    pub rod_diameter: f64,
    /// Required resistance to earth (Ω)
    pub target_resistance: f64,
    /// Rods in the proposed array
    pub num_rods: u32,
    /// Spacing between adjacent rods (m)
    pub rod_spacing: f64,
}

impl Default for GroundingInput {
    fn default() -> Self {
        GroundingInput {
            soil_resistivity: 100.0,
            rod_length: 3.0,
            rod_diameter: 0.016,
            target_resistance: 10.0,
            num_rods: 1,
            rod_spacing: 3.0,
        }
    }
}

impl GroundingInput {
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("soil_resistivity", self.soil_resistivity)?;
        require_positive("rod_length", self.rod_length)?;
        require_positive("rod_diameter", self.rod_diameter)?;
        require_positive("target_resistance", self.target_resistance)?;
        require_positive("rod_spacing", self.rod_spacing)?;
        if self.num_rods == 0 {
            return Err(CalcError::invalid_input("num_rods", "0", "At least one rod is required"));
        }
        if 4.0 * self.rod_length <= self.rod_diameter {
            return Err(CalcError::degenerate(
                "single rod resistance",
                format!(
                    "ln(4L/d) requires 4 × {} m to exceed the rod diameter {} m",
                    self.rod_length, self.rod_diameter
                ),
            ));
        }
        Ok(())
    }

    /// Dwight resistance of one rod (Ω)
    pub fn single_rod_resistance(&self) -> f64 {
        let l = self.rod_length;
        self.soil_resistivity / (2.0 * PI * l) * (4.0 * l / self.rod_diameter).ln()
    }

    /// Coupling factor for an array of `rods`
    ///
    /// A lone rod keeps k = 1.0, so R(1) is the plain Dwight value. The
    /// spacing bands apply from two rods up.
    pub fn coupling(&self, rods: u32) -> f64 {
        if rods <= 1 {
            1.0
        } else {
            COUPLING_FACTOR.lookup(self.rod_spacing / self.rod_length)
        }
    }

    /// Combined resistance of `rods` rods in parallel (Ω)
    pub fn array_resistance(&self, rods: u32) -> f64 {
        (self.single_rod_resistance() / rods as f64) / self.coupling(rods)
    }
}

impl NormalizeUnits for GroundingInput {
    /// Rod spacing in feet
    fn to_metric(&self) -> Self {
        GroundingInput {
            rod_spacing: feet_to_meters(self.rod_spacing),
            ..self.clone()
        }
    }
}

/// Outcome of the bounded rod-count search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RodSearch {
    /// Smallest rod count meeting the target
    Found(u32),
    /// No count up to the bound meets the target
    Exhausted { tested: u32, best_ohm: f64 },
}

impl RodSearch {
    /// Rods to install: the found count, or the search bound
    pub fn rods(&self) -> u32 {
        match self {
            RodSearch::Found(n) => *n,
            RodSearch::Exhausted { tested, .. } => *tested,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        matches!(self, RodSearch::Found(_))
    }
}

/// Find the smallest rod count whose array resistance meets the target.
pub fn search_rod_count(input: &GroundingInput) -> RodSearch {
    let mut best_ohm = f64::INFINITY;
    for n in 1..=MAX_RODS {
        let r = input.array_resistance(n);
        if r <= input.target_resistance {
            return RodSearch::Found(n);
        }
        best_ohm = best_ohm.min(r);
    }
    tracing::warn!(
        target_ohm = input.target_resistance,
        best_ohm,
        "target resistance not reached with {} rods",
        MAX_RODS
    );
    RodSearch::Exhausted {
        tested: MAX_RODS,
        best_ohm,
    }
}

/// Results from a grounding calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingResult {
    pub single_rod_ohm: f64,
    /// Resistance of the proposed `num_rods` array
    pub total_resistance_ohm: f64,
    pub coupling_factor: f64,
    pub target_ohm: f64,
    pub meets_target: bool,
    pub rods_needed: u32,
    /// False when even the search bound misses the target
    pub rods_search_satisfied: bool,
}

/// Evaluate a rod array and search for the rod count needed.
///
/// ## Example
///
/// ```rust
/// use calc_core::calculations::grounding::{calculate, GroundingInput};
///
/// let result = calculate(&GroundingInput::default()).unwrap();
/// assert!(!result.meets_target);
/// assert_eq!(result.rods_needed, 5);
/// ```
pub fn calculate(input: &GroundingInput) -> CalcResult<GroundingResult> {
    input.validate()?;

    let single = input.single_rod_resistance();
    let total = input.array_resistance(input.num_rods);
    let search = search_rod_count(input);

    tracing::debug!(single_rod_ohm = single, total_ohm = total, ?search, "grounding evaluated");

    Ok(GroundingResult {
        single_rod_ohm: round_to(single, 2),
        total_resistance_ohm: round_to(total, 2),
        coupling_factor: round_to(input.coupling(input.num_rods), 2),
        target_ohm: round_to(input.target_resistance, 2),
        meets_target: total <= input.target_resistance,
        rods_needed: search.rods(),
        rods_search_satisfied: search.is_satisfied(),
    })
}
