//! # Transformer Sizing
//!
//! Aggregates a load schedule with demand factors, adds a growth allowance,
//! selects the next standard distribution transformer and estimates losses.
//!
//! ## Losses
//!
//! Typical oil-immersed distribution transformer figures are used:
//!
//! - No-load (core) loss: 0.2 % of rated kVA
//! - Full-load (copper) loss: 1.0 % of rated kVA, scaled by loading²

use serde::{Deserialize, Serialize};

use crate::catalog::TRANSFORMERS_KVA;
use crate::equations::power::apparent_power_kva;
use crate::errors::{require_non_negative, require_power_factor, CalcError, CalcResult};
use crate::units::round_to;

/// No-load loss as a fraction of rated VA
pub const NO_LOAD_LOSS_FRACTION: f64 = 0.002;

/// Full-load copper loss as a fraction of rated VA
pub const LOAD_LOSS_FRACTION: f64 = 0.01;

/// One entry of the load schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerLoad {
    pub name: String,
    /// Connected load (kW)
    pub kw: f64,
    /// Power factor
    pub pf: f64,
    /// Demand (diversity) factor in [0, 1]
    pub demand_factor: f64,
}

impl Default for TransformerLoad {
    fn default() -> Self {
        TransformerLoad {
            name: String::new(),
            kw: 0.0,
            pf: 0.9,
            demand_factor: 1.0,
        }
    }
}

impl TransformerLoad {
    /// Create a load with default power and demand factors
    pub fn new(name: impl Into<String>, kw: f64) -> Self {
        TransformerLoad {
            name: name.into(),
            kw,
            ..TransformerLoad::default()
        }
    }

    fn validate(&self, index: usize) -> CalcResult<()> {
        require_non_negative(&format!("loads[{}].kw", index), self.kw)?;
        require_power_factor(&format!("loads[{}].pf", index), self.pf)?;
        if !self.demand_factor.is_finite() || self.demand_factor < 0.0 || self.demand_factor > 1.0 {
            return Err(CalcError::invalid_input(
                format!("loads[{}].demand_factor", index),
                self.demand_factor.to_string(),
                "Demand factor must be between 0 and 1",
            ));
        }
        Ok(())
    }
}

/// Input parameters for transformer sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerInput {
    /// Load schedule
    pub loads: Vec<TransformerLoad>,

    /// Growth allowance (%)
    pub growth_pct: f64,
}

impl Default for TransformerInput {
    fn default() -> Self {
        TransformerInput {
            loads: Vec::new(),
            growth_pct: 20.0,
        }
    }
}

impl TransformerInput {
    pub fn validate(&self) -> CalcResult<()> {
        if self.loads.is_empty() {
            return Err(CalcError::invalid_input("loads", "[]", "At least one load is required"));
        }
        for (index, load) in self.loads.iter().enumerate() {
            load.validate(index)?;
        }
        require_non_negative("growth_pct", self.growth_pct)?;
        Ok(())
    }
}

/// Demand contribution of a single load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadDemand {
    pub name: String,
    pub demand_kw: f64,
    pub demand_kva: f64,
}

/// Results from transformer sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerResult {
    pub total_demand_kw: f64,
    pub total_demand_kva: f64,
    /// Demand kVA including growth allowance
    pub design_kva: f64,
    /// Selected standard rating (kVA)
    pub selected_kva: f64,
    pub loading_pct: f64,
    pub no_load_loss_w: f64,
    pub load_loss_w: f64,
    pub total_losses_w: f64,
    pub exceeds_catalog: bool,
    /// Per-load breakdown in schedule order
    pub loads: Vec<LoadDemand>,
}

/// Size a distribution transformer for a load schedule.
///
/// ## Example
///
/// ```rust
/// use calc_core::calculations::transformer::{calculate, TransformerInput, TransformerLoad};
///
/// let input = TransformerInput {
///     loads: vec![TransformerLoad::new("Chillers", 300.0)],
///     growth_pct: 20.0,
/// };
/// let result = calculate(&input).unwrap();
/// assert_eq!(result.selected_kva, 400.0);
/// ```
pub fn calculate(input: &TransformerInput) -> CalcResult<TransformerResult> {
    input.validate()?;

    let mut total_kw = 0.0;
    let mut total_kva = 0.0;
    let mut breakdown = Vec::with_capacity(input.loads.len());

    for load in &input.loads {
        let demand_kw = load.kw * load.demand_factor;
        let demand_kva = apparent_power_kva(demand_kw, load.pf);
        total_kw += demand_kw;
        total_kva += demand_kva;
        breakdown.push(LoadDemand {
            name: load.name.clone(),
            demand_kw: round_to(demand_kw, 2),
            demand_kva: round_to(demand_kva, 2),
        });
    }

    let design_kva = total_kva * (1.0 + input.growth_pct / 100.0);
    let selection = TRANSFORMERS_KVA.select(design_kva);
    let selected = selection.value;

    let loading = design_kva / selected;
    let no_load_loss_w = selected * 1000.0 * NO_LOAD_LOSS_FRACTION;
    let load_loss_w = selected * 1000.0 * LOAD_LOSS_FRACTION * loading.powi(2);

    tracing::debug!(design_kva, selected_kva = selected, loading_pct = loading * 100.0, "transformer sized");

    Ok(TransformerResult {
        total_demand_kw: round_to(total_kw, 2),
        total_demand_kva: round_to(total_kva, 2),
        design_kva: round_to(design_kva, 2),
        selected_kva: round_to(selected, 0),
        loading_pct: round_to(loading * 100.0, 1),
        no_load_loss_w: round_to(no_load_loss_w, 0),
        load_loss_w: round_to(load_loss_w, 0),
        total_losses_w: round_to(no_load_loss_w + load_loss_w, 0),
        exceeds_catalog: selection.exceeds_catalog,
        loads: breakdown,
    })
}
