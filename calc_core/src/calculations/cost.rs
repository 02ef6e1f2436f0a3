//! # Electricity Cost Estimator
//!
//! Energy consumption, tariff cost and CO2 emissions for a constant load
//! running on a fixed schedule.

use serde::{Deserialize, Serialize};

use crate::equations::power::apparent_power_kva;
use crate::errors::{require_non_negative, require_percent, require_power_factor, CalcError, CalcResult};
use crate::settings::EngineSettings;
use crate::units::round_to;

/// Input parameters for a cost estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostInput {
    /// Useful output power (kW)
    pub load_kw: f64,
    pub hours_per_day: f64,
    pub days_per_month: f64,
    /// Energy price (€/kWh)
    pub price_kwh: f64,
    /// Demand charge (€/kW per month)
    pub demand_charge: f64,
    pub power_factor: f64,
    /// Equipment efficiency (%)
    pub efficiency: f64,
}

impl Default for CostInput {
    fn default() -> Self {
        CostInput {
            load_kw: 0.0,
            hours_per_day: 8.0,
            days_per_month: 22.0,
            price_kwh: 0.22,
            demand_charge: 0.0,
            power_factor: 0.9,
            efficiency: 100.0,
        }
    }
}

impl CostInput {
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("load_kw", self.load_kw)?;
        require_non_negative("hours_per_day", self.hours_per_day)?;
        if self.hours_per_day > 24.0 {
            return Err(CalcError::invalid_input(
                "hours_per_day",
                self.hours_per_day.to_string(),
                "A day has at most 24 hours",
            ));
        }
        require_non_negative("days_per_month", self.days_per_month)?;
        if self.days_per_month > 31.0 {
            return Err(CalcError::invalid_input(
                "days_per_month",
                self.days_per_month.to_string(),
                "A month has at most 31 days",
            ));
        }
        require_non_negative("price_kwh", self.price_kwh)?;
        require_non_negative("demand_charge", self.demand_charge)?;
        require_power_factor("power_factor", self.power_factor)?;
        require_percent("efficiency", self.efficiency)?;
        Ok(())
    }
}

/// Results from a cost estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostResult {
    pub daily_kwh: f64,
    pub monthly_kwh: f64,
    pub yearly_kwh: f64,
    pub monthly_energy_eur: f64,
    pub monthly_demand_eur: f64,
    pub monthly_total_eur: f64,
    pub yearly_total_eur: f64,
    pub apparent_power_kva: f64,
    /// Annual emissions (t CO2)
    pub co2_yearly_t: f64,
}

/// Estimate energy cost and emissions.
///
/// ```rust
/// use calc_core::calculations::cost::{calculate, CostInput};
/// use calc_core::settings::EngineSettings;
///
/// let input = CostInput { load_kw: 10.0, ..CostInput::default() };
/// let result = calculate(&input, &EngineSettings::default()).unwrap();
/// assert_eq!(result.monthly_kwh, 1760.0);
/// ```
pub fn calculate(input: &CostInput, settings: &EngineSettings) -> CalcResult<CostResult> {
    input.validate()?;

    // Grid draw including equipment losses
    let input_kw = input.load_kw / (input.efficiency / 100.0);

    let daily_kwh = input_kw * input.hours_per_day;
    let monthly_kwh = daily_kwh * input.days_per_month;
    let yearly_kwh = monthly_kwh * 12.0;

    let energy_cost = monthly_kwh * input.price_kwh;
    let demand_cost = input_kw * input.demand_charge;
    let monthly_total = energy_cost + demand_cost;

    let co2_t = monthly_kwh * settings.tariff.co2_kg_per_kwh * 12.0 / 1000.0;

    tracing::debug!(input_kw, monthly_kwh, monthly_total, "energy cost estimated");

    Ok(CostResult {
        daily_kwh: round_to(daily_kwh, 2),
        monthly_kwh: round_to(monthly_kwh, 1),
        yearly_kwh: round_to(yearly_kwh, 0),
        monthly_energy_eur: round_to(energy_cost, 2),
        monthly_demand_eur: round_to(demand_cost, 2),
        monthly_total_eur: round_to(monthly_total, 2),
        yearly_total_eur: round_to(monthly_total * 12.0, 0),
        apparent_power_kva: round_to(apparent_power_kva(input_kw, input.power_factor), 2),
        co2_yearly_t: round_to(co2_t, 2),
    })
}
