//! # Motor Starting Sizing
//!
//! Full-load and starting currents of a three-phase induction motor, and the
//! feeder cable, breaker, contactor and overload relay for it.
//!
//! ## Starting Methods
//!
//! | Method       | Starting current | Starting torque |
//! |--------------|------------------|-----------------|
//! | DOL          | 1.00 × LRC       | 100 %           |
//! | Star-Delta   | 0.33 × LRC       | 33 %            |
//! | Soft-Starter | 0.50 × LRC       | 50 %            |
//! | VFD          | 1.50 × FLA       | 150 %           |
//!
//! LRC (locked-rotor current) is taken as 7 × FLA.

use serde::{Deserialize, Serialize};

use crate::catalog::{CableTable, Conductor, Mounting, BREAKERS_A, CONTACTORS_A};
use crate::equations::power::line_current_a;
use crate::errors::{require_non_negative, require_percent, require_positive, require_power_factor, CalcError, CalcResult};
use crate::units::{closest_awg, round_to};

/// Locked-rotor current as a multiple of FLA
pub const LRC_MULTIPLIER: f64 = 7.0;

/// Supply frequency (Hz)
pub const SUPPLY_HZ: f64 = 50.0;

/// Full-load speed as a fraction of synchronous speed
pub const FULL_LOAD_SLIP_FACTOR: f64 = 0.97;

/// Continuous-current margin for cable and breaker selection
pub const FEEDER_MARGIN: f64 = 1.25;

/// Motor starting method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum StartingMethod {
    /// Direct on line
    #[default]
    #[serde(rename = "DOL")]
    DirectOnLine,
    #[serde(rename = "Star-Delta")]
    StarDelta,
    #[serde(rename = "Soft-Starter")]
    SoftStarter,
    /// Variable frequency drive
    #[serde(rename = "VFD")]
    Vfd,
}

/// How the starting current is derived
#[derive(Debug, Clone, Copy, PartialEq)]
enum CurrentBasis {
    LockedRotor,
    FullLoad,
}

impl StartingMethod {
    pub const ALL: [StartingMethod; 4] = [
        StartingMethod::DirectOnLine,
        StartingMethod::StarDelta,
        StartingMethod::SoftStarter,
        StartingMethod::Vfd,
    ];

    fn current_policy(&self) -> (f64, CurrentBasis) {
        match self {
            StartingMethod::DirectOnLine => (1.0, CurrentBasis::LockedRotor),
            StartingMethod::StarDelta => (0.33, CurrentBasis::LockedRotor),
            StartingMethod::SoftStarter => (0.5, CurrentBasis::LockedRotor),
            StartingMethod::Vfd => (1.5, CurrentBasis::FullLoad),
        }
    }

    /// Starting torque as a percentage of DOL torque
    pub fn torque_pct(&self) -> f64 {
        match self {
            StartingMethod::DirectOnLine => 100.0,
            StartingMethod::StarDelta => 33.0,
            StartingMethod::SoftStarter => 50.0,
            StartingMethod::Vfd => 150.0,
        }
    }

    /// Starting current for a motor with the given FLA and LRC
    pub fn starting_current(&self, fla: f64, lrc: f64) -> f64 {
        let (multiplier, basis) = self.current_policy();
        match basis {
            CurrentBasis::LockedRotor => multiplier * lrc,
            CurrentBasis::FullLoad => multiplier * fla,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            StartingMethod::DirectOnLine => "DOL",
            StartingMethod::StarDelta => "Star-Delta",
            StartingMethod::SoftStarter => "Soft-Starter",
            StartingMethod::Vfd => "VFD",
        }
    }
}

impl From<String> for StartingMethod {
    fn from(value: String) -> Self {
        match value.trim() {
            "DOL" => StartingMethod::DirectOnLine,
            "Star-Delta" => StartingMethod::StarDelta,
            "Soft-Starter" => StartingMethod::SoftStarter,
            "VFD" => StartingMethod::Vfd,
            other => {
                tracing::warn!(value = other, "unrecognised starting method, using DOL");
                StartingMethod::DirectOnLine
            }
        }
    }
}

impl std::fmt::Display for StartingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Input parameters for motor sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorInput {
    /// Rated shaft power (kW)
    pub motor_kw: f64,
    /// Line-to-line voltage (V)
    pub voltage: f64,
    /// Efficiency (%)
    pub efficiency: f64,
    pub power_factor: f64,
    pub starting_method: StartingMethod,
    /// Number of poles (even)
    pub poles: u32,
}

impl Default for MotorInput {
    fn default() -> Self {
        MotorInput {
            motor_kw: 0.0,
            voltage: 400.0,
            efficiency: 90.0,
            power_factor: 0.85,
            starting_method: StartingMethod::DirectOnLine,
            poles: 4,
        }
    }
}

impl MotorInput {
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("motor_kw", self.motor_kw)?;
        require_positive("voltage", self.voltage)?;
        require_percent("efficiency", self.efficiency)?;
        require_power_factor("power_factor", self.power_factor)?;
        if self.poles < 2 || self.poles % 2 != 0 {
            return Err(CalcError::invalid_input(
                "poles",
                self.poles.to_string(),
                "Pole count must be an even number of at least 2",
            ));
        }
        Ok(())
    }
}

/// Results from motor sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorResult {
    /// Full-load current (A)
    pub fla: f64,
    /// Locked-rotor current (A)
    pub lrc: f64,
    pub starting_current: f64,
    pub starting_method: String,
    pub starting_torque_pct: f64,
    pub sync_rpm: f64,
    pub full_load_rpm: f64,
    /// Copper open-air feeder cross-section (mm²)
    pub cable_mm2: f64,
    pub circuit_breaker_a: f64,
    pub contactor_a: f64,
    /// Overload relay setting range (A)
    pub overload_min: f64,
    pub overload_max: f64,
    /// Any of cable, breaker or contactor selection saturated
    pub exceeds_catalog: bool,
}

impl MotorResult {
    /// Nearest AWG gauge to the feeder cross-section
    pub fn cable_awg(&self) -> &'static str {
        closest_awg(self.cable_mm2)
    }
}

/// Size motor starting and protection gear.
///
/// ## Example
///
/// ```rust
/// use calc_core::calculations::motor::{calculate, MotorInput};
///
/// let input = MotorInput { motor_kw: 10.0, ..MotorInput::default() };
/// let result = calculate(&input).unwrap();
/// assert_eq!(result.fla, 18.87);
/// assert_eq!(result.sync_rpm, 1500.0);
/// ```
pub fn calculate(input: &MotorInput) -> CalcResult<MotorResult> {
    input.validate()?;

    let efficiency = input.efficiency / 100.0;
    let fla = line_current_a(input.motor_kw, input.voltage, efficiency * input.power_factor, true);
    let lrc = LRC_MULTIPLIER * fla;

    let method = input.starting_method;
    let starting_current = method.starting_current(fla, lrc);

    let sync_rpm = 120.0 * SUPPLY_HZ / input.poles as f64;
    let full_load_rpm = FULL_LOAD_SLIP_FACTOR * sync_rpm;

    let feeder_current = FEEDER_MARGIN * fla;
    let (cable_mm2, _, cable_exceeds) =
        CableTable::for_installation(Conductor::Copper, Mounting::Open).smallest_for(feeder_current);
    let breaker = BREAKERS_A.select(feeder_current);
    let contactor = CONTACTORS_A.select(fla);

    tracing::debug!(fla, starting_current, method = %method, cable_mm2, "motor starter sized");

    Ok(MotorResult {
        fla: round_to(fla, 2),
        lrc: round_to(lrc, 1),
        starting_current: round_to(starting_current, 1),
        starting_method: method.code().to_string(),
        starting_torque_pct: method.torque_pct(),
        sync_rpm: round_to(sync_rpm, 0),
        full_load_rpm: round_to(full_load_rpm, 0),
        cable_mm2,
        circuit_breaker_a: breaker.value,
        contactor_a: contactor.value,
        overload_min: round_to(0.9 * fla, 2),
        overload_max: round_to(1.1 * fla, 2),
        exceeds_catalog: cable_exceeds || breaker.exceeds_catalog || contactor.exceeds_catalog,
    })
}
