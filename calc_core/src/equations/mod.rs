//! # Electrical Equations
//!
//! Fundamental power-system relations used by the calculators. Keeping them
//! in one place makes it easy to verify them against references and keeps
//! the √3 convention consistent across calculators.
//!
//! ## Modules
//!
//! - [`power`] - Line current, apparent/reactive power, voltage drop, fault current
//!
//! ## Conventions
//!
//! - Power in kW / kVA / kVAr, voltage in V (line-to-line for three-phase),
//!   current in A.
//! - Power factors are displacement factors cos φ in (0, 1].
//!
//! ## References
//!
//! - IEC 60364-5-52: Selection and erection of wiring systems
//! - IEC 60909-0: Short-circuit currents in three-phase a.c. systems

pub mod power;

pub use power::{
    apparent_power_kva,
    line_current_a,
    phase_angle,
    reactive_power_kvar,
    three_phase_current_from_kva,
    transformer_fault_current_a,
    voltage_drop_v,
    Phases,
    SQRT_3,
};
