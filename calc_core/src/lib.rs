//! # calc_core - Electrical Equipment Sizing Engine
//!
//! `calc_core` computes equipment sizing recommendations for electrical
//! installations: cables and breakers, UPS and batteries, transformers,
//! generator sets, capacitor banks, lighting layouts, grounding rods, energy
//! cost and motor starters. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize, absent input
//!   fields take documented defaults
//! - **Rich Errors**: Structured error types, not just strings
//! - **Standard sizes**: Requirements are rounded up to catalog ratings;
//!   saturation is flagged, never silently hidden
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::calculations::cable::{calculate, CableInput};
//! use calc_core::settings::EngineSettings;
//!
//! let input: CableInput = serde_json::from_str(r#"{"load_kw": 10.0}"#).unwrap();
//! let result = calculate(&input, &EngineSettings::default()).unwrap();
//!
//! assert_eq!(result.circuit_breaker_a, 20.0);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - The nine sizing calculators and tagged dispatch
//! - [`catalog`] - Standard equipment ratings and cable ampacity tables
//! - [`derating`] - Site derating factors
//! - [`equations`] - Shared power-system formulas
//! - [`settings`] - Engine settings loaded from TOML
//! - [`report`] - Typst PDF reports
//! - [`units`] - Rounding, imperial conversions, AWG table
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod catalog;
pub mod derating;
pub mod equations;
pub mod errors;
pub mod report;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationItem, CalculationOutput};
pub use errors::{CalcError, CalcResult};
pub use settings::{EngineSettings, DEFAULT_SETTINGS};
pub use units::UnitSystem;
