//! # radiant_core - Underfloor Heating Circuit Solver
//!
//! `radiant_core` sizes the water circuits of a radiant floor: heat output per
//! circuit from the KH coefficient tables, pipe length and loop split, design
//! flow, loop pressure drop, and the new operating point when a circuit's flow
//! is forced up or down from design.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Warnings, not failures**: Design problems come back as [`DesignWarning`]s next to the result
//!
//! ## Quick Start
//!
//! ```rust
//! use radiant_core::calculations::{flow_adjustment, nominal_loop, Circuit, SystemParameters};
//! use radiant_core::tables::RoomType;
//!
//! let circuit = Circuit {
//!     label: "Living".to_string(),
//!     area_m2: 15.0,
//!     spacing_cm: 15.0,
//!     r_lambda: 0.05,
//!     manifold_distance_m: 3.0,
//!     room_temp_c: 20.0,
//!     room_type: RoomType::Living,
//! };
//! let params = SystemParameters::default();
//!
//! let nominal = nominal_loop::calculate(&circuit, &params).unwrap();
//! assert_eq!(nominal.loop_count, 1);
//!
//! let reduced = flow_adjustment::adjust(&nominal, &circuit, &params, -30.0).unwrap();
//! assert!(reduced.result().heat_load_w < nominal.heat_load_w);
//! ```
//!
//! ## Modules
//!
//! - [`project`] - Session container: circuits, system parameters, adjustments
//! - [`calculations`] - Nominal loop, flow adjustment, pressure drop, manifold
//! - [`equations`] - Heat transfer and hydraulic formulas
//! - [`tables`] - KH coefficients, pipe sizes, room types
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod project;
pub mod tables;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{Circuit, DesignWarning, SolverSettings, SystemParameters};
pub use errors::{CalcError, CalcResult};
pub use project::{GlobalSettings, Project, ProjectMetadata};
