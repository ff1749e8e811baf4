//! # Circuit Calculations
//!
//! The radiant floor circuit solver. Each calculation follows the pattern:
//!
//! - `*Input` / [`Circuit`] + [`SystemParameters`] - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(..)` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`pressure_drop`] - Loop pressure drop (Darcy-Weisbach + local losses)
//! - [`nominal_loop`] - Circuit at design flow, closed form
//! - [`flow_adjustment`] - Circuit at a forced flow, damped fixed-point iteration
//! - [`manifold`] - All circuits of a manifold, totals and balancing

pub mod circuit;
pub mod flow_adjustment;
pub mod manifold;
pub mod nominal_loop;
pub mod pressure_drop;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use circuit::{Circuit, SystemParameters};
pub use flow_adjustment::{AdjustedResult, AdjustmentOutcome};
pub use manifold::{ManifoldInput, ManifoldResult};
pub use nominal_loop::NominalResult;
pub use pressure_drop::{PressureDropInput, PressureDropResult};

/// Tunable solver settings.
///
/// ## JSON Example
///
/// ```json
/// {
///   "pipe_roughness_mm": 0.0015,
///   "max_iterations": 20,
///   "convergence_tolerance": 0.001
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Absolute pipe wall roughness (mm)
    pub pipe_roughness_mm: f64,

    /// Iteration budget of the flow adjustment
    pub max_iterations: usize,

    /// Relative heat-output change |ΔQ|/Q that ends the flow adjustment
    pub convergence_tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            pipe_roughness_mm: pressure_drop::DEFAULT_ROUGHNESS_MM,
            max_iterations: flow_adjustment::MAX_ITERATIONS,
            convergence_tolerance: flow_adjustment::CONVERGENCE_TOLERANCE,
        }
    }
}

/// A design condition worth showing next to a result.
///
/// Warnings never stop a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DesignWarning {
    /// Floor surface is warmer than the comfort limit of the room type
    FloorTemperatureExceeded { surface_temp_c: f64, limit_c: f64 },

    /// Pipe is longer than one loop may be; the circuit is split
    LoopSplit {
        loops: u32,
        pipe_length_m: f64,
        max_loop_length_m: f64,
    },

    /// Design return temperature is not above room temperature
    ReturnNotAboveRoom { return_temp_c: f64, room_temp_c: f64 },

    /// Loop velocity above the recommended limit
    HighVelocity { velocity_m_s: f64, limit_m_s: f64 },

    /// Requested flow change would drive the return below room temperature;
    /// the adjustment was reset to 0 %
    PhysicallyInvalidState {
        requested_pct: f64,
        /// Return temperature that tripped the guard; `None` when no water flows
        return_temp_c: Option<f64>,
        room_temp_c: f64,
        iteration: usize,
    },
}

impl DesignWarning {
    /// Short code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            DesignWarning::FloorTemperatureExceeded { .. } => "FLOOR_TEMPERATURE_EXCEEDED",
            DesignWarning::LoopSplit { .. } => "LOOP_SPLIT",
            DesignWarning::ReturnNotAboveRoom { .. } => "RETURN_NOT_ABOVE_ROOM",
            DesignWarning::HighVelocity { .. } => "HIGH_VELOCITY",
            DesignWarning::PhysicallyInvalidState { .. } => "PHYSICALLY_INVALID_STATE",
        }
    }
}

impl std::fmt::Display for DesignWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesignWarning::FloorTemperatureExceeded { surface_temp_c, limit_c } => write!(
                f,
                "Floor surface {:.1} °C exceeds the comfort limit of {:.1} °C",
                surface_temp_c, limit_c
            ),
            DesignWarning::LoopSplit { loops, pipe_length_m, max_loop_length_m } => write!(
                f,
                "{:.0} m of pipe exceeds the {:.0} m loop limit, split into {} loops",
                pipe_length_m, max_loop_length_m, loops
            ),
            DesignWarning::ReturnNotAboveRoom { return_temp_c, room_temp_c } => write!(
                f,
                "Return {:.1} °C is not above room temperature {:.1} °C",
                return_temp_c, room_temp_c
            ),
            DesignWarning::HighVelocity { velocity_m_s, limit_m_s } => write!(
                f,
                "Loop velocity {:.2} m/s is above the recommended {:.1} m/s",
                velocity_m_s, limit_m_s
            ),
            DesignWarning::PhysicallyInvalidState { requested_pct, return_temp_c, room_temp_c, .. } => match return_temp_c {
                Some(return_temp_c) => write!(
                    f,
                    "Flow change of {:+.0} % would cool the return to {:.1} °C (room {:.1} °C); adjustment reset to 0 %",
                    requested_pct, return_temp_c, room_temp_c
                ),
                None => write!(
                    f,
                    "Flow change of {:+.0} % leaves no water flowing; adjustment reset to 0 %",
                    requested_pct
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_settings_defaults() {
        let settings = SolverSettings::default();
        assert_eq!(settings.pipe_roughness_mm, 0.0015);
        assert_eq!(settings.max_iterations, 20);
        assert_eq!(settings.convergence_tolerance, 0.001);
    }

    #[test]
    fn test_partial_settings_deserialize() {
        let settings: SolverSettings = serde_json::from_str(r#"{"max_iterations": 10}"#).unwrap();
        assert_eq!(settings.max_iterations, 10);
        assert_eq!(settings.pipe_roughness_mm, 0.0015);
    }

    #[test]
    fn test_warning_serialization() {
        let warning = DesignWarning::LoopSplit {
            loops: 2,
            pipe_length_m: 150.0,
            max_loop_length_m: 120.0,
        };
        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"type\":\"LoopSplit\""));
        let roundtrip: DesignWarning = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, warning);
        assert_eq!(warning.code(), "LOOP_SPLIT");
        assert_eq!(
            warning.to_string(),
            "150 m of pipe exceeds the 120 m loop limit, split into 2 loops"
        );
    }

    #[test]
    fn test_no_flow_warning_roundtrip() {
        let warning = DesignWarning::PhysicallyInvalidState {
            requested_pct: 20.0,
            return_temp_c: None,
            room_temp_c: 20.0,
            iteration: 0,
        };
        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"return_temp_c\":null"));
        let roundtrip: DesignWarning = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, warning);
        assert_eq!(
            warning.to_string(),
            "Flow change of +20 % leaves no water flowing; adjustment reset to 0 %"
        );
    }

    #[test]
    fn test_velocity_warning_message() {
        let warning = DesignWarning::HighVelocity {
            velocity_m_s: 1.13,
            limit_m_s: 0.8,
        };
        assert_eq!(warning.code(), "HIGH_VELOCITY");
        assert_eq!(
            warning.to_string(),
            "Loop velocity 1.13 m/s is above the recommended 0.8 m/s"
        );
    }
}
