//! # Circuit and System Inputs
//!
//! The two input records every circuit calculation reads. A [`Circuit`]
//! describes one heated area fed from the manifold; [`SystemParameters`]
//! are shared by every circuit on the same manifold.
//!
//! Both are plain values: the solver never mutates them and keeps nothing
//! between calls.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::tables::RoomType;

/// One radiant floor heating circuit.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Living room",
///   "area_m2": 15.0,
///   "spacing_cm": 15.0,
///   "r_lambda": 0.05,
///   "manifold_distance_m": 3.0,
///   "room_temp_c": 20.0,
///   "room_type": "Living"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// User label (e.g., "Living room", "Bath 1")
    #[serde(default)]
    pub label: String,

    /// Heated floor area (m²)
    pub area_m2: f64,

    /// Pipe spacing (cm)
    pub spacing_cm: f64,

    /// Thermal resistance of the floor covering R_λ (m²K/W)
    pub r_lambda: f64,

    /// Distance from the manifold to the heated area, one way (m)
    pub manifold_distance_m: f64,

    /// Room design temperature (°C)
    pub room_temp_c: f64,

    /// Room use, sets the comfort limit on floor temperature
    #[serde(default)]
    pub room_type: RoomType,
}

impl Circuit {
    /// Check that the mandatory geometry is present and positive.
    ///
    /// Area, spacing and manifold distance are mandatory. NaN counts as missing.
    pub fn validate(&self) -> CalcResult<()> {
        let mandatory = [
            ("area_m2", self.area_m2),
            ("spacing_cm", self.spacing_cm),
            ("manifold_distance_m", self.manifold_distance_m),
        ];
        for (field, value) in mandatory {
            if !(value > 0.0) {
                return Err(CalcError::missing_geometry(field, value.to_string()));
            }
        }
        Ok(())
    }
}

/// Manifold-wide design parameters.
///
/// ## JSON Example
///
/// ```json
/// {
///   "screed_thickness_mm": 45.0,
///   "supply_temp_c": 35.0,
///   "design_delta_t_k": 5.0,
///   "pipe": "16x2.0"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemParameters {
    /// Screed thickness above the pipe (mm)
    pub screed_thickness_mm: f64,

    /// Supply water temperature (°C)
    pub supply_temp_c: f64,

    /// Design temperature drop supply → return (K)
    pub design_delta_t_k: f64,

    /// Pipe designation "outer x wall" in mm, e.g. "16x2.0"
    pub pipe: String,
}

impl Default for SystemParameters {
    fn default() -> Self {
        SystemParameters {
            screed_thickness_mm: 45.0,
            supply_temp_c: 35.0,
            design_delta_t_k: 5.0,
            pipe: "16x2.0".to_string(),
        }
    }
}

impl SystemParameters {
    /// Design return temperature θ_R = θ_V − Δθ
    pub fn return_temp_c(&self) -> f64 {
        self.supply_temp_c - self.design_delta_t_k
    }
}
