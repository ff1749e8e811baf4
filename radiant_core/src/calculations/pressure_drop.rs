//! # Circuit Pressure Drop
//!
//! Water-side pressure drop of one heating loop: straight-pipe friction
//! (Darcy-Weisbach with a Colebrook-White friction factor) plus local losses
//! at the manifold connections and in the serpentine bends.
//!
//! ## Loss model
//!
//! ```text
//! Δp_linear = f · (L/D) · ρv²/2
//! n_bends   = floor( L / (2·s) )
//! Δp_local  = (ζ_inlet + ζ_outlet + n_bends·ζ_bend) · ρv²/2
//! Δp_total  = (Δp_linear + Δp_local) / 1000     [kPa]
//! ```
//!
//! with ζ_inlet = 0.5, ζ_outlet = 1.0 and ζ_bend = 0.2 per 180° return bend.
//!
//! ## Example
//!
//! ```rust
//! use radiant_core::calculations::pressure_drop::{calculate, PressureDropInput};
//!
//! let input = PressureDropInput::new(160.0, "16x2.0", 106.0, 32.5, 15.0);
//! let result = calculate(&input);
//! assert!(result.total_kpa > 0.0);
//! assert_eq!(result.bend_count, 353);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::hydraulics::{
    colebrook_friction_factor, dynamic_pressure, reynolds_number, velocity, water_density,
    water_viscosity,
};
use crate::tables::pipe_sizes;
use crate::units::{Centimeters, KgPerHour, KgPerSecond, Kilopascals, Meters, Millimeters, Pascals};

/// Absolute roughness of PE-X pipe (mm)
pub const DEFAULT_ROUGHNESS_MM: f64 = 0.0015;

/// Loss coefficient at the loop inlet (manifold → pipe)
pub const ZETA_INLET: f64 = 0.5;

/// Loss coefficient at the loop outlet (pipe → manifold)
pub const ZETA_OUTLET: f64 = 1.0;

/// Loss coefficient of one 180° return bend
pub const ZETA_BEND: f64 = 0.2;

/// Velocity above which flow noise becomes audible in floor loops (m/s)
pub const MAX_RECOMMENDED_VELOCITY_M_S: f64 = 0.8;

/// Flows below this are treated as no flow (kg/h)
const MIN_FLOW_KG_H: f64 = 1.0;

/// Velocities below this are treated as no flow (m/s)
const MIN_VELOCITY_M_S: f64 = 0.001;

/// Input parameters for one loop's pressure drop.
///
/// ## JSON Example
///
/// ```json
/// {
///   "flow_kg_h": 160.0,
///   "pipe": "16x2.0",
///   "length_m": 106.0,
///   "mean_water_temp_c": 32.5,
///   "spacing_cm": 15.0,
///   "roughness_mm": 0.0015
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressureDropInput {
    /// Water mass flow through the loop (kg/h)
    pub flow_kg_h: f64,

    /// Pipe designation, e.g. "16x2.0"
    pub pipe: String,

    /// Developed pipe length of the loop (m)
    pub length_m: f64,

    /// Mean water temperature for property evaluation (°C)
    pub mean_water_temp_c: f64,

    /// Pipe spacing, sets the number of return bends (cm)
    pub spacing_cm: f64,

    /// Absolute wall roughness (mm)
    #[serde(default = "default_roughness_mm")]
    pub roughness_mm: f64,
}

fn default_roughness_mm() -> f64 {
    DEFAULT_ROUGHNESS_MM
}

impl PressureDropInput {
    /// Input with the default PE-X roughness
    pub fn new(flow_kg_h: f64, pipe: impl Into<String>, length_m: f64, mean_water_temp_c: f64, spacing_cm: f64) -> Self {
        PressureDropInput {
            flow_kg_h,
            pipe: pipe.into(),
            length_m,
            mean_water_temp_c,
            spacing_cm,
            roughness_mm: DEFAULT_ROUGHNESS_MM,
        }
    }

    /// Override the wall roughness
    pub fn with_roughness_mm(mut self, roughness_mm: f64) -> Self {
        self.roughness_mm = roughness_mm;
        self
    }
}

/// Pressure drop breakdown and flow diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PressureDropResult {
    /// Total loop pressure drop (kPa)
    pub total_kpa: f64,

    /// Straight-pipe friction loss (Pa)
    pub linear_pa: f64,

    /// Inlet, outlet and bend losses (Pa)
    pub local_pa: f64,

    /// Mean water velocity (m/s)
    pub velocity_m_s: f64,

    /// Reynolds number
    pub reynolds: f64,

    /// Darcy friction factor
    pub friction_factor: f64,

    /// Number of 180° return bends
    pub bend_count: u32,
}

impl PressureDropResult {
    /// Whether there was no flow to evaluate
    pub fn is_no_flow(&self) -> bool {
        self.velocity_m_s == 0.0 && self.total_kpa == 0.0
    }
}

/// Calculate the pressure drop of one loop.
///
/// Never fails: flows under 1 kg/h or velocities under 0.001 m/s return an
/// all-zero result.
pub fn calculate(input: &PressureDropInput) -> PressureDropResult {
    if !(input.flow_kg_h >= MIN_FLOW_KG_H) {
        return PressureDropResult::default();
    }

    let diameter: Meters = Millimeters(pipe_sizes::inner_diameter_mm(&input.pipe)).into();
    let roughness: Meters = Millimeters(input.roughness_mm).into();
    let flow: KgPerSecond = KgPerHour(input.flow_kg_h).into();

    let density = water_density(input.mean_water_temp_c);
    let viscosity = water_viscosity(input.mean_water_temp_c);
    let velocity_m_s = velocity(flow.0, density, diameter.0);
    if !(velocity_m_s >= MIN_VELOCITY_M_S) {
        return PressureDropResult::default();
    }

    let reynolds = reynolds_number(density, velocity_m_s, diameter.0, viscosity);
    let friction_factor = colebrook_friction_factor(reynolds, roughness.0 / diameter.0);
    let dynamic = dynamic_pressure(density, velocity_m_s);

    let linear_pa = friction_factor * (input.length_m / diameter.0) * dynamic;

    let bend_count = bend_count(input.length_m, input.spacing_cm);
    let zeta_total = ZETA_INLET + ZETA_OUTLET + bend_count as f64 * ZETA_BEND;
    let local_pa = zeta_total * dynamic;

    let total: Kilopascals = Pascals(linear_pa + local_pa).into();

    PressureDropResult {
        total_kpa: total.0,
        linear_pa,
        local_pa,
        velocity_m_s,
        reynolds,
        friction_factor,
        bend_count,
    }
}

/// Return bends in a serpentine of length L at spacing s: floor(L / 2s)
fn bend_count(length_m: f64, spacing_cm: f64) -> u32 {
    let spacing: Meters = Centimeters(spacing_cm).into();
    if !(spacing.0 > 0.0) || !(length_m > 0.0) {
        return 0;
    }
    (length_m / (2.0 * spacing.0)).floor() as u32
}
