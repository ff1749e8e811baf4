//! # Nominal Loop Calculation
//!
//! Evaluates a radiant floor circuit at its design flow, in closed form.
//!
//! ## Procedure
//!
//! 1. Return temperature θ_R = θ_V − Δθ
//! 2. KH from the coefficient table (pipe, R_λ, spacing, screed)
//! 3. LMTD between water and room, arithmetic mean when degenerate
//! 4. Heat flux q = KH·LMTD, heat load Q = q·A
//! 5. Pipe length L = A/s + 2·manifold distance
//! 6. Loop split when L exceeds the pipe's maximum loop length
//! 7. Mass flow ṁ = Q·3600 / (4190·Δθ)
//! 8. Floor surface temperature θ_F = θ_i + q/10.8
//! 9. Pressure drop of one loop at the mean water temperature
//! 10. Comfort limit of the room type
//!
//! ## Example
//!
//! ```rust
//! use radiant_core::calculations::nominal_loop::calculate;
//! use radiant_core::calculations::{Circuit, SystemParameters};
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
//!
//! let result = calculate(&circuit, &SystemParameters::default()).unwrap();
//! assert!((result.pipe_length_m - 106.0).abs() < 1e-9);
//! assert_eq!(result.loop_count, 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::circuit::{Circuit, SystemParameters};
use crate::calculations::pressure_drop::{self, PressureDropInput, PressureDropResult};
use crate::calculations::{DesignWarning, SolverSettings};
use crate::equations::heat_transfer::{
    design_mass_flow_kg_h, floor_surface_temperature, heat_flux, log_mean_temperature_difference,
};
use crate::errors::CalcResult;
use crate::tables::pipe_sizes;
use crate::tables::CoefficientTable;
use crate::units::{Centimeters, Meters};

/// Results of a circuit at design flow.
///
/// ## JSON Example
///
/// ```json
/// {
///   "kh": 5.09,
///   "kh_exact": true,
///   "lmtd_k": 12.33,
///   "heat_flux_w_m2": 62.8,
///   "heat_load_w": 941.5,
///   "pipe_length_m": 106.0,
///   "loop_count": 1,
///   "mass_flow_kg_h": 161.8,
///   "return_temp_c": 30.0,
///   "floor_surface_temp_c": 25.8,
///   "pressure_drop_kpa": 31.7,
///   "velocity_m_s": 0.40,
///   "physically_valid": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NominalResult {
    // === Thermal ===
    /// Heat-output coefficient used (W/m²K)
    pub kh: f64,

    /// Whether the construction was found verbatim in the KH table
    pub kh_exact: bool,

    /// Logarithmic mean temperature difference water → room (K)
    pub lmtd_k: f64,

    /// Heat flux density q (W/m²)
    pub heat_flux_w_m2: f64,

    /// Heat load Q = q·A (W)
    pub heat_load_w: f64,

    /// Supply water temperature (°C)
    pub supply_temp_c: f64,

    /// Return water temperature (°C)
    pub return_temp_c: f64,

    /// Mean water temperature (°C)
    pub mean_water_temp_c: f64,

    /// Mean floor surface temperature (°C)
    pub floor_surface_temp_c: f64,

    /// Comfort limit for the room type (°C)
    pub max_floor_temp_c: f64,

    // === Geometry ===
    /// Total pipe length, manifold connections included (m)
    ///
    /// Fixed at design geometry; flow adjustments never change it.
    pub pipe_length_m: f64,

    /// Recommended number of parallel loops
    pub loop_count: u32,

    /// Pipe length of each loop (m)
    pub loop_length_m: f64,

    /// Floor area served by each loop (m²)
    pub area_per_loop_m2: f64,

    /// Water content of all loops (L)
    pub water_volume_l: f64,

    // === Hydraulics ===
    /// Total water mass flow (kg/h)
    pub mass_flow_kg_h: f64,

    /// Pressure drop of one loop (kPa)
    pub pressure_drop_kpa: f64,

    /// Water velocity in one loop (m/s)
    pub velocity_m_s: f64,

    /// Full pressure-drop breakdown of one loop
    pub hydraulics: PressureDropResult,

    // === Status ===
    /// supply > return > room
    pub physically_valid: bool,

    pub warnings: Vec<DesignWarning>,
}

impl NominalResult {
    /// Whether the floor stays within the comfort limit
    pub fn floor_temperature_ok(&self) -> bool {
        self.floor_surface_temp_c <= self.max_floor_temp_c
    }

    /// Mass flow through each loop (kg/h)
    pub fn loop_mass_flow_kg_h(&self) -> f64 {
        self.mass_flow_kg_h / self.loop_count as f64
    }
}

/// Calculate a circuit at design flow with default solver settings.
///
/// # Returns
///
/// * `Ok(NominalResult)` - Calculation results
/// * `Err(CalcError::MissingGeometry)` - Area, spacing or manifold distance
///   missing or non-positive
pub fn calculate(circuit: &Circuit, params: &SystemParameters) -> CalcResult<NominalResult> {
    calculate_with(circuit, params, &SolverSettings::default())
}

/// Calculate a circuit at design flow.
pub fn calculate_with(
    circuit: &Circuit,
    params: &SystemParameters,
    settings: &SolverSettings,
) -> CalcResult<NominalResult> {
    circuit.validate()?;

    let supply_temp_c = params.supply_temp_c;
    let return_temp_c = params.return_temp_c();
    let room_temp_c = circuit.room_temp_c;
    let mut warnings = Vec::new();

    let physically_valid = supply_temp_c > return_temp_c && return_temp_c > room_temp_c;
    if !(return_temp_c > room_temp_c) {
        warnings.push(DesignWarning::ReturnNotAboveRoom {
            return_temp_c,
            room_temp_c,
        });
    }

    // Thermal output
    let kh_match = CoefficientTable::standard().resolve(
        &params.pipe,
        circuit.r_lambda,
        circuit.spacing_cm,
        params.screed_thickness_mm,
    );
    let lmtd_k = log_mean_temperature_difference(supply_temp_c, return_temp_c, room_temp_c);
    let heat_flux_w_m2 = heat_flux(kh_match.kh, lmtd_k);
    let heat_load_w = heat_flux_w_m2 * circuit.area_m2;

    // Pipe layout
    let spacing: Meters = Centimeters(circuit.spacing_cm).into();
    let pipe_length_m = circuit.area_m2 / spacing.0 + 2.0 * circuit.manifold_distance_m;
    let max_loop_length_m = pipe_sizes::max_loop_length_m(&params.pipe);
    let loop_count = if pipe_length_m > max_loop_length_m {
        (pipe_length_m / max_loop_length_m).ceil() as u32
    } else {
        1
    };
    if loop_count > 1 {
        warnings.push(DesignWarning::LoopSplit {
            loops: loop_count,
            pipe_length_m,
            max_loop_length_m,
        });
    }
    let loop_length_m = pipe_length_m / loop_count as f64;
    let area_per_loop_m2 = circuit.area_m2 / loop_count as f64;
    let water_volume_l = pipe_length_m * pipe_sizes::volume_l_per_m(&params.pipe);

    let mass_flow_kg_h = design_mass_flow_kg_h(heat_load_w, params.design_delta_t_k);

    let floor_surface_temp_c = floor_surface_temperature(room_temp_c, heat_flux_w_m2);
    let max_floor_temp_c = circuit.room_type.max_floor_temperature_c();
    if floor_surface_temp_c > max_floor_temp_c {
        warnings.push(DesignWarning::FloorTemperatureExceeded {
            surface_temp_c: floor_surface_temp_c,
            limit_c: max_floor_temp_c,
        });
    }

    // Hydraulics of one loop
    let mean_water_temp_c = (supply_temp_c + return_temp_c) / 2.0;
    let hydraulics = pressure_drop::calculate(
        &PressureDropInput::new(
            mass_flow_kg_h / loop_count as f64,
            params.pipe.as_str(),
            loop_length_m,
            mean_water_temp_c,
            circuit.spacing_cm,
        )
        .with_roughness_mm(settings.pipe_roughness_mm),
    );

    if hydraulics.velocity_m_s > pressure_drop::MAX_RECOMMENDED_VELOCITY_M_S {
        warnings.push(DesignWarning::HighVelocity {
            velocity_m_s: hydraulics.velocity_m_s,
            limit_m_s: pressure_drop::MAX_RECOMMENDED_VELOCITY_M_S,
        });
    }

    Ok(NominalResult {
        kh: kh_match.kh,
        kh_exact: kh_match.exact,
        lmtd_k,
        heat_flux_w_m2,
        heat_load_w,
        supply_temp_c,
        return_temp_c,
        mean_water_temp_c,
        floor_surface_temp_c,
        max_floor_temp_c,
        pipe_length_m,
        loop_count,
        loop_length_m,
        area_per_loop_m2,
        water_volume_l,
        mass_flow_kg_h,
        pressure_drop_kpa: hydraulics.total_kpa,
        velocity_m_s: hydraulics.velocity_m_s,
        hydraulics,
        physically_valid,
        warnings,
    })
}
