//! # Pipe Hydraulics Formulas
//!
//! Water properties and pipe-flow relations for heating water in PE-X pipe.
//!
//! ## Notation
//!
//! - `ρ` = Water density (kg/m³)
//! - `μ` = Dynamic viscosity (Pa·s)
//! - `v` = Mean flow velocity (m/s)
//! - `D` = Pipe inner diameter (m)
//! - `ε` = Absolute wall roughness (m)
//! - `Re` = Reynolds number ρvD/μ
//! - `f` = Darcy friction factor
//!
//! ## Validity
//!
//! The water property fits are linear approximations over the domestic
//! heating range (roughly 10-60 °C).
//!
//! ## References
//!
//! - Colebrook, C.F. (1939), "Turbulent flow in pipes"
//! - VDI Heat Atlas, Part D (water properties)

use serde::{Deserialize, Serialize};

/// Starting guess for the Colebrook-White iteration
pub const FRICTION_INITIAL_GUESS: f64 = 0.02;

/// Iteration cap for the Colebrook-White solver
pub const FRICTION_MAX_ITERATIONS: usize = 20;

/// Convergence threshold on successive friction factors
pub const FRICTION_TOLERANCE: f64 = 1e-6;

/// Upper limit of laminar flow
pub const LAMINAR_LIMIT_RE: f64 = 2300.0;

/// Lower limit of fully turbulent flow
pub const TURBULENT_LIMIT_RE: f64 = 4000.0;

/// Viscosity floor, reached only well above the heating range (Pa·s)
const MIN_VISCOSITY_PA_S: f64 = 1e-4;

// =============================================================================
// WATER PROPERTIES
// =============================================================================

/// Water density at temperature T
///
/// # Formula
/// - ρ = 1000.1 − 0.0864·T   (kg/m³, T in °C)
#[inline]
pub fn water_density(temp_c: f64) -> f64 {
    1000.1 - 0.0864 * temp_c
}

/// Water dynamic viscosity at temperature T
///
/// # Formula
/// - μ = (1.777 − 0.0264·T) × 10⁻³   (Pa·s, T in °C)
#[inline]
pub fn water_viscosity(temp_c: f64) -> f64 {
    ((1.777 - 0.0264 * temp_c) * 1e-3).max(MIN_VISCOSITY_PA_S)
}

// =============================================================================
// FLOW RELATIONS
// =============================================================================

/// Pipe cross-section area A = πD²/4
#[inline]
pub fn flow_area(diameter_m: f64) -> f64 {
    std::f64::consts::PI * diameter_m * diameter_m / 4.0
}

/// Mean velocity for a mass flow through a round pipe
///
/// # Formula
/// - v = ṁ / (ρ·A)
#[inline]
pub fn velocity(mass_flow_kg_s: f64, density: f64, diameter_m: f64) -> f64 {
    mass_flow_kg_s / (density * flow_area(diameter_m))
}

/// Reynolds number Re = ρvD/μ
#[inline]
pub fn reynolds_number(density: f64, velocity_m_s: f64, diameter_m: f64, viscosity_pa_s: f64) -> f64 {
    density * velocity_m_s * diameter_m / viscosity_pa_s
}

/// Dynamic pressure ρv²/2 (Pa)
#[inline]
pub fn dynamic_pressure(density: f64, velocity_m_s: f64) -> f64 {
    density * velocity_m_s * velocity_m_s / 2.0
}

// =============================================================================
// FRICTION FACTOR
// =============================================================================

/// Darcy friction factor from the implicit Colebrook-White equation
///
/// ```text
/// 1/√f = −2·log10( (ε/D)/3.7 + 2.51/(Re·√f) )
/// ```
///
/// Solved by fixed-point iteration from f₀ = 0.02, at most 20 steps,
/// stopping once successive values differ by less than 1e-6.
///
/// # Arguments
/// * `reynolds` - Reynolds number; zero flow must be handled by the caller
/// * `relative_roughness` - ε/D
///
/// # Returns
/// The friction factor, or 0.0 for `reynolds <= 0`. If a step leaves the
/// domain of the equation (log of a non-positive value, division by zero,
/// a non-positive 1/√f) the last valid value is returned.
pub fn colebrook_friction_factor(reynolds: f64, relative_roughness: f64) -> f64 {
    if !(reynolds > 0.0) {
        return 0.0;
    }

    let mut f = FRICTION_INITIAL_GUESS;
    for _ in 0..FRICTION_MAX_ITERATIONS {
        let sqrt_f = f.sqrt();
        let denominator = reynolds * sqrt_f;
        if denominator == 0.0 {
            break;
        }
        let argument = relative_roughness / 3.7 + 2.51 / denominator;
        if !(argument > 0.0) || !argument.is_finite() {
            break;
        }
        let inv_sqrt_f = -2.0 * argument.log10();
        if !(inv_sqrt_f > 0.0) || !inv_sqrt_f.is_finite() {
            break;
        }

        let next = 1.0 / (inv_sqrt_f * inv_sqrt_f);
        let converged = (next - f).abs() < FRICTION_TOLERANCE;
        f = next;
        if converged {
            break;
        }
    }
    f
}

/// Flow regime by Reynolds number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowRegime {
    /// Re < 2300
    Laminar,
    /// 2300 ≤ Re < 4000
    Transitional,
    /// Re ≥ 4000
    Turbulent,
}

impl FlowRegime {
    pub fn from_reynolds(reynolds: f64) -> Self {
        if reynolds < LAMINAR_LIMIT_RE {
            FlowRegime::Laminar
        } else if reynolds < TURBULENT_LIMIT_RE {
            FlowRegime::Transitional
        } else {
            FlowRegime::Turbulent
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FlowRegime::Laminar => "laminar",
            FlowRegime::Transitional => "transitional",
            FlowRegime::Turbulent => "turbulent",
        }
    }
}
