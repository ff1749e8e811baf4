//! # Radiant Floor Heat Transfer Formulas
//!
//! Heat output of a water-heated floor and the energy balance of the water
//! flowing through it.
//!
//! ## Notation
//!
//! - `θ_V` = Supply water temperature (°C)
//! - `θ_R` = Return water temperature (°C)
//! - `θ_i` = Room design temperature (°C)
//! - `Δθ_H` = Logarithmic mean temperature difference (K)
//! - `K_H` = Heat-output coefficient of the floor construction (W/m²K)
//! - `q` = Heat flux density (W/m²)
//! - `c_p` = Specific heat of water (J/kgK)
//!
//! ## References
//!
//! - EN 1264-2: Water based surface embedded heating and cooling systems

/// Specific heat of heating water (J/kgK)
pub const SPECIFIC_HEAT_WATER: f64 = 4190.0;

/// Total heat-transfer coefficient floor surface → room (W/m²K)
pub const FLOOR_SURFACE_HTC: f64 = 10.8;

/// Temperature differences closer than this are treated as equal (K)
pub const LMTD_EQUAL_DIFFERENCE_EPSILON: f64 = 1e-6;

/// Logarithmic mean temperature difference between water and room
///
/// # Formula (EN 1264-2)
/// ```text
/// Δθ_H = (θ_V − θ_R) / ln( (θ_V − θ_i) / (θ_R − θ_i) )
/// ```
///
/// When the two end differences are indistinguishable, or the logarithm is
/// undefined (a difference at or below zero), the arithmetic mean
/// `((θ_V − θ_i) + (θ_R − θ_i)) / 2` is returned instead.
pub fn log_mean_temperature_difference(supply_c: f64, return_c: f64, room_c: f64) -> f64 {
    let inlet_difference = supply_c - room_c;
    let outlet_difference = return_c - room_c;
    let arithmetic_mean = (inlet_difference + outlet_difference) / 2.0;

    if (inlet_difference - outlet_difference).abs() < LMTD_EQUAL_DIFFERENCE_EPSILON {
        return arithmetic_mean;
    }

    let ratio = inlet_difference / outlet_difference;
    if !(ratio > 0.0) || !ratio.is_finite() {
        return arithmetic_mean;
    }
    let log_ratio = ratio.ln();
    if log_ratio == 0.0 || !log_ratio.is_finite() {
        return arithmetic_mean;
    }

    (inlet_difference - outlet_difference) / log_ratio
}

/// Heat flux density q = K_H · Δθ_H (W/m²)
#[inline]
pub fn heat_flux(kh: f64, lmtd: f64) -> f64 {
    kh * lmtd
}

/// Mean floor surface temperature θ_F = θ_i + q / 10.8
#[inline]
pub fn floor_surface_temperature(room_c: f64, heat_flux_w_m2: f64) -> f64 {
    room_c + heat_flux_w_m2 / FLOOR_SURFACE_HTC
}

/// Water mass flow needed to carry a heat load at a given temperature drop
///
/// # Formula
/// - ṁ = Q·3600 / (c_p·Δθ)   (kg/h)
///
/// Returns 0.0 when the temperature drop is not positive.
#[inline]
pub fn design_mass_flow_kg_h(heat_load_w: f64, delta_t_k: f64) -> f64 {
    if delta_t_k <= 0.0 {
        return 0.0;
    }
    heat_load_w * 3600.0 / (SPECIFIC_HEAT_WATER * delta_t_k)
}

/// Water temperature drop for a heat load at a given mass flow
///
/// # Formula
/// - Δθ = Q / (ṁ·c_p)   (K, ṁ in kg/s)
#[inline]
pub fn temperature_drop(heat_load_w: f64, mass_flow_kg_s: f64) -> f64 {
    heat_load_w / (mass_flow_kg_s * SPECIFIC_HEAT_WATER)
}
