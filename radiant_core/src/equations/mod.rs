//! # Thermal and Hydraulic Equations
//!
//! The physical relations used by the circuit calculations, kept as small
//! pure functions so each can be checked against its reference on its own.
//!
//! ## Modules
//!
//! - [`heat_transfer`] - LMTD, heat flux, floor surface temperature, energy balance
//! - [`hydraulics`] - Water properties, velocity, Reynolds number, Colebrook-White
//!
//! ## Conventions
//!
//! - Temperatures in °C, temperature differences in K
//! - Heat in W, heat flux in W/m²
//! - Hydraulic quantities in base SI (m, kg/s, Pa)

pub mod heat_transfer;
pub mod hydraulics;

pub use heat_transfer::{
    design_mass_flow_kg_h,
    floor_surface_temperature,
    heat_flux,
    log_mean_temperature_difference,
    temperature_drop,
    FLOOR_SURFACE_HTC,
    SPECIFIC_HEAT_WATER,
};

pub use hydraulics::{
    colebrook_friction_factor,
    dynamic_pressure,
    reynolds_number,
    velocity,
    water_density,
    water_viscosity,
    FlowRegime,
};
