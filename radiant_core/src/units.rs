//! # Unit Types
//!
//! Type-safe wrappers for the handful of unit conversions the circuit solver
//! performs. These are plain f64 newtypes that serialize as bare numbers.
//!
//! ## SI Units (Primary)
//!
//! Form inputs arrive in the units installers use on site:
//! - Pipe spacing: centimeters (cm)
//! - Screed thickness and pipe diameters: millimeters (mm)
//! - Water flow: kilograms per hour (kg/h)
//! - Pressure drop: kilopascals (kPa)
//!
//! The hydraulic and thermal equations work in base SI (m, kg/s, Pa).
//!
//! ## Example
//!
//! ```rust
//! use radiant_core::units::{Centimeters, KgPerHour, KgPerSecond, Meters};
//!
//! let spacing: Meters = Centimeters(15.0).into();
//! assert!((spacing.0 - 0.15).abs() < 1e-12);
//!
//! let flow: KgPerSecond = KgPerHour(360.0).into();
//! assert!((flow.0 - 0.1).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Length Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 / 100.0)
    }
}

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

// ============================================================================
// Mass Flow Units
// ============================================================================

/// Mass flow in kilograms per hour
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgPerHour(pub f64);

/// Mass flow in kilograms per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgPerSecond(pub f64);

impl From<KgPerHour> for KgPerSecond {
    fn from(flow: KgPerHour) -> Self {
        KgPerSecond(flow.0 / 3600.0)
    }
}

impl From<KgPerSecond> for KgPerHour {
    fn from(flow: KgPerSecond) -> Self {
        KgPerHour(flow.0 * 3600.0)
    }
}

// ============================================================================
// Pressure Units
// ============================================================================

/// Pressure in pascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pascals(pub f64);

/// Pressure in kilopascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilopascals(pub f64);

impl From<Pascals> for Kilopascals {
    fn from(pa: Pascals) -> Self {
        Kilopascals(pa.0 / 1000.0)
    }
}

impl From<Kilopascals> for Pascals {
    fn from(kpa: Kilopascals) -> Self {
        Pascals(kpa.0 * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversions() {
        let spacing: Meters = Centimeters(20.0).into();
        assert!((spacing.0 - 0.2).abs() < 1e-12);

        let bore: Meters = Millimeters(12.0).into();
        assert!((bore.0 - 0.012).abs() < 1e-12);

        let back: Millimeters = bore.into();
        assert!((back.0 - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_flow_conversions() {
        let flow: KgPerSecond = KgPerHour(180.0).into();
        assert!((flow.0 - 0.05).abs() < 1e-12);
        let back: KgPerHour = flow.into();
        assert!((back.0 - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_pressure_conversions() {
        let kpa: Kilopascals = Pascals(12_500.0).into();
        assert!((kpa.0 - 12.5).abs() < 1e-12);
        let pa: Pascals = kpa.into();
        assert!((pa.0 - 12_500.0).abs() < 1e-9);
    }

    #[test]
    fn test_transparent_serialization() {
        let json = serde_json::to_string(&Kilopascals(3.5)).unwrap();
        assert_eq!(json, "3.5");
    }
}
