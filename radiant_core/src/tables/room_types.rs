//! Room Types
//!
//! Comfort limits for floor surface temperature by room use, after
//! EN 1264-2: 29 °C in occupied zones, 33 °C in bathrooms and 35 °C in
//! perimeter zones along external walls.

use serde::{Deserialize, Serialize};

/// How a heated room is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RoomType {
    /// Living room, dining room, study
    #[default]
    Living,
    Bedroom,
    Kitchen,
    Bathroom,
    /// Hallways, stairs, storage
    Circulation,
    /// Strip along external glazing, up to 1 m wide
    PerimeterZone,
}

impl RoomType {
    /// All room types for UI selection
    pub const ALL: [RoomType; 6] = [
        RoomType::Living,
        RoomType::Bedroom,
        RoomType::Kitchen,
        RoomType::Bathroom,
        RoomType::Circulation,
        RoomType::PerimeterZone,
    ];

    /// Highest comfortable floor surface temperature (°C)
    pub fn max_floor_temperature_c(&self) -> f64 {
        match self {
            RoomType::Living | RoomType::Bedroom | RoomType::Kitchen | RoomType::Circulation => 29.0,
            RoomType::Bathroom => 33.0,
            RoomType::PerimeterZone => 35.0,
        }
    }

    /// Typical design room temperature (°C), used to pre-fill new circuits
    pub fn design_temperature_c(&self) -> f64 {
        match self {
            RoomType::Living | RoomType::Kitchen | RoomType::PerimeterZone => 20.0,
            RoomType::Bedroom => 18.0,
            RoomType::Bathroom => 24.0,
            RoomType::Circulation => 15.0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RoomType::Living => "Living",
            RoomType::Bedroom => "Bedroom",
            RoomType::Kitchen => "Kitchen",
            RoomType::Bathroom => "Bathroom",
            RoomType::Circulation => "Circulation",
            RoomType::PerimeterZone => "Perimeter zone",
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comfort_limits() {
        assert_eq!(RoomType::Living.max_floor_temperature_c(), 29.0);
        assert_eq!(RoomType::Bathroom.max_floor_temperature_c(), 33.0);
        assert_eq!(RoomType::PerimeterZone.max_floor_temperature_c(), 35.0);
    }

    #[test]
    fn test_limits_above_design_temperature() {
        for room in RoomType::ALL {
            assert!(room.max_floor_temperature_c() > room.design_temperature_c());
        }
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&RoomType::PerimeterZone).unwrap();
        assert_eq!(json, "\"PerimeterZone\"");
        let roundtrip: RoomType = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, RoomType::PerimeterZone);
    }
}
