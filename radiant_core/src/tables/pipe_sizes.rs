//! Heating Pipe Sizes
//!
//! Geometry of the PE-X / PE-RT / multilayer pipes used for radiant floor
//! circuits. Pipes are designated "outer x wall" in millimeters, e.g.
//! `16x2.0` is a 16 mm pipe with a 2.0 mm wall and a 12 mm bore.
//!
//! ## Resolution order
//!
//! 1. Catalog entry (matched on the parsed outer/wall dimensions, so `16x2`,
//!    `16×2,0` and `16 x 2.0` all resolve to `16x2.0`)
//! 2. Bore derived from the parsed designation (outer − 2·wall)
//! 3. [`DEFAULT_INNER_DIAMETER_MM`]

use serde::Serialize;

/// Bore used when a designation can be neither found nor parsed (mm)
pub const DEFAULT_INNER_DIAMETER_MM: f64 = 12.0;

/// Maximum loop length used for pipes outside the catalog (m)
pub const DEFAULT_MAX_LOOP_LENGTH_M: f64 = 100.0;

/// One row of the pipe geometry table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipeSpec {
    /// Catalog designation, e.g. "16x2.0"
    pub designation: &'static str,
    /// Outer diameter (mm)
    pub outer_mm: f64,
    /// Wall thickness (mm)
    pub wall_mm: f64,
    /// Inner diameter (mm)
    pub inner_mm: f64,
    /// Longest recommended single loop, manifold connections included (m)
    pub max_loop_length_m: f64,
    /// Water content per meter of pipe (L/m)
    pub volume_l_per_m: f64,
}

/// Catalog of standard radiant heating pipes (most common first)
pub const PIPE_SIZES: [PipeSpec; 5] = [
    PipeSpec {
        designation: "16x2.0",
        outer_mm: 16.0,
        wall_mm: 2.0,
        inner_mm: 12.0,
        max_loop_length_m: 120.0,
        volume_l_per_m: 0.1131,
    },
    PipeSpec {
        designation: "14x2.0",
        outer_mm: 14.0,
        wall_mm: 2.0,
        inner_mm: 10.0,
        max_loop_length_m: 80.0,
        volume_l_per_m: 0.0785,
    },
    PipeSpec {
        designation: "17x2.0",
        outer_mm: 17.0,
        wall_mm: 2.0,
        inner_mm: 13.0,
        max_loop_length_m: 120.0,
        volume_l_per_m: 0.1327,
    },
    PipeSpec {
        designation: "18x2.0",
        outer_mm: 18.0,
        wall_mm: 2.0,
        inner_mm: 14.0,
        max_loop_length_m: 120.0,
        volume_l_per_m: 0.1539,
    },
    PipeSpec {
        designation: "20x2.0",
        outer_mm: 20.0,
        wall_mm: 2.0,
        inner_mm: 16.0,
        max_loop_length_m: 150.0,
        volume_l_per_m: 0.2011,
    },
];

/// Parse an "outer x wall" designation into (outer_mm, wall_mm).
///
/// Accepts `x`, `X` or `×` as separator and a decimal comma.
pub fn parse_designation(designation: &str) -> Option<(f64, f64)> {
    let normalized = designation.trim().replace(',', ".").replace(['X', '×'], "x");
    let (outer, wall) = normalized.split_once('x')?;
    let outer: f64 = outer.trim().parse().ok()?;
    let wall: f64 = wall.trim().parse().ok()?;
    if outer > 0.0 && wall > 0.0 && outer > 2.0 * wall {
        Some((outer, wall))
    } else {
        None
    }
}

/// Find the catalog entry for a designation.
pub fn find(designation: &str) -> Option<&'static PipeSpec> {
    if let Some(spec) = PIPE_SIZES.iter().find(|p| p.designation == designation) {
        return Some(spec);
    }
    let (outer, wall) = parse_designation(designation)?;
    PIPE_SIZES
        .iter()
        .find(|p| (p.outer_mm - outer).abs() < 1e-9 && (p.wall_mm - wall).abs() < 1e-9)
}

/// Inner diameter in mm: catalog, then parsed designation, then 12 mm.
pub fn inner_diameter_mm(designation: &str) -> f64 {
    if let Some(spec) = find(designation) {
        return spec.inner_mm;
    }
    match parse_designation(designation) {
        Some((outer, wall)) => outer - 2.0 * wall,
        None => DEFAULT_INNER_DIAMETER_MM,
    }
}

/// Longest recommended loop for this pipe (m)
pub fn max_loop_length_m(designation: &str) -> f64 {
    find(designation)
        .map(|spec| spec.max_loop_length_m)
        .unwrap_or(DEFAULT_MAX_LOOP_LENGTH_M)
}

/// Water content per meter (L/m), computed from the bore outside the catalog
pub fn volume_l_per_m(designation: &str) -> f64 {
    if let Some(spec) = find(designation) {
        return spec.volume_l_per_m;
    }
    let inner_mm = inner_diameter_mm(designation);
    // mm² of bore area is mL per meter of pipe
    std::f64::consts::PI * inner_mm * inner_mm / 4.0 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(inner_diameter_mm("16x2.0"), 12.0);
        assert_eq!(inner_diameter_mm("20x2.0"), 16.0);
        assert_eq!(max_loop_length_m("14x2.0"), 80.0);
    }

    #[test]
    fn test_designation_variants_resolve_to_catalog() {
        assert_eq!(find("16x2").map(|p| p.designation), Some("16x2.0"));
        assert_eq!(find("16 × 2,0").map(|p| p.designation), Some("16x2.0"));
        assert_eq!(find("17X2").map(|p| p.designation), Some("17x2.0"));
    }

    #[test]
    fn test_parsed_fallback() {
        // Not in the catalog, bore derived from the designation
        assert!(find("25x2.3").is_none());
        assert!((inner_diameter_mm("25x2.3") - 20.4).abs() < 1e-9);
        assert_eq!(max_loop_length_m("25x2.3"), DEFAULT_MAX_LOOP_LENGTH_M);
    }

    #[test]
    fn test_default_bore() {
        assert_eq!(inner_diameter_mm("unknown"), DEFAULT_INNER_DIAMETER_MM);
        assert_eq!(inner_diameter_mm("4x2"), DEFAULT_INNER_DIAMETER_MM);
        assert_eq!(inner_diameter_mm(""), DEFAULT_INNER_DIAMETER_MM);
    }

    #[test]
    fn test_volume_matches_bore() {
        for spec in PIPE_SIZES.iter() {
            let computed = std::f64::consts::PI * spec.inner_mm.powi(2) / 4.0 / 1000.0;
            assert!((computed - spec.volume_l_per_m).abs() < 1e-3, "{}", spec.designation);
            assert!((spec.outer_mm - 2.0 * spec.wall_mm - spec.inner_mm).abs() < 1e-9);
        }
        assert!((volume_l_per_m("25x2.3") - 0.3269).abs() < 1e-3);
    }
}
