//! # Heat-Output Coefficient Table
//!
//! Empirical KH coefficients (W/m²K) for wet-screed radiant floors. The heat
//! flux of a floor is `q = KH · LMTD`, where KH captures the whole
//! construction: pipe size, floor-covering resistance R_λ, pipe spacing and
//! screed thickness above the pipe.
//!
//! ## Matching
//!
//! A verbatim key returns the tabulated value. Any other key is resolved one
//! component at a time, each step narrowing the candidate rows:
//!
//! 1. diameter: exact designation, else the first diameter in the table
//! 2. R_λ: nearest tabulated value
//! 3. spacing: nearest tabulated value
//! 4. screed thickness: nearest tabulated value
//!
//! The order matters: resolving spacing before R_λ can select a different
//! row. Ties go to the row listed first (the smaller value).
//!
//! ## Example
//!
//! ```rust
//! use radiant_core::tables::kh_coefficients::CoefficientTable;
//!
//! let table = CoefficientTable::standard();
//! assert_eq!(table.lookup("16x2.0", 0.10, 15.0, 45.0), 4.14);
//!
//! // Off-grid keys snap to the nearest row
//! assert_eq!(table.lookup("16x2.0", 0.09, 16.0, 50.0), 4.14);
//! ```

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::tables::pipe_sizes;

/// Tabulated floor-covering resistances R_λ (m²K/W)
const R_LAMBDA_GRID: [f64; 4] = [0.00, 0.05, 0.10, 0.15];

/// Tabulated pipe spacings (cm)
const SPACING_GRID_CM: [f64; 5] = [10.0, 15.0, 20.0, 25.0, 30.0];

/// Tabulated screed thicknesses above the pipe (mm)
const THICKNESS_GRID_MM: [f64; 3] = [30.0, 45.0, 65.0];

/// KH values indexed `[r_lambda][spacing][thickness]`
type KhGrid = [[[f64; 3]; 5]; 4];

const KH_16X2: KhGrid = [
    [[7.49, 7.20, 6.77], [6.86, 6.60, 6.20], [6.24, 6.00, 5.64], [5.62, 5.40, 5.08], [5.10, 4.90, 4.61]],
    [[5.66, 5.44, 5.11], [5.29, 5.09, 4.78], [4.91, 4.72, 4.44], [4.52, 4.34, 4.08], [4.18, 4.01, 3.77]],
    [[4.54, 4.37, 4.11], [4.31, 4.14, 3.89], [4.05, 3.90, 3.66], [3.78, 3.63, 3.42], [3.54, 3.40, 3.20]],
    [[3.80, 3.65, 3.43], [3.63, 3.49, 3.28], [3.45, 3.31, 3.12], [3.25, 3.12, 2.94], [3.07, 2.95, 2.77]],
];

const KH_14X2: KhGrid = [
    [[7.34, 7.06, 6.63], [6.73, 6.47, 6.08], [6.12, 5.88, 5.53], [5.50, 5.29, 4.97], [4.99, 4.80, 4.51]],
    [[5.54, 5.33, 5.01], [5.19, 4.99, 4.69], [4.82, 4.63, 4.35], [4.43, 4.26, 4.00], [4.09, 3.93, 3.70]],
    [[4.45, 4.28, 4.02], [4.22, 4.06, 3.81], [3.97, 3.82, 3.59], [3.70, 3.56, 3.35], [3.47, 3.33, 3.13]],
    [[3.72, 3.58, 3.36], [3.56, 3.42, 3.22], [3.38, 3.25, 3.05], [3.18, 3.06, 2.88], [3.01, 2.89, 2.72]],
];

const KH_17X2: KhGrid = [
    [[7.56, 7.27, 6.84], [6.93, 6.67, 6.27], [6.30, 6.06, 5.70], [5.67, 5.45, 5.13], [5.15, 4.95, 4.65]],
    [[5.71, 5.49, 5.16], [5.35, 5.14, 4.83], [4.96, 4.77, 4.49], [4.56, 4.39, 4.12], [4.22, 4.05, 3.81]],
    [[4.59, 4.41, 4.15], [4.35, 4.18, 3.93], [4.09, 3.94, 3.70], [3.82, 3.67, 3.45], [3.57, 3.43, 3.23]],
    [[3.84, 3.69, 3.47], [3.67, 3.53, 3.31], [3.48, 3.35, 3.15], [3.28, 3.15, 2.97], [3.10, 2.98, 2.80]],
];

const KH_20X2: KhGrid = [
    [[7.71, 7.42, 6.97], [7.07, 6.80, 6.39], [6.43, 6.18, 5.81], [5.78, 5.56, 5.23], [5.25, 5.05, 4.74]],
    [[5.83, 5.60, 5.27], [5.45, 5.24, 4.93], [5.06, 4.87, 4.57], [4.65, 4.47, 4.21], [4.30, 4.14, 3.89]],
    [[4.68, 4.50, 4.23], [4.44, 4.26, 4.01], [4.17, 4.01, 3.77], [3.89, 3.74, 3.52], [3.64, 3.50, 3.29]],
    [[3.91, 3.76, 3.54], [3.74, 3.59, 3.38], [3.55, 3.41, 3.21], [3.35, 3.22, 3.02], [3.16, 3.04, 2.86]],
];

/// Diameters in definition order; the first one is the fallback.
const DIAMETER_GRIDS: [(&str, &KhGrid); 4] = [
    ("16x2.0", &KH_16X2),
    ("14x2.0", &KH_14X2),
    ("17x2.0", &KH_17X2),
    ("20x2.0", &KH_20X2),
];

static STANDARD_TABLE: Lazy<CoefficientTable> = Lazy::new(|| {
    let mut entries = Vec::with_capacity(DIAMETER_GRIDS.len() * 60);
    for (diameter, grid) in DIAMETER_GRIDS {
        for (ri, r_lambda) in R_LAMBDA_GRID.iter().enumerate() {
            for (si, spacing_cm) in SPACING_GRID_CM.iter().enumerate() {
                for (ti, thickness_mm) in THICKNESS_GRID_MM.iter().enumerate() {
                    entries.push(KhEntry {
                        diameter: diameter.to_string(),
                        r_lambda: *r_lambda,
                        spacing_cm: *spacing_cm,
                        thickness_mm: *thickness_mm,
                        kh: grid[ri][si][ti],
                    });
                }
            }
        }
    }
    CoefficientTable { entries }
});

/// Exact key comparison tolerance
const KEY_EPSILON: f64 = 1e-9;

/// One tabulated construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KhEntry {
    pub diameter: String,
    pub r_lambda: f64,
    pub spacing_cm: f64,
    pub thickness_mm: f64,
    /// Heat-output coefficient (W/m²K)
    pub kh: f64,
}

/// The row a lookup resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KhMatch {
    pub kh: f64,
    pub diameter: String,
    pub r_lambda: f64,
    pub spacing_cm: f64,
    pub thickness_mm: f64,
    /// True when the requested key was found verbatim
    pub exact: bool,
}

/// KH lookup table with nearest-match fallback.
///
/// Always holds at least one row, so every lookup yields a positive
/// coefficient.
#[derive(Debug, Clone)]
pub struct CoefficientTable {
    entries: Vec<KhEntry>,
}

impl CoefficientTable {
    /// The built-in wet-screed table.
    pub fn standard() -> &'static CoefficientTable {
        &STANDARD_TABLE
    }

    /// Build a table from custom rows. Returns `None` for an empty set or
    /// for any non-positive coefficient.
    #[cfg(test)]
    fn from_entries(entries: Vec<KhEntry>) -> Option<Self> {
        if entries.is_empty() || entries.iter().any(|e| !(e.kh > 0.0)) {
            return None;
        }
        Some(CoefficientTable { entries })
    }

    pub fn entries(&self) -> &[KhEntry] {
        &self.entries
    }

    /// KH (W/m²K) for a construction. Never fails.
    pub fn lookup(&self, diameter: &str, r_lambda: f64, spacing_cm: f64, thickness_mm: f64) -> f64 {
        self.resolve(diameter, r_lambda, spacing_cm, thickness_mm).kh
    }

    /// Resolve a construction to a table row, reporting which row was used.
    pub fn resolve(&self, diameter: &str, r_lambda: f64, spacing_cm: f64, thickness_mm: f64) -> KhMatch {
        let diameter = pipe_sizes::find(diameter)
            .map(|spec| spec.designation)
            .unwrap_or(diameter);

        if let Some(entry) = self.entries.iter().find(|e| {
            e.diameter == diameter
                && (e.r_lambda - r_lambda).abs() < KEY_EPSILON
                && (e.spacing_cm - spacing_cm).abs() < KEY_EPSILON
                && (e.thickness_mm - thickness_mm).abs() < KEY_EPSILON
        }) {
            return KhMatch::from_entry(entry, true);
        }

        let mut candidates: Vec<&KhEntry> = self.entries.iter().collect();

        // 1. Diameter, falling back to the first defined one
        let chosen_diameter = if candidates.iter().any(|e| e.diameter == diameter) {
            diameter.to_string()
        } else {
            candidates[0].diameter.clone()
        };
        candidates.retain(|e| e.diameter == chosen_diameter);

        // 2-4. Nearest covering resistance, then spacing, then thickness
        candidates = narrow_nearest(candidates, r_lambda, |e| e.r_lambda);
        candidates = narrow_nearest(candidates, spacing_cm, |e| e.spacing_cm);
        candidates = narrow_nearest(candidates, thickness_mm, |e| e.thickness_mm);

        KhMatch::from_entry(candidates[0], false)
    }
}

impl KhMatch {
    fn from_entry(entry: &KhEntry, exact: bool) -> Self {
        KhMatch {
            kh: entry.kh,
            diameter: entry.diameter.clone(),
            r_lambda: entry.r_lambda,
            spacing_cm: entry.spacing_cm,
            thickness_mm: entry.thickness_mm,
            exact,
        }
    }
}

/// Keep only the rows whose component is nearest to `target`.
///
/// `candidates` must be non-empty; the result is then non-empty too. A
/// non-finite target keeps the first row's value.
fn narrow_nearest<'a>(
    candidates: Vec<&'a KhEntry>,
    target: f64,
    component: impl Fn(&KhEntry) -> f64,
) -> Vec<&'a KhEntry> {
    let mut best = component(candidates[0]);
    let mut best_distance = (best - target).abs();
    for entry in candidates.iter().skip(1) {
        let value = component(entry);
        let distance = (value - target).abs();
        if distance < best_distance {
            best = value;
            best_distance = distance;
        }
    }
    candidates
        .into_iter()
        .filter(|e| (component(e) - best).abs() < KEY_EPSILON)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(diameter: &str, r_lambda: f64, spacing_cm: f64, thickness_mm: f64, kh: f64) -> KhEntry {
        KhEntry {
            diameter: diameter.to_string(),
            r_lambda,
            spacing_cm,
            thickness_mm,
            kh,
        }
    }

    #[test]
    fn test_standard_table_size() {
        assert_eq!(CoefficientTable::standard().entries().len(), 240);
        assert!(CoefficientTable::standard().entries().iter().all(|e| e.kh > 0.0));
    }

    #[test]
    fn test_exact_lookup_for_every_row() {
        let table = CoefficientTable::standard();
        for e in table.entries() {
            let m = table.resolve(&e.diameter, e.r_lambda, e.spacing_cm, e.thickness_mm);
            assert!(m.exact);
            assert_eq!(m.kh, e.kh);
        }
    }

    #[test]
    fn test_known_values() {
        let table = CoefficientTable::standard();
        assert_eq!(table.lookup("16x2.0", 0.0, 10.0, 30.0), 7.49);
        assert_eq!(table.lookup("20x2.0", 0.15, 30.0, 65.0), 2.86);
        assert_eq!(table.lookup("14x2.0", 0.05, 15.0, 45.0), 4.99);
    }

    #[test]
    fn test_designation_variant_is_exact() {
        let m = CoefficientTable::standard().resolve("16x2", 0.05, 15.0, 45.0);
        assert!(m.exact);
        assert_eq!(m.kh, 5.09);
    }

    #[test]
    fn test_unknown_diameter_falls_back_to_first() {
        let table = CoefficientTable::standard();
        let m = table.resolve("18x2.0", 0.05, 15.0, 45.0);
        assert!(!m.exact);
        assert_eq!(m.diameter, "16x2.0");
        assert_eq!(m.kh, table.lookup("16x2.0", 0.05, 15.0, 45.0));

        assert_eq!(table.lookup("garbage", 0.0, 10.0, 30.0), 7.49);
    }

    #[test]
    fn test_nearest_components() {
        let table = CoefficientTable::standard();
        let m = table.resolve("17x2.0", 0.12, 22.0, 58.0);
        assert_eq!(m.r_lambda, 0.10);
        assert_eq!(m.spacing_cm, 20.0);
        assert_eq!(m.thickness_mm, 65.0);
        assert_eq!(m.kh, 3.70);

        // Out-of-range values clamp to the grid edges
        let m = table.resolve("16x2.0", 0.5, 50.0, 5.0);
        assert_eq!((m.r_lambda, m.spacing_cm, m.thickness_mm), (0.15, 30.0, 30.0));
    }

    #[test]
    fn test_tie_prefers_first_row() {
        let table = CoefficientTable::standard();
        // 12.5 cm is equidistant from 10 and 15
        let m = table.resolve("16x2.0", 0.0, 12.5, 45.0);
        assert_eq!(m.spacing_cm, 10.0);
    }

    #[test]
    fn test_priority_order_covering_before_spacing() {
        // Resolving spacing first would pick the (0.10, 10) row
        let table = CoefficientTable::from_entries(vec![
            entry("16x2.0", 0.00, 20.0, 45.0, 1.0),
            entry("16x2.0", 0.10, 10.0, 45.0, 2.0),
        ])
        .unwrap();
        assert_eq!(table.lookup("16x2.0", 0.01, 10.0, 45.0), 1.0);
    }

    #[test]
    fn test_non_finite_inputs_still_resolve() {
        let table = CoefficientTable::standard();
        let kh = table.lookup("16x2.0", f64::NAN, f64::INFINITY, -1.0);
        assert!(kh > 0.0);
    }

    #[test]
    fn test_from_entries_rejects_empty_and_non_positive() {
        assert!(CoefficientTable::from_entries(vec![]).is_none());
        assert!(CoefficientTable::from_entries(vec![entry("16x2.0", 0.0, 10.0, 45.0, 0.0)]).is_none());
    }
}
