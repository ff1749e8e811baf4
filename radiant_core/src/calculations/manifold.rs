//! # Manifold Summary
//!
//! Evaluates every circuit on one manifold and reports the figures needed to
//! size the pump and preset the valves.
//!
//! Each circuit is computed on its own: a circuit with missing geometry is
//! reported as declined and does not stop the others. The index circuit is
//! the loop with the largest pressure drop; every other loop has to be
//! throttled by the difference (its balancing excess) to get its design flow.

use serde::{Deserialize, Serialize};

use crate::calculations::circuit::{Circuit, SystemParameters};
use crate::calculations::nominal_loop::{self, NominalResult};
use crate::calculations::SolverSettings;
use crate::errors::CalcError;

/// All circuits fed from one manifold.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Ground floor",
///   "system": {
///     "screed_thickness_mm": 45.0,
///     "supply_temp_c": 35.0,
///     "design_delta_t_k": 5.0,
///     "pipe": "16x2.0"
///   },
///   "circuits": [
///     { "label": "Living", "area_m2": 15.0, "spacing_cm": 15.0, "r_lambda": 0.05,
///       "manifold_distance_m": 3.0, "room_temp_c": 20.0 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifoldInput {
    /// User label (e.g., "Ground floor")
    #[serde(default)]
    pub label: String,

    pub system: SystemParameters,

    pub circuits: Vec<Circuit>,
}

/// One circuit's line in the manifold summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitSummary {
    pub label: String,

    /// Nominal result, or the reason the circuit was declined
    pub result: Result<NominalResult, CalcError>,

    /// Pressure to be throttled at this circuit's valve (kPa); `None` if declined
    pub balancing_excess_kpa: Option<f64>,
}

impl CircuitSummary {
    pub fn nominal(&self) -> Option<&NominalResult> {
        self.result.as_ref().ok()
    }
}

/// Manifold totals and per-circuit results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifoldResult {
    /// One entry per input circuit, in input order
    pub circuits: Vec<CircuitSummary>,

    /// Sum of the calculated circuits' heat loads (W)
    pub total_heat_load_w: f64,

    /// Manifold flow (kg/h)
    pub total_mass_flow_kg_h: f64,

    /// Water content of all loops (L)
    pub total_water_volume_l: f64,

    /// Number of loop connections needed on the manifold
    pub total_loops: u32,

    /// Position of the index circuit (largest loop pressure drop)
    pub index_circuit: Option<usize>,

    /// Pressure drop of the index loop, the pump head needed at the manifold (kPa)
    pub index_pressure_drop_kpa: f64,

    /// Circuits that could not be calculated
    pub declined_count: usize,
}

/// Evaluate a manifold with default solver settings.
pub fn calculate(input: &ManifoldInput) -> ManifoldResult {
    calculate_with(input, &SolverSettings::default())
}

/// Evaluate a manifold.
pub fn calculate_with(input: &ManifoldInput, settings: &SolverSettings) -> ManifoldResult {
    let results: Vec<Result<NominalResult, CalcError>> = input
        .circuits
        .iter()
        .map(|circuit| nominal_loop::calculate_with(circuit, &input.system, settings))
        .collect();

    summarize(&input.circuits, results)
}

/// Build the summary from circuit results computed elsewhere, e.g. one
/// thread per circuit.
///
/// `results` must be in the same order as `circuits`.
pub fn summarize(circuits: &[Circuit], results: Vec<Result<NominalResult, CalcError>>) -> ManifoldResult {
    let mut index_circuit: Option<usize> = None;
    let mut index_pressure_drop_kpa = 0.0;
    for (i, result) in results.iter().enumerate() {
        if let Ok(nominal) = result {
            if index_circuit.is_none() || nominal.pressure_drop_kpa > index_pressure_drop_kpa {
                index_circuit = Some(i);
                index_pressure_drop_kpa = nominal.pressure_drop_kpa;
            }
        }
    }

    let mut total_heat_load_w = 0.0;
    let mut total_mass_flow_kg_h = 0.0;
    let mut total_water_volume_l = 0.0;
    let mut total_loops = 0;
    let mut declined_count = 0;

    let summaries: Vec<CircuitSummary> = circuits
        .iter()
        .zip(results)
        .map(|(circuit, result)| {
            let balancing_excess_kpa = match &result {
                Ok(nominal) => {
                    total_heat_load_w += nominal.heat_load_w;
                    total_mass_flow_kg_h += nominal.mass_flow_kg_h;
                    total_water_volume_l += nominal.water_volume_l;
                    total_loops += nominal.loop_count;
                    Some(index_pressure_drop_kpa - nominal.pressure_drop_kpa)
                }
                Err(_) => {
                    declined_count += 1;
                    None
                }
            };
            CircuitSummary {
                label: circuit.label.clone(),
                result,
                balancing_excess_kpa,
            }
        })
        .collect();

    ManifoldResult {
        circuits: summaries,
        total_heat_load_w,
        total_mass_flow_kg_h,
        total_water_volume_l,
        total_loops,
        index_circuit,
        index_pressure_drop_kpa,
        declined_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::RoomType;

    fn circuit(label: &str, area_m2: f64, manifold_distance_m: f64) -> Circuit {
        Circuit {
            label: label.to_string(),
            area_m2,
            spacing_cm: 15.0,
            r_lambda: 0.05,
            manifold_distance_m,
            room_temp_c: 20.0,
            room_type: RoomType::Living,
        }
    }

    fn ground_floor() -> ManifoldInput {
        ManifoldInput {
            label: "Ground floor".to_string(),
            system: SystemParameters::default(),
            circuits: vec![
                circuit("Living", 15.0, 3.0),
                circuit("Kitchen", 9.0, 6.0),
                circuit("Study", 12.0, 8.0),
            ],
        }
    }

    #[test]
    fn test_totals_are_sums() {
        let input = ground_floor();
        let result = calculate(&input);
        assert_eq!(result.circuits.len(), 3);
        assert_eq!(result.declined_count, 0);

        let mut heat = 0.0;
        let mut flow = 0.0;
        for c in &input.circuits {
            let nominal = nominal_loop::calculate(c, &input.system).unwrap();
            heat += nominal.heat_load_w;
            flow += nominal.mass_flow_kg_h;
        }
        assert!((result.total_heat_load_w - heat).abs() < 1e-9);
        assert!((result.total_mass_flow_kg_h - flow).abs() < 1e-9);
        assert_eq!(result.total_loops, 3);
    }

    #[test]
    fn test_index_circuit_and_balancing() {
        let result = calculate(&ground_floor());
        let index = result.index_circuit.unwrap();
        // Living has the most pipe and the most flow
        assert_eq!(index, 0);
        assert_eq!(result.circuits[index].balancing_excess_kpa, Some(0.0));
        for summary in &result.circuits {
            let excess = summary.balancing_excess_kpa.unwrap();
            assert!(excess >= 0.0);
            let own = summary.nominal().unwrap().pressure_drop_kpa;
            assert!((own + excess - result.index_pressure_drop_kpa).abs() < 1e-9);
        }
    }

    #[test]
    fn test_declined_circuit_does_not_stop_others() {
        let mut input = ground_floor();
        input.circuits.push(circuit("Store", 0.0, 2.0));
        let result = calculate(&input);
        assert_eq!(result.declined_count, 1);
        let declined = &result.circuits[3];
        assert!(declined.nominal().is_none());
        assert!(declined.balancing_excess_kpa.is_none());
        assert!(matches!(declined.result, Err(CalcError::MissingGeometry { .. })));
        assert!(result.total_heat_load_w > 0.0);
    }

    #[test]
    fn test_empty_manifold() {
        let input = ManifoldInput {
            label: String::new(),
            system: SystemParameters::default(),
            circuits: vec![],
        };
        let result = calculate(&input);
        assert!(result.index_circuit.is_none());
        assert_eq!(result.total_heat_load_w, 0.0);
    }

    #[test]
    fn test_order_independent() {
        let input = ground_floor();
        let mut reversed = input.clone();
        reversed.circuits.reverse();
        let a = calculate(&input);
        let b = calculate(&reversed);
        assert!((a.total_heat_load_w - b.total_heat_load_w).abs() < 1e-9);
        assert_eq!(a.index_pressure_drop_kpa, b.index_pressure_drop_kpa);
        assert_eq!(a.circuits[0].nominal(), b.circuits[2].nominal());
    }

    #[test]
    fn test_parallel_evaluation_matches_sequential() {
        let input = ground_floor();
        let sequential = calculate(&input);

        let system = &input.system;
        let parallel: Vec<Result<NominalResult, CalcError>> = std::thread::scope(|scope| {
            let handles: Vec<_> = input
                .circuits
                .iter()
                .map(|c| scope.spawn(move || nominal_loop::calculate(c, system)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        let from_threads = summarize(&input.circuits, parallel);

        for (a, b) in sequential.circuits.iter().zip(&from_threads.circuits) {
            assert_eq!(a.nominal(), b.nominal());
        }
    }

    #[test]
    fn test_serialization() {
        let mut input = ground_floor();
        input.circuits.push(circuit("Store", 0.0, 2.0));
        let result = calculate(&input);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"Ok\""));
        assert!(json.contains("\"Err\""));
        let roundtrip: ManifoldResult = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.declined_count, 1);
    }
}
