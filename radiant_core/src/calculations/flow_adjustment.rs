//! # Flow Adjustment
//!
//! Re-derives a circuit's operating point when its water flow is forced away
//! from the design value (valve presetting, pump speed, an undersized
//! manifold). Heat output depends on the LMTD, the LMTD on the return
//! temperature, and the return temperature on the heat output through the
//! energy balance, so the three are solved together by a damped fixed-point
//! iteration.
//!
//! ## Algorithm
//!
//! ```text
//! ṁ'   = ṁ_nominal · (1 + pct/100)
//! Δθ₀  = Q_nominal / (ṁ'·c_p)          θ_R₀ = θ_V − Δθ₀
//! Q₀   = KH · LMTD(θ_V, θ_R₀, θ_i) · A
//!
//! repeat up to 20 times:
//!     Δθ  = Q / (ṁ'·c_p)                θ_R = θ_V − Δθ
//!     θ_R ≤ θ_i  →  physically invalid, stop
//!     Q*  = KH · LMTD(θ_V, θ_R, θ_i) · A
//!     Q   = 0.7·Q + 0.3·Q*   after iteration 5 while diverging
//!           0.5·Q + 0.5·Q*   otherwise
//!     stop once |ΔQ|/Q < 0.1 %
//! ```
//!
//! KH and the pipe length stay at their design values. Running out of
//! iterations is not an error: the last blended value is accepted.
//!
//! ## Outcomes
//!
//! - [`AdjustmentOutcome::Adjusted`] - converged (or budget exhausted)
//! - [`AdjustmentOutcome::PhysicallyInvalid`] - the return would fall to room
//!   temperature or below; the adjustment is reset to 0 % and the nominal
//!   operating point is returned with a warning
//!
//! ## Example
//!
//! ```rust
//! use radiant_core::calculations::{flow_adjustment, nominal_loop};
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
//! let params = SystemParameters::default();
//! let nominal = nominal_loop::calculate(&circuit, &params).unwrap();
//!
//! let outcome = flow_adjustment::adjust(&nominal, &circuit, &params, -30.0).unwrap();
//! let adjusted = outcome.result();
//! assert!(adjusted.heat_load_w < nominal.heat_load_w);
//! assert!(adjusted.iteration_count <= 20);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::circuit::{Circuit, SystemParameters};
use crate::calculations::nominal_loop::NominalResult;
use crate::calculations::pressure_drop::{self, PressureDropInput, PressureDropResult};
use crate::calculations::{DesignWarning, SolverSettings};
use crate::equations::heat_transfer::{
    floor_surface_temperature, log_mean_temperature_difference, temperature_drop,
};
use crate::equations::hydraulics::FlowRegime;
use crate::errors::CalcResult;
use crate::units::{KgPerHour, KgPerSecond};

/// Iteration budget
pub const MAX_ITERATIONS: usize = 20;

/// Relative heat-output change that counts as converged
pub const CONVERGENCE_TOLERANCE: f64 = 0.001;

/// Largest flow change accepted in either direction (%)
pub const MAX_ADJUSTMENT_PCT: f64 = 50.0;

/// Iterations after which diverging steps get the heavier damping
const HEAVY_DAMPING_AFTER: usize = 5;

/// Weight kept on the previous estimate while diverging
const HEAVY_DAMPING_WEIGHT: f64 = 0.7;

/// Weight kept on the previous estimate otherwise
const NORMAL_DAMPING_WEIGHT: f64 = 0.5;

/// Results of a circuit at an adjusted flow.
///
/// Derived from a [`NominalResult`]; it is discarded whenever the circuit or
/// the system parameters change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedResult {
    /// Flow change applied, clamped to ±50 (%)
    pub requested_pct: f64,

    // === Thermal ===
    pub heat_flux_w_m2: f64,
    pub heat_load_w: f64,
    /// Heat load change relative to nominal (%)
    pub heat_load_change_pct: f64,
    pub supply_temp_c: f64,
    pub return_temp_c: f64,
    pub mean_water_temp_c: f64,
    pub floor_surface_temp_c: f64,
    pub max_floor_temp_c: f64,

    // === Geometry (design values) ===
    pub pipe_length_m: f64,
    pub loop_count: u32,

    // === Hydraulics ===
    /// Total water mass flow (kg/h)
    pub mass_flow_kg_h: f64,
    /// Pressure drop of one loop (kPa)
    pub pressure_drop_kpa: f64,
    pub velocity_m_s: f64,
    pub reynolds: f64,
    pub flow_regime: FlowRegime,
    pub hydraulics: PressureDropResult,

    // === Solver ===
    /// Iterations run; 0 when nothing was iterated
    pub iteration_count: usize,
    /// False when the iteration budget ran out first
    pub converged: bool,

    pub warnings: Vec<DesignWarning>,
}

impl AdjustedResult {
    /// The nominal operating point expressed as an adjusted result at 0 %.
    pub fn from_nominal(nominal: &NominalResult) -> Self {
        AdjustedResult {
            requested_pct: 0.0,
            heat_flux_w_m2: nominal.heat_flux_w_m2,
            heat_load_w: nominal.heat_load_w,
            heat_load_change_pct: 0.0,
            supply_temp_c: nominal.supply_temp_c,
            return_temp_c: nominal.return_temp_c,
            mean_water_temp_c: nominal.mean_water_temp_c,
            floor_surface_temp_c: nominal.floor_surface_temp_c,
            max_floor_temp_c: nominal.max_floor_temp_c,
            pipe_length_m: nominal.pipe_length_m,
            loop_count: nominal.loop_count,
            mass_flow_kg_h: nominal.mass_flow_kg_h,
            pressure_drop_kpa: nominal.pressure_drop_kpa,
            velocity_m_s: nominal.velocity_m_s,
            reynolds: nominal.hydraulics.reynolds,
            flow_regime: FlowRegime::from_reynolds(nominal.hydraulics.reynolds),
            hydraulics: nominal.hydraulics,
            iteration_count: 0,
            converged: true,
            warnings: Vec::new(),
        }
    }
}

/// Result of a flow adjustment request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum AdjustmentOutcome {
    /// A self-consistent operating point at the new flow
    Adjusted(AdjustedResult),

    /// The requested flow is not physically reachable; `reset` holds the
    /// nominal operating point at 0 % and carries the warning
    PhysicallyInvalid {
        warning: DesignWarning,
        reset: AdjustedResult,
    },
}

impl AdjustmentOutcome {
    /// The result to display: adjusted, or the reset nominal point
    pub fn result(&self) -> &AdjustedResult {
        match self {
            AdjustmentOutcome::Adjusted(result) => result,
            AdjustmentOutcome::PhysicallyInvalid { reset, .. } => reset,
        }
    }

    pub fn is_physically_invalid(&self) -> bool {
        matches!(self, AdjustmentOutcome::PhysicallyInvalid { .. })
    }

    /// The adjustment percentage the caller should keep (0 after a reset)
    pub fn applied_pct(&self) -> f64 {
        self.result().requested_pct
    }
}

/// Adjust a circuit's flow with default solver settings.
///
/// # Arguments
///
/// * `nominal` - Design-flow result of the same circuit, the iteration seed
/// * `circuit` - Circuit the nominal result was computed for
/// * `params` - System parameters the nominal result was computed for
/// * `pct` - Flow change in percent, clamped to [-50, +50]
///
/// # Returns
///
/// * `Ok(AdjustmentOutcome)` - Adjusted, or physically invalid with a reset
/// * `Err(CalcError::MissingGeometry)` - Circuit geometry missing
pub fn adjust(
    nominal: &NominalResult,
    circuit: &Circuit,
    params: &SystemParameters,
    pct: f64,
) -> CalcResult<AdjustmentOutcome> {
    adjust_with(nominal, circuit, params, pct, &SolverSettings::default())
}

/// Adjust a circuit's flow.
pub fn adjust_with(
    nominal: &NominalResult,
    circuit: &Circuit,
    params: &SystemParameters,
    pct: f64,
    settings: &SolverSettings,
) -> CalcResult<AdjustmentOutcome> {
    circuit.validate()?;

    let requested_pct = clamp_pct(pct);
    let operating = OperatingPoint {
        kh: nominal.kh,
        area_m2: circuit.area_m2,
        supply_temp_c: params.supply_temp_c,
        room_temp_c: circuit.room_temp_c,
    };

    let flow_kg_h = nominal.mass_flow_kg_h * (1.0 + requested_pct / 100.0);
    let flow: KgPerSecond = KgPerHour(flow_kg_h).into();

    let invalid = |return_temp_c: Option<f64>, iteration: usize| -> CalcResult<AdjustmentOutcome> {
        let warning = DesignWarning::PhysicallyInvalidState {
            requested_pct,
            return_temp_c,
            room_temp_c: operating.room_temp_c,
            iteration,
        };
        let mut reset = AdjustedResult::from_nominal(nominal);
        reset.warnings.push(warning.clone());
        Ok(AdjustmentOutcome::PhysicallyInvalid { warning, reset })
    };

    // Seeding
    if !(flow.0 > 0.0) {
        return invalid(None, 0);
    }
    let seed_return_c = operating.return_temp_c(nominal.heat_load_w, flow.0);
    if !(seed_return_c > operating.room_temp_c) {
        return invalid(Some(seed_return_c), 0);
    }

    // Iterating
    let mut iteration = HeatIteration::new(operating.heat_output(seed_return_c));
    let mut converged = false;
    while iteration.count < settings.max_iterations {
        iteration.count += 1;

        let return_temp_c = operating.return_temp_c(iteration.current, flow.0);
        if !(return_temp_c > operating.room_temp_c) {
            return invalid(Some(return_temp_c), iteration.count);
        }

        let candidate = operating.heat_output(return_temp_c);
        let relative_change = iteration.accept(candidate);
        if relative_change < settings.convergence_tolerance {
            converged = true;
            break;
        }
    }

    // Converged or budget exhausted: accept the last value
    let heat_load_w = iteration.current;
    let return_temp_c = operating.return_temp_c(heat_load_w, flow.0);
    if !(return_temp_c > operating.room_temp_c) {
        return invalid(Some(return_temp_c), iteration.count);
    }

    let heat_flux_w_m2 = heat_load_w / operating.area_m2;
    let floor_surface_temp_c = floor_surface_temperature(operating.room_temp_c, heat_flux_w_m2);
    let mean_water_temp_c = (operating.supply_temp_c + return_temp_c) / 2.0;

    let loops = nominal.loop_count.max(1) as f64;
    let hydraulics = pressure_drop::calculate(
        &PressureDropInput::new(
            flow_kg_h / loops,
            params.pipe.as_str(),
            nominal.pipe_length_m / loops,
            mean_water_temp_c,
            circuit.spacing_cm,
        )
        .with_roughness_mm(settings.pipe_roughness_mm),
    );

    let mut warnings = Vec::new();
    if hydraulics.velocity_m_s > pressure_drop::MAX_RECOMMENDED_VELOCITY_M_S {
        warnings.push(DesignWarning::HighVelocity {
            velocity_m_s: hydraulics.velocity_m_s,
            limit_m_s: pressure_drop::MAX_RECOMMENDED_VELOCITY_M_S,
        });
    }
    if floor_surface_temp_c > nominal.max_floor_temp_c {
        warnings.push(DesignWarning::FloorTemperatureExceeded {
            surface_temp_c: floor_surface_temp_c,
            limit_c: nominal.max_floor_temp_c,
        });
    }

    let heat_load_change_pct = if nominal.heat_load_w > 0.0 {
        (heat_load_w / nominal.heat_load_w - 1.0) * 100.0
    } else {
        0.0
    };

    Ok(AdjustmentOutcome::Adjusted(AdjustedResult {
        requested_pct,
        heat_flux_w_m2,
        heat_load_w,
        heat_load_change_pct,
        supply_temp_c: operating.supply_temp_c,
        return_temp_c,
        mean_water_temp_c,
        floor_surface_temp_c,
        max_floor_temp_c: nominal.max_floor_temp_c,
        pipe_length_m: nominal.pipe_length_m,
        loop_count: nominal.loop_count,
        mass_flow_kg_h: flow_kg_h,
        pressure_drop_kpa: hydraulics.total_kpa,
        velocity_m_s: hydraulics.velocity_m_s,
        reynolds: hydraulics.reynolds,
        flow_regime: FlowRegime::from_reynolds(hydraulics.reynolds),
        hydraulics,
        iteration_count: iteration.count,
        converged,
        warnings,
    }))
}

/// Clamp a requested flow change to ±50 %; NaN means no change.
fn clamp_pct(pct: f64) -> f64 {
    if pct.is_nan() {
        return 0.0;
    }
    pct.clamp(-MAX_ADJUSTMENT_PCT, MAX_ADJUSTMENT_PCT)
}

/// Fixed quantities of the circuit during the iteration.
#[derive(Debug, Clone, Copy)]
struct OperatingPoint {
    kh: f64,
    area_m2: f64,
    supply_temp_c: f64,
    room_temp_c: f64,
}

impl OperatingPoint {
    /// Return temperature after the water gives off `heat_w` at `flow_kg_s`
    fn return_temp_c(&self, heat_w: f64, flow_kg_s: f64) -> f64 {
        self.supply_temp_c - temperature_drop(heat_w, flow_kg_s)
    }

    /// Floor heat output Q = KH · LMTD · A for a return temperature
    fn heat_output(&self, return_temp_c: f64) -> f64 {
        let lmtd = log_mean_temperature_difference(self.supply_temp_c, return_temp_c, self.room_temp_c);
        self.kh * lmtd * self.area_m2
    }
}

/// Damped fixed-point state on the heat output.
#[derive(Debug, Clone, Copy)]
struct HeatIteration {
    /// Latest accepted estimate
    current: f64,
    /// Estimate accepted one step before `current`
    previous: Option<f64>,
    /// Iterations started so far
    count: usize,
}

impl HeatIteration {
    fn new(seed: f64) -> Self {
        HeatIteration {
            current: seed,
            previous: None,
            count: 0,
        }
    }

    /// Blend a raw candidate into the estimate; returns |ΔQ|/Q.
    fn accept(&mut self, candidate: f64) -> f64 {
        let weight = if self.count > HEAVY_DAMPING_AFTER && self.is_diverging(candidate) {
            HEAVY_DAMPING_WEIGHT
        } else {
            NORMAL_DAMPING_WEIGHT
        };
        let blended = weight * self.current + (1.0 - weight) * candidate;

        let relative_change = if self.current > 0.0 {
            (blended - self.current).abs() / self.current
        } else {
            0.0
        };
        self.previous = Some(self.current);
        self.current = blended;
        relative_change
    }

    /// Candidate lies farther from the value two steps back than the last step went
    fn is_diverging(&self, candidate: f64) -> bool {
        match self.previous {
            Some(two_back) => (candidate - two_back).abs() > (self.current - two_back).abs(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::nominal_loop;
    use crate::tables::RoomType;

    fn living_room() -> Circuit {
        Circuit {
            label: "Living".to_string(),
            area_m2: 15.0,
            spacing_cm: 15.0,
            r_lambda: 0.05,
            manifold_distance_m: 3.0,
            room_temp_c: 20.0,
            room_type: RoomType::Living,
        }
    }

    fn solve(pct: f64) -> (NominalResult, AdjustmentOutcome) {
        let circuit = living_room();
        let params = SystemParameters::default();
        let nominal = nominal_loop::calculate(&circuit, &params).unwrap();
        let outcome = adjust(&nominal, &circuit, &params, pct).unwrap();
        (nominal, outcome)
    }

    #[test]
    fn test_zero_adjustment_reproduces_nominal() {
        let (nominal, outcome) = solve(0.0);
        let result = outcome.result();
        assert!(!outcome.is_physically_invalid());
        assert!((result.heat_load_w - nominal.heat_load_w).abs() < 1e-3);
        assert!((result.return_temp_c - nominal.return_temp_c).abs() < 1e-3);
        assert!((result.pressure_drop_kpa - nominal.pressure_drop_kpa).abs() < 1e-6);
        assert_eq!(result.iteration_count, 1);
        assert!(result.converged);
    }

    #[test]
    fn test_reduced_flow() {
        let (nominal, outcome) = solve(-30.0);
        let result = outcome.result();
        assert!(result.converged);
        assert!(result.iteration_count <= MAX_ITERATIONS);
        assert!(result.heat_load_w < nominal.heat_load_w);
        assert!(result.return_temp_c < nominal.return_temp_c);
        assert!(result.return_temp_c > 20.0);
        assert!((result.mass_flow_kg_h - nominal.mass_flow_kg_h * 0.7).abs() < 1e-9);
        assert!(result.pressure_drop_kpa < nominal.pressure_drop_kpa);
        assert!(result.heat_load_change_pct < 0.0);
    }

    #[test]
    fn test_increased_flow() {
        let (nominal, outcome) = solve(30.0);
        let result = outcome.result();
        assert!(result.heat_load_w > nominal.heat_load_w);
        assert!(result.return_temp_c > nominal.return_temp_c);
        assert!(result.return_temp_c < nominal.supply_temp_c);
        assert!(result.pressure_drop_kpa > nominal.pressure_drop_kpa);
        assert_eq!(result.flow_regime, FlowRegime::Turbulent);
    }

    #[test]
    fn test_result_is_self_consistent() {
        let (_, outcome) = solve(-40.0);
        let result = outcome.result();
        // Energy balance and heat output agree within the convergence tolerance
        let flow: KgPerSecond = KgPerHour(result.mass_flow_kg_h).into();
        let balance_return = 35.0 - temperature_drop(result.heat_load_w, flow.0);
        assert!((balance_return - result.return_temp_c).abs() < 1e-9);
        let output = 5.09 * log_mean_temperature_difference(35.0, result.return_temp_c, 20.0) * 15.0;
        assert!((output - result.heat_load_w).abs() / result.heat_load_w < 0.005);
    }

    #[test]
    fn test_pipe_length_fixed() {
        let (nominal, outcome) = solve(25.0);
        assert_eq!(outcome.result().pipe_length_m, nominal.pipe_length_m);
        assert_eq!(outcome.result().loop_count, nominal.loop_count);
    }

    #[test]
    fn test_percentage_clamped() {
        let (_, outcome) = solve(80.0);
        assert_eq!(outcome.result().requested_pct, 50.0);
        assert_eq!(clamp_pct(-75.0), -50.0);
        assert_eq!(clamp_pct(f64::NAN), 0.0);
    }

    #[test]
    fn test_marginal_circuit_invalid() {
        let circuit = Circuit {
            room_temp_c: 22.0,
            ..living_room()
        };
        let params = SystemParameters {
            supply_temp_c: 30.0,
            design_delta_t_k: 6.0,
            ..SystemParameters::default()
        };
        let nominal = nominal_loop::calculate(&circuit, &params).unwrap();
        let outcome = adjust(&nominal, &circuit, &params, -50.0).unwrap();

        assert!(outcome.is_physically_invalid());
        assert_eq!(outcome.applied_pct(), 0.0);
        let reset = outcome.result();
        assert_eq!(reset.heat_load_w, nominal.heat_load_w);
        assert_eq!(reset.return_temp_c, nominal.return_temp_c);
        match outcome {
            AdjustmentOutcome::PhysicallyInvalid { warning, reset } => {
                assert_eq!(reset.warnings, vec![warning.clone()]);
                match warning {
                    DesignWarning::PhysicallyInvalidState { requested_pct, return_temp_c, .. } => {
                        assert_eq!(requested_pct, -50.0);
                        assert!(return_temp_c.unwrap() <= 22.0);
                    }
                    other => panic!("unexpected warning {:?}", other),
                }
            }
            AdjustmentOutcome::Adjusted(_) => unreachable!(),
        }
    }

    #[test]
    fn test_zero_nominal_flow_invalid() {
        let circuit = living_room();
        let params = SystemParameters {
            design_delta_t_k: 0.0,
            ..SystemParameters::default()
        };
        let nominal = nominal_loop::calculate(&circuit, &params).unwrap();
        assert_eq!(nominal.mass_flow_kg_h, 0.0);
        let outcome = adjust(&nominal, &circuit, &params, 20.0).unwrap();
        assert!(outcome.is_physically_invalid());

        let json = serde_json::to_string(&outcome).unwrap();
        let roundtrip: AdjustmentOutcome = serde_json::from_str(&json).unwrap();
        assert!(roundtrip.is_physically_invalid());
        assert_eq!(roundtrip.applied_pct(), 0.0);
        match roundtrip {
            AdjustmentOutcome::PhysicallyInvalid { warning, .. } => assert!(matches!(
                warning,
                DesignWarning::PhysicallyInvalidState { return_temp_c: None, iteration: 0, .. }
            )),
            AdjustmentOutcome::Adjusted(_) => unreachable!(),
        }
    }

    #[test]
    fn test_missing_geometry_propagates() {
        let (nominal, _) = solve(0.0);
        let circuit = Circuit {
            area_m2: 0.0,
            ..living_room()
        };
        let result = adjust(&nominal, &circuit, &SystemParameters::default(), 10.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_budget_exhaustion_accepts_last_value() {
        let circuit = living_room();
        let params = SystemParameters::default();
        let nominal = nominal_loop::calculate(&circuit, &params).unwrap();
        let settings = SolverSettings {
            max_iterations: 1,
            ..SolverSettings::default()
        };
        let outcome = adjust_with(&nominal, &circuit, &params, -30.0, &settings).unwrap();
        let result = outcome.result();
        assert!(!outcome.is_physically_invalid());
        assert_eq!(result.iteration_count, 1);
        assert!(!result.converged);
        assert!(result.heat_load_w < nominal.heat_load_w);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_damping_schedule() {
        let mut iteration = HeatIteration::new(100.0);
        iteration.count = 1;
        iteration.accept(110.0);
        assert_eq!(iteration.current, 105.0);

        // Diverging but still inside the first five iterations: 50/50
        iteration.count = 5;
        iteration.accept(120.0);
        assert_eq!(iteration.current, 112.5);

        // Diverging after iteration 5: 70/30 toward the previous value
        iteration.count = 6;
        iteration.accept(130.0);
        assert!((iteration.current - (0.7 * 112.5 + 0.3 * 130.0)).abs() < 1e-12);

        // Moving back toward the value two steps back: 50/50 again
        iteration.count = 7;
        let before = iteration.current;
        iteration.accept(112.5);
        assert!((iteration.current - (0.5 * before + 0.5 * 112.5)).abs() < 1e-12);
    }

    #[test]
    fn test_outcome_serialization() {
        let (_, outcome) = solve(-20.0);
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"status\":\"Adjusted\""));
        let roundtrip: AdjustmentOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.result().iteration_count, outcome.result().iteration_count);
    }
}
