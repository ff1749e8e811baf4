//! # Project Data Structures
//!
//! The `Project` struct holds one manifold's worth of circuits as they are
//! edited in a session, together with the shared system parameters and the
//! per-circuit flow adjustment.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: GlobalSettings (solver settings, defaults)
//! ├── system: SystemParameters (shared by all circuits)
//! └── circuits: HashMap<Uuid, CircuitItem> (circuit + adjustment %)
//! ```
//!
//! ## Lifecycle
//!
//! Results are never stored: nominal results are recomputed from the current
//! inputs on every [`Project::evaluate`]. Editing a circuit resets its flow
//! adjustment to 0 %, and replacing the system parameters resets all of them,
//! so a stale adjusted result can never outlive the inputs it came from.
//!
//! ## Example
//!
//! ```rust
//! use radiant_core::calculations::Circuit;
//! use radiant_core::project::Project;
//! use radiant_core::tables::RoomType;
//!
//! let mut project = Project::new("Jane Engineer", "25-042", "ACME Corp");
//! let id = project.add_circuit(Circuit {
//!     label: "Living".to_string(),
//!     area_m2: 15.0,
//!     spacing_cm: 15.0,
//!     r_lambda: 0.05,
//!     manifold_distance_m: 3.0,
//!     room_temp_c: 20.0,
//!     room_type: RoomType::Living,
//! });
//!
//! let outcome = project.apply_adjustment(&id, -20.0).unwrap();
//! assert!(!outcome.is_physically_invalid());
//! assert_eq!(project.get_circuit(&id).unwrap().adjustment_pct, -20.0);
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("Living"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::flow_adjustment::{self, AdjustmentOutcome, MAX_ADJUSTMENT_PCT};
use crate::calculations::manifold::{self, ManifoldResult};
use crate::calculations::nominal_loop::{self, NominalResult};
use crate::calculations::{Circuit, SolverSettings, SystemParameters};
use crate::errors::{CalcError, CalcResult};
use crate::tables::RoomType;

/// Current schema version of serialized projects
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Solver settings and defaults
    pub settings: GlobalSettings,

    /// Parameters shared by every circuit on the manifold
    pub system: SystemParameters,

    /// All circuits, keyed by UUID
    pub circuits: HashMap<Uuid, CircuitItem>,
}

/// A circuit with its current flow adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitItem {
    pub circuit: Circuit,

    /// Flow change in percent, 0 for design flow
    #[serde(default)]
    pub adjustment_pct: f64,
}

/// Results for one circuit at the project's current inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitEvaluation {
    pub nominal: NominalResult,

    /// Present when the circuit has a non-zero adjustment
    pub adjusted: Option<AdjustmentOutcome>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `engineer` - Name of the responsible engineer
    /// * `job_id` - Job/project number (e.g., "25-001")
    /// * `client` - Client name
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            system: SystemParameters::default(),
            circuits: HashMap::new(),
        }
    }

    /// Add a circuit at design flow. Returns the UUID assigned to it.
    pub fn add_circuit(&mut self, circuit: Circuit) -> Uuid {
        let id = Uuid::new_v4();
        self.circuits.insert(
            id,
            CircuitItem {
                circuit,
                adjustment_pct: 0.0,
            },
        );
        self.touch();
        id
    }

    /// Remove a circuit by UUID.
    pub fn remove_circuit(&mut self, id: &Uuid) -> Option<CircuitItem> {
        let item = self.circuits.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    /// Get a circuit by UUID.
    pub fn get_circuit(&self, id: &Uuid) -> Option<&CircuitItem> {
        self.circuits.get(id)
    }

    /// Replace a circuit's inputs. Its adjustment is reset to 0 %.
    pub fn update_circuit(&mut self, id: &Uuid, circuit: Circuit) -> CalcResult<()> {
        let item = self
            .circuits
            .get_mut(id)
            .ok_or_else(|| CalcError::circuit_not_found(id))?;
        item.circuit = circuit;
        item.adjustment_pct = 0.0;
        self.touch();
        Ok(())
    }

    /// Replace the system parameters. Every adjustment is reset to 0 %.
    pub fn set_system(&mut self, system: SystemParameters) {
        self.system = system;
        for item in self.circuits.values_mut() {
            item.adjustment_pct = 0.0;
        }
        self.touch();
    }

    /// Apply a flow adjustment to a circuit.
    ///
    /// The percentage is limited to ±`settings.max_adjustment_pct`. When the
    /// adjustment is physically invalid the stored value goes back to 0 %
    /// and the returned outcome carries the warning.
    pub fn apply_adjustment(&mut self, id: &Uuid, pct: f64) -> CalcResult<AdjustmentOutcome> {
        self.settings.validate()?;
        let limit = self.settings.max_adjustment_pct;
        let pct = if pct.is_nan() { 0.0 } else { pct.clamp(-limit, limit) };

        let item = self
            .circuits
            .get(id)
            .ok_or_else(|| CalcError::circuit_not_found(id))?;
        let nominal = nominal_loop::calculate_with(&item.circuit, &self.system, &self.settings.solver)?;
        let outcome = flow_adjustment::adjust_with(
            &nominal,
            &item.circuit,
            &self.system,
            pct,
            &self.settings.solver,
        )?;

        if let Some(item) = self.circuits.get_mut(id) {
            item.adjustment_pct = outcome.applied_pct();
        }
        self.touch();
        Ok(outcome)
    }

    /// Evaluate one circuit at the current inputs.
    pub fn evaluate(&self, id: &Uuid) -> CalcResult<CircuitEvaluation> {
        let item = self
            .circuits
            .get(id)
            .ok_or_else(|| CalcError::circuit_not_found(id))?;
        let nominal = nominal_loop::calculate_with(&item.circuit, &self.system, &self.settings.solver)?;
        let adjusted = if item.adjustment_pct != 0.0 {
            Some(flow_adjustment::adjust_with(
                &nominal,
                &item.circuit,
                &self.system,
                item.adjustment_pct,
                &self.settings.solver,
            )?)
        } else {
            None
        };
        Ok(CircuitEvaluation { nominal, adjusted })
    }

    /// Evaluate the whole manifold, circuits ordered by label.
    pub fn summary(&self) -> ManifoldResult {
        let mut items: Vec<&CircuitItem> = self.circuits.values().collect();
        items.sort_by(|a, b| a.circuit.label.cmp(&b.circuit.label));
        let input = manifold::ManifoldInput {
            label: self.meta.job_id.clone(),
            system: self.system.clone(),
            circuits: items.into_iter().map(|item| item.circuit.clone()).collect(),
        };
        manifold::calculate_with(&input, &self.settings.solver)
    }

    /// A new circuit pre-filled with the project defaults
    pub fn new_circuit(&self, label: impl Into<String>) -> Circuit {
        let room_type = self.settings.default_room_type;
        Circuit {
            label: label.into(),
            area_m2: 0.0,
            spacing_cm: self.settings.default_spacing_cm,
            r_lambda: self.settings.default_r_lambda,
            manifold_distance_m: 0.0,
            room_temp_c: room_type.design_temperature_c(),
            room_type,
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn circuit_count(&self) -> usize {
        self.circuits.len()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Global project settings.
///
/// Every field has a default, so a settings file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    pub solver: SolverSettings,

    /// Largest flow adjustment offered to the user (%)
    pub max_adjustment_pct: f64,

    /// Room type for new circuits
    pub default_room_type: RoomType,

    /// Pipe spacing for new circuits (cm)
    pub default_spacing_cm: f64,

    /// Floor covering for new circuits (m²K/W)
    pub default_r_lambda: f64,
}

impl GlobalSettings {
    /// Check values that usually come from a hand-edited settings file.
    pub fn validate(&self) -> CalcResult<()> {
        if !(self.max_adjustment_pct >= 0.0 && self.max_adjustment_pct <= MAX_ADJUSTMENT_PCT) {
            return Err(CalcError::invalid_input(
                "max_adjustment_pct",
                self.max_adjustment_pct.to_string(),
                format!("must be between 0 and {}", MAX_ADJUSTMENT_PCT),
            ));
        }
        if !(self.solver.pipe_roughness_mm >= 0.0) {
            return Err(CalcError::invalid_input(
                "solver.pipe_roughness_mm",
                self.solver.pipe_roughness_mm.to_string(),
                "must not be negative",
            ));
        }
        if !(self.solver.convergence_tolerance > 0.0) {
            return Err(CalcError::invalid_input(
                "solver.convergence_tolerance",
                self.solver.convergence_tolerance.to_string(),
                "must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            solver: SolverSettings::default(),
            max_adjustment_pct: MAX_ADJUSTMENT_PCT,
            default_room_type: RoomType::Living,
            default_spacing_cm: 15.0,
            default_r_lambda: 0.10,
        }
    }
}
