//! Optimal control problem model
//!
//! The OCP is read-only input to the export pipeline. It is usually
//! deserialized from the `[ocp]` section of a project file, but can be built
//! in code as well.

use serde::{Deserialize, Serialize};

/// Problem dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Dimensions {
    /// Number of differential states
    pub nx: usize,

    /// Number of differential state derivatives (implicit models)
    #[serde(default)]
    pub ndx: usize,

    /// Number of algebraic states
    #[serde(default)]
    pub nxa: usize,

    /// Number of controls
    pub nu: usize,

    /// Number of online data values
    #[serde(default)]
    pub nod: usize,
}

/// Dynamic model metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelData {
    /// Name of the externally provided C function evaluating the model right-hand side
    #[serde(default = "default_rhs_function")]
    pub rhs_function: String,

    /// Number of uncontrolled inputs
    #[serde(default)]
    pub nui: usize,

    /// Number of free parameters
    #[serde(default)]
    pub np: usize,

    /// Whether the model is already given in discrete time
    #[serde(default)]
    pub discretized: bool,
}

impl Default for ModelData {
    fn default() -> Self {
        Self {
            rhs_function: default_rhs_function(),
            nui: 0,
            np: 0,
            discretized: false,
        }
    }
}

/// Type of the weighting matrices of a least-squares term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightingMatricesType {
    /// No weighting matrix
    Empty,
    /// One weighting matrix shared by all nodes
    #[default]
    Once,
    /// One weighting matrix per node
    OncePerNode,
}

impl WeightingMatricesType {
    /// Numeric indicator written to the common header
    pub fn indicator(self) -> u32 {
        match self {
            WeightingMatricesType::Empty => 0,
            WeightingMatricesType::Once => 1,
            WeightingMatricesType::OncePerNode => 2,
        }
    }
}

/// Least-squares objective term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeastSquaresTerm {
    /// Number of references/measurements
    pub ny: usize,

    /// Weighting matrix type
    #[serde(default)]
    pub weighting: WeightingMatricesType,
}

/// Objective of the OCP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Objective {
    /// Number of Mayer (terminal) terms
    #[serde(default)]
    pub mayer_terms: usize,

    /// Number of Lagrange (integral) terms
    #[serde(default)]
    pub lagrange_terms: usize,

    /// Least-squares term on the first N nodes
    #[serde(default)]
    pub least_squares: Option<LeastSquaresTerm>,

    /// Least-squares term on the terminal node
    #[serde(default)]
    pub terminal_least_squares: Option<LeastSquaresTerm>,

    /// Whether non-hard-coded linear terms are used
    #[serde(default)]
    pub linear_terms: bool,
}

impl Objective {
    /// Whether the objective has general (non least-squares) terms
    pub fn has_general_terms(&self) -> bool {
        self.mayer_terms > 0 || self.lagrange_terms > 0
    }

    /// Whether the objective has any least-squares term
    pub fn has_least_squares(&self) -> bool {
        self.least_squares.is_some() || self.terminal_least_squares.is_some()
    }

    /// Number of references per node on the first N nodes
    pub fn ny(&self) -> usize {
        self.least_squares.map(|t| t.ny).unwrap_or(0)
    }

    /// Number of references on the terminal node
    pub fn nyn(&self) -> usize {
        self.terminal_least_squares.map(|t| t.ny).unwrap_or(0)
    }
}

/// Constraints of the OCP, described by their counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Constraints {
    /// Number of controls with simple bounds
    #[serde(default)]
    pub bounded_controls: usize,

    /// Number of states with simple bounds
    #[serde(default)]
    pub bounded_states: usize,

    /// Number of nonlinear path constraints per node
    #[serde(default)]
    pub path_constraints: usize,

    /// Number of nonlinear point constraints over the horizon
    #[serde(default)]
    pub point_constraints: usize,
}

/// Time discretization of the horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    /// Start time
    #[serde(default)]
    pub start: f64,

    /// End time
    pub end: f64,

    /// Explicit grid points (N + 1 values); equidistant when absent
    #[serde(default)]
    pub points: Option<Vec<f64>>,
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 1.0,
            points: None,
        }
    }
}

impl TimeGrid {
    /// Whether all shooting intervals have the same length
    pub fn is_equidistant(&self) -> bool {
        match &self.points {
            None => true,
            Some(points) if points.len() < 3 => true,
            Some(points) => {
                let first = points[1] - points[0];
                let tolerance = 1e-10 * first.abs().max(1.0);
                points
                    .windows(2)
                    .all(|w| ((w[1] - w[0]) - first).abs() <= tolerance)
            }
        }
    }
}

/// Optimal control problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ocp {
    /// Horizon length N
    pub horizon: usize,

    /// Problem dimensions
    pub dimensions: Dimensions,

    /// Time grid
    #[serde(default)]
    pub grid: TimeGrid,

    /// Dynamic model
    #[serde(default)]
    pub model: ModelData,

    /// Objective
    #[serde(default)]
    pub objective: Objective,

    /// Constraints
    #[serde(default)]
    pub constraints: Constraints,
}

impl Ocp {
    /// Creates an OCP with the given dimensions and an empty objective
    pub fn new(horizon: usize, dimensions: Dimensions) -> Self {
        Self {
            horizon,
            dimensions,
            grid: TimeGrid::default(),
            model: ModelData::default(),
            objective: Objective::default(),
            constraints: Constraints::default(),
        }
    }

    /// Sets the objective
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    /// Sets the constraints
    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the dynamic model
    pub fn with_model(mut self, model: ModelData) -> Self {
        self.model = model;
        self
    }

    /// Number of free parameters
    pub fn np(&self) -> usize {
        self.model.np
    }

    /// Whether the control grid is equidistant
    pub fn has_equidistant_control_grid(&self) -> bool {
        self.grid.is_equidistant()
    }

    /// Structural checks on the problem description itself
    ///
    /// These do not depend on the export options; option-dependent checks
    /// live in the consistency validator.
    pub fn validate(&self) -> Result<(), String> {
        if self.horizon == 0 {
            return Err("ocp.horizon must be > 0".to_string());
        }

        if self.dimensions.nx == 0 {
            return Err("ocp.dimensions.nx must be > 0".to_string());
        }

        if self.dimensions.ndx != 0 && self.dimensions.ndx != self.dimensions.nx {
            return Err(format!(
                "ocp.dimensions.ndx must be 0 or equal to nx ({}), got {}",
                self.dimensions.nx, self.dimensions.ndx
            ));
        }

        if self.grid.end <= self.grid.start {
            return Err(format!(
                "ocp.grid.end ({}) must be greater than ocp.grid.start ({})",
                self.grid.end, self.grid.start
            ));
        }

        if let Some(points) = &self.grid.points {
            if points.len() != self.horizon + 1 {
                return Err(format!(
                    "ocp.grid.points must have horizon + 1 = {} entries, got {}",
                    self.horizon + 1,
                    points.len()
                ));
            }
            if points.windows(2).any(|w| w[1] <= w[0]) {
                return Err("ocp.grid.points must be strictly increasing".to_string());
            }
        }

        if self.model.rhs_function.trim().is_empty() {
            return Err("ocp.model.rhs_function cannot be empty".to_string());
        }

        if self.constraints.bounded_controls > self.dimensions.nu {
            return Err(format!(
                "ocp.constraints.bounded_controls must be <= nu ({}), got {}",
                self.dimensions.nu, self.constraints.bounded_controls
            ));
        }

        if self.constraints.bounded_states > self.dimensions.nx {
            return Err(format!(
                "ocp.constraints.bounded_states must be <= nx ({}), got {}",
                self.dimensions.nx, self.constraints.bounded_states
            ));
        }

        Ok(())
    }
}

fn default_rhs_function() -> String {
    "acado_rhs".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ocp() -> Ocp {
        Ocp::new(
            20,
            Dimensions {
                nx: 4,
                nu: 1,
                ..Dimensions::default()
            },
        )
    }

    #[test]
    fn test_ocp_validation() {
        let mut ocp = sample_ocp();
        assert!(ocp.validate().is_ok());

        ocp.horizon = 0;
        assert!(ocp.validate().is_err());

        let mut ocp = sample_ocp();
        ocp.dimensions.ndx = 2;
        assert!(ocp.validate().is_err());

        let mut ocp = sample_ocp();
        ocp.constraints.bounded_controls = 2;
        assert!(ocp.validate().is_err());
    }

    #[test]
    fn test_grid_points_must_match_horizon() {
        let mut ocp = sample_ocp();
        ocp.grid.points = Some(vec![0.0, 0.5, 1.0]);
        assert!(ocp.validate().is_err());

        ocp.horizon = 2;
        assert!(ocp.validate().is_ok());
    }

    #[test]
    fn test_equidistant_grid_detection() {
        let mut grid = TimeGrid::default();
        assert!(grid.is_equidistant());

        grid.points = Some(vec![0.0, 0.1, 0.2, 0.3]);
        assert!(grid.is_equidistant());

        grid.points = Some(vec![0.0, 0.1, 0.3, 0.6]);
        assert!(!grid.is_equidistant());
    }

    #[test]
    fn test_objective_reference_counts() {
        let objective = Objective {
            least_squares: Some(LeastSquaresTerm {
                ny: 5,
                weighting: WeightingMatricesType::Once,
            }),
            terminal_least_squares: Some(LeastSquaresTerm {
                ny: 4,
                weighting: WeightingMatricesType::Once,
            }),
            ..Objective::default()
        };

        assert_eq!(objective.ny(), 5);
        assert_eq!(objective.nyn(), 4);
        assert!(objective.has_least_squares());
        assert!(!objective.has_general_terms());
    }

    #[test]
    fn test_ocp_from_toml() {
        let ocp: Ocp = toml::from_str(
            r#"
horizon = 10

[dimensions]
nx = 3
nu = 2

[objective.least_squares]
ny = 5
weighting = "once_per_node"
"#,
        )
        .unwrap();

        assert_eq!(ocp.horizon, 10);
        assert_eq!(ocp.dimensions.nxa, 0);
        assert_eq!(ocp.model.rhs_function, "acado_rhs");
        assert_eq!(
            ocp.objective.least_squares.unwrap().weighting,
            WeightingMatricesType::OncePerNode
        );
    }
}
