//! Resolved export plan
//!
//! The plan owns the bound integrator and solver and the constants derived
//! from them. Every artifact of one export is generated from the same plan.

use crate::adapters::integrator::RungeKuttaExport;
use crate::adapters::solver::{BlockCondensing, BoundCounts, SolverExport};
use crate::config::{ExportOptions, QpSolver};
use crate::domain::{Dimensions, ModuleName, Ocp, WeightingMatricesType};
use serde::Serialize;
use std::collections::BTreeMap;

/// Prefix of the common header constants; independent of the module name so
/// downstream build files can rely on `ACADO_N`, `ACADO_NX`, ...
pub const HEADER_CONSTANT_PREFIX: &str = "ACADO";

/// A named constant of the common header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderConstant {
    /// Rendered value
    pub value: String,
    /// One-line description
    pub description: &'static str,
}

/// Configuration-derived values shared by all generated artifacts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharedConstants {
    /// Module name
    pub module: ModuleName,
    /// QP backend
    pub qp_solver: QpSolver,
    /// Horizon length
    pub horizon: usize,
    /// Model dimensions
    pub dimensions: Dimensions,
    /// References per node on the first N nodes
    pub ny: usize,
    /// References on the terminal node
    pub nyn: usize,
    /// Integrator steps per shooting interval, only for equidistant grids
    pub rk_nis: Option<usize>,
    /// Runge-Kutta stages per step
    pub rk_nstages: usize,
    /// Whether the initial state is fixed
    pub initial_state_fixed: bool,
    /// Weighting matrix type
    pub weighting_matrices_type: WeightingMatricesType,
    /// Whether linear objective terms are used
    pub uses_linear_terms: bool,
    /// Whether constraint values are hard-coded
    pub hardcoded_constraint_values: bool,
    /// Whether the arrival cost interface is provided
    pub use_arrival_cost: bool,
    /// Whether the covariance matrix is computed
    pub compute_covariance_matrix: bool,
    /// Number of QP variables
    pub qp_nv: usize,
    /// Number of path and point constraints
    pub complex_constraints: usize,
    /// Bound counts of a sparse FORCES QP
    pub bounds: Option<BoundCounts>,
    /// Block structure of a block-condensed QP
    pub block_condensing: Option<BlockCondensing>,
    /// Whether generated code uses single precision
    pub single_precision: bool,
    /// Whether generated code needs complex arithmetic
    pub complex_arithmetic: bool,
}

impl SharedConstants {
    /// Collects the constants of a bound integrator and solver
    pub fn collect(
        ocp: &Ocp,
        options: &ExportOptions,
        integrator: &RungeKuttaExport,
        solver: &SolverExport,
    ) -> Self {
        let rk_nis = ocp
            .has_equidistant_control_grid()
            .then(|| integrator.steps_per_interval())
            .flatten();

        Self {
            module: options.module_name.clone(),
            qp_solver: options.qp_solver,
            horizon: ocp.horizon,
            dimensions: ocp.dimensions,
            ny: solver.ny(),
            nyn: solver.nyn(),
            rk_nis,
            rk_nstages: integrator.stage_count(),
            initial_state_fixed: options.fix_initial_state,
            weighting_matrices_type: solver.weighting_matrices_type(),
            uses_linear_terms: solver.uses_linear_terms(),
            hardcoded_constraint_values: options.hardcode_constraint_values,
            use_arrival_cost: options.use_arrival_cost,
            compute_covariance_matrix: options.compute_covariance_matrix,
            qp_nv: solver.num_qp_vars(),
            complex_constraints: solver.num_complex_constraints(),
            bounds: solver.as_bound_counts(),
            block_condensing: solver.as_block_condensing(),
            single_precision: options.use_single_precision,
            complex_arithmetic: integrator.uses_complex_arithmetic(),
        }
    }

    /// Named constants of the common header, keyed by full macro name
    pub fn header_constants(&self) -> BTreeMap<String, HeaderConstant> {
        let mut constants = BTreeMap::new();
        let mut put = |name: &str, value: String, description: &'static str| {
            constants.insert(
                format!("{HEADER_CONSTANT_PREFIX}_{name}"),
                HeaderConstant { value, description },
            );
        };
        let flag = |b: bool| u8::from(b).to_string();
        let dims = self.dimensions;

        put("N", self.horizon.to_string(), "Number of control/estimation intervals.");
        put("NX", dims.nx.to_string(), "Number of differential variables.");
        put("NXD", dims.ndx.to_string(), "Number of differential derivative variables.");
        put("NXA", dims.nxa.to_string(), "Number of algebraic variables.");
        put("NU", dims.nu.to_string(), "Number of control variables.");
        put("NOD", dims.nod.to_string(), "Number of online data values.");
        put("NY", self.ny.to_string(), "Number of references/measurements per node on the first N nodes.");
        put("NYN", self.nyn.to_string(), "Number of references/measurements on the last (N + 1)st node.");
        if let Some(nis) = self.rk_nis {
            put("RK_NIS", nis.to_string(), "Number of integration steps per shooting interval.");
        }
        put("RK_NSTAGES", self.rk_nstages.to_string(), "Number of Runge-Kutta stages per integration step.");
        put("INITIAL_STATE_FIXED", flag(self.initial_state_fixed), "Indicator for fixed initial state.");
        put(
            "WEIGHTING_MATRICES_TYPE",
            self.weighting_matrices_type.indicator().to_string(),
            "Indicator for type of fixed weighting matrices.",
        );
        put(
            "USE_LINEAR_TERMS",
            flag(self.uses_linear_terms),
            "Indicator for usage of non-hard-coded linear terms in the objective.",
        );
        put(
            "HARDCODED_CONSTRAINT_VALUES",
            flag(self.hardcoded_constraint_values),
            "Flag indicating whether constraint values are hard-coded or not.",
        );
        put("USE_ARRIVAL_COST", flag(self.use_arrival_cost), "Providing interface for arrival cost.");
        put(
            "COMPUTE_COVARIANCE_MATRIX",
            flag(self.compute_covariance_matrix),
            "Compute covariance matrix of the last state estimate.",
        );
        put("QP_NV", self.qp_nv.to_string(), "Total number of QP optimization variables.");

        if let Some(bounds) = self.bounds {
            put("QP_NLB", bounds.lower.to_string(), "Total number of QP lower bound values.");
            put("QP_NUB", bounds.upper.to_string(), "Total number of QP upper bound values.");
        }

        match self.block_condensing {
            Some(block) => {
                put("BLOCK_CONDENSING", "1".to_string(), "User defined block based condensing.");
                put(
                    "QP_NCA",
                    (block.state_bounds_per_block * block.block_count).to_string(),
                    "Total number of QP affine constraints.",
                );
            }
            None => put("BLOCK_CONDENSING", "0".to_string(), "User defined block based condensing."),
        }

        constants
    }
}

/// Result of a successful resolution
#[derive(Debug, Clone)]
pub struct ResolvedPlan {
    integrator: RungeKuttaExport,
    solver: SolverExport,
    constants: SharedConstants,
}

impl ResolvedPlan {
    pub(crate) fn new(integrator: RungeKuttaExport, solver: SolverExport, constants: SharedConstants) -> Self {
        Self {
            integrator,
            solver,
            constants,
        }
    }

    /// Bound integrator
    pub fn integrator(&self) -> &RungeKuttaExport {
        &self.integrator
    }

    /// Bound solver
    pub fn solver(&self) -> &SolverExport {
        &self.solver
    }

    /// Shared constants
    pub fn constants(&self) -> &SharedConstants {
        &self.constants
    }
}
