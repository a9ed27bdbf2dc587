//! Configuration management for ocpgen.
//!
//! A project file describes the optimal control problem and the export
//! options of one export session.
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [ocp]
//! horizon = 20
//!
//! [ocp.dimensions]
//! nx = 4
//! nu = 1
//!
//! [ocp.objective.least_squares]
//! ny = 5
//!
//! [ocp.objective.terminal_least_squares]
//! ny = 4
//!
//! [options]
//! module_name = "acado"
//! qp_solver = "qpoases"
//! sparse_qp_solution = "full_condensing_n2"
//! hessian_approximation = "gauss_newton"
//! integrator_type = "rk4"
//!
//! [output]
//! folder = "${OCPGEN_EXPORT_DIR}"
//! ```
//!
//! Use `${VAR_NAME}` for environment variable substitution; `OCPGEN_<SECTION>_<KEY>`
//! variables override individual values after parsing.

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, DiscretizationType, ExportOptions, HessianApproximation, IntegratorType,
    LinearSolver, LoggingConfig, OutputConfig, ProjectConfig, QpSolver, SparseQpSolution,
};
