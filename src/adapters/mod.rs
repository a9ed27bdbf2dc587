//! Code-generating collaborators of the export pipeline.
//!
//! - [`integrator`] - Runge-Kutta integrators emitting `<module>_integrator.c`
//! - [`solver`] - NLP solver strategies emitting `<module>_solver.c`
//! - [`traits`] - the [`CodeExporter`](traits::CodeExporter) interface both implement
//!
//! # Design Pattern
//!
//! Collaborators are selected by factories over closed option enums and are
//! only driven through the [`CodeExporter`](traits::CodeExporter) trait plus a
//! few typed dimension queries, so the export coordinator never depends on a
//! concrete strategy.
//!
//! ```rust
//! use ocpgen::adapters::solver::{select_solver, SolverKind};
//! use ocpgen::config::{HessianApproximation, QpSolver, SparseQpSolution};
//!
//! let kind = select_solver(
//!     QpSolver::QpDunes,
//!     SparseQpSolution::SparseSolver,
//!     HessianApproximation::ExactHessian,
//! )
//! .unwrap();
//! assert_eq!(kind, SolverKind::ExactHessianQpDunes);
//! ```

pub mod integrator;
pub mod solver;
pub mod traits;

pub use traits::CodeExporter;
