//! Generated NLP solvers
//!
//! - [`kind`] - the closed set of solver strategies
//! - [`factory`] - option combination to strategy decision table
//! - [`export`] - the solver collaborator emitting `<module>_solver.c`

pub mod export;
pub mod factory;
pub mod kind;

pub use export::{BlockCondensing, BoundCounts, SolverDimensions, SolverExport};
pub use factory::{create_solver, select_solver};
pub use kind::{QpLayout, SolverKind};
