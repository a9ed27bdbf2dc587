//! Generated Runge-Kutta integrators
//!
//! - [`tableau`] - Butcher tableaux of the supported schemes
//! - [`runge_kutta`] - the integrator collaborator emitting `<module>_integrate`
//! - [`linear_solver`] - LU solvers for the stage systems of implicit schemes
//! - [`registry`] - integrator type to constructor mapping

pub mod linear_solver;
pub mod registry;
pub mod runge_kutta;
pub mod tableau;

pub use registry::IntegratorRegistry;
pub use runge_kutta::{IntegratorLink, RungeKuttaExport};
pub use tableau::ButcherTableau;
