//! Template-based artifacts
//!
//! - [`emitter`] - template resources and the stateless emitter
//! - [`auxiliary`] - auxiliary functions shipped with every solver
//! - [`regularization`] - Hessian regularization of exact-Hessian solvers
//! - [`simulink`] - Simulink S-function interface

pub mod auxiliary;
pub mod emitter;
pub mod regularization;
pub mod simulink;

pub use auxiliary::AuxiliaryFunctions;
pub use emitter::{module_substitutions, Substitutions, TemplateEmitter, TemplateKey};
pub use regularization::{HessianRegularization, DEFAULT_REGULARIZATION_FLOOR};
pub use simulink::SimulinkInterface;
