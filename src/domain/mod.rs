//! Domain models and types for ocpgen.
//!
//! The domain layer provides:
//! - **The optimal control problem** ([`Ocp`]) consumed by the export pipeline
//! - **Strongly-typed identifiers** ([`ModuleName`])
//! - **Error types** ([`GeneratorError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use ocpgen::domain::{Dimensions, Ocp};
//!
//! let ocp = Ocp::new(20, Dimensions { nx: 4, nu: 1, ..Dimensions::default() });
//! assert!(ocp.validate().is_ok());
//! ```

pub mod errors;
pub mod ids;
pub mod ocp;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::GeneratorError;
pub use ids::ModuleName;
pub use ocp::{
    Constraints, Dimensions, LeastSquaresTerm, ModelData, Objective, Ocp, TimeGrid,
    WeightingMatricesType,
};
pub use result::Result;
