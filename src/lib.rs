// ocpgen - Code Generation for Optimal Control Solvers
// Copyright (c) 2025 ocpgen Contributors
// Licensed under the MIT License

//! # ocpgen - Code Generation for Optimal Control Solvers
//!
//! ocpgen turns the description of an optimal control problem into a
//! self-contained set of C sources implementing a real-time iteration solver
//! for it, plus optional build files, a test program and MATLAB/Simulink
//! interfaces.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Validation, component resolution, template emission and
//!   export orchestration
//! - [`adapters`] - The integrator and solver exporters the session binds
//! - [`codegen`] - C declarations and generated source files
//! - [`domain`] - Problem description, module names and errors
//! - [`config`] - Project files and export options
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ocpgen::config::ProjectConfig;
//! use ocpgen::core::export::ExportCoordinator;
//! use ocpgen::core::resolve::ExportSession;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ocpgen::config::load_config("ocpgen.toml")?;
//!     let session = ExportSession::new(config.ocp, config.options);
//!
//!     let mut coordinator = ExportCoordinator::new(session)?;
//!     let summary = coordinator.export_code(Path::new("export"), "real_t", "int", 16)?;
//!
//!     println!("Wrote {} files", summary.artifacts.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Export Session
//!
//! A session resolves exactly one integrator and one solver from the export
//! options. Resolution is all-or-nothing: a session that failed to resolve
//! stays uninitialized and can be inspected or retried.
//!
//! ```rust,no_run
//! use ocpgen::config::ExportOptions;
//! use ocpgen::core::resolve::{ExportSession, SessionStatus};
//! use ocpgen::domain::{Dimensions, Ocp};
//!
//! # fn example() -> ocpgen::domain::Result<()> {
//! let ocp = Ocp::new(20, Dimensions { nx: 4, nu: 1, ..Dimensions::default() });
//! let mut session = ExportSession::new(ocp, ExportOptions::default());
//!
//! let plan = session.setup()?;
//! println!("QP variables: {}", plan.constants().qp_nv);
//! assert_eq!(session.status(), SessionStatus::Ready);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All library functions return [`domain::Result`]. Validation and
//! resolution failures keep their own kind; failures while writing an
//! artifact are wrapped into [`domain::GeneratorError::UnableToExport`].
//!
//! ```rust,no_run
//! use ocpgen::domain::GeneratorError;
//!
//! fn example() -> Result<(), GeneratorError> {
//!     let config = ocpgen::config::load_config("ocpgen.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! ocpgen uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(module = "acado", "Starting export");
//! warn!("FORCES is not supported by the Simulink interface");
//! ```

pub mod adapters;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
