//! Core export logic of ocpgen.
//!
//! # Modules
//!
//! - [`validation`] - Consistency checks of a problem against the export options
//! - [`resolve`] - Selection of the integrator and solver strategies
//! - [`templates`] - Template rendering and the fixed-content artifacts
//! - [`export`] - Orchestration of a full export session
//! - [`verification`] - Checksum verification of exported artifacts
//!
//! # Export Workflow
//!
//! 1. **Validate**: reject problems the generated solver cannot handle
//! 2. **Resolve**: pick and configure the integrator and solver exporters
//! 3. **Emit**: write the common header, the collaborator sources and the
//!    optional auxiliary artifacts
//! 4. **Verify** (optional): re-hash the artifacts listed in the summary
//!
//! # Example
//!
//! ```rust,no_run
//! use ocpgen::config::load_config;
//! use ocpgen::core::export::ExportCoordinator;
//! use ocpgen::core::resolve::ExportSession;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ocpgen.toml")?;
//! let session = ExportSession::new(config.ocp, config.options);
//!
//! let mut coordinator = ExportCoordinator::new(session)?;
//! let summary = coordinator.export_code(
//!     std::path::Path::new(&config.output.folder),
//!     &config.output.real_type,
//!     &config.output.int_type,
//!     config.output.precision,
//! )?;
//!
//! println!("Artifacts: {}", summary.artifacts.len());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod resolve;
pub mod templates;
pub mod validation;
pub mod verification;
