//! Export orchestration
//!
//! This module provides the export pipeline of ocpgen:
//! - [`coordinator`] - sequencing of one export and artifact selection
//! - [`header`] - synthesis of the common header
//! - [`reporter`] - user-facing messages of an export
//! - [`summary`] - record of written artifacts and warnings

pub mod coordinator;
pub mod header;
pub mod reporter;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use header::CommonHeader;
pub use reporter::{Reporter, TracingReporter};
pub use summary::{ArtifactKind, ArtifactRecord, ExportSummary, GenerationMethod};
