//! Verification of exported artifacts
//!
//! This module re-hashes the files listed in an export summary to detect
//! artifacts that were modified or removed after the export.

pub mod checksum;
pub mod report;
pub mod verify;

pub use report::{VerificationFailure, VerificationReport};
pub use verify::verify_artifacts;
