//! Verification report structures
//!
//! This module defines the structures for reporting verification results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verification report of the artifacts of one export summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    /// When the verification was performed
    pub verified_at: DateTime<Utc>,

    /// Total number of artifacts verified
    pub total_verified: usize,

    /// Number of artifacts that passed verification
    pub passed: usize,

    /// Number of artifacts that failed verification
    pub failed: usize,

    /// List of failed verifications with details
    pub failures: Vec<VerificationFailure>,

    /// Duration of verification in milliseconds
    pub duration_ms: u64,
}

/// Details of a failed verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationFailure {
    /// Artifact path
    pub path: PathBuf,

    /// Checksum recorded at export time
    pub expected_checksum: String,

    /// Checksum of the file now, if it could be read
    pub actual_checksum: Option<String>,

    /// Reason for failure
    pub reason: String,
}

impl VerificationReport {
    /// Create a new verification report
    pub fn new() -> Self {
        Self {
            verified_at: Utc::now(),
            total_verified: 0,
            passed: 0,
            failed: 0,
            failures: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Record a successful verification
    pub fn record_pass(&mut self) {
        self.total_verified += 1;
        self.passed += 1;
    }

    /// Record a failed verification
    pub fn record_failure(&mut self, failure: VerificationFailure) {
        self.total_verified += 1;
        self.failed += 1;
        self.failures.push(failure);
    }

    /// Set the duration of verification
    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    /// Check if all verifications passed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Format the report as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str("Verification Report\n");
        summary.push_str(&format!("  Verified at: {}\n", self.verified_at));
        summary.push_str(&format!("  Duration: {} ms\n", self.duration_ms));
        summary.push_str(&format!("  Total verified: {}\n", self.total_verified));
        summary.push_str(&format!("  Passed: {}\n", self.passed));
        summary.push_str(&format!("  Failed: {}\n", self.failed));

        if !self.failures.is_empty() {
            summary.push_str("\nFailures:\n");
            for (i, failure) in self.failures.iter().enumerate() {
                summary.push_str(&format!("  {}. {}\n", i + 1, failure.path.display()));
                summary.push_str(&format!("     Reason: {}\n", failure.reason));
            }
        }

        summary
    }
}

impl Default for VerificationReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_report_new() {
        let report = VerificationReport::new();
        assert_eq!(report.total_verified, 0);
        assert_eq!(report.passed, 0);
        assert_eq!(report.failed, 0);
        assert!(report.failures.is_empty());
        assert!(report.is_success());
    }

    #[test]
    fn test_record_failure() {
        let mut report = VerificationReport::new();
        report.record_pass();
        report.record_failure(VerificationFailure {
            path: PathBuf::from("export/acado_solver.c"),
            expected_checksum: "abc123".to_string(),
            actual_checksum: Some("def456".to_string()),
            reason: "Checksum mismatch".to_string(),
        });

        assert_eq!(report.total_verified, 2);
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);
        assert!(!report.is_success());
    }

    #[test]
    fn test_format_summary() {
        let mut report = VerificationReport::new();
        report.record_pass();
        report.record_failure(VerificationFailure {
            path: PathBuf::from("export/Makefile"),
            expected_checksum: "abc123".to_string(),
            actual_checksum: None,
            reason: "File is missing".to_string(),
        });
        report.set_duration(12);

        let summary = report.format_summary();
        assert!(summary.contains("Total verified: 2"));
        assert!(summary.contains("Failed: 1"));
        assert!(summary.contains("1. export/Makefile"));
        assert!(summary.contains("Duration: 12 ms"));
    }
}
