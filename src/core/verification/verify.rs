//! Verification of exported artifacts
//!
//! Re-hashes every file listed in an export summary and compares it with the
//! checksum recorded at export time.

use crate::core::export::ExportSummary;
use crate::core::verification::checksum::file_checksum;
use crate::core::verification::report::{VerificationFailure, VerificationReport};
use std::time::Instant;

/// Verify the artifacts of an export summary
///
/// Missing or unreadable files count as failures; the report is returned in
/// every case.
///
/// # Examples
///
/// ```no_run
/// use ocpgen::core::export::ExportSummary;
/// use ocpgen::core::verification::verify_artifacts;
///
/// # fn example(summary: &ExportSummary) {
/// let report = verify_artifacts(summary);
/// println!("{}", report.format_summary());
/// # }
/// ```
pub fn verify_artifacts(summary: &ExportSummary) -> VerificationReport {
    let start = Instant::now();
    let mut report = VerificationReport::new();

    tracing::info!(
        artifacts = summary.artifacts.len(),
        "Starting artifact verification"
    );

    for artifact in &summary.artifacts {
        match file_checksum(&artifact.path) {
            Ok(actual) if actual == artifact.sha256 => report.record_pass(),
            Ok(actual) => report.record_failure(VerificationFailure {
                path: artifact.path.clone(),
                expected_checksum: artifact.sha256.clone(),
                actual_checksum: Some(actual),
                reason: "Checksum mismatch".to_string(),
            }),
            Err(e) => report.record_failure(VerificationFailure {
                path: artifact.path.clone(),
                expected_checksum: artifact.sha256.clone(),
                actual_checksum: None,
                reason: format!("File could not be read: {e}"),
            }),
        }
    }

    report.set_duration(start.elapsed().as_millis() as u64);

    if report.is_success() {
        tracing::info!(
            passed = report.passed,
            duration_ms = report.duration_ms,
            "Verification completed"
        );
    } else {
        for failure in &report.failures {
            tracing::warn!(
                path = %failure.path.display(),
                reason = %failure.reason,
                "Verification failure"
            );
        }
    }

    report
}
