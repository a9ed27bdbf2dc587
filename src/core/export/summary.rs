//! Export summary and reporting
//!
//! Every artifact written by an export is recorded with its kind and SHA-256
//! checksum. The summary serializes to JSON for `export --report` and is the
//! input of [`crate::core::verification::verify_artifacts`].

use crate::core::verification::checksum::file_checksum;
use crate::domain::{ModuleName, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How an artifact is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    /// Body emitted by a collaborator into a source file sink
    Collaborator,
    /// Copied from a template resource
    TemplateCopy,
    /// Synthesized from the declarations of all collaborators
    HeaderSynthesis,
}

/// Kind of a generated artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    CommonHeader,
    IntegratorSource,
    SolverSource,
    AuxiliaryFunctions,
    Makefile,
    TestFile,
    MexInterface,
    SimulinkInterface,
    HessianRegularization,
}

impl ArtifactKind {
    /// Generation method of this kind
    pub fn method(self) -> GenerationMethod {
        match self {
            ArtifactKind::CommonHeader => GenerationMethod::HeaderSynthesis,
            ArtifactKind::IntegratorSource | ArtifactKind::SolverSource => {
                GenerationMethod::Collaborator
            }
            _ => GenerationMethod::TemplateCopy,
        }
    }
}

/// One written file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Destination path
    pub path: PathBuf,

    /// Artifact kind
    pub kind: ArtifactKind,

    /// How the file was produced
    pub method: GenerationMethod,

    /// Hex SHA-256 of the file contents
    pub sha256: String,

    /// File size in bytes
    pub bytes: u64,
}

/// Summary of one export run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSummary {
    /// Module name of the exported solver
    pub module: ModuleName,

    /// When the export started
    pub started_at: DateTime<Utc>,

    /// Duration of the export
    #[serde(with = "duration_ms")]
    pub duration: Duration,

    /// Files written, in order
    pub artifacts: Vec<ArtifactRecord>,

    /// Non-fatal conditions, one per skipped artifact
    pub warnings: Vec<String>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(module: ModuleName) -> Self {
        Self {
            module,
            started_at: Utc::now(),
            duration: Duration::from_secs(0),
            artifacts: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Records a written file, hashing its current contents
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read
    pub fn record(&mut self, kind: ArtifactKind, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let bytes = fs::metadata(&path)?.len();
        let sha256 = file_checksum(&path)?;
        self.artifacts.push(ArtifactRecord {
            path,
            kind,
            method: kind.method(),
            sha256,
            bytes,
        });
        Ok(())
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Records of one kind
    pub fn artifacts_of(&self, kind: ArtifactKind) -> impl Iterator<Item = &ArtifactRecord> {
        self.artifacts.iter().filter(move |a| a.kind == kind)
    }

    /// Whether a file was written to `path`
    pub fn contains_path(&self, path: &Path) -> bool {
        self.artifacts.iter().any(|a| a.path == path)
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the JSON report to `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be serialized or written
    pub fn write_report(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Log the summary
    pub fn log_summary(&self) {
        crate::log_export_complete!(self.module, self.artifacts.len(), self.duration);

        for warning in &self.warnings {
            tracing::warn!(message = %warning, "Artifact skipped");
        }
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_summary_creation() {
        let summary = ExportSummary::new(ModuleName::default());

        assert_eq!(summary.module.as_str(), "acado");
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(summary.artifacts.is_empty());
        assert!(summary.warnings.is_empty());
    }

    #[test]
    fn test_record_hashes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Makefile");
        fs::write(&path, "all:\n").unwrap();

        let mut summary = ExportSummary::new(ModuleName::default());
        summary.record(ArtifactKind::Makefile, &path).unwrap();

        let record = &summary.artifacts[0];
        assert_eq!(record.bytes, 5);
        assert_eq!(record.sha256.len(), 64);
        assert_eq!(record.method, GenerationMethod::TemplateCopy);
        assert!(summary.contains_path(&path));
        assert_eq!(summary.artifacts_of(ArtifactKind::Makefile).count(), 1);
    }

    #[test]
    fn test_record_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let mut summary = ExportSummary::new(ModuleName::default());
        assert!(summary
            .record(ArtifactKind::TestFile, dir.path().join("test.c"))
            .is_err());
        assert!(summary.artifacts.is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let mut summary =
            ExportSummary::new(ModuleName::default()).with_duration(Duration::from_millis(1500));
        summary.add_warning("MEX interface is not available for HPMPC");

        let json = summary.to_json().unwrap();
        assert!(json.contains("\"duration\": 1500"));

        let parsed: ExportSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.warnings, summary.warnings);
        assert_eq!(parsed.duration, Duration::from_millis(1500));
    }

    #[test]
    fn test_generation_methods() {
        assert_eq!(ArtifactKind::CommonHeader.method(), GenerationMethod::HeaderSynthesis);
        assert_eq!(ArtifactKind::SolverSource.method(), GenerationMethod::Collaborator);
        assert_eq!(ArtifactKind::SimulinkInterface.method(), GenerationMethod::TemplateCopy);
    }
}
