//! Domain error types
//!
//! This module defines the error hierarchy for ocpgen. Validation and
//! resolution failures carry the exact kind the export pipeline reports, and
//! every failure during artifact emission is wrapped into a single
//! [`GeneratorError::UnableToExport`] naming the artifact that failed.

use thiserror::Error;

/// Main ocpgen error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// An OCP/option combination the generator cannot support
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// An option holds a value outside the set supported for export
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// The objective cannot be expressed by the generated solver
    #[error("Invalid objective for code export: {0}")]
    InvalidObjectiveForExport(String),

    /// A fatal failure while writing one of the generated artifacts
    #[error("Unable to export {artifact}: {source}")]
    UnableToExport {
        /// Artifact that was being produced
        artifact: String,
        /// Underlying cause
        #[source]
        source: Box<GeneratorError>,
    },

    /// A feature exists in the option set but is not implemented for export
    #[error("Not implemented yet: {0}")]
    NotImplemented(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GeneratorError {
    /// Wraps this error as the failure of producing `artifact`
    ///
    /// Already wrapped errors are returned unchanged so the outermost
    /// artifact name is the one that failed first.
    pub fn while_exporting(self, artifact: impl Into<String>) -> Self {
        match self {
            wrapped @ GeneratorError::UnableToExport { .. } => wrapped,
            other => GeneratorError::UnableToExport {
                artifact: artifact.into(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the innermost error, skipping export wrappers
    pub fn root_cause(&self) -> &GeneratorError {
        match self {
            GeneratorError::UnableToExport { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether this error was raised before any artifact content was produced
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self.root_cause(),
            GeneratorError::InvalidArguments(_)
                | GeneratorError::InvalidOption(_)
                | GeneratorError::InvalidObjectiveForExport(_)
                | GeneratorError::Configuration(_)
        )
    }
}

impl From<std::io::Error> for GeneratorError {
    fn from(err: std::io::Error) -> Self {
        GeneratorError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for GeneratorError {
    fn from(err: serde_json::Error) -> Self {
        GeneratorError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for GeneratorError {
    fn from(err: toml::de::Error) -> Self {
        GeneratorError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_error_display() {
        let err = GeneratorError::InvalidOption("hessian_approximation".to_string());
        assert_eq!(err.to_string(), "Invalid option: hessian_approximation");
    }

    #[test]
    fn test_while_exporting_wraps_once() {
        let err = GeneratorError::Io("disk full".to_string())
            .while_exporting("acado_solver.c")
            .while_exporting("acado_common.h");

        match &err {
            GeneratorError::UnableToExport { artifact, .. } => {
                assert_eq!(artifact, "acado_solver.c")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(err.root_cause(), GeneratorError::Io(_)));
    }

    #[test]
    fn test_configuration_error_classification() {
        let err = GeneratorError::InvalidArguments("nui > 0".to_string()).while_exporting("x");
        assert!(err.is_configuration_error());

        let err = GeneratorError::Io("denied".to_string());
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: GeneratorError = io_err.into();
        assert!(matches!(err, GeneratorError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: GeneratorError = toml_err.into();
        assert!(matches!(err, GeneratorError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_generator_error_implements_std_error() {
        let err = GeneratorError::NotImplemented("mex".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
