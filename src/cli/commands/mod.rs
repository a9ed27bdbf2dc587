//! CLI command implementations
//!
//! Every command returns its process exit code:
//! 0 success, 2 configuration error, 3 validation error, 5 fatal error.

pub mod export;
pub mod init;
pub mod plan;
pub mod validate;

use crate::domain::GeneratorError;

/// Exit code for a failed command
pub fn exit_code(error: &GeneratorError) -> i32 {
    match error.root_cause() {
        GeneratorError::Configuration(_) => 2,
        GeneratorError::InvalidArguments(_)
        | GeneratorError::InvalidOption(_)
        | GeneratorError::InvalidObjectiveForExport(_)
        | GeneratorError::NotImplemented(_) => 3,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&GeneratorError::Configuration("x".into())), 2);
        assert_eq!(exit_code(&GeneratorError::InvalidOption("x".into())), 3);
        assert_eq!(exit_code(&GeneratorError::Io("x".into())), 5);
    }

    #[test]
    fn test_exit_code_looks_through_export_wrapper() {
        let error = GeneratorError::NotImplemented("mex".into()).while_exporting("MEX interface");
        assert_eq!(exit_code(&error), 3);

        let error = GeneratorError::Io("disk full".into()).while_exporting("Makefile");
        assert_eq!(exit_code(&error), 5);
    }
}
