//! Result type alias for ocpgen

use super::errors::GeneratorError;

/// Result type alias for ocpgen operations
///
/// # Examples
///
/// ```
/// use ocpgen::domain::result::Result;
/// use ocpgen::domain::errors::GeneratorError;
///
/// fn failing_function() -> Result<()> {
///     Err(GeneratorError::InvalidOption("integrator_type".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, GeneratorError>;
