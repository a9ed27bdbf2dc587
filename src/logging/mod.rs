//! Logging and observability
//!
//! Structured logging through `tracing`, with optional JSON file output.
//!
//! # Example
//!
//! ```no_run
//! use ocpgen::logging::init_logging;
//! use ocpgen::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the completion of an export
///
/// # Example
///
/// ```no_run
/// use ocpgen::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!("acado", 12, Duration::from_millis(40));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($module:expr, $artifacts:expr, $duration:expr) => {
        tracing::info!(
            module = %$module,
            artifacts = $artifacts,
            duration_ms = $duration.as_millis() as u64,
            "Export completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use ocpgen::log_error_with_context;
/// use ocpgen::domain::GeneratorError;
///
/// let error = GeneratorError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
