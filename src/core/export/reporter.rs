//! Progress reporting of an export
//!
//! The export pipeline never prints directly. Banners, dimension reports and
//! warnings go through a [`Reporter`] so that callers decide where they end up.

/// Sink of user-facing export messages
pub trait Reporter {
    /// Start-of-run banner
    fn banner(&self, message: &str);

    /// Informational message
    fn info(&self, message: &str);

    /// A non-fatal condition; the affected artifact was skipped
    fn warning(&self, message: &str);
}

/// Forwards every message to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn banner(&self, message: &str) {
        tracing::info!(banner = true, "{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warning(&self, message: &str) {
        tracing::warn!("{message}");
    }
}
