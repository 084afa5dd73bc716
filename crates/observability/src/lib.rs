//! Process-wide tracing setup shared by the job board binaries.

/// Initialize logging for the process.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init();
}

/// Subscriber configuration (filter, format).
pub mod tracing;
