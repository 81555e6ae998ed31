//! Core logging types: service entries, status, and the [`Log`] trait.

/// Deployment result for one service, kept for the run summary.
#[derive(Debug, Clone)]
pub struct ServiceEntry {
    /// Service name as configured.
    pub name: String,
    /// Final status of the service.
    pub status: ServiceStatus,
    /// Optional detail (failed steps or the fatal error).
    pub message: Option<String>,
}

/// Status of a deployed service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    /// Every step succeeded.
    Ok,
    /// The pipeline completed but one or more external commands failed.
    Partial,
    /// The pipeline aborted.
    Failed,
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) writes through `tracing`;
/// [`ScopedLog`](super::logger::ScopedLog) wraps another backend and prefixes
/// every line with a service name.
#[cfg_attr(test, mockall::automock)]
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (suppressed on console unless verbose).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Record a service result for the summary.
    fn record_service(&self, entry: ServiceEntry);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_status_equality() {
        assert_eq!(ServiceStatus::Ok, ServiceStatus::Ok);
        assert_ne!(ServiceStatus::Ok, ServiceStatus::Partial);
        assert_ne!(ServiceStatus::Partial, ServiceStatus::Failed);
    }
}
