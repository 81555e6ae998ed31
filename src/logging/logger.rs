//! Structured logger with summary collection.
use std::sync::Mutex;

use super::STAGE_TARGET;
use super::types::{Log, ServiceEntry, ServiceStatus};

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
///
/// `record_service` is **not** included because its signature differs from
/// the `fn(&self, &str)` pattern shared by the display methods.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Logger that writes through `tracing` and collects per-service results for
/// the end-of-run summary.
#[derive(Debug, Default)]
pub struct Logger {
    services: Mutex<Vec<ServiceEntry>>,
}

impl Logger {
    /// Create a new logger with an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Record a service result for the summary.
    pub fn record_service(&self, entry: ServiceEntry) {
        if let Ok(mut guard) = self.services.lock() {
            guard.push(entry);
        }
    }

    /// Return a clone of all recorded service entries.
    #[must_use]
    pub fn service_entries(&self) -> Vec<ServiceEntry> {
        self.services.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Number of services whose pipeline aborted.
    #[cfg(test)]
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.services.lock().map_or(0, |g| {
            g.iter()
                .filter(|e| e.status == ServiceStatus::Failed)
                .count()
        })
    }

    /// Log the summary of all recorded services.
    pub fn print_summary(&self) {
        let entries = self.service_entries();
        if entries.is_empty() {
            return;
        }

        self.stage("Summary");
        for line in summary_lines(&entries) {
            match line.status {
                ServiceStatus::Ok => self.info(&line.text),
                ServiceStatus::Partial => self.warn(&line.text),
                ServiceStatus::Failed => self.error(&line.text),
            }
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error);

    fn record_service(&self, entry: ServiceEntry) {
        self.record_service(entry);
    }
}

/// One rendered summary line.
#[derive(Debug, PartialEq, Eq)]
struct SummaryLine {
    status: ServiceStatus,
    text: String,
}

fn summary_lines(entries: &[ServiceEntry]) -> Vec<SummaryLine> {
    let mut lines: Vec<SummaryLine> = entries
        .iter()
        .map(|entry| {
            let label = match entry.status {
                ServiceStatus::Ok => "ok",
                ServiceStatus::Partial => "partial",
                ServiceStatus::Failed => "failed",
            };
            let suffix = entry
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            SummaryLine {
                status: entry.status,
                text: format!("{}: {label}{suffix}", entry.name),
            }
        })
        .collect();

    let count = |status| entries.iter().filter(|e| e.status == status).count();
    lines.push(SummaryLine {
        status: ServiceStatus::Ok,
        text: format!(
            "{} services: {} ok, {} partial, {} failed",
            entries.len(),
            count(ServiceStatus::Ok),
            count(ServiceStatus::Partial),
            count(ServiceStatus::Failed),
        ),
    });
    lines
}

/// A [`Log`] wrapper that prefixes every line with `[scope]`.
///
/// Used for the per-service steps of a deployment so that interleaved
/// output can be attributed to the service that produced it.
pub struct ScopedLog<'a> {
    inner: &'a dyn Log,
    scope: String,
}

impl std::fmt::Debug for ScopedLog<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedLog")
            .field("inner", &"<dyn Log>")
            .field("scope", &self.scope)
            .finish()
    }
}

impl<'a> ScopedLog<'a> {
    /// Wrap `inner`, prefixing messages with `[scope]`.
    #[must_use]
    pub fn new(inner: &'a dyn Log, scope: &str) -> Self {
        Self {
            inner,
            scope: scope.to_string(),
        }
    }

    fn prefixed(&self, msg: &str) -> String {
        format!("[{}] {msg}", self.scope)
    }
}

impl Log for ScopedLog<'_> {
    fn stage(&self, msg: &str) {
        self.inner.stage(&self.prefixed(msg));
    }

    fn info(&self, msg: &str) {
        self.inner.info(&self.prefixed(msg));
    }

    fn debug(&self, msg: &str) {
        self.inner.debug(&self.prefixed(msg));
    }

    fn warn(&self, msg: &str) {
        self.inner.warn(&self.prefixed(msg));
    }

    fn error(&self, msg: &str) {
        self.inner.error(&self.prefixed(msg));
    }

    fn record_service(&self, entry: ServiceEntry) {
        self.inner.record_service(entry);
    }
}
