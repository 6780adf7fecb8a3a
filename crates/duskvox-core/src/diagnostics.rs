//! Host-facing diagnostics port.
//!
//! The pipeline reports resource problems (out of memory, unreadable input)
//! through an injectable sink instead of a process-wide callback. Fatal
//! severity is advisory classification for the host; the pipeline itself
//! never aborts.

use std::fmt;

/// What subsystem a diagnostic message concerns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// CPU-side memory usage
    CpuMemory,
    /// GPU-side memory usage
    GpuMemory,
    /// Shader compilation
    Shader,
    /// File I/O
    FileIo,
}

/// How serious a diagnostic message is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Purely informative, no error has occurred
    Note,
    /// An error occurred, but the pipeline can continue
    Error,
    /// The host will likely not be able to continue; advisory only
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Note => write!(f, "note"),
            Self::Error => write!(f, "error"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

/// Receiver for diagnostic reports.
///
/// Configured on a `Volume` or importer at construction. The default is
/// [`NullSink`], which discards everything.
pub trait DiagnosticsSink {
    /// Receive one diagnostic report.
    fn report(&self, category: Category, severity: Severity, message: &str);
}

/// Sink that discards all reports. The documented default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn report(&self, _category: Category, _severity: Severity, _message: &str) {}
}

/// Sink that forwards reports to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&self, category: Category, severity: Severity, message: &str) {
        match severity {
            Severity::Note => tracing::info!(?category, "{message}"),
            Severity::Error => tracing::error!(?category, "{message}"),
            Severity::Fatal => tracing::error!(?category, severity = %severity, "{message}"),
        }
    }
}

impl<S: DiagnosticsSink + ?Sized> DiagnosticsSink for &S {
    fn report(&self, category: Category, severity: Severity, message: &str) {
        (**self).report(category, severity, message);
    }
}

impl<S: DiagnosticsSink + ?Sized> DiagnosticsSink for std::sync::Arc<S> {
    fn report(&self, category: Category, severity: Severity, message: &str) {
        (**self).report(category, severity, message);
    }
}
