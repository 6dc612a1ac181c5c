//! Diagnostic accumulator shared by every lowering stage.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Reported {
    diagnostics: Vec<Diagnostic>,
    errors: usize,
}

/// Collects the diagnostics of one translation run.
///
/// Stages only hold a shared reference, so reporting goes through interior
/// mutability. The error count survives [`take_all`](DiagnosticSink::take_all)
/// so a front end can print and drain diagnostics between models and still
/// refuse to write a design with errors.
#[derive(Default)]
pub struct DiagnosticSink {
    reported: Mutex<Reported>,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Reported> {
        self.reported
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        let mut reported = self.lock();
        if diag.severity.is_error() {
            reported.errors += 1;
        }
        reported.diagnostics.push(diag);
    }

    /// Whether an error was ever emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Number of errors emitted so far, including drained ones.
    pub fn error_count(&self) -> usize {
        self.lock().errors
    }

    /// Number of pending diagnostics of exactly `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.lock()
            .diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Drains the pending diagnostics in emission order.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.lock().diagnostics)
    }

    /// Copies the pending diagnostics in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().diagnostics.clone()
    }
}
