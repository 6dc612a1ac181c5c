//! Structured diagnostic messages with severity, codes and locations.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use xnet_common::SourceLocation;

/// A structured diagnostic message.
///
/// Each diagnostic names the offending net, gate or model in its message and
/// points at the model it was raised for, which is as precise as the lowering
/// core gets: it never sees individual source lines of gate declarations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// Where the affected model (or macro instance) was declared.
    pub location: SourceLocation,
    /// Additional context lines (e.g. the other driver of a net).
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn with_severity(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location,
            notes: Vec::new(),
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, location: SourceLocation) -> Self {
        Self::with_severity(Severity::Error, code, message, location)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(
        code: DiagnosticCode,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self::with_severity(Severity::Warning, code, message, location)
    }

    /// Creates a new informational note.
    pub fn note(code: DiagnosticCode, message: impl Into<String>, location: SourceLocation) -> Self {
        Self::with_severity(Severity::Note, code, message, location)
    }

    /// Adds a note line to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn create_error() {
        let code = DiagnosticCode::new(Category::Design, 101);
        let diag = Diagnostic::error(code, "global signal clk has multiple drivers", SourceLocation::new("a.blif", 1));
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.code.to_string(), "D101");
        assert_eq!(diag.location.file, "a.blif");
    }

    #[test]
    fn create_warning_and_note() {
        let code = DiagnosticCode::new(Category::Macro, 1);
        let warn = Diagnostic::warning(code, "open drain", SourceLocation::unknown());
        let note = Diagnostic::note(code, "unused", SourceLocation::unknown());
        assert_eq!(warn.severity, Severity::Warning);
        assert_eq!(note.severity, Severity::Note);
    }

    #[test]
    fn notes_accumulate() {
        let code = DiagnosticCode::new(Category::Design, 101);
        let diag = Diagnostic::error(code, "multiple drivers", SourceLocation::unknown())
            .with_note("model blinker also drives led")
            .with_note("second note");
        assert_eq!(diag.notes.len(), 2);
        assert_eq!(diag.notes[0], "model blinker also drives led");
    }
}
