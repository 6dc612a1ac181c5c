//! Source locations attached to models and diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The position of a declaration in the source netlist.
///
/// The lowering core never reads source text itself; locations are handed
/// over by the parser so that diagnostics can point back at the model that
/// caused them.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Name of the file the declaration came from.
    pub file: String,
    /// 1-based line number, or 0 if unknown.
    pub line: u32,
}

impl SourceLocation {
    /// A location for generated or synthetic input with no source file.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Creates a location pointing at `line` in `file`.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.file.is_empty(), self.line) {
            (true, _) => write!(f, "<unknown>"),
            (false, 0) => write!(f, "{}", self.file),
            (false, line) => write!(f, "{}:{line}", self.file),
        }
    }
}
