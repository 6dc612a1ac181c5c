//! Common result and error types for the translator.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates a bug in the translator, not a problem with the input
/// netlist. Problems with the input are reported as `LowerError`s or through
/// the diagnostic sink.
pub type XnetResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in the translator, not a user input problem.
#[derive(Debug, thiserror::Error)]
#[error("internal translator error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
