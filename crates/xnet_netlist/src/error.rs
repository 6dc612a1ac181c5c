//! Errors that abort the lowering of one model.

use xnet_naming::NamingError;

/// A fatal problem in the input design.
///
/// Each variant names the offending net, gate or instance. The converter
/// reports it as an error diagnostic and continues with the next model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    /// A source identifier cannot be encoded in the target format.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] NamingError),

    /// The target chip family lacks a required feature.
    #[error("{feature} not supported by chip family: {net}")]
    Unsupported {
        /// What was requested, e.g. `latches`.
        feature: String,
        /// The net that needed it.
        net: String,
    },

    /// A net has an explicit buffer that disagrees with the buffer a
    /// consuming macro requires.
    #[error("conflicting buffer types for {net}: declared {declared}, required {required}")]
    ConflictingBuffer {
        /// The buffered net.
        net: String,
        /// Buffer type from the model's buffer declarations.
        declared: String,
        /// Buffer type required by the macro.
        required: String,
    },

    /// A macro cell is connected or configured incorrectly.
    #[error("invalid {kind} instance {instance}: {message}")]
    InvalidMacro {
        /// Macro type name.
        kind: String,
        /// Instance name.
        instance: String,
        /// What is wrong.
        message: String,
    },

    /// Global signals of a model are already driven by earlier models.
    #[error("model {model} drives global signals driven by other models: {}", signal_list(.conflicts))]
    MultipleDrivers {
        /// The model being lowered.
        model: String,
        /// `(signal, first driving model)` for every conflict, by signal.
        conflicts: Vec<(String, String)>,
    },

    /// A model name is used twice.
    #[error("model {model} defined twice")]
    DuplicateModel {
        /// The model name.
        model: String,
    },

    /// A declared clock is also driven inside the model.
    #[error("clock {net} is driven inside model {model}")]
    DrivenClock {
        /// The clock signal.
        net: String,
        /// The model.
        model: String,
    },

    /// The part name matches no known chip family.
    #[error("unknown part {0}")]
    UnknownPart(String),
}

fn signal_list(conflicts: &[(String, String)]) -> String {
    let signals: Vec<&str> = conflicts.iter().map(|(signal, _)| signal.as_str()).collect();
    signals.join(" ")
}

impl LowerError {
    /// Shorthand for [`LowerError::InvalidMacro`].
    pub fn invalid_macro(
        kind: impl Into<String>,
        instance: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidMacro {
            kind: kind.into(),
            instance: instance.into(),
            message: message.into(),
        }
    }
}
