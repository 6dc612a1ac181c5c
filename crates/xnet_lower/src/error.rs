//! Errors raised while a model is being assembled.

/// A model that cannot be built as described.
///
/// These are raised by the model construction methods, before any lowering
/// happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Two gates of one model drive the same signal.
    #[error("signal {signal} driven by multiple gates in model {model}")]
    MultipleDrivers {
        /// The signal.
        signal: String,
        /// The model.
        model: String,
    },

    /// A signal was given two different buffer types.
    #[error("signal {signal} buffered as both {first} and {second}")]
    ConflictingBuffer {
        /// The signal.
        signal: String,
        /// The earlier buffer type.
        first: String,
        /// The rejected buffer type.
        second: String,
    },

    /// A cover row has the wrong number of input bits.
    #[error("{found} bits for {expected} inputs of {output} (must match)")]
    CoverWidth {
        /// Output of the sum of products.
        output: String,
        /// Number of declared inputs.
        expected: usize,
        /// Number of bits in the row.
        found: usize,
    },

    /// A cover row contains something other than `0`, `1` or `-`.
    #[error("illegal {position} bit {bit:?} in cover of {output}")]
    IllegalBit {
        /// Output of the sum of products.
        output: String,
        /// `input` or `output`.
        position: &'static str,
        /// The offending character.
        bit: char,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_signal() {
        let err = ModelError::MultipleDrivers {
            signal: "q".to_string(),
            model: "top".to_string(),
        };
        assert_eq!(err.to_string(), "signal q driven by multiple gates in model top");
        let err = ModelError::IllegalBit {
            output: "y".to_string(),
            position: "input",
            bit: 'x',
        };
        assert_eq!(err.to_string(), "illegal input bit 'x' in cover of y");
    }
}
