//! Error type for identifier mangling.

/// Errors produced while turning source text into identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    /// The source identifier contains a character that cannot be encoded.
    #[error("illegal character {ch:?} in identifier '{name}'")]
    IllegalCharacter {
        /// The offending source identifier.
        name: String,
        /// The first character that could not be encoded.
        ch: char,
    },
    /// The source identifier is empty.
    #[error("empty identifier")]
    Empty,
}
