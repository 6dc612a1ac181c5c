//! Source identifier to target text mangling.
//!
//! The mangled text keeps letters (with their case), digits, `/` and `$`.
//! `-`, `[` and `]` become `_`, `<` and `>`; every other printable character
//! becomes `$`. What got lost is recorded bit by bit, most significant first:
//!
//! | source            | bits                          |
//! |-------------------|-------------------------------|
//! | letter            | 1 (upper case)                |
//! | `-_[<]>`          | 1 (was it the substituted one)|
//! | `$`               | `11`                          |
//! | removed character | 5-bit index into [`ILLEGAL`]  |
//!
//! and sliced into base-32 symbols to form the qualifier.

use crate::error::NamingError;
use serde::{Deserialize, Serialize};

const BASE32: &[u8; 32] = b"0123456789ABCDEFGHJKMNPRSTUVWXYZ";
const SUBSTITUTE: &[u8; 6] = b"-_[<]>";

/// Printable characters that are neither alphanumeric nor substituted nor
/// kept, in code-point order. A character's position is its 5-bit code.
pub const ILLEGAL: &str = "!\"#%&'()*+,.:;=?@\\^`{|}~";

/// Separator between mangled text and qualifier. Never produced by mangling.
pub const QUALIFIER_SEPARATOR: char = '-';

/// The two spellings of a mangled source identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mangled {
    /// Target-legal text, case preserved.
    pub mangled: String,
    /// Mangled text, separator and qualifier; unique per source identifier.
    pub qualified: String,
}

/// Mangles a source identifier.
///
/// Pure function of `source`. Fails on empty input, on characters outside
/// printable ASCII, and on the space character.
pub fn mangle(source: &str) -> Result<Mangled, NamingError> {
    if source.is_empty() {
        return Err(NamingError::Empty);
    }

    let mut digits_only = true;
    let mut bits = 0u32;
    let mut accum = 0u32;
    let mut mangled = String::with_capacity(source.len() + 1);
    let mut qualifier = String::new();

    for ch in source.chars() {
        if ch.is_ascii_alphabetic() {
            mangled.push(ch);
            accum = accum << 1 | u32::from(ch.is_ascii_uppercase());
            bits += 1;
            digits_only = false;
        } else if let Some(index) = SUBSTITUTE.iter().position(|&c| char::from(c) == ch) {
            mangled.push(char::from(SUBSTITUTE[index | 1]));
            accum = accum << 1 | (index as u32 & 1);
            bits += 1;
            digits_only = false;
        } else if ch == '/' {
            mangled.push(ch);
            digits_only = false;
        } else if ch == '$' {
            mangled.push(ch);
            accum = accum << 2 | 3;
            bits += 2;
            digits_only = false;
        } else if ch.is_ascii_digit() {
            mangled.push(ch);
        } else {
            let index = ILLEGAL
                .chars()
                .position(|c| c == ch)
                .ok_or_else(|| NamingError::IllegalCharacter {
                    name: source.to_string(),
                    ch,
                })?;
            mangled.push('$');
            accum = accum << 5 | index as u32;
            bits += 5;
            digits_only = false;
        }

        // at most 9 pending bits, so one symbol per character drains them
        if bits >= 5 {
            qualifier.push(char::from(BASE32[(accum >> (bits - 5) & 31) as usize]));
            bits -= 5;
        }
        accum &= (1 << bits) - 1;
    }
    if bits > 0 {
        qualifier.push(char::from(BASE32[(accum << (5 - bits) & 31) as usize]));
    }

    if digits_only {
        mangled.push(QUALIFIER_SEPARATOR);
        let qualified = format!("{mangled}{qualifier}");
        return Ok(Mangled { mangled, qualified });
    }
    let qualified = format!("{mangled}{QUALIFIER_SEPARATOR}{qualifier}");
    Ok(Mangled { mangled, qualified })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(source: &str) -> (String, String) {
        let mangled = mangle(source).unwrap();
        (mangled.mangled, mangled.qualified)
    }

    #[test]
    fn illegal_catalog_is_complete() {
        assert_eq!(ILLEGAL.len(), 24);
        for ch in '!'..='~' {
            let expected = !ch.is_ascii_alphanumeric() && !"-_[<]>/$".contains(ch);
            assert_eq!(ILLEGAL.contains(ch), expected, "{ch:?}");
        }
    }

    #[test]
    fn case_bits() {
        assert_eq!(m("foo"), ("foo".into(), "foo-0".into()));
        assert_eq!(m("FOO"), ("FOO".into(), "FOO-W".into()));
    }

    #[test]
    fn dollar_and_removed_characters() {
        assert_eq!(m("test$"), ("test$".into(), "test$-1G".into()));
        assert_eq!(m("Test~"), ("Test$".into(), "Test$-HE".into()));
    }

    #[test]
    fn substitutions() {
        assert_eq!(m("bus[3]").0, "bus<3>");
        assert_eq!(m("a-b").0, "a_b");
        assert_eq!(m("a_b").0, "a_b");
        assert_ne!(m("a-b").1, m("a_b").1);
        assert_ne!(m("x[0]").1, m("x<0>").1);
    }

    #[test]
    fn hierarchy_separator_costs_no_bits() {
        assert_eq!(m("a/b"), ("a/b".into(), "a/b-0".into()));
    }

    #[test]
    fn all_digits_get_separator() {
        assert_eq!(m("1234"), ("1234-".into(), "1234-".into()));
        assert_eq!(m("1a").0, "1a");
    }

    #[test]
    fn long_names_keep_every_bit() {
        // 26 letters = 5 full symbols and a 1-bit remainder
        let (_, lower) = m("abcdefghijklmnopqrstuvwxyz");
        let (_, upper) = m("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        assert_eq!(lower, "abcdefghijklmnopqrstuvwxyz-000000");
        assert_eq!(upper, "ABCDEFGHIJKLMNOPQRSTUVWXYZ-ZZZZZG");
    }

    #[test]
    fn rejects_unencodable() {
        assert!(matches!(
            mangle("a b"),
            Err(NamingError::IllegalCharacter { ch: ' ', .. })
        ));
        assert!(matches!(
            mangle("caf\u{e9}"),
            Err(NamingError::IllegalCharacter { ch: '\u{e9}', .. })
        ));
        assert_eq!(mangle(""), Err(NamingError::Empty));
    }

    #[test]
    fn deterministic() {
        assert_eq!(mangle("Clk~Div[2]"), mangle("Clk~Div[2]"));
    }
}
