//! Chip-family capabilities and macro cells.
//!
//! A [`ChipFamily`] tells the lowering core what the target can do natively
//! (its [`Capabilities`]), which buffer types a `.buffer` directive may name,
//! and which macro cells exist. Macro cells are created through a
//! [`CustomGateFactory`] that validates pin connections and produces
//! [`CustomGate`]s, which later lower themselves into primitives through a
//! [`GateContext`].
//!
//! # Usage
//!
//! ```
//! use xnet_chips::{for_part, ChipFamily};
//!
//! let family = for_part("XC3020PC68").unwrap();
//! assert_eq!(family.capabilities().max_gate_inputs, 5);
//! assert!(family.has_buffer_type("ACLK"));
//! ```

#![warn(missing_docs)]

pub mod clock;
pub mod factory;
pub mod families;
pub mod gate;
pub mod osc52;
pub mod pad;
pub mod ram;
pub mod special;

pub use factory::{instantiate, Connections, CustomGateFactory, MacroSignature, IOPAD, LATCH_CLOCK};
pub use families::{Family, FamilyKind};
pub use gate::{CustomGate, GateContext, MacroKind, PadGate, SpecialGate};

use xnet_common::SourceLocation;
use xnet_diagnostics::DiagnosticSink;
use xnet_netlist::{Capabilities, LowerError};

/// A target chip family.
pub trait ChipFamily: std::fmt::Debug + Send + Sync {
    /// Returns the family name (e.g. "XC4000").
    fn name(&self) -> &str;

    /// Returns what the family implements natively.
    fn capabilities(&self) -> Capabilities;

    /// Returns the buffer types `.buffer` directives may use.
    fn buffer_types(&self) -> &[&'static str];

    /// Returns the factory for a macro type, the I/O pad factory for
    /// [`IOPAD`] or the latch clock factory for [`LATCH_CLOCK`].
    fn factory(&self, kind: &str) -> Option<&dyn CustomGateFactory>;

    /// Returns the macro types user designs may instantiate.
    fn macro_types(&self) -> Vec<&str>;

    /// Returns whether `buffer` names a supported buffer type.
    fn has_buffer_type(&self, buffer: &str) -> bool {
        self.buffer_types()
            .iter()
            .any(|b| b.eq_ignore_ascii_case(buffer))
    }

    /// Validates and instantiates a macro cell of type `kind`.
    fn instantiate(
        &self,
        sink: &DiagnosticSink,
        location: &SourceLocation,
        kind: &str,
        flags: &[&str],
        pins: &[(&str, &str)],
    ) -> Result<Vec<CustomGate>, LowerError> {
        let cell = self.factory(kind).ok_or_else(|| LowerError::Unsupported {
            feature: "macro cell".to_string(),
            net: kind.to_string(),
        })?;
        factory::instantiate(cell, sink, location, kind, kind, flags, pins)
    }

    /// Validates and instantiates an I/O pad at package location `loc`.
    fn pad(
        &self,
        sink: &DiagnosticSink,
        location: &SourceLocation,
        loc: &str,
        flags: &[&str],
        pins: &[(&str, &str)],
    ) -> Result<Vec<CustomGate>, LowerError> {
        let cell = self.factory(IOPAD).ok_or_else(|| LowerError::Unsupported {
            feature: "I/O pads".to_string(),
            net: loc.to_string(),
        })?;
        factory::instantiate(cell, sink, location, "pad", &loc.to_ascii_uppercase(), flags, pins)
    }
}

/// Returns the chip family a part belongs to, e.g. `XC4005E` or `3020`.
pub fn for_part(part: &str) -> Result<Box<dyn ChipFamily>, LowerError> {
    FamilyKind::for_part(part)
        .map(|kind| Box::new(Family::new(kind)) as Box<dyn ChipFamily>)
        .ok_or_else(|| LowerError::UnknownPart(part.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_part() {
        let err = for_part("EP4CE22").unwrap_err();
        assert!(matches!(err, LowerError::UnknownPart(ref p) if p == "EP4CE22"));
    }

    #[test]
    fn unknown_macro_is_unsupported() {
        let family = for_part("2018").unwrap();
        let sink = DiagnosticSink::new();
        let err = family
            .instantiate(&sink, &SourceLocation::unknown(), "BSCAN", &[], &[])
            .unwrap_err();
        assert!(matches!(err, LowerError::Unsupported { .. }));
    }

    #[test]
    fn pad_location_is_upper_case() {
        let family = for_part("xc4003").unwrap();
        let sink = DiagnosticSink::new();
        let gates = family
            .pad(&sink, &SourceLocation::unknown(), "p12", &["medfast"], &[("I", "din")])
            .unwrap();
        let MacroKind::Pad(pad) = gates[0].kind() else {
            panic!("expected pad");
        };
        assert_eq!(pad.loc, "P12");
        assert_eq!(pad.flags, ["MEDFAST"]);
    }

    #[test]
    fn coarse_slew_rejects_medfast() {
        let family = for_part("xc5204").unwrap();
        let sink = DiagnosticSink::new();
        let err = family
            .pad(&sink, &SourceLocation::unknown(), "P3", &["medfast"], &[("I", "din")])
            .unwrap_err();
        assert!(err.to_string().contains("unknown flag MEDFAST"));
    }
}
