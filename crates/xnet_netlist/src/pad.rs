//! External pads.

use crate::symbol::Param;
use serde::{Deserialize, Serialize};
use xnet_naming::NameId;

/// Electrical type of an external pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PadType {
    /// Input-only pad.
    Input,
    /// Output-only pad.
    Output,
    /// Tristate output pad.
    Tristate,
    /// Bidirectional pad.
    Bidirectional,
    /// Pad not bonded to a package pin.
    Unbonded,
}

impl PadType {
    /// Returns the single-letter code of the target format.
    pub fn code(self) -> &'static str {
        match self {
            PadType::Input => "I",
            PadType::Output => "O",
            PadType::Tristate => "T",
            PadType::Bidirectional => "B",
            PadType::Unbonded => "U",
        }
    }
}

/// An external pad connecting a net to the package.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pad {
    /// Pad type.
    pub kind: PadType,
    /// The pad-side net.
    pub net: NameId,
    /// Package location, empty if unconstrained.
    pub loc: String,
    /// Extra parameters.
    pub params: Vec<Param>,
    /// Flags such as `FAST` or `PULLUP`.
    pub flags: Vec<String>,
}
