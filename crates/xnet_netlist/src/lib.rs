//! Output netlist container and primitive lowering.
//!
//! A [`Netlist`] collects primitive symbols and pads for the target format.
//! Nets are [`NameId`](xnet_naming::NameId)s, so a netlist is only printable
//! once its [`Names`](xnet_naming::Names) have been resolved. The netlist also
//! knows the target's [`Capabilities`] and implements the capability-dependent
//! primitives: fan-in bounded gate packing and latch emission.

#![warn(missing_docs)]

pub mod error;
pub mod netlist;
pub mod pad;
pub mod symbol;

pub use error::LowerError;
pub use netlist::{Capabilities, LatchType, Netlist, Term};
pub use pad::{Pad, PadType};
pub use symbol::{Param, Pin, PinDirection, Symbol, SymbolId};
