//! Collision-free output names for a translated netlist.
//!
//! Source identifiers are case-sensitive and may contain characters the
//! target format rejects; target identifiers are compared case-insensitively
//! and use `/` as the hierarchy separator. This crate maps one onto the other:
//!
//! - [`mangle`] turns a source identifier into a target-legal text plus a
//!   base-32 qualifier that records everything the text lost (letter case,
//!   substituted brackets, removed characters);
//! - [`Names`] is an arena of identifiers and scopes. Rooted identifiers come
//!   from source text, derived identifiers are scratch nets hanging off a base
//!   identifier, and reserved identifiers (`VCC`, `GND`, `GCLK`, …) exist once
//!   per design;
//! - [`Names::resolve`] assigns every identifier and child scope its final
//!   output string, once all lowering is done.

#![warn(missing_docs)]

pub mod error;
pub mod mangle;
pub mod names;
mod resolve;

pub use error::NamingError;
pub use mangle::{mangle, Mangled};
pub use names::{NameId, NameKind, Names, ScopeId, GCLK, GND, VCC};
