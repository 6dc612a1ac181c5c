//! Shared foundational types used across the xnet netlist translator.
//!
//! This crate provides the dense [`Arena`] container and its [`define_id!`]
//! key macro, source locations for diagnostics, and the internal result type.

#![warn(missing_docs)]

pub mod arena;
pub mod ids;
pub mod location;
pub mod result;

pub use arena::{Arena, ArenaId};
pub use location::SourceLocation;
pub use result::{InternalError, XnetResult};
