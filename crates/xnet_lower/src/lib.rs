//! Lowering of parsed models into a resolved target netlist.
//!
//! A front end builds one [`Model`] per source model and hands them to a
//! [`Converter`], which lowers two-level logic into fan-in bounded AND/OR
//! trees, storage elements into the target's flip-flops and latches, and
//! macro cells through the chip family's factories. Every model lowers into
//! its own scope; [`Converter::finish`] resolves all names at once.
//!
//! # Usage
//!
//! ```
//! use xnet_chips::for_part;
//! use xnet_common::SourceLocation;
//! use xnet_config::NamingConfig;
//! use xnet_diagnostics::DiagnosticSink;
//! use xnet_lower::{Converter, Gate, Model, SumOfProducts};
//!
//! let mut model = Model::new("top", SourceLocation::new("top.blif", 1));
//! let mut and = SumOfProducts::new("y", ["a", "b"]);
//! and.add_row("11", '1').unwrap();
//! model.add_gate(Gate::SumOfProducts(and)).unwrap();
//!
//! let sink = DiagnosticSink::new();
//! let mut converter = Converter::new(for_part("XC3020").unwrap(), NamingConfig::default());
//! assert_eq!(converter.lower_design([model], &sink), 0);
//! let design = converter.finish(&sink);
//! assert_eq!(design.netlist.symbol_count(), 3);
//! ```

#![warn(missing_docs)]

mod buffer;
pub mod converter;
pub mod error;
mod latch;
pub mod model;
mod sop;

pub use converter::{error_code, Converter, Design};
pub use error::ModelError;
pub use model::{Gate, InitialValue, Latch, LatchKind, Literal, Model, Product, SumOfProducts};
