//! Diagnostic creation, severity management, and accumulation.
//!
//! This crate provides structured [`Diagnostic`] messages with severity levels,
//! codes and source locations. The thread-safe [`DiagnosticSink`] accumulates
//! diagnostics while models are lowered, so that a single run surfaces as many
//! problems as possible. Presenting them to a user is left to the front end.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use severity::Severity;
pub use sink::DiagnosticSink;
