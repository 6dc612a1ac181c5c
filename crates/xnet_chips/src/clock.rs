//! The implicit latch clock.

use crate::factory::{Connections, CustomGateFactory, MacroSignature};
use crate::gate::{CustomGate, MacroKind};
use xnet_common::SourceLocation;
use xnet_diagnostics::DiagnosticSink;
use xnet_netlist::LowerError;

/// Drives the reserved `GCLK` net from the signal on port `C`.
///
/// Families with native latches instantiate this for the clock every latch
/// shares.
#[derive(Debug)]
pub struct LatchClockFactory {
    signature: MacroSignature,
}

impl LatchClockFactory {
    /// Creates the factory.
    pub fn new() -> Self {
        Self {
            signature: MacroSignature::new(&[], &["C"], &["C"]),
        }
    }
}

impl Default for LatchClockFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomGateFactory for LatchClockFactory {
    fn signature(&self) -> &MacroSignature {
        &self.signature
    }

    fn instantiate(
        &self,
        _sink: &DiagnosticSink,
        _location: &SourceLocation,
        _name: &str,
        _flags: &[String],
        outputs: &Connections,
        inputs: &Connections,
    ) -> Result<Vec<CustomGate>, LowerError> {
        Ok(vec![CustomGate::new(
            MacroKind::LatchClock,
            outputs.clone(),
            inputs.clone(),
        )])
    }
}
