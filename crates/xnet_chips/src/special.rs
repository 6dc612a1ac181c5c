//! Chip-specific macros that map to a single symbol.

use crate::factory::{Connections, CustomGateFactory, MacroSignature};
use crate::gate::{CustomGate, MacroKind, SpecialGate};
use xnet_common::SourceLocation;
use xnet_diagnostics::DiagnosticSink;
use xnet_netlist::{LowerError, Param};

/// Creates one symbol named after the macro type.
///
/// Unconnected ports listed as special pads are wired to a dedicated pad
/// symbol, through `IBUF`/`OBUF` unless the macro connects directly.
#[derive(Debug)]
pub struct SpecialFactory {
    signature: MacroSignature,
    special_inputs: Vec<(String, String)>,
    special_outputs: Vec<(String, String)>,
    direct: bool,
    forced_buffer: Option<&'static str>,
    readback: bool,
}

fn own(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(port, pad)| (port.to_string(), pad.to_string()))
        .collect()
}

impl SpecialFactory {
    /// Creates a plain special macro.
    pub fn new(signature: MacroSignature) -> Self {
        Self {
            signature,
            special_inputs: Vec::new(),
            special_outputs: Vec::new(),
            direct: true,
            forced_buffer: None,
            readback: false,
        }
    }

    /// Creates the readback macro: `TRIG` and `DATA` default to the `MD0`
    /// and `MD1` pads, and `CLK` drives a separate `RDCLK` symbol.
    pub fn readback() -> Self {
        Self::new(MacroSignature::new(&["DATA", "RIP"], &["TRIG", "CLK"], &[]))
            .with_special_pads(&[("TRIG", "MD0")], &[("DATA", "MD1")])
            .with_direct(false)
            .into_readback()
    }

    /// Wires unconnected ports to pad symbols.
    pub fn with_special_pads(mut self, inputs: &[(&str, &str)], outputs: &[(&str, &str)]) -> Self {
        self.special_inputs = own(inputs);
        self.special_outputs = own(outputs);
        self
    }

    /// Sets whether special pads connect without I/O buffers.
    pub fn with_direct(mut self, direct: bool) -> Self {
        self.direct = direct;
        self
    }

    /// Forces every output through a buffer of type `buffer`.
    pub fn with_forced_buffer(mut self, buffer: &'static str) -> Self {
        self.forced_buffer = Some(buffer);
        self
    }

    fn into_readback(mut self) -> Self {
        self.readback = true;
        self
    }
}

impl CustomGateFactory for SpecialFactory {
    fn signature(&self) -> &MacroSignature {
        &self.signature
    }

    fn instantiate(
        &self,
        _sink: &DiagnosticSink,
        _location: &SourceLocation,
        name: &str,
        flags: &[String],
        outputs: &Connections,
        inputs: &Connections,
    ) -> Result<Vec<CustomGate>, LowerError> {
        let gate = SpecialGate {
            symbol: name.to_ascii_uppercase(),
            params: flags.iter().map(Param::flag).collect(),
            special_inputs: self.special_inputs.clone(),
            special_outputs: self.special_outputs.clone(),
            direct: self.direct,
            forced_buffer: self.forced_buffer,
        };
        let kind = if self.readback {
            MacroKind::Readback(gate)
        } else {
            MacroKind::Special(gate)
        };
        Ok(vec![CustomGate::new(kind, outputs.clone(), inputs.clone())])
    }
}
