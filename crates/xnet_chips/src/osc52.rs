//! The XC5200 oscillator macro.

use crate::factory::{Connections, CustomGateFactory, MacroSignature};
use crate::gate::{CustomGate, MacroKind, SpecialGate};
use xnet_common::SourceLocation;
use xnet_diagnostics::DiagnosticSink;
use xnet_netlist::{LowerError, Param};

const OSC1_TAPS: [u32; 4] = [4, 16, 64, 256];
const OSC2_TAPS: [u32; 8] = [2, 8, 32, 128, 1024, 4096, 16384, 65536];

/// Maps virtual `DIVn` outputs onto the two real oscillator outputs.
///
/// `OSC1` divides by 4 to 256 and `OSC2` by 2 to 65536; each can only use one
/// divisor. With `C` connected the user clock is divided, otherwise the
/// internal oscillator is.
#[derive(Debug)]
pub struct Osc52Factory {
    signature: MacroSignature,
}

impl Osc52Factory {
    /// Creates the factory.
    pub fn new() -> Self {
        let outputs: Vec<String> = OSC1_TAPS
            .iter()
            .chain(OSC2_TAPS.iter())
            .map(|factor| format!("DIV{factor}"))
            .collect();
        let outputs: Vec<&str> = outputs.iter().map(String::as_str).collect();
        Self {
            signature: MacroSignature::new(&outputs, &["C"], &[]),
        }
    }
}

impl Default for Osc52Factory {
    fn default() -> Self {
        Self::new()
    }
}

fn allocate(
    name: &str,
    virtual_outputs: &Connections,
    taps: &[u32],
    port: &str,
    param: &str,
    real_outputs: &mut Connections,
    params: &mut Vec<Param>,
) -> Result<(), LowerError> {
    let mut chosen: Option<&str> = None;
    for factor in taps {
        let Some(signal) = virtual_outputs.get(&format!("DIV{factor}")) else {
            continue;
        };
        if let Some(previous) = chosen {
            return Err(LowerError::invalid_macro(
                name,
                name,
                format!("conflicting OSC52 divisors: {previous} and {signal} both use {port} / {param}"),
            ));
        }
        chosen = Some(signal);
        params.push(Param::value(param, factor.to_string()));
    }
    if let Some(signal) = chosen {
        real_outputs.insert(port, signal);
    }
    Ok(())
}

impl CustomGateFactory for Osc52Factory {
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
        let mut params: Vec<Param> = flags.iter().map(Param::flag).collect();
        let source = if inputs.contains("C") { "USER" } else { "INTERNAL" };
        params.push(Param::value("OSC", source));

        let mut real_outputs = Connections::new();
        allocate(name, outputs, &OSC1_TAPS, "OSC1", "DIVIDE1_BY", &mut real_outputs, &mut params)?;
        allocate(name, outputs, &OSC2_TAPS, "OSC2", "DIVIDE2_BY", &mut real_outputs, &mut params)?;

        let gate = SpecialGate {
            symbol: name.to_ascii_uppercase(),
            params,
            special_inputs: Vec::new(),
            special_outputs: Vec::new(),
            direct: true,
            forced_buffer: None,
        };
        Ok(vec![CustomGate::new(
            MacroKind::Special(gate),
            real_outputs,
            inputs.clone(),
        )])
    }
}
