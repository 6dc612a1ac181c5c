//! Multi-bit RAM macros, split into one symbol per data bit.

use crate::factory::{Connections, CustomGateFactory, MacroSignature};
use crate::gate::{CustomGate, MacroKind, SpecialGate};
use xnet_common::SourceLocation;
use xnet_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use xnet_netlist::{LowerError, Param};

/// Widest RAM a single instance can describe.
pub const MAX_BITS: usize = 255;

const UNCONNECTED_ADDRESS: DiagnosticCode = DiagnosticCode::new(Category::Macro, 2);
const UNCONNECTED_DATA: DiagnosticCode = DiagnosticCode::new(Category::Macro, 3);
const WRITE_ONLY_BIT: DiagnosticCode = DiagnosticCode::new(Category::Macro, 4);

/// Creates RAM bits.
///
/// Ports are numbered: `D7` and `O7` (or `SPO7`/`DPO7`) belong to bit 7, and
/// each bit becomes its own symbol with plain `D` and `O` ports. Single-bit
/// RAMs may use the unnumbered names instead.
#[derive(Debug)]
pub struct RamFactory {
    signature: MacroSignature,
    output_prefixes: Vec<String>,
    address_prefixes: Vec<String>,
    addresses: usize,
    write_clock: bool,
}

impl RamFactory {
    /// Creates a RAM factory with `addresses` address pins per prefix.
    pub fn new(output_prefixes: &[&str], address_prefixes: &[&str], write_clock: bool, addresses: usize) -> Self {
        let mut outputs: Vec<String> = Vec::new();
        for prefix in output_prefixes {
            outputs.extend((0..MAX_BITS).map(|i| format!("{prefix}{i}")));
        }
        outputs.extend(output_prefixes.iter().map(|p| p.to_string()));

        let mut inputs: Vec<String> = Vec::new();
        for prefix in address_prefixes {
            inputs.extend((0..addresses).map(|i| format!("{prefix}{i}")));
        }
        if write_clock {
            inputs.push("WCLK".to_string());
        }
        inputs.push("WE".to_string());
        inputs.extend((0..MAX_BITS).map(|i| format!("D{i}")));
        inputs.push("D".to_string());

        let required = if write_clock { vec!["WE", "WCLK"] } else { vec!["WE"] };
        Self {
            signature: MacroSignature {
                inputs,
                outputs,
                flags: Vec::new(),
                required: required.into_iter().map(String::from).collect(),
            },
            output_prefixes: output_prefixes.iter().map(|p| p.to_string()).collect(),
            address_prefixes: address_prefixes.iter().map(|p| p.to_string()).collect(),
            addresses,
            write_clock,
        }
    }

    fn bit_exists(&self, bit: &str, outputs: &Connections, inputs: &Connections) -> bool {
        inputs.contains(&format!("D{bit}"))
            || self
                .output_prefixes
                .iter()
                .any(|prefix| outputs.contains(&format!("{prefix}{bit}")))
    }
}

impl CustomGateFactory for RamFactory {
    fn signature(&self) -> &MacroSignature {
        &self.signature
    }

    fn instantiate(
        &self,
        sink: &DiagnosticSink,
        location: &SourceLocation,
        name: &str,
        flags: &[String],
        outputs: &Connections,
        inputs: &Connections,
    ) -> Result<Vec<CustomGate>, LowerError> {
        let warn = |code: DiagnosticCode, message: String| {
            sink.emit(Diagnostic::warning(code, message, location.clone()));
        };

        let mut bits: Vec<String> = (0..MAX_BITS)
            .map(|i| i.to_string())
            .filter(|bit| self.bit_exists(bit, outputs, inputs))
            .collect();
        if self.bit_exists("", outputs, inputs) {
            if !bits.is_empty() {
                return Err(LowerError::invalid_macro(
                    name,
                    name,
                    "connection to both numbered and unnumbered ports",
                ));
            }
            bits.push(String::new());
        }

        let mut grounded = Vec::new();
        let mut global = Connections::new();
        for prefix in &self.address_prefixes {
            let mut next = 0;
            for i in 0..self.addresses {
                let address = format!("{prefix}{i}");
                match inputs.get(&address) {
                    Some(signal) => {
                        for gap in next..i {
                            warn(
                                UNCONNECTED_ADDRESS,
                                format!("unconnected address input, assuming zero: {prefix}{gap}"),
                            );
                        }
                        global.insert(address, signal);
                        next = i + 1;
                    }
                    None => grounded.push(address),
                }
            }
        }
        for port in ["WE", "WCLK"] {
            if port == "WCLK" && !self.write_clock {
                continue;
            }
            if let Some(signal) = inputs.get(port) {
                global.insert(port, signal);
            }
        }

        bits.retain(|bit| {
            if !inputs.contains(&format!("D{bit}")) {
                warn(UNCONNECTED_DATA, format!("unconnected data input, assuming zero: D{bit}"));
            }
            let readable = self
                .output_prefixes
                .iter()
                .any(|prefix| outputs.contains(&format!("{prefix}{bit}")));
            if !readable {
                let ports: Vec<String> = self
                    .output_prefixes
                    .iter()
                    .map(|prefix| format!("{prefix}{bit}"))
                    .collect();
                warn(
                    WRITE_ONLY_BIT,
                    format!(
                        "unconnected data output, removing write-only memory bit: {}",
                        ports.join(", ")
                    ),
                );
            }
            readable
        });

        let params: Vec<Param> = flags.iter().map(Param::flag).collect();
        let gates = bits
            .iter()
            .map(|bit| {
                let mut bit_inputs = global.clone();
                if let Some(signal) = inputs.get(&format!("D{bit}")) {
                    bit_inputs.insert("D", signal);
                }
                let bit_outputs: Connections = self
                    .output_prefixes
                    .iter()
                    .filter_map(|prefix| {
                        outputs
                            .get(&format!("{prefix}{bit}"))
                            .map(|signal| (prefix.clone(), signal))
                    })
                    .collect();
                let gate = SpecialGate {
                    symbol: name.to_ascii_uppercase(),
                    params: params.clone(),
                    special_inputs: Vec::new(),
                    special_outputs: Vec::new(),
                    direct: true,
                    forced_buffer: None,
                };
                CustomGate::new(
                    MacroKind::RamBit {
                        gate,
                        grounded: grounded.clone(),
                    },
                    bit_outputs,
                    bit_inputs,
                )
            })
            .collect();
        Ok(gates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::instantiate;
    use std::collections::BTreeSet;
    use xnet_diagnostics::Severity;

    fn ramd() -> RamFactory {
        RamFactory::new(&["SPO", "DPO"], &["A", "DPRA"], true, 4)
    }

    fn count_numbered(ports: &mut BTreeSet<String>, prefix: &str) -> usize {
        let mut i = 0;
        while ports.remove(&format!("{prefix}{i}")) {
            i += 1;
        }
        i
    }

    #[test]
    fn ports_of_dual_port_ram() {
        let factory = ramd();
        let mut inputs: BTreeSet<String> = factory.signature().inputs.iter().cloned().collect();
        assert_eq!(count_numbered(&mut inputs, "D"), MAX_BITS);
        let expected: BTreeSet<String> = ["A0", "A1", "A2", "A3", "DPRA0", "DPRA1", "DPRA2", "DPRA3", "WE", "WCLK", "D"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(inputs, expected);

        let mut outputs: BTreeSet<String> = factory.signature().outputs.iter().cloned().collect();
        assert_eq!(count_numbered(&mut outputs, "SPO"), MAX_BITS);
        assert_eq!(count_numbered(&mut outputs, "DPO"), MAX_BITS);
        assert_eq!(outputs.into_iter().collect::<Vec<_>>(), ["DPO", "SPO"]);
        assert_eq!(factory.signature().required, ["WE", "WCLK"]);
    }

    #[test]
    fn splits_into_bits() {
        let sink = DiagnosticSink::new();
        let factory = RamFactory::new(&["O"], &["A"], false, 5);
        let gates = instantiate(
            &factory,
            &sink,
            &SourceLocation::unknown(),
            "ram",
            "ram",
            &[],
            &[
                ("A0", "a0"),
                ("A1", "a1"),
                ("WE", "we"),
                ("D0", "d0"),
                ("D1", "d1"),
                ("O0", "q0"),
                ("O1", "q1"),
            ],
        )
        .unwrap();
        assert_eq!(gates.len(), 2);
        assert_eq!(gates[1].inputs().get("D"), Some("d1"));
        assert_eq!(gates[1].inputs().get("A0"), Some("a0"));
        assert_eq!(gates[1].outputs().get("O"), Some("q1"));
        let MacroKind::RamBit { gate, grounded } = gates[0].kind() else {
            panic!("expected RAM bit");
        };
        assert_eq!(gate.symbol, "RAM");
        assert_eq!(grounded, &["A2", "A3", "A4"]);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn address_gaps_and_write_only_bits_warn() {
        let sink = DiagnosticSink::new();
        let factory = RamFactory::new(&["O"], &["A"], false, 5);
        let gates = instantiate(
            &factory,
            &sink,
            &SourceLocation::unknown(),
            "RAM",
            "RAM",
            &[],
            &[("A2", "a2"), ("WE", "we"), ("D0", "d0"), ("O1", "q1")],
        )
        .unwrap();
        assert_eq!(gates.len(), 1);
        assert_eq!(gates[0].outputs().get("O"), Some("q1"));
        let messages: Vec<String> = sink.diagnostics().into_iter().map(|d| d.message).collect();
        assert_eq!(
            messages,
            [
                "unconnected address input, assuming zero: A0",
                "unconnected address input, assuming zero: A1",
                "unconnected data output, removing write-only memory bit: O0",
                "unconnected data input, assuming zero: D1",
            ]
        );
        assert_eq!(sink.count(Severity::Warning), 4);
    }

    #[test]
    fn single_bit_names() {
        let sink = DiagnosticSink::new();
        let gates = instantiate(
            &ramd(),
            &sink,
            &SourceLocation::unknown(),
            "RAMD",
            "RAMD",
            &[],
            &[("WE", "we"), ("WCLK", "clk"), ("D", "d"), ("DPO", "q")],
        )
        .unwrap();
        assert_eq!(gates.len(), 1);
        assert_eq!(gates[0].inputs().get("WCLK"), Some("clk"));
        assert_eq!(gates[0].outputs().get("DPO"), Some("q"));
    }

    #[test]
    fn numbered_and_unnumbered_conflict() {
        let sink = DiagnosticSink::new();
        let err = instantiate(
            &ramd(),
            &sink,
            &SourceLocation::unknown(),
            "RAMD",
            "RAMD",
            &[],
            &[("WE", "we"), ("WCLK", "clk"), ("D", "d"), ("SPO3", "q")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("numbered and unnumbered"));
    }
}
