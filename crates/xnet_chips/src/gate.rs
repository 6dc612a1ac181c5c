//! Custom gates produced by macro-cell factories and their lowering.

use crate::factory::Connections;
use log::trace;
use xnet_naming::{NameId, Names, ScopeId, GCLK, GND};
use xnet_netlist::{LowerError, Netlist, PadType, Param, PinDirection, SymbolId};

/// What a custom gate lowers into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MacroKind {
    /// A package pin with its input, output and pull buffers.
    Pad(PadGate),
    /// A buffer driving the implicit latch clock.
    LatchClock,
    /// One symbol of a chip-specific macro type.
    Special(SpecialGate),
    /// A readback symbol plus a separate readback clock symbol.
    Readback(SpecialGate),
    /// One bit of a RAM, with unconnected address and data pins grounded.
    RamBit {
        /// The RAM symbol.
        gate: SpecialGate,
        /// Address ports tied to logic-low.
        grounded: Vec<String>,
    },
}

/// An I/O pad instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PadGate {
    /// Package location.
    pub loc: String,
    /// Pad flags (speed, level, impedance).
    pub flags: Vec<String>,
    /// Whether the input buffer skips its delay element.
    pub nodelay: bool,
    /// `PULLUP` or `PULLDOWN` resistor symbol, if requested.
    pub resistor: Option<&'static str>,
}

/// A special macro symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpecialGate {
    /// Symbol type.
    pub symbol: String,
    /// Symbol parameters, flags first.
    pub params: Vec<Param>,
    /// Unconnected input ports wired to a named pad symbol.
    pub special_inputs: Vec<(String, String)>,
    /// Unconnected output ports wired to a named pad symbol.
    pub special_outputs: Vec<(String, String)>,
    /// Whether special pads connect without `IBUF`/`OBUF`.
    pub direct: bool,
    /// Buffer type every output is forced through.
    pub forced_buffer: Option<&'static str>,
}

/// A macro instance ready to be lowered into primitives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomGate {
    kind: MacroKind,
    outputs: Connections,
    inputs: Connections,
}

/// The lowering environment of a custom gate.
pub trait GateContext {
    /// Returns the scope of the model being lowered.
    fn scope(&self) -> ScopeId;

    /// Borrows the identifier arena and the netlist together.
    fn target(&mut self) -> (&mut Names, &mut Netlist);

    /// Returns the net a gate output has to drive to reach `signal`,
    /// inserting the declared or `forced` buffer.
    fn buffered_output(&mut self, signal: &str, forced: Option<&str>) -> Result<NameId, LowerError>;
}

impl CustomGate {
    /// Creates a custom gate.
    pub fn new(kind: MacroKind, outputs: Connections, inputs: Connections) -> Self {
        Self {
            kind,
            outputs,
            inputs,
        }
    }

    /// Returns what the gate lowers into.
    pub fn kind(&self) -> &MacroKind {
        &self.kind
    }

    /// Returns the driven `port → signal` connections.
    pub fn outputs(&self) -> &Connections {
        &self.outputs
    }

    /// Returns the read `port → signal` connections.
    pub fn inputs(&self) -> &Connections {
        &self.inputs
    }

    /// Emits the primitives of this gate.
    pub fn lower(&self, ctx: &mut dyn GateContext) -> Result<(), LowerError> {
        let scope = ctx.scope();
        let mut inputs = Vec::with_capacity(self.inputs.len());
        for (port, signal) in self.inputs.iter() {
            let (names, _) = ctx.target();
            inputs.push((port.to_string(), names.rooted(scope, signal)?));
        }
        let forced = match &self.kind {
            MacroKind::Special(gate) | MacroKind::Readback(gate) => gate.forced_buffer,
            _ => None,
        };
        let mut outputs = Vec::with_capacity(self.outputs.len());
        for (port, signal) in self.outputs.iter() {
            outputs.push((port.to_string(), ctx.buffered_output(signal, forced)?));
        }

        let (names, netlist) = ctx.target();
        match &self.kind {
            MacroKind::Pad(pad) => lower_pad(names, netlist, pad, &outputs, &inputs),
            MacroKind::LatchClock => {
                let gclk = names.reserved(GCLK);
                if let Some(clock) = port(&inputs, "C") {
                    netlist.buffer("BUF", gclk, clock);
                }
            }
            MacroKind::Special(gate) => {
                lower_special(names, netlist, scope, gate, &outputs, &inputs);
            }
            MacroKind::Readback(gate) => {
                let clock = port(&inputs, "CLK");
                inputs.retain(|(p, _)| p != "CLK");
                lower_special(names, netlist, scope, gate, &outputs, &inputs);
                if let Some(clock) = clock {
                    let id = netlist.add_symbol("RDCLK", Vec::new());
                    netlist
                        .symbol_mut(id)
                        .connect(PinDirection::Consumer, "I", false, clock);
                    netlist.name_symbol(names, id);
                }
            }
            MacroKind::RamBit { gate, grounded } => {
                let gnd = names.reserved(GND);
                for address in grounded {
                    inputs.push((address.clone(), gnd));
                }
                if port(&inputs, "D").is_none() {
                    inputs.push(("D".to_string(), gnd));
                }
                lower_special(names, netlist, scope, gate, &outputs, &inputs);
            }
        }
        Ok(())
    }
}

fn port(connections: &[(String, NameId)], name: &str) -> Option<NameId> {
    connections
        .iter()
        .find(|(p, _)| p == name)
        .map(|&(_, net)| net)
}

fn lower_pad(
    names: &mut Names,
    netlist: &mut Netlist,
    pad: &PadGate,
    outputs: &[(String, NameId)],
    inputs: &[(String, NameId)],
) {
    let input = port(outputs, "I");
    let tristate = port(inputs, "T");
    let mut output = port(inputs, "O");
    // pad net named after the driver if possible, else after a consumer
    let Some(base) = input.or(output).or(tristate) else {
        return;
    };
    let ext = names.derived(base, "PAD");
    if output.is_none() && tristate.is_some() {
        output = Some(names.reserved(GND));
    }
    trace!("pad {} on {}", pad.loc, names.describe(base));

    // buffers decide the pad direction, so the pad itself is always bidirectional
    netlist.add_pad(
        PadType::Bidirectional,
        ext,
        pad.loc.clone(),
        Vec::new(),
        pad.flags.clone(),
    );
    if let Some(resistor) = pad.resistor {
        let id = netlist.add_symbol(resistor, Vec::new());
        netlist
            .symbol_mut(id)
            .connect(PinDirection::Pullup, "O", false, ext);
        netlist.name_symbol(names, id);
    }
    if let Some(input) = input {
        let params = if pad.nodelay {
            vec![Param::flag("NODELAY")]
        } else {
            Vec::new()
        };
        let id = netlist.add_symbol("IBUF", params);
        let ibuf = netlist.symbol_mut(id);
        ibuf.connect(PinDirection::Consumer, "I", false, ext);
        ibuf.connect(PinDirection::Driver, "O", false, input);
    }
    if let Some(output) = output {
        let id = match tristate {
            Some(tristate) => {
                let id = netlist.add_symbol("OBUFT", Vec::new());
                netlist
                    .symbol_mut(id)
                    .connect(PinDirection::Consumer, "T", false, tristate);
                id
            }
            None => netlist.add_symbol("OBUF", Vec::new()),
        };
        let obuf = netlist.symbol_mut(id);
        obuf.connect(PinDirection::Driver, "O", false, ext);
        obuf.connect(PinDirection::Consumer, "I", false, output);
    }
}

fn lower_special(
    names: &mut Names,
    netlist: &mut Netlist,
    scope: ScopeId,
    gate: &SpecialGate,
    outputs: &[(String, NameId)],
    inputs: &[(String, NameId)],
) {
    let id = netlist.add_symbol(gate.symbol.clone(), gate.params.clone());
    connect_all(names, netlist, scope, gate, id, PinDirection::Consumer, inputs, &gate.special_inputs);
    connect_all(names, netlist, scope, gate, id, PinDirection::Driver, outputs, &gate.special_outputs);
    if netlist.symbol(id).driver().is_none() {
        allocate_name(names, netlist, scope, id);
    }
}

#[allow(clippy::too_many_arguments)]
fn connect_all(
    names: &mut Names,
    netlist: &mut Netlist,
    scope: ScopeId,
    gate: &SpecialGate,
    id: SymbolId,
    direction: PinDirection,
    connections: &[(String, NameId)],
    special_pads: &[(String, String)],
) {
    for (port, net) in connections {
        netlist.symbol_mut(id).connect(direction, port.clone(), false, *net);
    }

    // unconnected boundary-scan and readback ports go to their dedicated pad
    for (port, pad_symbol) in special_pads {
        if connections.iter().any(|(p, _)| p == port) {
            continue;
        }
        let pad = netlist.add_symbol(pad_symbol.clone(), Vec::new());
        let wire = names.scope_derived(scope, &format!("{}_{}", gate.symbol, port));
        netlist.symbol_mut(id).connect(direction, port.clone(), false, wire);
        let pad_wire = if gate.direct {
            wire
        } else {
            let pad_wire = names.derived(wire, "PAD");
            match direction {
                PinDirection::Driver => netlist.buffer("OBUF", pad_wire, wire),
                _ => netlist.buffer("IBUF", wire, pad_wire),
            };
            pad_wire
        };
        if direction == PinDirection::Driver {
            netlist
                .symbol_mut(pad)
                .connect(PinDirection::Consumer, "O", false, pad_wire);
            netlist.name_symbol(names, pad);
        } else {
            netlist
                .symbol_mut(pad)
                .connect(PinDirection::Driver, "I", false, pad_wire);
        }
    }
}

/// Names an output-less symbol after its first pin, or after the scope if it
/// has no pins at all.
fn allocate_name(names: &mut Names, netlist: &mut Netlist, scope: ScopeId, id: SymbolId) {
    if netlist.symbol(id).pins.is_empty() {
        let kind = netlist.symbol(id).kind.clone();
        netlist.symbol_mut(id).name = Some(names.scope_derived(scope, &kind));
    } else {
        netlist.name_symbol(names, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{for_part, ChipFamily};
    use xnet_common::SourceLocation;
    use xnet_diagnostics::DiagnosticSink;
    use xnet_netlist::Symbol;

    struct TestContext {
        scope: ScopeId,
        names: Names,
        netlist: Netlist,
    }

    impl TestContext {
        fn new(family: &dyn ChipFamily) -> Self {
            let mut names = Names::new(false);
            let scope = names.root();
            Self {
                scope,
                names,
                netlist: Netlist::new(family.capabilities()),
            }
        }

        fn resolved(mut self) -> (Names, Netlist) {
            self.names.resolve();
            (self.names, self.netlist)
        }
    }

    impl GateContext for TestContext {
        fn scope(&self) -> ScopeId {
            self.scope
        }

        fn target(&mut self) -> (&mut Names, &mut Netlist) {
            (&mut self.names, &mut self.netlist)
        }

        fn buffered_output(&mut self, signal: &str, forced: Option<&str>) -> Result<NameId, LowerError> {
            let public = self.names.rooted(self.scope, signal)?;
            Ok(match forced {
                Some(buffer) => {
                    let private = self.names.derived(public, buffer);
                    self.netlist.buffer(buffer, public, private);
                    private
                }
                None => public,
            })
        }
    }

    fn lower(part: &str, kind: &str, flags: &[&str], pins: &[(&str, &str)]) -> (Names, Netlist) {
        let family = for_part(part).unwrap();
        let sink = DiagnosticSink::new();
        let gates = family
            .instantiate(&sink, &SourceLocation::unknown(), kind, flags, pins)
            .unwrap();
        let mut ctx = TestContext::new(family.as_ref());
        for gate in &gates {
            gate.lower(&mut ctx).unwrap();
        }
        ctx.resolved()
    }

    fn lower_pad(part: &str, flags: &[&str], pins: &[(&str, &str)]) -> (Names, Netlist) {
        let family = for_part(part).unwrap();
        let sink = DiagnosticSink::new();
        let gates = family
            .pad(&sink, &SourceLocation::unknown(), "P7", flags, pins)
            .unwrap();
        let mut ctx = TestContext::new(family.as_ref());
        gates[0].lower(&mut ctx).unwrap();
        ctx.resolved()
    }

    fn find<'a>(netlist: &'a Netlist, kind: &str) -> Vec<&'a Symbol> {
        netlist
            .symbols()
            .map(|(_, symbol)| symbol)
            .filter(|symbol| symbol.kind == kind)
            .collect()
    }

    fn net<'a>(names: &'a Names, symbol: &Symbol, pin: &str) -> &'a str {
        names.name(symbol.pin(pin).unwrap().net)
    }

    #[test]
    fn input_pad_with_pullup() {
        let (names, netlist) = lower_pad("4005", &["pullup", "nodelay"], &[("I", "din")]);
        let pad = &netlist.pads()[0];
        assert_eq!(pad.kind, PadType::Bidirectional);
        assert_eq!(pad.loc, "P7");
        assert_eq!(names.name(pad.net), "din/PAD");

        let ibuf = find(&netlist, "IBUF")[0];
        assert_eq!(ibuf.params, [Param::flag("NODELAY")]);
        assert_eq!(net(&names, ibuf, "I"), "din/PAD");
        assert_eq!(net(&names, ibuf, "O"), "din");

        let pullup = find(&netlist, "PULLUP")[0];
        assert_eq!(pullup.pins[0].direction, PinDirection::Pullup);
        assert_eq!(names.name(pullup.instance_name().unwrap()), "din/PAD/PULLUP");
        assert!(find(&netlist, "OBUF").is_empty());
    }

    #[test]
    fn tristate_pad_uses_obuft() {
        let (names, netlist) = lower_pad("3020", &["fast"], &[("O", "dout"), ("T", "oe")]);
        assert_eq!(netlist.pads()[0].flags, ["FAST"]);
        let obuft = find(&netlist, "OBUFT")[0];
        assert_eq!(net(&names, obuft, "I"), "dout");
        assert_eq!(net(&names, obuft, "T"), "oe");
        assert_eq!(net(&names, obuft, "O"), "dout/PAD");
    }

    #[test]
    fn open_drain_pad_drives_ground() {
        let (names, netlist) = lower_pad("3020", &[], &[("T", "oe")]);
        let obuft = find(&netlist, "OBUFT")[0];
        assert_eq!(net(&names, obuft, "I"), "GND");
        assert_eq!(names.name(netlist.pads()[0].net), "oe/PAD");
    }

    #[test]
    fn latch_clock_drives_gclk() {
        let (names, netlist) = lower("2064", crate::LATCH_CLOCK, &[], &[("C", "clk")]);
        let buf = find(&netlist, "BUF")[0];
        assert_eq!(net(&names, buf, "O"), "GCLK");
        assert_eq!(net(&names, buf, "I"), "clk");
    }

    #[test]
    fn bscan_special_pads() {
        let (names, netlist) = lower("4010", "bscan", &[], &[("TDO1", "chain"), ("DRCK", "drck")]);
        let bscan = find(&netlist, "BSCAN")[0];
        assert_eq!(net(&names, bscan, "TDO1"), "chain");
        assert_eq!(net(&names, bscan, "DRCK"), "drck");
        assert_eq!(net(&names, bscan, "TDI"), "BSCAN_TDI");
        assert_eq!(net(&names, bscan, "TDO"), "BSCAN_TDO");

        let tdi = find(&netlist, "TDI")[0];
        assert_eq!(tdi.pins[0].direction, PinDirection::Driver);
        assert_eq!(net(&names, tdi, "I"), "BSCAN_TDI");
        let tdo = find(&netlist, "TDO")[0];
        assert_eq!(net(&names, tdo, "O"), "BSCAN_TDO");
        assert_eq!(names.name(tdo.instance_name().unwrap()), "BSCAN_TDO/TDO");
        assert!(find(&netlist, "IBUF").is_empty());
    }

    #[test]
    fn readback_clock_and_buffered_pads() {
        let (names, netlist) = lower("5210", "RDBK", &[], &[("CLK", "rclk"), ("RIP", "rip")]);
        let rdbk = find(&netlist, "RDBK")[0];
        assert!(rdbk.pin("CLK").is_none());
        assert_eq!(net(&names, rdbk, "TRIG"), "RDBK_TRIG");

        let ibuf = find(&netlist, "IBUF")[0];
        assert_eq!(net(&names, ibuf, "I"), "RDBK_TRIG/PAD");
        let md0 = find(&netlist, "MD0")[0];
        assert_eq!(net(&names, md0, "I"), "RDBK_TRIG/PAD");
        let obuf = find(&netlist, "OBUF")[0];
        assert_eq!(net(&names, obuf, "I"), "RDBK_DATA");
        assert_eq!(net(&names, obuf, "O"), "RDBK_DATA/PAD");

        let rdclk = find(&netlist, "RDCLK")[0];
        assert_eq!(net(&names, rdclk, "I"), "rclk");
        assert_eq!(names.name(rdclk.instance_name().unwrap()), "rclk/RDCLK");
    }

    #[test]
    fn output_less_macro_is_named_after_scope() {
        let (names, netlist) = lower("4003", "STARTUP", &[], &[]);
        let startup = find(&netlist, "STARTUP")[0];
        assert_eq!(names.name(startup.instance_name().unwrap()), "STARTUP");
    }

    #[test]
    fn forced_oscillator_buffer() {
        let (names, netlist) = lower("2018", "OSC", &[], &[("O", "osc")]);
        let osc = find(&netlist, "OSC")[0];
        assert_eq!(net(&names, osc, "O"), "osc/ACLK");
        let aclk = find(&netlist, "ACLK")[0];
        assert_eq!(net(&names, aclk, "O"), "osc");
    }

    #[test]
    fn ram_bits_ground_unconnected_pins() {
        let (names, netlist) = lower("4005", "RAMS", &[], &[("A0", "a"), ("WE", "we"), ("WCLK", "clk"), ("O0", "q")]);
        let ram = find(&netlist, "RAMS")[0];
        assert_eq!(net(&names, ram, "A0"), "a");
        for address in ["A1", "A2", "A3", "A4", "D"] {
            assert_eq!(net(&names, ram, address), "GND", "{address}");
        }
        assert_eq!(net(&names, ram, "O"), "q");
    }
}
