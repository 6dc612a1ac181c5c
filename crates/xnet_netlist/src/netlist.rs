//! The netlist container and its capability-dependent primitives.

use crate::error::LowerError;
use crate::pad::{Pad, PadType};
use crate::symbol::{Param, PinDirection, Symbol, SymbolId};
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use xnet_common::Arena;
use xnet_naming::{NameId, Names};

/// What the target chip family can implement natively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Maximum inputs of a primitive logic gate, at least 2.
    pub max_gate_inputs: usize,
    /// Whether level-sensitive latches exist.
    pub has_latches: bool,
    /// Whether latches and flip-flops accept an `INIT` parameter.
    pub has_latch_init_value: bool,
}

/// One operand of a packed gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Term {
    /// The operand net.
    pub net: NameId,
    /// Whether the gate input is inverted.
    pub invert: bool,
}

impl Term {
    /// Creates an operand.
    pub fn new(net: NameId, invert: bool) -> Self {
        Self { net, invert }
    }
}

/// Storage element kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LatchType {
    /// Edge-triggered D flip-flop.
    FlipFlop,
    /// Level-sensitive D latch.
    Latch,
}

impl LatchType {
    /// Returns the primitive type name.
    pub fn symbol(self) -> &'static str {
        match self {
            LatchType::FlipFlop => "DFF",
            LatchType::Latch => "DLAT",
        }
    }

    /// Returns the name of the clock (or gate enable) pin.
    pub fn clock_pin(self) -> &'static str {
        match self {
            LatchType::FlipFlop => "C",
            LatchType::Latch => "G",
        }
    }
}

/// The output netlist: primitive symbols and external pads.
#[derive(Debug)]
pub struct Netlist {
    capabilities: Capabilities,
    symbols: Arena<SymbolId, Symbol>,
    pads: Vec<Pad>,
}

impl Netlist {
    /// Creates an empty netlist for a target with the given capabilities.
    ///
    /// # Panics
    ///
    /// Panics if `capabilities.max_gate_inputs` is less than 2.
    pub fn new(capabilities: Capabilities) -> Self {
        assert!(
            capabilities.max_gate_inputs >= 2,
            "gates need at least 2 inputs"
        );
        Self {
            capabilities,
            symbols: Arena::new(),
            pads: Vec::new(),
        }
    }

    /// Returns the target capabilities.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Adds an unconnected symbol.
    pub fn add_symbol(&mut self, kind: impl Into<String>, params: Vec<Param>) -> SymbolId {
        self.symbols.alloc(Symbol::new(kind, params))
    }

    /// Returns a symbol.
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    /// Returns a symbol for connecting pins.
    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id]
    }

    /// Iterates over all symbols in creation order.
    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols.iter()
    }

    /// Returns the number of symbols.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Gives a symbol without a driver pin an explicit instance name, derived
    /// from its first pin's net and qualified by its type.
    ///
    /// # Panics
    ///
    /// Panics if the symbol has no pins yet.
    pub fn name_symbol(&mut self, names: &mut Names, id: SymbolId) -> NameId {
        let symbol = &self.symbols[id];
        let base = match symbol.pins.first() {
            Some(pin) => pin.net,
            None => panic!("cannot name unconnected {} symbol", symbol.kind),
        };
        let name = names.derived(base, &symbol.kind);
        self.symbols[id].name = Some(name);
        name
    }

    /// Adds an external pad.
    pub fn add_pad(
        &mut self,
        kind: PadType,
        net: NameId,
        loc: impl Into<String>,
        params: Vec<Param>,
        flags: Vec<String>,
    ) {
        self.pads.push(Pad {
            kind,
            net,
            loc: loc.into(),
            params,
            flags,
        });
    }

    /// Returns all pads in creation order.
    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    /// Combines `terms` with the associative gate `kind` into a tree of gates
    /// with at most [`Capabilities::max_gate_inputs`] inputs each.
    ///
    /// Terms are taken from a FIFO queue; when a gate is full and terms
    /// remain, its output becomes a new intermediate net `<output>/<KIND>`
    /// appended to the queue. Every gate thus gets at least 2 inputs. The last
    /// gate drives `output`, inverted if `invert_output` is set.
    ///
    /// # Panics
    ///
    /// Panics if fewer than 2 terms are given; single terms are buffers, not
    /// gates.
    pub fn pack(
        &mut self,
        names: &mut Names,
        kind: &str,
        output: NameId,
        invert_output: bool,
        terms: Vec<Term>,
    ) {
        assert!(terms.len() >= 2, "too few inputs for {kind}: {}", terms.len());

        let max = self.capabilities.max_gate_inputs;
        let mut queue: VecDeque<Term> = terms.into();
        let mut gate = self.add_symbol(kind, Vec::new());
        let mut connected = 0;
        while let Some(term) = queue.pop_front() {
            if connected >= max {
                // intermediate only once another term is known to follow
                let intermediate = names.derived(output, kind);
                self.symbols[gate].connect(PinDirection::Driver, "O", false, intermediate);
                queue.push_back(Term::new(intermediate, false));
                gate = self.add_symbol(kind, Vec::new());
                connected = 0;
            }
            self.symbols[gate].connect(
                PinDirection::Consumer,
                format!("I{connected}"),
                term.invert,
                term.net,
            );
            connected += 1;
        }
        self.symbols[gate].connect(PinDirection::Driver, "O", invert_output, output);
    }

    /// Adds a single-input primitive such as `BUF`, `INV` or a clock buffer.
    pub fn buffer(&mut self, kind: &str, output: NameId, input: NameId) -> SymbolId {
        let id = self.add_symbol(kind, Vec::new());
        let symbol = &mut self.symbols[id];
        symbol.connect(PinDirection::Consumer, "I", false, input);
        symbol.connect(PinDirection::Driver, "O", false, output);
        id
    }

    /// Adds a flip-flop or latch with the given power-up value.
    ///
    /// Targets without an `INIT` parameter only power up reset; a preset
    /// element is then built from a reset one between two inverters,
    /// `<input>/INV` on the data side and `<output>/INV` on the output side.
    pub fn latch(
        &mut self,
        names: &mut Names,
        kind: LatchType,
        init_set: bool,
        output: NameId,
        input: NameId,
        clock: NameId,
        invert_clock: bool,
    ) -> Result<SymbolId, LowerError> {
        if kind == LatchType::Latch && !self.capabilities.has_latches {
            return Err(LowerError::Unsupported {
                feature: "latches".to_string(),
                net: names.describe(output),
            });
        }

        let (params, d, q) = if self.capabilities.has_latch_init_value {
            let init = if init_set { "S" } else { "R" };
            (vec![Param::value("INIT", init)], input, output)
        } else if init_set {
            trace!("emulating preset {} for {}", kind.symbol(), names.describe(output));
            let d = names.derived(input, "INV");
            self.buffer("INV", d, input);
            let q = names.derived(output, "INV");
            self.buffer("INV", output, q);
            (Vec::new(), d, q)
        } else {
            (Vec::new(), input, output)
        };

        let id = self.add_symbol(kind.symbol(), params);
        let symbol = &mut self.symbols[id];
        symbol.connect(PinDirection::Consumer, kind.clock_pin(), invert_clock, clock);
        symbol.connect(PinDirection::Consumer, "D", false, d);
        symbol.connect(PinDirection::Driver, "Q", false, q);
        Ok(id)
    }
}
