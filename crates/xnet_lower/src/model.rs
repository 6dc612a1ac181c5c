//! The parsed design as the lowering core consumes it.
//!
//! A front end builds one [`Model`] per source model: declared ports and
//! clocks, buffer declarations and an ordered list of [`Gate`]s. Models keep
//! track of which gate drives which signal, so that the converter can infer
//! unspecified ports and check driver conflicts.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use xnet_chips::CustomGate;
use xnet_common::SourceLocation;
use xnet_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use xnet_netlist::{LatchType, LowerError};

/// One literal of a product term.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    /// The input signal.
    pub input: String,
    /// Whether the input is used inverted.
    pub invert: bool,
}

/// A product term: the AND of its literals, optionally inverted.
///
/// A product without literals is constant true.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// The literals, in input order.
    pub literals: Vec<Literal>,
    /// Whether the product is inverted.
    pub invert: bool,
}

impl Product {
    /// Creates a product from `(input, invert)` pairs.
    pub fn new<S: Into<String>>(literals: impl IntoIterator<Item = (S, bool)>, invert: bool) -> Self {
        Self {
            literals: literals
                .into_iter()
                .map(|(input, invert)| Literal {
                    input: input.into(),
                    invert,
                })
                .collect(),
            invert,
        }
    }
}

/// A two-level logic function: the OR of its products.
///
/// Without products the output is constant false.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumOfProducts {
    /// The driven signal.
    pub output: String,
    /// Declared inputs, including ones no product uses.
    pub inputs: Vec<String>,
    /// The product terms.
    pub products: Vec<Product>,
}

impl SumOfProducts {
    /// Creates a function without products.
    pub fn new<S: Into<String>>(output: impl Into<String>, inputs: impl IntoIterator<Item = S>) -> Self {
        Self {
            output: output.into(),
            inputs: inputs.into_iter().map(Into::into).collect(),
            products: Vec::new(),
        }
    }

    /// Adds a cover row: one of `0`, `1` or `-` per input, and an output bit
    /// of `1` (the product) or `0` (the inverted product).
    pub fn add_row(&mut self, bits: &str, output: char) -> Result<(), ModelError> {
        let bits: Vec<char> = bits.chars().collect();
        if bits.len() != self.inputs.len() {
            return Err(ModelError::CoverWidth {
                output: self.output.clone(),
                expected: self.inputs.len(),
                found: bits.len(),
            });
        }
        let invert = match output {
            '1' => false,
            '0' => true,
            bit => return Err(self.illegal("output", bit)),
        };
        let mut literals = Vec::new();
        for (input, &bit) in self.inputs.iter().zip(&bits) {
            match bit {
                '0' => literals.push((input.clone(), true)),
                '1' => literals.push((input.clone(), false)),
                '-' => {}
                bit => return Err(self.illegal("input", bit)),
            }
        }
        self.products.push(Product::new(literals, invert));
        Ok(())
    }

    fn illegal(&self, position: &'static str, bit: char) -> ModelError {
        ModelError::IllegalBit {
            output: self.output.clone(),
            position,
            bit,
        }
    }
}

/// The clocking of a storage element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LatchKind {
    /// Flip-flop, rising edge.
    RisingEdge,
    /// Flip-flop, falling edge.
    FallingEdge,
    /// Latch, transparent while the clock is high.
    ActiveHigh,
    /// Latch, transparent while the clock is low.
    ActiveLow,
    /// Asynchronous; no target implements it.
    Asynchronous,
}

impl LatchKind {
    /// Returns the primitive and whether its clock pin is inverted, or
    /// `None` for asynchronous elements.
    pub fn primitive(self) -> Option<(LatchType, bool)> {
        match self {
            Self::RisingEdge => Some((LatchType::FlipFlop, false)),
            Self::FallingEdge => Some((LatchType::FlipFlop, true)),
            Self::ActiveHigh => Some((LatchType::Latch, false)),
            Self::ActiveLow => Some((LatchType::Latch, true)),
            Self::Asynchronous => None,
        }
    }
}

/// The power-up value of a storage element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InitialValue {
    /// Powers up 0.
    Reset,
    /// Powers up 1.
    Preset,
    /// Unpredictable.
    DontCare,
    /// Not specified.
    #[default]
    Unknown,
}

impl InitialValue {
    /// Returns whether the element must power up set. Don't-care and
    /// unspecified values use the reset form.
    pub fn is_set(self) -> bool {
        self == Self::Preset
    }
}

/// A flip-flop or latch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Latch {
    /// The driven signal.
    pub output: String,
    /// The data input.
    pub input: String,
    /// Clocking.
    pub kind: LatchKind,
    /// Clock signal; the global latch clock if absent.
    pub clock: Option<String>,
    /// Power-up value.
    pub init: InitialValue,
}

/// A gate of a model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Gate {
    /// Two-level logic.
    SumOfProducts(SumOfProducts),
    /// A storage element.
    Latch(Latch),
    /// A chip-specific macro cell or pad.
    Custom(CustomGate),
}

impl Gate {
    /// Returns the signals this gate drives.
    pub fn outputs(&self) -> Vec<&str> {
        match self {
            Gate::SumOfProducts(sop) => vec![sop.output.as_str()],
            Gate::Latch(latch) => vec![latch.output.as_str()],
            Gate::Custom(gate) => gate.outputs().signals().collect(),
        }
    }

    /// Returns the signals this gate reads.
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            Gate::SumOfProducts(sop) => sop.inputs.iter().map(String::as_str).collect(),
            Gate::Latch(latch) => {
                let mut inputs = vec![latch.input.as_str()];
                inputs.extend(latch.clock.as_deref());
                inputs
            }
            Gate::Custom(gate) => gate.inputs().signals().collect(),
        }
    }
}

/// One model of the design.
#[derive(Clone, Debug)]
pub struct Model {
    name: String,
    location: SourceLocation,
    inputs: Option<BTreeSet<String>>,
    outputs: Option<BTreeSet<String>>,
    clocks: BTreeSet<String>,
    buffers: BTreeMap<String, String>,
    gates: Vec<Gate>,
    drivers: BTreeSet<String>,
    consumers: BTreeSet<String>,
}

impl Model {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            location,
            inputs: None,
            outputs: None,
            clocks: BTreeSet::new(),
            buffers: BTreeMap::new(),
            gates: Vec::new(),
            drivers: BTreeSet::new(),
            consumers: BTreeSet::new(),
        }
    }

    /// Returns the model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns where the model was declared.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Declares input ports.
    pub fn add_inputs<S: Into<String>>(&mut self, names: impl IntoIterator<Item = S>) {
        self.inputs
            .get_or_insert_with(BTreeSet::new)
            .extend(names.into_iter().map(Into::into));
    }

    /// Declares output ports.
    pub fn add_outputs<S: Into<String>>(&mut self, names: impl IntoIterator<Item = S>) {
        self.outputs
            .get_or_insert_with(BTreeSet::new)
            .extend(names.into_iter().map(Into::into));
    }

    /// Declares clock inputs.
    pub fn add_clocks<S: Into<String>>(&mut self, names: impl IntoIterator<Item = S>) {
        self.clocks.extend(names.into_iter().map(Into::into));
    }

    /// Routes `signals` through a buffer of type `buffer` before they reach
    /// their public net.
    pub fn add_buffer<S: AsRef<str>>(
        &mut self,
        buffer: &str,
        signals: impl IntoIterator<Item = S>,
    ) -> Result<(), ModelError> {
        for signal in signals {
            let signal = signal.as_ref();
            match self.buffers.get(signal) {
                Some(first) if !first.eq_ignore_ascii_case(buffer) => {
                    return Err(ModelError::ConflictingBuffer {
                        signal: signal.to_string(),
                        first: first.clone(),
                        second: buffer.to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    self.buffers.insert(signal.to_string(), buffer.to_string());
                }
            }
        }
        Ok(())
    }

    /// Appends a gate.
    pub fn add_gate(&mut self, gate: Gate) -> Result<(), ModelError> {
        if let Some(signal) = gate.outputs().into_iter().find(|s| self.drivers.contains(*s)) {
            return Err(ModelError::MultipleDrivers {
                signal: signal.to_string(),
                model: self.name.clone(),
            });
        }
        self.drivers
            .extend(gate.outputs().into_iter().map(String::from));
        self.consumers
            .extend(gate.inputs().into_iter().map(String::from));
        self.gates.push(gate);
        Ok(())
    }

    /// Completes the port lists and checks the clocks.
    ///
    /// Without declared inputs, the inputs are the signals read but not
    /// driven; with declared inputs, such signals are tied to 0 with a
    /// warning. Clocks always count as inputs. Without declared outputs, the
    /// outputs are the signals driven but not read. A declared clock that a
    /// gate drives is an error.
    pub fn infer_io(&mut self, sink: &DiagnosticSink) -> Result<(), LowerError> {
        let mut undriven: BTreeSet<String> =
            self.consumers.difference(&self.drivers).cloned().collect();
        match self.inputs.as_mut() {
            Some(inputs) => {
                inputs.extend(self.clocks.iter().cloned());
                let missing: Vec<String> = undriven.difference(inputs).cloned().collect();
                for signal in missing {
                    sink.emit(Diagnostic::warning(
                        DiagnosticCode::new(Category::Design, 201),
                        format!("undriven signal, assuming zero: {signal}"),
                        self.location.clone(),
                    ));
                    // no products: constant zero
                    let zero = SumOfProducts::new(signal, Vec::<String>::new());
                    self.drivers.insert(zero.output.clone());
                    self.gates.push(Gate::SumOfProducts(zero));
                }
            }
            None => {
                undriven.extend(self.clocks.iter().cloned());
                self.inputs = Some(undriven);
            }
        }

        let unused: BTreeSet<String> = self.drivers.difference(&self.consumers).cloned().collect();
        match &self.outputs {
            Some(outputs) => {
                let unused: Vec<&str> = unused.difference(outputs).map(String::as_str).collect();
                if !unused.is_empty() {
                    sink.emit(Diagnostic::note(
                        DiagnosticCode::new(Category::Design, 202),
                        format!("unused signals in model {}: {}", self.name, unused.join(" ")),
                        self.location.clone(),
                    ));
                }
            }
            None => self.outputs = Some(unused),
        }

        match self.clocks.iter().find(|clock| self.drivers.contains(*clock)) {
            Some(clock) => Err(LowerError::DrivenClock {
                net: clock.clone(),
                model: self.name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Returns the input ports; empty before [`infer_io`](Model::infer_io)
    /// unless declared.
    pub fn inputs(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().flatten().map(String::as_str)
    }

    /// Returns the output ports; empty before [`infer_io`](Model::infer_io)
    /// unless declared.
    pub fn outputs(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().flatten().map(String::as_str)
    }

    /// Returns the declared clocks.
    pub fn clocks(&self) -> impl Iterator<Item = &str> {
        self.clocks.iter().map(String::as_str)
    }

    /// Returns every signal some gate drives.
    pub fn drivers(&self) -> impl Iterator<Item = &str> {
        self.drivers.iter().map(String::as_str)
    }

    /// Returns every signal some gate reads.
    pub fn consumers(&self) -> impl Iterator<Item = &str> {
        self.consumers.iter().map(String::as_str)
    }

    /// Returns the declared buffer type of `signal`.
    pub fn buffer(&self, signal: &str) -> Option<&str> {
        self.buffers.get(signal).map(String::as_str)
    }

    /// Returns all `(signal, buffer type)` declarations.
    pub fn buffers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.buffers.iter().map(|(s, b)| (s.as_str(), b.as_str()))
    }

    /// Returns the gates in declaration order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }
}
