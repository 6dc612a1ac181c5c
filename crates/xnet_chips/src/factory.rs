//! Macro-cell factories and connection validation.

use crate::gate::CustomGate;
use xnet_common::SourceLocation;
use xnet_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use xnet_netlist::LowerError;

/// Factory name of I/O pads. Lowercase, so no `.gate` can name it.
pub const IOPAD: &str = "iopad";
/// Factory name of the implicit latch clock driver.
pub const LATCH_CLOCK: &str = "LATCHCLOCK";

/// Ordered `port → signal` connections of one macro instance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Connections(Vec<(String, String)>);

impl Connections {
    /// Creates an empty connection list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the signal connected to `port`.
    pub fn get(&self, port: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| p == port)
            .map(|(_, signal)| signal.as_str())
    }

    /// Returns whether `port` is connected.
    pub fn contains(&self, port: &str) -> bool {
        self.get(port).is_some()
    }

    /// Connects `port`, replacing an earlier connection.
    pub fn insert(&mut self, port: impl Into<String>, signal: impl Into<String>) {
        let port = port.into();
        let signal = signal.into();
        match self.0.iter_mut().find(|(p, _)| *p == port) {
            Some(entry) => entry.1 = signal,
            None => self.0.push((port, signal)),
        }
    }

    /// Disconnects `port`, returning its signal.
    pub fn remove(&mut self, port: &str) -> Option<String> {
        let index = self.0.iter().position(|(p, _)| p == port)?;
        Some(self.0.remove(index).1)
    }

    /// Iterates over `(port, signal)` pairs in connection order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, s)| (p.as_str(), s.as_str()))
    }

    /// Returns the connected signals.
    pub fn signals(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, s)| s.as_str())
    }

    /// Returns the number of connections.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is connected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<P: Into<String>, S: Into<String>> FromIterator<(P, S)> for Connections {
    fn from_iter<T: IntoIterator<Item = (P, S)>>(iter: T) -> Self {
        let mut connections = Connections::new();
        for (port, signal) in iter {
            connections.insert(port, signal);
        }
        connections
    }
}

/// The ports and flags a macro cell accepts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MacroSignature {
    /// Ports read by the macro.
    pub inputs: Vec<String>,
    /// Ports driven by the macro.
    pub outputs: Vec<String>,
    /// Accepted flags.
    pub flags: Vec<String>,
    /// Ports that must be connected.
    pub required: Vec<String>,
}

impl MacroSignature {
    /// Creates a signature from string slices.
    pub fn new(outputs: &[&str], inputs: &[&str], required: &[&str]) -> Self {
        let own = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            inputs: own(inputs),
            outputs: own(outputs),
            flags: Vec::new(),
            required: own(required),
        }
    }

    /// Replaces the accepted flags.
    pub fn with_flags<I: IntoIterator<Item = S>, S: Into<String>>(mut self, flags: I) -> Self {
        self.flags = flags.into_iter().map(Into::into).collect();
        self
    }
}

/// Creates custom gates for one macro-cell type.
pub trait CustomGateFactory: std::fmt::Debug + Send + Sync {
    /// Returns the accepted ports and flags.
    fn signature(&self) -> &MacroSignature;

    /// Creates the gates for a validated instance.
    ///
    /// `name` is the macro type for `.gate` instances and the package
    /// location for pads. Flags and port names are upper case.
    fn instantiate(
        &self,
        sink: &DiagnosticSink,
        location: &SourceLocation,
        name: &str,
        flags: &[String],
        outputs: &Connections,
        inputs: &Connections,
    ) -> Result<Vec<CustomGate>, LowerError>;
}

/// Checks `pin=signal` connections and flags against a factory signature,
/// then instantiates.
///
/// Pin names and flags are case-insensitive. Every problem is collected into
/// one [`LowerError::InvalidMacro`]: unknown flags, unknown pins, pins
/// connected twice, empty names and unconnected required pins. Repeated flags
/// only produce a note.
pub fn instantiate(
    factory: &dyn CustomGateFactory,
    sink: &DiagnosticSink,
    location: &SourceLocation,
    kind: &str,
    name: &str,
    flags: &[&str],
    pins: &[(&str, &str)],
) -> Result<Vec<CustomGate>, LowerError> {
    let signature = factory.signature();
    let mut problems = Vec::new();

    let mut accepted: Vec<String> = Vec::new();
    for flag in flags {
        let flag = flag.to_ascii_uppercase();
        if !signature.flags.contains(&flag) {
            problems.push(format!("unknown flag {flag}"));
        }
        if accepted.contains(&flag) {
            sink.emit(Diagnostic::note(
                DiagnosticCode::new(Category::Macro, 5),
                format!("duplicate flag {flag} on {kind} {name}"),
                location.clone(),
            ));
            continue;
        }
        accepted.push(flag);
    }

    let mut inputs = Connections::new();
    let mut outputs = Connections::new();
    for (pin, signal) in pins {
        let pin = pin.to_ascii_uppercase();
        if pin.is_empty() {
            problems.push("missing pin name".to_string());
            continue;
        }
        if signal.is_empty() {
            problems.push(format!("missing signal name for pin {pin}"));
            continue;
        }
        if let Some(existing) = inputs.get(&pin).or_else(|| outputs.get(&pin)) {
            problems.push(format!(
                "duplicate connection: pin {pin} connects to both {signal} and {existing}"
            ));
            continue;
        }
        if signature.inputs.contains(&pin) {
            inputs.insert(pin, *signal);
        } else if signature.outputs.contains(&pin) {
            outputs.insert(pin, *signal);
        } else {
            problems.push(format!("connection to nonexistent pin {pin}"));
        }
    }

    for pin in &signature.required {
        if !inputs.contains(pin) && !outputs.contains(pin) {
            problems.push(format!("required pin {pin} not connected"));
        }
    }

    if !problems.is_empty() {
        return Err(LowerError::invalid_macro(kind, name, problems.join("; ")));
    }
    factory.instantiate(sink, location, name, &accepted, &outputs, &inputs)
}
