//! Primitive symbol instances and their pins.

use serde::{Deserialize, Serialize};
use xnet_common::define_id;
use xnet_naming::NameId;

define_id!(
    /// Opaque handle to a symbol in a [`Netlist`](crate::Netlist).
    SymbolId
);

/// Direction of a symbol pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinDirection {
    /// The pin drives its net.
    Driver,
    /// The pin reads its net.
    Consumer,
    /// The pin weakly pulls its net, as pull resistors do.
    Pullup,
}

impl PinDirection {
    /// Returns the direction code of the target format.
    pub fn code(self) -> &'static str {
        match self {
            PinDirection::Driver | PinDirection::Pullup => "O",
            PinDirection::Consumer => "I",
        }
    }
}

/// One pin connection of a symbol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    /// Pin name, e.g. `I0` or `O`.
    pub name: String,
    /// Direction of the pin.
    pub direction: PinDirection,
    /// Whether the pin is inverted.
    pub invert: bool,
    /// The connected net.
    pub net: NameId,
}

/// A `NAME` or `NAME=VALUE` parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Parameter value, if any.
    pub value: Option<String>,
}

impl Param {
    /// A `NAME` flag parameter.
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// A `NAME=VALUE` parameter.
    pub fn value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// A primitive instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Primitive type, e.g. `AND`, `DFF`, `OBUFT`.
    pub kind: String,
    /// Explicit instance name; symbols with a driver pin default to the
    /// driven net.
    pub name: Option<NameId>,
    /// Parameters in insertion order.
    pub params: Vec<Param>,
    /// Pins in connection order.
    pub pins: Vec<Pin>,
}

impl Symbol {
    /// Creates an unconnected symbol.
    pub fn new(kind: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            params,
            pins: Vec::new(),
        }
    }

    /// Appends a pin connection.
    pub fn connect(&mut self, direction: PinDirection, pin: impl Into<String>, invert: bool, net: NameId) {
        self.pins.push(Pin {
            name: pin.into(),
            direction,
            invert,
            net,
        });
    }

    /// Returns the first driver pin, if any.
    pub fn driver(&self) -> Option<&Pin> {
        self.pins
            .iter()
            .find(|pin| pin.direction == PinDirection::Driver)
    }

    /// Returns the pins reading their net.
    pub fn inputs(&self) -> impl Iterator<Item = &Pin> {
        self.pins
            .iter()
            .filter(|pin| pin.direction == PinDirection::Consumer)
    }

    /// Returns the pin called `name`.
    pub fn pin(&self, name: &str) -> Option<&Pin> {
        self.pins.iter().find(|pin| pin.name == name)
    }

    /// Returns the identifier the symbol instance is named after.
    pub fn instance_name(&self) -> Option<NameId> {
        self.name.or_else(|| self.driver().map(|pin| pin.net))
    }
}
