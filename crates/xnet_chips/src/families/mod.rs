//! The supported Xilinx XC2000/XC3000/XC4000/XC5200 families.

pub mod xc2000;
pub mod xc3000;
pub mod xc4000;
pub mod xc5200;

use crate::clock::LatchClockFactory;
use crate::factory::{CustomGateFactory, IOPAD, LATCH_CLOCK};
use crate::pad::{PadFactory, PadFeatures};
use crate::ChipFamily;
use serde::{Deserialize, Serialize};
use xnet_netlist::Capabilities;

/// A chip family known to the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FamilyKind {
    /// XC2000: 4-input function generators, native latches.
    Xc2000,
    /// XC3000, XC3100 and their A variants.
    Xc3000,
    /// XC4000: flip-flops with selectable initial value.
    Xc4000,
    /// XC5200: native latches, no initial value.
    Xc5200,
}

impl FamilyKind {
    /// All families, in part lookup order.
    pub const ALL: [FamilyKind; 4] = [
        FamilyKind::Xc2000,
        FamilyKind::Xc3000,
        FamilyKind::Xc4000,
        FamilyKind::Xc5200,
    ];

    /// Returns the human-readable name of this family.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Xc2000 => "XC2000",
            Self::Xc3000 => "XC3000/XC3100/XC3000A/XC3100A",
            Self::Xc4000 => "XC4000",
            Self::Xc5200 => "XC5200",
        }
    }

    /// Part number prefix: each element lists the characters allowed at that
    /// position, `#` standing for any digit.
    fn part_pattern(&self) -> &'static [&'static str] {
        match self {
            Self::Xc2000 => &["2", "0", "#", "#"],
            Self::Xc3000 => &["3", "01", "#", "#"],
            Self::Xc4000 => &["4", "#", "#", "#"],
            Self::Xc5200 => &["5", "2", "#", "#"],
        }
    }

    /// Returns whether `part` (without `XC` prefix) belongs to this family.
    ///
    /// Only the leading digits are checked, so speed grades and packages may
    /// follow in any form.
    pub fn matches(&self, part: &str) -> bool {
        let pattern = self.part_pattern();
        let chars: Vec<char> = part.chars().take(pattern.len()).collect();
        chars.len() == pattern.len()
            && pattern.iter().zip(&chars).all(|(allowed, &c)| match *allowed {
                "#" => c.is_ascii_digit(),
                allowed => allowed.contains(c.to_ascii_uppercase()),
            })
    }

    /// Returns the family a part number belongs to.
    ///
    /// An optional `XC` prefix is ignored, in any case.
    pub fn for_part(part: &str) -> Option<FamilyKind> {
        let bare = match part.get(..2) {
            Some(prefix) if prefix.eq_ignore_ascii_case("XC") => &part[2..],
            _ => part,
        };
        Self::ALL.into_iter().find(|kind| kind.matches(bare))
    }
}

/// Capabilities, buffers and macro cells of one family.
#[derive(Debug)]
pub struct Family {
    kind: FamilyKind,
    capabilities: Capabilities,
    buffer_types: Vec<&'static str>,
    factories: Vec<(String, Box<dyn CustomGateFactory>)>,
}

impl Family {
    /// Builds the description of `kind`.
    pub fn new(kind: FamilyKind) -> Self {
        match kind {
            FamilyKind::Xc2000 => xc2000::family(),
            FamilyKind::Xc3000 => xc3000::family(),
            FamilyKind::Xc4000 => xc4000::family(),
            FamilyKind::Xc5200 => xc5200::family(),
        }
    }

    /// Creates a family with pads, the latch clock and the `BUFG` buffer
    /// every chip has.
    fn base(kind: FamilyKind, capabilities: Capabilities, pads: PadFeatures) -> Self {
        let mut family = Self {
            kind,
            capabilities,
            buffer_types: vec!["BUFG"],
            factories: Vec::new(),
        };
        family.register(IOPAD, PadFactory::new(pads));
        family.register(LATCH_CLOCK, LatchClockFactory::new());
        family
    }

    fn register(&mut self, name: &str, factory: impl CustomGateFactory + 'static) {
        self.factories.push((name.to_string(), Box::new(factory)));
    }

    fn add_buffers(&mut self, buffers: &[&'static str]) {
        self.buffer_types.extend_from_slice(buffers);
    }

    /// Returns which family this is.
    pub fn kind(&self) -> FamilyKind {
        self.kind
    }
}

impl ChipFamily for Family {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn buffer_types(&self) -> &[&'static str] {
        &self.buffer_types
    }

    fn factory(&self, kind: &str) -> Option<&dyn CustomGateFactory> {
        let upper = kind.to_ascii_uppercase();
        self.factories
            .iter()
            .find(|(name, _)| name == kind || *name == upper)
            .map(|(_, factory)| factory.as_ref())
    }

    fn macro_types(&self) -> Vec<&str> {
        self.factories
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| *name != IOPAD && *name != LATCH_CLOCK)
            .collect()
    }
}
