//! I/O pad factory.

use crate::factory::{Connections, CustomGateFactory, MacroSignature};
use crate::gate::{CustomGate, MacroKind, PadGate};
use xnet_common::SourceLocation;
use xnet_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use xnet_netlist::LowerError;

const SPEEDS: [&str; 4] = ["FAST", "SLOW", "MEDFAST", "MEDSLOW"];
const LEVELS: [&str; 2] = ["TTL", "CMOS"];
const IMPEDANCES: [&str; 2] = ["CAP", "RES"];
const NODELAY: &str = "NODELAY";
const DELAY: &str = "DELAY";
const PULLUP: &str = "PULLUP";
const PULLDOWN: &str = "PULLDOWN";

/// Output slew-rate settings of a family's pads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlewRateControl {
    /// No slew-rate flags.
    None,
    /// `FAST` and `SLOW`.
    Coarse,
    /// `FAST`, `MEDFAST`, `MEDSLOW` and `SLOW`.
    Fine,
}

impl SlewRateControl {
    fn flags(self) -> &'static [&'static str] {
        match self {
            SlewRateControl::None => &[],
            SlewRateControl::Coarse => &["FAST", "SLOW"],
            SlewRateControl::Fine => &["FAST", "MEDFAST", "MEDSLOW", "SLOW"],
        }
    }
}

/// Pull resistors available on a family's pads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resistors {
    /// No pull resistors.
    None,
    /// Pull-up only.
    PullupOnly,
    /// Pull-up and pull-down.
    PullupPulldown,
}

impl Resistors {
    fn flags(self) -> &'static [&'static str] {
        match self {
            Resistors::None => &[],
            Resistors::PullupOnly => &[PULLUP],
            Resistors::PullupPulldown => &[PULLUP, PULLDOWN],
        }
    }
}

/// Pad features of a chip family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PadFeatures {
    /// Slew-rate flags.
    pub slew_rate: SlewRateControl,
    /// Pull resistors.
    pub resistors: Resistors,
    /// Whether input buffers accept `NODELAY`.
    pub nodelay: bool,
    /// Whether `TTL`/`CMOS` levels and `CAP`/`RES` impedances exist.
    pub driver_type: bool,
}

/// Creates pads: ports `O` and `T` in, `I` out, no required port.
#[derive(Debug)]
pub struct PadFactory {
    signature: MacroSignature,
}

impl PadFactory {
    /// Creates a pad factory accepting the flags `features` allow.
    pub fn new(features: PadFeatures) -> Self {
        let mut flags: Vec<&str> = Vec::new();
        flags.extend(features.slew_rate.flags());
        flags.extend(features.resistors.flags());
        if features.nodelay {
            flags.extend([NODELAY, DELAY]);
        }
        if features.driver_type {
            flags.extend(LEVELS);
            flags.extend(IMPEDANCES);
        }
        Self {
            signature: MacroSignature::new(&["I"], &["O", "T"], &[]).with_flags(flags),
        }
    }
}

/// Picks at most one flag of a group.
fn one_of(
    group: &str,
    candidates: &[&str],
    flags: &[String],
    loc: &str,
) -> Result<Option<String>, LowerError> {
    let chosen: Vec<&String> = flags
        .iter()
        .filter(|f| candidates.contains(&f.as_str()))
        .collect();
    match chosen.as_slice() {
        [] => Ok(None),
        [flag] => Ok(Some((*flag).clone())),
        many => Err(LowerError::invalid_macro(
            "pad",
            loc,
            format!(
                "multiple {group} flags: {}",
                many.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", ")
            ),
        )),
    }
}

impl CustomGateFactory for PadFactory {
    fn signature(&self) -> &MacroSignature {
        &self.signature
    }

    fn instantiate(
        &self,
        sink: &DiagnosticSink,
        location: &SourceLocation,
        loc: &str,
        flags: &[String],
        outputs: &Connections,
        inputs: &Connections,
    ) -> Result<Vec<CustomGate>, LowerError> {
        let input = outputs.contains("I");
        let output = inputs.contains("O");
        let tristate = inputs.contains("T");
        if !input && !output && !tristate {
            return Err(LowerError::invalid_macro("pad", loc, "unconnected I/O pad"));
        }
        if tristate && !output {
            sink.emit(Diagnostic::warning(
                DiagnosticCode::new(Category::Macro, 1),
                format!("pad {loc} is tristate but has no output value, creating an open drain output"),
                location.clone(),
            ));
        }

        let mut pad_flags = Vec::new();
        pad_flags.extend(one_of("speed", &SPEEDS, flags, loc)?);
        pad_flags.extend(one_of("level", &LEVELS, flags, loc)?);
        pad_flags.extend(one_of("impedance", &IMPEDANCES, flags, loc)?);

        let has = |flag: &str| flags.iter().any(|f| f == flag);
        if has(DELAY) && has(NODELAY) {
            return Err(LowerError::invalid_macro(
                "pad",
                loc,
                "inconsistent delay flags: DELAY and NODELAY",
            ));
        }
        if has(PULLUP) && has(PULLDOWN) {
            return Err(LowerError::invalid_macro(
                "pad",
                loc,
                "inconsistent resistor flags: PULLUP and PULLDOWN",
            ));
        }
        let resistor = if has(PULLDOWN) {
            Some(PULLDOWN)
        } else if has(PULLUP) {
            Some(PULLUP)
        } else {
            None
        };

        let pad = PadGate {
            loc: loc.to_string(),
            flags: pad_flags,
            nodelay: has(NODELAY),
            resistor,
        };
        Ok(vec![CustomGate::new(
            MacroKind::Pad(pad),
            outputs.clone(),
            inputs.clone(),
        )])
    }
}
