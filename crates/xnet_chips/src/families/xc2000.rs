//! XC2000 family.

use super::{Family, FamilyKind};
use crate::factory::MacroSignature;
use crate::pad::{PadFeatures, Resistors, SlewRateControl};
use crate::special::SpecialFactory;
use xnet_netlist::Capabilities;

/// Builds the XC2000 description.
///
/// The oscillator output can only reach the `ACLK` input, so `OSC` forces
/// its output through an `ACLK` buffer.
pub fn family() -> Family {
    let mut family = Family::base(
        FamilyKind::Xc2000,
        Capabilities {
            max_gate_inputs: 4,
            has_latches: true,
            has_latch_init_value: false,
        },
        PadFeatures {
            slew_rate: SlewRateControl::None,
            resistors: Resistors::None,
            nodelay: false,
            driver_type: false,
        },
    );
    family.add_buffers(&["ACLK", "GCLK"]);
    family.register(
        "OSC",
        SpecialFactory::new(MacroSignature::new(&["O"], &[], &["O"])).with_forced_buffer("ACLK"),
    );
    family
}
