//! XC3000 family, including XC3100 and the A variants.

use super::{Family, FamilyKind};
use crate::factory::MacroSignature;
use crate::pad::{PadFeatures, Resistors, SlewRateControl};
use crate::special::SpecialFactory;
use xnet_netlist::Capabilities;

/// Builds the XC3000 description.
pub fn family() -> Family {
    let mut family = Family::base(
        FamilyKind::Xc3000,
        Capabilities {
            max_gate_inputs: 5,
            has_latches: false,
            has_latch_init_value: false,
        },
        PadFeatures {
            slew_rate: SlewRateControl::Coarse,
            resistors: Resistors::PullupOnly,
            nodelay: false,
            driver_type: false,
        },
    );
    family.add_buffers(&["ACLK", "GCLK"]);
    family.register("OSC", SpecialFactory::new(MacroSignature::new(&["O"], &[], &["O"])));
    family
}
