//! XC5200 family.

use super::xc4000::BSCAN_PADS;
use super::{Family, FamilyKind};
use crate::factory::MacroSignature;
use crate::osc52::Osc52Factory;
use crate::pad::{PadFeatures, Resistors, SlewRateControl};
use crate::special::SpecialFactory;
use xnet_netlist::Capabilities;

/// Builds the XC5200 description.
pub fn family() -> Family {
    let mut family = Family::base(
        FamilyKind::Xc5200,
        Capabilities {
            max_gate_inputs: 5,
            has_latches: true,
            has_latch_init_value: false,
        },
        PadFeatures {
            slew_rate: SlewRateControl::Coarse,
            resistors: Resistors::PullupPulldown,
            nodelay: true,
            driver_type: false,
        },
    );
    family.register(
        "BSCAN",
        SpecialFactory::new(MacroSignature::new(
            &["RESET", "UPDATE", "SHIFT", "TDO", "DRCK", "IDLE", "SEL1", "SEL2"],
            &["TDI", "TMS", "TCK", "TDO1", "TDO2"],
            &[],
        ))
        .with_special_pads(&BSCAN_PADS, &[("TDO", "TDO")]),
    );
    family.register("RDBK", SpecialFactory::readback());
    family.register(
        "STARTUP",
        SpecialFactory::new(MacroSignature::new(
            &["Q2", "Q3", "Q1Q4", "DONEIN"],
            &["GR", "GTS", "CLK"],
            &[],
        )),
    );
    family.register("OSC52", Osc52Factory::new());
    family
}
