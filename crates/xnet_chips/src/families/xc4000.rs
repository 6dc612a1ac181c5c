//! XC4000 family.

use super::{Family, FamilyKind};
use crate::factory::MacroSignature;
use crate::pad::{PadFeatures, Resistors, SlewRateControl};
use crate::ram::RamFactory;
use crate::special::SpecialFactory;
use xnet_netlist::Capabilities;

/// Boundary-scan ports that default to the dedicated JTAG pins.
pub(crate) const BSCAN_PADS: [(&str, &str); 3] = [("TDI", "TDI"), ("TMS", "TMS"), ("TCK", "TCK")];

/// Builds the XC4000 description.
///
/// `RAMS` and `RAMD` only exist on XC4000E and later; they are offered for
/// every XC4000 part and left for the vendor tools to reject.
pub fn family() -> Family {
    let mut family = Family::base(
        FamilyKind::Xc4000,
        Capabilities {
            max_gate_inputs: 5,
            has_latches: false,
            has_latch_init_value: true,
        },
        PadFeatures {
            slew_rate: SlewRateControl::Fine,
            resistors: Resistors::PullupPulldown,
            nodelay: true,
            driver_type: true,
        },
    );
    family.add_buffers(&["BUFGS", "BUFGP"]);
    family.register(
        "BSCAN",
        SpecialFactory::new(MacroSignature::new(
            &["TDO", "DRCK", "IDLE", "SEL1", "SEL2"],
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
            &["GSR", "GTS", "CLK"],
            &[],
        )),
    );
    family.register(
        "OSC4",
        SpecialFactory::new(MacroSignature::new(&["F8M", "F500K", "F16K", "F490", "F15"], &[], &[])),
    );
    family.register("RAM", RamFactory::new(&["O"], &["A"], false, 5));
    family.register("RAMS", RamFactory::new(&["O"], &["A"], true, 5));
    family.register("RAMD", RamFactory::new(&["SPO", "DPO"], &["A", "DPRA"], true, 4));
    family
}
