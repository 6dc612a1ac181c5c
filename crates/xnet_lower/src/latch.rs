//! Flip-flop and latch lowering.

use crate::buffer::ModelContext;
use crate::model::Latch;
use xnet_naming::GCLK;
use xnet_netlist::LowerError;

/// Lowers a storage element. Without a clock signal it is clocked by the
/// global latch clock.
pub(crate) fn lower_latch(ctx: &mut ModelContext<'_>, latch: &Latch) -> Result<(), LowerError> {
    let Some((kind, invert_clock)) = latch.kind.primitive() else {
        return Err(LowerError::Unsupported {
            feature: "asynchronous latches".to_string(),
            net: latch.output.clone(),
        });
    };
    let output = ctx.output(&latch.output, None)?;
    let input = ctx.net(&latch.input)?;
    let clock = match &latch.clock {
        Some(clock) => ctx.net(clock)?,
        None => ctx.names.reserved(GCLK),
    };
    ctx.netlist.latch(
        ctx.names,
        kind,
        latch.init.is_set(),
        output,
        input,
        clock,
        invert_clock,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InitialValue, LatchKind, Model};
    use xnet_common::SourceLocation;
    use xnet_naming::Names;
    use xnet_netlist::{Capabilities, Netlist, Param};

    fn lower(latch: Latch, caps: Capabilities) -> Result<(Names, Netlist), LowerError> {
        let model = Model::new("top", SourceLocation::unknown());
        let mut names = Names::new(false);
        let mut netlist = Netlist::new(caps);
        let scope = names.root();
        let mut ctx = ModelContext {
            scope,
            model: &model,
            names: &mut names,
            netlist: &mut netlist,
        };
        lower_latch(&mut ctx, &latch)?;
        names.resolve();
        Ok((names, netlist))
    }

    fn latch(kind: LatchKind, clock: Option<&str>, init: InitialValue) -> Latch {
        Latch {
            output: "q".to_string(),
            input: "d".to_string(),
            kind,
            clock: clock.map(String::from),
            init,
        }
    }

    const XC4000: Capabilities = Capabilities {
        max_gate_inputs: 5,
        has_latches: false,
        has_latch_init_value: true,
    };
    const XC2000: Capabilities = Capabilities {
        max_gate_inputs: 4,
        has_latches: true,
        has_latch_init_value: false,
    };

    #[test]
    fn falling_edge_flip_flop_with_init() {
        let (names, netlist) =
            lower(latch(LatchKind::FallingEdge, Some("clk"), InitialValue::Preset), XC4000).unwrap();
        let (_, dff) = netlist.symbols().next().unwrap();
        assert_eq!(dff.kind, "DFF");
        assert_eq!(dff.params, [Param::value("INIT", "S")]);
        let c = dff.pin("C").unwrap();
        assert!(c.invert);
        assert_eq!(names.name(c.net), "clk");
    }

    #[test]
    fn unknown_init_uses_reset_form() {
        for init in [InitialValue::Reset, InitialValue::DontCare, InitialValue::Unknown] {
            let (_, netlist) = lower(latch(LatchKind::RisingEdge, Some("clk"), init), XC4000).unwrap();
            let (_, dff) = netlist.symbols().next().unwrap();
            assert_eq!(dff.params, [Param::value("INIT", "R")], "{init:?}");
        }
    }

    #[test]
    fn latch_defaults_to_global_clock() {
        let (names, netlist) = lower(latch(LatchKind::ActiveLow, None, InitialValue::Unknown), XC2000).unwrap();
        let (_, dlat) = netlist.symbols().next().unwrap();
        assert_eq!(dlat.kind, "DLAT");
        let g = dlat.pin("G").unwrap();
        assert!(g.invert);
        assert_eq!(names.name(g.net), "GCLK");
    }

    #[test]
    fn emulated_preset() {
        let (names, netlist) = lower(latch(LatchKind::ActiveHigh, Some("en"), InitialValue::Preset), XC2000).unwrap();
        let kinds: Vec<&str> = netlist.symbols().map(|(_, s)| s.kind.as_str()).collect();
        assert_eq!(kinds, ["INV", "INV", "DLAT"]);
        let (_, dlat) = netlist.symbols().last().unwrap();
        assert_eq!(names.name(dlat.pin("D").unwrap().net), "d/INV");
        assert_eq!(names.name(dlat.pin("Q").unwrap().net), "q/INV");
    }

    #[test]
    fn latch_without_latches() {
        let err = lower(latch(LatchKind::ActiveHigh, Some("en"), InitialValue::Reset), XC4000).unwrap_err();
        assert!(matches!(err, LowerError::Unsupported { .. }));
    }

    #[test]
    fn asynchronous_is_unsupported() {
        let err = lower(latch(LatchKind::Asynchronous, None, InitialValue::Reset), XC2000).unwrap_err();
        assert_eq!(
            err.to_string(),
            "asynchronous latches not supported by chip family: q"
        );
    }
}
