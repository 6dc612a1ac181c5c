//! A failing model is reported and the remaining models still lower.

use xnet_chips::for_part;
use xnet_common::SourceLocation;
use xnet_config::NamingConfig;
use xnet_diagnostics::{Category, DiagnosticCode, DiagnosticSink, Severity};
use xnet_lower::{error_code, Converter, Gate, InitialValue, Latch, LatchKind, Model, SumOfProducts};
use xnet_netlist::LowerError;

fn buf_model(name: &str, line: u32, output: &str, input: &str) -> Model {
    let mut model = Model::new(name, SourceLocation::new("design.blif", line));
    model.add_inputs([input]);
    model.add_outputs([output]);
    let mut sop = SumOfProducts::new(output, [input]);
    sop.add_row("1", '1').unwrap();
    model.add_gate(Gate::SumOfProducts(sop)).unwrap();
    model
}

fn error_messages(sink: &DiagnosticSink) -> Vec<String> {
    sink.diagnostics()
        .into_iter()
        .filter(|d| d.severity.is_error())
        .map(|d| d.message)
        .collect()
}

fn latch_model(name: &str, line: u32, kind: LatchKind) -> Model {
    let mut model = Model::new(name, SourceLocation::new("design.blif", line));
    model.add_inputs(["d", "clk"]);
    model.add_outputs([format!("{name}_q")]);
    model
        .add_gate(Gate::Latch(Latch {
            output: format!("{name}_q"),
            input: "d".to_string(),
            kind,
            clock: Some("clk".to_string()),
            init: InitialValue::Reset,
        }))
        .unwrap();
    model
}

#[test]
fn level_latch_on_flip_flop_only_family() {
    let sink = DiagnosticSink::new();
    let mut converter = Converter::new(for_part("XC3042").unwrap(), NamingConfig::default());
    let failed = converter.lower_design(
        [
            latch_model("level", 1, LatchKind::ActiveHigh),
            latch_model("edge", 30, LatchKind::RisingEdge),
        ],
        &sink,
    );
    assert_eq!(failed, 1);

    let errors: Vec<_> = sink
        .diagnostics()
        .into_iter()
        .filter(|d| d.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, DiagnosticCode::new(Category::Logic, 101));
    assert_eq!(errors[0].location.line, 1);

    let design = converter.finish(&sink);
    let flip_flops = design
        .netlist
        .symbols()
        .filter(|(_, symbol)| symbol.kind == "DFF")
        .count();
    assert_eq!(flip_flops, 1);
}

#[test]
fn asynchronous_latch_is_unsupported() {
    let sink = DiagnosticSink::new();
    let mut converter = Converter::new(for_part("XC4005").unwrap(), NamingConfig::default());
    let err = converter
        .lower_model(latch_model("async", 1, LatchKind::Asynchronous), &sink)
        .unwrap_err();
    assert!(matches!(err, LowerError::Unsupported { ref feature, .. } if feature == "asynchronous latches"));
    assert_eq!(error_code(&err).to_string(), "L101");
}

#[test]
fn invalid_identifier_fails_only_its_model() {
    let sink = DiagnosticSink::new();
    let mut converter = Converter::new(for_part("XC5204").unwrap(), NamingConfig::default());
    let mut bad = Model::new("bad", SourceLocation::new("design.blif", 5));
    let mut sop = SumOfProducts::new("out put", ["a"]);
    sop.add_row("1", '1').unwrap();
    bad.add_gate(Gate::SumOfProducts(sop)).unwrap();

    let mut good = Model::new("good", SourceLocation::new("design.blif", 9));
    let mut sop = SumOfProducts::new("z", ["a"]);
    sop.add_row("0", '1').unwrap();
    good.add_gate(Gate::SumOfProducts(sop)).unwrap();

    let failed = converter.lower_design([bad, good], &sink);
    assert_eq!(failed, 1);
    let codes: Vec<String> = sink
        .diagnostics()
        .into_iter()
        .filter(|d| d.severity.is_error())
        .map(|d| d.code.to_string())
        .collect();
    assert_eq!(codes, ["N101"]);
}

#[test]
fn unnameable_model_leaves_its_signals_free() {
    let sink = DiagnosticSink::new();
    let mut converter = Converter::new(for_part("XC3020").unwrap(), NamingConfig::default());
    let err = converter
        .lower_model(buf_model("bad name", 1, "y", "a"), &sink)
        .unwrap_err();
    assert!(matches!(err, LowerError::InvalidIdentifier(_)));

    converter.lower_model(buf_model("good", 5, "y", "a"), &sink).unwrap();
    let design = converter.finish(&sink);
    let drivers: Vec<&str> = design
        .netlist
        .symbols()
        .filter_map(|(_, symbol)| symbol.driver())
        .map(|pin| design.names.name(pin.net))
        .collect();
    assert_eq!(drivers, ["y", "a"]);
}

#[test]
fn duplicate_model_name_is_rejected() {
    let sink = DiagnosticSink::new();
    let mut converter = Converter::new(for_part("XC3020").unwrap(), NamingConfig::default());
    let failed = converter.lower_design(
        [buf_model("m", 1, "x", "a"), buf_model("m", 8, "y", "x")],
        &sink,
    );
    assert_eq!(failed, 1);
    assert_eq!(error_messages(&sink), ["model m defined twice"]);
    let code = sink.diagnostics()[0].code;
    assert_eq!(code, DiagnosticCode::new(Category::Design, 104));

    // y stays a global signal nobody drives
    converter.lower_model(buf_model("sink", 12, "z", "y"), &sink).unwrap();
    let design = converter.finish(&sink);
    let warnings: Vec<String> = sink
        .diagnostics()
        .into_iter()
        .filter(|d| d.severity == Severity::Warning)
        .map(|d| d.message)
        .collect();
    assert_eq!(
        warnings,
        [
            "undriven global signal a, assuming zero",
            "undriven global signal y, assuming zero",
        ]
    );
    let tie_off = design
        .netlist
        .symbols()
        .map(|(_, symbol)| symbol)
        .find(|symbol| symbol.driver().is_some_and(|pin| design.names.name(pin.net) == "y"))
        .unwrap();
    assert_eq!(tie_off.kind, "BUF");
    assert_eq!(design.names.name(tie_off.pin("I").unwrap().net), "GND");
}

#[test]
fn every_conflicting_output_is_reported() {
    let sink = DiagnosticSink::new();
    let mut converter = Converter::new(for_part("XC4005").unwrap(), NamingConfig::default());
    let mut both = Model::new("both", SourceLocation::new("design.blif", 20));
    both.add_inputs(["c"]);
    both.add_outputs(["x", "y"]);
    for output in ["x", "y"] {
        let mut sop = SumOfProducts::new(output, ["c"]);
        sop.add_row("1", '1').unwrap();
        both.add_gate(Gate::SumOfProducts(sop)).unwrap();
    }

    let failed = converter.lower_design(
        [buf_model("left", 1, "x", "a"), buf_model("right", 10, "y", "b"), both],
        &sink,
    );
    assert_eq!(failed, 1);
    let errors: Vec<_> = sink
        .diagnostics()
        .into_iter()
        .filter(|d| d.severity.is_error())
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        "model both drives global signals driven by other models: x y"
    );
    assert_eq!(
        errors[0].notes,
        ["model left also drives x", "model right also drives y"]
    );
}
