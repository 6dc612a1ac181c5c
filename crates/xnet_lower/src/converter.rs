//! The multi-model driver.

use crate::buffer::ModelContext;
use crate::latch::lower_latch;
use crate::model::{Gate, Model};
use crate::sop::lower_sum_of_products;
use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet};
use xnet_chips::{for_part, ChipFamily};
use xnet_common::SourceLocation;
use xnet_config::{NamingConfig, TranslateConfig};
use xnet_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use xnet_naming::{Names, GND};
use xnet_netlist::{LowerError, Netlist};

/// A fully lowered and resolved design, ready to be written.
#[derive(Debug)]
pub struct Design {
    /// Resolved identifiers; every net of `netlist` has its output string.
    pub names: Names,
    /// The primitives and pads.
    pub netlist: Netlist,
}

#[derive(Debug)]
struct Origin {
    name: String,
    location: SourceLocation,
}

/// Lowers models one at a time into a shared netlist.
///
/// Every model gets its own scope below the root. Its ports alias the
/// same-named global signals in the root scope, which is how models connect
/// to each other. After the last model, [`finish`](Converter::finish) ties
/// off undriven global signals and resolves all names.
#[derive(Debug)]
pub struct Converter {
    family: Box<dyn ChipFamily>,
    naming: NamingConfig,
    names: Names,
    netlist: Netlist,
    models: Vec<Origin>,
    drivers: BTreeMap<String, usize>,
    consumers: BTreeMap<String, usize>,
}

/// Returns the diagnostic code reporting `err`.
pub fn error_code(err: &LowerError) -> DiagnosticCode {
    match err {
        LowerError::InvalidIdentifier(_) => DiagnosticCode::new(Category::Naming, 101),
        LowerError::Unsupported { .. } => DiagnosticCode::new(Category::Logic, 101),
        LowerError::ConflictingBuffer { .. } => DiagnosticCode::new(Category::Logic, 102),
        LowerError::InvalidMacro { .. } => DiagnosticCode::new(Category::Macro, 101),
        LowerError::MultipleDrivers { .. } => DiagnosticCode::new(Category::Design, 101),
        LowerError::DrivenClock { .. } => DiagnosticCode::new(Category::Design, 102),
        LowerError::UnknownPart(_) => DiagnosticCode::new(Category::Design, 103),
        LowerError::DuplicateModel { .. } => DiagnosticCode::new(Category::Design, 104),
    }
}

impl Converter {
    /// Creates a converter for `family`.
    pub fn new(family: Box<dyn ChipFamily>, naming: NamingConfig) -> Self {
        let netlist = Netlist::new(family.capabilities());
        Self {
            family,
            naming,
            names: Names::new(naming.qualify_all_names),
            netlist,
            models: Vec::new(),
            drivers: BTreeMap::new(),
            consumers: BTreeMap::new(),
        }
    }

    /// Creates a converter for the family `config` selects.
    pub fn from_config(config: &TranslateConfig) -> Result<Self, LowerError> {
        let family = for_part(config.family_selector().unwrap_or_default())?;
        debug!("target family {}", family.name());
        Ok(Self::new(family, config.naming))
    }

    /// Returns the target family.
    pub fn family(&self) -> &dyn ChipFamily {
        self.family.as_ref()
    }

    /// Lowers one model.
    ///
    /// Errors found before the gates are lowered leave the converter
    /// untouched. A failing gate leaves the model's global signals registered
    /// and the primitives emitted so far in the netlist; a design with errors
    /// must not be written.
    pub fn lower_model(&mut self, mut model: Model, sink: &DiagnosticSink) -> Result<(), LowerError> {
        model.infer_io(sink)?;
        for (signal, buffer) in model.buffers() {
            if !self.family.has_buffer_type(buffer) {
                return Err(LowerError::Unsupported {
                    feature: format!("buffer type {buffer}"),
                    net: signal.to_string(),
                });
            }
        }

        if self.models.iter().any(|origin| origin.name == model.name()) {
            return Err(LowerError::DuplicateModel {
                model: model.name().to_string(),
            });
        }

        let (outputs, inputs): (BTreeSet<&str>, BTreeSet<&str>) = if self.naming.merge_toplevel_namespaces {
            (model.drivers().collect(), model.consumers().collect())
        } else {
            (model.outputs().collect(), model.inputs().collect())
        };
        let conflicts: Vec<(String, String)> = outputs
            .iter()
            .filter_map(|&out| {
                self.drivers
                    .get(out)
                    .map(|&first| (out.to_string(), self.models[first].name.clone()))
            })
            .collect();
        if !conflicts.is_empty() {
            return Err(LowerError::MultipleDrivers {
                model: model.name().to_string(),
                conflicts,
            });
        }

        // last fallible step before any global state is recorded
        let root = self.names.root();
        let ports = inputs.union(&outputs).map(|&port| (port, port));
        let scope = self.names.scope(root, model.name(), ports)?;

        let index = self.models.len();
        self.models.push(Origin {
            name: model.name().to_string(),
            location: model.location().clone(),
        });
        for &out in &outputs {
            self.drivers.insert(out.to_string(), index);
        }
        for &input in &inputs {
            self.consumers.insert(input.to_string(), index);
        }

        debug!(
            "lowering model {} ({} gates, {} ports)",
            model.name(),
            model.gates().len(),
            inputs.len() + outputs.len()
        );
        let mut ctx = ModelContext {
            scope,
            model: &model,
            names: &mut self.names,
            netlist: &mut self.netlist,
        };
        for gate in model.gates() {
            match gate {
                Gate::SumOfProducts(sop) => lower_sum_of_products(&mut ctx, sop)?,
                Gate::Latch(latch) => lower_latch(&mut ctx, latch)?,
                Gate::Custom(custom) => custom.lower(&mut ctx)?,
            }
        }
        Ok(())
    }

    /// Lowers every model, reporting failures as error diagnostics and
    /// continuing with the next model. Returns the number of models that
    /// failed.
    pub fn lower_design(&mut self, models: impl IntoIterator<Item = Model>, sink: &DiagnosticSink) -> usize {
        let mut failed = 0;
        for model in models {
            let location = model.location().clone();
            if let Err(err) = self.lower_model(model, sink) {
                report(sink, location, &err);
                failed += 1;
            }
        }
        failed
    }

    /// Ties off undriven global signals, notes unused ones and resolves all
    /// names.
    pub fn finish(mut self, sink: &DiagnosticSink) -> Design {
        let root = self.names.root();
        let undriven: Vec<(&String, &usize)> = self
            .consumers
            .iter()
            .filter(|(signal, _)| !self.drivers.contains_key(*signal))
            .collect();
        for (signal, &consumer) in undriven {
            let location = self.models[consumer].location.clone();
            sink.emit(Diagnostic::warning(
                DiagnosticCode::new(Category::Design, 203),
                format!("undriven global signal {signal}, assuming zero"),
                location.clone(),
            ));
            match self.names.rooted(root, signal) {
                Ok(net) => {
                    let gnd = self.names.reserved(GND);
                    self.netlist.buffer("BUF", net, gnd);
                }
                Err(err) => report(sink, location, &err.into()),
            }
        }

        let mut unused: Vec<Vec<&str>> = vec![Vec::new(); self.models.len()];
        for (signal, &driver) in &self.drivers {
            if !self.consumers.contains_key(signal) {
                unused[driver].push(signal);
            }
        }
        for (model, signals) in self.models.iter().zip(&unused) {
            if !signals.is_empty() {
                sink.emit(Diagnostic::note(
                    DiagnosticCode::new(Category::Design, 204),
                    format!("unused global signals of {}: {}", model.name, signals.join(" ")),
                    model.location.clone(),
                ));
            }
        }

        trace!("resolving {} identifiers", self.names.len());
        self.names.resolve();
        Design {
            names: self.names,
            netlist: self.netlist,
        }
    }
}

fn report(sink: &DiagnosticSink, location: SourceLocation, err: &LowerError) {
    let mut diagnostic = Diagnostic::error(error_code(err), err.to_string(), location);
    if let LowerError::MultipleDrivers { conflicts, .. } = err {
        for (signal, first) in conflicts {
            diagnostic = diagnostic.with_note(format!("model {first} also drives {signal}"));
        }
    }
    sink.emit(diagnostic);
}
