//! Per-model lowering state and the buffering policy.

use crate::model::Model;
use log::trace;
use xnet_chips::GateContext;
use xnet_naming::{NameId, Names, ScopeId};
use xnet_netlist::{LowerError, Netlist};

/// Everything the gates of one model lower into.
pub(crate) struct ModelContext<'a> {
    pub scope: ScopeId,
    pub model: &'a Model,
    pub names: &'a mut Names,
    pub netlist: &'a mut Netlist,
}

impl<'a> ModelContext<'a> {
    /// Returns the net for source signal `signal` of this model.
    pub fn net(&mut self, signal: &str) -> Result<NameId, LowerError> {
        Ok(self.names.rooted(self.scope, signal)?)
    }

    /// Returns the net a gate has to drive for `signal`.
    ///
    /// A buffered signal is driven through a buffer primitive from the
    /// private net `<signal>/<BUFFER>`. The buffer comes from the model's
    /// declarations or is `forced` by a macro; both at once must agree.
    pub fn output(&mut self, signal: &str, forced: Option<&str>) -> Result<NameId, LowerError> {
        let declared = self.model.buffer(signal);
        let buffer = match (declared, forced) {
            (Some(declared), Some(required)) if !declared.eq_ignore_ascii_case(required) => {
                return Err(LowerError::ConflictingBuffer {
                    net: signal.to_string(),
                    declared: declared.to_string(),
                    required: required.to_string(),
                });
            }
            (_, Some(buffer)) | (Some(buffer), None) => Some(buffer.to_ascii_uppercase()),
            (None, None) => None,
        };

        let public = self.net(signal)?;
        match buffer {
            Some(buffer) => {
                trace!("buffering {signal} through {buffer}");
                let private = self.names.derived(public, &buffer);
                self.netlist.buffer(&buffer, public, private);
                Ok(private)
            }
            None => Ok(public),
        }
    }
}

impl GateContext for ModelContext<'_> {
    fn scope(&self) -> ScopeId {
        self.scope
    }

    fn target(&mut self) -> (&mut Names, &mut Netlist) {
        (&mut *self.names, &mut *self.netlist)
    }

    fn buffered_output(&mut self, signal: &str, forced: Option<&str>) -> Result<NameId, LowerError> {
        self.output(signal, forced)
    }
}
