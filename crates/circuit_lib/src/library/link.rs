//! Name-to-handle resolution for cross-model references.

use super::CircuitLibrary;
use crate::error::{CircuitError, CircuitResult};
use crate::ids::ModelId;
use crate::types::BufferSlot;
use log::{info, warn};

/// Describes which attribute of a model carries a buffer slot's reference.
pub(super) fn buffer_slot_field(slot: BufferSlot) -> &'static str {
    match slot {
        BufferSlot::Input => "input buffer",
        BufferSlot::Output => "output buffer",
        BufferSlot::LutInputBuffer => "LUT input buffer",
        BufferSlot::LutInputInverter => "LUT input inverter",
        BufferSlot::LutInterBuffer => "LUT intermediate buffer",
    }
}

impl CircuitLibrary {
    /// Resolves every model name reference in the library to a handle.
    ///
    /// Covers buffer slots, pass-gate links, and the driving and inverting models of
    /// every port. Empty names are skipped. The pass must run after all models exist,
    /// so references may point at models created later. Running it again over an
    /// unchanged library yields the same handles.
    ///
    /// # Errors
    ///
    /// Returns [`CircuitError::DuplicateModelName`] before resolving anything if two
    /// models share a name. With `strict_links` set, returns
    /// [`CircuitError::UnresolvedModel`] for the first name that matches no model.
    /// Otherwise the reference is left unresolved and a warning is logged.
    pub fn build_model_links(&mut self) -> CircuitResult<()> {
        self.check_unique_model_names()?;
        let models: Vec<ModelId> = self.models().collect();
        let mut resolved = 0usize;
        let mut unresolved = 0usize;
        let mut tally = |link: Option<ModelId>| match link {
            Some(_) => resolved += 1,
            None => unresolved += 1,
        };

        for &model in &models {
            for slot in BufferSlot::ALL {
                let name = &self.models.buffers[model][slot.index()].model_name;
                if name.is_empty() {
                    continue;
                }
                let link = self.resolve_link(model, buffer_slot_field(slot), name)?;
                tally(link);
                self.models.buffers[model][slot.index()].model = link;
            }

            let name = &self.models.pass_gate_model_names[model];
            if !name.is_empty() {
                let link = self.resolve_link(model, "pass-gate logic", name)?;
                tally(link);
                self.models.pass_gate_models.set(model, link);
            }

            let ports: Vec<_> = self.ports(model).collect();
            for port in ports {
                let name = &self.ports[model].model_names[port];
                if !name.is_empty() {
                    let link = self.resolve_link(model, "port tri-state model", name)?;
                    tally(link);
                    self.ports[model].models.set(port, link);
                }

                let name = &self.ports[model].inv_model_names[port];
                if !name.is_empty() {
                    let link = self.resolve_link(model, "port inverter model", name)?;
                    tally(link);
                    self.ports[model].inv_models.set(port, link);
                }
            }
        }

        info!("linked circuit library: {resolved} references resolved, {unresolved} unresolved");
        Ok(())
    }

    fn resolve_link(
        &self,
        owner: ModelId,
        field: &'static str,
        name: &str,
    ) -> CircuitResult<Option<ModelId>> {
        if let Some(target) = self.model(name) {
            return Ok(Some(target));
        }
        if self.options.strict_links {
            return Err(CircuitError::UnresolvedModel {
                owner: self.models.names[owner].clone(),
                field,
                name: name.to_string(),
            });
        }
        warn!(
            "circuit model '{}' references unknown model '{name}' ({field})",
            self.models.names[owner]
        );
        Ok(None)
    }
}
