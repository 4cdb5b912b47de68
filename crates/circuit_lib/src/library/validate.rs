//! Library-wide consistency checks and pass-gate resolution.

use super::link::buffer_slot_field;
use super::CircuitLibrary;
use crate::error::{CircuitError, CircuitResult};
use crate::ids::ModelId;
use crate::types::{BufferSlot, ModelType, PassGateKind};
use log::info;
use std::collections::HashSet;

impl CircuitLibrary {
    /// Checks the linked library for content errors.
    ///
    /// Reports the first of, in this order: a model name used twice, a non-empty
    /// model reference the link pass could not resolve, a pass-gate link chain that
    /// does not end at a pass-gate kind, and (with `require_explicit_defaults`) a
    /// populated model type without a model flagged as default.
    ///
    /// # Errors
    ///
    /// Returns the violation found.
    pub fn validate(&self) -> CircuitResult<()> {
        self.check_unique_model_names()?;
        for model in self.models() {
            self.check_links_resolved(model)?;
            if !self.models.pass_gate_model_names[model].is_empty() {
                self.pass_gate_logic_type(model)?;
            }
        }
        if self.options.require_explicit_defaults {
            self.check_explicit_defaults()?;
        }
        info!("validated circuit library of {} models", self.num_models());
        Ok(())
    }

    pub(super) fn check_unique_model_names(&self) -> CircuitResult<()> {
        let mut seen = HashSet::new();
        for name in self.models.names.values() {
            if !name.is_empty() && !seen.insert(name.as_str()) {
                return Err(CircuitError::DuplicateModelName(name.clone()));
            }
        }
        Ok(())
    }

    fn check_links_resolved(&self, model: ModelId) -> CircuitResult<()> {
        let unresolved = |field: &'static str, name: &str| CircuitError::UnresolvedModel {
            owner: self.models.names[model].clone(),
            field,
            name: name.to_string(),
        };

        for (slot, buffer) in BufferSlot::ALL.iter().zip(&self.models.buffers[model]) {
            if !buffer.model_name.is_empty() && buffer.model.is_none() {
                return Err(unresolved(buffer_slot_field(*slot), &buffer.model_name));
            }
        }

        let name = &self.models.pass_gate_model_names[model];
        if !name.is_empty() && self.models.pass_gate_models[model].is_none() {
            return Err(unresolved("pass-gate logic", name));
        }

        let columns = &self.ports[model];
        for port in self.ports(model) {
            let name = &columns.model_names[port];
            if !name.is_empty() && columns.models[port].is_none() {
                return Err(unresolved("port tri-state model", name));
            }
            let name = &columns.inv_model_names[port];
            if !name.is_empty() && columns.inv_models[port].is_none() {
                return Err(unresolved("port inverter model", name));
            }
        }
        Ok(())
    }

    fn check_explicit_defaults(&self) -> CircuitResult<()> {
        for ty in ModelType::ALL {
            let models = self.models_by_type(ty);
            if !models.is_empty() && !models.iter().any(|&m| self.models.is_default[m]) {
                return Err(CircuitError::MissingDefaultModel(ty));
            }
        }
        Ok(())
    }

    /// Returns the pass-gate kind a model is built from.
    ///
    /// A `PASSGATE` model answers with its own kind. Any other model follows its
    /// linked pass-gate model, recursively, for at most `pass_gate_max_depth` links.
    ///
    /// # Errors
    ///
    /// Returns [`CircuitError::PassGateCycle`] if the chain revisits a model or a
    /// `PASSGATE` model links to itself, [`CircuitError::NestedPassGate`] if a
    /// `PASSGATE` model links to another model,
    /// [`CircuitError::PassGateDepthExceeded`] if it is longer than the bound, and
    /// [`CircuitError::MissingPassGate`] if it ends without a pass-gate kind.
    pub fn pass_gate_logic_type(&self, model: ModelId) -> CircuitResult<PassGateKind> {
        self.check_model(model);
        let max_depth = self.options.pass_gate_max_depth;
        let mut visited: Vec<ModelId> = Vec::new();
        let mut current = model;
        loop {
            if visited.contains(&current) {
                return Err(CircuitError::PassGateCycle(self.models.names[model].clone()));
            }
            if visited.len() > max_depth {
                return Err(CircuitError::PassGateDepthExceeded {
                    model: self.models.names[model].clone(),
                    max_depth,
                });
            }
            visited.push(current);

            if self.models.types[current] == Some(ModelType::PassGate) {
                let name = &self.models.names[current];
                match self.models.pass_gate_models[current] {
                    Some(link) if link == current => {
                        return Err(CircuitError::PassGateCycle(name.clone()));
                    }
                    Some(link) => {
                        return Err(CircuitError::NestedPassGate {
                            model: name.clone(),
                            target: self.models.names[link].clone(),
                        });
                    }
                    None => {}
                }
                return self.models.pass_gate_kinds[current]
                    .ok_or_else(|| CircuitError::MissingPassGate(name.clone()));
            }
            match self.models.pass_gate_models[current] {
                Some(next) => current = next,
                None => {
                    return Err(CircuitError::MissingPassGate(
                        self.models.names[current].clone(),
                    ))
                }
            }
        }
    }
}
