//! Classification of models and ports by type, and lookup by name.
//!
//! Both indexes are derived state. They are dropped whenever a mutation could change
//! a classification and rebuilt in full, never patched incrementally.

use super::CircuitLibrary;
use crate::ids::{ModelId, PortId};
use crate::types::{ModelType, PortType};
use log::{debug, warn};
use std::cell::OnceCell;

/// Entities bucketed by a dense class index.
#[derive(Debug, Clone)]
pub(super) struct ClassIndex<I> {
    buckets: Vec<Vec<I>>,
}

impl<I: Copy> ClassIndex<I> {
    fn new(num_classes: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); num_classes],
        }
    }

    fn push(&mut self, class: usize, id: I) {
        self.buckets[class].push(id);
    }

    fn get(&self, class: usize) -> &[I] {
        &self.buckets[class]
    }
}

impl CircuitLibrary {
    /// Rebuilds the model classification index from scratch.
    ///
    /// Within each type the first model flagged as default is moved to the front; the
    /// other models keep their creation order.
    pub fn build_model_lookup(&mut self) {
        let index = self.classify_models();
        self.model_lookup = OnceCell::from(index);
    }

    /// Drops the model classification index. The next query rebuilds it.
    pub fn invalidate_model_lookup(&mut self) {
        self.model_lookup.take();
    }

    fn classify_models(&self) -> ClassIndex<ModelId> {
        let mut index = ClassIndex::new(ModelType::COUNT);
        for (model, ty) in self.models.types.iter() {
            if let Some(ty) = *ty {
                index.push(ty.index(), model);
            }
        }
        for bucket in &mut index.buckets {
            if let Some(pos) = bucket.iter().position(|&m| self.models.is_default[m]) {
                let default = bucket.remove(pos);
                bucket.insert(0, default);
            }
        }
        index
    }

    fn model_lookup(&self) -> &ClassIndex<ModelId> {
        self.model_lookup.get_or_init(|| self.classify_models())
    }

    /// Returns every model of type `ty`, the default model first.
    pub fn models_by_type(&self, ty: ModelType) -> &[ModelId] {
        self.model_lookup().get(ty.index())
    }

    /// Returns the model representing type `ty` when none is requested by name.
    ///
    /// This is the first model of the type flagged as default. If no model of the type
    /// is flagged, the first one created is returned instead and a warning is logged;
    /// `None` means there is no model of the type at all.
    pub fn default_model(&self, ty: ModelType) -> Option<ModelId> {
        let first = *self.models_by_type(ty).first()?;
        if !self.models.is_default[first] {
            warn!(
                "no {ty} circuit model is marked as default, falling back to '{}'",
                self.models.names[first]
            );
        }
        Some(first)
    }

    /// Finds a model by name.
    ///
    /// # Panics
    ///
    /// Panics if more than one model carries the name.
    pub fn model(&self, name: &str) -> Option<ModelId> {
        let mut found = self
            .models
            .names
            .iter()
            .filter(|(_, model_name)| model_name.as_str() == name)
            .map(|(model, _)| model);
        let first = found.next();
        assert!(
            found.next().is_none(),
            "circuit model name '{name}' is defined more than once"
        );
        first
    }

    /// Returns the ports of `model` with type `ty` from the port classification index.
    ///
    /// Unlike [`ports_by_type`](Self::ports_by_type) this includes global ports.
    pub fn port_lookup(&self, model: ModelId, ty: PortType) -> &[PortId] {
        self.check_model(model);
        self.ports[model]
            .lookup
            .get_or_init(|| self.classify_ports(model))
            .get(ty.index())
    }

    /// Rebuilds the port classification index of one model.
    pub fn build_model_port_lookup(&mut self, model: ModelId) {
        self.check_model(model);
        let index = self.classify_ports(model);
        self.ports[model].lookup = OnceCell::from(index);
    }

    fn classify_ports(&self, model: ModelId) -> ClassIndex<PortId> {
        let mut index = ClassIndex::new(PortType::COUNT);
        for (port, ty) in self.ports[model].types.iter() {
            if let Some(ty) = *ty {
                index.push(ty.index(), port);
            }
        }
        debug!(
            "classified {} ports of circuit model '{}'",
            self.ports[model].types.len(),
            self.models.names[model]
        );
        index
    }
}
