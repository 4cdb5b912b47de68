//! Queries built on top of [`CircuitLibrary`] for module and netlist builders.

use crate::ids::{ModelId, PortId};
use crate::library::CircuitLibrary;
use crate::types::PortType;

/// Returns the memory-cell models configuring `model`.
///
/// These are the linked driving models of the model's SRAM ports, each listed once in
/// the order first seen.
///
/// # Panics
///
/// Panics if an SRAM port's driving model was never resolved.
pub fn find_circuit_sram_models(lib: &CircuitLibrary, model: ModelId) -> Vec<ModelId> {
    let mut sram_models = Vec::new();
    for &port in lib.port_lookup(model, PortType::Sram) {
        let Some(sram_model) = lib.port_tri_state_model(model, port) else {
            panic!(
                "SRAM port '{}' of circuit model '{}' has no linked memory model",
                lib.port_prefix(model, port),
                lib.model_name(model)
            );
        };
        if !sram_models.contains(&sram_model) {
            sram_models.push(sram_model);
        }
    }
    sram_models
}

/// Returns the SRAM ports of `model` that are not mode selects, global ports included.
pub fn find_circuit_regular_sram_ports(lib: &CircuitLibrary, model: ModelId) -> Vec<PortId> {
    lib.ports_by_type(model, PortType::Sram, true)
        .into_iter()
        .filter(|&port| !lib.port_is_mode_select(model, port))
        .collect()
}
