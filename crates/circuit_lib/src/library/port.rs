//! Port-level attributes and port queries.

use super::CircuitLibrary;
use crate::ids::{ModelId, PortId};
use crate::types::{ModelType, PortType, SramOrganization};

impl CircuitLibrary {
    // --- Classification ---

    /// Returns the type of a port, or `None` if it has not been set.
    pub fn port_type(&self, model: ModelId, port: PortId) -> Option<PortType> {
        self.check_port(model, port);
        self.ports[model].types[port]
    }

    /// Sets the type of a port and rebuilds the model's port classification.
    pub fn set_port_type(&mut self, model: ModelId, port: PortId, ty: PortType) {
        self.check_port(model, port);
        self.ports[model].types.set(port, Some(ty));
        self.build_model_port_lookup(model);
    }

    /// Returns `true` if the port carries signals into the model.
    ///
    /// Every port type except `OUTPUT` counts as an input, so `INOUT` ports are both
    /// inputs and outputs. A port whose type is unset is neither.
    pub fn is_input_port(&self, model: ModelId, port: PortId) -> bool {
        self.port_type(model, port).is_some_and(PortType::is_input)
    }

    /// Returns `true` if the port carries signals out of the model (`OUTPUT` or `INOUT`).
    pub fn is_output_port(&self, model: ModelId, port: PortId) -> bool {
        self.port_type(model, port).is_some_and(PortType::is_output)
    }

    /// Returns the input ports of a model in creation order.
    pub fn input_ports(&self, model: ModelId) -> Vec<PortId> {
        self.ports(model)
            .filter(|&port| self.is_input_port(model, port))
            .collect()
    }

    /// Returns the output ports of a model in creation order.
    pub fn output_ports(&self, model: ModelId) -> Vec<PortId> {
        self.ports(model)
            .filter(|&port| self.is_output_port(model, port))
            .collect()
    }

    /// Returns the ports of `model` with type `ty`, in creation order.
    ///
    /// Global ports are skipped unless `include_global` is set.
    pub fn ports_by_type(&self, model: ModelId, ty: PortType, include_global: bool) -> Vec<PortId> {
        self.ports(model)
            .filter(|&port| self.ports[model].types[port] == Some(ty))
            .filter(|&port| include_global || !self.ports[model].is_global[port])
            .collect()
    }

    /// Counts the ports of `model` with type `ty`.
    pub fn num_ports_by_type(&self, model: ModelId, ty: PortType, include_global: bool) -> usize {
        self.ports_by_type(model, ty, include_global).len()
    }

    /// Returns the global ports of a model.
    ///
    /// Mode-select ports are skipped unless `include_mode_select` is set.
    pub fn model_global_ports(&self, model: ModelId, include_mode_select: bool) -> Vec<PortId> {
        self.check_model(model);
        let columns = &self.ports[model];
        self.ports(model)
            .filter(|&port| columns.is_global[port])
            .filter(|&port| include_mode_select || !columns.is_mode_select[port])
            .collect()
    }

    /// Finds a port of `model` by its prefix.
    ///
    /// # Panics
    ///
    /// Panics if more than one port of the model carries the name.
    pub fn port(&self, model: ModelId, name: &str) -> Option<PortId> {
        self.check_model(model);
        let columns = &self.ports[model];
        let mut found = self.ports(model).filter(|&port| columns.prefixes[port] == name);
        let first = found.next();
        assert!(
            found.next().is_none(),
            "circuit model '{}' has more than one port named '{name}'",
            self.models.names[model]
        );
        first
    }

    // --- Shape and naming ---

    /// Returns the width of a port, or 0 if it has not been set.
    pub fn port_size(&self, model: ModelId, port: PortId) -> usize {
        self.check_port(model, port);
        self.ports[model].sizes[port].unwrap_or(0)
    }

    /// Sets the width of a port.
    pub fn set_port_size(&mut self, model: ModelId, port: PortId, size: usize) {
        self.check_port(model, port);
        self.ports[model].sizes.set(port, Some(size));
    }

    /// Returns the port's name, which is also its prefix in generated netlists.
    pub fn port_prefix(&self, model: ModelId, port: PortId) -> &str {
        self.check_port(model, port);
        &self.ports[model].prefixes[port]
    }

    /// Sets the port's name.
    pub fn set_port_prefix(&mut self, model: ModelId, port: PortId, prefix: impl Into<String>) {
        self.check_port(model, port);
        self.ports[model].prefixes.set(port, prefix.into());
    }

    /// Returns the port's name in the user-supplied cell library.
    pub fn port_lib_name(&self, model: ModelId, port: PortId) -> &str {
        self.check_port(model, port);
        &self.ports[model].lib_names[port]
    }

    /// Sets the port's name in the user-supplied cell library.
    pub fn set_port_lib_name(&mut self, model: ModelId, port: PortId, name: impl Into<String>) {
        self.check_port(model, port);
        self.ports[model].lib_names.set(port, name.into());
    }

    /// Returns the prefix of the port's inverted signal.
    pub fn port_inv_prefix(&self, model: ModelId, port: PortId) -> &str {
        self.check_port(model, port);
        &self.ports[model].inv_prefixes[port]
    }

    /// Sets the prefix of the port's inverted signal.
    pub fn set_port_inv_prefix(&mut self, model: ModelId, port: PortId, prefix: impl Into<String>) {
        self.check_port(model, port);
        self.ports[model].inv_prefixes.set(port, prefix.into());
    }

    /// Returns the port's default logic value, if one was given.
    pub fn port_default_value(&self, model: ModelId, port: PortId) -> Option<usize> {
        self.check_port(model, port);
        self.ports[model].default_values[port]
    }

    /// Sets the port's default logic value.
    pub fn set_port_default_value(&mut self, model: ModelId, port: PortId, value: usize) {
        self.check_port(model, port);
        self.ports[model].default_values.set(port, Some(value));
    }

    // --- Flags ---

    /// Returns `true` if the port selects the operating mode of the model.
    pub fn port_is_mode_select(&self, model: ModelId, port: PortId) -> bool {
        self.check_port(model, port);
        self.ports[model].is_mode_select[port]
    }

    /// Sets whether the port selects the operating mode of the model.
    pub fn set_port_is_mode_select(&mut self, model: ModelId, port: PortId, value: bool) {
        self.check_port(model, port);
        self.ports[model].is_mode_select.set(port, value);
    }

    /// Returns `true` if the port is wired to a fabric-wide signal.
    pub fn port_is_global(&self, model: ModelId, port: PortId) -> bool {
        self.check_port(model, port);
        self.ports[model].is_global[port]
    }

    /// Sets whether the port is wired to a fabric-wide signal.
    pub fn set_port_is_global(&mut self, model: ModelId, port: PortId, value: bool) {
        self.check_port(model, port);
        self.ports[model].is_global.set(port, value);
    }

    /// Returns `true` if the port is a reset.
    pub fn port_is_reset(&self, model: ModelId, port: PortId) -> bool {
        self.check_port(model, port);
        self.ports[model].is_reset[port]
    }

    /// Sets whether the port is a reset.
    pub fn set_port_is_reset(&mut self, model: ModelId, port: PortId, value: bool) {
        self.check_port(model, port);
        self.ports[model].is_reset.set(port, value);
    }

    /// Returns `true` if the port is a set.
    pub fn port_is_set(&self, model: ModelId, port: PortId) -> bool {
        self.check_port(model, port);
        self.ports[model].is_set[port]
    }

    /// Sets whether the port is a set.
    pub fn set_port_is_set(&mut self, model: ModelId, port: PortId, value: bool) {
        self.check_port(model, port);
        self.ports[model].is_set.set(port, value);
    }

    /// Returns `true` if the port enables configuration.
    pub fn port_is_config_enable(&self, model: ModelId, port: PortId) -> bool {
        self.check_port(model, port);
        self.ports[model].is_config_enable[port]
    }

    /// Sets whether the port enables configuration.
    pub fn set_port_is_config_enable(&mut self, model: ModelId, port: PortId, value: bool) {
        self.check_port(model, port);
        self.ports[model].is_config_enable.set(port, value);
    }

    /// Returns `true` if the port is only used during programming.
    pub fn port_is_prog(&self, model: ModelId, port: PortId) -> bool {
        self.check_port(model, port);
        self.ports[model].is_prog[port]
    }

    /// Sets whether the port is only used during programming.
    pub fn set_port_is_prog(&mut self, model: ModelId, port: PortId, value: bool) {
        self.check_port(model, port);
        self.ports[model].is_prog.set(port, value);
    }

    // --- Linked models ---

    /// Returns the name of the model driving this port (for SRAM ports, the memory cell).
    pub fn port_tri_state_model_name(&self, model: ModelId, port: PortId) -> &str {
        self.check_port(model, port);
        &self.ports[model].model_names[port]
    }

    /// Returns the linked driving model, if the link pass resolved one.
    pub fn port_tri_state_model(&self, model: ModelId, port: PortId) -> Option<ModelId> {
        self.check_port(model, port);
        self.ports[model].models[port]
    }

    /// Names the model driving this port.
    pub fn set_port_tri_state_model_name(
        &mut self,
        model: ModelId,
        port: PortId,
        name: impl Into<String>,
    ) {
        self.check_port(model, port);
        let columns = &mut self.ports[model];
        columns.model_names.set(port, name.into());
        columns.models.set(port, None);
    }

    /// Returns the name of the model producing this port's inverted signal.
    pub fn port_inv_model_name(&self, model: ModelId, port: PortId) -> &str {
        self.check_port(model, port);
        &self.ports[model].inv_model_names[port]
    }

    /// Returns the linked inverting model, if the link pass resolved one.
    pub fn port_inv_model(&self, model: ModelId, port: PortId) -> Option<ModelId> {
        self.check_port(model, port);
        self.ports[model].inv_models[port]
    }

    /// Names the model producing this port's inverted signal.
    pub fn set_port_inv_model_name(&mut self, model: ModelId, port: PortId, name: impl Into<String>) {
        self.check_port(model, port);
        let columns = &mut self.ports[model];
        columns.inv_model_names.set(port, name.into());
        columns.inv_models.set(port, None);
    }

    /// Returns the tri-state control map of the port.
    pub fn port_tri_state_map(&self, model: ModelId, port: PortId) -> &str {
        self.check_port(model, port);
        &self.ports[model].tri_state_maps[port]
    }

    /// Sets the tri-state control map of the port.
    pub fn set_port_tri_state_map(&mut self, model: ModelId, port: PortId, map: impl Into<String>) {
        self.check_port(model, port);
        self.ports[model].tri_state_maps.set(port, map.into());
    }

    // --- LUT and SRAM specifics ---

    /// Returns the fracturing level of a LUT port.
    ///
    /// # Panics
    ///
    /// Panics if the owning model is not a LUT.
    pub fn port_lut_frac_level(&self, model: ModelId, port: PortId) -> Option<usize> {
        self.check_lut_port(model, port);
        self.ports[model].lut_frac_levels[port]
    }

    /// Sets the fracturing level of a LUT port.
    pub fn set_port_lut_frac_level(&mut self, model: ModelId, port: PortId, level: usize) {
        self.check_lut_port(model, port);
        self.ports[model].lut_frac_levels.set(port, Some(level));
    }

    /// Returns the output masks of a LUT port.
    ///
    /// # Panics
    ///
    /// Panics if the owning model is not a LUT.
    pub fn port_lut_output_masks(&self, model: ModelId, port: PortId) -> &[usize] {
        self.check_lut_port(model, port);
        &self.ports[model].lut_output_masks[port]
    }

    /// Sets the output masks of a LUT port.
    pub fn set_port_lut_output_masks(&mut self, model: ModelId, port: PortId, masks: Vec<usize>) {
        self.check_lut_port(model, port);
        self.ports[model].lut_output_masks.set(port, masks);
    }

    /// Returns the memory organization of an SRAM port.
    ///
    /// # Panics
    ///
    /// Panics if the port is not of type `SRAM`.
    pub fn port_sram_orgz(&self, model: ModelId, port: PortId) -> Option<SramOrganization> {
        self.check_sram_port(model, port);
        self.ports[model].sram_orgz[port]
    }

    /// Sets the memory organization of an SRAM port.
    pub fn set_port_sram_orgz(&mut self, model: ModelId, port: PortId, orgz: SramOrganization) {
        self.check_sram_port(model, port);
        self.ports[model].sram_orgz.set(port, Some(orgz));
    }

    fn check_lut_port(&self, model: ModelId, port: PortId) {
        self.check_port(model, port);
        self.check_model_type(model, &[ModelType::Lut], "LUT port attribute");
    }

    fn check_sram_port(&self, model: ModelId, port: PortId) {
        self.check_port(model, port);
        let ty = self.ports[model].types[port];
        assert!(
            ty == Some(PortType::Sram),
            "SRAM organization is only available on SRAM ports, but port '{}' of circuit model '{}' has type {}",
            self.ports[model].prefixes[port],
            self.models.names[model],
            ty.map_or_else(|| "<unset>".to_string(), |ty| ty.to_string()),
        );
    }
}
