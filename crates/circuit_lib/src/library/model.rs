//! Model-level attributes: identity, netlist options, buffers, and the
//! type-specific parameter groups.
//!
//! Each parameter group is tied to the model types it describes. Both the setter and
//! the getter of a group re-check the model's type at the time of the call, since the
//! reader may set attributes in any order.

use super::CircuitLibrary;
use crate::ids::ModelId;
use crate::types::{
    BufferKind, BufferSlot, DesignTech, GateKind, ModelType, MuxStructure, PassGateKind,
    WireKind,
};
use serde::{Deserialize, Serialize};

const MUX_LIKE: &[ModelType] = &[ModelType::Mux, ModelType::Lut];
const WIRE_LIKE: &[ModelType] = &[ModelType::Wire, ModelType::ChanWire];

/// One buffer slot of a model: whether the buffer exists, the name of the model
/// implementing it, and (after linking) that model's handle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BufferSpec {
    /// Whether the model has a buffer in this slot.
    pub exists: bool,
    /// Name of the `INV_BUF` model realizing the buffer; may be empty.
    pub model_name: String,
    /// Handle of the named model, set by the link pass.
    pub model: Option<ModelId>,
    /// Where the buffers sit inside the model (LUT intermediate buffers only).
    pub location_map: String,
}

/// Electrical parameters of a model built in resistive memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RramParams {
    /// Resistance of the low-resistance state.
    pub r_lrs: Option<f64>,
    /// Resistance of the high-resistance state.
    pub r_hrs: Option<f64>,
    /// Width of the NMOS programming transistor for the set operation.
    pub wprog_set_nmos: Option<f64>,
    /// Width of the PMOS programming transistor for the set operation.
    pub wprog_set_pmos: Option<f64>,
    /// Width of the NMOS programming transistor for the reset operation.
    pub wprog_reset_nmos: Option<f64>,
    /// Width of the PMOS programming transistor for the reset operation.
    pub wprog_reset_pmos: Option<f64>,
}

impl CircuitLibrary {
    // --- Identity and netlist options ---

    /// Returns the type of a model, or `None` if it has not been set.
    pub fn model_type(&self, model: ModelId) -> Option<ModelType> {
        self.check_model(model);
        self.models.types[model]
    }

    /// Sets the type of a model and rebuilds the classification index.
    pub fn set_model_type(&mut self, model: ModelId, ty: ModelType) {
        self.check_model(model);
        self.models.types.set(model, Some(ty));
        self.build_model_lookup();
    }

    /// Returns the unique name of a model.
    pub fn model_name(&self, model: ModelId) -> &str {
        self.check_model(model);
        &self.models.names[model]
    }

    /// Sets the name of a model.
    pub fn set_model_name(&mut self, model: ModelId, name: impl Into<String>) {
        self.check_model(model);
        self.models.names.set(model, name.into());
    }

    /// Returns the prefix used for instances of a model.
    pub fn model_prefix(&self, model: ModelId) -> &str {
        self.check_model(model);
        &self.models.prefixes[model]
    }

    /// Sets the instance prefix of a model.
    pub fn set_model_prefix(&mut self, model: ModelId, prefix: impl Into<String>) {
        self.check_model(model);
        self.models.prefixes.set(model, prefix.into());
    }

    /// Returns the path of a user-supplied Verilog netlist, or an empty string.
    pub fn model_verilog_netlist(&self, model: ModelId) -> &str {
        self.check_model(model);
        &self.models.verilog_netlists[model]
    }

    /// Sets the path of a user-supplied Verilog netlist.
    pub fn set_model_verilog_netlist(&mut self, model: ModelId, path: impl Into<String>) {
        self.check_model(model);
        self.models.verilog_netlists.set(model, path.into());
    }

    /// Returns the path of a user-supplied SPICE netlist, or an empty string.
    pub fn model_spice_netlist(&self, model: ModelId) -> &str {
        self.check_model(model);
        &self.models.spice_netlists[model]
    }

    /// Sets the path of a user-supplied SPICE netlist.
    pub fn set_model_spice_netlist(&mut self, model: ModelId, path: impl Into<String>) {
        self.check_model(model);
        self.models.spice_netlists.set(model, path.into());
    }

    /// Returns `true` if the model is flagged as the default of its type.
    pub fn model_is_default(&self, model: ModelId) -> bool {
        self.check_model(model);
        self.models.is_default[model]
    }

    /// Flags a model as the default of its type and rebuilds the classification index.
    pub fn set_model_is_default(&mut self, model: ModelId, is_default: bool) {
        self.check_model(model);
        self.models.is_default.set(model, is_default);
        self.build_model_lookup();
    }

    /// Returns `true` if netlist writers should emit this model structurally.
    pub fn dump_structural_verilog(&self, model: ModelId) -> bool {
        self.check_model(model);
        self.models.dump_structural_verilog[model]
    }

    /// Sets whether netlist writers emit this model structurally.
    pub fn set_model_dump_structural_verilog(&mut self, model: ModelId, value: bool) {
        self.check_model(model);
        self.models.dump_structural_verilog.set(model, value);
    }

    /// Returns `true` if instances of this model use explicit port mapping.
    pub fn dump_explicit_port_map(&self, model: ModelId) -> bool {
        self.check_model(model);
        self.models.dump_explicit_port_map[model]
    }

    /// Sets whether instances of this model use explicit port mapping.
    pub fn set_model_dump_explicit_port_map(&mut self, model: ModelId, value: bool) {
        self.check_model(model);
        self.models.dump_explicit_port_map.set(model, value);
    }

    /// Returns the design technology of a model, or `None` if unset.
    pub fn design_tech_type(&self, model: ModelId) -> Option<DesignTech> {
        self.check_model(model);
        self.models.design_techs[model]
    }

    /// Sets the design technology of a model.
    pub fn set_model_design_tech_type(&mut self, model: ModelId, tech: DesignTech) {
        self.check_model(model);
        self.models.design_techs.set(model, Some(tech));
    }

    /// Returns `true` if the model is power-gated.
    pub fn is_power_gated(&self, model: ModelId) -> bool {
        self.check_model(model);
        self.models.is_power_gated[model]
    }

    /// Sets whether the model is power-gated.
    pub fn set_model_is_power_gated(&mut self, model: ModelId, value: bool) {
        self.check_model(model);
        self.models.is_power_gated.set(model, value);
    }

    // --- Buffers ---

    /// Returns the buffer specification of a slot.
    ///
    /// # Panics
    ///
    /// Panics if `model` is invalid, or if `slot` is a LUT slot and the model is not a LUT.
    pub fn buffer(&self, model: ModelId, slot: BufferSlot) -> &BufferSpec {
        self.check_buffer_slot(model, slot);
        &self.models.buffers[model][slot.index()]
    }

    /// Sets the existence and model name of a buffer slot.
    ///
    /// Any previously linked handle for the slot is cleared; the link pass fills it in.
    ///
    /// # Panics
    ///
    /// Panics if `model` is invalid, or if `slot` is a LUT slot and the model is not a LUT.
    pub fn set_model_buffer(
        &mut self,
        model: ModelId,
        slot: BufferSlot,
        exists: bool,
        model_name: impl Into<String>,
    ) {
        self.check_buffer_slot(model, slot);
        let spec = &mut self.models.buffers[model][slot.index()];
        spec.exists = exists;
        spec.model_name = model_name.into();
        spec.model = None;
    }

    /// Sets the placement of the buffers of a slot inside the model.
    pub fn set_model_buffer_location_map(
        &mut self,
        model: ModelId,
        slot: BufferSlot,
        location_map: impl Into<String>,
    ) {
        self.check_buffer_slot(model, slot);
        self.models.buffers[model][slot.index()].location_map = location_map.into();
    }

    /// Returns `true` if the model's inputs are buffered.
    pub fn is_input_buffered(&self, model: ModelId) -> bool {
        self.buffer(model, BufferSlot::Input).exists
    }

    /// Returns `true` if the model's outputs are buffered.
    pub fn is_output_buffered(&self, model: ModelId) -> bool {
        self.buffer(model, BufferSlot::Output).exists
    }

    /// Returns `true` if the intermediate stages of a LUT are buffered.
    pub fn is_lut_intermediate_buffered(&self, model: ModelId) -> bool {
        self.buffer(model, BufferSlot::LutInterBuffer).exists
    }

    /// Returns the linked model of the input buffer.
    pub fn input_buffer_model(&self, model: ModelId) -> Option<ModelId> {
        self.buffer(model, BufferSlot::Input).model
    }

    /// Returns the linked model of the output buffer.
    pub fn output_buffer_model(&self, model: ModelId) -> Option<ModelId> {
        self.buffer(model, BufferSlot::Output).model
    }

    /// Returns the linked model of a LUT's input buffers.
    pub fn lut_input_buffer_model(&self, model: ModelId) -> Option<ModelId> {
        self.buffer(model, BufferSlot::LutInputBuffer).model
    }

    /// Returns the linked model of a LUT's input inverters.
    pub fn lut_input_inverter_model(&self, model: ModelId) -> Option<ModelId> {
        self.buffer(model, BufferSlot::LutInputInverter).model
    }

    /// Returns the linked model of a LUT's intermediate buffers.
    pub fn lut_intermediate_buffer_model(&self, model: ModelId) -> Option<ModelId> {
        self.buffer(model, BufferSlot::LutInterBuffer).model
    }

    fn check_buffer_slot(&self, model: ModelId, slot: BufferSlot) {
        if slot.is_lut_only() {
            self.check_model_type(model, &[ModelType::Lut], "LUT buffer slot");
        } else {
            self.check_model(model);
        }
    }

    // --- Pass-gate link ---

    /// Returns the name of the pass-gate model this model is built from.
    pub fn pass_gate_logic_model_name(&self, model: ModelId) -> &str {
        self.check_model(model);
        &self.models.pass_gate_model_names[model]
    }

    /// Returns the linked pass-gate model, if the link pass resolved one.
    pub fn pass_gate_logic_model(&self, model: ModelId) -> Option<ModelId> {
        self.check_model(model);
        self.models.pass_gate_models[model]
    }

    /// Names the pass-gate model this model is built from.
    pub fn set_model_pass_gate_logic(&mut self, model: ModelId, model_name: impl Into<String>) {
        self.check_model(model);
        self.models.pass_gate_model_names.set(model, model_name.into());
        self.models.pass_gate_models.set(model, None);
    }

    // --- INV_BUF parameters ---

    /// Returns whether an `INV_BUF` model inverts.
    pub fn buffer_type(&self, model: ModelId) -> Option<BufferKind> {
        self.check_model_type(model, &[ModelType::InvBuf], "buffer type");
        self.models.buffer_kinds[model]
    }

    /// Sets whether an `INV_BUF` model inverts.
    pub fn set_buffer_type(&mut self, model: ModelId, kind: BufferKind) {
        self.check_model_type(model, &[ModelType::InvBuf], "buffer type");
        self.models.buffer_kinds.set(model, Some(kind));
    }

    /// Returns the drive strength of an `INV_BUF` model.
    pub fn buffer_size(&self, model: ModelId) -> Option<f64> {
        self.check_model_type(model, &[ModelType::InvBuf], "buffer size");
        self.models.buffer_sizes[model]
    }

    /// Sets the drive strength of an `INV_BUF` model.
    pub fn set_buffer_size(&mut self, model: ModelId, size: f64) {
        self.check_model_type(model, &[ModelType::InvBuf], "buffer size");
        self.models.buffer_sizes.set(model, Some(size));
    }

    /// Returns the number of stages of an `INV_BUF` model.
    pub fn buffer_num_levels(&self, model: ModelId) -> Option<usize> {
        self.check_model_type(model, &[ModelType::InvBuf], "buffer stage count");
        self.models.buffer_num_levels[model]
    }

    /// Sets the number of stages of an `INV_BUF` model.
    pub fn set_buffer_num_levels(&mut self, model: ModelId, num_levels: usize) {
        self.check_model_type(model, &[ModelType::InvBuf], "buffer stage count");
        self.models.buffer_num_levels.set(model, Some(num_levels));
    }

    /// Returns the fan-out per stage of an `INV_BUF` model.
    pub fn buffer_f_per_stage(&self, model: ModelId) -> Option<usize> {
        self.check_model_type(model, &[ModelType::InvBuf], "buffer fan-out per stage");
        self.models.buffer_f_per_stage[model]
    }

    /// Sets the fan-out per stage of an `INV_BUF` model.
    pub fn set_buffer_f_per_stage(&mut self, model: ModelId, f_per_stage: usize) {
        self.check_model_type(model, &[ModelType::InvBuf], "buffer fan-out per stage");
        self.models.buffer_f_per_stage.set(model, Some(f_per_stage));
    }

    // --- PASSGATE parameters ---

    /// Sets the transistor structure of a `PASSGATE` model.
    pub fn set_pass_gate_logic_type(&mut self, model: ModelId, kind: PassGateKind) {
        self.check_model_type(model, &[ModelType::PassGate], "pass-gate type");
        self.models.pass_gate_kinds.set(model, Some(kind));
    }

    /// Returns the NMOS width of a `PASSGATE` model.
    pub fn pass_gate_logic_nmos_size(&self, model: ModelId) -> Option<f64> {
        self.check_model_type(model, &[ModelType::PassGate], "pass-gate NMOS size");
        self.models.pass_gate_nmos_sizes[model]
    }

    /// Sets the NMOS width of a `PASSGATE` model.
    pub fn set_pass_gate_logic_nmos_size(&mut self, model: ModelId, size: f64) {
        self.check_model_type(model, &[ModelType::PassGate], "pass-gate NMOS size");
        self.models.pass_gate_nmos_sizes.set(model, Some(size));
    }

    /// Returns the PMOS width of a `PASSGATE` model.
    pub fn pass_gate_logic_pmos_size(&self, model: ModelId) -> Option<f64> {
        self.check_model_type(model, &[ModelType::PassGate], "pass-gate PMOS size");
        self.models.pass_gate_pmos_sizes[model]
    }

    /// Sets the PMOS width of a `PASSGATE` model.
    pub fn set_pass_gate_logic_pmos_size(&mut self, model: ModelId, size: f64) {
        self.check_model_type(model, &[ModelType::PassGate], "pass-gate PMOS size");
        self.models.pass_gate_pmos_sizes.set(model, Some(size));
    }

    // --- MUX / LUT parameters ---

    /// Returns the multiplexer structure of a MUX or LUT model.
    pub fn mux_structure(&self, model: ModelId) -> Option<MuxStructure> {
        self.check_model_type(model, MUX_LIKE, "multiplexer structure");
        self.models.mux_structures[model]
    }

    /// Sets the multiplexer structure of a MUX or LUT model.
    pub fn set_mux_structure(&mut self, model: ModelId, structure: MuxStructure) {
        self.check_model_type(model, MUX_LIKE, "multiplexer structure");
        self.models.mux_structures.set(model, Some(structure));
    }

    /// Returns the number of levels of a multi-level multiplexer.
    pub fn mux_num_levels(&self, model: ModelId) -> Option<usize> {
        self.check_model_type(model, MUX_LIKE, "multiplexer level count");
        self.models.mux_num_levels[model]
    }

    /// Sets the number of levels of a multi-level multiplexer.
    pub fn set_mux_num_levels(&mut self, model: ModelId, num_levels: usize) {
        self.check_model_type(model, MUX_LIKE, "multiplexer level count");
        self.models.mux_num_levels.set(model, Some(num_levels));
    }

    /// Returns `true` if the multiplexer needs an extra constant input.
    pub fn mux_add_const_input(&self, model: ModelId) -> bool {
        self.mux_const_input_value(model).is_some()
    }

    /// Returns the logic value of the multiplexer's constant input, or `None` if it
    /// has none.
    pub fn mux_const_input_value(&self, model: ModelId) -> Option<usize> {
        self.check_model_type(model, MUX_LIKE, "multiplexer constant input");
        self.models.mux_const_inputs[model]
    }

    /// Sets the constant input of a multiplexer: `None`, `Some(0)` or `Some(1)`.
    ///
    /// # Panics
    ///
    /// Panics on any other value, or if the model is not a MUX or LUT.
    pub fn set_mux_const_input_value(&mut self, model: ModelId, value: Option<usize>) {
        self.check_model_type(model, MUX_LIKE, "multiplexer constant input");
        assert!(
            matches!(value, None | Some(0) | Some(1)),
            "invalid constant input value {value:?} for circuit model '{}': expected none, 0 or 1",
            self.models.names[model]
        );
        self.models.mux_const_inputs.set(model, value);
    }

    /// Returns `true` if the multiplexer uses a local encoder for its select lines.
    pub fn mux_use_local_encoder(&self, model: ModelId) -> bool {
        self.check_model_type(model, MUX_LIKE, "multiplexer local encoder");
        self.models.mux_use_local_encoder[model]
    }

    /// Sets whether the multiplexer uses a local encoder.
    pub fn set_mux_use_local_encoder(&mut self, model: ModelId, value: bool) {
        self.check_model_type(model, MUX_LIKE, "multiplexer local encoder");
        self.models.mux_use_local_encoder.set(model, value);
    }

    /// Returns `true` if the multiplexer uses the advanced RRAM design.
    pub fn mux_use_advanced_rram_design(&self, model: ModelId) -> bool {
        self.check_model_type(model, MUX_LIKE, "advanced RRAM multiplexer");
        self.models.mux_use_advanced_rram_design[model]
    }

    /// Sets whether the multiplexer uses the advanced RRAM design.
    pub fn set_mux_use_advanced_rram_design(&mut self, model: ModelId, value: bool) {
        self.check_model_type(model, MUX_LIKE, "advanced RRAM multiplexer");
        self.models.mux_use_advanced_rram_design.set(model, value);
    }

    // --- LUT parameters ---

    /// Returns `true` if the LUT can be split into smaller LUTs.
    pub fn lut_is_fracturable(&self, model: ModelId) -> bool {
        self.check_model_type(model, &[ModelType::Lut], "fracturable LUT flag");
        self.models.lut_is_fracturable[model]
    }

    /// Sets whether the LUT can be split into smaller LUTs.
    pub fn set_lut_is_fracturable(&mut self, model: ModelId, value: bool) {
        self.check_model_type(model, &[ModelType::Lut], "fracturable LUT flag");
        self.models.lut_is_fracturable.set(model, value);
    }

    // --- GATE parameters ---

    /// Returns the boolean function of a `GATE` model.
    pub fn gate_type(&self, model: ModelId) -> Option<GateKind> {
        self.check_model_type(model, &[ModelType::Gate], "gate type");
        self.models.gate_kinds[model]
    }

    /// Sets the boolean function of a `GATE` model.
    pub fn set_gate_type(&mut self, model: ModelId, kind: GateKind) {
        self.check_model_type(model, &[ModelType::Gate], "gate type");
        self.models.gate_kinds.set(model, Some(kind));
    }

    // --- RRAM parameters ---

    /// Returns the resistive-memory parameters of an RRAM model.
    ///
    /// # Panics
    ///
    /// Panics if the model's design technology is not RRAM.
    pub fn rram_params(&self, model: ModelId) -> &RramParams {
        self.check_rram(model);
        &self.models.rram[model]
    }

    /// Updates the resistive-memory parameters of an RRAM model in place.
    ///
    /// # Panics
    ///
    /// Panics if the model's design technology is not RRAM.
    pub fn set_rram_params(&mut self, model: ModelId, update: impl FnOnce(&mut RramParams)) {
        self.check_rram(model);
        update(&mut self.models.rram[model]);
    }

    fn check_rram(&self, model: ModelId) {
        self.check_model(model);
        assert!(
            self.models.design_techs[model] == Some(DesignTech::Rram),
            "RRAM parameters are only available on RRAM models, but circuit model '{}' uses {:?}",
            self.models.names[model],
            self.models.design_techs[model],
        );
    }

    // --- WIRE / CHAN_WIRE parameters ---

    /// Returns the RC model of a wire.
    pub fn wire_type(&self, model: ModelId) -> Option<WireKind> {
        self.check_model_type(model, WIRE_LIKE, "wire model");
        self.models.wire_kinds[model]
    }

    /// Sets the RC model of a wire.
    pub fn set_wire_type(&mut self, model: ModelId, kind: WireKind) {
        self.check_model_type(model, WIRE_LIKE, "wire model");
        self.models.wire_kinds.set(model, Some(kind));
    }

    /// Returns the resistance of a wire.
    pub fn wire_r(&self, model: ModelId) -> Option<f64> {
        self.check_model_type(model, WIRE_LIKE, "wire resistance");
        self.models.wire_r[model]
    }

    /// Sets the resistance of a wire.
    pub fn set_wire_r(&mut self, model: ModelId, r: f64) {
        self.check_model_type(model, WIRE_LIKE, "wire resistance");
        self.models.wire_r.set(model, Some(r));
    }

    /// Returns the capacitance of a wire.
    pub fn wire_c(&self, model: ModelId) -> Option<f64> {
        self.check_model_type(model, WIRE_LIKE, "wire capacitance");
        self.models.wire_c[model]
    }

    /// Sets the capacitance of a wire.
    pub fn set_wire_c(&mut self, model: ModelId, c: f64) {
        self.check_model_type(model, WIRE_LIKE, "wire capacitance");
        self.models.wire_c.set(model, Some(c));
    }

    /// Returns the number of RC segments of a wire.
    pub fn wire_num_levels(&self, model: ModelId) -> Option<usize> {
        self.check_model_type(model, WIRE_LIKE, "wire segment count");
        self.models.wire_num_levels[model]
    }

    /// Sets the number of RC segments of a wire.
    pub fn set_wire_num_levels(&mut self, model: ModelId, num_levels: usize) {
        self.check_model_type(model, WIRE_LIKE, "wire segment count");
        self.models.wire_num_levels.set(model, Some(num_levels));
    }
}
