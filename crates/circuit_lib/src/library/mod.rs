//! The circuit library store.
//!
//! [`CircuitLibrary`] keeps every attribute of every model and port in its own
//! [`Column`], indexed by dense handles. The store is built in strictly sequential
//! phases:
//!
//! 1. **Construction**: the architecture reader calls [`add_model`](CircuitLibrary::add_model),
//!    [`add_model_port`](CircuitLibrary::add_model_port) and the attribute setters.
//!    Names may refer to models that have not been created yet.
//! 2. **Linking**: [`build_model_links`](CircuitLibrary::build_model_links) resolves every
//!    model name reference to a handle.
//! 3. **Indexing**: [`build_model_lookup`](CircuitLibrary::build_model_lookup) classifies
//!    models by type.
//! 4. **Timing**: [`build_timing_graphs`](CircuitLibrary::build_timing_graphs) synthesizes
//!    pin-to-pin arcs and annotates them with delays.
//!
//! [`build`](CircuitLibrary::build) runs phases 2 to 4. Afterwards the store is only read.
//!
//! Handing the store a handle it did not issue, or touching a type-specific attribute
//! group on a model of another type, is a caller bug and panics.

mod link;
mod lookup;
mod model;
mod port;
mod timing;
mod validate;

pub use model::{BufferSpec, RramParams};
pub use timing::DelayInfo;

use crate::column::Column;
use crate::error::CircuitResult;
use crate::ids::{ModelId, PortId};
use crate::types::{
    BufferKind, BufferSlot, DesignTech, GateKind, ModelType, MuxStructure, PassGateKind,
    PortType, SramOrganization, WireKind,
};
use circuit_config::{CircuitLibConfig, LibraryOptions};
use log::info;
use lookup::ClassIndex;
use std::cell::OnceCell;
use timing::TimingGraph;

/// Per-model attribute columns.
#[derive(Debug, Clone, Default)]
struct ModelColumns {
    types: Column<ModelId, Option<ModelType>>,
    names: Column<ModelId, String>,
    prefixes: Column<ModelId, String>,
    verilog_netlists: Column<ModelId, String>,
    spice_netlists: Column<ModelId, String>,
    is_default: Column<ModelId, bool>,
    dump_structural_verilog: Column<ModelId, bool>,
    dump_explicit_port_map: Column<ModelId, bool>,
    design_techs: Column<ModelId, Option<DesignTech>>,
    is_power_gated: Column<ModelId, bool>,
    buffers: Column<ModelId, [BufferSpec; BufferSlot::COUNT]>,
    pass_gate_model_names: Column<ModelId, String>,
    pass_gate_models: Column<ModelId, Option<ModelId>>,
    buffer_kinds: Column<ModelId, Option<BufferKind>>,
    buffer_sizes: Column<ModelId, Option<f64>>,
    buffer_num_levels: Column<ModelId, Option<usize>>,
    buffer_f_per_stage: Column<ModelId, Option<usize>>,
    pass_gate_kinds: Column<ModelId, Option<PassGateKind>>,
    pass_gate_nmos_sizes: Column<ModelId, Option<f64>>,
    pass_gate_pmos_sizes: Column<ModelId, Option<f64>>,
    mux_structures: Column<ModelId, Option<MuxStructure>>,
    mux_num_levels: Column<ModelId, Option<usize>>,
    mux_const_inputs: Column<ModelId, Option<usize>>,
    mux_use_local_encoder: Column<ModelId, bool>,
    mux_use_advanced_rram_design: Column<ModelId, bool>,
    lut_is_fracturable: Column<ModelId, bool>,
    gate_kinds: Column<ModelId, Option<GateKind>>,
    rram: Column<ModelId, RramParams>,
    wire_kinds: Column<ModelId, Option<WireKind>>,
    wire_r: Column<ModelId, Option<f64>>,
    wire_c: Column<ModelId, Option<f64>>,
    wire_num_levels: Column<ModelId, Option<usize>>,
    delay_info: Column<ModelId, Vec<DelayInfo>>,
}

impl ModelColumns {
    /// Appends a default-initialized row to every column and returns its handle.
    fn push_default(&mut self) -> ModelId {
        let id = self.types.push(None);
        self.names.push(String::new());
        self.prefixes.push(String::new());
        self.verilog_netlists.push(String::new());
        self.spice_netlists.push(String::new());
        self.is_default.push(false);
        self.dump_structural_verilog.push(false);
        self.dump_explicit_port_map.push(false);
        self.design_techs.push(None);
        self.is_power_gated.push(false);
        self.buffers.push(Default::default());
        self.pass_gate_model_names.push(String::new());
        self.pass_gate_models.push(None);
        self.buffer_kinds.push(None);
        self.buffer_sizes.push(None);
        self.buffer_num_levels.push(None);
        self.buffer_f_per_stage.push(None);
        self.pass_gate_kinds.push(None);
        self.pass_gate_nmos_sizes.push(None);
        self.pass_gate_pmos_sizes.push(None);
        self.mux_structures.push(None);
        self.mux_num_levels.push(None);
        self.mux_const_inputs.push(None);
        self.mux_use_local_encoder.push(false);
        self.mux_use_advanced_rram_design.push(false);
        self.lut_is_fracturable.push(false);
        self.gate_kinds.push(None);
        self.rram.push(RramParams::default());
        self.wire_kinds.push(None);
        self.wire_r.push(None);
        self.wire_c.push(None);
        self.wire_num_levels.push(None);
        self.delay_info.push(Vec::new());
        id
    }
}

/// Per-port attribute columns of a single model.
#[derive(Debug, Clone, Default)]
struct PortColumns {
    types: Column<PortId, Option<PortType>>,
    sizes: Column<PortId, Option<usize>>,
    prefixes: Column<PortId, String>,
    lib_names: Column<PortId, String>,
    inv_prefixes: Column<PortId, String>,
    default_values: Column<PortId, Option<usize>>,
    is_mode_select: Column<PortId, bool>,
    is_global: Column<PortId, bool>,
    is_reset: Column<PortId, bool>,
    is_set: Column<PortId, bool>,
    is_config_enable: Column<PortId, bool>,
    is_prog: Column<PortId, bool>,
    model_names: Column<PortId, String>,
    models: Column<PortId, Option<ModelId>>,
    inv_model_names: Column<PortId, String>,
    inv_models: Column<PortId, Option<ModelId>>,
    tri_state_maps: Column<PortId, String>,
    lut_frac_levels: Column<PortId, Option<usize>>,
    lut_output_masks: Column<PortId, Vec<usize>>,
    sram_orgz: Column<PortId, Option<SramOrganization>>,
    lookup: OnceCell<ClassIndex<PortId>>,
}

impl PortColumns {
    fn push_default(&mut self) -> PortId {
        let id = self.types.push(None);
        self.sizes.push(None);
        self.prefixes.push(String::new());
        self.lib_names.push(String::new());
        self.inv_prefixes.push(String::new());
        self.default_values.push(None);
        self.is_mode_select.push(false);
        self.is_global.push(false);
        self.is_reset.push(false);
        self.is_set.push(false);
        self.is_config_enable.push(false);
        self.is_prog.push(false);
        self.model_names.push(String::new());
        self.models.push(None);
        self.inv_model_names.push(String::new());
        self.inv_models.push(None);
        self.tri_state_maps.push(String::new());
        self.lut_frac_levels.push(None);
        self.lut_output_masks.push(Vec::new());
        self.sram_orgz.push(None);
        id
    }
}

/// A build-once, query-many store of circuit models.
///
/// See the [module documentation](self) for the build phases.
#[derive(Debug, Clone, Default)]
pub struct CircuitLibrary {
    options: LibraryOptions,
    models: ModelColumns,
    ports: Column<ModelId, PortColumns>,
    graphs: Column<ModelId, TimingGraph>,
    model_lookup: OnceCell<ClassIndex<ModelId>>,
}

impl CircuitLibrary {
    /// Creates an empty library with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty library bound to the given configuration.
    pub fn with_config(config: &CircuitLibConfig) -> Self {
        Self {
            options: config.library.clone(),
            ..Self::default()
        }
    }

    /// Returns the options this library was created with.
    pub fn options(&self) -> &LibraryOptions {
        &self.options
    }

    /// Runs the link, classification and timing phases in order.
    ///
    /// # Errors
    ///
    /// Returns the first error of the link pass (strict mode only) or of the timing
    /// graph builder.
    pub fn build(&mut self) -> CircuitResult<()> {
        self.build_model_links()?;
        self.build_model_lookup();
        self.build_timing_graphs()?;
        info!(
            "circuit library built: {} models, {} ports, {} timing edges",
            self.num_models(),
            self.models().map(|m| self.num_ports(m)).sum::<usize>(),
            self.models().map(|m| self.num_edges(m)).sum::<usize>(),
        );
        Ok(())
    }

    // --- Handle allocation ---

    /// Adds a model with every attribute unset and returns its handle.
    pub fn add_model(&mut self) -> ModelId {
        let id = self.models.push_default();
        self.ports.push(PortColumns::default());
        self.graphs.push(TimingGraph::default());
        self.invalidate_model_lookup();
        id
    }

    /// Adds a port with every attribute unset to `model` and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if `model` is not a valid handle.
    pub fn add_model_port(&mut self, model: ModelId) -> PortId {
        self.check_model(model);
        let columns = &mut self.ports[model];
        let id = columns.push_default();
        columns.lookup.take();
        id
    }

    // --- Aggregates ---

    /// Returns the number of models.
    pub fn num_models(&self) -> usize {
        self.models.names.len()
    }

    /// Iterates over every model in creation order.
    pub fn models(&self) -> impl Iterator<Item = ModelId> + '_ {
        self.models.names.ids()
    }

    /// Returns the number of ports of `model`.
    ///
    /// # Panics
    ///
    /// Panics if `model` is not a valid handle.
    pub fn num_ports(&self, model: ModelId) -> usize {
        self.check_model(model);
        self.ports[model].types.len()
    }

    /// Iterates over the ports of `model` in creation order.
    ///
    /// # Panics
    ///
    /// Panics if `model` is not a valid handle.
    pub fn ports(&self, model: ModelId) -> impl Iterator<Item = PortId> + '_ {
        self.check_model(model);
        self.ports[model].types.ids()
    }

    /// Returns the pin indices `0..width` of a port.
    ///
    /// # Panics
    ///
    /// Panics if the handles are invalid.
    pub fn pins(&self, model: ModelId, port: PortId) -> std::ops::Range<usize> {
        0..self.port_size(model, port)
    }

    // --- Validators ---

    /// Returns `true` if `model` was issued by this library.
    pub fn valid_model_id(&self, model: ModelId) -> bool {
        self.models.names.contains(model)
    }

    /// Returns `true` if `port` was issued by this library for `model`.
    pub fn valid_port_id(&self, model: ModelId, port: PortId) -> bool {
        self.valid_model_id(model) && self.ports[model].types.contains(port)
    }

    /// Returns `true` if `pin` lies within the width of `port`.
    pub fn valid_pin_id(&self, model: ModelId, port: PortId, pin: usize) -> bool {
        self.valid_port_id(model, port) && pin < self.port_size(model, port)
    }

    fn check_model(&self, model: ModelId) {
        assert!(
            self.valid_model_id(model),
            "invalid circuit model handle {model:?} (library has {} models)",
            self.num_models()
        );
    }

    fn check_port(&self, model: ModelId, port: PortId) {
        self.check_model(model);
        assert!(
            self.ports[model].types.contains(port),
            "invalid port handle {port:?} for circuit model '{}'",
            self.models.names[model]
        );
    }

    /// Asserts that `model` is valid and its type is one of `allowed`.
    fn check_model_type(&self, model: ModelId, allowed: &[ModelType], group: &str) {
        self.check_model(model);
        let ty = self.models.types[model];
        assert!(
            ty.is_some_and(|ty| allowed.contains(&ty)),
            "{group} is only available on {} models, but circuit model '{}' has type {}",
            allowed
                .iter()
                .map(|ty| ty.name())
                .collect::<Vec<_>>()
                .join("/"),
            self.models.names[model],
            ty.map_or("<unset>", ModelType::name),
        );
    }
}
