//! Pin-to-pin timing graphs and delay annotation.
//!
//! The graph of a model is built in two stages. Arc synthesis connects every input
//! pin to every output pin of a *different* port, so the arc set depends only on port
//! directions and widths. Delay annotation then writes the values of each
//! [`DelayInfo`] record onto the arcs it names; arcs it does not name keep a delay of
//! zero.
//!
//! An annotation names its inputs and outputs with port references and gives its
//! values as a matrix with one row per output pin and one column per input pin:
//!
//! ```text
//! in:     a           (a is 2 pins wide)
//! out:    b           (b is 1 pin wide)
//! values: 1.2 3.4     (a[0] -> b[0] = 1.2, a[1] -> b[0] = 3.4)
//! ```

use super::CircuitLibrary;
use crate::column::Column;
use crate::error::{CircuitError, CircuitResult};
use crate::ids::{EdgeId, ModelId, PortId};
use crate::parse::{parse_delay_matrix, parse_port_refs};
use crate::types::DelayKind;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A pin of a port, as `(port, pin)`.
type PinRef = (PortId, usize);

/// A textual delay annotation of one delay kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayInfo {
    /// The delay kind the values apply to.
    pub kind: DelayKind,
    /// Port references naming the source pins (matrix columns).
    pub in_port_names: String,
    /// Port references naming the sink pins (matrix rows).
    pub out_port_names: String,
    /// The delay matrix.
    pub values: String,
}

impl DelayInfo {
    fn new(kind: DelayKind) -> Self {
        Self {
            kind,
            in_port_names: String::new(),
            out_port_names: String::new(),
            values: String::new(),
        }
    }
}

/// The timing arcs of one model, stored by column.
#[derive(Debug, Clone, Default)]
pub(super) struct TimingGraph {
    src_ports: Column<EdgeId, PortId>,
    src_pins: Column<EdgeId, usize>,
    sink_ports: Column<EdgeId, PortId>,
    sink_pins: Column<EdgeId, usize>,
    delays: Column<EdgeId, [f64; DelayKind::COUNT]>,
    fanout: HashMap<PinRef, Vec<EdgeId>>,
    fanin: HashMap<PinRef, Vec<EdgeId>>,
    arcs: HashMap<(PinRef, PinRef), EdgeId>,
}

impl TimingGraph {
    fn add_edge(&mut self, from: PinRef, to: PinRef) -> EdgeId {
        let id = self.src_ports.push(from.0);
        self.src_pins.push(from.1);
        self.sink_ports.push(to.0);
        self.sink_pins.push(to.1);
        self.delays.push([0.0; DelayKind::COUNT]);
        self.fanout.entry(from).or_default().push(id);
        self.fanin.entry(to).or_default().push(id);
        self.arcs.insert((from, to), id);
        id
    }

    fn len(&self) -> usize {
        self.src_ports.len()
    }
}

/// Which side of a timing arc a port reference list names.
#[derive(Clone, Copy)]
enum ArcSide {
    Source,
    Sink,
}

impl ArcSide {
    fn expected(self) -> &'static str {
        match self {
            ArcSide::Source => "input",
            ArcSide::Sink => "output",
        }
    }
}

impl CircuitLibrary {
    // --- Delay annotation records ---

    /// Declares a delay annotation of kind `kind` on a model.
    ///
    /// A model has at most one record per kind; declaring an existing kind again
    /// keeps the existing record and its contents.
    pub fn add_delay_info(&mut self, model: ModelId, kind: DelayKind) {
        self.check_model(model);
        let records = &mut self.models.delay_info[model];
        if records.iter().all(|record| record.kind != kind) {
            records.push(DelayInfo::new(kind));
        }
    }

    /// Sets the source port references of the `kind` record.
    ///
    /// # Panics
    ///
    /// Panics if no record of `kind` was declared with [`add_delay_info`](Self::add_delay_info).
    pub fn set_delay_in_port_names(
        &mut self,
        model: ModelId,
        kind: DelayKind,
        names: impl Into<String>,
    ) {
        self.delay_record_mut(model, kind).in_port_names = names.into();
    }

    /// Sets the sink port references of the `kind` record.
    ///
    /// # Panics
    ///
    /// Panics if no record of `kind` was declared.
    pub fn set_delay_out_port_names(
        &mut self,
        model: ModelId,
        kind: DelayKind,
        names: impl Into<String>,
    ) {
        self.delay_record_mut(model, kind).out_port_names = names.into();
    }

    /// Sets the delay matrix of the `kind` record.
    ///
    /// # Panics
    ///
    /// Panics if no record of `kind` was declared.
    pub fn set_delay_values(&mut self, model: ModelId, kind: DelayKind, values: impl Into<String>) {
        self.delay_record_mut(model, kind).values = values.into();
    }

    /// Returns the delay annotation records of a model in declaration order.
    pub fn delay_info(&self, model: ModelId) -> &[DelayInfo] {
        self.check_model(model);
        &self.models.delay_info[model]
    }

    fn delay_record_mut(&mut self, model: ModelId, kind: DelayKind) -> &mut DelayInfo {
        self.check_model(model);
        let name = &self.models.names[model];
        match self.models.delay_info[model]
            .iter_mut()
            .find(|record| record.kind == kind)
        {
            Some(record) => record,
            None => panic!("no {kind:?} delay is declared on circuit model '{name}'"),
        }
    }

    // --- Graph construction ---

    /// Rebuilds the timing graph of every model and annotates it with delays.
    ///
    /// Each existing graph is dropped first.
    ///
    /// # Errors
    ///
    /// Returns the first error found while resolving a model's delay annotations: a
    /// malformed reference or matrix, an unknown port, a port on the wrong side of the
    /// arc, a pin outside its port, a matrix of the wrong shape, or a cell naming a
    /// pin pair with no arc.
    pub fn build_timing_graphs(&mut self) -> CircuitResult<()> {
        let models: Vec<ModelId> = self.models().collect();
        for &model in &models {
            self.invalidate_model_timing_graph(model);
            self.build_model_timing_graph(model);
            self.set_timing_graph_delays(model)?;
        }
        info!("built timing graphs for {} circuit models", models.len());
        Ok(())
    }

    /// Drops every edge of a model's timing graph.
    pub fn invalidate_model_timing_graph(&mut self, model: ModelId) {
        self.check_model(model);
        self.graphs[model] = TimingGraph::default();
    }

    fn build_model_timing_graph(&mut self, model: ModelId) {
        let inputs = self.input_ports(model);
        let outputs = self.output_ports(model);
        let mut graph = TimingGraph::default();
        for &from_port in &inputs {
            for from_pin in self.pins(model, from_port) {
                for &to_port in &outputs {
                    if to_port == from_port {
                        continue;
                    }
                    for to_pin in self.pins(model, to_port) {
                        graph.add_edge((from_port, from_pin), (to_port, to_pin));
                    }
                }
            }
        }
        debug!(
            "circuit model '{}': {} timing edges",
            self.models.names[model],
            graph.len()
        );
        self.graphs[model] = graph;
    }

    fn set_timing_graph_delays(&mut self, model: ModelId) -> CircuitResult<()> {
        let records = self.models.delay_info[model].clone();
        for record in &records {
            let sources = self.resolve_delay_pins(model, &record.in_port_names, ArcSide::Source)?;
            let sinks = self.resolve_delay_pins(model, &record.out_port_names, ArcSide::Sink)?;
            let matrix = parse_delay_matrix(&record.values).map_err(|source| {
                CircuitError::Parse {
                    model: self.models.names[model].clone(),
                    source,
                }
            })?;

            // A matrix without rows has no width to check.
            let width_ok = matrix.height() == 0 || matrix.width() == sources.len();
            if matrix.height() != sinks.len() || !width_ok {
                return Err(CircuitError::DelayDimension {
                    model: self.models.names[model].clone(),
                    kind: record.kind,
                    rows: matrix.height(),
                    cols: matrix.width(),
                    expected_rows: sinks.len(),
                    expected_cols: sources.len(),
                });
            }

            for (row, col, value) in matrix.cells() {
                let from = sources[col];
                let to = sinks[row];
                let Some(&edge) = self.graphs[model].arcs.get(&(from, to)) else {
                    return Err(CircuitError::MissingEdge {
                        model: self.models.names[model].clone(),
                        from_port: self.ports[model].prefixes[from.0].clone(),
                        from_pin: from.1,
                        to_port: self.ports[model].prefixes[to.0].clone(),
                        to_pin: to.1,
                    });
                };
                self.graphs[model].delays[edge][record.kind.index()] = value;
            }
            debug!(
                "circuit model '{}': annotated {} {:?} delays",
                self.models.names[model],
                sources.len() * sinks.len(),
                record.kind
            );
        }
        Ok(())
    }

    /// Expands a port reference list into concrete pins of `model`.
    fn resolve_delay_pins(
        &self,
        model: ModelId,
        text: &str,
        side: ArcSide,
    ) -> CircuitResult<Vec<PinRef>> {
        let model_name = || self.models.names[model].clone();
        let refs = parse_port_refs(text).map_err(|source| CircuitError::Parse {
            model: model_name(),
            source,
        })?;

        let mut pins = Vec::new();
        for port_ref in refs {
            let port = self
                .port(model, &port_ref.name)
                .ok_or_else(|| CircuitError::UnknownPort {
                    model: model_name(),
                    port: port_ref.name.clone(),
                })?;
            let direction_ok = match side {
                ArcSide::Source => self.is_input_port(model, port),
                ArcSide::Sink => self.is_output_port(model, port),
            };
            if !direction_ok {
                return Err(CircuitError::PortDirection {
                    model: model_name(),
                    port: port_ref.name,
                    expected: side.expected(),
                });
            }

            let Some((msb, lsb)) = port_ref.range else {
                pins.extend(self.pins(model, port).map(|pin| (port, pin)));
                continue;
            };
            let Some(pin) = port_ref.single_pin() else {
                return Err(CircuitError::PortWidth {
                    model: model_name(),
                    port: port_ref.name,
                    msb,
                    lsb,
                });
            };
            let width = self.port_size(model, port);
            if pin >= width {
                return Err(CircuitError::PinOutOfRange {
                    model: model_name(),
                    port: port_ref.name,
                    pin,
                    width,
                });
            }
            pins.push((port, pin));
        }
        Ok(pins)
    }

    // --- Edge queries ---

    /// Returns the number of timing edges of a model.
    pub fn num_edges(&self, model: ModelId) -> usize {
        self.check_model(model);
        self.graphs[model].len()
    }

    /// Iterates over the timing edges of a model in creation order.
    pub fn edges(&self, model: ModelId) -> impl Iterator<Item = EdgeId> + '_ {
        self.check_model(model);
        self.graphs[model].src_ports.ids()
    }

    /// Returns `true` if `edge` belongs to the current timing graph of `model`.
    pub fn valid_edge_id(&self, model: ModelId, edge: EdgeId) -> bool {
        self.valid_model_id(model) && self.graphs[model].src_ports.contains(edge)
    }

    /// Finds the edge from `from_port[from_pin]` to `to_port[to_pin]`.
    ///
    /// # Panics
    ///
    /// Panics if either pin does not exist on the model.
    pub fn edge(
        &self,
        model: ModelId,
        from_port: PortId,
        from_pin: usize,
        to_port: PortId,
        to_pin: usize,
    ) -> Option<EdgeId> {
        self.check_pin(model, from_port, from_pin);
        self.check_pin(model, to_port, to_pin);
        self.graphs[model]
            .arcs
            .get(&((from_port, from_pin), (to_port, to_pin)))
            .copied()
    }

    /// Finds an edge by the names of its endpoint ports.
    ///
    /// Returns `None` if either port does not exist or the pins are not connected.
    ///
    /// # Panics
    ///
    /// Panics if both ports exist but either pin lies outside its port.
    pub fn edge_by_name(
        &self,
        model: ModelId,
        from_port: &str,
        from_pin: usize,
        to_port: &str,
        to_pin: usize,
    ) -> Option<EdgeId> {
        let from = self.port(model, from_port)?;
        let to = self.port(model, to_port)?;
        self.edge(model, from, from_pin, to, to_pin)
    }

    /// Returns the delay of kind `kind` on an edge.
    pub fn edge_delay(&self, model: ModelId, edge: EdgeId, kind: DelayKind) -> f64 {
        self.check_edge(model, edge);
        self.graphs[model].delays[edge][kind.index()]
    }

    /// Returns the source `(port, pin)` of an edge.
    pub fn edge_source(&self, model: ModelId, edge: EdgeId) -> (PortId, usize) {
        self.check_edge(model, edge);
        let graph = &self.graphs[model];
        (graph.src_ports[edge], graph.src_pins[edge])
    }

    /// Returns the sink `(port, pin)` of an edge.
    pub fn edge_sink(&self, model: ModelId, edge: EdgeId) -> (PortId, usize) {
        self.check_edge(model, edge);
        let graph = &self.graphs[model];
        (graph.sink_ports[edge], graph.sink_pins[edge])
    }

    /// Returns the edges ending at `port[pin]`.
    pub fn port_in_edges(&self, model: ModelId, port: PortId, pin: usize) -> &[EdgeId] {
        self.check_pin(model, port, pin);
        self.graphs[model]
            .fanin
            .get(&(port, pin))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the edges starting at `port[pin]`.
    pub fn port_out_edges(&self, model: ModelId, port: PortId, pin: usize) -> &[EdgeId] {
        self.check_pin(model, port, pin);
        self.graphs[model]
            .fanout
            .get(&(port, pin))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn check_pin(&self, model: ModelId, port: PortId, pin: usize) {
        self.check_port(model, port);
        assert!(
            self.valid_pin_id(model, port, pin),
            "pin {pin} is out of range for port '{}' of circuit model '{}'",
            self.ports[model].prefixes[port],
            self.models.names[model]
        );
    }

    fn check_edge(&self, model: ModelId, edge: EdgeId) {
        self.check_model(model);
        assert!(
            self.graphs[model].src_ports.contains(edge),
            "invalid timing edge handle {edge:?} for circuit model '{}'",
            self.models.names[model]
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ParseError;
    use crate::types::{ModelType, PortType};

    fn add_port(
        lib: &mut CircuitLibrary,
        model: ModelId,
        name: &str,
        ty: PortType,
        size: usize,
    ) -> PortId {
        let p = lib.add_model_port(model);
        lib.set_port_prefix(model, p, name);
        lib.set_port_type(model, p, ty);
        lib.set_port_size(model, p, size);
        p
    }

    /// A gate with inputs `a` (2 pins) and `sel` (1 pin) and output `out` (1 pin).
    fn gate(lib: &mut CircuitLibrary) -> (ModelId, PortId, PortId, PortId) {
        let m = lib.add_model();
        lib.set_model_type(m, ModelType::Gate);
        lib.set_model_name(m, "mux2");
        let a = add_port(lib, m, "a", PortType::Input, 2);
        let sel = add_port(lib, m, "sel", PortType::Input, 1);
        let out = add_port(lib, m, "out", PortType::Output, 1);
        (m, a, sel, out)
    }

    fn annotate(lib: &mut CircuitLibrary, m: ModelId, inputs: &str, outputs: &str, values: &str) {
        lib.add_delay_info(m, DelayKind::Rise);
        lib.set_delay_in_port_names(m, DelayKind::Rise, inputs);
        lib.set_delay_out_port_names(m, DelayKind::Rise, outputs);
        lib.set_delay_values(m, DelayKind::Rise, values);
    }

    #[test]
    fn arcs_connect_every_input_pin_to_every_output_pin() {
        let mut lib = CircuitLibrary::new();
        let (m, a, sel, out) = gate(&mut lib);
        lib.build_timing_graphs().unwrap();
        assert_eq!(lib.num_edges(m), 3);
        assert!(lib.edge(m, a, 0, out, 0).is_some());
        assert!(lib.edge(m, a, 1, out, 0).is_some());
        assert!(lib.edge(m, sel, 0, out, 0).is_some());
        assert_eq!(lib.port_in_edges(m, out, 0).len(), 3);
        assert_eq!(lib.port_out_edges(m, a, 1).len(), 1);
        assert!(lib.port_in_edges(m, a, 0).is_empty());
    }

    #[test]
    fn inout_port_has_no_self_arcs() {
        let mut lib = CircuitLibrary::new();
        let m = lib.add_model();
        lib.set_model_type(m, ModelType::IoPad);
        let pad = add_port(&mut lib, m, "pad", PortType::InOut, 2);
        let outpad = add_port(&mut lib, m, "outpad", PortType::Input, 1);
        let inpad = add_port(&mut lib, m, "inpad", PortType::Output, 1);
        lib.build_timing_graphs().unwrap();
        // pad -> inpad (2), outpad -> pad (2), outpad -> inpad (1)
        assert_eq!(lib.num_edges(m), 5);
        assert!(lib.edge(m, pad, 0, pad, 1).is_none());
        assert!(lib.edge(m, pad, 1, inpad, 0).is_some());
        assert!(lib.edge(m, outpad, 0, pad, 1).is_some());
    }

    #[test]
    fn edge_endpoints() {
        let mut lib = CircuitLibrary::new();
        let (m, a, _, out) = gate(&mut lib);
        lib.build_timing_graphs().unwrap();
        let e = lib.edge_by_name(m, "a", 1, "out", 0).unwrap();
        assert_eq!(lib.edge_source(m, e), (a, 1));
        assert_eq!(lib.edge_sink(m, e), (out, 0));
        assert_eq!(lib.edges(m).count(), 3);
        assert!(lib.valid_edge_id(m, e));
        assert_eq!(lib.edge_by_name(m, "missing", 0, "out", 0), None);
    }

    #[test]
    #[should_panic(expected = "pin 2 is out of range for port 'a' of circuit model 'mux2'")]
    fn edge_by_name_rejects_pin_outside_port() {
        let mut lib = CircuitLibrary::new();
        let (m, ..) = gate(&mut lib);
        lib.build_timing_graphs().unwrap();
        let _ = lib.edge_by_name(m, "a", 2, "out", 0);
    }

    #[test]
    fn delays_land_on_named_arcs() {
        let mut lib = CircuitLibrary::new();
        let (m, a, sel, out) = gate(&mut lib);
        annotate(&mut lib, m, "a", "out", "1.2 3.4");
        lib.build_timing_graphs().unwrap();
        let e0 = lib.edge(m, a, 0, out, 0).unwrap();
        let e1 = lib.edge(m, a, 1, out, 0).unwrap();
        let es = lib.edge(m, sel, 0, out, 0).unwrap();
        assert_eq!(lib.edge_delay(m, e0, DelayKind::Rise), 1.2);
        assert_eq!(lib.edge_delay(m, e1, DelayKind::Rise), 3.4);
        assert_eq!(lib.edge_delay(m, es, DelayKind::Rise), 0.0);
        assert_eq!(lib.edge_delay(m, e0, DelayKind::Fall), 0.0);
    }

    #[test]
    fn single_pin_references() {
        let mut lib = CircuitLibrary::new();
        let (m, a, sel, out) = gate(&mut lib);
        annotate(&mut lib, m, "sel[0:0] a[1]", "out[0]", "5e-11, 6e-11");
        lib.build_timing_graphs().unwrap();
        let es = lib.edge(m, sel, 0, out, 0).unwrap();
        let e1 = lib.edge(m, a, 1, out, 0).unwrap();
        assert_eq!(lib.edge_delay(m, es, DelayKind::Rise), 5e-11);
        assert_eq!(lib.edge_delay(m, e1, DelayKind::Rise), 6e-11);
    }

    #[test]
    fn rebuild_resets_graph() {
        let mut lib = CircuitLibrary::new();
        let (m, ..) = gate(&mut lib);
        lib.build_timing_graphs().unwrap();
        lib.build_timing_graphs().unwrap();
        assert_eq!(lib.num_edges(m), 3);
        lib.invalidate_model_timing_graph(m);
        assert_eq!(lib.num_edges(m), 0);
    }

    #[test]
    fn redeclared_delay_kind_keeps_record() {
        let mut lib = CircuitLibrary::new();
        let (m, ..) = gate(&mut lib);
        annotate(&mut lib, m, "a", "out", "1 2");
        lib.add_delay_info(m, DelayKind::Rise);
        lib.add_delay_info(m, DelayKind::Fall);
        let records = lib.delay_info(m);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, DelayKind::Rise);
        assert_eq!(records[0].values, "1 2");
        assert_eq!(records[1].kind, DelayKind::Fall);
    }

    #[test]
    #[should_panic(expected = "no Fall delay is declared on circuit model 'mux2'")]
    fn undeclared_delay_kind_panics() {
        let mut lib = CircuitLibrary::new();
        let (m, ..) = gate(&mut lib);
        lib.set_delay_values(m, DelayKind::Fall, "1");
    }

    #[test]
    fn dimension_mismatch() {
        let mut lib = CircuitLibrary::new();
        let (m, ..) = gate(&mut lib);
        annotate(&mut lib, m, "a", "out", "1 2 3");
        let err = lib.build_timing_graphs().unwrap_err();
        assert!(matches!(
            err,
            CircuitError::DelayDimension {
                rows: 1,
                cols: 3,
                expected_rows: 1,
                expected_cols: 2,
                ..
            }
        ));
    }

    #[test]
    fn wrong_direction() {
        let mut lib = CircuitLibrary::new();
        let (m, ..) = gate(&mut lib);
        annotate(&mut lib, m, "out", "a", "1 2");
        let err = lib.build_timing_graphs().unwrap_err();
        assert!(matches!(
            err,
            CircuitError::PortDirection { expected: "input", ref port, .. } if port == "out"
        ));
    }

    #[test]
    fn unknown_port() {
        let mut lib = CircuitLibrary::new();
        let (m, ..) = gate(&mut lib);
        annotate(&mut lib, m, "b", "out", "1");
        let err = lib.build_timing_graphs().unwrap_err();
        assert!(matches!(err, CircuitError::UnknownPort { ref port, .. } if port == "b"));
    }

    #[test]
    fn wide_range_rejected() {
        let mut lib = CircuitLibrary::new();
        let (m, ..) = gate(&mut lib);
        annotate(&mut lib, m, "a[1:0]", "out", "1 2");
        let err = lib.build_timing_graphs().unwrap_err();
        assert!(matches!(err, CircuitError::PortWidth { msb: 1, lsb: 0, .. }));
    }

    #[test]
    fn pin_out_of_range() {
        let mut lib = CircuitLibrary::new();
        let (m, ..) = gate(&mut lib);
        annotate(&mut lib, m, "a[2]", "out", "1");
        let err = lib.build_timing_graphs().unwrap_err();
        assert!(matches!(
            err,
            CircuitError::PinOutOfRange { pin: 2, width: 2, .. }
        ));
    }

    #[test]
    fn missing_edge() {
        let mut lib = CircuitLibrary::new();
        let m = lib.add_model();
        lib.set_model_type(m, ModelType::IoPad);
        lib.set_model_name(m, "iopad");
        add_port(&mut lib, m, "pad", PortType::InOut, 1);
        annotate(&mut lib, m, "pad", "pad", "1");
        let err = lib.build_timing_graphs().unwrap_err();
        assert!(matches!(
            err,
            CircuitError::MissingEdge { ref from_port, from_pin: 0, ref to_port, to_pin: 0, .. }
                if from_port == "pad" && to_port == "pad"
        ));
    }

    #[test]
    fn malformed_reference() {
        let mut lib = CircuitLibrary::new();
        let (m, ..) = gate(&mut lib);
        annotate(&mut lib, m, "a[", "out", "1");
        let err = lib.build_timing_graphs().unwrap_err();
        assert!(matches!(
            err,
            CircuitError::Parse { source: ParseError::PortReference(_), .. }
        ));
    }

    #[test]
    fn empty_annotation_is_accepted() {
        let mut lib = CircuitLibrary::new();
        let (m, ..) = gate(&mut lib);
        annotate(&mut lib, m, "", "", "");
        lib.build_timing_graphs().unwrap();
        assert_eq!(lib.num_edges(m), 3);
    }

    #[test]
    #[should_panic(expected = "invalid timing edge handle")]
    fn stale_edge_handle_panics() {
        let mut lib = CircuitLibrary::new();
        let (m, ..) = gate(&mut lib);
        lib.build_timing_graphs().unwrap();
        let e = lib.edges(m).last().unwrap();
        lib.invalidate_model_timing_graph(m);
        let _ = lib.edge_delay(m, e, DelayKind::Rise);
    }
}
