//! Integration tests for the full library lifecycle.
//!
//! A small but complete architecture is constructed the way the architecture reader
//! does it (models, attributes and ports in file order, names referring forward),
//! then linked, indexed, timed and queried.

use circuit_config::load_config;
use circuit_lib::{
    find_circuit_regular_sram_ports, find_circuit_sram_models, BufferKind, BufferSlot,
    CircuitError, CircuitLibrary, DelayKind, DesignTech, ModelId, ModelType, MuxStructure,
    PassGateKind, PortId, PortType, SramOrganization, WireKind,
};
use std::fs;
use tempfile::TempDir;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ---------------------------------------------------------------------------
// Helper: architecture construction
// ---------------------------------------------------------------------------

fn add_model(lib: &mut CircuitLibrary, ty: ModelType, name: &str) -> ModelId {
    let m = lib.add_model();
    lib.set_model_type(m, ty);
    lib.set_model_name(m, name);
    lib.set_model_prefix(m, name);
    lib.set_model_design_tech_type(m, DesignTech::Cmos);
    m
}

fn add_port(lib: &mut CircuitLibrary, m: ModelId, name: &str, ty: PortType, size: usize) -> PortId {
    let p = lib.add_model_port(m);
    lib.set_port_prefix(m, p, name);
    lib.set_port_type(m, p, ty);
    lib.set_port_size(m, p, size);
    p
}

/// Builds the architecture: a MUX and a LUT that reference buffers, a pass-gate
/// and a memory cell defined after them.
fn populate(lib: &mut CircuitLibrary) {
    let mux = add_model(lib, ModelType::Mux, "mux_tree");
    lib.set_model_is_default(mux, true);
    lib.set_model_buffer(mux, BufferSlot::Input, true, "INVTX1");
    lib.set_model_buffer(mux, BufferSlot::Output, true, "INVTX1");
    lib.set_model_pass_gate_logic(mux, "TGATE");
    lib.set_mux_structure(mux, MuxStructure::Tree);
    add_port(lib, mux, "in", PortType::Input, 4);
    add_port(lib, mux, "out", PortType::Output, 1);
    let sram = add_port(lib, mux, "sram", PortType::Sram, 2);
    lib.set_port_tri_state_model_name(mux, sram, "sram6T");
    lib.set_port_sram_orgz(mux, sram, SramOrganization::ScanChain);
    lib.add_delay_info(mux, DelayKind::Rise);
    lib.set_delay_in_port_names(mux, DelayKind::Rise, "in");
    lib.set_delay_out_port_names(mux, DelayKind::Rise, "out");
    lib.set_delay_values(mux, DelayKind::Rise, "10e-12 11e-12 12e-12 13e-12");
    lib.add_delay_info(mux, DelayKind::Fall);
    lib.set_delay_in_port_names(mux, DelayKind::Fall, "in[3]");
    lib.set_delay_out_port_names(mux, DelayKind::Fall, "out");
    lib.set_delay_values(mux, DelayKind::Fall, "20e-12");

    let lut = add_model(lib, ModelType::Lut, "lut4");
    lib.set_model_buffer(lut, BufferSlot::LutInputBuffer, true, "buf4");
    lib.set_model_buffer(lut, BufferSlot::LutInputInverter, true, "INVTX1");
    lib.set_model_pass_gate_logic(lut, "TGATE");
    lib.set_mux_const_input_value(lut, Some(0));
    add_port(lib, lut, "in", PortType::Input, 4);
    add_port(lib, lut, "out", PortType::Output, 1);
    let cfg = add_port(lib, lut, "sram", PortType::Sram, 16);
    lib.set_port_tri_state_model_name(lut, cfg, "sram6T");
    let mode = add_port(lib, lut, "mode", PortType::Sram, 1);
    lib.set_port_is_mode_select(lut, mode, true);
    lib.set_port_tri_state_model_name(lut, mode, "sram6T");

    let inv = add_model(lib, ModelType::InvBuf, "INVTX1");
    lib.set_model_is_default(inv, true);
    lib.set_buffer_type(inv, BufferKind::Inv);
    lib.set_buffer_size(inv, 1.0);
    add_port(lib, inv, "in", PortType::Input, 1);
    add_port(lib, inv, "out", PortType::Output, 1);

    let buf = add_model(lib, ModelType::InvBuf, "buf4");
    lib.set_buffer_type(buf, BufferKind::Buf);
    lib.set_buffer_size(buf, 1.0);
    lib.set_buffer_num_levels(buf, 2);
    lib.set_buffer_f_per_stage(buf, 4);
    add_port(lib, buf, "in", PortType::Input, 1);
    add_port(lib, buf, "out", PortType::Output, 1);

    let tg = add_model(lib, ModelType::PassGate, "TGATE");
    lib.set_model_is_default(tg, true);
    lib.set_pass_gate_logic_type(tg, PassGateKind::TransmissionGate);
    lib.set_pass_gate_logic_nmos_size(tg, 1.0);
    lib.set_pass_gate_logic_pmos_size(tg, 2.0);
    add_port(lib, tg, "in", PortType::Input, 1);
    add_port(lib, tg, "sel", PortType::Input, 2);
    add_port(lib, tg, "out", PortType::Output, 1);

    let cell = add_model(lib, ModelType::Sram, "sram6T");
    lib.set_model_is_default(cell, true);
    add_port(lib, cell, "in", PortType::Input, 1);
    add_port(lib, cell, "out", PortType::Output, 2);

    let wire = add_model(lib, ModelType::ChanWire, "chan_segment");
    lib.set_model_is_default(wire, true);
    lib.set_wire_type(wire, WireKind::Pi);
    lib.set_wire_r(wire, 101.0);
    lib.set_wire_c(wire, 22.5e-15);
    lib.set_wire_num_levels(wire, 1);
    add_port(lib, wire, "in", PortType::Input, 1);
    add_port(lib, wire, "out", PortType::Output, 1);
}

fn built_library() -> CircuitLibrary {
    init_logger();
    let mut lib = CircuitLibrary::new();
    populate(&mut lib);
    lib.build().unwrap();
    lib
}

fn model(lib: &CircuitLibrary, name: &str) -> ModelId {
    lib.model(name).unwrap()
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn full_build_links_and_validates() {
    let lib = built_library();
    lib.validate().unwrap();

    let mux = model(&lib, "mux_tree");
    let lut = model(&lib, "lut4");
    let inv = model(&lib, "INVTX1");
    let buf = model(&lib, "buf4");
    assert_eq!(lib.input_buffer_model(mux), Some(inv));
    assert_eq!(lib.output_buffer_model(mux), Some(inv));
    assert_eq!(lib.lut_input_buffer_model(lut), Some(buf));
    assert_eq!(lib.lut_input_inverter_model(lut), Some(inv));
    assert_eq!(lib.pass_gate_logic_model(lut), Some(model(&lib, "TGATE")));
    assert_eq!(
        lib.pass_gate_logic_type(mux).unwrap(),
        PassGateKind::TransmissionGate
    );
}

#[test]
fn build_is_repeatable() {
    let mut lib = built_library();
    let mux = model(&lib, "mux_tree");
    let before: Vec<_> = lib.models().map(|m| lib.input_buffer_model(m)).collect();
    let edges = lib.num_edges(mux);
    lib.build().unwrap();
    let after: Vec<_> = lib.models().map(|m| lib.input_buffer_model(m)).collect();
    assert_eq!(before, after);
    assert_eq!(lib.num_edges(mux), edges);
}

#[test]
fn config_from_disk_drives_strict_linking() {
    init_logger();
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("circuit_lib.toml"),
        "[library]\nstrict_links = true\npass_gate_max_depth = 4\n",
    )
    .unwrap();
    let config = load_config(dir.path()).unwrap();

    let mut lib = CircuitLibrary::with_config(&config);
    populate(&mut lib);
    lib.build().unwrap();

    let m = add_model(&mut lib, ModelType::Mux, "mux_dangling");
    lib.set_model_buffer(m, BufferSlot::Input, true, "INVTX9");
    let err = lib.build().unwrap_err();
    assert!(matches!(
        err,
        CircuitError::UnresolvedModel { ref owner, ref name, .. }
            if owner == "mux_dangling" && name == "INVTX9"
    ));
}

// ---------------------------------------------------------------------------
// Port directions
// ---------------------------------------------------------------------------

#[test]
fn port_direction_is_exclusive_except_for_inout() {
    let mut lib = built_library();
    let pad = add_model(&mut lib, ModelType::IoPad, "iopad");
    add_port(&mut lib, pad, "outpad", PortType::Input, 1);
    add_port(&mut lib, pad, "pad", PortType::InOut, 1);
    add_port(&mut lib, pad, "inpad", PortType::Output, 1);

    for m in lib.models() {
        for p in lib.ports(m) {
            let (is_in, is_out) = (lib.is_input_port(m, p), lib.is_output_port(m, p));
            if lib.port_type(m, p) == Some(PortType::InOut) {
                assert!(is_in && is_out);
            } else {
                assert_ne!(is_in, is_out);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Timing graphs
// ---------------------------------------------------------------------------

#[test]
fn edge_count_is_input_pins_times_output_pins() {
    let lib = built_library();
    for m in lib.models() {
        let mut expected = 0;
        for from in lib.input_ports(m) {
            for to in lib.output_ports(m) {
                if from != to {
                    expected += lib.port_size(m, from) * lib.port_size(m, to);
                }
            }
        }
        assert_eq!(lib.num_edges(m), expected, "{}", lib.model_name(m));

        let mut seen = std::collections::HashSet::new();
        for e in lib.edges(m) {
            assert!(seen.insert((lib.edge_source(m, e), lib.edge_sink(m, e))));
        }
    }
}

#[test]
fn mux_edges_include_config_ports() {
    let lib = built_library();
    let mux = model(&lib, "mux_tree");
    // in (4) + sram (2) pins, all driving out (1)
    assert_eq!(lib.num_edges(mux), 6);
    let out = lib.port(mux, "out").unwrap();
    assert_eq!(lib.port_in_edges(mux, out, 0).len(), 6);
}

#[test]
fn delays_are_annotated_per_kind() {
    let lib = built_library();
    let mux = model(&lib, "mux_tree");
    for (pin, rise) in [10e-12, 11e-12, 12e-12, 13e-12].into_iter().enumerate() {
        let e = lib.edge_by_name(mux, "in", pin, "out", 0).unwrap();
        assert_eq!(lib.edge_delay(mux, e, DelayKind::Rise), rise);
        let fall = if pin == 3 { 20e-12 } else { 0.0 };
        assert_eq!(lib.edge_delay(mux, e, DelayKind::Fall), fall);
    }
    let e = lib.edge_by_name(mux, "sram", 0, "out", 0).unwrap();
    assert_eq!(lib.edge_delay(mux, e, DelayKind::Rise), 0.0);
}

#[test]
fn two_pin_round_trip() {
    init_logger();
    let mut lib = CircuitLibrary::new();
    let m = add_model(&mut lib, ModelType::Gate, "and2");
    let a = add_port(&mut lib, m, "a", PortType::Input, 2);
    let b = add_port(&mut lib, m, "b", PortType::Output, 1);
    lib.add_delay_info(m, DelayKind::Fall);
    lib.set_delay_in_port_names(m, DelayKind::Fall, "a");
    lib.set_delay_out_port_names(m, DelayKind::Fall, "b");
    lib.set_delay_values(m, DelayKind::Fall, "1.2 3.4");
    lib.build().unwrap();

    let e0 = lib.edge(m, a, 0, b, 0).unwrap();
    let e1 = lib.edge(m, a, 1, b, 0).unwrap();
    assert_eq!(lib.edge_delay(m, e0, DelayKind::Fall), 1.2);
    assert_eq!(lib.edge_delay(m, e1, DelayKind::Fall), 3.4);
    assert_eq!(lib.edge_delay(m, e0, DelayKind::Rise), 0.0);
}

#[test]
fn bad_annotation_fails_the_build() {
    let mut lib = built_library();
    let wire = model(&lib, "chan_segment");
    lib.add_delay_info(wire, DelayKind::Rise);
    lib.set_delay_in_port_names(wire, DelayKind::Rise, "in");
    lib.set_delay_out_port_names(wire, DelayKind::Rise, "out");
    lib.set_delay_values(wire, DelayKind::Rise, "1\n2");
    assert!(matches!(
        lib.build(),
        Err(CircuitError::DelayDimension { rows: 2, expected_rows: 1, .. })
    ));
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[test]
fn default_model_promotion() {
    init_logger();
    let mut lib = CircuitLibrary::new();
    let a = add_model(&mut lib, ModelType::Mux, "mux_a");
    let b = add_model(&mut lib, ModelType::Mux, "mux_b");
    lib.set_model_is_default(b, true);
    lib.build().unwrap();
    assert_eq!(lib.default_model(ModelType::Mux), Some(b));
    assert_eq!(lib.models_by_type(ModelType::Mux), &[b, a]);
}

#[test]
fn retyped_model_moves_bucket() {
    let mut lib = built_library();
    let wire = model(&lib, "chan_segment");
    lib.set_model_type(wire, ModelType::Wire);
    assert!(lib.models_by_type(ModelType::ChanWire).is_empty());
    assert_eq!(lib.models_by_type(ModelType::Wire), &[wire]);
    assert_eq!(lib.default_model(ModelType::Wire), Some(wire));
}

#[test]
fn default_models_per_type() {
    let lib = built_library();
    assert_eq!(lib.default_model(ModelType::InvBuf), Some(model(&lib, "INVTX1")));
    assert_eq!(lib.default_model(ModelType::Lut), Some(model(&lib, "lut4")));
    assert_eq!(lib.default_model(ModelType::Ff), None);
}

// ---------------------------------------------------------------------------
// Lookups and helpers
// ---------------------------------------------------------------------------

#[test]
fn name_lookup_absence_is_none() {
    let lib = built_library();
    assert_eq!(lib.model("no_such_model"), None);
    let mux = model(&lib, "mux_tree");
    assert_eq!(lib.port(mux, "no_such_port"), None);
}

#[test]
#[should_panic(expected = "defined more than once")]
fn name_lookup_ambiguity_panics() {
    let mut lib = built_library();
    add_model(&mut lib, ModelType::Lut, "lut4");
    let _ = lib.model("lut4");
}

#[test]
fn constant_input_policy() {
    let mut lib = built_library();
    let lut = model(&lib, "lut4");
    let mux = model(&lib, "mux_tree");
    assert!(lib.mux_add_const_input(lut));
    assert_eq!(lib.mux_const_input_value(lut), Some(0));
    assert!(!lib.mux_add_const_input(mux));
    lib.set_mux_const_input_value(mux, Some(1));
    assert_eq!(lib.mux_const_input_value(mux), Some(1));
}

#[test]
#[should_panic(expected = "invalid constant input value")]
fn constant_input_out_of_range_panics() {
    let mut lib = built_library();
    let mux = model(&lib, "mux_tree");
    lib.set_mux_const_input_value(mux, Some(3));
}

#[test]
fn sram_helpers() {
    let lib = built_library();
    let lut = model(&lib, "lut4");
    let cell = model(&lib, "sram6T");
    assert_eq!(find_circuit_sram_models(&lib, lut), vec![cell]);
    let regular = find_circuit_regular_sram_ports(&lib, lut);
    assert_eq!(regular, vec![lib.port(lut, "sram").unwrap()]);

    let mux = model(&lib, "mux_tree");
    let sram = lib.port(mux, "sram").unwrap();
    assert_eq!(lib.port_sram_orgz(mux, sram), Some(SramOrganization::ScanChain));
}

#[test]
fn attribute_queries_after_build() {
    let lib = built_library();
    let buf = model(&lib, "buf4");
    assert_eq!(lib.buffer_type(buf), Some(BufferKind::Buf));
    assert_eq!(lib.buffer_num_levels(buf), Some(2));
    let wire = model(&lib, "chan_segment");
    assert_eq!(lib.wire_r(wire), Some(101.0));
    assert_eq!(lib.model_prefix(wire), "chan_segment");
    assert_eq!(lib.num_models(), 7);
    assert_eq!(lib.num_ports(model(&lib, "lut4")), 4);
    assert_eq!(
        lib.num_ports_by_type(model(&lib, "lut4"), PortType::Sram, true),
        2
    );
}

#[test]
fn handles_serialize_as_raw_indices() {
    let lib = built_library();
    let lut = model(&lib, "lut4");
    assert_eq!(serde_json::to_string(&lut).unwrap(), "1");
    let info = &lib.delay_info(model(&lib, "mux_tree"))[1];
    let json = serde_json::to_string(info).unwrap();
    assert!(json.contains("\"kind\":\"Fall\""));
}
