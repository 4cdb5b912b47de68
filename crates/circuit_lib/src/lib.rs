//! A build-once, query-many store of circuit models for FPGA fabric generation.
//!
//! A [`CircuitLibrary`] describes the electrical building blocks of a fabric (LUTs,
//! multiplexers, wires, buffers, pass-gates, memory cells, logic gates) together with
//! their ports and pin-to-pin timing arcs. The architecture reader fills it through
//! the mutation API, [`CircuitLibrary::build`] links and indexes it, and netlist
//! generators then read it.
//!
//! ```
//! use circuit_lib::{CircuitLibrary, DelayKind, ModelType, PortType};
//!
//! let mut lib = CircuitLibrary::new();
//! let mux = lib.add_model();
//! lib.set_model_type(mux, ModelType::Mux);
//! lib.set_model_name(mux, "mux2");
//! for (name, ty, size) in [("in", PortType::Input, 2), ("out", PortType::Output, 1)] {
//!     let port = lib.add_model_port(mux);
//!     lib.set_port_prefix(mux, port, name);
//!     lib.set_port_type(mux, port, ty);
//!     lib.set_port_size(mux, port, size);
//! }
//! lib.add_delay_info(mux, DelayKind::Rise);
//! lib.set_delay_in_port_names(mux, DelayKind::Rise, "in");
//! lib.set_delay_out_port_names(mux, DelayKind::Rise, "out");
//! lib.set_delay_values(mux, DelayKind::Rise, "1e-10 2e-10");
//! lib.build()?;
//!
//! let edge = lib.edge_by_name(mux, "in", 1, "out", 0).unwrap();
//! assert_eq!(lib.edge_delay(mux, edge, DelayKind::Rise), 2e-10);
//! # Ok::<(), circuit_lib::CircuitError>(())
//! ```

#![warn(missing_docs)]

pub mod column;
pub mod error;
pub mod ids;
pub mod library;
pub mod parse;
pub mod types;
pub mod utils;

pub use error::{CircuitError, CircuitResult};
pub use ids::{EdgeId, ModelId, PortId};
pub use library::{BufferSpec, CircuitLibrary, DelayInfo, RramParams};
pub use parse::{parse_delay_matrix, parse_port_refs, DelayMatrix, ParseError, PortRef};
pub use types::*;
pub use utils::{find_circuit_regular_sram_ports, find_circuit_sram_models};
