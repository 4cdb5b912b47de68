//! Closed vocabularies for circuit models, ports, and timing annotations.
//!
//! Every enum here is a fixed, closed set. Attributes that have not been set yet are
//! stored as `None` rather than as an extra "unset" variant, so an unset value can
//! never be mistaken for a real one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of electrical primitive a circuit model describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelType {
    /// A routing-channel wire segment.
    ChanWire,
    /// A local wire inside a block.
    Wire,
    /// A routing multiplexer.
    Mux,
    /// A look-up table.
    Lut,
    /// A flip-flop.
    Ff,
    /// A configuration memory cell.
    Sram,
    /// A hard logic block (adder, multiplier, ...).
    HardLogic,
    /// A configuration-chain flip-flop.
    Ccff,
    /// An I/O pad.
    IoPad,
    /// A buffer or inverter.
    InvBuf,
    /// A pass-gate (transmission gate or pass transistor).
    PassGate,
    /// A standard logic gate.
    Gate,
}

impl ModelType {
    /// Number of model types.
    pub const COUNT: usize = 12;

    /// All model types in declaration order.
    pub const ALL: [ModelType; Self::COUNT] = [
        ModelType::ChanWire,
        ModelType::Wire,
        ModelType::Mux,
        ModelType::Lut,
        ModelType::Ff,
        ModelType::Sram,
        ModelType::HardLogic,
        ModelType::Ccff,
        ModelType::IoPad,
        ModelType::InvBuf,
        ModelType::PassGate,
        ModelType::Gate,
    ];

    /// Returns the dense index of this type, used to address classification buckets.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the canonical upper-case name used in architecture descriptions.
    pub fn name(self) -> &'static str {
        match self {
            ModelType::ChanWire => "CHAN_WIRE",
            ModelType::Wire => "WIRE",
            ModelType::Mux => "MUX",
            ModelType::Lut => "LUT",
            ModelType::Ff => "FF",
            ModelType::Sram => "SRAM",
            ModelType::HardLogic => "HARD_LOGIC",
            ModelType::Ccff => "CCFF",
            ModelType::IoPad => "IOPAD",
            ModelType::InvBuf => "INV_BUF",
            ModelType::PassGate => "PASSGATE",
            ModelType::Gate => "GATE",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The role of a port on a circuit model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    /// A data input.
    Input,
    /// A data output.
    Output,
    /// A bidirectional port.
    InOut,
    /// A clock input.
    Clock,
    /// A configuration memory port.
    Sram,
    /// A memory-bank bit line.
    Bl,
    /// A memory-bank inverted bit line.
    Blb,
    /// A memory-bank word line.
    Wl,
    /// A memory-bank inverted word line.
    Wlb,
}

impl PortType {
    /// Number of port types.
    pub const COUNT: usize = 9;

    /// All port types in declaration order.
    pub const ALL: [PortType; Self::COUNT] = [
        PortType::Input,
        PortType::Output,
        PortType::InOut,
        PortType::Clock,
        PortType::Sram,
        PortType::Bl,
        PortType::Blb,
        PortType::Wl,
        PortType::Wlb,
    ];

    /// Returns the dense index of this type, used to address classification buckets.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns `true` if a port of this type drives signals into the model.
    ///
    /// Everything except `OUTPUT` is an input; `INOUT` is both an input and an output.
    pub fn is_input(self) -> bool {
        self != PortType::Output
    }

    /// Returns `true` if a port of this type carries signals out of the model.
    pub fn is_output(self) -> bool {
        matches!(self, PortType::Output | PortType::InOut)
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PortType::Input => "INPUT",
            PortType::Output => "OUTPUT",
            PortType::InOut => "INOUT",
            PortType::Clock => "CLOCK",
            PortType::Sram => "SRAM",
            PortType::Bl => "BL",
            PortType::Blb => "BLB",
            PortType::Wl => "WL",
            PortType::Wlb => "WLB",
        };
        f.write_str(name)
    }
}

/// The device technology a model is built in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DesignTech {
    /// Standard CMOS transistors.
    Cmos,
    /// Resistive random-access memory.
    Rram,
}

/// Whether an `INV_BUF` model inverts its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BufferKind {
    /// An inverter.
    Inv,
    /// A non-inverting buffer.
    Buf,
}

/// The transistor structure of a pass-gate model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassGateKind {
    /// A complementary NMOS/PMOS transmission gate.
    TransmissionGate,
    /// A single pass transistor.
    PassTransistor,
}

/// The internal topology of a multiplexer (or the multiplexer inside a LUT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MuxStructure {
    /// A binary tree of 2:1 stages.
    Tree,
    /// A single wide stage.
    OneLevel,
    /// A fixed number of stages.
    MultiLevel,
    /// A full crossbar.
    Crossbar,
}

/// The boolean function of a `GATE` model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// Logical AND.
    And,
    /// Logical OR.
    Or,
    /// A 2:1 multiplexer gate.
    Mux2,
}

/// The RC model used to characterize a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireKind {
    /// A pi-model (C/2 - R - C/2) segment.
    Pi,
    /// A T-model (R/2 - C - R/2) segment.
    T,
}

/// How configuration memory cells attached to a port are organized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SramOrganization {
    /// Each cell is driven directly.
    Standalone,
    /// Cells are chained into a scan chain.
    ScanChain,
    /// Cells are addressed through bit lines and word lines.
    MemoryBank,
    /// Cells are addressed through a local decoder.
    LocalEncoder,
}

/// A category of timing value carried by every timing edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DelayKind {
    /// Rising-transition delay.
    Rise,
    /// Falling-transition delay.
    Fall,
}

impl DelayKind {
    /// Number of delay kinds; the size of every edge's delay array.
    pub const COUNT: usize = 2;

    /// All delay kinds in declaration order.
    pub const ALL: [DelayKind; Self::COUNT] = [DelayKind::Rise, DelayKind::Fall];

    /// Returns the slot of this kind in an edge's delay array.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A buffer position on a circuit model.
///
/// The three `Lut*` slots only exist on LUT models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BufferSlot {
    /// Buffers on the model's inputs.
    Input,
    /// Buffers on the model's outputs.
    Output,
    /// Buffers on the LUT's data inputs.
    LutInputBuffer,
    /// Inverters on the LUT's data inputs.
    LutInputInverter,
    /// Buffers between intermediate stages of the LUT's multiplexer.
    LutInterBuffer,
}

impl BufferSlot {
    /// Number of buffer slots per model.
    pub const COUNT: usize = 5;

    /// All buffer slots in declaration order.
    pub const ALL: [BufferSlot; Self::COUNT] = [
        BufferSlot::Input,
        BufferSlot::Output,
        BufferSlot::LutInputBuffer,
        BufferSlot::LutInputInverter,
        BufferSlot::LutInterBuffer,
    ];

    /// Returns the dense index of this slot.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns `true` for slots that are only meaningful on LUT models.
    pub fn is_lut_only(self) -> bool {
        matches!(
            self,
            BufferSlot::LutInputBuffer | BufferSlot::LutInputInverter | BufferSlot::LutInterBuffer
        )
    }
}
