//! Error types for building and validating a circuit library.
//!
//! Misuse of the API itself (an invalid handle, reading a MUX parameter off a wire
//! model) is a bug in the caller and panics. The errors here cover violations that
//! come from the library's *content*: names that do not resolve, delay annotations
//! that disagree with the model's ports, and similar. They are fatal for the run,
//! but are surfaced as values so the driver can report them before aborting.

use crate::parse::ParseError;
use crate::types::{DelayKind, ModelType};

/// The result type for fallible circuit library operations.
pub type CircuitResult<T> = Result<T, CircuitError>;

/// A contract violation found in the content of a circuit library.
#[derive(Debug, thiserror::Error)]
pub enum CircuitError {
    /// Two or more models share one name.
    #[error("circuit model name '{0}' is defined more than once")]
    DuplicateModelName(String),

    /// A name reference did not resolve to any model.
    #[error("model '{owner}' references unknown circuit model '{name}' ({field})")]
    UnresolvedModel {
        /// The model carrying the reference.
        owner: String,
        /// Which attribute carries the reference.
        field: &'static str,
        /// The name that failed to resolve.
        name: String,
    },

    /// Following pass-gate links from a model revisits a model.
    #[error("pass-gate links starting at model '{0}' form a cycle")]
    PassGateCycle(String),

    /// A model neither is a pass-gate nor links to one.
    #[error("model '{0}' has no pass-gate logic")]
    MissingPassGate(String),

    /// A pass-gate model links to another pass-gate model.
    #[error("pass-gate model '{model}' cannot be built from pass-gate model '{target}'")]
    NestedPassGate {
        /// The pass-gate model carrying the link.
        model: String,
        /// The linked model.
        target: String,
    },

    /// Pass-gate links are nested deeper than the configured bound.
    #[error("pass-gate links starting at model '{model}' exceed the maximum depth of {max_depth}")]
    PassGateDepthExceeded {
        /// The model where resolution started.
        model: String,
        /// The configured bound.
        max_depth: usize,
    },

    /// A textual port specification or delay matrix could not be parsed.
    #[error("model '{model}': {source}")]
    Parse {
        /// The model owning the delay annotation.
        model: String,
        /// The underlying parse failure.
        #[source]
        source: ParseError,
    },

    /// A delay annotation names a port the model does not have.
    #[error("model '{model}' has no port named '{port}'")]
    UnknownPort {
        /// The model owning the delay annotation.
        model: String,
        /// The missing port name.
        port: String,
    },

    /// A delay annotation selects more than one pin with an explicit range.
    #[error("port reference '{port}[{msb}:{lsb}]' on model '{model}' must select exactly one pin")]
    PortWidth {
        /// The model owning the delay annotation.
        model: String,
        /// The port name.
        port: String,
        /// Most significant pin of the range.
        msb: usize,
        /// Least significant pin of the range.
        lsb: usize,
    },

    /// A delay annotation selects a pin beyond the port's width.
    #[error("pin {pin} is out of range for port '{port}' (width {width}) on model '{model}'")]
    PinOutOfRange {
        /// The model owning the delay annotation.
        model: String,
        /// The port name.
        port: String,
        /// The requested pin.
        pin: usize,
        /// The declared width of the port.
        width: usize,
    },

    /// A delay annotation uses a port on the wrong side of the timing arc.
    #[error("port '{port}' on model '{model}' is not an {expected} port")]
    PortDirection {
        /// The model owning the delay annotation.
        model: String,
        /// The port name.
        port: String,
        /// The direction the port should have had (`input` or `output`).
        expected: &'static str,
    },

    /// A delay matrix does not match the resolved input/output pin lists.
    #[error(
        "{kind:?} delay matrix on model '{model}' is {rows}x{cols}, expected {expected_rows}x{expected_cols}"
    )]
    DelayDimension {
        /// The model owning the delay annotation.
        model: String,
        /// The delay kind of the annotation.
        kind: DelayKind,
        /// Rows in the matrix.
        rows: usize,
        /// Columns in the matrix.
        cols: usize,
        /// Resolved output pins.
        expected_rows: usize,
        /// Resolved input pins.
        expected_cols: usize,
    },

    /// A delay value addresses a pin pair with no synthesized timing edge.
    #[error("model '{model}' has no timing edge {from_port}[{from_pin}] -> {to_port}[{to_pin}]")]
    MissingEdge {
        /// The model owning the delay annotation.
        model: String,
        /// Source port name.
        from_port: String,
        /// Source pin.
        from_pin: usize,
        /// Sink port name.
        to_port: String,
        /// Sink pin.
        to_pin: usize,
    },

    /// No model of a populated type is flagged as the default.
    #[error("no circuit model of type {0} is marked as default")]
    MissingDefaultModel(ModelType),
}
