//! Node types for the dataflow graph.
//!
//! Each node has a [`NodeId`], a [`NodeKind`] drawn from a closed set, its
//! declared input/output ports and a firing latency. Kind-specific
//! parameters (twiddle `N`, `k`) live inside the kind variant.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use core::borrow::Borrow;
use core::fmt;

use crate::complex::Twiddle;
use crate::time::Time;

/// Name of a node input or output port.
pub type PortId = String;

/// Port on which a sink reports the value it observed.
///
/// Sinks declare no output ports, so nothing downstream can consume this;
/// it exists for observers.
pub const SINK_OBSERVATION_PORT: &str = "out";

/// Unique identifier for a node in the graph.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(String);

impl NodeId {
    /// Creates an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The computation a node performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// External input. Never produces output from the executor; feed it with
    /// [`Scheduler::emit_from`](crate::Scheduler::emit_from).
    Source,
    /// Observation point: copies its single input to [`SINK_OBSERVATION_PORT`].
    Sink,
    /// `out = a + b`.
    Add,
    /// `out = a × b`.
    Mul,
    /// Decimation-in-frequency pair: `y0 = x0 + x1`, `y1 = (x0 − x1)·W`.
    /// Without a twiddle `W = 1`.
    Butterfly {
        /// Rotation applied to the difference branch.
        twiddle: Option<Twiddle>,
    },
    /// Radix-4 butterfly via 2×2 decomposition.
    Dft4,
    /// `out = in · W_N^k`.
    Twiddle(Twiddle),
}

impl NodeKind {
    /// Every kind name, in declaration order.
    pub const NAMES: [&'static str; 7] =
        ["source", "sink", "add", "mul", "butterfly", "dft4", "twiddle"];

    /// Lowercase kind name.
    pub const fn name(&self) -> &'static str {
        match self {
            NodeKind::Source => "source",
            NodeKind::Sink => "sink",
            NodeKind::Add => "add",
            NodeKind::Mul => "mul",
            NodeKind::Butterfly { .. } => "butterfly",
            NodeKind::Dft4 => "dft4",
            NodeKind::Twiddle(_) => "twiddle",
        }
    }

    /// Canonical input ports, in the order the executor reads them.
    pub const fn input_ports(&self) -> &'static [&'static str] {
        match self {
            NodeKind::Source => &[],
            NodeKind::Sink | NodeKind::Twiddle(_) => &["in"],
            NodeKind::Add | NodeKind::Mul => &["a", "b"],
            NodeKind::Butterfly { .. } => &["x0", "x1"],
            NodeKind::Dft4 => &["in0", "in1", "in2", "in3"],
        }
    }

    /// Canonical output ports, in the order the executor produces them.
    pub const fn output_ports(&self) -> &'static [&'static str] {
        match self {
            NodeKind::Sink => &[],
            NodeKind::Source | NodeKind::Add | NodeKind::Mul | NodeKind::Twiddle(_) => &["out"],
            NodeKind::Butterfly { .. } => &["y0", "y1"],
            NodeKind::Dft4 => &["out0", "out1", "out2", "out3"],
        }
    }

    /// Twiddle parameters, if the kind carries any.
    pub fn twiddle(&self) -> Option<Twiddle> {
        match self {
            NodeKind::Butterfly { twiddle } => *twiddle,
            NodeKind::Twiddle(tw) => Some(*tw),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static description of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSpec {
    /// Node identity.
    pub id: NodeId,
    /// What the node computes.
    pub kind: NodeKind,
    /// Declared input ports. The node fires only when every one holds a token.
    pub inputs: Vec<PortId>,
    /// Declared output ports.
    pub outputs: Vec<PortId>,
    /// Time the node stays busy after firing; outputs are released at
    /// `fire time + latency`.
    pub latency: Time,
}

impl NodeSpec {
    /// Creates a node with the kind's canonical ports.
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, latency: Time) -> Self {
        Self {
            id: id.into(),
            kind,
            inputs: kind.input_ports().iter().map(|p| String::from(*p)).collect(),
            outputs: kind.output_ports().iter().map(|p| String::from(*p)).collect(),
            latency,
        }
    }

    /// Source node with zero latency.
    pub fn source(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Source, 0.0)
    }

    /// Sink node with zero latency.
    pub fn sink(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Sink, 0.0)
    }

    /// Scalar/complex adder.
    pub fn add(id: impl Into<NodeId>, latency: Time) -> Self {
        Self::new(id, NodeKind::Add, latency)
    }

    /// Scalar/complex multiplier.
    pub fn mul(id: impl Into<NodeId>, latency: Time) -> Self {
        Self::new(id, NodeKind::Mul, latency)
    }

    /// DIF butterfly.
    pub fn butterfly(id: impl Into<NodeId>, twiddle: Option<Twiddle>, latency: Time) -> Self {
        Self::new(id, NodeKind::Butterfly { twiddle }, latency)
    }

    /// 4-point DFT block.
    pub fn dft4(id: impl Into<NodeId>, latency: Time) -> Self {
        Self::new(id, NodeKind::Dft4, latency)
    }

    /// Twiddle multiplier.
    pub fn twiddle(id: impl Into<NodeId>, twiddle: Twiddle, latency: Time) -> Self {
        Self::new(id, NodeKind::Twiddle(twiddle), latency)
    }

    /// Replaces the declared ports.
    pub fn with_ports<I, O>(mut self, inputs: I, outputs: O) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PortId>,
        O: IntoIterator,
        O::Item: Into<PortId>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true if `port` is a declared input.
    pub fn has_input(&self, port: &str) -> bool {
        self.inputs.iter().any(|p| p == port)
    }

    /// Returns true if `port` is a declared output.
    pub fn has_output(&self, port: &str) -> bool {
        self.outputs.iter().any(|p| p == port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_ports() {
        let b = NodeSpec::butterfly("b0", Twiddle::new(2, 0), 1.0);
        assert_eq!(b.inputs, ["x0", "x1"]);
        assert_eq!(b.outputs, ["y0", "y1"]);
        assert!(b.has_input("x1"));
        assert!(!b.has_output("out"));

        let s = NodeSpec::sink("snk0");
        assert_eq!(s.inputs, ["in"]);
        assert!(s.outputs.is_empty());

        let src = NodeSpec::source("src0");
        assert!(src.inputs.is_empty());
        assert_eq!(src.outputs, ["out"]);
    }

    #[test]
    fn kind_names_match_table() {
        let kinds = [
            NodeKind::Source,
            NodeKind::Sink,
            NodeKind::Add,
            NodeKind::Mul,
            NodeKind::Butterfly { twiddle: None },
            NodeKind::Dft4,
            NodeKind::Twiddle(Twiddle::IDENTITY),
        ];
        for (kind, name) in kinds.iter().zip(NodeKind::NAMES) {
            assert_eq!(kind.name(), name);
        }
    }

    #[test]
    fn twiddle_accessor() {
        let tw = Twiddle::new(16, 3).unwrap();
        assert_eq!(NodeKind::Twiddle(tw).twiddle(), Some(tw));
        assert_eq!(NodeKind::Butterfly { twiddle: None }.twiddle(), None);
        assert_eq!(NodeKind::Dft4.twiddle(), None);
    }

    #[test]
    fn with_ports_overrides() {
        let n = NodeSpec::add("sum", 0.0).with_ports(["a", "b"], ["out", "tap"]);
        assert_eq!(n.outputs.len(), 2);
        assert!(n.has_output("tap"));
    }
}
