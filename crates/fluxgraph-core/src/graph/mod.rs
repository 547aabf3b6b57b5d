//! Static dataflow graph model.
//!
//! A [`Graph`] is a list of [`NodeSpec`]s and a list of [`Edge`]s. It is built
//! once by a topology generator (or loaded from a graph file) and never
//! mutated while bound to a [`Scheduler`](crate::Scheduler). Declaration order
//! matters: the scheduler transfers edges and fires nodes in exactly the
//! order they appear here.
//!
//! The scheduler trusts the structural invariants below; builders can check
//! them up front with [`Graph::validate`]:
//!
//! - node ids are unique, edge ids are unique
//! - every edge names existing nodes and ports declared on them
//! - every node declares at least the ports its kind reads and writes
//! - delays and latencies are finite and non-negative
//!
//! # Example
//!
//! ```rust
//! use fluxgraph_core::graph::{Graph, NodeSpec};
//! use fluxgraph_core::Twiddle;
//!
//! let mut graph = Graph::new();
//! graph.add_node(NodeSpec::source("src0"));
//! graph.add_node(NodeSpec::source("src1"));
//! graph.add_node(NodeSpec::butterfly("bf", Twiddle::new(2, 0), 1.0));
//! graph.add_node(NodeSpec::sink("snk0"));
//! graph.connect("e0", ("src0", "out"), ("bf", "x0"), 60.0);
//! graph.connect("e1", ("src1", "out"), ("bf", "x1"), 60.0);
//! graph.connect("e2", ("bf", "y0"), ("snk0", "in"), 60.0);
//! assert!(graph.validate().is_ok());
//! ```

pub mod buffer;
pub mod edge;
pub mod node;

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use alloc::collections::BTreeSet;

pub use buffer::ChannelBuffer;
pub use edge::{Edge, EdgeId, PortRef};
pub use node::{NodeId, NodeKind, NodeSpec, PortId, SINK_OBSERVATION_PORT};

use crate::time::Time;

/// Structural problems reported by [`Graph::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Two nodes share an id.
    DuplicateNode(NodeId),
    /// Two edges share an id.
    DuplicateEdge(EdgeId),
    /// An edge names a node that does not exist.
    UnknownNode {
        /// Offending edge.
        edge: EdgeId,
        /// Missing node.
        node: NodeId,
    },
    /// An edge names a port its node does not declare in that direction.
    UnknownPort {
        /// Offending edge.
        edge: EdgeId,
        /// Undeclared port.
        port: PortRef,
    },
    /// An edge delay is negative or not finite.
    InvalidDelay(EdgeId, Time),
    /// A node latency is negative or not finite.
    InvalidLatency(NodeId, Time),
    /// A node's declared ports leave out one its kind reads or writes.
    MissingKindPort {
        /// Offending node.
        node: NodeId,
        /// Port the kind needs.
        port: PortId,
        /// True for an input port, false for an output.
        input: bool,
    },
}

#[cfg(feature = "std")]
impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DuplicateNode(id) => write!(f, "duplicate node id '{id}'"),
            Self::DuplicateEdge(id) => write!(f, "duplicate edge id '{id}'"),
            Self::UnknownNode { edge, node } => {
                write!(f, "edge '{edge}' references unknown node '{node}'")
            }
            Self::UnknownPort { edge, port } => {
                write!(f, "edge '{edge}' references undeclared port '{port}'")
            }
            Self::InvalidDelay(id, d) => write!(f, "edge '{id}' has invalid delay {d}"),
            Self::InvalidLatency(id, l) => write!(f, "node '{id}' has invalid latency {l}"),
            Self::MissingKindPort { node, port, input } => write!(
                f,
                "node '{node}' does not declare {} port '{port}'",
                if *input { "input" } else { "output" }
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GraphError {}

/// Immutable description of a dataflow network.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    /// Nodes, in firing order.
    pub nodes: Vec<NodeSpec>,
    /// Edges, in transfer order.
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node.
    pub fn add_node(&mut self, node: NodeSpec) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Appends an edge.
    pub fn add_edge(&mut self, edge: Edge) -> &mut Self {
        self.edges.push(edge);
        self
    }

    /// Appends an edge from `(node, port)` to `(node, port)`.
    pub fn connect(
        &mut self,
        id: impl Into<EdgeId>,
        from: (&str, &str),
        to: (&str, &str),
        delay: Time,
    ) -> &mut Self {
        self.add_edge(Edge::new(
            id,
            PortRef::new(from.0, from.1),
            PortRef::new(to.0, to.1),
            delay,
        ))
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&NodeSpec> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    /// Looks up an edge by id.
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id.as_str() == id)
    }

    /// Edges leaving `(node, port)`, in declared order.
    pub fn edges_from<'a>(&'a self, node: &'a str, port: &'a str) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| e.from.is(node, port))
    }

    /// Nodes of the given kind name (`"source"`, `"sink"`, ...), in declared order.
    pub fn nodes_of_kind<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a NodeSpec> {
        self.nodes.iter().filter(move |n| n.kind.name() == name)
    }

    /// Number of source nodes.
    pub fn source_count(&self) -> usize {
        self.nodes_of_kind("source").count()
    }

    /// Number of sink nodes.
    pub fn sink_count(&self) -> usize {
        self.nodes_of_kind("sink").count()
    }

    /// Checks the structural invariants the scheduler relies on.
    ///
    /// Returns the first violation found, scanning nodes then edges in
    /// declared order.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut node_ids = BTreeSet::new();
        for node in &self.nodes {
            if !node_ids.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
            if !(node.latency.is_finite() && node.latency >= 0.0) {
                return Err(GraphError::InvalidLatency(node.id.clone(), node.latency));
            }
            let missing_input = node.kind.input_ports().iter().find(|p| !node.has_input(p));
            let missing_output = node.kind.output_ports().iter().find(|p| !node.has_output(p));
            if let Some(port) = missing_input.or(missing_output) {
                return Err(GraphError::MissingKindPort {
                    node: node.id.clone(),
                    port: PortId::from(*port),
                    input: missing_input.is_some(),
                });
            }
        }

        let mut edge_ids = BTreeSet::new();
        for edge in &self.edges {
            if !edge_ids.insert(edge.id.as_str()) {
                return Err(GraphError::DuplicateEdge(edge.id.clone()));
            }
            if !(edge.delay.is_finite() && edge.delay >= 0.0) {
                return Err(GraphError::InvalidDelay(edge.id.clone(), edge.delay));
            }
            let from = self.node(edge.from.node.as_str()).ok_or_else(|| GraphError::UnknownNode {
                edge: edge.id.clone(),
                node: edge.from.node.clone(),
            })?;
            if !from.has_output(&edge.from.port) {
                return Err(GraphError::UnknownPort {
                    edge: edge.id.clone(),
                    port: edge.from.clone(),
                });
            }
            let to = self.node(edge.to.node.as_str()).ok_or_else(|| GraphError::UnknownNode {
                edge: edge.id.clone(),
                node: edge.to.node.clone(),
            })?;
            if !to.has_input(&edge.to.port) {
                return Err(GraphError::UnknownPort {
                    edge: edge.id.clone(),
                    port: edge.to.clone(),
                });
            }
        }
        Ok(())
    }

    /// Labels every edge leaving a twiddled butterfly's `y1` port with the
    /// rotation it carries (`W{N}^{k}`).
    pub fn label_twiddle_edges(&mut self) {
        let Self { nodes, edges } = self;
        for node in nodes.iter() {
            let NodeKind::Butterfly { twiddle: Some(tw) } = node.kind else {
                continue;
            };
            for edge in edges.iter_mut().filter(|e| e.from.is(node.id.as_str(), "y1")) {
                edge.label = Some(twiddle_label(tw));
            }
        }
    }
}

fn twiddle_label(tw: crate::complex::Twiddle) -> String {
    alloc::format!("{tw}")
}
