//! Hand-written graph files.
//!
//! A graph file lists nodes and edges explicitly, for networks the built-in
//! generators do not cover:
//!
//! ```toml
//! [[nodes]]
//! id = "src0"
//! kind = "source"
//!
//! [[nodes]]
//! id = "bf"
//! kind = "butterfly"
//! latency = 1.0
//! twiddle = { n = 4, k = 1 }
//!
//! [[edges]]
//! id = "e0"
//! from = "src0.out"
//! to = "bf.x0"
//! delay = 10.0
//! label = "W4^1"
//! ```
//!
//! `inputs`/`outputs` override a node's canonical ports. An override may add
//! ports but must keep every port the kind reads or writes, otherwise
//! [`GraphFile::into_graph`] rejects the file.

use std::path::Path;

use fluxgraph_core::{Edge, Graph, NodeKind, NodeSpec, PortRef, Time, Twiddle};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, read_to_string, write_with_parents};

/// On-disk graph description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphFile {
    /// Nodes in firing order.
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
    /// Edges in transfer order.
    #[serde(default)]
    pub edges: Vec<EdgeEntry>,
}

/// One `[[nodes]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    /// Node id.
    pub id: String,
    /// Kind name (`source`, `sink`, `add`, `mul`, `butterfly`, `dft4`, `twiddle`).
    pub kind: String,
    /// Busy time after firing.
    #[serde(default)]
    pub latency: Time,
    /// Twiddle parameters for `butterfly` (optional) and `twiddle` (required).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twiddle: Option<TwiddleEntry>,
    /// Input port override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<String>>,
    /// Output port override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<String>>,
}

/// `W_n^k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwiddleEntry {
    /// Transform size.
    pub n: u32,
    /// Exponent.
    pub k: u32,
}

/// One `[[edges]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeEntry {
    /// Edge id.
    pub id: String,
    /// Producer as `node.port`.
    pub from: String,
    /// Consumer as `node.port`.
    pub to: String,
    /// Channel delay.
    #[serde(default)]
    pub delay: Time,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GraphFile {
    /// Loads a graph file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml(&read_to_string(path.as_ref())?)
    }

    /// Parses a graph file from TOML.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Saves the graph file, creating the parent directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        write_with_parents(path.as_ref(), &self.to_toml()?)
    }

    /// Serializes to pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Builds and validates the described graph.
    pub fn into_graph(self) -> Result<Graph, ConfigError> {
        let mut graph = Graph::new();
        for entry in self.nodes {
            graph.add_node(entry.into_spec()?);
        }
        for entry in self.edges {
            let from = parse_port_ref(&entry.id, &entry.from)?;
            let to = parse_port_ref(&entry.id, &entry.to)?;
            let edge = Edge::new(entry.id, from, to, entry.delay);
            graph.add_edge(match entry.label {
                Some(label) => edge.with_label(label),
                None => edge,
            });
        }
        graph.validate()?;
        Ok(graph)
    }

    /// Describes an existing graph. Ports are written out only when they
    /// differ from the kind's canonical ones.
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .nodes
            .iter()
            .map(|node| {
                let canonical = NodeSpec::new(node.id.clone(), node.kind, node.latency);
                NodeEntry {
                    id: node.id.to_string(),
                    kind: node.kind.name().to_string(),
                    latency: node.latency,
                    twiddle: node.kind.twiddle().map(|tw| TwiddleEntry {
                        n: tw.n.get(),
                        k: tw.k,
                    }),
                    inputs: (node.inputs != canonical.inputs).then(|| node.inputs.clone()),
                    outputs: (node.outputs != canonical.outputs).then(|| node.outputs.clone()),
                }
            })
            .collect();
        let edges = graph
            .edges
            .iter()
            .map(|edge| EdgeEntry {
                id: edge.id.to_string(),
                from: edge.from.to_string(),
                to: edge.to.to_string(),
                delay: edge.delay,
                label: edge.label.clone(),
            })
            .collect();
        Self { nodes, edges }
    }
}

impl NodeEntry {
    fn into_spec(self) -> Result<NodeSpec, ConfigError> {
        let twiddle = match self.twiddle {
            Some(TwiddleEntry { n, k }) => Some(Twiddle::new(n, k).ok_or_else(|| {
                ConfigError::InvalidNode {
                    node: self.id.clone(),
                    reason: "twiddle size n must be non-zero".into(),
                }
            })?),
            None => None,
        };
        let kind = match self.kind.as_str() {
            "source" => NodeKind::Source,
            "sink" => NodeKind::Sink,
            "add" => NodeKind::Add,
            "mul" => NodeKind::Mul,
            "butterfly" => NodeKind::Butterfly { twiddle },
            "dft4" => NodeKind::Dft4,
            "twiddle" => NodeKind::Twiddle(twiddle.ok_or_else(|| ConfigError::InvalidNode {
                node: self.id.clone(),
                reason: "twiddle node requires twiddle = { n, k }".into(),
            })?),
            _ => {
                return Err(ConfigError::UnknownNodeKind {
                    node: self.id,
                    kind: self.kind,
                });
            }
        };

        let mut spec = NodeSpec::new(self.id, kind, self.latency);
        if let Some(inputs) = self.inputs {
            spec.inputs = inputs;
        }
        if let Some(outputs) = self.outputs {
            spec.outputs = outputs;
        }
        Ok(spec)
    }
}

/// Splits `node.port` at the last dot.
fn parse_port_ref(edge: &str, reference: &str) -> Result<PortRef, ConfigError> {
    match reference.rsplit_once('.') {
        Some((node, port)) if !node.is_empty() && !port.is_empty() => Ok(PortRef::new(node, port)),
        _ => Err(ConfigError::InvalidPortRef {
            edge: edge.to_string(),
            reference: reference.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxgraph_core::GraphError;

    const DEMO: &str = r#"
        [[nodes]]
        id = "src0"
        kind = "source"

        [[nodes]]
        id = "src1"
        kind = "source"

        [[nodes]]
        id = "bf"
        kind = "butterfly"
        latency = 1.0
        twiddle = { n = 2, k = 0 }

        [[nodes]]
        id = "snk0"
        kind = "sink"

        [[edges]]
        id = "e0"
        from = "src0.out"
        to = "bf.x0"
        delay = 5.0

        [[edges]]
        id = "e1"
        from = "src1.out"
        to = "bf.x1"

        [[edges]]
        id = "e2"
        from = "bf.y0"
        to = "snk0.in"
        label = "sum"
    "#;

    #[test]
    fn parses_and_builds() {
        let g = GraphFile::from_toml(DEMO).unwrap().into_graph().unwrap();
        assert_eq!(g.nodes.len(), 4);
        let bf = g.node("bf").unwrap();
        assert_eq!(bf.kind, NodeKind::Butterfly { twiddle: Twiddle::new(2, 0) });
        assert_eq!(bf.latency, 1.0);
        let e0 = g.edge("e0").unwrap();
        assert!(e0.from.is("src0", "out"));
        assert_eq!(e0.delay, 5.0);
        assert_eq!(g.edge("e1").unwrap().delay, 0.0);
        assert_eq!(g.edge("e2").unwrap().label.as_deref(), Some("sum"));
    }

    #[test]
    fn unknown_kind() {
        let err = GraphFile::from_toml("[[nodes]]\nid = \"x\"\nkind = \"fft\"")
            .unwrap()
            .into_graph()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownNodeKind { ref kind, .. } if kind == "fft"));
    }

    #[test]
    fn malformed_port_refs() {
        for bad in ["src0", ".out", "src0.", ""] {
            assert!(parse_port_ref("e", bad).is_err(), "{bad:?}");
        }
        let r = parse_port_ref("e", "a.b.c").unwrap();
        assert!(r.is("a.b", "c"));
    }

    #[test]
    fn twiddle_node_needs_parameters() {
        let err = GraphFile::from_toml("[[nodes]]\nid = \"t\"\nkind = \"twiddle\"")
            .unwrap()
            .into_graph()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNode { .. }));
    }

    #[test]
    fn structural_errors_surface() {
        let file = GraphFile {
            nodes: vec![],
            edges: vec![EdgeEntry {
                id: "e".into(),
                from: "a.out".into(),
                to: "b.in".into(),
                delay: 0.0,
                label: None,
            }],
        };
        let err = file.into_graph().unwrap_err();
        assert!(matches!(err, ConfigError::Graph(GraphError::UnknownNode { .. })));
    }

    #[test]
    fn port_overrides() {
        let g = GraphFile::from_toml(
            "[[nodes]]\nid = \"s\"\nkind = \"sink\"\ninputs = [\"in\", \"aux\"]\noutputs = []",
        )
        .unwrap()
        .into_graph()
        .unwrap();
        assert_eq!(g.nodes[0].inputs, ["in", "aux"]);
        assert!(g.nodes[0].outputs.is_empty());
    }

    #[test]
    fn port_override_must_keep_kind_ports() {
        let err = GraphFile::from_toml("[[nodes]]\nid = \"s\"\nkind = \"sink\"\ninputs = [\"left\"]")
            .unwrap()
            .into_graph()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Graph(GraphError::MissingKindPort { ref port, input: true, .. }) if port.as_str() == "in"
        ));
    }

    #[test]
    fn from_graph_round_trips() {
        let original = GraphFile::from_toml(DEMO).unwrap().into_graph().unwrap();
        let file = GraphFile::from_graph(&original);
        assert!(file.nodes.iter().all(|n| n.inputs.is_none() && n.outputs.is_none()));
        let text = file.to_toml().unwrap();
        let rebuilt = GraphFile::from_toml(&text).unwrap().into_graph().unwrap();
        assert_eq!(rebuilt, original);
    }
}
