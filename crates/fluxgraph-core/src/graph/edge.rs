//! Graph edge types.
//!
//! An [`Edge`] is a directed, delayed channel from one node's output port to
//! another node's input port. The edge itself holds no tokens; the scheduler
//! creates one [`ChannelBuffer`](super::ChannelBuffer) per edge when a graph is
//! bound to it.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use core::borrow::Borrow;
use core::fmt;

use super::node::{NodeId, PortId};
use crate::time::Time;

/// Unique identifier for an edge in the graph.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(String);

impl EdgeId {
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

impl Borrow<str> for EdgeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EdgeId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl From<String> for EdgeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `(node, port)` pair.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortRef {
    /// Node owning the port.
    pub node: NodeId,
    /// Port name.
    pub port: PortId,
}

impl PortRef {
    /// Creates a port reference.
    pub fn new(node: impl Into<NodeId>, port: impl Into<PortId>) -> Self {
        Self {
            node: node.into(),
            port: port.into(),
        }
    }

    /// Returns true if this references `port` on `node`.
    #[inline]
    pub fn is(&self, node: &str, port: &str) -> bool {
        self.node.as_str() == node && self.port == port
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node, self.port)
    }
}

/// A directed, delayed connection between two ports.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    /// Edge identity.
    pub id: EdgeId,
    /// Producing output port.
    pub from: PortRef,
    /// Consuming input port.
    pub to: PortRef,
    /// Propagation delay: a token may leave the channel once
    /// `now − arrival_time ≥ delay`.
    pub delay: Time,
    /// Optional display label (e.g. `W8^2`).
    pub label: Option<String>,
}

impl Edge {
    /// Creates an unlabelled edge.
    pub fn new(id: impl Into<EdgeId>, from: PortRef, to: PortRef, delay: Time) -> Self {
        Self {
            id: id.into(),
            from,
            to,
            delay,
            label: None,
        }
    }

    /// Attaches a display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
