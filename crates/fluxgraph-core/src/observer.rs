//! Scheduler observation hooks.
//!
//! An [`Observer`] is notified synchronously from inside
//! [`Scheduler::tick`](crate::Scheduler::tick). Every hook has a no-op
//! default, so implementors override only what they need. Hooks take
//! `&mut self` and receive shared references to scheduler data, which makes
//! re-entering the scheduler from a hook impossible.
//!
//! Per fire the order is:
//!
//! 1. [`on_before_fire`](Observer::on_before_fire) with the gathered inputs
//! 2. [`on_fire`](Observer::on_fire)
//! 3. [`on_token`](Observer::on_token) once per enqueued output token
//! 4. [`on_output`](Observer::on_output) with the full output map
//!
//! `()` is the silent observer. A pair `(A, B)` forwards to both, in order.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use crate::graph::{Edge, EdgeId, NodeId, NodeSpec, PortId};
use crate::ports::PortValues;
use crate::time::Time;
use crate::token::{Token, TokenId, Value};

/// Receives scheduler events.
pub trait Observer {
    /// A token was pushed onto `edge`'s buffer.
    fn on_token(&mut self, _edge: &Edge, _token: &Token) {}

    /// `node` is about to fire with `inputs`.
    fn on_before_fire(&mut self, _node: &NodeSpec, _inputs: &PortValues) {}

    /// `node` fired (its busy window has been set).
    fn on_fire(&mut self, _node: &NodeSpec) {}

    /// `node` produced `outputs`. Called even when `outputs` is empty.
    fn on_output(&mut self, _node: &NodeSpec, _outputs: &PortValues) {}
}

impl Observer for () {}

impl<A: Observer, B: Observer> Observer for (A, B) {
    fn on_token(&mut self, edge: &Edge, token: &Token) {
        self.0.on_token(edge, token);
        self.1.on_token(edge, token);
    }

    fn on_before_fire(&mut self, node: &NodeSpec, inputs: &PortValues) {
        self.0.on_before_fire(node, inputs);
        self.1.on_before_fire(node, inputs);
    }

    fn on_fire(&mut self, node: &NodeSpec) {
        self.0.on_fire(node);
        self.1.on_fire(node);
    }

    fn on_output(&mut self, node: &NodeSpec, outputs: &PortValues) {
        self.0.on_output(node, outputs);
        self.1.on_output(node, outputs);
    }
}

impl<O: Observer + ?Sized> Observer for Box<O> {
    fn on_token(&mut self, edge: &Edge, token: &Token) {
        (**self).on_token(edge, token);
    }

    fn on_before_fire(&mut self, node: &NodeSpec, inputs: &PortValues) {
        (**self).on_before_fire(node, inputs);
    }

    fn on_fire(&mut self, node: &NodeSpec) {
        (**self).on_fire(node);
    }

    fn on_output(&mut self, node: &NodeSpec, outputs: &PortValues) {
        (**self).on_output(node, outputs);
    }
}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn on_token(&mut self, edge: &Edge, token: &Token) {
        (**self).on_token(edge, token);
    }

    fn on_before_fire(&mut self, node: &NodeSpec, inputs: &PortValues) {
        (**self).on_before_fire(node, inputs);
    }

    fn on_fire(&mut self, node: &NodeSpec) {
        (**self).on_fire(node);
    }

    fn on_output(&mut self, node: &NodeSpec, outputs: &PortValues) {
        (**self).on_output(node, outputs);
    }
}

/// One recorded scheduler event.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// A token entered a channel.
    Token {
        /// Channel.
        edge: EdgeId,
        /// Token identity.
        token: TokenId,
        /// Payload.
        value: Value,
        /// Release time.
        arrival_time: Time,
        /// Start of the token's causal chain.
        origin_time: Time,
    },
    /// A node fired, consuming the listed inputs.
    Fire {
        /// Firing node.
        node: NodeId,
        /// Consumed `(port, token)` pairs in declared order.
        consumed: Vec<(PortId, TokenId)>,
    },
    /// A node's outputs.
    Output {
        /// Producing node.
        node: NodeId,
        /// Produced `(port, value)` pairs.
        values: Vec<(PortId, Value)>,
    },
}

/// Observer that appends every event to a log.
///
/// Useful in tests and for post-mortem inspection of short runs.
#[derive(Debug, Clone, Default)]
pub struct TraceRecorder {
    events: Vec<TraceEvent>,
}

impl TraceRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events, oldest first.
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Number of recorded fires.
    pub fn fire_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Fire { .. }))
            .count()
    }

    /// Ids of fired nodes, in firing order.
    pub fn fired_nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.events.iter().filter_map(|e| match e {
            TraceEvent::Fire { node, .. } => Some(node),
            _ => None,
        })
    }

    /// Drains the log.
    pub fn take(&mut self) -> Vec<TraceEvent> {
        core::mem::take(&mut self.events)
    }
}

impl Observer for TraceRecorder {
    fn on_token(&mut self, edge: &Edge, token: &Token) {
        self.events.push(TraceEvent::Token {
            edge: edge.id.clone(),
            token: token.id,
            value: token.value,
            arrival_time: token.arrival_time,
            origin_time: token.origin_time,
        });
    }

    fn on_before_fire(&mut self, node: &NodeSpec, inputs: &PortValues) {
        self.events.push(TraceEvent::Fire {
            node: node.id.clone(),
            consumed: inputs.iter().map(|(p, t)| (p.into(), t.id)).collect(),
        });
    }

    fn on_output(&mut self, node: &NodeSpec, outputs: &PortValues) {
        self.events.push(TraceEvent::Output {
            node: node.id.clone(),
            values: outputs.iter().map(|(p, t)| (p.into(), t.value)).collect(),
        });
    }
}
