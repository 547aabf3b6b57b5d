//! Discrete-time dataflow scheduler.
//!
//! A [`Scheduler`] binds an immutable [`Graph`] to the mutable runtime state
//! needed to run it: one [`ChannelBuffer`] per edge, one mailbox per node,
//! per-node busy windows, a deterministic [`TokenIdGen`], an [`Observer`] and
//! a [`Clock`].
//!
//! # Tick
//!
//! Each [`tick`](Scheduler::tick) advances the clock, reads `now` once and
//! runs two phases:
//!
//! 1. **Transfer.** For every edge in declared order, at most one token
//!    whose channel delay has elapsed moves from the buffer into the
//!    destination node's mailbox. A token already waiting on that port is
//!    overwritten.
//! 2. **Fire.** For every node in declared order, up to `max_fires`: a node
//!    that is not busy and whose mailbox holds every declared input fires.
//!    Its outputs are enqueued on every matching outgoing edge with
//!    `arrival_time = now + latency`, and its mailbox is cleared.
//!
//! Firing follows declaration order, not data dependencies, so a token
//! advances at most one node per tick.
//!
//! # Example
//!
//! ```rust
//! use fluxgraph_core::{Complex, Graph, NodeSpec, Scheduler, Twiddle, Value};
//!
//! let mut graph = Graph::new();
//! graph
//!     .add_node(NodeSpec::source("src0"))
//!     .add_node(NodeSpec::source("src1"))
//!     .add_node(NodeSpec::butterfly("bf", Twiddle::new(2, 0), 1.0))
//!     .add_node(NodeSpec::sink("snk0"))
//!     .add_node(NodeSpec::sink("snk1"))
//!     .connect("e0", ("src0", "out"), ("bf", "x0"), 0.0)
//!     .connect("e1", ("src1", "out"), ("bf", "x1"), 0.0)
//!     .connect("e2", ("bf", "y0"), ("snk0", "in"), 0.0)
//!     .connect("e3", ("bf", "y1"), ("snk1", "in"), 0.0);
//!
//! let mut sched = Scheduler::new(graph).unwrap();
//! for src in ["src0", "src1"] {
//!     let token = sched.token(Complex::ONE);
//!     sched.emit_from(src, "out", token).unwrap();
//! }
//!
//! assert_eq!(sched.tick(0.0, None), 1); // inputs reach the butterfly, it fires
//! let y0 = sched.buffer("e2").and_then(|b| b.peek()).unwrap();
//! assert_eq!(y0.value, Value::Complex(Complex::new(2.0, 0.0)));
//! assert_eq!(y0.arrival_time, 1.0);
//! ```

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use alloc::collections::BTreeMap;

use crate::executor;
use crate::graph::{ChannelBuffer, EdgeId, Graph, NodeId, NodeSpec, PortId};
use crate::observer::Observer;
use crate::ports::PortValues;
use crate::time::{Clock, Time, VirtualClock};
use crate::token::{Token, TokenIdGen, Value};

/// Errors reported by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// A node id that is not part of the bound graph.
    UnknownNode(NodeId),
}

#[cfg(feature = "std")]
impl std::fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "unknown node '{id}'"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SchedulerError {}

/// Cumulative counters since the scheduler was built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Ticks executed.
    pub ticks: u64,
    /// Node firings.
    pub fires: u64,
    /// Mailbox tokens replaced before their node fired.
    pub overwritten_tokens: u64,
}

/// Runtime for one [`Graph`].
///
/// Generic over the observer `O` (default: none) and the clock `C` (default:
/// a [`VirtualClock`] advanced by each tick's `dt`).
#[derive(Debug)]
pub struct Scheduler<O = (), C = VirtualClock> {
    graph: Graph,
    node_index: BTreeMap<NodeId, usize>,
    edge_index: BTreeMap<EdgeId, usize>,
    /// Destination node of each edge.
    edge_targets: Vec<usize>,
    /// Outgoing edges of each node, in declared edge order.
    fanout: Vec<Vec<usize>>,
    buffers: Vec<ChannelBuffer>,
    mailboxes: Vec<PortValues>,
    busy_until: Vec<Option<Time>>,
    ids: TokenIdGen,
    stats: SchedulerStats,
    observer: O,
    clock: C,
}

impl Scheduler {
    /// Binds `graph` with no observer and a virtual clock at `t = 0`.
    ///
    /// Fails if an edge names a node that is not in the graph.
    pub fn new(graph: Graph) -> Result<Self, SchedulerError> {
        Self::with_parts(graph, (), VirtualClock::new())
    }
}

impl<O: Observer, C: Clock> Scheduler<O, C> {
    /// Binds `graph` with an explicit observer and clock.
    pub fn with_parts(graph: Graph, observer: O, clock: C) -> Result<Self, SchedulerError> {
        let mut node_index = BTreeMap::new();
        for (i, node) in graph.nodes.iter().enumerate() {
            node_index.entry(node.id.clone()).or_insert(i);
        }

        let mut edge_index = BTreeMap::new();
        let mut edge_targets = Vec::with_capacity(graph.edges.len());
        let mut fanout = vec![Vec::new(); graph.nodes.len()];
        for (i, edge) in graph.edges.iter().enumerate() {
            let resolve = |id: &NodeId| {
                node_index
                    .get(id.as_str())
                    .copied()
                    .ok_or_else(|| SchedulerError::UnknownNode(id.clone()))
            };
            let from = resolve(&edge.from.node)?;
            let to = resolve(&edge.to.node)?;
            fanout[from].push(i);
            edge_targets.push(to);
            edge_index.entry(edge.id.clone()).or_insert(i);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "scheduler_bind: {} nodes, {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );

        Ok(Self {
            buffers: vec![ChannelBuffer::new(); graph.edges.len()],
            mailboxes: vec![PortValues::new(); graph.nodes.len()],
            busy_until: vec![None; graph.nodes.len()],
            graph,
            node_index,
            edge_index,
            edge_targets,
            fanout,
            ids: TokenIdGen::new(),
            stats: SchedulerStats::default(),
            observer,
            clock,
        })
    }

    /// Replaces the observer.
    pub fn with_observer<O2: Observer>(self, observer: O2) -> Scheduler<O2, C> {
        Scheduler {
            graph: self.graph,
            node_index: self.node_index,
            edge_index: self.edge_index,
            edge_targets: self.edge_targets,
            fanout: self.fanout,
            buffers: self.buffers,
            mailboxes: self.mailboxes,
            busy_until: self.busy_until,
            ids: self.ids,
            stats: self.stats,
            observer,
            clock: self.clock,
        }
    }

    /// Replaces the clock.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Scheduler<O, C2> {
        Scheduler {
            graph: self.graph,
            node_index: self.node_index,
            edge_index: self.edge_index,
            edge_targets: self.edge_targets,
            fanout: self.fanout,
            buffers: self.buffers,
            mailboxes: self.mailboxes,
            busy_until: self.busy_until,
            ids: self.ids,
            stats: self.stats,
            observer: self.observer,
            clock,
        }
    }

    /// Advances the clock by `dt` and runs one transfer + fire step.
    ///
    /// `max_fires` caps the number of nodes fired this tick (`None` is
    /// unbounded). Returns the number of nodes that fired.
    pub fn tick(&mut self, dt: Time, max_fires: Option<usize>) -> usize {
        self.clock.advance(dt);
        let now = self.clock.now();
        self.stats.ticks += 1;

        self.transfer(now);
        let fired = self.fire(now, max_fires);

        self.stats.fires += fired as u64;
        fired
    }

    fn transfer(&mut self, now: Time) {
        for (i, edge) in self.graph.edges.iter().enumerate() {
            let Some(token) = self.buffers[i].pop_ready(now, edge.delay) else {
                continue;
            };
            let mailbox = &mut self.mailboxes[self.edge_targets[i]];
            if let Some(_dropped) = mailbox.insert(edge.to.port.clone(), token) {
                self.stats.overwritten_tokens += 1;
                #[cfg(feature = "tracing")]
                tracing::debug!("mailbox_overwrite: {} dropped {}", edge.to, _dropped.id);
            }
        }
    }

    fn fire(&mut self, now: Time, max_fires: Option<usize>) -> usize {
        let mut fired = 0;
        for i in 0..self.graph.nodes.len() {
            if max_fires.is_some_and(|max| fired >= max) {
                break;
            }
            if self.busy_until[i].is_some_and(|until| until > now) {
                continue;
            }

            let node = &self.graph.nodes[i];
            let mailbox = &self.mailboxes[i];
            if !holds_all_inputs(node, mailbox) {
                continue;
            }
            let inputs: PortValues = node
                .inputs
                .iter()
                .filter_map(|p| mailbox.get(p).map(|t| (p.clone(), t.clone())))
                .collect();

            self.observer.on_before_fire(node, &inputs);
            let outputs = executor::execute(node, &inputs, now, &mut self.ids);
            let release = now + node.latency;
            self.busy_until[i] = Some(release);
            self.observer.on_fire(node);

            #[cfg(feature = "tracing")]
            tracing::debug!("fire: {} at {now} ({} outputs)", node.id, outputs.len());

            for (port, token) in outputs.iter() {
                for &e in &self.fanout[i] {
                    let edge = &self.graph.edges[e];
                    if edge.from.port != port {
                        continue;
                    }
                    let queued = token.clone().arriving_at(release);
                    self.buffers[e].push(queued.clone());
                    self.observer.on_token(edge, &queued);
                }
            }
            self.observer.on_output(node, &outputs);
            self.mailboxes[i].clear();
            fired += 1;
        }
        fired
    }

    /// Places `token` directly into `node`'s mailbox on `port`, replacing
    /// any token already waiting there.
    pub fn inject(
        &mut self,
        node: &str,
        port: impl Into<PortId>,
        token: Token,
    ) -> Result<(), SchedulerError> {
        let i = self.resolve(node)?;
        if self.mailboxes[i].insert(port, token).is_some() {
            self.stats.overwritten_tokens += 1;
        }
        Ok(())
    }

    /// Pushes `token` onto every edge leaving `(node, port)`, stamped with
    /// `arrival_time = now`. `origin_time` is preserved.
    ///
    /// Returns the number of edges fed.
    pub fn emit_from(&mut self, node: &str, port: &str, token: Token) -> Result<usize, SchedulerError> {
        let i = self.resolve(node)?;
        let now = self.clock.now();
        let mut fed = 0;
        for &e in &self.fanout[i] {
            let edge = &self.graph.edges[e];
            if edge.from.port != port {
                continue;
            }
            let queued = token.clone().arriving_at(now);
            self.buffers[e].push(queued.clone());
            self.observer.on_token(edge, &queued);
            fed += 1;
        }
        Ok(fed)
    }

    /// Mints a token born now with a fresh id.
    pub fn token(&mut self, value: impl Into<Value>) -> Token {
        Token::new(self.ids.next_id(), value, self.clock.now())
    }

    fn resolve(&self, node: &str) -> Result<usize, SchedulerError> {
        self.node_index
            .get(node)
            .copied()
            .ok_or_else(|| SchedulerError::UnknownNode(node.into()))
    }

    /// Number of tokens queued on `edge` (0 for an unknown edge).
    pub fn buffer_size(&self, edge: &str) -> usize {
        self.buffer(edge).map_or(0, ChannelBuffer::len)
    }

    /// The channel buffer of `edge`.
    pub fn buffer(&self, edge: &str) -> Option<&ChannelBuffer> {
        self.edge_index.get(edge).map(|&i| &self.buffers[i])
    }

    /// Mean queue length over all edges (0 with no edges).
    pub fn average_queue_size(&self) -> f64 {
        if self.buffers.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = self.total_buffered() as f64 / self.buffers.len() as f64;
        mean
    }

    /// Tokens queued across all edges.
    pub fn total_buffered(&self) -> usize {
        self.buffers.iter().map(ChannelBuffer::len).sum()
    }

    /// Nodes whose mailbox holds every declared input, busy or not.
    ///
    /// Each of them fires once its busy window ends, so a graph is only
    /// quiescent when this and [`total_buffered`](Self::total_buffered) are
    /// both zero.
    pub fn ready_count(&self) -> usize {
        self.graph
            .nodes
            .iter()
            .zip(&self.mailboxes)
            .filter(|(node, mailbox)| holds_all_inputs(node, mailbox))
            .count()
    }

    /// Tokens waiting in `node`'s mailbox.
    pub fn mailbox(&self, node: &str) -> Option<&PortValues> {
        self.node_index.get(node).map(|&i| &self.mailboxes[i])
    }

    /// End of `node`'s current or last busy window; `None` if it never fired
    /// or is unknown.
    pub fn busy_until(&self, node: &str) -> Option<Time> {
        self.node_index.get(node).and_then(|&i| self.busy_until[i])
    }

    /// Current simulated time.
    #[inline]
    pub fn now(&self) -> Time {
        self.clock.now()
    }

    /// Cumulative counters.
    #[inline]
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// The bound graph.
    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The observer.
    #[inline]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// The observer, mutably.
    #[inline]
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// The clock.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

fn holds_all_inputs(node: &NodeSpec, mailbox: &PortValues) -> bool {
    !mailbox.is_empty() && node.inputs.iter().all(|p| mailbox.contains(p))
}
