//! Runtime metrics observer.
//!
//! [`RuntimeMetrics`] watches a running scheduler and keeps cheap rolling
//! statistics: fire counts, throughput over a resettable window, smoothed
//! end-to-end latency at the sinks and a smoothed queue depth fed by the
//! driver.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use alloc::collections::BTreeMap;

use crate::graph::{NodeId, NodeKind, NodeSpec, SINK_OBSERVATION_PORT};
use crate::observer::Observer;
use crate::ports::PortValues;
use crate::time::Time;

/// Smoothing factor for the end-to-end latency average.
pub const LATENCY_ALPHA: f64 = 0.15;

/// Smoothing factor for the queue-depth average.
pub const QUEUE_ALPHA: f64 = 0.1;

/// Sink observations older than this, relative to the newest one, are
/// dropped.
pub const SINK_HIT_WINDOW: Time = 5000.0;

/// Exponential moving average seeded by its first sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ema {
    alpha: f64,
    value: Option<f64>,
}

impl Ema {
    /// Creates an empty average with smoothing factor `alpha`.
    pub const fn new(alpha: f64) -> Self {
        Self { alpha, value: None }
    }

    /// Folds in one sample.
    pub fn update(&mut self, sample: f64) {
        self.value = Some(match self.value {
            Some(v) => v + self.alpha * (sample - v),
            None => sample,
        });
    }

    /// Current average, `None` before the first sample.
    #[inline]
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Forgets every sample.
    pub fn clear(&mut self) {
        self.value = None;
    }
}

/// Rolling scheduler statistics.
#[derive(Debug, Clone)]
pub struct RuntimeMetrics {
    window_start: Time,
    window_fires: u64,
    total_fires: u64,
    node_fires: BTreeMap<NodeId, u64>,
    latency: Ema,
    queue: Ema,
    sink_hits: Vec<(NodeId, Time)>,
}

impl Default for RuntimeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeMetrics {
    /// Creates empty metrics with the window starting at `t = 0`.
    pub fn new() -> Self {
        Self {
            window_start: 0.0,
            window_fires: 0,
            total_fires: 0,
            node_fires: BTreeMap::new(),
            latency: Ema::new(LATENCY_ALPHA),
            queue: Ema::new(QUEUE_ALPHA),
            sink_hits: Vec::new(),
        }
    }

    /// Clears everything and restarts the throughput window at `now`.
    pub fn reset(&mut self, now: Time) {
        *self = Self::new();
        self.window_start = now;
    }

    /// Folds the current mean queue depth into the queue average.
    pub fn sample_queue(&mut self, mean: f64) {
        self.queue.update(mean);
    }

    /// Fires since the scheduler was bound or metrics were last reset.
    pub fn total_fires(&self) -> u64 {
        self.total_fires
    }

    /// Fires of one node.
    pub fn node_fires(&self, node: &str) -> u64 {
        self.node_fires.get(node).copied().unwrap_or(0)
    }

    /// Per-node fire counts, ordered by node id.
    pub fn fires_by_node(&self) -> impl Iterator<Item = (&NodeId, u64)> {
        self.node_fires.iter().map(|(id, n)| (id, *n))
    }

    /// Fires per simulated second since the window started.
    ///
    /// Returns 0 while no time has elapsed.
    pub fn throughput(&self, now: Time) -> f64 {
        let elapsed = now - self.window_start;
        if elapsed <= 0.0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let fires = self.window_fires as f64;
        fires / (elapsed / 1000.0)
    }

    /// Smoothed sink latency (`arrival − origin`), if any sink has fired.
    pub fn latency_ema(&self) -> Option<f64> {
        self.latency.value()
    }

    /// Smoothed mean queue depth, if sampled.
    pub fn queue_ema(&self) -> Option<f64> {
        self.queue.value()
    }

    /// Sink observations within [`SINK_HIT_WINDOW`] of the newest one, as
    /// `(sink, time)`, oldest first.
    pub fn sink_hits(&self) -> &[(NodeId, Time)] {
        &self.sink_hits
    }

    /// Number of sink observations at or after `t`.
    pub fn sink_hits_since(&self, t: Time) -> usize {
        self.sink_hits.iter().filter(|(_, at)| *at >= t).count()
    }
}

impl Observer for RuntimeMetrics {
    fn on_fire(&mut self, node: &NodeSpec) {
        self.total_fires += 1;
        self.window_fires += 1;
        *self.node_fires.entry(node.id.clone()).or_insert(0) += 1;
    }

    fn on_output(&mut self, node: &NodeSpec, outputs: &PortValues) {
        if node.kind != NodeKind::Sink {
            return;
        }
        if let Some(token) = outputs.get(SINK_OBSERVATION_PORT) {
            self.latency.update(token.arrival_time - token.origin_time);
            let horizon = token.arrival_time - SINK_HIT_WINDOW;
            self.sink_hits.retain(|(_, at)| *at >= horizon);
            self.sink_hits.push((node.id.clone(), token.arrival_time));
        }
    }
}
