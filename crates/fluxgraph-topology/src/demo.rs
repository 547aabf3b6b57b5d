//! Single-butterfly demonstration graph.

use fluxgraph_core::{Graph, NodeSpec, Time, Twiddle};

/// Channel delay of the demo graph.
pub const DEMO_DELAY: Time = 60.0;

/// Butterfly latency of the demo graph.
pub const DEMO_LATENCY: Time = 1.0;

/// Two sources feeding one `W2^0` butterfly whose outputs go to two sinks.
///
/// `snk0` observes the sum, `snk1` the difference. Ids follow the
/// `src{i}`/`snk{k}` convention of the FFT generators, so the demo is a
/// two-point DFT.
pub fn butterfly_demo() -> Graph {
    butterfly_pair(DEMO_DELAY, DEMO_LATENCY)
}

/// The demo graph with explicit delay and latency.
pub fn butterfly_pair(delay: Time, latency: Time) -> Graph {
    let mut graph = Graph::new();
    graph
        .add_node(NodeSpec::source("src0"))
        .add_node(NodeSpec::source("src1"))
        .add_node(NodeSpec::butterfly("n1", Twiddle::new(2, 0), latency))
        .add_node(NodeSpec::sink("snk0"))
        .add_node(NodeSpec::sink("snk1"))
        .connect("e1", ("src0", "out"), ("n1", "x0"), delay)
        .connect("e2", ("src1", "out"), ("n1", "x1"), delay)
        .connect("e3", ("n1", "y0"), ("snk0", "in"), delay)
        .connect("e4", ("n1", "y1"), ("snk1", "in"), delay);
    graph
}
