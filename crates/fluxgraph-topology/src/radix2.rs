//! Radix-2 decimation-in-frequency FFT graphs.
//!
//! Layout for `N = 2^m`:
//!
//! - sources `src0..src{N-1}`
//! - `m` stages of butterflies `b_{s}_{a}`; at stage `s` the block span is
//!   `N >> s` and butterfly `a` pairs positions `a` and `a + span/2` with
//!   twiddle `W_N^{j·N/span}` where `j` is the offset inside the block
//! - sinks `snk0..snk{N-1}`, sink `i` fed from bit-reversed position `i`
//!
//! Stage input edges are `e_{s}_in_{pos}`; sink edges are `e_out_{i}`. Every
//! edge leaving a `y1` port is labelled with its twiddle (`W8^2`).

use fluxgraph_core::{Edge, Graph, NodeSpec, PortRef, Time, Twiddle};

use crate::{TopologyError, bit_reverse};

/// Default channel delay for radix-2 graphs.
pub const DEFAULT_DELAY: Time = 80.0;

/// Latency of every butterfly node.
pub const BUTTERFLY_LATENCY: Time = 1.0;

/// Builds an `n`-point radix-2 DIF graph with butterfly latency 1.
///
/// # Errors
///
/// [`TopologyError::NotPowerOfTwo`] unless `n` is a power of two ≥ 2.
pub fn radix2(n: usize, delay: Time) -> Result<Graph, TopologyError> {
    radix2_with_latency(n, delay, BUTTERFLY_LATENCY)
}

/// Builds an `n`-point radix-2 DIF graph with the given butterfly latency.
pub fn radix2_with_latency(n: usize, delay: Time, latency: Time) -> Result<Graph, TopologyError> {
    if n < 2 || !n.is_power_of_two() {
        return Err(TopologyError::NotPowerOfTwo(n));
    }
    let size = u32::try_from(n).map_err(|_| TopologyError::NotPowerOfTwo(n))?;
    let stages = n.trailing_zeros();

    let mut graph = Graph::new();
    let mut prev: Vec<PortRef> = Vec::with_capacity(n);
    for i in 0..n {
        let id = format!("src{i}");
        graph.add_node(NodeSpec::source(id.as_str()));
        prev.push(PortRef::new(id, "out"));
    }

    for s in 0..stages {
        let span = n >> s;
        let half = span / 2;
        let stride = (n / span) as u32;
        let mut next = prev.clone();

        for block in (0..n).step_by(span) {
            for j in 0..half {
                let a = block + j;
                let b = a + half;
                let id = format!("b_{s}_{a}");
                let twiddle = Twiddle::new(size, j as u32 * stride);
                graph.add_node(NodeSpec::butterfly(id.as_str(), twiddle, latency));

                graph.add_edge(Edge::new(
                    format!("e_{s}_in_{a}"),
                    prev[a].clone(),
                    PortRef::new(id.as_str(), "x0"),
                    delay,
                ));
                graph.add_edge(Edge::new(
                    format!("e_{s}_in_{b}"),
                    prev[b].clone(),
                    PortRef::new(id.as_str(), "x1"),
                    delay,
                ));

                next[a] = PortRef::new(id.as_str(), "y0");
                next[b] = PortRef::new(id, "y1");
            }
        }
        prev = next;
    }

    for i in 0..n {
        let id = format!("snk{i}");
        graph.add_node(NodeSpec::sink(id.as_str()));
        graph.add_edge(Edge::new(
            format!("e_out_{i}"),
            prev[bit_reverse(i, stages)].clone(),
            PortRef::new(id, "in"),
            delay,
        ));
    }

    graph.label_twiddle_edges();
    Ok(graph)
}
