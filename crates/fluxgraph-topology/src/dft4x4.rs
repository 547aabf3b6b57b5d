//! 16-point DFT as a 4×4 Cooley-Tukey factorization.
//!
//! With `n = n1 + 4·n2` and `k = k2 + 4·k1`:
//!
//! 1. row DFT4 `row-{n1}` over `n2` (input `x[n1 + 4·n2]` on `in{n2}`)
//! 2. twiddle `tw-{n1}-{k2}` multiplies row output `k2` by `W16^{n1·k2}`
//! 3. column DFT4 `col-{k2}` over `n1` (transposed wiring)
//! 4. column output `k1` lands on sink `snk{k2 + 4·k1}`

use fluxgraph_core::{Edge, Graph, NodeSpec, PortRef, Time, Twiddle};

/// Transform size.
pub const SIZE: usize = 16;

/// Factor along each axis.
pub const RADIX: usize = 4;

/// Channel delay on every edge.
pub const EDGE_DELAY: Time = 5.0;

/// Default DFT4 latency.
pub const DEFAULT_LATENCY: Time = 10.0;

/// Builds the 4×4 graph. Twiddle nodes get half the DFT4 latency.
pub fn dft4x4(latency: Time) -> Graph {
    let mut graph = Graph::new();

    for i in 0..SIZE {
        graph.add_node(NodeSpec::source(format!("src{i}")));
    }

    for n1 in 0..RADIX {
        let row = format!("row-{n1}");
        graph.add_node(NodeSpec::dft4(row.as_str(), latency));
        for n2 in 0..RADIX {
            let src = n1 + RADIX * n2;
            graph.add_edge(Edge::new(
                format!("edge-src{src}-row{n1}in{n2}"),
                PortRef::new(format!("src{src}"), "out"),
                PortRef::new(row.as_str(), format!("in{n2}")),
                EDGE_DELAY,
            ));
        }
    }

    for n1 in 0..RADIX {
        for k2 in 0..RADIX {
            let power = (n1 * k2) as u32;
            let tw = Twiddle::new(SIZE as u32, power).unwrap_or(Twiddle::IDENTITY);
            let id = format!("tw-{n1}-{k2}");
            graph.add_node(NodeSpec::twiddle(id.as_str(), tw, latency / 2.0));

            let edge = Edge::new(
                format!("edge-row{n1}out{k2}-tw{n1}_{k2}"),
                PortRef::new(format!("row-{n1}"), format!("out{k2}")),
                PortRef::new(id, "in"),
                EDGE_DELAY,
            );
            graph.add_edge(if power > 0 {
                edge.with_label(tw.to_string())
            } else {
                edge
            });
        }
    }

    for k2 in 0..RADIX {
        let col = format!("col-{k2}");
        graph.add_node(NodeSpec::dft4(col.as_str(), latency));
        for n1 in 0..RADIX {
            graph.add_edge(Edge::new(
                format!("edge-tw{n1}_{k2}-col{k2}in{n1}"),
                PortRef::new(format!("tw-{n1}-{k2}"), "out"),
                PortRef::new(col.as_str(), format!("in{n1}")),
                EDGE_DELAY,
            ));
        }
    }

    for k in 0..SIZE {
        graph.add_node(NodeSpec::sink(format!("snk{k}")));
    }
    for k2 in 0..RADIX {
        for k1 in 0..RADIX {
            let k = k2 + RADIX * k1;
            graph.add_edge(Edge::new(
                format!("edge-col{k2}out{k1}-sink{k}"),
                PortRef::new(format!("col-{k2}"), format!("out{k1}")),
                PortRef::new(format!("snk{k}"), "in"),
                EDGE_DELAY,
            ));
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure() {
        let g = dft4x4(DEFAULT_LATENCY);
        assert_eq!(g.source_count(), 16);
        assert_eq!(g.sink_count(), 16);
        assert_eq!(g.nodes_of_kind("dft4").count(), 8);
        assert_eq!(g.nodes_of_kind("twiddle").count(), 16);
        assert_eq!(g.edges.len(), 64);
        assert!(g.edges.iter().all(|e| e.delay == EDGE_DELAY));
        assert_eq!(g.validate(), Ok(()));
    }

    #[test]
    fn twiddle_nodes_use_half_latency() {
        let g = dft4x4(8.0);
        let tw = g.node("tw-3-2").unwrap();
        assert_eq!(tw.latency, 4.0);
        assert_eq!(tw.kind.twiddle(), Twiddle::new(16, 6));
        assert_eq!(g.node("row-0").unwrap().latency, 8.0);
    }

    #[test]
    fn wiring_is_transposed() {
        let g = dft4x4(1.0);
        // x[9] = x[1 + 4·2] feeds row 1, input 2.
        let e = g.edge("edge-src9-row1in2").unwrap();
        assert_eq!(e.to, PortRef::new("row-1", "in2"));
        // Column 3 output 2 is X[3 + 4·2] = X[11].
        let e = g.edge("edge-col3out2-sink11").unwrap();
        assert_eq!(e.to, PortRef::new("snk11", "in"));
    }

    #[test]
    fn only_nontrivial_twiddles_are_labelled() {
        let g = dft4x4(1.0);
        assert_eq!(g.edge("edge-row0out3-tw0_3").unwrap().label, None);
        assert_eq!(
            g.edge("edge-row2out3-tw2_3").unwrap().label.as_deref(),
            Some("W16^6")
        );
    }
}
