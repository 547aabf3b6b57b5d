//! Structural checks over every generator.

use fluxgraph_core::{NodeKind, Scheduler};
use fluxgraph_topology::{TopologyError, TopologyKind, bit_reverse, dft4x4, radix2};

#[test]
fn every_topology_validates_and_binds() {
    for kind in TopologyKind::ALL {
        let size = kind.fixed_size().unwrap_or(16);
        let graph = kind.build(size, 4.0, 1.0).unwrap();
        assert_eq!(graph.validate(), Ok(()), "{kind}");
        assert_eq!(graph.source_count(), size, "{kind}");
        assert_eq!(graph.sink_count(), size, "{kind}");
        assert!(Scheduler::new(graph).is_ok(), "{kind}");
    }
}

#[test]
fn radix2_counts() {
    for bits in 1..=6u32 {
        let n = 1usize << bits;
        let g = radix2(n, 1.0).unwrap();
        let butterflies = g.nodes_of_kind("butterfly").count();
        assert_eq!(butterflies, n / 2 * bits as usize);
        // two inputs per butterfly plus one edge per sink
        assert_eq!(g.edges.len(), butterflies * 2 + n);
    }
}

#[test]
fn radix2_sinks_are_bit_reversed() {
    let g = radix2(8, 0.0).unwrap();
    for k in 0..8 {
        let edge = g.edge(&format!("e_out_{k}")).unwrap();
        assert_eq!(edge.to.node.as_str(), format!("snk{k}"));
        let r = bit_reverse(k, 3);
        let last = format!("b_2_{}", r & !1);
        assert_eq!(edge.from.node.as_str(), last);
        assert_eq!(edge.from.port.as_str(), if r % 2 == 0 { "y0" } else { "y1" });
    }
}

#[test]
fn dft4x4_shape() {
    let g = dft4x4(10.0);
    let kinds = |name| g.nodes.iter().filter(|n| n.kind.name() == name).count();
    assert_eq!(kinds("dft4"), 8);
    assert_eq!(g.nodes.iter().filter(|n| matches!(n.kind, NodeKind::Twiddle(_))).count(), 16);
    assert_eq!(g.edges.len(), 64);
    assert!(g.edges.iter().all(|e| e.delay == 5.0));
}

#[test]
fn bad_sizes_are_rejected() {
    assert_eq!(radix2(12, 1.0).unwrap_err(), TopologyError::NotPowerOfTwo(12));
    assert!(TopologyKind::Dft4x4.build(8, 1.0, 1.0).is_err());
    assert!("fft9".parse::<TopologyKind>().is_err());
}
