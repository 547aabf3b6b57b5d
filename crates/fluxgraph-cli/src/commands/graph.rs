//! Graph inspection and export.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;
use fluxgraph_config::{GraphFile, TopologyConfig};
use fluxgraph_topology::TopologyKind;

#[derive(Args)]
pub struct GraphArgs {
    /// Topology generator (radix2, dft4x4, butterfly)
    #[arg(short, long, default_value = "radix2")]
    topology: TopologyKind,

    /// Transform size for radix2
    #[arg(short = 'n', long, default_value = "8")]
    size: usize,

    /// Channel delay
    #[arg(long, default_value = "80")]
    delay: f64,

    /// Node latency
    #[arg(long, default_value = "1")]
    latency: f64,

    /// Write the graph as a TOML graph file instead of printing a summary
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

pub fn run(args: GraphArgs) -> anyhow::Result<()> {
    let topology = TopologyConfig {
        kind: args.topology,
        size: args.size,
        delay: args.delay,
        latency: args.latency,
    };
    let graph = topology.build()?;
    graph.validate()?;

    if let Some(path) = args.output {
        GraphFile::from_graph(&graph).save(&path)?;
        tracing::info!(path = %path.display(), "graph written");
        println!(
            "Wrote {} nodes and {} edges to {}",
            graph.nodes.len(),
            graph.edges.len(),
            path.display()
        );
        return Ok(());
    }

    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for node in &graph.nodes {
        *kinds.entry(node.kind.name()).or_default() += 1;
    }

    println!("Graph: {} (N = {})", topology.kind, topology.effective_size());
    println!("=====");
    println!("  Nodes: {}", graph.nodes.len());
    for (kind, count) in &kinds {
        println!("    {kind:<10} {count}");
    }
    println!("  Edges: {}", graph.edges.len());

    let labelled: Vec<_> = graph.edges.iter().filter(|e| e.label.is_some()).collect();
    if !labelled.is_empty() {
        println!();
        println!("Twiddled edges");
        println!("--------------");
        for edge in labelled {
            println!(
                "  {:<28} {} -> {}  {}",
                edge.id.as_str(),
                edge.from,
                edge.to,
                edge.label.as_deref().unwrap_or_default()
            );
        }
    }
    Ok(())
}
