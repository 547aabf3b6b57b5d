//! Simulation command: build a graph, feed a stimulus, tick until drained
//! and verify the sinks.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;
use fluxgraph_analysis::{CompareResult, InputPreset};
use fluxgraph_config::{GraphFile, RunMode, SimConfig, default_config_path};
use fluxgraph_core::{Complex, Graph, Value};
use fluxgraph_topology::TopologyKind;
use serde::Serialize;

use crate::session::{RunSummary, Session};

#[derive(Args)]
pub struct RunArgs {
    /// Simulation config (defaults to the user config file if present)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Hand-written graph file; overrides the topology settings
    #[arg(short, long, value_name = "FILE")]
    graph: Option<PathBuf>,

    /// Topology generator (radix2, dft4x4, butterfly)
    #[arg(short, long)]
    topology: Option<TopologyKind>,

    /// Transform size for radix2
    #[arg(short = 'n', long)]
    size: Option<usize>,

    /// Stimulus preset (see `fluxgraph presets`)
    #[arg(short, long)]
    preset: Option<InputPreset>,

    /// Base time step per tick
    #[arg(long)]
    dt: Option<f64>,

    /// Multiplier on dt
    #[arg(long)]
    speed: Option<f64>,

    /// Fire at most one node per tick
    #[arg(long)]
    single_fire: bool,

    /// Give up after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Per-component tolerance for verification
    #[arg(long)]
    epsilon: Option<f64>,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    let graph = build_graph(&args, &config)?;
    let preset = config.stimulus.preset;
    let eps = config.verify.epsilon;

    tracing::info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        %preset,
        mode = %config.run.mode,
        "starting simulation"
    );

    let mut session = Session::new(graph, &config.run)?;
    session.apply_preset(preset)?;
    let summary = session.run_until_drained(config.run.max_ticks);
    let result = session.verify(eps);

    let report = Report::new(&session, &config, summary, &result);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report, eps);
    }

    if !result.all_match() {
        anyhow::bail!(
            "{} of {} sinks differ from the reference DFT",
            result.mismatch_count(),
            result.mismatches.len()
        );
    }
    Ok(())
}

fn resolve_config(args: &RunArgs) -> anyhow::Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => {
            let path = default_config_path();
            if path.is_file() {
                tracing::info!(path = %path.display(), "using user config");
                SimConfig::load(&path)?
            } else {
                SimConfig::default()
            }
        }
    };

    if let Some(kind) = args.topology {
        config.topology.kind = kind;
    }
    if let Some(size) = args.size {
        config.topology.size = size;
    }
    if let Some(preset) = args.preset {
        config.stimulus.preset = preset;
    }
    if let Some(dt) = args.dt {
        config.run.dt = dt;
    }
    if let Some(speed) = args.speed {
        config.run.speed = speed;
    }
    if args.single_fire {
        config.run.mode = RunMode::SingleFire;
    }
    if let Some(max_ticks) = args.max_ticks {
        config.run.max_ticks = max_ticks;
    }
    if let Some(eps) = args.epsilon {
        config.verify.epsilon = eps;
    }

    config.validate()?;
    Ok(config)
}

fn build_graph(args: &RunArgs, config: &SimConfig) -> anyhow::Result<Graph> {
    match &args.graph {
        Some(path) => Ok(GraphFile::load(path)?.into_graph()?),
        None => Ok(config.topology.build()?),
    }
}

#[derive(Serialize)]
struct Report {
    topology: String,
    size: usize,
    preset: InputPreset,
    mode: RunMode,
    ticks: u64,
    fires: u64,
    drained: bool,
    time: f64,
    overwritten_tokens: u64,
    throughput: f64,
    latency_ema: Option<f64>,
    queue_ema: Option<f64>,
    input: BTreeMap<String, Complex>,
    sinks: Vec<SinkReport>,
    all_match: bool,
}

#[derive(Serialize)]
struct SinkReport {
    id: String,
    value: Option<Value>,
    reference: Complex,
    mismatch: bool,
}

impl Report {
    fn new(session: &Session, config: &SimConfig, summary: RunSummary, result: &CompareResult) -> Self {
        let metrics = session.metrics();
        let now = session.now();
        let sinks = result
            .mismatches
            .iter()
            .zip(&result.reference)
            .map(|((id, mismatch), reference)| SinkReport {
                value: session.recorder().value(id),
                id: id.clone(),
                reference: *reference,
                mismatch: *mismatch,
            })
            .collect();
        Self {
            topology: config.topology.kind.to_string(),
            size: session.scheduler().graph().source_count(),
            preset: config.stimulus.preset,
            mode: config.run.mode,
            ticks: summary.ticks,
            fires: summary.fires,
            drained: summary.drained,
            time: now,
            overwritten_tokens: session.scheduler().stats().overwritten_tokens,
            throughput: metrics.throughput(now),
            latency_ema: metrics.latency_ema(),
            queue_ema: metrics.queue_ema(),
            input: session.last_input().clone(),
            sinks,
            all_match: result.all_match(),
        }
    }
}

fn print_text(report: &Report, eps: f64) {
    println!("Simulation");
    println!("==========");
    println!("  Topology: {} (N = {})", report.topology, report.size);
    println!("  Preset:   {}", report.preset);
    println!("  Mode:     {}", report.mode);
    println!();
    println!(
        "  Ticks: {}  Fires: {}  Time: {:.1}{}",
        report.ticks,
        report.fires,
        report.time,
        if report.drained { "" } else { "  (not drained)" }
    );
    println!("  Throughput:      {:.2} fires/s", report.throughput);
    if let Some(latency) = report.latency_ema {
        println!("  Latency (EMA):   {latency:.2}");
    }
    if let Some(queue) = report.queue_ema {
        println!("  Queue (EMA):     {queue:.3}");
    }
    if report.overwritten_tokens > 0 {
        println!("  Overwritten tokens: {}", report.overwritten_tokens);
    }
    println!();

    println!("Sinks (eps = {eps:e})");
    println!("-----");
    for sink in &report.sinks {
        let observed = sink
            .value
            .map_or_else(|| "-".to_string(), |v| v.as_complex().to_string());
        println!(
            "  {:<6} {:>28}  ref {:>28}  {}",
            sink.id,
            observed,
            sink.reference.to_string(),
            if sink.mismatch { "MISMATCH" } else { "ok" }
        );
    }
    println!();
    if report.all_match {
        println!("All {} sinks match the reference DFT.", report.sinks.len());
    }
}
