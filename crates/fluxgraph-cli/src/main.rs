//! Fluxgraph CLI - run and verify dataflow FFT simulations.

mod commands;
mod session;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fluxgraph")]
#[command(author, version, about = "Discrete-time dataflow FFT simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a graph and check its sinks against a reference DFT
    Run(commands::run::RunArgs),

    /// Summarize or export a generated graph
    Graph(commands::graph::GraphArgs),

    /// List stimulus presets
    Presets(commands::presets::PresetsArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Graph(args) => commands::graph::run(args),
        Commands::Presets(args) => commands::presets::run(args),
    }
}
