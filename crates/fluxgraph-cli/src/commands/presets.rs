//! Stimulus preset listing.

use clap::Args;
use fluxgraph_analysis::{InputPreset, magnitude, reference_dft};

#[derive(Args)]
pub struct PresetsArgs {
    /// Also print the input vector and its spectrum magnitude at this size
    #[arg(short = 'n', long)]
    size: Option<usize>,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    println!("Stimulus Presets");
    println!("================");
    for preset in InputPreset::ALL {
        println!("  {:<14} {}", preset.label(), preset.description());
        if let Some(n) = args.size {
            let input = preset.generate(n);
            let values: Vec<String> = input.iter().map(ToString::to_string).collect();
            let mags: Vec<String> = magnitude(&reference_dft(&input))
                .iter()
                .map(|m| format!("{m:.3}"))
                .collect();
            println!("      x:   [{}]", values.join(", "));
            println!("      |X|: [{}]", mags.join(", "));
        }
    }
    Ok(())
}
