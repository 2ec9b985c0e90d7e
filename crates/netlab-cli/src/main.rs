//! Headless harness: build a network from CLI parameters, pin inputs and
//! targets, run N ticks, and report sampled metrics as JSON.

use anyhow::{bail, Context};
use clap::Parser;
use netlab_core::config::NetworkConfig;
use netlab_core::network::Network;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "netlab", about = "Feed-forward computation graph harness")]
struct Args {
    /// Neurons per layer, input side first (comma-separated).
    #[arg(long, default_value = "3,2", value_delimiter = ',')]
    layers: Vec<usize>,

    /// Number of input terminals; 0 means one per first-layer neuron.
    #[arg(long, default_value_t = 0)]
    input_count: usize,

    /// Fixed input values, assigned to terminals in order.
    #[arg(long, value_delimiter = ',')]
    inputs: Vec<f32>,

    /// Fixed target values, assigned to output terminals in order.
    #[arg(long, value_delimiter = ',')]
    targets: Vec<f32>,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 0.05)]
    learning_rate: f32,

    /// Enable the weight-adjustment phase.
    #[arg(long)]
    train: bool,

    #[arg(long, default_value_t = 100)]
    ticks: usize,

    #[arg(long, default_value_t = 10)]
    sample_every: usize,

    /// Write the full RunSummary JSON here; omit to print it to stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = NetworkConfig {
        layer_sizes: args.layers,
        input_count: args.input_count,
        learning_rate: args.learning_rate,
        seed: args.seed,
        enable_training: args.train,
        ..NetworkConfig::default()
    };
    let mut network = Network::try_new(config).context("invalid network configuration")?;

    if args.inputs.len() > network.input_count() {
        bail!(
            "{} input values given but the network has {} input terminals",
            args.inputs.len(),
            network.input_count()
        );
    }
    if args.targets.len() > network.output_count() {
        bail!(
            "{} target values given but the network has {} output terminals",
            args.targets.len(),
            network.output_count()
        );
    }
    for (i, &v) in args.inputs.iter().enumerate() {
        network.set_input_value(i, v);
    }
    for (i, &v) in args.targets.iter().enumerate() {
        network.set_target_value(i, v);
    }

    let summary = network
        .try_run(args.ticks, args.sample_every)
        .context("run failed")?;

    eprintln!(
        "{} layers, {} neurons, {} edges, training {}",
        network.layer_count(),
        network.neuron_count(),
        network.edge_count(),
        if network.training_enabled() { "on" } else { "off" },
    );
    if let Some(last) = summary.samples.last() {
        eprintln!(
            "tick {}: mean |output error| {:.4}, mean |weight| {:.4}, max |weight| {:.4}{}",
            last.tick,
            last.mean_abs_output_error,
            last.mean_abs_weight,
            last.max_abs_weight,
            if last.non_finite_values > 0 {
                format!(", WARNING: {} non-finite values", last.non_finite_values)
            } else {
                String::new()
            },
        );
    }

    let json = serde_json::to_string_pretty(&summary)?;
    match &args.out {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?
        }
        None => println!("{json}"),
    }
    Ok(())
}
