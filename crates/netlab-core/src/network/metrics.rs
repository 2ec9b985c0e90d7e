use super::Network;
use crate::graph::NodeRef;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Per-tick observability for hosts and offline analysis.
///
/// Divergence is reported, never corrected: `non_finite_values` counts
/// NaN/Inf among weights, biases, activations, and errors so a host can
/// warn, but values are never clamped (that would change the heuristic).
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TickMetrics {
    pub tick: usize,
    /// `target - activation` per output slot, as of this tick's end.
    pub output_errors: Vec<f32>,
    pub mean_abs_output_error: f32,
    pub mean_abs_error: f32,
    pub mean_abs_weight: f32,
    pub max_abs_weight: f32,
    pub non_finite_values: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NeuronView {
    pub layer: usize,
    pub index_in_layer: usize,
    pub position: [f32; 2],
    pub activation: f32,
    pub error: f32,
    pub bias: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EdgeView {
    pub source: NodeRef,
    /// Arena index of the target neuron.
    pub target: usize,
    pub weight: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputView {
    pub position: [f32; 2],
    pub value: f32,
    pub error: f32,
    pub bias: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputView {
    pub position: [f32; 2],
    pub value: f32,
}

/// Read-only picture of the whole graph for rendering: positions plus the
/// values a host draws (activation or error view, weight labels, terminal
/// boxes). Taken between ticks, never concurrently with one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub tick: usize,
    pub neurons: Vec<NeuronView>,
    pub edges: Vec<EdgeView>,
    pub inputs: Vec<InputView>,
    pub outputs: Vec<OutputView>,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub ticks: usize,
    pub sample_every: usize,
    pub samples: Vec<TickMetrics>,
    pub final_snapshot: NetworkSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    InvalidSampleEvery,
    TooManyTicks { max: usize, actual: usize },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            RunError::TooManyTicks { max, actual } => {
                write!(f, "ticks ({actual}) exceed supported maximum ({max})")
            }
        }
    }
}

impl Error for RunError {}

impl Network {
    pub const MAX_RUN_TICKS: usize = 1_000_000;

    pub(crate) fn collect_tick_metrics(&self) -> TickMetrics {
        let output_errors: Vec<f32> = self
            .outputs
            .iter()
            .zip(self.output_activations())
            .map(|(out, activation)| out.value - activation)
            .collect();
        let mean_abs_output_error = mean_abs(output_errors.iter().copied());
        let mean_abs_error = mean_abs(self.neurons.iter().map(|n| n.error));
        let mean_abs_weight = mean_abs(self.edges.iter().map(|e| e.weight));
        let max_abs_weight = self
            .edges
            .iter()
            .map(|e| e.weight.abs())
            .fold(0.0f32, f32::max);

        let non_finite_values = self
            .edges
            .iter()
            .map(|e| e.weight)
            .chain(self.neurons.iter().map(|n| n.bias))
            .chain(self.neurons.iter().map(|n| n.activation))
            .chain(self.neurons.iter().map(|n| n.error))
            .filter(|v| !v.is_finite())
            .count();

        TickMetrics {
            tick: self.tick_index,
            output_errors,
            mean_abs_output_error,
            mean_abs_error,
            mean_abs_weight,
            max_abs_weight,
            non_finite_values,
        }
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        let neurons = self
            .layers
            .iter()
            .enumerate()
            .flat_map(|(layer, l)| {
                l.neurons.iter().enumerate().map(move |(index_in_layer, &id)| {
                    let n = &self.neurons[id];
                    NeuronView {
                        layer,
                        index_in_layer,
                        position: n.position,
                        activation: n.activation,
                        error: n.error,
                        bias: n.bias,
                    }
                })
            })
            .collect();
        let edges = self
            .edges
            .iter()
            .map(|e| EdgeView {
                source: e.source,
                target: e.target,
                weight: e.weight,
            })
            .collect();
        let inputs = self
            .inputs
            .iter()
            .map(|t| InputView {
                position: t.position,
                value: t.value,
                error: t.error,
                bias: t.bias,
            })
            .collect();
        let outputs = self
            .outputs
            .iter()
            .map(|t| OutputView {
                position: t.position,
                value: t.value,
            })
            .collect();
        NetworkSnapshot {
            tick: self.tick_index,
            neurons,
            edges,
            inputs,
            outputs,
        }
    }

    pub fn run(&mut self, ticks: usize, sample_every: usize) -> RunSummary {
        self.try_run(ticks, sample_every)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Drive `ticks` full cycles headless, sampling metrics every
    /// `sample_every` ticks (the last tick is always sampled).
    pub fn try_run(&mut self, ticks: usize, sample_every: usize) -> Result<RunSummary, RunError> {
        if sample_every == 0 {
            return Err(RunError::InvalidSampleEvery);
        }
        if ticks > Self::MAX_RUN_TICKS {
            return Err(RunError::TooManyTicks {
                max: Self::MAX_RUN_TICKS,
                actual: ticks,
            });
        }

        let estimated_samples = if ticks == 0 {
            0
        } else {
            ((ticks - 1) / sample_every) + 1
        };
        let mut samples = Vec::with_capacity(estimated_samples);
        for step in 1..=ticks {
            self.tick();
            if step % sample_every == 0 || step == ticks {
                samples.push(self.collect_tick_metrics());
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            ticks,
            sample_every,
            samples,
            final_snapshot: self.snapshot(),
        })
    }
}

fn mean_abs(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = values.fold((0.0f32, 0usize), |(s, c), v| (s + v.abs(), c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}
