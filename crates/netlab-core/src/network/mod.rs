pub mod metrics;
pub mod tick;
#[cfg(test)]
mod tests;

pub use metrics::*;

use crate::activation::Activation;
use crate::config::{NetworkConfig, NetworkConfigError, WeightInit};
use crate::graph::{Edge, Layer, Neuron, NodeRef};
use crate::terminal::{InputTerminal, OutputTerminal};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

/// Fraction of `layer_spacing` separating terminal columns from their
/// adjacent layer.
const TERMINAL_SPACING_FACTOR: f32 = 0.75;

/// Owner of the whole computation graph: layers, terminals, and the flat
/// neuron/edge arenas. Topology is fixed at construction; one [`tick`]
/// (evaluation + propagation + optional adjustment) runs per host frame.
///
/// [`tick`]: Network::tick
pub struct Network {
    pub(crate) config: NetworkConfig,
    pub(crate) activation_fn: Activation,
    pub(crate) neurons: Vec<Neuron>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) layers: Vec<Layer>,
    pub(crate) inputs: Vec<InputTerminal>,
    pub(crate) outputs: Vec<OutputTerminal>,
    pub(crate) tick_index: usize,
}

impl Network {
    pub fn new(config: NetworkConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(config: NetworkConfig) -> Result<Self, NetworkConfigError> {
        Self::try_with_weight_init(config, WeightInit::Seeded)
    }

    /// Build a network with explicit control over weight/bias assignment.
    /// `WeightInit::Constant` bypasses randomization so callers can pin
    /// exact parameters.
    pub fn try_with_weight_init(
        config: NetworkConfig,
        init: WeightInit,
    ) -> Result<Self, NetworkConfigError> {
        config.validate()?;
        let mut rng = ChaCha12Rng::seed_from_u64(config.seed);
        let draw = |rng: &mut ChaCha12Rng, constant: f32| match init {
            WeightInit::Seeded => rng.random_range(-1.0f32..1.0),
            WeightInit::Constant { .. } => constant,
        };
        let (const_weight, const_bias) = match init {
            WeightInit::Seeded => (0.0, 0.0),
            WeightInit::Constant { weight, bias } => (weight, bias),
        };

        let mut network = Self {
            activation_fn: Activation::Tanh,
            neurons: Vec::new(),
            edges: Vec::new(),
            layers: Vec::with_capacity(config.layer_sizes.len()),
            inputs: Vec::new(),
            outputs: Vec::new(),
            tick_index: 0,
            config,
        };

        // Layers: one shared initial bias per layer (neurons diverge once
        // training nudges them individually).
        for (i, &size) in network.config.layer_sizes.iter().enumerate() {
            let layer_bias = draw(&mut rng, const_bias);
            let x = network.config.origin[0] + i as f32 * network.config.layer_spacing;
            let mut ids = Vec::with_capacity(size);
            for j in 0..size {
                let y = network.config.origin[1] + j as f32 * network.config.neuron_spacing;
                ids.push(network.neurons.len());
                let mut neuron = Neuron::new(layer_bias, [x, y]);
                // Activation starts at tanh(bias): what a forward pass
                // yields before any edges exist. The first tick's seeded
                // error is measured against this value.
                neuron.activation = network.activation_fn.apply(layer_bias);
                network.neurons.push(neuron);
            }
            network.layers.push(Layer { neurons: ids });
        }

        // Input terminals, left of the first layer. With the default count
        // each terminal sits beside its first-layer neuron; an explicit count
        // stacks them and centers the column on the first layer's mean y.
        let input_x =
            network.config.origin[0] - TERMINAL_SPACING_FACTOR * network.config.layer_spacing;
        let input_count = network.config.effective_input_count();
        if network.config.input_count == 0 {
            for &id in &network.layers[0].neurons {
                let bias = draw(&mut rng, const_bias);
                let y = network.neurons[id].position[1];
                network.inputs.push(InputTerminal::new(bias, [input_x, y]));
            }
        } else {
            for k in 0..input_count {
                let bias = draw(&mut rng, const_bias);
                let y = network.config.origin[1] + k as f32 * network.config.neuron_spacing;
                network.inputs.push(InputTerminal::new(bias, [input_x, y]));
            }
            let layer_mean = Self::mean_y(
                network.layers[0]
                    .neurons
                    .iter()
                    .map(|&id| network.neurons[id].position[1]),
            );
            let input_mean = Self::mean_y(network.inputs.iter().map(|t| t.position[1]));
            let shift = layer_mean - input_mean;
            for t in &mut network.inputs {
                t.position[1] += shift;
            }
        }

        // Center each layer vertically on the previous layer's mean.
        for i in 0..network.layers.len().saturating_sub(1) {
            let mean_here = Self::mean_y(
                network.layers[i]
                    .neurons
                    .iter()
                    .map(|&id| network.neurons[id].position[1]),
            );
            let mean_next = Self::mean_y(
                network.layers[i + 1]
                    .neurons
                    .iter()
                    .map(|&id| network.neurons[id].position[1]),
            );
            let shift = mean_here - mean_next;
            for &id in &network.layers[i + 1].neurons {
                network.neurons[id].position[1] += shift;
            }
        }

        // Output terminals, right of the final layer, paired in order.
        let last = network.layers.len() - 1;
        let output_x = network.config.origin[0]
            + last as f32 * network.config.layer_spacing
            + TERMINAL_SPACING_FACTOR * network.config.layer_spacing;
        for &id in &network.layers[last].neurons {
            let y = network.neurons[id].position[1];
            network.outputs.push(OutputTerminal::new([output_x, y]));
        }

        // Dense bipartite wiring, created back-to-front so a fixed seed
        // assigns weights in a stable, reproducible order.
        for i in (1..network.layers.len()).rev() {
            for t in 0..network.layers[i].neurons.len() {
                let target = network.layers[i].neurons[t];
                for s in 0..network.layers[i - 1].neurons.len() {
                    let source = network.layers[i - 1].neurons[s];
                    let weight = draw(&mut rng, const_weight);
                    network.add_edge(NodeRef::Neuron(source), target, weight);
                }
            }
        }
        for t in 0..network.layers[0].neurons.len() {
            let target = network.layers[0].neurons[t];
            for k in 0..network.inputs.len() {
                let weight = draw(&mut rng, const_weight);
                network.add_edge(NodeRef::Input(k), target, weight);
            }
        }

        // Contribution slots: one per downstream consumer. Final-layer
        // neurons have exactly one, reserved for their paired terminal.
        for (i, layer) in network.layers.iter().enumerate() {
            let is_last = i == last;
            for &id in &layer.neurons {
                let slots = if is_last {
                    1
                } else {
                    network.neurons[id].outgoing.len()
                };
                network.neurons[id].contributions = vec![0.0; slots];
            }
        }
        for t in &mut network.inputs {
            t.contributions = vec![0.0; t.outgoing.len()];
        }

        Ok(network)
    }

    fn add_edge(&mut self, source: NodeRef, target: usize, weight: f32) {
        let source_slot = match source {
            NodeRef::Neuron(id) => self.neurons[id].outgoing.len(),
            NodeRef::Input(id) => self.inputs[id].outgoing.len(),
        };
        let edge_id = self.edges.len();
        self.edges.push(Edge {
            weight,
            source,
            target,
            source_slot,
        });
        match source {
            NodeRef::Neuron(id) => self.neurons[id].outgoing.push(edge_id),
            NodeRef::Input(id) => self.inputs[id].outgoing.push(edge_id),
        }
        self.neurons[target].incoming.push(edge_id);
    }

    fn mean_y(ys: impl Iterator<Item = f32>) -> f32 {
        let (sum, count) = ys.fold((0.0f32, 0usize), |(s, c), y| (s + y, c + 1));
        if count == 0 {
            0.0
        } else {
            sum / count as f32
        }
    }

    pub(crate) fn upstream_activation(&self, source: NodeRef) -> f32 {
        match source {
            NodeRef::Input(id) => self.inputs[id].value,
            NodeRef::Neuron(id) => self.neurons[id].activation,
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn tick_index(&self) -> usize {
        self.tick_index
    }

    pub fn training_enabled(&self) -> bool {
        self.config.enable_training
    }

    /// Toggle the adjustment phase; takes effect on the very next tick.
    pub fn set_training_enabled(&mut self, enabled: bool) {
        self.config.enable_training = enabled;
    }

    pub fn set_input_value(&mut self, index: usize, value: f32) {
        self.try_set_input_value(index, value)
            .expect("input index out of range for set_input_value")
    }

    pub fn try_set_input_value(&mut self, index: usize, value: f32) -> Option<()> {
        self.inputs.get_mut(index)?.value = value;
        Some(())
    }

    pub fn set_target_value(&mut self, index: usize, value: f32) {
        self.try_set_target_value(index, value)
            .expect("output index out of range for set_target_value")
    }

    pub fn try_set_target_value(&mut self, index: usize, value: f32) -> Option<()> {
        self.outputs.get_mut(index)?.value = value;
        Some(())
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn input_values(&self) -> Vec<f32> {
        self.inputs.iter().map(|t| t.value).collect()
    }

    pub fn target_values(&self) -> Vec<f32> {
        self.outputs.iter().map(|t| t.value).collect()
    }

    /// Activations of every neuron, in arena order (layers front-to-back).
    pub fn activations(&self) -> Vec<f32> {
        self.neurons.iter().map(|n| n.activation).collect()
    }

    /// Accumulated errors of every neuron, in arena order.
    pub fn errors(&self) -> Vec<f32> {
        self.neurons.iter().map(|n| n.error).collect()
    }

    pub fn biases(&self) -> Vec<f32> {
        self.neurons.iter().map(|n| n.bias).collect()
    }

    /// Edge weights in build order (stable across ticks).
    pub fn weights(&self) -> Vec<f32> {
        self.edges.iter().map(|e| e.weight).collect()
    }

    /// Activations of the final layer, in output-terminal order.
    pub fn output_activations(&self) -> Vec<f32> {
        let last = &self.layers[self.layers.len() - 1];
        last.neurons
            .iter()
            .map(|&id| self.neurons[id].activation)
            .collect()
    }
}
