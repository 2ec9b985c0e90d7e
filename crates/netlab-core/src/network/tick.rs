use super::Network;
use crate::graph::NodeRef;

impl Network {
    /// One full evaluation + propagation cycle, run once per host frame.
    ///
    /// Phase order is load-bearing: the adjustment phase runs before this
    /// tick's evaluation refreshes error and activation, so it always reads
    /// the values carried over from the previous tick. The rule is a
    /// hand-designed heuristic, not gradient descent; keep it as-is.
    pub fn tick(&mut self) {
        self.tick_index = self.tick_index.saturating_add(1);

        self.seed_output_error_phase();
        if self.config.enable_training {
            self.adjust_weights_phase();
        }
        self.update_inputs_phase();
        self.evaluate_layers_phase();
        // Output terminals hold externally-set targets; nothing to compute.
    }

    /// Seed the only error source in the graph: each final-layer neuron's
    /// reserved slot receives `target - activation`. Every other error in
    /// the network is derived from here by propagation.
    fn seed_output_error_phase(&mut self) {
        let last = self.layers.len() - 1;
        for (i, out) in self.outputs.iter().enumerate() {
            let id = self.layers[last].neurons[i];
            self.neurons[id].contributions[0] = out.value - self.neurons[id].activation;
        }
    }

    /// Nudge every incoming edge weight and every upstream bias, layers in
    /// build order, neurons in layer order.
    fn adjust_weights_phase(&mut self) {
        for layer_idx in 0..self.layers.len() {
            for n in 0..self.layers[layer_idx].neurons.len() {
                let id = self.layers[layer_idx].neurons[n];
                self.adjust_neuron_weights(id);
            }
        }
    }

    fn adjust_neuron_weights(&mut self, id: usize) {
        // The derivative is evaluated at the stored activation value, and
        // error/activation still hold the previous tick's results here.
        let error = self.neurons[id].error;
        let local_slope = self.activation_fn.derivative(self.neurons[id].activation);
        let scale = self.config.learning_rate * error * local_slope;

        for k in 0..self.neurons[id].incoming.len() {
            let edge_id = self.neurons[id].incoming[k];
            let source = self.edges[edge_id].source;
            let upstream_activation = self.upstream_activation(source);
            self.edges[edge_id].weight += scale * upstream_activation;
            match source {
                NodeRef::Neuron(up) => self.neurons[up].bias += scale,
                NodeRef::Input(up) => self.inputs[up].bias += scale,
            }
        }
    }

    /// Input terminals only aggregate the error propagated into them; their
    /// values come from the host and nothing downstream consumes the error.
    fn update_inputs_phase(&mut self) {
        for t in &mut self.inputs {
            t.error = t.contributions.iter().sum();
        }
    }

    /// Synchronous forward sweep, input-side layer first: every neuron sees
    /// its upstream layer's activations from this same tick.
    fn evaluate_layers_phase(&mut self) {
        for layer_idx in 0..self.layers.len() {
            for n in 0..self.layers[layer_idx].neurons.len() {
                let id = self.layers[layer_idx].neurons[n];
                self.evaluate_neuron(id);
            }
        }
    }

    fn evaluate_neuron(&mut self, id: usize) {
        // Per-neuron order matters: aggregate error, recompute activation,
        // then push the fresh error upstream.
        let error = self.neurons[id].contribution_sum();
        self.neurons[id].error = error;

        self.neurons[id].activation = self.compute_activation(id);

        // Overwrite, never accumulate: a contribution slot always holds the
        // latest value this consumer computed. No normalization by weight
        // sum, which could reach zero.
        for k in 0..self.neurons[id].incoming.len() {
            let edge_id = self.neurons[id].incoming[k];
            let contribution = self.edges[edge_id].weight * error;
            let slot = self.edges[edge_id].source_slot;
            match self.edges[edge_id].source {
                NodeRef::Neuron(up) => self.neurons[up].contributions[slot] = contribution,
                NodeRef::Input(up) => self.inputs[up].contributions[slot] = contribution,
            }
        }
    }

    /// `tanh(Σ upstream.activation * weight + bias)` over current upstream
    /// state; pure apart from the caller assigning the result.
    pub(crate) fn compute_activation(&self, id: usize) -> f32 {
        let neuron = &self.neurons[id];
        let mut weighted_sum = 0.0f32;
        for &edge_id in &neuron.incoming {
            let edge = &self.edges[edge_id];
            weighted_sum += self.upstream_activation(edge.source) * edge.weight;
        }
        self.activation_fn.apply(weighted_sum + neuron.bias)
    }
}
