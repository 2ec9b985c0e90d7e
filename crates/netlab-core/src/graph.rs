//! Arena element types for the computation graph.
//!
//! The network owns flat vectors of neurons and edges; everything else refers
//! into them by index. Edges record source and target indices so traversal is
//! O(1) in both directions without reference cycles.

use serde::{Deserialize, Serialize};

/// Reference to an upstream node: either an input terminal or a neuron.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRef {
    Input(usize),
    Neuron(usize),
}

/// Directed weighted connection from an upstream node into a neuron.
///
/// `source_slot` is the index reserved in the source node's contribution
/// array for this edge's target. Slots are assigned at build time and never
/// change, which replaces the original identity-keyed error maps with plain
/// fixed-size arrays.
#[derive(Clone, Debug)]
pub struct Edge {
    pub weight: f32,
    pub source: NodeRef,
    pub target: usize,
    pub source_slot: usize,
}

/// A graph vertex: bias, current activation, and index-aligned edge lists.
///
/// `incoming[i]`'s edge source is the i-th upstream node of this neuron; the
/// alignment is established at wiring time and relied on by evaluation and
/// adjustment. `contributions` holds one slot per downstream consumer
/// (next-layer neurons, or the paired output terminal for the final layer);
/// the neuron's error is their sum.
#[derive(Clone, Debug)]
pub struct Neuron {
    pub bias: f32,
    pub activation: f32,
    pub error: f32,
    pub position: [f32; 2],
    pub incoming: Vec<usize>,
    pub outgoing: Vec<usize>,
    pub contributions: Vec<f32>,
}

impl Neuron {
    pub fn new(bias: f32, position: [f32; 2]) -> Self {
        Self {
            bias,
            activation: 0.0,
            error: 0.0,
            position,
            incoming: Vec::new(),
            outgoing: Vec::new(),
            contributions: Vec::new(),
        }
    }

    /// Sum of all downstream error contributions; 0 until anything is seeded.
    pub fn contribution_sum(&self) -> f32 {
        self.contributions.iter().sum()
    }
}

/// Ordered group of neuron ids sharing a rank in the forward topology.
/// Purely organizational; index `i` refers to the same logical neuron for
/// the network's whole lifetime.
#[derive(Clone, Debug)]
pub struct Layer {
    pub neurons: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_neuron_has_no_edges_and_zero_state() {
        let n = Neuron::new(0.3, [10.0, 20.0]);
        assert_eq!(n.bias, 0.3);
        assert_eq!(n.activation, 0.0);
        assert_eq!(n.error, 0.0);
        assert!(n.incoming.is_empty());
        assert!(n.outgoing.is_empty());
        assert_eq!(n.contribution_sum(), 0.0);
    }

    #[test]
    fn contribution_sum_adds_all_slots() {
        let mut n = Neuron::new(0.0, [0.0, 0.0]);
        n.contributions = vec![0.5, -0.2, 0.1];
        assert!((n.contribution_sum() - 0.4).abs() < 1e-7);
    }
}
