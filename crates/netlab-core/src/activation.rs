/// Activation function applied after each neuron's weighted sum.
///
/// A closed enum rather than per-neuron closures: the network only ever uses
/// tanh today, and a tag keeps future variants cheap (no boxed dispatch).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Activation {
    Tanh,
}

impl Activation {
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Tanh => x.tanh(),
        }
    }

    /// Derivative of the activation function.
    ///
    /// Callers in the adjustment step evaluate this at the neuron's stored
    /// activation *value*, not at the pre-activation sum. That is part of the
    /// propagation heuristic and is relied on by the weight-update rule.
    pub fn derivative(self, x: f32) -> f32 {
        match self {
            Activation::Tanh => 1.0 - x.tanh() * x.tanh(),
        }
    }
}
