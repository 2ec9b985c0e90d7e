//! Input and output terminals: the nodes whose values the host owns.

/// Source node whose value is supplied externally (numeric entry in the
/// host UI) instead of being computed.
///
/// It still participates as an upstream node: first-layer neurons propagate
/// error into `contributions` and nudge `bias` during adjustment. Nothing
/// consumes either today; both are kept so the host can render input-side
/// error and so adjustment stays uniform across upstream node kinds.
#[derive(Clone, Debug)]
pub struct InputTerminal {
    pub value: f32,
    pub bias: f32,
    pub error: f32,
    pub position: [f32; 2],
    pub outgoing: Vec<usize>,
    pub contributions: Vec<f32>,
}

impl InputTerminal {
    pub fn new(bias: f32, position: [f32; 2]) -> Self {
        Self {
            value: 0.0,
            bias,
            error: 0.0,
            position,
            outgoing: Vec::new(),
            contributions: Vec::new(),
        }
    }
}

/// Sink paired 1:1 and in order with the final layer's neurons. Holds the
/// desired value used to seed the network's only error source.
#[derive(Clone, Debug)]
pub struct OutputTerminal {
    pub value: f32,
    pub position: [f32; 2],
}

impl OutputTerminal {
    pub fn new(position: [f32; 2]) -> Self {
        Self {
            value: 0.0,
            position,
        }
    }
}
