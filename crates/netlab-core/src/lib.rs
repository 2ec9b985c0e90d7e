//! Core engine for an interactive, visually-driven feed-forward computation
//! graph: neurons connected by weighted edges, evaluated layer by layer once
//! per host frame, with per-node output error distributed backward along the
//! edges and used to nudge weights and biases in a continuous online loop.
//!
//! Rendering, pointer/keyboard capture, and the frame loop live in the host
//! (see `netlab-py` for the Python seam); this crate owns graph construction,
//! forward evaluation, error distribution, and weight adjustment only.
//!
//! The propagation rule is a fixed hand-designed heuristic — raw error
//! distributed proportional to edge weight, weights nudged by error × local
//! derivative × upstream activation — not classical backpropagation, and it
//! is deliberately kept that way.

pub mod activation;
pub mod config;
pub mod graph;
pub mod network;
pub mod terminal;

pub use activation::Activation;
pub use config::{NetworkConfig, NetworkConfigError, WeightInit};
pub use graph::{Edge, Layer, Neuron, NodeRef};
pub use network::{
    Network, NetworkSnapshot, RunError, RunSummary, TickMetrics,
};
pub use terminal::{InputTerminal, OutputTerminal};
