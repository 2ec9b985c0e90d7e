use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Construction parameters for a [`crate::network::Network`].
///
/// Fully determines graph topology and layout; immutable after construction
/// except for `enable_training`, which the host may toggle between ticks.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Neurons per layer, ordered input-side first.
    pub layer_sizes: Vec<usize>,
    /// Number of input terminals; 0 means one terminal per first-layer neuron.
    pub input_count: usize,
    pub learning_rate: f32,
    /// Seed for initial weights and biases (ChaCha12).
    pub seed: u64,
    /// Gates the weight-adjustment phase of each tick.
    pub enable_training: bool,
    /// Top-left anchor of the layered layout.
    pub origin: [f32; 2],
    /// Horizontal distance between consecutive layers (and terminal columns).
    pub layer_spacing: f32,
    /// Vertical distance between neurons within a layer.
    pub neuron_spacing: f32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            layer_sizes: vec![3, 2],
            input_count: 0,
            learning_rate: 0.05,
            seed: 42,
            enable_training: false,
            origin: [300.0, 150.0],
            layer_spacing: 200.0,
            neuron_spacing: 150.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkConfigError {
    NoLayers,
    EmptyLayer { index: usize },
    TooManyLayers { max: usize, actual: usize },
    LayerTooLarge { index: usize, max: usize, actual: usize },
    TooManyInputs { max: usize, actual: usize },
    InvalidLearningRate,
    InvalidSpacing,
}

impl fmt::Display for NetworkConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkConfigError::NoLayers => write!(f, "layer_sizes must not be empty"),
            NetworkConfigError::EmptyLayer { index } => {
                write!(f, "layer {index} has zero neurons")
            }
            NetworkConfigError::TooManyLayers { max, actual } => {
                write!(f, "layer count ({actual}) exceeds supported maximum ({max})")
            }
            NetworkConfigError::LayerTooLarge { index, max, actual } => write!(
                f,
                "layer {index} size ({actual}) exceeds supported maximum ({max})"
            ),
            NetworkConfigError::TooManyInputs { max, actual } => {
                write!(f, "input_count ({actual}) exceeds supported maximum ({max})")
            }
            NetworkConfigError::InvalidLearningRate => {
                write!(f, "learning_rate must be a finite, positive number")
            }
            NetworkConfigError::InvalidSpacing => {
                write!(f, "layer_spacing and neuron_spacing must be finite and positive")
            }
        }
    }
}

impl Error for NetworkConfigError {}

impl NetworkConfig {
    pub const MAX_LAYERS: usize = 64;
    pub const MAX_NEURONS_PER_LAYER: usize = 1024;

    pub fn validate(&self) -> Result<(), NetworkConfigError> {
        if self.layer_sizes.is_empty() {
            return Err(NetworkConfigError::NoLayers);
        }
        if self.layer_sizes.len() > Self::MAX_LAYERS {
            return Err(NetworkConfigError::TooManyLayers {
                max: Self::MAX_LAYERS,
                actual: self.layer_sizes.len(),
            });
        }
        for (index, &size) in self.layer_sizes.iter().enumerate() {
            if size == 0 {
                return Err(NetworkConfigError::EmptyLayer { index });
            }
            if size > Self::MAX_NEURONS_PER_LAYER {
                return Err(NetworkConfigError::LayerTooLarge {
                    index,
                    max: Self::MAX_NEURONS_PER_LAYER,
                    actual: size,
                });
            }
        }
        if self.input_count > Self::MAX_NEURONS_PER_LAYER {
            return Err(NetworkConfigError::TooManyInputs {
                max: Self::MAX_NEURONS_PER_LAYER,
                actual: self.input_count,
            });
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(NetworkConfigError::InvalidLearningRate);
        }
        if !self.layer_spacing.is_finite()
            || self.layer_spacing <= 0.0
            || !self.neuron_spacing.is_finite()
            || self.neuron_spacing <= 0.0
        {
            return Err(NetworkConfigError::InvalidSpacing);
        }
        Ok(())
    }

    /// Effective number of input terminals (0 defaults to the first layer's size).
    pub fn effective_input_count(&self) -> usize {
        if self.input_count == 0 {
            self.layer_sizes.first().copied().unwrap_or(0)
        } else {
            self.input_count
        }
    }
}

/// How initial weights and biases are assigned at build time.
///
/// `Seeded` is the normal path; `Constant` bypasses randomization so tests
/// can pin exact weights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WeightInit {
    Seeded,
    Constant { weight: f32, bias: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(NetworkConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_layer_list_is_rejected() {
        let config = NetworkConfig {
            layer_sizes: vec![],
            ..NetworkConfig::default()
        };
        assert_eq!(config.validate(), Err(NetworkConfigError::NoLayers));
    }

    #[test]
    fn zero_size_layer_is_rejected() {
        let config = NetworkConfig {
            layer_sizes: vec![2, 0, 1],
            ..NetworkConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(NetworkConfigError::EmptyLayer { index: 1 })
        );
    }

    #[test]
    fn non_positive_learning_rate_is_rejected() {
        for lr in [0.0f32, -0.1, f32::NAN, f32::INFINITY] {
            let config = NetworkConfig {
                learning_rate: lr,
                ..NetworkConfig::default()
            };
            assert_eq!(
                config.validate(),
                Err(NetworkConfigError::InvalidLearningRate),
                "learning_rate {lr} should be rejected"
            );
        }
    }

    #[test]
    fn input_count_zero_defaults_to_first_layer_size() {
        let config = NetworkConfig {
            layer_sizes: vec![3, 2],
            input_count: 0,
            ..NetworkConfig::default()
        };
        assert_eq!(config.effective_input_count(), 3);

        let explicit = NetworkConfig {
            input_count: 5,
            ..config
        };
        assert_eq!(explicit.effective_input_count(), 5);
    }
}
