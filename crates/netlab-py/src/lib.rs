//! PyO3 module exposing netlab-core to a Python host.
//!
//! The host owns rendering, pointer/keyboard capture, and the frame loop; it
//! drives one `tick()` per frame and reads values/positions back for drawing.

use netlab_core::config::NetworkConfig;
use netlab_core::network::Network as CoreNetwork;
use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;

#[pyclass]
struct Network {
    inner: CoreNetwork,
}

#[pymethods]
impl Network {
    #[new]
    #[pyo3(signature = (layer_sizes, seed=42, learning_rate=0.05, input_count=0))]
    fn new(
        layer_sizes: Vec<usize>,
        seed: u64,
        learning_rate: f32,
        input_count: usize,
    ) -> PyResult<Self> {
        let config = NetworkConfig {
            layer_sizes,
            seed,
            learning_rate,
            input_count,
            ..NetworkConfig::default()
        };
        let inner =
            CoreNetwork::try_new(config).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    /// One evaluation + propagation cycle; call once per frame.
    fn tick(&mut self) {
        self.inner.tick();
    }

    fn set_input(&mut self, index: usize, value: f32) -> PyResult<()> {
        self.inner
            .try_set_input_value(index, value)
            .ok_or_else(|| PyIndexError::new_err("input index out of range"))
    }

    fn set_target(&mut self, index: usize, value: f32) -> PyResult<()> {
        self.inner
            .try_set_target_value(index, value)
            .ok_or_else(|| PyIndexError::new_err("output index out of range"))
    }

    fn set_training(&mut self, enabled: bool) {
        self.inner.set_training_enabled(enabled);
    }

    #[getter]
    fn training(&self) -> bool {
        self.inner.training_enabled()
    }

    #[getter]
    fn tick_index(&self) -> usize {
        self.inner.tick_index()
    }

    #[getter]
    fn input_count(&self) -> usize {
        self.inner.input_count()
    }

    #[getter]
    fn output_count(&self) -> usize {
        self.inner.output_count()
    }

    fn activations(&self) -> Vec<f32> {
        self.inner.activations()
    }

    fn errors(&self) -> Vec<f32> {
        self.inner.errors()
    }

    fn biases(&self) -> Vec<f32> {
        self.inner.biases()
    }

    fn weights(&self) -> Vec<f32> {
        self.inner.weights()
    }

    fn input_values(&self) -> Vec<f32> {
        self.inner.input_values()
    }

    fn target_values(&self) -> Vec<f32> {
        self.inner.target_values()
    }

    fn output_activations(&self) -> Vec<f32> {
        self.inner.output_activations()
    }

    /// Full graph state (positions, values, weights) as a JSON string, for
    /// rendering code that prefers one structured read per frame.
    fn snapshot_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner.snapshot())
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }
}

#[pyfunction]
fn version() -> &'static str {
    "0.1.0"
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Network>()?;
    m.add_function(wrap_pyfunction!(version, m)?)?;
    Ok(())
}
