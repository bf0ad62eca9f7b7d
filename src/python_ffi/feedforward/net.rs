use pyo3::prelude::*;

use super::trainer::Trainer;
use crate::feedforward::{
    BackwardError, ForwardError, Network as InnerNetwork, NewNetworkError, SizeMismatch,
};
use crate::python_ffi::consumable::Consumable;
use crate::Impl_to_PyErr;

#[pyclass]
pub struct Network {
    pub(super) net: Consumable<InnerNetwork>,
}

impl Network {
    pub(super) fn wrap(net: InnerNetwork) -> Self {
        Self {
            net: Consumable::acquire(net, "Network"),
        }
    }
}

#[pymethods]
impl Network {
    /// Without `seed` initial coefficients come from the thread-local generator.
    #[new]
    pub fn new(
        topology: Vec<usize>,
        learning_rate: f64,
        seed: Option<u64>,
    ) -> Result<Self, NewNetworkError> {
        let net = match seed {
            Some(seed) => InnerNetwork::with_seed(&topology, learning_rate, seed)?,
            None => InnerNetwork::new(&topology, learning_rate, &mut rand::thread_rng())?,
        };
        Ok(Self::wrap(net))
    }

    pub fn topology(&self) -> PyResult<Vec<usize>> {
        Ok(self.net.get_ref()?.topology().to_vec())
    }

    pub fn learning_rate(&self) -> PyResult<f64> {
        Ok(self.net.get_ref()?.learning_rate())
    }

    pub fn forward(&mut self, inputs: Vec<f64>) -> PyResult<()> {
        Ok(self.net.get_mut()?.forward(&inputs)?)
    }

    pub fn backward(&mut self, targets: Vec<f64>) -> PyResult<()> {
        Ok(self.net.get_mut()?.backward(&targets)?)
    }

    pub fn predictions(&self) -> PyResult<Vec<f64>> {
        Ok(self.net.get_ref()?.predictions().to_vec())
    }

    pub fn build_trainer(&mut self, seed: Option<u64>) -> PyResult<Trainer> {
        let seed = seed.unwrap_or_else(rand::random);
        Ok(Trainer::wrap(self.net.release()?.build_trainer(seed)))
    }

    #[staticmethod]
    pub fn calc_cost(outputs: Vec<f64>, targets: Vec<f64>) -> Result<f64, SizeMismatch> {
        InnerNetwork::calc_cost(&outputs, &targets)
    }
}

Impl_to_PyErr!(for NewNetworkError, ForwardError, BackwardError, SizeMismatch);
