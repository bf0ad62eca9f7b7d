use pyo3::prelude::*;

use super::net::Network;
use crate::feedforward::{TrainError, Trainer as InnerTrainer};
use crate::python_ffi::consumable::Consumable;
use crate::Impl_to_PyErr;

#[pyclass]
pub struct Trainer {
    pub(super) trainer: Consumable<InnerTrainer>,
}

impl Trainer {
    pub(super) fn wrap(trainer: InnerTrainer) -> Self {
        Self {
            trainer: Consumable::acquire(trainer, "Trainer"),
        }
    }
}

#[pymethods]
impl Trainer {
    pub fn topology(&self) -> PyResult<Vec<usize>> {
        Ok(self.trainer.get_ref()?.net_ref().topology().to_vec())
    }

    pub fn predict(&mut self, inputs: Vec<f64>) -> PyResult<Vec<f64>> {
        Ok(self.trainer.get_mut()?.predict(&inputs)?)
    }

    pub fn train(&mut self, inputs: Vec<f64>, targets: Vec<f64>) -> PyResult<f64> {
        Ok(self.trainer.get_mut()?.train(&inputs, &targets)?)
    }

    /// Draws `iterations` samples with replacement and trains on each,
    /// returns the mean cost.
    pub fn train_random(
        &mut self,
        samples: Vec<(Vec<f64>, Vec<f64>)>,
        iterations: usize,
    ) -> PyResult<f64> {
        Ok(self.trainer.get_mut()?.train_random(&samples, iterations)?)
    }

    pub fn teardown(&mut self) -> PyResult<Network> {
        Ok(Network::wrap(self.trainer.release()?.teardown()))
    }
}

Impl_to_PyErr!(for TrainError);
