use rand::{distributions::Uniform, rngs::StdRng, Rng, SeedableRng};
use std::{error::Error, fmt};

use super::net::{BackwardError, ForwardError, Network, SizeMismatch};

/// Net trainer structure.
///
/// Training procedure will look like this:
/// * One builds `Trainer` by calling `Network::build_trainer`, which will consume `Network`.
/// * Training data is processed sample by sample via `Trainer::train`, or drawn at random
/// from a sample set via `Trainer::train_random`. Every sample is one forward pass followed
/// by one backward pass, parameters are updated right away.
/// * `Trainer::predict` runs the contained network on any input.
/// * Once finished training, one can use `Trainer::teardown` to get `Network` object back.
pub struct Trainer {
    pub(crate) net: Network,

    /// Random source for sample selection in `Trainer::train_random`.
    pub(crate) rng: StdRng,
}

impl Trainer {
    /// Consumes `Network` and builds `Trainer` object containing it.
    pub(super) fn build(net: Network, seed: u64) -> Trainer {
        Trainer {
            net,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns reference to contained `Network`.
    pub fn net_ref(&self) -> &Network {
        &self.net
    }

    /// Returns mutable reference to contained `Network`.
    pub fn net_mut(&mut self) -> &mut Network {
        &mut self.net
    }

    /// Runs the contained network and returns its output.
    pub fn predict(&mut self, inputs: &[f64]) -> Result<Vec<f64>, TrainError> {
        self.net.forward(inputs)?;
        Ok(self.net.predictions().to_vec())
    }

    /// Performs one training step on a given sample: forward pass, then backpropagation.
    ///
    /// # Arguments
    /// * `inputs` - slice that holds activations of input neurons;
    /// * `targets` - slice that holds desired activations of output neurons.
    ///
    /// # Returns
    /// * The cost function of the output (computed before the update) and given `targets`.
    ///
    /// # Examples
    /// ```
    /// # use spnnet::feedforward::Network;
    /// let mut trainer = Network::with_seed(&[10, 20, 20, 3], 0.1, 0).unwrap().build_trainer(0);
    /// let cost = trainer.train(&[1.0; 10], &[0.5; 3]).unwrap();
    /// assert!(cost >= 0.0);
    /// ```
    pub fn train(&mut self, inputs: &[f64], targets: &[f64]) -> Result<f64, TrainError> {
        let outputs_len = self.output_size();
        if targets.len() != outputs_len {
            return Err(TrainError::BadTargets(SizeMismatch {
                expected: outputs_len,
                got: targets.len(),
            }));
        }

        self.net.forward(inputs)?;
        let cost =
            Network::calc_cost(self.net.predictions(), targets).map_err(TrainError::BadTargets)?;
        self.net.backward(targets)?;

        tracing::trace!(cost, "trained on sample");
        Ok(cost)
    }

    /// Performs `iterations` training steps on samples drawn uniformly, with replacement,
    /// from `samples`.
    /// All samples are checked before training starts, so a bad one leaves the network
    /// untouched.
    ///
    /// # Arguments
    /// * `samples` - `(inputs, targets)` pairs to draw from;
    /// * `iterations` - number of training steps.
    ///
    /// # Returns
    /// * The average value of cost function over all steps.
    ///
    /// # Examples
    /// ```
    /// # use spnnet::feedforward::Network;
    /// let mut trainer = Network::with_seed(&[2, 3, 1], 0.1, 0).unwrap().build_trainer(0);
    /// let samples = vec![(vec![0.0, 1.0], vec![1.0]), (vec![1.0, 1.0], vec![0.0])];
    /// let cost = trainer.train_random(&samples, 100).unwrap();
    /// ```
    pub fn train_random(
        &mut self,
        samples: &[(Vec<f64>, Vec<f64>)],
        iterations: usize,
    ) -> Result<f64, TrainError> {
        let inputs_len = self.net.topology()[0];
        let outputs_len = self.output_size();

        for (i, (inputs, targets)) in samples.iter().enumerate() {
            if inputs.len() != inputs_len {
                return Err(TrainError::WrongSampleInputsCount((
                    i,
                    inputs_len,
                    inputs.len(),
                )));
            }
            if targets.len() != outputs_len {
                return Err(TrainError::WrongSampleTargetsCount((
                    i,
                    outputs_len,
                    targets.len(),
                )));
            }
        }

        if samples.is_empty() || iterations == 0 {
            return Ok(0.0);
        }

        tracing::info!(samples = samples.len(), iterations, "training start");

        let indices_between = Uniform::from(0..samples.len());
        let mut costs_sum = 0.0;
        for _ in 0..iterations {
            let (inputs, targets) = &samples[self.rng.sample(indices_between)];
            costs_sum += self.train(inputs, targets)?;
        }

        let mean_cost = costs_sum / iterations as f64;
        tracing::info!(mean_cost, "training complete");

        Ok(mean_cost)
    }

    /// Consumes `Trainer` object and returns contained `Network` back.
    pub fn teardown(self) -> Network {
        self.net
    }

    fn output_size(&self) -> usize {
        let topology = self.net.topology();
        topology[topology.len() - 1]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrainError {
    BadInputs(SizeMismatch),
    WrongSampleInputsCount((usize, usize, usize)),
    BadTargets(SizeMismatch),
    WrongSampleTargetsCount((usize, usize, usize)),
    NotProcessed,
}

impl From<ForwardError> for TrainError {
    fn from(err: ForwardError) -> Self {
        match err {
            ForwardError::BadInputs(mismatch) => TrainError::BadInputs(mismatch),
        }
    }
}

impl From<BackwardError> for TrainError {
    fn from(err: BackwardError) -> Self {
        match err {
            BackwardError::BadTargets(mismatch) => TrainError::BadTargets(mismatch),
            BackwardError::NotProcessed => TrainError::NotProcessed,
        }
    }
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            TrainError::BadInputs(SizeMismatch { expected, got }) => {
                write!(f, "Expected {} input(s), but got {}!", expected, got)
            }
            TrainError::WrongSampleInputsCount((i, expected, got)) => write!(
                f,
                "Expected {} input(s), but samples[{}] got {}!",
                expected, i, got
            ),
            TrainError::BadTargets(SizeMismatch { expected, got }) => {
                write!(f, "Expected {} target(s), but got {}!", expected, got)
            }
            TrainError::WrongSampleTargetsCount((i, expected, got)) => write!(
                f,
                "Expected {} target(s), but samples[{}] got {}!",
                expected, i, got
            ),
            TrainError::NotProcessed => {
                write!(f, "Nothing to backpropagate, call forward first!")
            }
        }
    }
}

impl Error for TrainError {}
