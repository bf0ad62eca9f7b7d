use rand::{distributions::Uniform, rngs::StdRng, Rng, SeedableRng};
use std::{error::Error, fmt};

use super::trainer::Trainer;
use crate::matrix::Matrix;

/// Neural network structure
pub struct Network {
    /// The number of neurons in each layer, input and output included.
    pub(super) topology: Box<[usize]>,

    pub(super) learning_rate: f64,

    /// One matrix per layer transition.
    ///
    /// `weights[i]` has `topology[i]` rows and `topology[i + 1]` columns,
    /// so a row of activations multiplied by it gives the next layer's row.
    pub(super) weights: Vec<Matrix<f64>>,

    /// `biases[i]` is a single row of `topology[i + 1]` values.
    pub(super) biases: Vec<Matrix<f64>>,

    /// Activations of every layer from the last `Network::forward` call:
    /// `activations[0]` is the input row, `activations[i + 1]` is the output of
    /// transition `i`.
    ///
    /// Empty until the first forward pass. `Network::backward` reads it, so it has to
    /// stay untouched between the two calls.
    pub(super) activations: Vec<Matrix<f64>>,
}

impl Network {
    /// Returns network for given topology.
    /// Every weight and bias is drawn from `rng`, uniformly in range [0, 1).
    ///
    /// # Arguments
    /// * `topology` - number of neurons in each layer (input and output included);
    /// * `learning_rate` - gradient multiplier used by `Network::backward`;
    /// * `rng` - random source for initial coefficients.
    ///
    /// # Returns
    /// * `Ok(Network)` if topology has at least two non-empty layers and learning rate is
    /// positive;
    /// * `Err(NewNetworkError)` otherwise.
    ///
    /// # Examples
    /// ```
    /// # use spnnet::feedforward::Network;
    /// let mut rng = rand::thread_rng();
    /// let net = Network::new(&[2, 3, 1], 0.1, &mut rng).unwrap();
    /// assert_eq!(net.weights()[0].rows(), 2);
    /// assert_eq!(net.weights()[0].columns(), 3);
    /// ```
    pub fn new<R: Rng + ?Sized>(
        topology: &[usize],
        learning_rate: f64,
        rng: &mut R,
    ) -> Result<Network, NewNetworkError> {
        if topology.len() < 2 {
            return Err(NewNetworkError::BadTopology(topology.len()));
        }
        if let Some(index) = topology.iter().position(|&size| size == 0) {
            return Err(NewNetworkError::EmptyLayer(index));
        }
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(NewNetworkError::BadLearningRate(learning_rate));
        }

        let between = Uniform::from(0.0..1.0);
        let mut weights = Vec::with_capacity(topology.len() - 1);
        let mut biases = Vec::with_capacity(topology.len() - 1);

        for pair in topology.windows(2) {
            let (old_layer_size, layer_size) = (pair[0], pair[1]);

            weights.push(
                Matrix::new(layer_size, old_layer_size).apply_function(|_| rng.sample(between)),
            );
            biases.push(Matrix::new(layer_size, 1).apply_function(|_| rng.sample(between)));
        }

        tracing::debug!(?topology, learning_rate, "built network");

        Ok(Network {
            topology: topology.into(),
            learning_rate,
            weights,
            biases,
            activations: Vec::with_capacity(topology.len()),
        })
    }

    /// Same as `Network::new`, but initial coefficients come from `StdRng` seeded with `seed`,
    /// so two networks built with one seed are identical.
    ///
    /// # Examples
    /// ```
    /// # use spnnet::feedforward::Network;
    /// let a = Network::with_seed(&[2, 3, 1], 0.1, 7).unwrap();
    /// let b = Network::with_seed(&[2, 3, 1], 0.1, 7).unwrap();
    /// assert_eq!(a.weights(), b.weights());
    /// ```
    pub fn with_seed(
        topology: &[usize],
        learning_rate: f64,
        seed: u64,
    ) -> Result<Network, NewNetworkError> {
        Network::new(topology, learning_rate, &mut StdRng::seed_from_u64(seed))
    }

    pub fn topology(&self) -> &[usize] {
        &self.topology
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn weights(&self) -> &[Matrix<f64>] {
        &self.weights
    }

    pub fn biases(&self) -> &[Matrix<f64>] {
        &self.biases
    }

    /// Activations cached by the last `Network::forward`, input layer first.
    pub fn activations(&self) -> &[Matrix<f64>] {
        &self.activations
    }

    fn input_size(&self) -> usize {
        self.topology[0]
    }

    fn output_size(&self) -> usize {
        self.topology[self.topology.len() - 1]
    }

    /// Sigmoid function.
    /// Implements the formula:
    /// `1 / (1 + exp(-x))`.
    pub fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    /// Sigmoid derivative function, expressed in terms of sigmoid itself.
    /// Implements the formula:
    /// `s * (1 - s)`.
    pub fn sigmoid_der_s(s: f64) -> f64 {
        s * (1.0 - s)
    }

    /// Calculates output of the network for given input and caches activations of every
    /// layer for the following `Network::backward`.
    ///
    /// Each layer computes `sigmoid(previous * weights + bias)`.
    /// Read the result with `Network::predictions`.
    ///
    /// # Returns
    /// * `Ok(())` if amount of inputs matches input layer;
    /// * `Err(ForwardError)` otherwise, network is left untouched.
    ///
    /// # Examples
    /// ```
    /// # use spnnet::feedforward::Network;
    /// let mut net = Network::with_seed(&[10, 20, 20, 3], 0.1, 0).unwrap();
    /// net.forward(&[1.0; 10]).unwrap();
    /// assert_eq!(net.predictions().len(), 3);
    /// assert!(net.forward(&[1.0; 9]).is_err());
    /// ```
    pub fn forward(&mut self, inputs: &[f64]) -> Result<(), ForwardError> {
        if inputs.len() != self.input_size() {
            let err = ForwardError::BadInputs(SizeMismatch {
                expected: self.input_size(),
                got: inputs.len(),
            });
            tracing::debug!(%err, "forward rejected");
            return Err(err);
        }

        self.activations.clear();

        let mut values = Matrix::row_vector(inputs);
        for (weights, biases) in self.weights.iter().zip(self.biases.iter()) {
            let next = values
                .multiply(weights)
                .add(biases)
                .apply_function(Network::sigmoid);
            self.activations.push(values);
            values = next;
        }
        self.activations.push(values);

        Ok(())
    }

    /// Output layer activations of the last `Network::forward`.
    /// Empty if there was none yet.
    pub fn predictions(&self) -> &[f64] {
        self.activations
            .last()
            .map(|output| output.values())
            .unwrap_or(&[])
    }

    /// Backpropagates the difference between `targets` and the last forward output,
    /// updating weights and biases in place.
    ///
    /// For every layer transition, from the last one to the first:
    /// * the error for the layer below is taken through the current (not yet updated)
    /// weights: `error * weights^T`;
    /// * `gradient = error (.) sigmoid'(output) * learning_rate`;
    /// * `bias += gradient`, `weights += input^T * gradient`.
    ///
    /// # Returns
    /// * `Ok(())` if amount of targets matches output layer and there was a forward pass;
    /// * `Err(BackwardError)` otherwise, network is left untouched.
    ///
    /// # Examples
    /// ```
    /// # use spnnet::feedforward::Network;
    /// let mut net = Network::with_seed(&[2, 3, 1], 0.1, 0).unwrap();
    /// net.forward(&[1.0, 0.0]).unwrap();
    /// net.backward(&[1.0]).unwrap();
    /// ```
    pub fn backward(&mut self, targets: &[f64]) -> Result<(), BackwardError> {
        if targets.len() != self.output_size() {
            let err = BackwardError::BadTargets(SizeMismatch {
                expected: self.output_size(),
                got: targets.len(),
            });
            tracing::debug!(%err, "backward rejected");
            return Err(err);
        }
        let outputs = match self.activations.last() {
            Some(outputs) => outputs,
            None => {
                tracing::debug!("backward rejected: no forward pass yet");
                return Err(BackwardError::NotProcessed);
            }
        };

        // targets - outputs
        let mut errors = Matrix::row_vector(targets).add(&outputs.negate());

        for i in (0..self.weights.len()).rev() {
            // Must be taken before weights[i] is updated below
            let prev_errors = errors.multiply(&self.weights[i].transpose());

            let derivatives = self.activations[i + 1].apply_function(Network::sigmoid_der_s);
            let gradients = errors
                .multiply_elementwise(&derivatives)
                .multiply_scalar(self.learning_rate);
            let weight_gradients = self.activations[i].transpose().multiply(&gradients);

            self.biases[i] += &gradients;
            self.weights[i] += &weight_gradients;
            errors = prev_errors;
        }

        Ok(())
    }

    /// Calculates cost function of an output values given the desired values.
    /// Implements the formula:
    /// `sum((outputs - targets)^2)`
    ///
    /// # Returns
    /// * `Ok(f64)` if `outputs` and `targets` have the same size;
    /// * `SizeMismatch` otherwise.
    ///
    /// # Examples
    /// ```
    /// # use spnnet::feedforward::Network;
    /// let outputs = [10.0; 1000];
    /// let targets = [10.25; 1000];
    /// let cost = Network::calc_cost(&outputs, &targets).unwrap();
    /// assert_eq!(cost, 62.5);
    /// ```
    pub fn calc_cost(outputs: &[f64], targets: &[f64]) -> Result<f64, SizeMismatch> {
        if outputs.len() != targets.len() {
            return Err(SizeMismatch {
                expected: outputs.len(),
                got: targets.len(),
            });
        };

        Ok(outputs
            .iter()
            .zip(targets.iter())
            .map(|(&a, &b)| (a - b) * (a - b))
            .sum())
    }

    /// Consumes `Network` and builds `Trainer` object containing it.
    /// `seed` drives the trainer's sample selection.
    /// See `Trainer`'s documentation for details.
    pub fn build_trainer(self, seed: u64) -> Trainer {
        Trainer::build(self, seed)
    }
}

/// Error structure for `Network::new`
#[derive(Debug, Clone, PartialEq)]
pub enum NewNetworkError {
    BadTopology(usize),
    EmptyLayer(usize),
    BadLearningRate(f64),
}

impl fmt::Display for NewNetworkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            NewNetworkError::BadTopology(length) => write!(
                f,
                "Network must have at least two layers (input and output), \
                but got topology with len {}!",
                length
            ),
            NewNetworkError::EmptyLayer(index) => {
                write!(f, "Layer {} of the topology has no neurons!", index)
            }
            NewNetworkError::BadLearningRate(rate) => {
                write!(f, "Learning rate must be positive, but got {}!", rate)
            }
        }
    }
}

impl Error for NewNetworkError {}

/// Error structure for `Network::forward`
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardError {
    BadInputs(SizeMismatch),
}

impl fmt::Display for ForwardError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            ForwardError::BadInputs(SizeMismatch { expected, got }) => {
                write!(f, "Expected {} input(s), but got {}!", expected, got)
            }
        }
    }
}

impl Error for ForwardError {}

/// Error structure for `Network::backward`
#[derive(Debug, Clone, PartialEq)]
pub enum BackwardError {
    BadTargets(SizeMismatch),
    NotProcessed,
}

impl fmt::Display for BackwardError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            BackwardError::BadTargets(SizeMismatch { expected, got }) => {
                write!(f, "Expected {} target(s), but got {}!", expected, got)
            }
            BackwardError::NotProcessed => {
                write!(f, "Nothing to backpropagate, call forward first!")
            }
        }
    }
}

impl Error for BackwardError {}

/// Error structure for collections size mismatch
#[derive(Debug, Clone, PartialEq)]
pub struct SizeMismatch {
    pub expected: usize,
    pub got: usize,
}

impl fmt::Display for SizeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Expected {} values, but got {}!",
            self.expected, self.got
        )
    }
}

impl Error for SizeMismatch {}
