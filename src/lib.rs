//! Dense feedforward neural network with sigmoid activations, trained by backpropagation,
//! built on a small generic matrix engine.
//!
//! ```
//! use spnnet::feedforward::Network;
//!
//! let mut net = Network::with_seed(&[2, 3, 1], 0.1, 0).unwrap();
//! net.forward(&[1.0, 0.0]).unwrap();
//! net.backward(&[1.0]).unwrap();
//! println!("{:?}", net.predictions());
//! ```

pub mod feedforward;
pub mod matrix;

#[cfg(feature = "python")]
pub mod python_ffi;
