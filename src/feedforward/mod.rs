//! Feedforward neural network on top of `Matrix`, trained sample by sample with backpropagation

mod net;
mod trainer;

pub use net::*;
pub use trainer::*;
