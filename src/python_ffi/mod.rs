//! Python FFI, built with the `python` feature
use pyo3::prelude::*;

mod consumable;
pub mod feedforward;
mod gen_macros;

#[pymodule]
fn spnnet(_py: Python, m: &PyModule) -> PyResult<()> {
    feedforward::construct_module(m)?;
    Ok(())
}
