use pyo3::{exceptions::PyRuntimeError, PyErr, PyResult};

/// Holds an object that a Python handle may give away,
/// e.g. `Network.build_trainer` moves the network into the trainer.
/// Any use of the handle afterwards raises `RuntimeError`.
pub(crate) struct Consumable<T> {
    obj: Option<T>,
    name: &'static str,
}

fn consumed(name: &str) -> PyErr {
    PyRuntimeError::new_err(format!(
        "This {} object is consumed and cannot be used",
        name
    ))
}

impl<T> Consumable<T> {
    pub(crate) fn acquire(obj: T, name: &'static str) -> Self {
        Self {
            obj: Some(obj),
            name,
        }
    }

    pub(crate) fn get_ref(&self) -> PyResult<&T> {
        self.obj.as_ref().ok_or_else(|| consumed(self.name))
    }

    pub(crate) fn get_mut(&mut self) -> PyResult<&mut T> {
        let name = self.name;
        self.obj.as_mut().ok_or_else(|| consumed(name))
    }

    pub(crate) fn release(&mut self) -> PyResult<T> {
        self.obj.take().ok_or_else(|| consumed(self.name))
    }
}
