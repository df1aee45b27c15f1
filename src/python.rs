use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{Bounds, DIM};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn rows(values: Vec<[f64; DIM]>) -> Array2<f64> {
    let mut arr = Array2::<f64>::zeros((values.len(), DIM));
    for (i, row) in values.iter().enumerate() {
        for k in 0..DIM {
            arr[[i, k]] = row[k];
        }
    }
    arr
}

/// Python-facing wrapper around [`crate::core::ParticleField`].
///
/// - __new__(count, width, height, seed=None)
/// - step() / run(ticks)
/// - resize(width, height)
/// - get_positions() / get_velocities() -> np.ndarray, shape (N, 2)
/// - get_sizes() -> np.ndarray, shape (N,)
#[pyclass(name = "ParticleField")]
pub struct PyParticleField {
    field: crate::core::ParticleField,
}

#[pymethods]
impl PyParticleField {
    /// Spawn `count` bodies inside a `width` x `height` viewport.
    ///
    /// Errors: raises ValueError on count == 0 or non-positive bounds.
    #[new]
    #[pyo3(signature = (count, width, height, seed=None))]
    fn new(count: usize, width: f64, height: f64, seed: Option<u64>) -> PyResult<Self> {
        let bounds = Bounds::new(width, height).map_err(py_err)?;
        let field = crate::core::ParticleField::new(count, bounds, seed).map_err(py_err)?;
        Ok(Self { field })
    }

    /// Advance one tick; returns the number of contacts resolved.
    fn step(&mut self) -> usize {
        self.field.tick().contacts.len()
    }

    /// Advance `ticks` ticks (releases the GIL); returns the number of contacts resolved.
    fn run(&mut self, py: Python<'_>, ticks: u64) -> usize {
        py.detach(|| self.field.advance(ticks))
    }

    /// Host viewport resize.
    fn resize(&mut self, width: f64, height: f64) -> PyResult<()> {
        let bounds = Bounds::new(width, height).map_err(py_err)?;
        self.field.resize(bounds).map_err(py_err)
    }

    #[getter]
    fn ticks(&self) -> u64 {
        self.field.ticks()
    }

    fn __len__(&self) -> usize {
        self.field.len()
    }

    /// Return top-left positions as a NumPy array of shape (N, 2), dtype=float64.
    fn get_positions<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        rows(self.field.positions()).into_pyarray(py)
    }

    /// Return velocities as a NumPy array of shape (N, 2), dtype=float64.
    fn get_velocities<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
        rows(self.field.velocities()).into_pyarray(py)
    }

    /// Return diameters as a NumPy array of shape (N,), dtype=float64.
    fn get_sizes<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        let sizes: Vec<f64> = self.field.bodies().iter().map(|b| b.size).collect();
        sizes.into_pyarray(py)
    }

    /// Set all velocities from a NumPy array of shape (N, 2), dtype=float64.
    /// Values must be finite.
    fn set_velocities<'py>(&mut self, velocities: PyReadonlyArray2<'py, f64>) -> PyResult<()> {
        let arr = velocities.as_array();
        let n = self.field.len();
        if arr.shape() != [n, DIM] {
            return Err(py_err(format!(
                "velocities must have shape ({}, {}), got {:?}",
                n,
                DIM,
                arr.shape()
            )));
        }
        if !arr.iter().all(|v| v.is_finite()) {
            return Err(py_err("velocity values must be finite"));
        }
        for (i, body) in self.field.bodies_mut().iter_mut().enumerate() {
            for k in 0..DIM {
                body.velocity[k] = arr[[i, k]];
            }
        }
        Ok(())
    }
}

/// The particle_field Python module entry point.
#[pymodule]
fn particle_field(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyParticleField>()?;
    Ok(())
}
