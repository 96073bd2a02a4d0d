/*
 * Copyright© 2025 UT-Battelle, LLC
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */
/// Python interface to the Rust Krylov exponentiate method
///
/// Build with `--features python` (e.g. through maturin).
///
/// Both entry points return `(y, info)` where `info` is a dict with
/// keys converged, normres, numiter, numops, tol and tol_relaxed.
///
/// Recognized keyword arguments: krylovdim, tol, maxiter, fullreorth,
/// issymmetric, ishermitian (numeric or bool) and orth
/// (one of cgs, mgs, cgs2, mgs2, cgsir, mgsir).

use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1, PyReadonlyArray2};
use numpy::ndarray::Array1;
use pyo3::prelude::*;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::{pymodule, types::PyModule, PyResult, Python};
use pyo3::types::PyDict;
use std::cell::RefCell;

use crate::config::KrylovConfig;
use crate::error::KrylovError;
use crate::krylov_vec::KrylovVector;
use crate::linop::LinearMap;
use crate::matexp_krylov::{exponentiate, ConvergenceInfo};
use crate::orth::Orthogonalizer;

impl From<KrylovError> for PyErr {
    fn from(err: KrylovError) -> PyErr {
        match err {
            KrylovError::InvalidArgument(_)
            | KrylovError::DimensionMismatch { .. }
            | KrylovError::Unsupported(_) => PyValueError::new_err(err.to_string()),
            _ => PyRuntimeError::new_err(err.to_string()),
        }
    }
}

/// Linear operator backed by a python object with a `matvec` method.
///
/// A python exception raised by `matvec` is held until the solver returns,
/// the operator yields zeros in the meantime.
struct PyMatvecLinOp<'py> {
    py_linop: Bound<'py, PyAny>,
    err: RefCell<Option<PyErr>>,
}

impl<'py> PyMatvecLinOp<'py> {
    fn new(py_linop: Bound<'py, PyAny>) -> Self {
        Self { py_linop, err: RefCell::new(None) }
    }

    fn matvec(&self, x: &Array1<f64>) -> PyResult<Array1<f64>> {
        let x_np = x.clone().into_pyarray(self.py_linop.py());
        let y_py = self.py_linop.call_method1("matvec", (x_np,))?;
        let y: PyReadonlyArray1<f64> = y_py.extract()?;
        Ok(y.as_array().to_owned())
    }

    fn take_err(&self) -> Option<PyErr> {
        self.err.borrow_mut().take()
    }
}

impl<'py> LinearMap<Array1<f64>> for PyMatvecLinOp<'py> {
    fn apply(&self, x: &Array1<f64>) -> Array1<f64> {
        if self.err.borrow().is_some() {
            return x.zeros_like();
        }
        match self.matvec(x) {
            Ok(y) => y,
            Err(e) => {
                *self.err.borrow_mut() = Some(e);
                x.zeros_like()
            },
        }
    }
}

/// Build solver options from python kwargs
fn config_from_kwds<'py>(py: Python<'py>, kwds: Option<Bound<'py, PyDict>>) -> PyResult<KrylovConfig> {
    let kd = kwds.unwrap_or(PyDict::new(py));
    let mut config = KrylovConfig::default();
    for name in ["krylovdim", "tol", "maxiter", "fullreorth", "issymmetric", "ishermitian"] {
        if let Ok(val) = kd.as_ref().get_item(name).and_then(|item| item.extract::<f64>()) {
            config = config.with_opt(name, val)?;
        }
    }
    if let Ok(orth_name) = kd.as_ref().get_item("orth").and_then(|item| item.extract::<String>()) {
        let orth = Orthogonalizer::from_name(&orth_name)
            .ok_or_else(|| PyValueError::new_err(format!("unknown orth method: {:?}", orth_name)))?;
        config = config.with_orth(orth);
    }
    Ok(config)
}

fn info_to_pydict<'py, V>(py: Python<'py>, info: &ConvergenceInfo<V>) -> PyResult<Bound<'py, PyDict>> {
    let d = PyDict::new(py);
    d.set_item("converged", info.converged)?;
    d.set_item("normres", info.normres)?;
    d.set_item("numiter", info.numiter)?;
    d.set_item("numops", info.numops)?;
    d.set_item("tol", info.tol)?;
    d.set_item("tol_relaxed", info.tol_relaxed)?;
    Ok(d)
}

/// Rust expmv binding for a dense numpy matrix
///
/// * `a` - dense symmetric matrix
/// * `t` - time
/// * `x` - numpy vector
///
/// returns
/// * `y` - exp(t*a)*x
/// * `info` - convergence report
#[pyfunction]
#[pyo3(signature = (a, t, x, **kwds))]
fn expmv_rs<'py>(
    py: Python<'py>,
    a: PyReadonlyArray2<f64>,
    t: f64,
    x: PyReadonlyArray1<f64>,
    kwds: Option<Bound<'py, PyDict>>,
    )
    -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyDict>)>
{
    let config = config_from_kwds(py, kwds)?;
    let a_arr = a.as_array().to_owned();
    let x_arr = x.as_array().to_owned();
    let (y, info) = exponentiate(&a_arr, t, &x_arr, &config)?;
    let info_d = info_to_pydict(py, &info)?;
    Ok((y.into_pyarray(py), info_d))
}

/// Rust expmv binding for a python linear operator
///
/// * `linop` - python object with a `matvec(x) -> y` method.
///   Symmetry cannot be detected, pass `ishermitian=True`.
/// * `t` - time
/// * `x` - numpy vector
#[pyfunction]
#[pyo3(signature = (linop, t, x, **kwds))]
fn expmv_linop_rs<'py>(
    py: Python<'py>,
    linop: Bound<'py, PyAny>,
    t: f64,
    x: PyReadonlyArray1<f64>,
    kwds: Option<Bound<'py, PyDict>>,
    )
    -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyDict>)>
{
    let config = config_from_kwds(py, kwds)?;
    let lop = PyMatvecLinOp::new(linop);
    let x_arr = x.as_array().to_owned();
    let res = exponentiate(&lop, t, &x_arr, &config);
    if let Some(e) = lop.take_err() {
        return Err(e);
    }
    let (y, info) = res?;
    let info_d = info_to_pydict(py, &info)?;
    Ok((y.into_pyarray(py), info_d))
}

#[pymodule]
#[pyo3(name="krylov_expm")]
fn krylov_expm<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()>
{
    // Adds dense matrix exponential action
    m.add_function(wrap_pyfunction!(expmv_rs, m)?)?;

    // Adds matrix-free exponential action
    m.add_function(wrap_pyfunction!(expmv_linop_rs, m)?)?;

    Ok(())
}
