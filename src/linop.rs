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
/// Linear operators accessed only through their action on a vector.
///
/// Provides wrappers for dense and sparse faer matrices, faer matrix-free
/// LinOps, ndarray matrices and plain closures.
use faer::prelude::*;
use faer::matrix_free::LinOp;
use faer::sparse::{SparseColMat, SparseColMatRef};
use faer::dyn_stack::{MemBuffer, MemStack};
use ndarray::{Array1, Array2};
use crate::krylov_vec::KrylovScalar;


/// Action of a linear operator on a vector-like value.
pub trait LinearMap<V> {
    /// Computes A*x
    fn apply(&self, x: &V) -> V;

    /// Some(true) when the operator is known to be hermitian (symmetric if real),
    /// None when it cannot be determined from the representation.
    fn is_hermitian(&self) -> Option<bool> {
        None
    }
}

impl<V, A> LinearMap<V> for &A
    where
    A: LinearMap<V> + ?Sized,
{
    fn apply(&self, x: &V) -> V {
        (**self).apply(x)
    }

    fn is_hermitian(&self) -> Option<bool> {
        (**self).is_hermitian()
    }
}


/// Wraps a closure `|x| A*x` as a linear operator
#[derive(Clone, Copy)]
pub struct FnOp<F>(pub F);

impl<V, F> LinearMap<V> for FnOp<F>
    where
    F: Fn(&V) -> V,
{
    fn apply(&self, x: &V) -> V {
        (self.0)(x)
    }
}


/// Helper method to apply a faer LinOp to a vec.  Allocates the output.
pub fn apply_linop(lop: &dyn LinOp<f64>, q: MatRef<f64>) -> Mat<f64> {
    let par = faer::get_global_parallelism();
    let mut out = Mat::<f64>::zeros(lop.nrows(), q.ncols());
    let mut mem = MemBuffer::new(lop.apply_scratch(q.ncols(), par));
    lop.apply(
        out.as_mut(),
        q,
        par,
        MemStack::new(&mut mem),
        );
    out
}

/// Exact symmetry test of a dense real matrix
pub fn is_symmetric_dense(a: MatRef<f64>) -> bool {
    if a.nrows() != a.ncols() {
        return false;
    }
    for j in 0..a.ncols() {
        for i in (j + 1)..a.nrows() {
            if a[(i, j)] != a[(j, i)] {
                return false;
            }
        }
    }
    true
}

/// Sum of the stored entries at row `i` of column `j`, zero if none is stored
fn sprs_entry(a: SparseColMatRef<usize, f64>, i: usize, j: usize) -> f64 {
    a.row_idx_of_col_raw(j).iter()
        .zip(a.val_of_col(j).iter())
        .filter(|(r, _)| **r == i)
        .fold(0.0, |acc, (_, val)| acc + *val)
}

/// Exact symmetry test of a sparse real matrix.
///
/// Each stored entry (i, j) is compared with its transposed partner (j, i)
/// without densifying.  Row indices need not be sorted.
pub fn is_symmetric_sprs(a: SparseColMatRef<usize, f64>) -> bool {
    if a.nrows() != a.ncols() {
        return false;
    }
    for j in 0..a.ncols() {
        for &i in a.row_idx_of_col_raw(j) {
            if i != j && sprs_entry(a, i, j) != sprs_entry(a, j, i) {
                return false;
            }
        }
    }
    true
}


/// Any faer matrix-free LinOp.  Symmetry cannot be inspected, so it is
/// whatever the caller declares.
#[derive(Clone, Copy)]
pub struct FaerLinOp<'a> {
    lop: &'a dyn LinOp<f64>,
    hermitian: Option<bool>,
}

impl<'a> FaerLinOp<'a> {
    pub fn new(lop: &'a dyn LinOp<f64>) -> Self {
        Self { lop, hermitian: None }
    }

    pub fn with_hermitian(mut self, hermitian: bool) -> Self {
        self.hermitian = Some(hermitian);
        self
    }
}

impl<'a> LinearMap<Mat<f64>> for FaerLinOp<'a> {
    fn apply(&self, x: &Mat<f64>) -> Mat<f64> {
        apply_linop(self.lop, x.as_ref())
    }

    fn is_hermitian(&self) -> Option<bool> {
        self.hermitian
    }
}


/// Enum of faer linear operators
#[derive(Clone, Copy)]
pub enum MatrixLinOp<'a> {
    /// Matrix-free operator, symmetry unknown
    Lop(&'a dyn LinOp<f64>),
    /// Sparse matrix
    MatLop(SparseColMatRef<'a, usize, f64>),
    /// Dense matrix
    DenseLop(MatRef<'a, f64>),
}

impl<'a> LinearMap<Mat<f64>> for MatrixLinOp<'a> {
    fn apply(&self, x: &Mat<f64>) -> Mat<f64> {
        match self {
            MatrixLinOp::Lop(inner_lop) => apply_linop(*inner_lop, x.as_ref()),
            MatrixLinOp::MatLop(inner_lop) => *inner_lop * x.as_ref(),
            MatrixLinOp::DenseLop(inner_lop) => *inner_lop * x.as_ref(),
        }
    }

    fn is_hermitian(&self) -> Option<bool> {
        match self {
            MatrixLinOp::Lop(_) => None,
            MatrixLinOp::MatLop(inner_lop) => Some(is_symmetric_sprs(*inner_lop)),
            MatrixLinOp::DenseLop(inner_lop) => Some(is_symmetric_dense(*inner_lop)),
        }
    }
}

impl LinearMap<Mat<f64>> for Mat<f64> {
    fn apply(&self, x: &Mat<f64>) -> Mat<f64> {
        self.as_ref() * x.as_ref()
    }

    fn is_hermitian(&self) -> Option<bool> {
        Some(is_symmetric_dense(self.as_ref()))
    }
}

impl LinearMap<Mat<f64>> for SparseColMat<usize, f64> {
    fn apply(&self, x: &Mat<f64>) -> Mat<f64> {
        self.as_ref() * x.as_ref()
    }

    fn is_hermitian(&self) -> Option<bool> {
        Some(is_symmetric_sprs(self.as_ref()))
    }
}

impl<S> LinearMap<Array1<S>> for Array2<S>
    where
    S: KrylovScalar,
{
    fn apply(&self, x: &Array1<S>) -> Array1<S> {
        self.dot(x)
    }

    fn is_hermitian(&self) -> Option<bool> {
        let (n, m) = self.dim();
        if n != m {
            return Some(false);
        }
        for j in 0..n {
            for i in j..n {
                if self[[i, j]] != self[[j, i]].conj() {
                    return Some(false);
                }
            }
        }
        Some(true)
    }
}
