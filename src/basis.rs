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
/// Orthonormal basis of a Krylov subspace
use faer::prelude::*;
use std::ops::Index;
use crate::krylov_vec::{KrylovScalar, KrylovVector};


/// Ordered collection of mutually orthonormal vectors `v_1 .. v_k`.
///
/// The basis does not orthogonalize anything itself, callers push vectors
/// which went through [`crate::orth::orthonormalize`] or an equivalent
/// Lanczos step.
#[derive(Clone, Debug)]
pub struct OrthonormalBasis<V> {
    basis: Vec<V>,
}

impl<V> OrthonormalBasis<V>
    where
    V: KrylovVector,
{
    pub fn new() -> Self {
        Self { basis: Vec::new() }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self { basis: Vec::with_capacity(n) }
    }

    pub fn len(&self) -> usize {
        self.basis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.basis.is_empty()
    }

    /// Reserve room for `n` vectors in total
    pub fn reserve(&mut self, n: usize) {
        let extra = n.saturating_sub(self.basis.len());
        self.basis.reserve(extra);
    }

    pub fn push(&mut self, v: V) {
        self.basis.push(v);
    }

    pub fn pop(&mut self) -> Option<V> {
        self.basis.pop()
    }

    /// Drop every vector past the first `k`
    pub fn truncate(&mut self, k: usize) {
        self.basis.truncate(k);
    }

    pub fn get(&self, i: usize) -> Option<&V> {
        self.basis.get(i)
    }

    pub fn last(&self) -> Option<&V> {
        self.basis.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.basis.iter()
    }

    /// Expansion coefficients of `x` in the basis, `c_i = <v_i, x>`
    pub fn project(&self, x: &V) -> Vec<V::Scalar> {
        self.basis.iter().map(|v| v.inner(x)).collect()
    }

    /// Maps coefficients back to the ambient space, `y = sum_i c_i v_i`.
    ///
    /// Only the first `coeffs.len()` basis vectors are used.
    pub fn lin_comb(&self, coeffs: &[V::Scalar]) -> Option<V> {
        let first = self.basis.first()?;
        assert!(coeffs.len() <= self.basis.len());
        let mut y = first.zeros_like();
        for (v, c) in self.basis.iter().zip(coeffs.iter()) {
            y.axpy(*c, v);
        }
        Some(y)
    }

    /// Gram matrix `G[i, j] = Re <v_i, v_j>`, the identity for an orthonormal set
    pub fn gram(&self) -> Mat<f64> {
        let k = self.basis.len();
        Mat::from_fn(k, k, |i, j| self.basis[i].inner(&self.basis[j]).real())
    }
}

impl<V> Default for OrthonormalBasis<V>
    where
    V: KrylovVector,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Index<usize> for OrthonormalBasis<V> {
    type Output = V;

    fn index(&self, i: usize) -> &V {
        &self.basis[i]
    }
}
