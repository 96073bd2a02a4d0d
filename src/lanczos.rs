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
/// Contains the Lanczos iteration for hermitian operators.
///
/// The factorization satisfies `A V_k = V_k T_k + r e_k^T` with `T_k` real
/// symmetric tridiagonal.  The iterator holds the operator and the start
/// vector, the factorization is the mutable state it grows and shrinks.
use faer::prelude::*;
use faer::Side;
use crate::basis::OrthonormalBasis;
use crate::error::{KrylovError, Result};
use crate::krylov_vec::{KrylovScalar, KrylovVector};
use crate::linop::LinearMap;
use crate::mat_utils::{sym_tridiag_dense, unit_vec};
use crate::orth::{orthogonalize, orthogonalize_vec, Orthogonalizer};


/// Residual norm at or below which the Krylov subspace is taken to be invariant
pub fn breakdown_floor(dim: usize) -> f64 {
    (dim as f64) * f64::EPSILON
}


/// Borrowed view of a real symmetric tridiagonal matrix
#[derive(Clone, Copy, Debug)]
pub struct SymTridiagonal<'a> {
    /// diagonal, length k
    pub alphas: &'a [f64],
    /// off diagonal, only the first k-1 entries are used
    pub betas: &'a [f64],
}

impl<'a> SymTridiagonal<'a> {
    pub fn dim(&self) -> usize {
        self.alphas.len()
    }

    pub fn to_dense(&self) -> Mat<f64> {
        sym_tridiag_dense(self.alphas, self.betas)
    }

    /// Eigenvalues `d` and orthonormal eigenvectors `U` (as columns), `T = U diag(d) U^T`
    pub fn eigen(&self) -> Result<(Vec<f64>, Mat<f64>)> {
        let mut evals = Vec::with_capacity(self.dim());
        let mut evecs = Mat::zeros(0, 0);
        self.eigen_into(&mut evals, &mut evecs)?;
        Ok((evals, evecs))
    }

    /// Same as `eigen`, writing into caller owned storage.  `evecs` is resized
    /// to k x k, reusing its allocation when large enough.
    pub fn eigen_into(&self, evals: &mut Vec<f64>, evecs: &mut Mat<f64>) -> Result<()> {
        let k = self.dim();
        let t_k = self.to_dense();
        let evd = t_k.as_ref()
            .self_adjoint_eigen(Side::Lower)
            .map_err(KrylovError::Eigendecomposition)?;
        let d_lambda = evd.S();
        evals.clear();
        evals.extend((0..k).map(|i| d_lambda[i]));
        evecs.resize_with(k, k, |_i, _j| 0.0);
        evecs.as_mut().copy_from(evd.U());
        Ok(())
    }
}


/// Lanczos factorization of dimension k
#[derive(Clone, Debug)]
pub struct LanczosFactorization<V> {
    k: usize,
    basis: OrthonormalBasis<V>,
    alphas: Vec<f64>,
    /// betas[k-1] is the residual norm
    betas: Vec<f64>,
    /// unnormalized residual
    r: V,
}

impl<V> LanczosFactorization<V>
    where
    V: KrylovVector,
{
    pub fn len(&self) -> usize {
        self.k
    }

    pub fn is_empty(&self) -> bool {
        self.k == 0
    }

    pub fn basis(&self) -> &OrthonormalBasis<V> {
        &self.basis
    }

    /// Projected matrix `T_k = V_k^H A V_k`
    pub fn rayleigh_quotient(&self) -> SymTridiagonal<'_> {
        SymTridiagonal {
            alphas: &self.alphas[..self.k],
            betas: &self.betas[..self.k],
        }
    }

    pub fn residual(&self) -> &V {
        &self.r
    }

    pub fn normres(&self) -> f64 {
        self.betas[self.k - 1]
    }

    /// Vector `e_k` such that the residual term reads `r e_k^T`
    pub fn rayleigh_extension(&self) -> Mat<f64> {
        unit_vec(self.k, self.k - 1)
    }

    /// Reserve storage for a factorization of dimension `n`
    pub fn sizehint(&mut self, n: usize) {
        self.basis.reserve(n);
        self.alphas.reserve(n.saturating_sub(self.alphas.len()));
        self.betas.reserve(n.saturating_sub(self.betas.len()));
    }

    /// Destructure into `(basis, T_k dense, residual, normres)`
    pub fn into_parts(self) -> (OrthonormalBasis<V>, Mat<f64>, V, f64) {
        let t_k = sym_tridiag_dense(&self.alphas, &self.betas);
        let beta = self.betas[self.k - 1];
        (self.basis, t_k, self.r, beta)
    }
}


/// Lanczos iteration over a hermitian operator
pub struct LanczosIterator<A, V> {
    operator: A,
    x0: V,
    orth: Orthogonalizer,
    fullreorth: bool,
}

impl<A, V> LanczosIterator<A, V>
    where
    A: LinearMap<V>,
    V: KrylovVector,
{
    /// # Arguments
    /// * `operator` - hermitian linear operator
    /// * `x0` - start vector, need not be normalized
    /// * `orth` - orthogonalization used in the recurrence
    /// * `fullreorth` - reorthogonalize each new vector against the whole basis
    pub fn new(operator: A, x0: V, orth: Orthogonalizer, fullreorth: bool) -> Self {
        Self { operator, x0, orth, fullreorth }
    }

    pub fn operator(&self) -> &A {
        &self.operator
    }

    pub fn start_vector(&self) -> &V {
        &self.x0
    }

    /// Replace the start vector used by subsequent (re)initializations
    pub fn set_start_vector(&mut self, x0: V) {
        self.x0 = x0;
    }

    fn apply_checked(&self, v: &V) -> Result<V> {
        let av = self.operator.apply(v);
        if av.dim() != v.dim() {
            return Err(KrylovError::DimensionMismatch { operator: av.dim(), vector: v.dim() });
        }
        Ok(av)
    }

    /// Normalized start vector, first Lanczos step and its residual
    fn first_step(&self) -> Result<(V, f64, V, f64)> {
        let beta0 = self.x0.norm();
        if !beta0.is_finite() {
            return Err(KrylovError::InvalidArgument(String::from("start vector is not finite")));
        }
        if beta0 == 0.0 {
            return Err(KrylovError::InvalidArgument(String::from("start vector is zero")));
        }
        let mut v = self.x0.clone();
        v.scale(V::Scalar::from_real(1.0 / beta0));
        let mut r = self.apply_checked(&v)?;
        let (c, normres) = orthogonalize_vec(&mut r, &v, self.orth);
        Ok((v, c.real(), r, normres))
    }

    /// Build a factorization of dimension 1. Applies the operator once.
    pub fn initialize(&self) -> Result<LanczosFactorization<V>> {
        let (v, alpha, r, normres) = self.first_step()?;
        let mut basis = OrthonormalBasis::with_capacity(1);
        basis.push(v);
        Ok(LanczosFactorization {
            k: 1,
            basis,
            alphas: vec![alpha],
            betas: vec![normres],
            r,
        })
    }

    /// Reset `fact` to dimension 1 from the current start vector, keeping its allocations
    pub fn initialize_in_place(&self, fact: &mut LanczosFactorization<V>) -> Result<()> {
        let (v, alpha, r, normres) = self.first_step()?;
        fact.basis.truncate(0);
        fact.alphas.clear();
        fact.betas.clear();
        fact.basis.push(v);
        fact.alphas.push(alpha);
        fact.betas.push(normres);
        fact.r = r;
        fact.k = 1;
        Ok(())
    }

    /// Grow `fact` by one dimension. Applies the operator once.
    ///
    /// Fails with [`KrylovError::InvariantSubspace`], leaving `fact` untouched,
    /// when the residual is at the breakdown floor.
    pub fn expand(&self, fact: &mut LanczosFactorization<V>) -> Result<()> {
        let beta = fact.normres();
        if beta <= breakdown_floor(fact.r.dim()) {
            log::trace!("lanczos breakdown at k = {}, normres = {:e}", fact.k, beta);
            return Err(KrylovError::InvariantSubspace { k: fact.k });
        }
        let mut v = fact.r.clone();
        v.scale(V::Scalar::from_real(1.0 / beta));

        let mut w = self.apply_checked(&v)?;
        // three term recurrence
        if let Some(vold) = fact.basis.last() {
            w.axpy(V::Scalar::from_real(-beta), vold);
        }
        let (c, _) = orthogonalize_vec(&mut w, &v, self.orth);
        let mut alpha = c.real();
        fact.basis.push(v);

        if self.fullreorth {
            let (cs, _) = orthogonalize(&mut w, &fact.basis, self.orth);
            if let Some(c_last) = cs.last() {
                alpha += c_last.real();
            }
        }
        let normres = w.norm();

        fact.alphas.push(alpha);
        fact.betas.push(normres);
        fact.r = w;
        fact.k += 1;
        Ok(())
    }

    /// Truncate `fact` to dimension `newk`, the residual becomes `beta_newk v_{newk+1}`
    pub fn shrink(&self, fact: &mut LanczosFactorization<V>, newk: usize) -> Result<()> {
        if newk == 0 {
            return Err(KrylovError::InvalidArgument(String::from("cannot shrink to dimension 0")));
        }
        if newk >= fact.k {
            return Ok(());
        }
        let mut r = fact.basis[newk].clone();
        r.scale(V::Scalar::from_real(fact.betas[newk - 1]));
        fact.basis.truncate(newk);
        fact.alphas.truncate(newk);
        fact.betas.truncate(newk);
        fact.r = r;
        fact.k = newk;
        Ok(())
    }
}
