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
/// Gram-Schmidt orthogonalization against a single vector or an orthonormal basis
use num_traits::Zero;
use crate::basis::OrthonormalBasis;
use crate::krylov_vec::{KrylovScalar, KrylovVector};

/// Max number of passes of the iterative refinement variants
pub const MAX_IR_PASSES: usize = 4;

/// Default refinement factor of the IR variants
pub const DEFAULT_IR_ETA: f64 = std::f64::consts::FRAC_1_SQRT_2;


/// Orthogonalization algorithm.
///
/// * `ClassicalGs` / `ModifiedGs` - a single pass
/// * `ClassicalGs2` / `ModifiedGs2` - one unconditional reorthogonalization pass
/// * `ClassicalGsIr(eta)` / `ModifiedGsIr(eta)` - repeat passes while the
///   norm drops below `eta` times its previous value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Orthogonalizer {
    ClassicalGs,
    ModifiedGs,
    ClassicalGs2,
    ModifiedGs2,
    ClassicalGsIr(f64),
    ModifiedGsIr(f64),
}

impl Default for Orthogonalizer {
    fn default() -> Self {
        Orthogonalizer::ClassicalGs2
    }
}

impl Orthogonalizer {
    /// Parse from a short name: cgs, mgs, cgs2, mgs2, cgsir, mgsir
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "cgs" => Some(Orthogonalizer::ClassicalGs),
            "mgs" => Some(Orthogonalizer::ModifiedGs),
            "cgs2" => Some(Orthogonalizer::ClassicalGs2),
            "mgs2" => Some(Orthogonalizer::ModifiedGs2),
            "cgsir" => Some(Orthogonalizer::ClassicalGsIr(DEFAULT_IR_ETA)),
            "mgsir" => Some(Orthogonalizer::ModifiedGsIr(DEFAULT_IR_ETA)),
            _ => None,
        }
    }

    fn is_modified(&self) -> bool {
        matches!(self,
            Orthogonalizer::ModifiedGs
            | Orthogonalizer::ModifiedGs2
            | Orthogonalizer::ModifiedGsIr(_))
    }
}


/// One classical Gram-Schmidt pass. Accumulates into `coeffs`.
fn cgs_pass<V>(v: &mut V, basis: &OrthonormalBasis<V>, coeffs: &mut [V::Scalar])
    where
    V: KrylovVector,
{
    // all projections taken from the unmodified v
    let c = basis.project(v);
    for (i, q) in basis.iter().enumerate() {
        v.axpy(-c[i], q);
        coeffs[i] = coeffs[i] + c[i];
    }
}

/// One modified Gram-Schmidt pass. Accumulates into `coeffs`.
fn mgs_pass<V>(v: &mut V, basis: &OrthonormalBasis<V>, coeffs: &mut [V::Scalar])
    where
    V: KrylovVector,
{
    for (i, q) in basis.iter().enumerate() {
        let c = q.inner(v);
        v.axpy(-c, q);
        coeffs[i] = coeffs[i] + c;
    }
}

fn gs_pass<V>(v: &mut V, basis: &OrthonormalBasis<V>, coeffs: &mut [V::Scalar], alg: Orthogonalizer)
    where
    V: KrylovVector,
{
    if alg.is_modified() {
        mgs_pass(v, basis, coeffs);
    }
    else {
        cgs_pass(v, basis, coeffs);
    }
}


/// Orthogonalize `v` in place against all vectors of `basis`.
///
/// # Returns
/// * `coeffs` - components of the original `v` along each basis vector
/// * `norm` - norm of the orthogonalized `v`
pub fn orthogonalize<V>(v: &mut V, basis: &OrthonormalBasis<V>, alg: Orthogonalizer)
    -> (Vec<V::Scalar>, f64)
    where
    V: KrylovVector,
{
    let mut coeffs = vec![V::Scalar::zero(); basis.len()];
    if basis.is_empty() {
        return (coeffs, v.norm());
    }
    match alg {
        Orthogonalizer::ClassicalGs | Orthogonalizer::ModifiedGs => {
            gs_pass(v, basis, &mut coeffs, alg);
        },
        Orthogonalizer::ClassicalGs2 | Orthogonalizer::ModifiedGs2 => {
            gs_pass(v, basis, &mut coeffs, alg);
            gs_pass(v, basis, &mut coeffs, alg);
        },
        Orthogonalizer::ClassicalGsIr(eta) | Orthogonalizer::ModifiedGsIr(eta) => {
            let mut nold = v.norm();
            gs_pass(v, basis, &mut coeffs, alg);
            let mut nnew = v.norm();
            let mut passes = 1;
            while f64::EPSILON < nnew && nnew < eta * nold && passes < MAX_IR_PASSES {
                nold = nnew;
                gs_pass(v, basis, &mut coeffs, alg);
                nnew = v.norm();
                passes += 1;
            }
            return (coeffs, nnew);
        },
    }
    let norm = v.norm();
    (coeffs, norm)
}

/// Orthogonalize `v` in place against a single unit vector `q`.
///
/// Classical and modified variants coincide for a single vector.
pub fn orthogonalize_vec<V>(v: &mut V, q: &V, alg: Orthogonalizer) -> (V::Scalar, f64)
    where
    V: KrylovVector,
{
    let mut c = q.inner(v);
    v.axpy(-c, q);
    match alg {
        Orthogonalizer::ClassicalGs | Orthogonalizer::ModifiedGs => {},
        Orthogonalizer::ClassicalGs2 | Orthogonalizer::ModifiedGs2 => {
            let dc = q.inner(v);
            v.axpy(-dc, q);
            c = c + dc;
        },
        Orthogonalizer::ClassicalGsIr(eta) | Orthogonalizer::ModifiedGsIr(eta) => {
            // v was already updated, so the norm before the first pass is |v'|^2 + |c|^2
            let mut nnew = v.norm();
            let mut nold = (nnew * nnew + c.modulus() * c.modulus()).sqrt();
            let mut passes = 1;
            while f64::EPSILON < nnew && nnew < eta * nold && passes < MAX_IR_PASSES {
                nold = nnew;
                let dc = q.inner(v);
                v.axpy(-dc, q);
                c = c + dc;
                nnew = v.norm();
                passes += 1;
            }
            return (c, nnew);
        },
    }
    let norm = v.norm();
    (c, norm)
}

/// Orthogonalize `v` against `basis` and scale it to unit norm.
///
/// `v` is left unscaled when its orthogonal part is at or below `dim*eps`,
/// signalling linear dependence on the basis.
pub fn orthonormalize<V>(v: &mut V, basis: &OrthonormalBasis<V>, alg: Orthogonalizer)
    -> (Vec<V::Scalar>, f64)
    where
    V: KrylovVector,
{
    let (coeffs, beta) = orthogonalize(v, basis, alg);
    if beta > (v.dim() as f64) * f64::EPSILON {
        v.scale(V::Scalar::from_real(1.0 / beta));
    }
    (coeffs, beta)
}
