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
/// Scalar and vector capabilities required by the Krylov methods.
///
/// The Lanczos factorization never looks inside a vector, it only needs
/// norms, inner products, scaling and axpy.  Implementations are provided
/// for faer column matrices, ndarray 1D arrays and plain `Vec`s.
use faer::prelude::*;
use ndarray::Array1;
use num_complex::Complex64;
use num_traits::Num;
use std::fmt::Debug;
use std::ops::Neg;


/// Field scalar a Krylov vector is built over, either `f64` or `Complex64`
pub trait KrylovScalar: Num + Copy + Debug + Neg<Output = Self> + Send + Sync + 'static {
    /// true when the scalar field is the reals
    const IS_REAL: bool;

    fn from_real(x: f64) -> Self;

    /// Real part
    fn real(self) -> f64;

    /// Complex conjugate
    fn conj(self) -> Self;

    /// Absolute value, |z|
    fn modulus(self) -> f64;

    fn exp(self) -> Self;

    fn is_finite(self) -> bool;
}

impl KrylovScalar for f64 {
    const IS_REAL: bool = true;

    #[inline]
    fn from_real(x: f64) -> Self {
        x
    }

    #[inline]
    fn real(self) -> f64 {
        self
    }

    #[inline]
    fn conj(self) -> Self {
        self
    }

    #[inline]
    fn modulus(self) -> f64 {
        f64::abs(self)
    }

    #[inline]
    fn exp(self) -> Self {
        f64::exp(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

impl KrylovScalar for Complex64 {
    const IS_REAL: bool = false;

    #[inline]
    fn from_real(x: f64) -> Self {
        Complex64::new(x, 0.0)
    }

    #[inline]
    fn real(self) -> f64 {
        self.re
    }

    #[inline]
    fn conj(self) -> Self {
        Complex64::conj(&self)
    }

    #[inline]
    fn modulus(self) -> f64 {
        Complex64::norm(self)
    }

    #[inline]
    fn exp(self) -> Self {
        Complex64::exp(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        Complex64::is_finite(self)
    }
}


/// Vector-like object a Krylov subspace can be built from.
///
/// `inner` is conjugate-linear in `self`: `x.inner(y) = sum(conj(x_i) * y_i)`.
pub trait KrylovVector: Clone {
    type Scalar: KrylovScalar;

    /// Number of scalar entries
    fn dim(&self) -> usize;

    /// Euclidean norm
    fn norm(&self) -> f64;

    fn inner(&self, other: &Self) -> Self::Scalar;

    /// self <- alpha * self
    fn scale(&mut self, alpha: Self::Scalar);

    /// self <- self + alpha * x
    fn axpy(&mut self, alpha: Self::Scalar, x: &Self);

    /// Allocate a zero vector of the same shape
    fn zeros_like(&self) -> Self;
}


/// faer column vectors, stored as n x 1 matrices
impl KrylovVector for Mat<f64> {
    type Scalar = f64;

    fn dim(&self) -> usize {
        self.nrows() * self.ncols()
    }

    fn norm(&self) -> f64 {
        self.norm_l2()
    }

    fn inner(&self, other: &Self) -> f64 {
        assert_eq!(self.nrows(), other.nrows());
        assert_eq!(self.ncols(), other.ncols());
        let mut acc = 0.0;
        for j in 0..self.ncols() {
            let d: f64 = self.col(j).transpose() * other.col(j);
            acc += d;
        }
        acc
    }

    fn scale(&mut self, alpha: f64) {
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                self[(i, j)] *= alpha;
            }
        }
    }

    fn axpy(&mut self, alpha: f64, x: &Self) {
        assert_eq!(self.nrows(), x.nrows());
        assert_eq!(self.ncols(), x.ncols());
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                self[(i, j)] += alpha * x[(i, j)];
            }
        }
    }

    fn zeros_like(&self) -> Self {
        Mat::zeros(self.nrows(), self.ncols())
    }
}

impl<S> KrylovVector for Array1<S>
    where
    S: KrylovScalar
{
    type Scalar = S;

    fn dim(&self) -> usize {
        self.len()
    }

    fn norm(&self) -> f64 {
        self.iter()
            .map(|x| { let m = x.modulus(); m * m })
            .sum::<f64>()
            .sqrt()
    }

    fn inner(&self, other: &Self) -> S {
        assert_eq!(self.len(), other.len());
        self.iter()
            .zip(other.iter())
            .fold(S::zero(), |acc, (a, b)| acc + a.conj() * *b)
    }

    fn scale(&mut self, alpha: S) {
        self.mapv_inplace(|x| x * alpha);
    }

    fn axpy(&mut self, alpha: S, x: &Self) {
        self.zip_mut_with(x, |y, xi| *y = *y + alpha * *xi);
    }

    fn zeros_like(&self) -> Self {
        Array1::zeros(self.len())
    }
}

impl<S> KrylovVector for Vec<S>
    where
    S: KrylovScalar
{
    type Scalar = S;

    fn dim(&self) -> usize {
        self.len()
    }

    fn norm(&self) -> f64 {
        self.iter()
            .map(|x| { let m = x.modulus(); m * m })
            .sum::<f64>()
            .sqrt()
    }

    fn inner(&self, other: &Self) -> S {
        assert_eq!(self.len(), other.len());
        self.iter()
            .zip(other.iter())
            .fold(S::zero(), |acc, (a, b)| acc + a.conj() * *b)
    }

    fn scale(&mut self, alpha: S) {
        for x in self.iter_mut() {
            *x = *x * alpha;
        }
    }

    fn axpy(&mut self, alpha: S, x: &Self) {
        assert_eq!(self.len(), x.len());
        for (y, xi) in self.iter_mut().zip(x.iter()) {
            *y = *y + alpha * *xi;
        }
    }

    fn zeros_like(&self) -> Self {
        vec![S::zero(); self.len()]
    }
}


#[cfg(test)]
mod test_krylov_vec {
    use assert_approx_eq::assert_approx_eq;
    use ndarray::array;

    // bring everything from above (parent) module into scope
    use super::*;

    #[test]
    fn test_faer_col_ops() {
        let mut x: Mat<f64> = faer::mat![[3.0], [4.0], [0.0]];
        let y: Mat<f64> = faer::mat![[1.0], [2.0], [-1.0]];
        assert_eq!(x.dim(), 3);
        assert_approx_eq!(x.norm(), 5.0, 1e-14);
        assert_approx_eq!(x.inner(&y), 11.0, 1e-14);

        x.axpy(-2.0, &y);
        assert_approx_eq!(x[(0, 0)], 1.0, 1e-14);
        assert_approx_eq!(x[(1, 0)], 0.0, 1e-14);
        assert_approx_eq!(x[(2, 0)], 2.0, 1e-14);

        x.scale(0.5);
        assert_approx_eq!(x[(2, 0)], 1.0, 1e-14);
        assert_eq!(x.zeros_like().norm(), 0.0);
    }

    #[test]
    fn test_complex_inner_is_conjugate_linear() {
        let i = Complex64::new(0.0, 1.0);
        let x: Vec<Complex64> = vec![i, Complex64::from_real(1.0)];
        let y: Vec<Complex64> = vec![Complex64::from_real(1.0), i];
        // <x, y> = conj(i)*1 + 1*i = 0
        let xy = x.inner(&y);
        assert_approx_eq!(xy.re, 0.0, 1e-14);
        assert_approx_eq!(xy.im, 0.0, 1e-14);
        // <x, x> = |x|^2
        let xx = x.inner(&x);
        assert_approx_eq!(xx.re, 2.0, 1e-14);
        assert_approx_eq!(xx.im, 0.0, 1e-14);
        assert_approx_eq!(x.norm(), 2.0_f64.sqrt(), 1e-14);
    }

    #[test]
    fn test_ndarray_ops() {
        let mut x = array![1.0, 2.0, 2.0];
        let y = array![0.0, 1.0, 0.0];
        assert_approx_eq!(KrylovVector::norm(&x), 3.0, 1e-14);
        assert_approx_eq!(x.inner(&y), 2.0, 1e-14);
        x.axpy(-2.0, &y);
        assert_approx_eq!(x[1], 0.0, 1e-14);
        x.scale(2.0);
        assert_approx_eq!(x[2], 4.0, 1e-14);
        assert_eq!(x.zeros_like().len(), 3);
    }

    #[test]
    fn test_scalar_exp() {
        assert_approx_eq!(KrylovScalar::exp(1.0_f64), std::f64::consts::E, 1e-14);
        let z = KrylovScalar::exp(Complex64::new(0.0, std::f64::consts::PI));
        assert_approx_eq!(z.re, -1.0, 1e-14);
        assert_approx_eq!(z.im, 0.0, 1e-14);
        assert!(!KrylovScalar::is_finite(f64::NAN));
        assert!(<Complex64 as KrylovScalar>::IS_REAL == false);
    }
}
