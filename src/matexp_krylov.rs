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
// Krylov Matrix Exponential Methods
//
// Computes exp(t*A)*x for hermitian A with a restarted Lanczos process.
// The time interval is covered in substeps whose length is picked from
// the local error estimate of
//
//  M. Hochbruck, C. Lubich and H. Selhofer.
//  Exponential Integrators for Large
//  Systems of Differential Equations.  J. Sci. Comp. 1996.
use faer::prelude::*;
use faer::matrix_free::LinOp;
use crate::config::KrylovConfig;
use crate::error::{KrylovError, Result};
use crate::krylov_vec::{KrylovScalar, KrylovVector};
use crate::lanczos::{LanczosIterator, SymTridiagonal};
use crate::linop::{FaerLinOp, LinearMap};

/// Safety factor on the step size controller
const DELTA: f64 = 0.9;


/// Outcome of an exponentiate call
#[derive(Clone, Debug)]
pub struct ConvergenceInfo<V> {
    /// 1 if the accumulated error estimate is below `tol`, else 0
    pub converged: usize,
    /// always None, the exponential action has no residual
    pub residual: Option<V>,
    /// accumulated error estimate
    pub normres: f64,
    /// number of outer (restart) iterations
    pub numiter: usize,
    /// 1 + number of Krylov expansions over all restarts.
    /// The apply done by each restart's reinitialization is not counted.
    pub numops: usize,
    /// tolerance `converged` was judged against
    pub tol: f64,
    /// requested tolerance was below machine precision and got raised
    pub tol_relaxed: bool,
}


/// Why a substep was accepted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepAcceptance {
    /// error estimate below the safety-scaled tolerance
    WithinTol,
    /// last allowed outer iteration, the remaining interval is taken
    MaxIter,
    /// step reached round-off relative to |t| and can not shrink further
    Floor,
}


/// Scratch for the small projected problem, reused across restarts
#[derive(Debug)]
pub struct ExpmWorkspace<S> {
    evals: Vec<f64>,
    evecs: Mat<f64>,
    /// exp(sgn*dtau*d_j) for the last requested step
    expd: Vec<S>,
    coeffs: Vec<S>,
}

/// `e_row^T U diag(expd) U^T e_1`
fn exp_entry<S: KrylovScalar>(evecs: &Mat<f64>, expd: &[S], row: usize) -> S {
    expd.iter().enumerate().fold(S::zero(), |acc, (j, &e)| {
        acc + S::from_real(evecs[(row, j)] * evecs[(0, j)]) * e
    })
}

impl<S> ExpmWorkspace<S>
    where
    S: KrylovScalar,
{
    pub fn new(krylovdim: usize) -> Self {
        Self {
            evals: Vec::with_capacity(krylovdim),
            evecs: Mat::zeros(0, 0),
            expd: Vec::with_capacity(krylovdim),
            coeffs: Vec::with_capacity(krylovdim),
        }
    }

    /// Eigendecomposition of the current projected matrix
    pub fn factor(&mut self, t_k: SymTridiagonal) -> Result<()> {
        t_k.eigen_into(&mut self.evals, &mut self.evecs)
    }

    fn dim(&self) -> usize {
        self.evals.len()
    }

    fn fill_exp(&mut self, sgn: S, dtau: f64) {
        self.expd.clear();
        self.expd.extend(self.evals.iter().map(|&d| (sgn * S::from_real(dtau * d)).exp()));
    }

    /// Local error per unit time, without the residual norm factor
    pub fn error_estimate(&mut self, sgn: S, dtau: f64) -> f64 {
        let last = self.dim() - 1;
        self.fill_exp(sgn, 0.5 * dtau);
        let eps1 = exp_entry(&self.evecs, &self.expd, last);
        self.fill_exp(sgn, dtau);
        let eps2 = exp_entry(&self.evecs, &self.expd, last);
        2.0 * eps1.modulus() / 3.0 + eps2.modulus() / 6.0
    }

    /// Shrinks `dtau` from the trial value until the step is acceptable.
    ///
    /// Returns the step, its error estimate and why it was accepted.  On the
    /// last outer iteration the trial step is always taken.
    pub fn select_step(
        &mut self, sgn: S, normres: f64, eta: f64,
        mut dtau: f64, min_dtau: f64, krylovdim: usize, last_iter: bool)
        -> (f64, f64, StepAcceptance)
    {
        let mut eps = normres * self.error_estimate(sgn, dtau);
        loop {
            if eps <= DELTA * eta {
                return (dtau, eps, StepAcceptance::WithinTol);
            }
            if last_iter {
                return (dtau, eps, StepAcceptance::MaxIter);
            }
            if dtau <= min_dtau {
                return (dtau, eps, StepAcceptance::Floor);
            }
            dtau = shrink_step(dtau, eps, eta, krylovdim);
            eps = normres * self.error_estimate(sgn, dtau);
        }
    }

    /// Coefficients of `exp(sgn*dtau*T) e_1` in the Lanczos basis
    pub fn step_coeffs(&mut self, sgn: S, dtau: f64) -> &[S] {
        self.fill_exp(sgn, dtau);
        let k = self.dim();
        let Self { evecs, expd, coeffs, .. } = self;
        coeffs.clear();
        coeffs.extend((0..k).map(|i| exp_entry(evecs, expd, i)));
        coeffs
    }
}


/// Round to two significant digits
fn round_sig2(x: f64) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let p = 10f64.powi(x.abs().log10().floor() as i32 - 1);
    (x / p).round() * p
}

/// Next trial step after a rejected one
fn shrink_step(dtau: f64, eps: f64, eta: f64, krylovdim: usize) -> f64 {
    if !eps.is_finite() {
        return 0.5 * dtau;
    }
    let raw = DELTA * (eta / eps).powf(1.0 / krylovdim as f64) * dtau;
    let rounded = round_sig2(raw);
    if rounded < dtau { rounded } else { raw }
}


/// Computes `y = exp(t*A)*x` for hermitian `A`.
///
/// The requested tolerance is relative to `|t|`.  Reaching `maxiter`
/// is not an error, the returned `ConvergenceInfo` reports it.
///
/// # Arguments
/// * `op` - hermitian linear operator
/// * `t` - time, real or complex depending on the vector scalar
/// * `x` - start vector
/// * `config` - solver options
pub fn exponentiate<A, V>(op: A, t: V::Scalar, x: &V, config: &KrylovConfig)
    -> Result<(V, ConvergenceInfo<V>)>
    where
    A: LinearMap<V>,
    V: KrylovVector,
{
    config.validate()?;
    if !t.is_finite() {
        return Err(KrylovError::InvalidArgument(format!("t must be finite, got {:?}", t)));
    }
    let beta0 = x.norm();
    if !beta0.is_finite() {
        return Err(KrylovError::InvalidArgument(String::from("start vector is not finite")));
    }
    if beta0 == 0.0 {
        return Err(KrylovError::InvalidArgument(String::from("start vector is zero")));
    }
    if !config.resolve_hermitian(V::Scalar::IS_REAL, op.is_hermitian()) {
        return Err(KrylovError::Unsupported(String::from(
            "exponentiate of a non-hermitian operator, set ishermitian if it is hermitian")));
    }

    let tau_total = t.modulus();
    if tau_total == 0.0 {
        let info = ConvergenceInfo {
            converged: 1,
            residual: None,
            normres: 0.0,
            numiter: 0,
            numops: 0,
            tol: config.tol,
            tol_relaxed: false,
        };
        return Ok((x.clone(), info));
    }
    let sgn = t * V::Scalar::from_real(1.0 / tau_total);

    // per unit time tolerance
    let eta_floor = (x.dim() as f64) * f64::EPSILON;
    let mut eta = config.tol / tau_total;
    let tol_relaxed = eta < eta_floor;
    if tol_relaxed {
        eta = eta_floor;
        log::warn!(
            "tolerance {:e} not reachable for |t| = {:e}, relaxed to {:e}",
            config.tol, tau_total, eta * tau_total);
    }
    let tol = eta * tau_total;
    let krylovdim = config.krylovdim;
    let maxiter = config.maxiter;

    let mut w = x.clone();
    w.scale(V::Scalar::from_real(1.0 / beta0));
    let mut beta = beta0;

    let mut iter = LanczosIterator::new(op, w, config.orth, config.fullreorth);
    let mut fact = iter.initialize()?;
    fact.sizehint(krylovdim);
    let mut ws: ExpmWorkspace<V::Scalar> = ExpmWorkspace::new(krylovdim);

    let mut numops = 1;
    let mut numiter = 1;
    let mut tau = tau_total;
    let mut dtau = tau_total;
    let mut totalerr = 0.0;

    loop {
        while fact.normres() > eta && fact.len() < krylovdim {
            match iter.expand(&mut fact) {
                Ok(()) => numops += 1,
                Err(KrylovError::InvariantSubspace { .. }) => break,
                Err(e) => return Err(e),
            }
        }
        ws.factor(fact.rayleigh_quotient())?;
        let normres = fact.normres();

        let last_iter = numiter == maxiter;
        let dtau_try = if last_iter { tau } else { dtau.min(tau) };
        let (dtau_acc, eps, acceptance) = ws.select_step(
            sgn, normres, eta, dtau_try, tau_total * f64::EPSILON, krylovdim, last_iter);
        dtau = dtau_acc;
        match acceptance {
            StepAcceptance::WithinTol => {},
            StepAcceptance::MaxIter => log::warn!(
                "maxiter {} reached, accepting remaining step {:e} with error estimate {:e}",
                maxiter, dtau, eps),
            StepAcceptance::Floor => log::warn!(
                "step {:e} at the round-off floor, accepting with error estimate {:e}",
                dtau, eps),
        }

        let coeffs = ws.step_coeffs(sgn, dtau);
        w = fact.basis().lin_comb(coeffs)
            .ok_or_else(|| KrylovError::InvalidArgument(String::from("empty Krylov basis")))?;
        totalerr += dtau * eps;
        tau = if dtau >= tau { 0.0 } else { tau - dtau };
        log::debug!(
            "expm iter {}: krylovdim = {}, dtau = {:e}, eps = {:e}, tau remaining = {:e}",
            numiter, fact.len(), dtau, eps, tau);

        if tau == 0.0 {
            w.scale(V::Scalar::from_real(beta));
            let info = ConvergenceInfo {
                converged: if totalerr < tol { 1 } else { 0 },
                residual: None,
                normres: totalerr,
                numiter,
                numops,
                tol,
                tol_relaxed,
            };
            return Ok((w, info));
        }

        // restart from the propagated vector
        let wn = w.norm();
        beta *= wn;
        w.scale(V::Scalar::from_real(1.0 / wn));
        iter.set_start_vector(w);
        iter.initialize_in_place(&mut fact)?;
        numiter += 1;
    }
}


/// Krylov methods to compute the action of the matrix exponential
#[derive(Debug, Clone, Default)]
pub struct KrylovExpm {
    config: KrylovConfig,
}

impl KrylovExpm {
    pub fn new(config: KrylovConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KrylovConfig {
        &self.config
    }

    /// Computes exp(t*A)*x
    pub fn apply<A, V>(&self, op: A, t: V::Scalar, x: &V) -> Result<(V, ConvergenceInfo<V>)>
        where
        A: LinearMap<V>,
        V: KrylovVector,
    {
        exponentiate(op, t, x, &self.config)
    }

    /// Computes exp(A*dt)*v0 when A is a faer LinOp.
    /// The LinOp must be declared hermitian via the config.
    pub fn apply_linop(&self, a_lo: &dyn LinOp<f64>, dt: f64, v0: MatRef<f64>)
        -> Result<(Mat<f64>, ConvergenceInfo<Mat<f64>>)>
    {
        exponentiate(FaerLinOp::new(a_lo), dt, &v0.to_owned(), &self.config)
    }
}


#[cfg(test)]
mod test_matexp_krylov {
    use assert_approx_eq::assert_approx_eq;
    use faer::Side;
    use num_complex::Complex64;
    use std::cell::Cell;
    use crate::linop::FnOp;
    use crate::mat_utils::{diag_mat, dense_to_sprs, random_mat_normal, random_sym_with_spectrum, unit_vec};
    use crate::orth::Orthogonalizer;

    // bring everything from above (parent) module into scope
    use super::*;

    /// exp(t*A)*x through a dense eigendecomposition
    fn expm_dense_ref(a: &Mat<f64>, t: f64, x: &Mat<f64>) -> Mat<f64> {
        let n = a.nrows();
        let evd = a.as_ref().self_adjoint_eigen(Side::Lower).unwrap();
        let u = evd.U();
        let d = evd.S();
        let ed = Mat::from_fn(n, n, |i, j| if i == j { (t * d[i]).exp() } else { 0.0 });
        u * ed.as_ref() * u.transpose() * x.as_ref()
    }

    #[test]
    fn test_round_sig2() {
        assert_approx_eq!(round_sig2(0.012345), 0.012, 1e-15);
        assert_approx_eq!(round_sig2(1234.0), 1200.0, 1e-10);
        assert_approx_eq!(round_sig2(0.0996), 0.1, 1e-15);
        assert_eq!(round_sig2(0.0), 0.0);
        assert!(shrink_step(0.99, 1.0, 0.999, 1) < 0.99);
    }

    #[test]
    fn test_expm_diag_unit_vec() {
        let a = diag_mat(&[-1.0, -2.0, -3.0, -4.0, -5.0]);
        let x = unit_vec(5, 0);
        let (y, info) = exponentiate(&a, 1.0, &x, &KrylovConfig::default()).unwrap();
        assert_approx_eq!(y[(0, 0)], (-1.0f64).exp(), 1e-12);
        for i in 1..5 {
            assert_approx_eq!(y[(i, 0)], 0.0, 1e-12);
        }
        assert_eq!(info.converged, 1);
        assert!(info.residual.is_none());
        assert!(info.normres < 1e-12);
        assert_eq!(info.numiter, 1);
        // e_1 is an eigenvector, no expansion needed
        assert_eq!(info.numops, 1);
        assert!(!info.tol_relaxed);
    }

    #[test]
    fn test_expm_diag_negative_t() {
        let lam = [0.5, 1.0, 1.5, 2.0];
        let a = diag_mat(&lam);
        let x: Mat<f64> = faer::mat![[1.0], [1.0], [1.0], [1.0]];
        let (y, info) = exponentiate(&a, -2.0, &x, &KrylovConfig::default()).unwrap();
        for i in 0..4 {
            assert_approx_eq!(y[(i, 0)], (-2.0 * lam[i]).exp(), 1e-11);
        }
        assert_eq!(info.converged, 1);
    }

    #[test]
    fn test_expm_random_sym() {
        let eigs: Vec<f64> = (0..50).map(|i| -5.0 * (i as f64) / 49.0).collect();
        let a = random_sym_with_spectrum(&eigs);
        let x = random_mat_normal(50, 1);
        let y_ref = expm_dense_ref(&a, 0.5, &x);

        let config = KrylovConfig::default().with_tol(1e-10);
        let (y, info) = exponentiate(&a, 0.5, &x, &config).unwrap();
        assert_eq!(info.converged, 1);
        let err = (y.as_ref() - y_ref.as_ref()).norm_l2() / x.norm_l2();
        assert!(err < 1e-8, "err = {:e}", err);

        // sparse operator gives the same answer
        let sprs_a = dense_to_sprs(a.as_ref());
        let (y_sprs, _) = exponentiate(&sprs_a, 0.5, &x, &config).unwrap();
        let err = (y_sprs.as_ref() - y_ref.as_ref()).norm_l2() / x.norm_l2();
        assert!(err < 1e-8, "err = {:e}", err);
    }

    #[test]
    fn test_expm_restarts() {
        let lam = [-1.0, -2.0, -3.0, -4.0, -5.0];
        let a = diag_mat(&lam);
        let x: Mat<f64> = faer::mat![[1.0], [1.0], [1.0], [1.0], [1.0]];
        let config = KrylovConfig::default()
            .with_krylovdim(2)
            .with_tol(1e-4)
            .with_maxiter(100_000);
        let (y, info) = exponentiate(&a, 1.0, &x, &config).unwrap();
        assert!(info.numiter > 1);
        assert_eq!(info.converged, 1);
        assert!(info.normres < 1e-4);
        for i in 0..5 {
            assert_approx_eq!(y[(i, 0)], lam[i].exp(), 1e-3);
        }
    }

    #[test]
    fn test_expm_maxiter_not_fatal() {
        let a = diag_mat(&[-1.0, -2.0, -3.0, -4.0, -5.0]);
        let x: Mat<f64> = faer::mat![[1.0], [1.0], [1.0], [1.0], [1.0]];
        let config = KrylovConfig::default()
            .with_krylovdim(2)
            .with_maxiter(2);
        let (_y, info) = exponentiate(&a, 1.0, &x, &config).unwrap();
        assert!(info.numiter <= 2);
        assert_eq!(info.converged, 0);
    }

    #[test]
    fn test_expm_tolerance_floor() {
        let a = diag_mat(&[-1.0, -2.0, -3.0, -4.0, -5.0]);
        let x = unit_vec(5, 0);
        let config = KrylovConfig::default().with_tol(1e-30);
        let (y, info) = exponentiate(&a, 1.0, &x, &config).unwrap();
        assert!(info.tol_relaxed);
        assert_approx_eq!(info.tol, 5.0 * f64::EPSILON, 1e-30);
        assert!(info.tol > 1e-30);
        assert_eq!(info.converged, 1);
        assert_approx_eq!(y[(0, 0)], (-1.0f64).exp(), 1e-12);
    }

    #[test]
    fn test_expm_numops_counts_applies() {
        let a = random_sym_with_spectrum(&[-3.0, -2.5, -2.0, -1.0, -0.5, 0.0, 0.25, 1.0]);
        let count = Cell::new(0usize);
        let op = FnOp(|v: &Mat<f64>| {
            count.set(count.get() + 1);
            a.as_ref() * v.as_ref()
        });
        let x = random_mat_normal(8, 1);
        let config = KrylovConfig::default().with_hermitian(true).with_tol(1e-8);
        let (_y, info) = exponentiate(&op, 0.1, &x, &config).unwrap();
        assert_eq!(info.numiter, 1);
        // one apply from initialize, the rest from expand
        assert_eq!(info.numops, count.get());
        assert!(info.numops > 1);

        // restarted run, each restart reinitializes with one uncounted apply
        count.set(0);
        let config = config.with_krylovdim(3).with_maxiter(100_000).with_tol(1e-4);
        let (_y, info) = exponentiate(&op, 2.0, &x, &config).unwrap();
        assert!(info.numiter > 1);
        assert_eq!(info.numops + (info.numiter - 1), count.get());
    }

    #[test]
    fn test_expm_numops_restarted_diag() {
        let a = diag_mat(&[-1.0, -2.0, -3.0, -4.0, -5.0]);
        let count = Cell::new(0usize);
        let op = FnOp(|v: &Mat<f64>| {
            count.set(count.get() + 1);
            a.as_ref() * v.as_ref()
        });
        let x: Mat<f64> = faer::mat![[1.0], [1.0], [1.0], [1.0], [1.0]];
        let config = KrylovConfig::default()
            .with_hermitian(true)
            .with_krylovdim(2)
            .with_tol(1e-4)
            .with_maxiter(100_000);
        let (_y, info) = exponentiate(&op, 1.0, &x, &config).unwrap();
        assert!(info.numiter > 1);
        // a 2-dim subspace takes exactly one expansion per outer iteration
        assert_eq!(info.numops, 1 + info.numiter);
        let reinits = info.numiter - 1;
        assert_eq!(count.get(), info.numops + reinits);
    }

    #[test]
    fn test_workspace_matches_dense_expm() {
        let alphas = [-1.0, -0.5, -2.0, 0.3];
        let betas = [0.7, 0.2, 1.1, 0.05];
        let t_k = SymTridiagonal { alphas: &alphas, betas: &betas };
        let dense = t_k.to_dense();
        let e1 = unit_vec(4, 0);

        let mut ws: ExpmWorkspace<f64> = ExpmWorkspace::new(4);
        ws.factor(t_k).unwrap();
        let coeffs = ws.step_coeffs(1.0, 0.8).to_vec();
        let y_ref = expm_dense_ref(&dense, 0.8, &e1);
        for i in 0..4 {
            assert_approx_eq!(coeffs[i], y_ref[(i, 0)], 1e-13);
        }
        // error estimate is built from the last row at dtau/2 and dtau
        let y_half = expm_dense_ref(&dense, 0.4, &e1);
        let expected = 2.0 * y_half[(3, 0)].abs() / 3.0 + y_ref[(3, 0)].abs() / 6.0;
        assert_approx_eq!(ws.error_estimate(1.0, 0.8), expected, 1e-13);

        // smaller problem in the same workspace
        let t_2 = SymTridiagonal { alphas: &alphas[..2], betas: &betas[..2] };
        ws.factor(t_2).unwrap();
        let coeffs = ws.step_coeffs(1.0, -0.3).to_vec();
        assert_eq!(coeffs.len(), 2);
        let y_ref = expm_dense_ref(&t_2.to_dense(), -0.3, &unit_vec(2, 0));
        for i in 0..2 {
            assert_approx_eq!(coeffs[i], y_ref[(i, 0)], 1e-13);
        }
    }

    #[test]
    fn test_select_step_acceptance() {
        // e_2^T exp(dtau*T) e_1 = sinh(dtau), so eps ~ normres*dtau/2
        let alphas = [0.0, 0.0];
        let betas = [1.0, 0.0];
        let mut ws: ExpmWorkspace<f64> = ExpmWorkspace::new(2);
        ws.factor(SymTridiagonal { alphas: &alphas, betas: &betas }).unwrap();
        let min_dtau = f64::EPSILON;

        let (dtau, eps, acc) = ws.select_step(1.0, 1e-12, 1e-6, 1.0, min_dtau, 2, false);
        assert_eq!(acc, StepAcceptance::WithinTol);
        assert_eq!(dtau, 1.0);
        assert!(eps <= DELTA * 1e-6);

        let (dtau, eps, acc) = ws.select_step(1.0, 1e-2, 1e-6, 1.0, min_dtau, 2, false);
        assert_eq!(acc, StepAcceptance::WithinTol);
        assert!(dtau < 1.0 && dtau > min_dtau);
        assert!(eps <= DELTA * 1e-6);

        // the last outer iteration keeps the trial step
        let (dtau, eps, acc) = ws.select_step(1.0, 1e-2, 1e-6, 1.0, min_dtau, 2, true);
        assert_eq!(acc, StepAcceptance::MaxIter);
        assert_eq!(dtau, 1.0);
        assert!(eps > DELTA * 1e-6);

        // a tolerance no step above round-off can meet
        let (dtau, eps, acc) = ws.select_step(1.0, 1e10, 1e-10, 1.0, min_dtau, 2, false);
        assert_eq!(acc, StepAcceptance::Floor);
        assert!(dtau <= min_dtau);
        assert!(eps > DELTA * 1e-10);
    }

    #[test]
    fn test_expm_complex_t() {
        let lam = [-1.0, -2.0, -3.0];
        let op = FnOp(move |v: &Vec<Complex64>| {
            v.iter().zip(lam.iter()).map(|(vi, l)| *vi * *l).collect::<Vec<Complex64>>()
        });
        let x = vec![Complex64::new(1.0, 0.0); 3];
        let t = Complex64::new(0.0, 1.5);
        let config = KrylovConfig::default().with_hermitian(true);
        let (y, info) = exponentiate(&op, t, &x, &config).unwrap();
        assert_eq!(info.converged, 1);
        for i in 0..3 {
            let expected = (t * lam[i]).exp();
            assert_approx_eq!(y[i].re, expected.re, 1e-10);
            assert_approx_eq!(y[i].im, expected.im, 1e-10);
        }
    }

    #[test]
    fn test_expm_t_zero() {
        let a = diag_mat(&[-1.0, -2.0]);
        let x: Mat<f64> = faer::mat![[1.0], [2.0]];
        let (y, info) = exponentiate(&a, 0.0, &x, &KrylovConfig::default()).unwrap();
        assert_eq!(y[(1, 0)], 2.0);
        assert_eq!(info.converged, 1);
        assert_eq!(info.numiter, 0);
        assert_eq!(info.numops, 0);
    }

    #[test]
    fn test_expm_invalid_args() {
        let a = diag_mat(&[-1.0, -2.0]);
        let x: Mat<f64> = faer::mat![[1.0], [2.0]];
        let cfg = KrylovConfig::default();
        assert!(matches!(exponentiate(&a, f64::NAN, &x, &cfg), Err(KrylovError::InvalidArgument(_))));
        assert!(matches!(exponentiate(&a, f64::INFINITY, &x, &cfg), Err(KrylovError::InvalidArgument(_))));
        assert!(matches!(
            exponentiate(&a, 1.0, &Mat::<f64>::zeros(2, 1), &cfg),
            Err(KrylovError::InvalidArgument(_))));
        assert!(matches!(
            exponentiate(&a, 1.0, &x, &cfg.with_krylovdim(0)),
            Err(KrylovError::InvalidArgument(_))));

        // closures have unknown symmetry unless declared
        let op = FnOp(|v: &Vec<f64>| v.clone());
        assert!(matches!(exponentiate(&op, 1.0, &vec![1.0], &cfg), Err(KrylovError::Unsupported(_))));
    }

    #[test]
    fn test_expm_nonhermitian_unsupported() {
        let a: Mat<f64> = faer::mat![
            [1.0, 2.0],
            [0.0, 1.0],
        ];
        let x: Mat<f64> = faer::mat![[1.0], [1.0]];
        let res = exponentiate(&a, 1.0, &x, &KrylovConfig::default());
        assert!(matches!(res, Err(KrylovError::Unsupported(_))));
    }

    #[test]
    fn test_krylov_expm_wrapper() {
        let a = random_sym_with_spectrum(&[-2.0, -1.5, -1.0, -0.5, 0.0, 0.5]);
        let x = random_mat_normal(6, 1);
        let y_ref = expm_dense_ref(&a, 0.3, &x);

        let expm = KrylovExpm::new(
            KrylovConfig::default().with_orth(Orthogonalizer::ModifiedGsIr(0.5)));
        let (y, info) = expm.apply(&a, 0.3, &x).unwrap();
        assert_eq!(info.converged, 1);
        assert!((y.as_ref() - y_ref.as_ref()).norm_l2() < 1e-10);

        // matrix-free LinOp must be declared hermitian
        let sprs_a = dense_to_sprs(a.as_ref());
        let sprs_ref = sprs_a.as_ref();
        assert!(matches!(
            expm.apply_linop(&sprs_ref, 0.3, x.as_ref()),
            Err(KrylovError::Unsupported(_))));
        let expm = KrylovExpm::new(KrylovConfig::default().with_hermitian(true));
        let (y_lop, _) = expm.apply_linop(&sprs_ref, 0.3, x.as_ref()).unwrap();
        assert!((y_lop.as_ref() - y_ref.as_ref()).norm_l2() < 1e-10);
    }
}
