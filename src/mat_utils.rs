/// Dense helpers: tridiagonal assembly, random fixtures and approximate
/// equality checks used throughout the test suites.
use faer::prelude::*;
use faer::sparse::*;
use faer::Side;
use rand::prelude::*;
use rand_distr::StandardNormal;


/// create a matrix filled with standard normal samples
pub fn random_mat_normal(n_rows: usize, n_cols: usize) -> Mat<f64> {
    Mat::from_fn(n_rows, n_cols, |_i, _j| thread_rng().sample::<f64, _>(StandardNormal))
}


/// Random symmetric matrix with prescribed eigenvalues, Q diag(eigs) Q^T
pub fn random_sym_with_spectrum(eigs: &[f64]) -> Mat<f64> {
    let n = eigs.len();
    // eigenvectors of a random symmetric matrix give a random orthogonal Q
    let g = random_mat_normal(n, n);
    let g_sym = Mat::from_fn(n, n, |i, j| g[(i, j)] + g[(j, i)]);
    let evd = g_sym.as_ref().self_adjoint_eigen(Side::Lower)
        .expect("eigendecomposition of a small random symmetric matrix");
    let q = evd.U();
    let d = Mat::from_fn(n, n, |i, j| if i == j { eigs[i] } else { 0.0 });
    let a = q * d.as_ref() * q.transpose();
    // symmetrize away roundoff
    Mat::from_fn(n, n, |i, j| 0.5 * (a[(i, j)] + a[(j, i)]))
}

// Helper function to ensure two matrix are almost equal
pub fn mat_mat_approx_eq(a: MatRef<f64>, b: MatRef<f64>, tol: f64) {
    use assert_approx_eq::assert_approx_eq;
    assert_eq!(a.ncols(), b.ncols());
    assert_eq!(a.nrows(), b.nrows());
    for j in 0..a.ncols() {
        for i in 0..a.nrows() {
            assert_approx_eq!(a[(i, j)], b[(i, j)], tol);
        }
    }
}

/// Dense diagonal matrix
pub fn diag_mat(d: &[f64]) -> Mat<f64> {
    Mat::from_fn(d.len(), d.len(), |i, j| if i == j { d[i] } else { 0.0 })
}

/// Assemble the dense symmetric tridiagonal matrix
///
/// | a_0 b_0  0  ... |
/// | b_0 a_1 b_1 ... |
/// |  0  b_1 a_2 ... |
///
/// # Arguments
/// * `alphas` - diagonal, length k
/// * `betas` - off diagonal, at least length k-1, extra entries are ignored
pub fn sym_tridiag_dense(alphas: &[f64], betas: &[f64]) -> Mat<f64> {
    let k = alphas.len();
    let mut t = Mat::<f64>::zeros(k, k);
    for (i, &a) in alphas.iter().enumerate() {
        t[(i, i)] = a;
    }
    for (i, &b) in betas.iter().take(k.saturating_sub(1)).enumerate() {
        t[(i, i + 1)] = b;
        t[(i + 1, i)] = b;
    }
    t
}

/// Unit column vector e_i of length n
pub fn unit_vec(n: usize, i: usize) -> Mat<f64> {
    let mut e = Mat::<f64>::zeros(n, 1);
    e[(i, 0)] = 1.0;
    e
}

// Helper function to convert a dense mat to a sparse mat.
// For testing ONLY
pub fn dense_to_sprs(a: MatRef<f64>) -> SparseColMat<usize, f64> {
    // create triplets
    let mut a_triplets = Vec::new();
    for j in 0..a.ncols() {
        for i in 0..a.nrows() {
            if a[(i, j)] != 0.0 {
                a_triplets.push(Triplet::new(i, j, a[(i, j)]));
            }
        }
    }
    SparseColMat::<usize, f64>::try_new_from_triplets(a.nrows(), a.ncols(), &a_triplets)
        .expect("triplets built from a dense matrix are in bounds")
}
