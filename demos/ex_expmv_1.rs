/// Demo showing the action of the matrix exponential on a vector for a
/// sparse 1D diffusion operator, with and without restarts.
use faer::prelude::*;
use faer::sparse::{SparseColMat, Triplet};
use krylov_expm::{exponentiate, KrylovConfig, KrylovExpm, MatrixLinOp};


/// Second order central difference Laplacian, Dirichlet boundaries
fn laplacian_1d(n: usize, dx: f64) -> SparseColMat<usize, f64> {
    let c = 1.0 / (dx * dx);
    let mut triplets = Vec::with_capacity(3 * n);
    for i in 0..n {
        triplets.push(Triplet::new(i, i, -2.0 * c));
        if i > 0 {
            triplets.push(Triplet::new(i, i - 1, c));
        }
        if i + 1 < n {
            triplets.push(Triplet::new(i, i + 1, c));
        }
    }
    SparseColMat::<usize, f64>::try_new_from_triplets(n, n, &triplets).unwrap()
}

pub fn main() {
    let n = 200;
    let dx = 1.0 / (n + 1) as f64;
    let lap = laplacian_1d(n, dx);

    // initial condition: a bump in the middle of the domain
    let u0 = Mat::from_fn(n, 1, |i, _j| {
        let x = (i + 1) as f64 * dx;
        (-200.0 * (x - 0.5) * (x - 0.5)).exp()
    });

    let dt = 1e-3;
    let expm = KrylovExpm::new(KrylovConfig::default().with_tol(1e-10));
    let (u1, info) = expm.apply(MatrixLinOp::MatLop(lap.as_ref()), dt, &u0).unwrap();
    println!("full krylov: {:?}", info);

    // same step with a tiny subspace, forces restarts
    let config = KrylovConfig::default()
        .with_krylovdim(5)
        .with_tol(1e-8)
        .with_maxiter(10_000);
    let (u1_restarted, info) = exponentiate(&lap, dt, &u0, &config).unwrap();
    println!("restarted krylov: {:?}", info);
    println!("norm(diff): {:?}", (u1.as_ref() - u1_restarted.as_ref()).norm_l2());

    // mass decays under diffusion with absorbing boundaries
    let mass0: f64 = (0..n).map(|i| u0[(i, 0)]).sum::<f64>() * dx;
    let mass1: f64 = (0..n).map(|i| u1[(i, 0)]).sum::<f64>() * dx;
    println!("mass t=0: {:?}, mass t={:?}: {:?}", mass0, dt, mass1);
}
