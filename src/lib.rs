pub mod error;
pub mod krylov_vec;
pub mod linop;
pub mod basis;
pub mod orth;
pub mod lanczos;
pub mod config;
pub mod matexp_krylov;
// dense helpers and test fixtures
pub mod mat_utils;
// python bindings
#[cfg(feature = "python")]
pub mod krylov_rspy;

pub use error::{KrylovError, Result};
pub use config::KrylovConfig;
pub use linop::{FaerLinOp, FnOp, LinearMap, MatrixLinOp};
pub use matexp_krylov::{exponentiate, ConvergenceInfo, KrylovExpm};
pub use orth::Orthogonalizer;
