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
// Error type shared by the Krylov factorization and exponentiate routines
use thiserror::Error;

/// Errors raised by the Lanczos machinery and the exponentiate driver.
///
/// Failing to reach the requested tolerance within `maxiter` restarts is
/// not an error; inspect [`crate::matexp_krylov::ConvergenceInfo`] instead.
#[derive(Error, Debug)]
pub enum KrylovError {
    /// Malformed input: non-finite time, zero start vector, bad option, ...
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operator output does not have the length of its input
    #[error("dimension mismatch: operator returned a vector of length {operator}, expected {vector}")]
    DimensionMismatch {
        operator: usize,
        vector: usize,
    },

    /// The residual vanished, the Krylov subspace is invariant under the operator
    #[error("invariant subspace reached at Krylov dimension {k}: residual norm below breakdown floor")]
    InvariantSubspace { k: usize },

    /// Requested code path does not exist (e.g. non-hermitian exponentiate)
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// faer's EvdError does not implement std::error::Error, so it is held as a plain field
    #[error("eigendecomposition of the projected matrix failed: {0:?}")]
    Eigendecomposition(faer::linalg::evd::EvdError),
}

pub type Result<T> = std::result::Result<T, KrylovError>;


#[cfg(test)]
mod test_error {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = KrylovError::InvariantSubspace { k: 4 };
        assert_eq!(
            err.to_string(),
            "invariant subspace reached at Krylov dimension 4: residual norm below breakdown floor");

        let err = KrylovError::DimensionMismatch { operator: 3, vector: 5 };
        assert_eq!(
            err.to_string(),
            "dimension mismatch: operator returned a vector of length 3, expected 5");

        let err = KrylovError::InvalidArgument(String::from("t must be finite"));
        assert_eq!(err.to_string(), "invalid argument: t must be finite");
    }

    #[test]
    fn test_evd_error_message() {
        let err = KrylovError::Eigendecomposition(faer::linalg::evd::EvdError::NoConvergence);
        assert_eq!(
            err.to_string(),
            "eigendecomposition of the projected matrix failed: NoConvergence");
    }
}
