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
/// Options of the Krylov exponentiate driver
use crate::error::{KrylovError, Result};
use crate::orth::Orthogonalizer;


/// Configuration of the Lanczos based exponentiate method
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KrylovConfig {
    /// max krylov dim size
    pub krylovdim: usize,
    /// requested accuracy of the result
    pub tol: f64,
    /// max number of outer restarts
    pub maxiter: usize,
    /// orthogonalization method
    pub orth: Orthogonalizer,
    /// reorthogonalize each new Lanczos vector against the whole basis
    pub fullreorth: bool,
    /// None: use what the operator reports
    pub issymmetric: Option<bool>,
    pub ishermitian: Option<bool>,
}

impl Default for KrylovConfig {
    fn default() -> Self {
        Self {
            krylovdim: 30,
            tol: 1e-12,
            maxiter: 100,
            orth: Orthogonalizer::default(),
            fullreorth: true,
            issymmetric: None,
            ishermitian: None,
        }
    }
}

impl KrylovConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_krylovdim(mut self, krylovdim: usize) -> Self {
        self.krylovdim = krylovdim;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    pub fn with_orth(mut self, orth: Orthogonalizer) -> Self {
        self.orth = orth;
        self
    }

    pub fn with_fullreorth(mut self, fullreorth: bool) -> Self {
        self.fullreorth = fullreorth;
        self
    }

    pub fn with_symmetric(mut self, issymmetric: bool) -> Self {
        self.issymmetric = Some(issymmetric);
        self
    }

    pub fn with_hermitian(mut self, ishermitian: bool) -> Self {
        self.ishermitian = Some(ishermitian);
        self
    }

    /// builder fn to set numeric solver parameters by name
    ///
    /// Boolean options treat any nonzero value as true.
    pub fn with_opt(mut self, option_str: &str, option_val: f64) -> Result<Self> {
        match option_str {
            "krylovdim" | "max_krylov_dim" => { self.krylovdim = as_count(option_str, option_val)? },
            "tol" => { self.tol = option_val },
            "maxiter" => { self.maxiter = as_count(option_str, option_val)? },
            "fullreorth" => { self.fullreorth = option_val != 0.0 },
            "issymmetric" => { self.issymmetric = Some(option_val != 0.0) },
            "ishermitian" => { self.ishermitian = Some(option_val != 0.0) },
            _ => return Err(KrylovError::InvalidArgument(
                format!("unknown option: {:?}", option_str))),
        };
        Ok(self)
    }

    /// Check the options are usable
    pub fn validate(&self) -> Result<()> {
        if self.krylovdim == 0 {
            return Err(KrylovError::InvalidArgument(String::from("krylovdim must be at least 1")));
        }
        if self.maxiter == 0 {
            return Err(KrylovError::InvalidArgument(String::from("maxiter must be at least 1")));
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(KrylovError::InvalidArgument(
                format!("tol must be finite and positive, got {:?}", self.tol)));
        }
        match self.orth {
            Orthogonalizer::ClassicalGsIr(eta) | Orthogonalizer::ModifiedGsIr(eta)
                if !(eta > 0.0 && eta < 1.0) => {
                return Err(KrylovError::InvalidArgument(
                    format!("refinement factor must lie in (0, 1), got {:?}", eta)));
            },
            _ => {},
        }
        Ok(())
    }

    /// Decide whether the Lanczos (hermitian) path applies.
    ///
    /// Explicit flags win over what the operator reports. `issymmetric`
    /// only implies hermitian for real scalars.
    pub fn resolve_hermitian(&self, scalar_is_real: bool, op_hermitian: Option<bool>) -> bool {
        if let Some(h) = self.ishermitian {
            return h;
        }
        if let Some(s) = self.issymmetric {
            if scalar_is_real {
                return s;
            }
        }
        op_hermitian.unwrap_or(false)
    }
}

fn as_count(name: &str, val: f64) -> Result<usize> {
    if val.is_finite() && val >= 0.0 && val.fract() == 0.0 {
        Ok(val as usize)
    }
    else {
        Err(KrylovError::InvalidArgument(
            format!("option {:?} must be a non-negative integer, got {:?}", name, val)))
    }
}
