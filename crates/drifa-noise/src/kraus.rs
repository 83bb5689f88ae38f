//! Kraus operator representation of quantum channels.
//!
//! A channel transforms a density matrix ρ as ρ → Σ_i K_i ρ K_i†, where
//! the operators satisfy the completeness relation Σ_i K_i† K_i = I.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{NoiseError, NoiseResult};

/// A single Kraus operator.
///
/// The matrix is stored row-major; for an n-qubit operator it is a
/// 2^n × 2^n matrix flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KrausOperator {
    matrix: Vec<Complex64>,
    dimension: usize,
}

impl KrausOperator {
    /// Create a Kraus operator from a flattened row-major matrix.
    pub fn new(matrix: Vec<Complex64>, dimension: usize) -> NoiseResult<Self> {
        if !dimension.is_power_of_two() {
            return Err(NoiseError::InvalidKrausDimension(dimension));
        }
        if matrix.len() != dimension * dimension {
            return Err(NoiseError::KrausSizeMismatch {
                expected: dimension * dimension,
                got: matrix.len(),
            });
        }
        Ok(Self { matrix, dimension })
    }

    /// A single-qubit operator from a 2×2 row-major matrix.
    pub fn single_qubit(matrix: [Complex64; 4]) -> Self {
        Self {
            matrix: matrix.to_vec(),
            dimension: 2,
        }
    }

    /// Matrix dimension (2^n for n qubits).
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of qubits this operator acts on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.dimension.trailing_zeros() as usize
    }

    /// Matrix element at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.matrix[row * self.dimension + col]
    }

    /// The flattened row-major matrix.
    pub fn matrix(&self) -> &[Complex64] {
        &self.matrix
    }

    /// The conjugate transpose.
    #[must_use]
    pub fn adjoint(&self) -> Self {
        let mut adj = vec![Complex64::new(0.0, 0.0); self.matrix.len()];
        for row in 0..self.dimension {
            for col in 0..self.dimension {
                adj[col * self.dimension + row] = self.matrix[row * self.dimension + col].conj();
            }
        }
        Self {
            matrix: adj,
            dimension: self.dimension,
        }
    }
}

/// Check the completeness relation Σ K†K = I within `tol`.
pub fn is_complete(operators: &[KrausOperator], tol: f64) -> bool {
    let Some(first) = operators.first() else {
        return false;
    };
    let dim = first.dimension();
    if operators.iter().any(|k| k.dimension() != dim) {
        return false;
    }

    // accum = Σ K†K
    let mut accum = vec![Complex64::new(0.0, 0.0); dim * dim];
    for k in operators {
        let adj = k.adjoint();
        for row in 0..dim {
            for col in 0..dim {
                let mut sum = Complex64::new(0.0, 0.0);
                for m in 0..dim {
                    sum += adj.get(row, m) * k.get(m, col);
                }
                accum[row * dim + col] += sum;
            }
        }
    }

    for row in 0..dim {
        for col in 0..dim {
            let expected = if row == col {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            };
            if (accum[row * dim + col] - expected).norm() > tol {
                return false;
            }
        }
    }
    true
}
