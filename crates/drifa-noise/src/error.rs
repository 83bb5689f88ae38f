//! Error types for the noise crate.

use thiserror::Error;

/// Errors produced by noise-model construction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NoiseError {
    /// A channel probability was outside [0, 1].
    #[error("{channel} probability must be in [0, 1], got {value}")]
    InvalidProbability {
        /// Channel name.
        channel: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Combined damping parameters exceed unity.
    #[error(
        "phase-amplitude damping requires gamma_amp + gamma_phase <= 1, \
         got {gamma_amp} + {gamma_phase}"
    )]
    InvalidDampingSum {
        /// Amplitude damping parameter.
        gamma_amp: f64,
        /// Phase damping parameter.
        gamma_phase: f64,
    },

    /// A noise operation targets gate arity 0.
    #[error("noise level must be at least 1 (gates touch at least one qubit)")]
    InvalidLevel,

    /// Kraus operator dimension was not a power of two.
    #[error("Kraus operator dimension must be a power of 2, got {0}")]
    InvalidKrausDimension(usize),

    /// Kraus operator element count did not match its dimension.
    #[error("Kraus matrix has {got} elements, expected {expected}")]
    KrausSizeMismatch {
        /// dimension².
        expected: usize,
        /// Actual element count.
        got: usize,
    },
}

/// Result type for noise-model operations.
pub type NoiseResult<T> = Result<T, NoiseError>;
