//! Error types for the optimization crate.

use thiserror::Error;

/// Errors produced by objectives, gradients and minimizers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OptError {
    /// Simulation failed while evaluating an objective.
    #[error("Simulation error: {0}")]
    Sim(#[from] drifa_sim::SimError),

    /// Circuit IR error during gradient lowering.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] drifa_ir::IrError),

    /// A variable enters a gate the shift rule cannot differentiate.
    #[error(
        "Cannot differentiate '{name}' with respect to '{variable}': \
         the parameter-shift rule needs a linear angle on an uncontrolled \
         rotation or Pauli exponential"
    )]
    UnsupportedGradient {
        /// Offending instruction name.
        name: String,
        /// The variable being differentiated.
        variable: String,
    },

    /// The objective evaluated to NaN or infinity.
    #[error("Objective evaluated to a non-finite energy at iteration {iteration}")]
    NonFiniteEnergy {
        /// Iteration index.
        iteration: usize,
    },

    /// The objective has no variables to optimize.
    #[error("Objective has no variables to optimize")]
    NoVariables,
}

/// Result type for optimization operations.
pub type OptResult<T> = Result<T, OptError>;
