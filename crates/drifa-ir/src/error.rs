//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Instruction references a qubit outside the circuit's declared width.
    #[error("Qubit {qubit} is out of range for a circuit of {n_qubits} qubits")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Declared circuit width.
        n_qubits: u32,
    },

    /// The same qubit appears more than once in an instruction's operands.
    #[error("Duplicate qubit {qubit} in '{name}' operands")]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Instruction name for context.
        name: String,
    },

    /// A parameter symbol had no value bound at evaluation time.
    #[error("Parameter '{0}' is unbound")]
    UnboundParameter(String),

    /// A parameter expression divided by zero during evaluation.
    #[error("Division by zero while evaluating parameter expression '{0}'")]
    DivisionByZero(String),

    /// The instruction has no inverse.
    #[error("Instruction '{0}' is not invertible")]
    NonInvertible(String),

    /// An instruction kind the requested transformation cannot handle.
    #[error("Cannot lower instruction '{name}': {reason}")]
    UnsupportedLowering {
        /// Instruction name.
        name: String,
        /// Why the lowering failed.
        reason: String,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
