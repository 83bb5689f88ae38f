//! Error types for the simulation crate.

use drifa_ir::QubitId;
use thiserror::Error;

/// Errors produced by circuit simulation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Circuit IR error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] drifa_ir::IrError),

    /// Noise model error.
    #[error("Noise model error: {0}")]
    Noise(#[from] drifa_noise::NoiseError),

    /// A unitary instruction follows a measurement on the same qubit.
    #[error("Qubit {qubit} is used after being measured — measurement is terminal")]
    GateAfterMeasure {
        /// The already-measured qubit.
        qubit: QubitId,
    },

    /// Sampling requires at least one shot.
    #[error("Sample count must be at least 1, got {0}")]
    InvalidShots(u64),

    /// Device-emulated noise was requested without a configured profile.
    #[error("NoiseSource::Device requires a device profile on the simulator")]
    NoDeviceProfile,

    /// The circuit exceeds the engine's width limit.
    #[error("Circuit has {n_qubits} qubits, {engine} engine supports at most {max}")]
    CircuitTooWide {
        /// Requested width.
        n_qubits: u32,
        /// Engine name.
        engine: &'static str,
        /// Supported maximum.
        max: u32,
    },

    /// An instruction shape the engines cannot execute.
    #[error("Cannot simulate instruction '{name}': {reason}")]
    UnsupportedInstruction {
        /// Instruction name.
        name: String,
        /// Why it cannot run.
        reason: String,
    },
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
