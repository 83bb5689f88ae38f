//! Shared building blocks for the Drífa demo binaries.

pub mod ansatz;
pub mod tfim;
