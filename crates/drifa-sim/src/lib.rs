//! `drifa-sim` — circuit simulation with probabilistic noise models.
//!
//! Two engines back the [`Simulator`] entry point:
//!
//! - **Statevector** for exact pure-state evolution of noiseless
//!   circuits.
//! - **Density matrix** for mixed-state evolution when a noise model is
//!   in play: after each instruction whose written arity matches a noise
//!   operation's level, the operation's channel is applied qubit-wise in
//!   Kraus form, in model order.
//!
//! Sampling draws from the measured qubits' distribution; expectation
//! values evaluate weighted Pauli sums either exactly or shot-by-shot
//! with per-term basis rotation.
//!
//! # Quick start
//!
//! ```rust
//! use drifa_ir::{Bindings, Circuit, Hamiltonian, HamiltonianTerm, QubitId};
//! use drifa_noise::{NoiseModel, NoiseSource};
//! use drifa_sim::Simulator;
//!
//! let mut circuit = Circuit::with_size("bell", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let h = Hamiltonian::from(HamiltonianTerm::zz(0, 1, 1.0));
//! let sim = Simulator::new().with_seed(7);
//!
//! let ideal = sim
//!     .expectation(&circuit, &h, &Bindings::default(), &NoiseSource::Ideal)
//!     .unwrap();
//! assert!((ideal - 1.0).abs() < 1e-10);
//!
//! let noise = NoiseSource::Model(NoiseModel::depolarizing(0.05, 2).unwrap());
//! let noisy = sim
//!     .expectation(&circuit, &h, &Bindings::default(), &noise)
//!     .unwrap();
//! assert!(noisy < ideal);
//! ```

pub mod counts;
pub mod density_matrix;
pub mod error;
pub mod simulator;
pub mod statevector;

pub use counts::Counts;
pub use density_matrix::DensityMatrix;
pub use error::{SimError, SimResult};
pub use simulator::{MAX_DENSITY_QUBITS, MAX_STATEVECTOR_QUBITS, Simulator};
pub use statevector::Statevector;
