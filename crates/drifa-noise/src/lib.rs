//! `drifa-noise` — composable probabilistic noise models.
//!
//! Noise models are ordered collections of [`NoiseOp`]s, each binding a
//! single-qubit [`NoiseChannel`] (bit flip, phase flip, amplitude damp,
//! phase damp, combined phase-amplitude damp, depolarizing) to the
//! gate-arity level it applies to. Models compose with `+`, preserving
//! order — channels applied sequentially do not commute in general, so
//! composition order is part of the model's meaning.
//!
//! Channels are represented by their Kraus decompositions; every
//! constructor validates probabilities, so a channel value that exists
//! is always a physical channel.
//!
//! # Quick start
//!
//! ```rust
//! use drifa_noise::{NoiseModel, NoiseSource};
//!
//! // 1% bit flips after every single-qubit gate, then 2% depolarizing
//! // after every two-qubit gate.
//! let model = NoiseModel::bit_flip(0.01, 1).unwrap()
//!     + NoiseModel::depolarizing(0.02, 2).unwrap();
//!
//! assert_eq!(model.len(), 2);
//! let source = NoiseSource::from(model);
//! assert!(!source.is_ideal());
//! ```

pub mod channel;
pub mod error;
pub mod kraus;
pub mod model;
pub mod profile;

pub use channel::NoiseChannel;
pub use error::{NoiseError, NoiseResult};
pub use kraus::{KrausOperator, is_complete};
pub use model::{NoiseModel, NoiseOp, NoiseSource};
pub use profile::DeviceProfile;
