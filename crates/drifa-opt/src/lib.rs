//! `drifa-opt` — expectation-value objectives and variational minimizers.
//!
//! Builds the optimization layer on top of `drifa-sim`: pair a
//! parameterized circuit with a measurement operator into an
//! [`ExpectationValue`], combine values into an affine [`Objective`],
//! differentiate with the parameter-shift rule, and minimize with
//! gradient descent, Adam or SPSA — exactly or from shots, ideal or
//! under any noise source.
//!
//! # Quick start
//!
//! ```rust
//! use drifa_ir::{Bindings, Circuit, Hamiltonian, HamiltonianTerm, QubitId};
//! use drifa_noise::NoiseSource;
//! use drifa_opt::{ExpectationValue, Method, Objective, minimize};
//! use drifa_sim::Simulator;
//!
//! // E(θ) = ⟨Z⟩ after Ry(θ)|0⟩ = cos θ — minimum -1 at θ = π.
//! let mut circuit = Circuit::with_size("ansatz", 1);
//! circuit.ry("theta", QubitId(0)).unwrap();
//! let objective = Objective::from(ExpectationValue::new(
//!     circuit,
//!     Hamiltonian::from(HamiltonianTerm::z(0, 1.0)),
//! ));
//!
//! let mut initial = Bindings::default();
//! initial.insert("theta".to_string(), 0.5);
//!
//! let result = minimize(
//!     &objective,
//!     Method::Adam,
//!     &initial,
//!     &Simulator::new(),
//!     None,
//!     &NoiseSource::Ideal,
//! )
//! .unwrap();
//! assert!(result.best_energy < -0.99);
//! ```

pub mod error;
pub mod gradient;
pub mod minimizer;
pub mod objective;

pub use error::{OptError, OptResult};
pub use gradient::gradient;
pub use minimizer::{
    Adam, GradientDescent, IterationRecord, Method, Minimizer, OptimizeResult, Spsa, minimize,
};
pub use objective::{ExpectationValue, Objective};
