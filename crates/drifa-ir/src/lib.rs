//! Drífa Circuit Intermediate Representation
//!
//! Core data structures for representing quantum circuits, Pauli-string
//! measurement operators and variational parameters. This crate is the
//! foundation of the Drífa simulation stack.
//!
//! # Overview
//!
//! Circuits are ordered instruction lists. Order is semantic throughout
//! the stack: the engines consume instructions strictly in sequence, and
//! noise channels attach to instructions in the order both appear.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] for addressing
//! - **Gates**: [`Gate`] — single-qubit base gates; multi-qubit
//!   operations are a base gate plus a control set on the [`Instruction`]
//! - **Parameters**: [`ParameterExpression`] for symbolic angles in
//!   variational circuits, with [`Bindings`] maps for their values
//! - **Paulis**: [`PauliString`] and [`Hamiltonian`] measurement operators
//! - **Circuit**: [`Circuit`] fluent builder with `+` composition
//! - **Lowering**: [`lower`] recompilation routines (Pauli exponentials,
//!   controlled rotations, swaps)
//!
//! # Example: Building a Bell pair
//!
//! ```rust
//! use drifa_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 3);
//! ```
//!
//! # Example: Parameterized circuit
//!
//! ```rust
//! use drifa_ir::{Bindings, Circuit, QubitId};
//! use std::f64::consts::PI;
//!
//! let mut circuit = Circuit::new("variational");
//! circuit.ry("theta", QubitId(0)).unwrap();
//!
//! let mut values = Bindings::default();
//! values.insert("theta".to_string(), PI / 4.0);
//! let bound = circuit.bind_parameters(&values);
//! assert!(!bound.is_parameterized());
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod hamiltonian;
pub mod instruction;
pub mod lower;
pub mod parameter;
pub mod pauli;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::Gate;
pub use hamiltonian::{Hamiltonian, HamiltonianTerm};
pub use instruction::{Instruction, InstructionKind};
pub use parameter::{Bindings, ParameterExpression};
pub use pauli::{PauliOp, PauliString};
pub use qubit::QubitId;
