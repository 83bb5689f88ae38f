//! High-level circuit builder API.
//!
//! A [`Circuit`] is an ordered instruction list. Order is semantic: the
//! simulator consumes instructions strictly in sequence, and noise
//! channels attach to instructions in the order both appear. Circuits
//! compose with `+`, preserving left-then-right order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::instruction::{Instruction, InstructionKind};
use crate::parameter::{Bindings, ParameterExpression};
use crate::pauli::PauliString;
use crate::qubit::QubitId;

/// A quantum circuit.
///
/// Provides a fluent API for building circuits, with convenient methods
/// for common gates and operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// The instruction sequence.
    instructions: Vec<Instruction>,
    /// Explicit width, if declared. Otherwise inferred from operands.
    declared_qubits: Option<u32>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: vec![],
            declared_qubits: None,
        }
    }

    /// Create a circuit with an explicit number of qubits.
    ///
    /// Instructions referencing qubits at or beyond `num_qubits` are
    /// rejected with [`IrError::QubitOutOfRange`].
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            instructions: vec![],
            declared_qubits: Some(num_qubits),
        }
    }

    /// Create a circuit from pre-validated instructions.
    pub fn from_instructions(
        name: impl Into<String>,
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into_iter().collect(),
            declared_qubits: None,
        }
    }

    /// Append an instruction, validating operands.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        let mut seen = HashSet::new();
        for q in instruction.qubits() {
            if !seen.insert(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: q,
                    name: instruction.name(),
                });
            }
            if let Some(n) = self.declared_qubits {
                if q.0 >= n {
                    return Err(IrError::QubitOutOfRange {
                        qubit: q,
                        n_qubits: n,
                    });
                }
            }
        }
        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(Gate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(Gate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(Gate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(Gate::Z, qubit))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(Gate::S, qubit))
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(Gate::Sdg, qubit))
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(Gate::T, qubit))
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(Gate::Tdg, qubit))
    }

    /// Apply Rx rotation gate.
    pub fn rx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(Gate::Rx(theta.into()), qubit))
    }

    /// Apply Ry rotation gate.
    pub fn ry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(Gate::Ry(theta.into()), qubit))
    }

    /// Apply Rz rotation gate.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(Gate::Rz(theta.into()), qubit))
    }

    /// Apply phase gate.
    pub fn phase(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(Gate::Phase(theta.into()), qubit))
    }

    /// Apply universal U gate.
    pub fn u(
        &mut self,
        theta: impl Into<ParameterExpression>,
        phi: impl Into<ParameterExpression>,
        lambda: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(
            Gate::U(theta.into(), phi.into(), lambda.into()),
            qubit,
        ))
    }

    // =========================================================================
    // Controlled gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::controlled_gate(Gate::X, target, [control]))
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::controlled_gate(Gate::Y, target, [control]))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::controlled_gate(Gate::Z, target, [control]))
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::controlled_gate(Gate::H, target, [control]))
    }

    /// Apply controlled-Rx gate.
    pub fn crx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::controlled_gate(
            Gate::Rx(theta.into()),
            target,
            [control],
        ))
    }

    /// Apply controlled-Ry gate.
    pub fn cry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::controlled_gate(
            Gate::Ry(theta.into()),
            target,
            [control],
        ))
    }

    /// Apply controlled-Rz gate.
    pub fn crz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::controlled_gate(
            Gate::Rz(theta.into()),
            target,
            [control],
        ))
    }

    /// Apply controlled-phase gate.
    pub fn cp(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::controlled_gate(
            Gate::Phase(theta.into()),
            target,
            [control],
        ))
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::controlled_gate(Gate::X, target, [c1, c2]))
    }

    /// Apply a base gate with an arbitrary control set.
    pub fn controlled(
        &mut self,
        gate: Gate,
        controls: impl IntoIterator<Item = QubitId>,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::controlled_gate(gate, target, controls))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply SWAP gate.
    pub fn swap(&mut self, q0: QubitId, q1: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::swap(q0, q1))
    }

    /// Apply Fredkin (CSWAP) gate.
    pub fn cswap(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::controlled_swap(t1, t2, [control]))
    }

    /// Apply exp(-i·angle/2·P) for a Pauli string P.
    ///
    /// An identity string is a global phase and appends nothing.
    pub fn exp_pauli(
        &mut self,
        pauli: PauliString,
        angle: impl Into<ParameterExpression>,
    ) -> IrResult<&mut Self> {
        if pauli.is_identity() {
            return Ok(self);
        }
        self.push(Instruction::exp_pauli(pauli, angle))
    }

    /// Measure the given qubits in the computational basis.
    pub fn measure(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubits))
    }

    /// Measure every qubit in the circuit.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let qubits: Vec<_> = (0..self.num_qubits()).map(QubitId).collect();
        self.push(Instruction::measure(qubits))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The instruction sequence.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// True if the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The circuit width: the declared size, or the highest referenced
    /// qubit index + 1.
    pub fn num_qubits(&self) -> u32 {
        let referenced = self
            .instructions
            .iter()
            .flat_map(|i| i.qubits().map(|q| q.0 + 1).max())
            .max()
            .unwrap_or(0);
        self.declared_qubits.unwrap_or(0).max(referenced)
    }

    /// The circuit depth: longest chain of instructions sharing qubits.
    pub fn depth(&self) -> usize {
        let n = self.num_qubits() as usize;
        let mut level = vec![0usize; n];
        let mut depth = 0;
        for inst in &self.instructions {
            let d = 1 + inst
                .qubits()
                .map(|q| level[q.index()])
                .max()
                .unwrap_or(0);
            for q in inst.qubits() {
                level[q.index()] = d;
            }
            depth = depth.max(d);
        }
        depth
    }

    /// All variable names appearing in the circuit's parameters.
    pub fn parameters(&self) -> HashSet<String> {
        let mut set = HashSet::new();
        for inst in &self.instructions {
            for p in inst.parameters() {
                set.extend(p.symbols());
            }
        }
        set
    }

    /// True if any instruction carries an unbound parameter.
    pub fn is_parameterized(&self) -> bool {
        self.instructions.iter().any(Instruction::is_parameterized)
    }

    /// Bind variables across all instructions, returning a new circuit.
    ///
    /// Variables missing from `bindings` stay symbolic.
    #[must_use]
    pub fn bind_parameters(&self, bindings: &Bindings) -> Self {
        Self {
            name: self.name.clone(),
            instructions: self
                .instructions
                .iter()
                .map(|i| i.bind_values(bindings))
                .collect(),
            declared_qubits: self.declared_qubits,
        }
    }

    /// The adjoint circuit: instructions reversed and inverted.
    ///
    /// Errors with [`IrError::NonInvertible`] if the circuit contains a
    /// measurement.
    pub fn adjoint(&self) -> IrResult<Self> {
        let mut instructions = Vec::with_capacity(self.instructions.len());
        for inst in self.instructions.iter().rev() {
            instructions.push(inst.inverse()?);
        }
        Ok(Self {
            name: format!("{}_dag", self.name),
            instructions,
            declared_qubits: self.declared_qubits,
        })
    }

    /// Append all instructions of `other` after this circuit's.
    pub fn extend(&mut self, other: &Circuit) {
        self.instructions.extend(other.instructions.iter().cloned());
        self.declared_qubits = match (self.declared_qubits, other.declared_qubits) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit with measurement.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2);
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
        circuit.measure_all()?;
        Ok(circuit)
    }

    /// Create a GHZ state circuit with measurement.
    pub fn ghz(n: u32) -> IrResult<Self> {
        if n == 0 {
            return Ok(Self::new("ghz_0"));
        }
        let mut circuit = Self::with_size("ghz", n);
        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        circuit.measure_all()?;
        Ok(circuit)
    }
}

impl std::ops::Add for Circuit {
    type Output = Circuit;

    /// Concatenate two circuits, left instructions first.
    fn add(mut self, rhs: Circuit) -> Self::Output {
        self.extend(&rhs);
        self
    }
}

impl std::ops::AddAssign for Circuit {
    fn add_assign(&mut self, rhs: Circuit) {
        self.extend(&rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_width_inferred() {
        let mut circuit = Circuit::new("test");
        circuit.h(QubitId(4)).unwrap();
        assert_eq!(circuit.num_qubits(), 5);
    }

    #[test]
    fn test_declared_width_enforced() {
        let mut circuit = Circuit::with_size("test", 2);
        assert!(matches!(
            circuit.h(QubitId(2)),
            Err(IrError::QubitOutOfRange { .. })
        ));
    }

    #[test]
    fn test_duplicate_operand_rejected() {
        let mut circuit = Circuit::new("test");
        let err = circuit.cx(QubitId(0), QubitId(0)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_bell_state() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.depth(), 3); // H, CX, measure
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("test", 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .ry(PI / 4.0, QubitId(1))
            .unwrap();
        assert_eq!(circuit.len(), 3);
    }

    #[test]
    fn test_addition_preserves_order() {
        let mut left = Circuit::new("left");
        left.x(QubitId(0)).unwrap();
        let mut right = Circuit::new("right");
        right.h(QubitId(1)).unwrap();

        let combined = left + right;
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.instructions()[0].name(), "x");
        assert_eq!(combined.instructions()[1].name(), "h");
        assert_eq!(combined.num_qubits(), 2);
    }

    #[test]
    fn test_parameters_collected() {
        let mut circuit = Circuit::new("var");
        circuit
            .ry("theta", QubitId(0))
            .unwrap()
            .crz("phi", QubitId(0), QubitId(1))
            .unwrap();
        let params = circuit.parameters();
        assert_eq!(params.len(), 2);
        assert!(params.contains("theta"));
        assert!(params.contains("phi"));
    }

    #[test]
    fn test_bind_parameters() {
        let mut circuit = Circuit::new("var");
        circuit.ry("theta", QubitId(0)).unwrap();

        let mut bindings = Bindings::default();
        bindings.insert("theta".to_string(), PI / 2.0);
        let bound = circuit.bind_parameters(&bindings);
        assert!(!bound.is_parameterized());
    }

    #[test]
    fn test_adjoint_reverses() {
        let mut circuit = Circuit::new("fwd");
        circuit.h(QubitId(0)).unwrap().s(QubitId(0)).unwrap();

        let adj = circuit.adjoint().unwrap();
        assert_eq!(adj.instructions()[0].name(), "sdg");
        assert_eq!(adj.instructions()[1].name(), "h");
    }

    #[test]
    fn test_adjoint_of_measurement_fails() {
        let circuit = Circuit::bell().unwrap();
        assert!(matches!(circuit.adjoint(), Err(IrError::NonInvertible(_))));
    }

    #[test]
    fn test_identity_exp_pauli_skipped() {
        let mut circuit = Circuit::new("test");
        circuit
            .exp_pauli(PauliString::from_ops([]), 1.0)
            .unwrap();
        assert!(circuit.is_empty());
    }
}
