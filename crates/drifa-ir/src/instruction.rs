//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::parameter::{Bindings, ParameterExpression};
use crate::pauli::PauliString;
use crate::qubit::QubitId;

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A base gate on one target qubit.
    Gate(Gate),
    /// Exchange of two qubits.
    Swap,
    /// Pauli exponential: exp(-i · angle/2 · P).
    ExpPauli {
        /// The Pauli string P.
        pauli: PauliString,
        /// The rotation angle.
        angle: ParameterExpression,
    },
    /// Terminal measurement of the target qubits in the computational basis.
    Measure,
}

/// A complete instruction with operands.
///
/// Any unitary instruction may carry a control set: the operation is
/// applied only on basis states where every control qubit is |1⟩. CX is
/// X with one control, Toffoli is X with two, Fredkin is Swap with one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Target qubits. One for `Gate`, two for `Swap`, the measured
    /// qubits for `Measure`, the string's qubits for `ExpPauli`.
    pub targets: Vec<QubitId>,
    /// Control qubits. Empty for `Measure`.
    pub controls: Vec<QubitId>,
}

impl Instruction {
    /// Create an uncontrolled gate instruction.
    pub fn gate(gate: Gate, target: QubitId) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            targets: vec![target],
            controls: vec![],
        }
    }

    /// Create a controlled gate instruction.
    pub fn controlled_gate(
        gate: Gate,
        target: QubitId,
        controls: impl IntoIterator<Item = QubitId>,
    ) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            targets: vec![target],
            controls: controls.into_iter().collect(),
        }
    }

    /// Create a swap instruction.
    pub fn swap(q0: QubitId, q1: QubitId) -> Self {
        Self {
            kind: InstructionKind::Swap,
            targets: vec![q0, q1],
            controls: vec![],
        }
    }

    /// Create a controlled swap instruction.
    pub fn controlled_swap(
        q0: QubitId,
        q1: QubitId,
        controls: impl IntoIterator<Item = QubitId>,
    ) -> Self {
        Self {
            kind: InstructionKind::Swap,
            targets: vec![q0, q1],
            controls: controls.into_iter().collect(),
        }
    }

    /// Create a Pauli-exponential instruction exp(-i·angle/2·P).
    ///
    /// The targets are the string's qubits in ascending order.
    pub fn exp_pauli(pauli: PauliString, angle: impl Into<ParameterExpression>) -> Self {
        let targets = pauli.qubits().collect();
        Self {
            kind: InstructionKind::ExpPauli {
                pauli,
                angle: angle.into(),
            },
            targets,
            controls: vec![],
        }
    }

    /// Create a measurement instruction.
    pub fn measure(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Measure,
            targets: qubits.into_iter().collect(),
            controls: vec![],
        }
    }

    /// All operand qubits: targets first, then controls.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.targets.iter().chain(self.controls.iter()).copied()
    }

    /// The number of qubits this instruction touches as written.
    ///
    /// Noise models target instructions by this arity.
    pub fn arity(&self) -> u32 {
        (self.targets.len() + self.controls.len()) as u32
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Get the base gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// Parameters carried by this instruction.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match &self.kind {
            InstructionKind::Gate(g) => g.parameters(),
            InstructionKind::ExpPauli { angle, .. } => vec![angle],
            InstructionKind::Swap | InstructionKind::Measure => vec![],
        }
    }

    /// True if any parameter is still symbolic.
    pub fn is_parameterized(&self) -> bool {
        self.parameters().iter().any(|p| p.is_symbolic())
    }

    /// Bind variables in all parameters, returning a new instruction.
    #[must_use]
    pub fn bind_values(&self, bindings: &Bindings) -> Self {
        let kind = match &self.kind {
            InstructionKind::Gate(g) => InstructionKind::Gate(g.bind_values(bindings)),
            InstructionKind::ExpPauli { pauli, angle } => InstructionKind::ExpPauli {
                pauli: pauli.clone(),
                angle: angle.bind_values(bindings),
            },
            other => other.clone(),
        };
        Self {
            kind,
            targets: self.targets.clone(),
            controls: self.controls.clone(),
        }
    }

    /// The inverse instruction.
    ///
    /// Errors with [`IrError::NonInvertible`] for measurements.
    pub fn inverse(&self) -> IrResult<Self> {
        let kind = match &self.kind {
            InstructionKind::Gate(g) => InstructionKind::Gate(g.inverse()),
            InstructionKind::Swap => InstructionKind::Swap,
            InstructionKind::ExpPauli { pauli, angle } => InstructionKind::ExpPauli {
                pauli: pauli.clone(),
                angle: (-angle.clone()).simplify(),
            },
            InstructionKind::Measure => {
                return Err(IrError::NonInvertible(self.name()));
            }
        };
        Ok(Self {
            kind,
            targets: self.targets.clone(),
            controls: self.controls.clone(),
        })
    }

    /// Get the name of the instruction, including control prefixes.
    pub fn name(&self) -> String {
        let base = match &self.kind {
            InstructionKind::Gate(g) => g.name().to_string(),
            InstructionKind::Swap => "swap".to_string(),
            InstructionKind::ExpPauli { pauli, .. } => format!("exp[{pauli}]"),
            InstructionKind::Measure => "measure".to_string(),
        };
        if self.controls.is_empty() {
            base
        } else {
            format!("{}{}", "c".repeat(self.controls.len()), base)
        }
    }
}
