//! Recompilation routines.
//!
//! Rewrites that express composite operations through the primitive set
//! the engines (and the parameter-shift rule) handle directly:
//!
//! - Pauli exponentials exp(-i θ/2 P) via the circuit identity
//!   `exp(-i θ/2 Z⊗...⊗Z) = CNOT_ladder · Rz(θ) · CNOT_ladder†`, with
//!   basis rotations before/after to handle X and Y factors.
//! - Singly-controlled rotations via the two-CX half-angle form, after
//!   which every rotation angle obeys the two-term shift rule.
//! - SWAPs via three CXs.
//!
//! Gate count for a weight-k Pauli exponential: 2·(k-1) CX + 2·k basis
//! gates + 1 Rz.

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::instruction::{Instruction, InstructionKind};
use crate::parameter::ParameterExpression;
use crate::pauli::{PauliOp, PauliString};
use crate::qubit::QubitId;

/// The single-qubit rotation mapping the `axis` eigenbasis onto Z.
///
/// Forward (`daggered = false`):
///   X → H
///   Y → Sdg · H
///   Z → (empty)
///
/// Reverse (`daggered = true`):
///   X → H  (H is self-inverse)
///   Y → H · S
///   Z → (empty)
pub fn change_basis(target: QubitId, axis: PauliOp, daggered: bool) -> Circuit {
    Circuit::from_instructions("basis_change", basis_instructions(target, axis, daggered))
}

fn basis_instructions(target: QubitId, axis: PauliOp, daggered: bool) -> Vec<Instruction> {
    match (axis, daggered) {
        (PauliOp::X, _) => vec![Instruction::gate(Gate::H, target)],
        (PauliOp::Y, false) => vec![
            Instruction::gate(Gate::Sdg, target),
            Instruction::gate(Gate::H, target),
        ],
        (PauliOp::Y, true) => vec![
            Instruction::gate(Gate::H, target),
            Instruction::gate(Gate::S, target),
        ],
        (PauliOp::Z | PauliOp::I, _) => vec![],
    }
}

/// Expand exp(-i·angle/2·P) into basis changes, a CX ladder and one Rz.
///
/// An identity string is a pure global phase and lowers to nothing.
pub fn lower_exp_pauli(
    pauli: &PauliString,
    angle: &ParameterExpression,
) -> Vec<Instruction> {
    let ops = pauli.ops();
    if ops.is_empty() {
        return vec![];
    }

    let mut out = Vec::with_capacity(2 * ops.len() + 2 * (ops.len() - 1) + 1);

    // Basis rotations (diagonalise each Pauli into Z).
    for &(q, op) in ops {
        out.extend(basis_instructions(QubitId(q), op, false));
    }

    // CX ladder collapsing parity onto the last qubit.
    let qubits: Vec<u32> = ops.iter().map(|(q, _)| *q).collect();
    for window in qubits.windows(2) {
        out.push(Instruction::controlled_gate(
            Gate::X,
            QubitId(window[1]),
            [QubitId(window[0])],
        ));
    }

    // Rz(angle) on the last qubit.
    let target = QubitId(*qubits.last().expect("non-empty checked above"));
    out.push(Instruction::gate(Gate::Rz(angle.clone()), target));

    // Undo the ladder.
    for window in qubits.windows(2).rev() {
        out.push(Instruction::controlled_gate(
            Gate::X,
            QubitId(window[1]),
            [QubitId(window[0])],
        ));
    }

    // Undo basis rotations.
    for &(q, op) in ops {
        out.extend(basis_instructions(QubitId(q), op, true));
    }

    out
}

/// Rewrite singly-controlled Rx/Ry/Rz/Phase gates into two CXs and
/// half-angle rotations.
///
/// Multi-controlled and unparameterized instructions pass through
/// unchanged. After this rewrite every rotation parameter sits on an
/// uncontrolled gate, which is what the two-term parameter-shift rule
/// requires.
pub fn decompose_controlled_rotations(circuit: &Circuit) -> IrResult<Circuit> {
    let mut out = Circuit::with_size(circuit.name(), circuit.num_qubits());
    for inst in circuit.instructions() {
        match (&inst.kind, inst.controls.as_slice()) {
            (InstructionKind::Gate(gate), [control]) if is_rotation(gate) => {
                let target = inst.targets[0];
                append_controlled_rotation(&mut out, gate, *control, target)?;
            }
            _ => {
                out.push(inst.clone())?;
            }
        }
    }
    Ok(out)
}

/// Rewrite SWAPs (controlled or not) into CX chains.
pub fn decompose_swaps(circuit: &Circuit) -> IrResult<Circuit> {
    let mut out = Circuit::with_size(circuit.name(), circuit.num_qubits());
    for inst in circuit.instructions() {
        if let InstructionKind::Swap = inst.kind {
            let (a, b) = (inst.targets[0], inst.targets[1]);
            let mut middle_controls = inst.controls.clone();
            middle_controls.push(a);

            out.push(Instruction::controlled_gate(Gate::X, a, [b]))?;
            out.push(Instruction::controlled_gate(Gate::X, b, middle_controls))?;
            out.push(Instruction::controlled_gate(Gate::X, a, [b]))?;
        } else {
            out.push(inst.clone())?;
        }
    }
    Ok(out)
}

fn is_rotation(gate: &Gate) -> bool {
    matches!(
        gate,
        Gate::Rx(_) | Gate::Ry(_) | Gate::Rz(_) | Gate::Phase(_)
    )
}

/// The two-CX half-angle form of a singly-controlled rotation.
///
/// For R ∈ {Rz, Ry}:  CR(θ) = R(θ/2) · CX · R(-θ/2) · CX  on the target.
/// Rx conjugates the Rz form by H; Phase additionally phases the control.
fn append_controlled_rotation(
    out: &mut Circuit,
    gate: &Gate,
    control: QubitId,
    target: QubitId,
) -> IrResult<()> {
    let half = |theta: &ParameterExpression| theta.clone() * ParameterExpression::constant(0.5);

    match gate {
        Gate::Rz(theta) => {
            out.rz(half(theta), target)?;
            out.cx(control, target)?;
            out.rz(-half(theta), target)?;
            out.cx(control, target)?;
        }
        Gate::Ry(theta) => {
            out.ry(half(theta), target)?;
            out.cx(control, target)?;
            out.ry(-half(theta), target)?;
            out.cx(control, target)?;
        }
        Gate::Rx(theta) => {
            out.h(target)?;
            out.rz(half(theta), target)?;
            out.cx(control, target)?;
            out.rz(-half(theta), target)?;
            out.cx(control, target)?;
            out.h(target)?;
        }
        Gate::Phase(theta) => {
            out.phase(half(theta), control)?;
            out.phase(half(theta), target)?;
            out.cx(control, target)?;
            out.phase(-half(theta), target)?;
            out.cx(control, target)?;
        }
        other => {
            return Err(IrError::UnsupportedLowering {
                name: other.name().to_string(),
                reason: "not a rotation gate".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_basis_z_is_empty() {
        assert!(change_basis(QubitId(0), PauliOp::Z, false).is_empty());
        assert!(change_basis(QubitId(0), PauliOp::Z, true).is_empty());
    }

    #[test]
    fn test_change_basis_y_order() {
        let fwd = change_basis(QubitId(0), PauliOp::Y, false);
        let names: Vec<_> = fwd.instructions().iter().map(Instruction::name).collect();
        assert_eq!(names, ["sdg", "h"]);

        let rev = change_basis(QubitId(0), PauliOp::Y, true);
        let names: Vec<_> = rev.instructions().iter().map(Instruction::name).collect();
        assert_eq!(names, ["h", "s"]);
    }

    #[test]
    fn test_exp_pauli_single_z_is_rz() {
        let out = lower_exp_pauli(&PauliString::z(0), &ParameterExpression::constant(0.7));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name(), "rz");
    }

    #[test]
    fn test_exp_pauli_identity_is_empty() {
        let out = lower_exp_pauli(
            &PauliString::from_ops([]),
            &ParameterExpression::constant(0.7),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_exp_pauli_gate_count() {
        // weight 3, all Z: 2·2 CX + 1 Rz, no basis gates
        let out = lower_exp_pauli(
            &PauliString::zz([0, 1, 2]),
            &ParameterExpression::constant(1.0),
        );
        assert_eq!(out.len(), 5);
        assert_eq!(out[2].name(), "rz");
    }

    #[test]
    fn test_controlled_rotation_expansion() {
        let mut circuit = Circuit::new("test");
        circuit.cry(0.8, QubitId(0), QubitId(1)).unwrap();

        let lowered = decompose_controlled_rotations(&circuit).unwrap();
        let names: Vec<_> = lowered
            .instructions()
            .iter()
            .map(Instruction::name)
            .collect();
        assert_eq!(names, ["ry", "cx", "ry", "cx"]);
    }

    #[test]
    fn test_multi_controlled_rotation_passes_through() {
        let mut circuit = Circuit::new("test");
        circuit
            .controlled(
                Gate::Ry(ParameterExpression::constant(0.3)),
                [QubitId(0), QubitId(1)],
                QubitId(2),
            )
            .unwrap();

        let lowered = decompose_controlled_rotations(&circuit).unwrap();
        assert_eq!(lowered.len(), 1);
    }

    #[test]
    fn test_swap_decomposition() {
        let mut circuit = Circuit::new("test");
        circuit.swap(QubitId(0), QubitId(1)).unwrap();

        let lowered = decompose_swaps(&circuit).unwrap();
        let names: Vec<_> = lowered
            .instructions()
            .iter()
            .map(Instruction::name)
            .collect();
        assert_eq!(names, ["cx", "cx", "cx"]);
    }

    #[test]
    fn test_cswap_decomposition() {
        let mut circuit = Circuit::new("test");
        circuit.cswap(QubitId(0), QubitId(1), QubitId(2)).unwrap();

        let lowered = decompose_swaps(&circuit).unwrap();
        assert_eq!(lowered.len(), 3);
        assert_eq!(lowered.instructions()[1].name(), "ccx");
    }
}
