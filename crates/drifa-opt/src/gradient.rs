//! Parameter-shift gradients.
//!
//! For a rotation exp(-i θ/2 G) with G² = I, the derivative of any
//! expectation value obeys the two-term shift rule:
//!
//!   ∂E/∂θ = [E(θ + π/2) − E(θ − π/2)] / 2
//!
//! Controlled rotations do not satisfy the rule directly, so circuits
//! are rewritten through
//! [`drifa_ir::lower::decompose_controlled_rotations`] first. Each gate
//! occurrence whose angle depends linearly on a variable contributes
//! `slope · (E⁺ − E⁻) / 2`, where E± evaluate the circuit with that
//! occurrence's angle shifted by ±π/2.

use std::f64::consts::FRAC_PI_2;

use tracing::debug;

use drifa_ir::lower::decompose_controlled_rotations;
use drifa_ir::{
    Bindings, Circuit, Gate, Instruction, InstructionKind, ParameterExpression,
};
use drifa_noise::NoiseSource;
use drifa_sim::Simulator;

use crate::error::{OptError, OptResult};
use crate::objective::{ExpectationValue, Objective};

/// Tolerance for the linearity probe of angle expressions.
const LINEARITY_TOL: f64 = 1e-9;

/// The gradient of an objective with respect to `variables`, evaluated
/// at `bindings`.
///
/// Returned components are aligned with the `variables` slice. With
/// `shots = None` each shifted evaluation is exact; otherwise every
/// evaluation is a shot-based estimate and the gradient inherits the
/// shot noise.
pub fn gradient(
    objective: &Objective,
    variables: &[String],
    simulator: &Simulator,
    bindings: &Bindings,
    shots: Option<u64>,
    noise: &NoiseSource,
) -> OptResult<Vec<f64>> {
    let mut components = vec![0.0; variables.len()];
    for (weight, ev) in objective.terms() {
        let lowered = decompose_controlled_rotations(&ev.circuit)?;
        for (k, variable) in variables.iter().enumerate() {
            let partial = expectation_partial(
                &lowered,
                ev,
                variable,
                simulator,
                bindings,
                shots,
                noise,
            )?;
            components[k] += weight * partial;
        }
    }
    debug!(?variables, ?components, "computed parameter-shift gradient");
    Ok(components)
}

/// ∂⟨H⟩/∂variable for one lowered expectation-value circuit.
fn expectation_partial(
    lowered: &Circuit,
    ev: &ExpectationValue,
    variable: &str,
    simulator: &Simulator,
    bindings: &Bindings,
    shots: Option<u64>,
    noise: &NoiseSource,
) -> OptResult<f64> {
    let mut partial = 0.0;

    for (idx, inst) in lowered.instructions().iter().enumerate() {
        let Some(angle) = shiftable_angle(inst, variable)? else {
            continue;
        };

        let slope = linear_slope(angle, variable, bindings)?;
        if slope == 0.0 {
            continue;
        }
        let theta = angle.bind_values(bindings).evaluate(&Bindings::default())?;

        let plus = with_angle(lowered, idx, theta + FRAC_PI_2);
        let minus = with_angle(lowered, idx, theta - FRAC_PI_2);

        let e_plus = evaluate_circuit(&plus, ev, simulator, bindings, shots, noise)?;
        let e_minus = evaluate_circuit(&minus, ev, simulator, bindings, shots, noise)?;
        partial += slope * (e_plus - e_minus) / 2.0;
    }

    Ok(partial)
}

/// The instruction's angle expression, if the instruction depends on
/// `variable` and the shift rule applies to it.
///
/// Instructions that depend on the variable but cannot be shifted
/// (controlled rotations that survived lowering, U gates) are errors.
fn shiftable_angle<'a>(
    inst: &'a Instruction,
    variable: &str,
) -> OptResult<Option<&'a ParameterExpression>> {
    let depends = inst
        .parameters()
        .iter()
        .any(|p| p.symbols().contains(variable));
    if !depends {
        return Ok(None);
    }

    match &inst.kind {
        InstructionKind::Gate(
            Gate::Rx(angle) | Gate::Ry(angle) | Gate::Rz(angle) | Gate::Phase(angle),
        ) if inst.controls.is_empty() => Ok(Some(angle)),
        InstructionKind::ExpPauli { angle, .. } if inst.controls.is_empty() => Ok(Some(angle)),
        _ => Err(OptError::UnsupportedGradient {
            name: inst.name(),
            variable: variable.to_string(),
        }),
    }
}

/// d(angle)/d(variable), verified linear by a three-point probe.
fn linear_slope(
    angle: &ParameterExpression,
    variable: &str,
    bindings: &Bindings,
) -> OptResult<f64> {
    let at = |v: f64| {
        angle
            .bind(variable, v)
            .bind_values(bindings)
            .evaluate(&Bindings::default())
    };
    let base = bindings.get(variable).copied().unwrap_or(0.0);
    let f0 = at(base)?;
    let f1 = at(base + 1.0)?;
    let f2 = at(base + 2.0)?;

    let slope = f1 - f0;
    if ((f2 - f1) - slope).abs() > LINEARITY_TOL {
        return Err(OptError::UnsupportedGradient {
            name: format!("angle '{angle}'"),
            variable: variable.to_string(),
        });
    }
    Ok(slope)
}

/// Clone the circuit with instruction `idx`'s angle replaced by a
/// constant.
fn with_angle(circuit: &Circuit, idx: usize, value: f64) -> Circuit {
    let mut instructions = circuit.instructions().to_vec();
    let inst = &mut instructions[idx];
    let constant = ParameterExpression::constant(value);
    inst.kind = match &inst.kind {
        InstructionKind::Gate(Gate::Rx(_)) => InstructionKind::Gate(Gate::Rx(constant)),
        InstructionKind::Gate(Gate::Ry(_)) => InstructionKind::Gate(Gate::Ry(constant)),
        InstructionKind::Gate(Gate::Rz(_)) => InstructionKind::Gate(Gate::Rz(constant)),
        InstructionKind::Gate(Gate::Phase(_)) => InstructionKind::Gate(Gate::Phase(constant)),
        InstructionKind::ExpPauli { pauli, .. } => InstructionKind::ExpPauli {
            pauli: pauli.clone(),
            angle: constant,
        },
        other => other.clone(),
    };
    Circuit::from_instructions(circuit.name(), instructions)
}

fn evaluate_circuit(
    circuit: &Circuit,
    ev: &ExpectationValue,
    simulator: &Simulator,
    bindings: &Bindings,
    shots: Option<u64>,
    noise: &NoiseSource,
) -> OptResult<f64> {
    let value = match shots {
        None => simulator.expectation(circuit, &ev.hamiltonian, bindings, noise)?,
        Some(n) => simulator.sampled_expectation(circuit, &ev.hamiltonian, bindings, n, noise)?,
    };
    Ok(value)
}
