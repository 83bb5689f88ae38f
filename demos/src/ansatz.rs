//! Hardware-efficient variational ansatz.

use drifa_ir::{Circuit, IrResult, QubitId};

/// Layered Ry + CX-chain ansatz.
///
/// Each layer applies one parameterized Ry per qubit followed by a
/// linear CX entangling chain. Returns the circuit and its variable
/// names in layer-major order (`theta_<layer>_<qubit>`).
pub fn hardware_efficient(n_qubits: u32, layers: usize) -> IrResult<(Circuit, Vec<String>)> {
    let mut circuit = Circuit::with_size("hardware_efficient", n_qubits);
    let mut variables = Vec::with_capacity(layers * n_qubits as usize);

    for layer in 0..layers {
        for q in 0..n_qubits {
            let name = format!("theta_{layer}_{q}");
            circuit.ry(name.as_str(), QubitId(q))?;
            variables.push(name);
        }
        for q in 0..n_qubits.saturating_sub(1) {
            circuit.cx(QubitId(q), QubitId(q + 1))?;
        }
    }

    Ok((circuit, variables))
}
