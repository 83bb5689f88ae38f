//! Transverse-field Ising model Hamiltonians.

use drifa_ir::{Hamiltonian, HamiltonianTerm};

/// Open-chain transverse-field Ising model:
///
///   H = -J Σᵢ ZᵢZᵢ₊₁ − h Σᵢ Xᵢ
pub fn transverse_field_ising(n_qubits: u32, coupling: f64, field: f64) -> Hamiltonian {
    let mut terms = Vec::new();
    for q in 0..n_qubits.saturating_sub(1) {
        terms.push(HamiltonianTerm::zz(q, q + 1, -coupling));
    }
    for q in 0..n_qubits {
        terms.push(HamiltonianTerm::x(q, -field));
    }
    Hamiltonian::from_terms(terms)
}
