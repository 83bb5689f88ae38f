//! Single-qubit base gates.
//!
//! Multi-qubit operations are expressed as a base gate plus a control
//! set on the owning [`crate::Instruction`]: CX is X with one control,
//! Toffoli is X with two, a controlled rotation is the rotation with one
//! control. This keeps the gate enum small and lets every unitary reduce
//! to a controlled 2×2 kernel (plus SWAP and Pauli exponentials, which
//! the instruction layer carries separately).

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

use crate::error::{IrError, IrResult};
use crate::parameter::{Bindings, ParameterExpression};

/// A single-qubit base gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around X: exp(-i θ/2 X).
    Rx(ParameterExpression),
    /// Rotation around Y: exp(-i θ/2 Y).
    Ry(ParameterExpression),
    /// Rotation around Z: exp(-i θ/2 Z).
    Rz(ParameterExpression),
    /// Phase gate: diag(1, e^{iθ}).
    Phase(ParameterExpression),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(
        ParameterExpression,
        ParameterExpression,
        ParameterExpression,
    ),
}

impl Gate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Gate::I => "id",
            Gate::X => "x",
            Gate::Y => "y",
            Gate::Z => "z",
            Gate::H => "h",
            Gate::S => "s",
            Gate::Sdg => "sdg",
            Gate::T => "t",
            Gate::Tdg => "tdg",
            Gate::Rx(_) => "rx",
            Gate::Ry(_) => "ry",
            Gate::Rz(_) => "rz",
            Gate::Phase(_) => "phase",
            Gate::U(_, _, _) => "u",
        }
    }

    /// Parameters of this gate.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            Gate::Rx(p) | Gate::Ry(p) | Gate::Rz(p) | Gate::Phase(p) => vec![p],
            Gate::U(a, b, c) => vec![a, b, c],
            _ => vec![],
        }
    }

    /// Check if this gate carries an unbound parameter.
    pub fn is_parameterized(&self) -> bool {
        self.parameters().iter().any(|p| p.is_symbolic())
    }

    /// Bind variables in the gate's parameters, returning a new gate.
    #[must_use]
    pub fn bind_values(&self, bindings: &Bindings) -> Self {
        match self {
            Gate::Rx(p) => Gate::Rx(p.bind_values(bindings)),
            Gate::Ry(p) => Gate::Ry(p.bind_values(bindings)),
            Gate::Rz(p) => Gate::Rz(p.bind_values(bindings)),
            Gate::Phase(p) => Gate::Phase(p.bind_values(bindings)),
            Gate::U(a, b, c) => Gate::U(
                a.bind_values(bindings),
                b.bind_values(bindings),
                c.bind_values(bindings),
            ),
            other => other.clone(),
        }
    }

    /// The 2×2 unitary, row-major.
    ///
    /// Errors with [`IrError::UnboundParameter`] if any parameter is
    /// still symbolic.
    pub fn matrix(&self) -> IrResult<[Complex64; 4]> {
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);

        let angle = |p: &ParameterExpression| -> IrResult<f64> {
            p.as_f64().ok_or_else(|| {
                let name = p
                    .symbols()
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| p.to_string());
                IrError::UnboundParameter(name)
            })
        };

        Ok(match self {
            Gate::I => [one, zero, zero, one],
            Gate::X => [zero, one, one, zero],
            Gate::Y => [zero, -i, i, zero],
            Gate::Z => [one, zero, zero, -one],
            Gate::H => {
                let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
                [s, s, s, -s]
            }
            Gate::S => [one, zero, zero, i],
            Gate::Sdg => [one, zero, zero, -i],
            Gate::T => [one, zero, zero, Complex64::from_polar(1.0, FRAC_PI_4)],
            Gate::Tdg => [one, zero, zero, Complex64::from_polar(1.0, -FRAC_PI_4)],
            Gate::Rx(p) => {
                let t = angle(p)?;
                let c = Complex64::new((t / 2.0).cos(), 0.0);
                let s = Complex64::new(0.0, -(t / 2.0).sin());
                [c, s, s, c]
            }
            Gate::Ry(p) => {
                let t = angle(p)?;
                let c = Complex64::new((t / 2.0).cos(), 0.0);
                let s = Complex64::new((t / 2.0).sin(), 0.0);
                [c, -s, s, c]
            }
            Gate::Rz(p) => {
                let t = angle(p)?;
                [
                    Complex64::from_polar(1.0, -t / 2.0),
                    zero,
                    zero,
                    Complex64::from_polar(1.0, t / 2.0),
                ]
            }
            Gate::Phase(p) => {
                let t = angle(p)?;
                [one, zero, zero, Complex64::from_polar(1.0, t)]
            }
            Gate::U(pt, pp, pl) => {
                let (t, phi, lam) = (angle(pt)?, angle(pp)?, angle(pl)?);
                let c = (t / 2.0).cos();
                let s = (t / 2.0).sin();
                [
                    Complex64::new(c, 0.0),
                    -Complex64::from_polar(s, lam),
                    Complex64::from_polar(s, phi),
                    Complex64::from_polar(c, phi + lam),
                ]
            }
        })
    }

    /// The inverse gate.
    ///
    /// Negated angles are constant-folded, so inverting twice returns
    /// the original gate for concrete parameters.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let neg = |p: &ParameterExpression| (-p.clone()).simplify();
        match self {
            Gate::I | Gate::X | Gate::Y | Gate::Z | Gate::H => self.clone(),
            Gate::S => Gate::Sdg,
            Gate::Sdg => Gate::S,
            Gate::T => Gate::Tdg,
            Gate::Tdg => Gate::T,
            Gate::Rx(p) => Gate::Rx(neg(p)),
            Gate::Ry(p) => Gate::Ry(neg(p)),
            Gate::Rz(p) => Gate::Rz(neg(p)),
            Gate::Phase(p) => Gate::Phase(neg(p)),
            Gate::U(t, phi, lam) => Gate::U(neg(t), neg(lam), neg(phi)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-12
    }

    fn mat_mul(a: &[Complex64; 4], b: &[Complex64; 4]) -> [Complex64; 4] {
        [
            a[0] * b[0] + a[1] * b[2],
            a[0] * b[1] + a[1] * b[3],
            a[2] * b[0] + a[3] * b[2],
            a[2] * b[1] + a[3] * b[3],
        ]
    }

    #[test]
    fn test_names() {
        assert_eq!(Gate::H.name(), "h");
        assert_eq!(Gate::Rx(ParameterExpression::pi()).name(), "rx");
    }

    #[test]
    fn test_parameterized() {
        assert!(!Gate::Rx(ParameterExpression::constant(PI)).is_parameterized());
        assert!(Gate::Rx(ParameterExpression::symbol("theta")).is_parameterized());
    }

    #[test]
    fn test_symbolic_matrix_errors() {
        let g = Gate::Ry(ParameterExpression::symbol("theta"));
        assert!(matches!(g.matrix(), Err(IrError::UnboundParameter(_))));
    }

    #[test]
    fn test_rx_pi_is_x_up_to_phase() {
        // Rx(π) = -i X
        let m = Gate::Rx(ParameterExpression::pi()).matrix().unwrap();
        let neg_i = Complex64::new(0.0, -1.0);
        assert!(approx(m[1], neg_i));
        assert!(approx(m[2], neg_i));
        assert!(approx(m[0], Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_inverse_composes_to_identity() {
        let gates = [
            Gate::H,
            Gate::S,
            Gate::T,
            Gate::Rx(ParameterExpression::constant(0.7)),
            Gate::Ry(ParameterExpression::constant(-1.3)),
            Gate::Phase(ParameterExpression::constant(0.4)),
            Gate::U(
                ParameterExpression::constant(0.3),
                ParameterExpression::constant(1.1),
                ParameterExpression::constant(-0.2),
            ),
        ];
        for g in gates {
            let m = g.matrix().unwrap();
            let inv = g.inverse().matrix().unwrap();
            let prod = mat_mul(&inv, &m);
            assert!(approx(prod[0], Complex64::new(1.0, 0.0)), "{}", g.name());
            assert!(approx(prod[1], Complex64::new(0.0, 0.0)), "{}", g.name());
            assert!(approx(prod[2], Complex64::new(0.0, 0.0)), "{}", g.name());
            assert!(approx(prod[3], Complex64::new(1.0, 0.0)), "{}", g.name());
        }
    }
}
