//! Expectation-value objectives.
//!
//! An [`ExpectationValue`] pairs a state-preparation circuit U with a
//! measurement operator H; its value is ⟨0|U† H U|0⟩. An [`Objective`]
//! is an affine combination Σ wᵢ·Eᵢ + c of expectation values, built
//! with ordinary `+`, `-`, `*` operators.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use drifa_ir::{Bindings, Circuit, Hamiltonian};
use drifa_noise::NoiseSource;
use drifa_sim::Simulator;

use crate::error::OptResult;

/// ⟨H⟩ evaluated on the state a circuit prepares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationValue {
    /// State-preparation circuit U.
    pub circuit: Circuit,
    /// Measurement operator H.
    pub hamiltonian: Hamiltonian,
}

impl ExpectationValue {
    /// Pair a circuit with a measurement operator.
    pub fn new(circuit: Circuit, hamiltonian: Hamiltonian) -> Self {
        Self {
            circuit,
            hamiltonian,
        }
    }

    /// The variables of the underlying circuit.
    pub fn variables(&self) -> HashSet<String> {
        self.circuit.parameters()
    }

    /// Evaluate under the given bindings.
    ///
    /// With `shots = None` the value is exact; otherwise it is the
    /// shot-based estimate.
    pub fn evaluate(
        &self,
        simulator: &Simulator,
        bindings: &Bindings,
        shots: Option<u64>,
        noise: &NoiseSource,
    ) -> OptResult<f64> {
        let value = match shots {
            None => simulator.expectation(&self.circuit, &self.hamiltonian, bindings, noise)?,
            Some(n) => simulator.sampled_expectation(
                &self.circuit,
                &self.hamiltonian,
                bindings,
                n,
                noise,
            )?,
        };
        Ok(value)
    }
}

/// An affine combination of expectation values: Σ wᵢ·Eᵢ + c.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Objective {
    terms: Vec<(f64, ExpectationValue)>,
    constant: f64,
}

impl Objective {
    /// A constant objective.
    pub fn constant(value: f64) -> Self {
        Self {
            terms: vec![],
            constant: value,
        }
    }

    /// The weighted expectation values.
    pub fn terms(&self) -> &[(f64, ExpectationValue)] {
        &self.terms
    }

    /// The constant offset.
    pub fn offset(&self) -> f64 {
        self.constant
    }

    /// Union of all circuit variables.
    pub fn variables(&self) -> HashSet<String> {
        let mut set = HashSet::new();
        for (_, ev) in &self.terms {
            set.extend(ev.variables());
        }
        set
    }

    /// Evaluate under the given bindings.
    pub fn evaluate(
        &self,
        simulator: &Simulator,
        bindings: &Bindings,
        shots: Option<u64>,
        noise: &NoiseSource,
    ) -> OptResult<f64> {
        let mut total = self.constant;
        for (weight, ev) in &self.terms {
            total += weight * ev.evaluate(simulator, bindings, shots, noise)?;
        }
        Ok(total)
    }
}

impl From<ExpectationValue> for Objective {
    fn from(ev: ExpectationValue) -> Self {
        Self {
            terms: vec![(1.0, ev)],
            constant: 0.0,
        }
    }
}

impl std::ops::Add for Objective {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
        self
    }
}

impl std::ops::Add<f64> for Objective {
    type Output = Self;

    fn add(mut self, rhs: f64) -> Self::Output {
        self.constant += rhs;
        self
    }
}

impl std::ops::Sub for Objective {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + rhs.neg_inner()
    }
}

impl std::ops::Mul<f64> for Objective {
    type Output = Self;

    fn mul(mut self, rhs: f64) -> Self::Output {
        for (w, _) in &mut self.terms {
            *w *= rhs;
        }
        self.constant *= rhs;
        self
    }
}

impl std::ops::Neg for Objective {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.neg_inner()
    }
}

impl Objective {
    fn neg_inner(mut self) -> Self {
        for (w, _) in &mut self.terms {
            *w = -*w;
        }
        self.constant = -self.constant;
        self
    }
}
