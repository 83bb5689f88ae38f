//! The simulation entry point.
//!
//! A [`Simulator`] owns the run configuration — RNG seed and optional
//! device profile — and exposes the statevector, density-matrix,
//! sampling and expectation-value entry points. Noise is selected per
//! call through a [`NoiseSource`]: `Ideal` for exact unitary evolution,
//! `Model` for an explicit channel list, `Device` to emulate the
//! configured profile.
//!
//! Noise semantics: after each instruction whose written arity matches
//! a noise operation's level, that operation's channel is applied to
//! each operand qubit, in model order. Readout errors from a device
//! profile are classical bit flips applied per shot at sampling time.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use tracing::debug;

use drifa_ir::lower::change_basis;
use drifa_ir::{Bindings, Circuit, Hamiltonian, QubitId};
use drifa_noise::{DeviceProfile, NoiseModel, NoiseSource};

use crate::counts::Counts;
use crate::density_matrix::DensityMatrix;
use crate::error::{SimError, SimResult};
use crate::statevector::{Statevector, sample_index};

/// Widest circuit the statevector engine accepts (amplitude vector of
/// 2^n complex numbers).
pub const MAX_STATEVECTOR_QUBITS: u32 = 26;

/// Widest circuit the density-matrix engine accepts (4^n complex
/// numbers).
pub const MAX_DENSITY_QUBITS: u32 = 13;

/// Circuit simulator with optional noise.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    seed: Option<u64>,
    device_profile: Option<DeviceProfile>,
    gate_time_us: Option<f64>,
}

impl Simulator {
    /// Create a simulator with entropy-seeded sampling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed RNG seed; every sampling call becomes reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Configure the device profile resolved by [`NoiseSource::Device`].
    #[must_use]
    pub fn with_device_profile(mut self, profile: DeviceProfile) -> Self {
        self.device_profile = Some(profile);
        self
    }

    /// Gate duration in microseconds, used to scale the profile's
    /// T1/T2 figures into damping channels.
    #[must_use]
    pub fn with_gate_time_us(mut self, gate_time_us: f64) -> Self {
        self.gate_time_us = Some(gate_time_us);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Resolve a noise source into a concrete model (`None` = ideal).
    fn resolve_noise(&self, source: &NoiseSource) -> SimResult<Option<NoiseModel>> {
        match source {
            NoiseSource::Ideal => Ok(None),
            NoiseSource::Model(model) => Ok(Some(model.clone())),
            NoiseSource::Device => {
                let profile = self
                    .device_profile
                    .as_ref()
                    .ok_or(SimError::NoDeviceProfile)?;
                Ok(Some(profile.noise_model(self.gate_time_us)?))
            }
        }
    }

    /// Exact pure-state evolution of a noiseless circuit.
    pub fn statevector(&self, circuit: &Circuit, bindings: &Bindings) -> SimResult<Statevector> {
        let n = circuit.num_qubits();
        if n > MAX_STATEVECTOR_QUBITS {
            return Err(SimError::CircuitTooWide {
                n_qubits: n,
                engine: "statevector",
                max: MAX_STATEVECTOR_QUBITS,
            });
        }
        validate_measurement_order(circuit)?;

        let bound = circuit.bind_parameters(bindings);
        let mut sv = Statevector::new(n as usize);
        for inst in bound.instructions() {
            sv.apply(inst)?;
        }
        Ok(sv)
    }

    /// Mixed-state evolution under the given noise source.
    pub fn density_matrix(
        &self,
        circuit: &Circuit,
        bindings: &Bindings,
        noise: &NoiseSource,
    ) -> SimResult<DensityMatrix> {
        let n = circuit.num_qubits();
        if n > MAX_DENSITY_QUBITS {
            return Err(SimError::CircuitTooWide {
                n_qubits: n,
                engine: "density-matrix",
                max: MAX_DENSITY_QUBITS,
            });
        }
        validate_measurement_order(circuit)?;

        let model = self.resolve_noise(noise)?.unwrap_or_default();
        debug!(
            n_qubits = n,
            n_instructions = circuit.len(),
            n_noise_ops = model.len(),
            "evolving density matrix"
        );

        let bound = circuit.bind_parameters(bindings);
        let mut rho = DensityMatrix::new(n as usize);
        for inst in bound.instructions() {
            rho.apply(inst)?;
            if inst.is_measure() {
                continue;
            }
            for op in model.ops_for_arity(inst.arity()) {
                let kraus = op.channel.kraus_operators();
                for q in inst.qubits() {
                    rho.apply_kraus(&kraus, q);
                }
            }
        }
        Ok(rho)
    }

    /// Sample measurement outcomes.
    ///
    /// The measured qubits are those listed by the circuit's `Measure`
    /// instructions, in order; a circuit without measurements samples
    /// every qubit. Device readout errors flip each measured bit
    /// independently per shot.
    pub fn sample(
        &self,
        circuit: &Circuit,
        bindings: &Bindings,
        shots: u64,
        noise: &NoiseSource,
    ) -> SimResult<Counts> {
        let mut rng = self.rng();
        self.sample_with_rng(circuit, bindings, shots, noise, &mut rng)
    }

    fn sample_with_rng(
        &self,
        circuit: &Circuit,
        bindings: &Bindings,
        shots: u64,
        noise: &NoiseSource,
        rng: &mut StdRng,
    ) -> SimResult<Counts> {
        if shots == 0 {
            return Err(SimError::InvalidShots(0));
        }

        let mut measured = validate_measurement_order(circuit)?;
        if measured.is_empty() {
            measured = (0..circuit.num_qubits()).map(QubitId).collect();
        }

        let probs = match self.resolve_noise(noise)? {
            None => self.statevector(circuit, bindings)?.probabilities(),
            Some(model) => self
                .density_matrix(circuit, bindings, &NoiseSource::Model(model))?
                .probabilities(),
        };

        // Readout flips only apply when emulating a device.
        let readout: Vec<Option<f64>> = match noise {
            NoiseSource::Device => {
                let profile = self
                    .device_profile
                    .as_ref()
                    .ok_or(SimError::NoDeviceProfile)?;
                measured
                    .iter()
                    .map(|q| profile.readout_error(q.index()))
                    .collect()
            }
            _ => vec![None; measured.len()],
        };

        let mut counts = Counts::new(measured.len() as u32);
        for _ in 0..shots {
            let full = sample_index(&probs, rng);
            let mut outcome = 0u64;
            for (k, q) in measured.iter().enumerate() {
                let mut bit = (full >> q.index()) & 1;
                if let Some(p) = readout[k] {
                    if rng.r#gen::<f64>() < p {
                        bit ^= 1;
                    }
                }
                outcome |= (bit as u64) << k;
            }
            counts.record(outcome);
        }
        Ok(counts)
    }

    /// Exact expectation value ⟨H⟩ of the state the circuit prepares.
    ///
    /// The register is widened to fit the operator when the operator
    /// touches qubits the circuit never references.
    pub fn expectation(
        &self,
        circuit: &Circuit,
        hamiltonian: &Hamiltonian,
        bindings: &Bindings,
        noise: &NoiseSource,
    ) -> SimResult<f64> {
        let circuit = pad_for_operator(circuit, hamiltonian);
        match self.resolve_noise(noise)? {
            None => Ok(self
                .statevector(&circuit, bindings)?
                .expectation(hamiltonian)),
            Some(model) => Ok(self
                .density_matrix(&circuit, bindings, &NoiseSource::Model(model))?
                .expectation(hamiltonian)),
        }
    }

    /// Shot-based estimate of ⟨H⟩.
    ///
    /// Each Pauli term is measured the way hardware measures it: its X
    /// and Y factors are rotated into the Z basis, the term's qubits are
    /// sampled, and the term value is the parity average. The appended
    /// basis rotations are ordinary single-qubit instructions and
    /// receive level-1 noise like any other gate.
    pub fn sampled_expectation(
        &self,
        circuit: &Circuit,
        hamiltonian: &Hamiltonian,
        bindings: &Bindings,
        shots: u64,
        noise: &NoiseSource,
    ) -> SimResult<f64> {
        if shots == 0 {
            return Err(SimError::InvalidShots(0));
        }

        let mut rng = self.rng();
        let mut total = 0.0;
        for term in hamiltonian.terms() {
            if term.pauli.is_identity() {
                total += term.coeff;
                continue;
            }

            let mut rotated = circuit.clone();
            for &(q, op) in term.pauli.ops() {
                rotated.extend(&change_basis(QubitId(q), op, false));
            }
            rotated.measure(term.pauli.qubits().collect::<Vec<_>>())?;

            let counts = self.sample_with_rng(&rotated, bindings, shots, noise, &mut rng)?;
            let mut estimate = 0.0;
            for (outcome, count) in counts.sorted() {
                let parity = if outcome.count_ones() % 2 == 0 {
                    1.0
                } else {
                    -1.0
                };
                estimate += parity * count as f64;
            }
            total += term.coeff * estimate / shots as f64;
        }
        Ok(total)
    }
}

/// Widen a circuit's declared register when the operator references
/// qubits beyond it, so expectation traces stay in bounds.
fn pad_for_operator(circuit: &Circuit, hamiltonian: &Hamiltonian) -> Circuit {
    let width = hamiltonian.min_qubits();
    if width <= circuit.num_qubits() {
        return circuit.clone();
    }
    let mut out = Circuit::with_size(circuit.name(), width);
    out.extend(circuit);
    out
}

/// Walk the instruction list enforcing terminal measurement, returning
/// the measured qubits in measurement order.
fn validate_measurement_order(circuit: &Circuit) -> SimResult<Vec<QubitId>> {
    let mut seen: FxHashSet<QubitId> = FxHashSet::default();
    let mut order = Vec::new();
    for inst in circuit.instructions() {
        for q in inst.qubits() {
            if seen.contains(&q) {
                return Err(SimError::GateAfterMeasure { qubit: q });
            }
        }
        if inst.is_measure() {
            for &q in &inst.targets {
                seen.insert(q);
                order.push(q);
            }
        }
    }
    Ok(order)
}
