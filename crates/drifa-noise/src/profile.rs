//! Hardware noise profiles for device-emulated noise.
//!
//! A [`DeviceProfile`] records the noise figures a backend reports:
//! average gate error rates, per-qubit relaxation times and readout
//! error probabilities. Simulation entry points resolve the
//! [`crate::NoiseSource::Device`] sentinel through the profile
//! configured on the simulator: gate errors become depolarizing
//! operations, T1/T2 become damping operations scaled by the gate
//! duration, and readout errors are applied as classical bit flips at
//! sampling time.

use serde::{Deserialize, Serialize};

use crate::channel::NoiseChannel;
use crate::error::NoiseResult;
use crate::model::{NoiseModel, NoiseOp};

/// Noise figures reported by a hardware backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Average single-qubit gate error probability.
    #[serde(default)]
    pub single_qubit_error: Option<f64>,

    /// Average two-qubit gate error probability.
    #[serde(default)]
    pub two_qubit_error: Option<f64>,

    /// T1 relaxation time per qubit in microseconds.
    #[serde(default)]
    pub t1: Option<Vec<f64>>,

    /// T2 dephasing time per qubit in microseconds.
    #[serde(default)]
    pub t2: Option<Vec<f64>>,

    /// Readout misclassification probability per qubit.
    #[serde(default)]
    pub readout_errors: Option<Vec<f64>>,
}

impl DeviceProfile {
    /// Create an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the T1 time for a specific qubit, if known.
    pub fn qubit_t1(&self, qubit_index: usize) -> Option<f64> {
        self.t1.as_ref().and_then(|v| v.get(qubit_index)).copied()
    }

    /// Get the T2 time for a specific qubit, if known.
    pub fn qubit_t2(&self, qubit_index: usize) -> Option<f64> {
        self.t2.as_ref().and_then(|v| v.get(qubit_index)).copied()
    }

    /// Get the readout error for a specific qubit, if known.
    pub fn readout_error(&self, qubit_index: usize) -> Option<f64> {
        self.readout_errors
            .as_ref()
            .and_then(|v| v.get(qubit_index))
            .copied()
    }

    /// Check if this profile has any noise data at all.
    pub fn is_empty(&self) -> bool {
        self.single_qubit_error.is_none()
            && self.two_qubit_error.is_none()
            && self.t1.is_none()
            && self.t2.is_none()
            && self.readout_errors.is_none()
    }

    /// Synthesize the gate-noise model this profile describes.
    ///
    /// Gate error rates map to depolarizing operations at the matching
    /// arity level. When `gate_time_us` is given and relaxation times
    /// are known, amplitude and phase damping with
    /// γ = 1 − exp(−t_gate / T) are appended for single-qubit gates,
    /// using the worst (smallest) T across qubits.
    ///
    /// Readout errors are *not* part of the returned model — they are
    /// classical flips applied at sampling time via
    /// [`DeviceProfile::readout_error`].
    pub fn noise_model(&self, gate_time_us: Option<f64>) -> NoiseResult<NoiseModel> {
        let mut model = NoiseModel::new();

        if let Some(p) = self.single_qubit_error {
            model.push(NoiseOp::new(NoiseChannel::depolarizing(p)?, 1)?);
        }
        if let Some(p) = self.two_qubit_error {
            model.push(NoiseOp::new(NoiseChannel::depolarizing(p)?, 2)?);
        }

        if let Some(dt) = gate_time_us {
            let worst = |times: &Option<Vec<f64>>| {
                times
                    .as_ref()
                    .and_then(|v| v.iter().copied().filter(|t| *t > 0.0).reduce(f64::min))
            };
            if let Some(t1) = worst(&self.t1) {
                let gamma = 1.0 - (-dt / t1).exp();
                model.push(NoiseOp::new(NoiseChannel::amplitude_damp(gamma)?, 1)?);
            }
            if let Some(t2) = worst(&self.t2) {
                let gamma = 1.0 - (-dt / t2).exp();
                model.push(NoiseOp::new(NoiseChannel::phase_damp(gamma)?, 1)?);
            }
        }

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile() {
        let profile = DeviceProfile::new();
        assert!(profile.is_empty());
        assert_eq!(profile.qubit_t1(0), None);
        assert!(profile.noise_model(None).unwrap().is_empty());
    }

    #[test]
    fn test_gate_errors_become_depolarizing() {
        let profile = DeviceProfile {
            single_qubit_error: Some(0.001),
            two_qubit_error: Some(0.02),
            ..Default::default()
        };
        let model = profile.noise_model(None).unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model.ops()[0].level, 1);
        assert_eq!(model.ops()[1].level, 2);
        assert_eq!(model.ops()[1].channel.name(), "depolarizing");
    }

    #[test]
    fn test_relaxation_requires_gate_time() {
        let profile = DeviceProfile {
            t1: Some(vec![50.0, 45.0]),
            t2: Some(vec![30.0]),
            ..Default::default()
        };
        assert!(profile.noise_model(None).unwrap().is_empty());

        let model = profile.noise_model(Some(0.5)).unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model.ops()[0].channel.name(), "amplitude_damp");
        assert_eq!(model.ops()[1].channel.name(), "phase_damp");

        // worst-case T1 = 45 µs
        match model.ops()[0].channel {
            NoiseChannel::AmplitudeDamp { gamma } => {
                let expected = 1.0 - (-0.5f64 / 45.0).exp();
                assert!((gamma - expected).abs() < 1e-12);
            }
            _ => panic!("expected amplitude damp"),
        }
    }

    #[test]
    fn test_readout_lookup() {
        let profile = DeviceProfile {
            readout_errors: Some(vec![0.02, 0.03]),
            ..Default::default()
        };
        assert_eq!(profile.readout_error(1), Some(0.03));
        assert_eq!(profile.readout_error(5), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let profile = DeviceProfile {
            single_qubit_error: Some(0.001),
            t1: Some(vec![50.0]),
            ..Default::default()
        };
        let json = serde_json::to_string(&profile).unwrap();
        let back: DeviceProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, back);
    }
}
