//! The single-qubit noise channels.
//!
//! Each channel is a probabilistic perturbation applied after a gate's
//! ideal effect, described by its Kraus decomposition. Probabilities are
//! validated at construction; a channel value that exists is always
//! physically valid.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{NoiseError, NoiseResult};
use crate::kraus::KrausOperator;

/// A single-qubit noise channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum NoiseChannel {
    /// Bit-flip channel: applies X with probability `p`.
    BitFlip {
        /// Flip probability (0.0 to 1.0).
        p: f64,
    },

    /// Phase-flip channel: applies Z with probability `p`.
    PhaseFlip {
        /// Flip probability (0.0 to 1.0).
        p: f64,
    },

    /// Amplitude damping: energy relaxation (T1 decay).
    AmplitudeDamp {
        /// Damping parameter (0.0 to 1.0).
        gamma: f64,
    },

    /// Phase damping: dephasing without energy loss (T2 decay).
    PhaseDamp {
        /// Dephasing parameter (0.0 to 1.0).
        gamma: f64,
    },

    /// Combined amplitude and phase damping.
    PhaseAmplitudeDamp {
        /// Amplitude damping parameter.
        gamma_amp: f64,
        /// Phase damping parameter.
        gamma_phase: f64,
    },

    /// Depolarizing channel: with probability `p`, applies X, Y or Z
    /// with equal weight p/3.
    Depolarizing {
        /// Error probability (0.0 to 1.0).
        p: f64,
    },
}

fn check_probability(channel: &'static str, value: f64) -> NoiseResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(NoiseError::InvalidProbability { channel, value })
    }
}

impl NoiseChannel {
    /// Bit-flip channel with probability `p`.
    pub fn bit_flip(p: f64) -> NoiseResult<Self> {
        Ok(NoiseChannel::BitFlip {
            p: check_probability("bit flip", p)?,
        })
    }

    /// Phase-flip channel with probability `p`.
    pub fn phase_flip(p: f64) -> NoiseResult<Self> {
        Ok(NoiseChannel::PhaseFlip {
            p: check_probability("phase flip", p)?,
        })
    }

    /// Amplitude damping with parameter `gamma`.
    pub fn amplitude_damp(gamma: f64) -> NoiseResult<Self> {
        Ok(NoiseChannel::AmplitudeDamp {
            gamma: check_probability("amplitude damp", gamma)?,
        })
    }

    /// Phase damping with parameter `gamma`.
    pub fn phase_damp(gamma: f64) -> NoiseResult<Self> {
        Ok(NoiseChannel::PhaseDamp {
            gamma: check_probability("phase damp", gamma)?,
        })
    }

    /// Combined phase-amplitude damping.
    ///
    /// Requires `gamma_amp + gamma_phase <= 1`.
    pub fn phase_amplitude_damp(gamma_amp: f64, gamma_phase: f64) -> NoiseResult<Self> {
        let gamma_amp = check_probability("phase-amplitude damp", gamma_amp)?;
        let gamma_phase = check_probability("phase-amplitude damp", gamma_phase)?;
        if gamma_amp + gamma_phase > 1.0 {
            return Err(NoiseError::InvalidDampingSum {
                gamma_amp,
                gamma_phase,
            });
        }
        Ok(NoiseChannel::PhaseAmplitudeDamp {
            gamma_amp,
            gamma_phase,
        })
    }

    /// Depolarizing channel with probability `p`.
    pub fn depolarizing(p: f64) -> NoiseResult<Self> {
        Ok(NoiseChannel::Depolarizing {
            p: check_probability("depolarizing", p)?,
        })
    }

    /// Get a human-readable name for this channel.
    pub fn name(&self) -> &'static str {
        match self {
            NoiseChannel::BitFlip { .. } => "bit_flip",
            NoiseChannel::PhaseFlip { .. } => "phase_flip",
            NoiseChannel::AmplitudeDamp { .. } => "amplitude_damp",
            NoiseChannel::PhaseDamp { .. } => "phase_damp",
            NoiseChannel::PhaseAmplitudeDamp { .. } => "phase_amplitude_damp",
            NoiseChannel::Depolarizing { .. } => "depolarizing",
        }
    }

    /// The Kraus decomposition of this channel.
    ///
    /// Every returned set satisfies Σ K†K = I for the channel's
    /// validated parameters.
    pub fn kraus_operators(&self) -> Vec<KrausOperator> {
        let zero = Complex64::new(0.0, 0.0);

        let scaled_identity = |w: f64| {
            KrausOperator::single_qubit([
                Complex64::new(w, 0.0),
                zero,
                zero,
                Complex64::new(w, 0.0),
            ])
        };
        let scaled_x = |w: f64| {
            KrausOperator::single_qubit([
                zero,
                Complex64::new(w, 0.0),
                Complex64::new(w, 0.0),
                zero,
            ])
        };
        let scaled_y = |w: f64| {
            KrausOperator::single_qubit([
                zero,
                Complex64::new(0.0, -w),
                Complex64::new(0.0, w),
                zero,
            ])
        };
        let scaled_z = |w: f64| {
            KrausOperator::single_qubit([
                Complex64::new(w, 0.0),
                zero,
                zero,
                Complex64::new(-w, 0.0),
            ])
        };

        match *self {
            NoiseChannel::BitFlip { p } => {
                vec![scaled_identity((1.0 - p).sqrt()), scaled_x(p.sqrt())]
            }
            NoiseChannel::PhaseFlip { p } => {
                vec![scaled_identity((1.0 - p).sqrt()), scaled_z(p.sqrt())]
            }
            NoiseChannel::AmplitudeDamp { gamma } => vec![
                // K₀ = diag(1, √(1-γ))
                KrausOperator::single_qubit([
                    Complex64::new(1.0, 0.0),
                    zero,
                    zero,
                    Complex64::new((1.0 - gamma).sqrt(), 0.0),
                ]),
                // K₁ = √γ |0⟩⟨1|
                KrausOperator::single_qubit([
                    zero,
                    Complex64::new(gamma.sqrt(), 0.0),
                    zero,
                    zero,
                ]),
            ],
            NoiseChannel::PhaseDamp { gamma } => vec![
                KrausOperator::single_qubit([
                    Complex64::new(1.0, 0.0),
                    zero,
                    zero,
                    Complex64::new((1.0 - gamma).sqrt(), 0.0),
                ]),
                // K₁ = √γ |1⟩⟨1|
                KrausOperator::single_qubit([
                    zero,
                    zero,
                    zero,
                    Complex64::new(gamma.sqrt(), 0.0),
                ]),
            ],
            NoiseChannel::PhaseAmplitudeDamp {
                gamma_amp,
                gamma_phase,
            } => vec![
                KrausOperator::single_qubit([
                    Complex64::new(1.0, 0.0),
                    zero,
                    zero,
                    Complex64::new((1.0 - gamma_amp - gamma_phase).sqrt(), 0.0),
                ]),
                KrausOperator::single_qubit([
                    zero,
                    Complex64::new(gamma_amp.sqrt(), 0.0),
                    zero,
                    zero,
                ]),
                KrausOperator::single_qubit([
                    zero,
                    zero,
                    zero,
                    Complex64::new(gamma_phase.sqrt(), 0.0),
                ]),
            ],
            NoiseChannel::Depolarizing { p } => {
                let w = (p / 3.0).sqrt();
                vec![
                    scaled_identity((1.0 - p).sqrt()),
                    scaled_x(w),
                    scaled_y(w),
                    scaled_z(w),
                ]
            }
        }
    }
}

impl fmt::Display for NoiseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseChannel::BitFlip { p } => write!(f, "bit_flip(p={p:.4})"),
            NoiseChannel::PhaseFlip { p } => write!(f, "phase_flip(p={p:.4})"),
            NoiseChannel::AmplitudeDamp { gamma } => write!(f, "amplitude_damp(γ={gamma:.4})"),
            NoiseChannel::PhaseDamp { gamma } => write!(f, "phase_damp(γ={gamma:.4})"),
            NoiseChannel::PhaseAmplitudeDamp {
                gamma_amp,
                gamma_phase,
            } => write!(
                f,
                "phase_amplitude_damp(γa={gamma_amp:.4}, γp={gamma_phase:.4})"
            ),
            NoiseChannel::Depolarizing { p } => write!(f, "depolarizing(p={p:.4})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kraus::is_complete;

    #[test]
    fn test_probability_validation() {
        assert!(NoiseChannel::bit_flip(1.5).is_err());
        assert!(NoiseChannel::depolarizing(-0.1).is_err());
        assert!(NoiseChannel::bit_flip(0.0).is_ok());
        assert!(NoiseChannel::bit_flip(1.0).is_ok());
    }

    #[test]
    fn test_damping_sum_validation() {
        assert!(NoiseChannel::phase_amplitude_damp(0.6, 0.5).is_err());
        assert!(NoiseChannel::phase_amplitude_damp(0.5, 0.5).is_ok());
    }

    #[test]
    fn test_all_channels_complete() {
        let channels = [
            NoiseChannel::bit_flip(0.1).unwrap(),
            NoiseChannel::phase_flip(0.25).unwrap(),
            NoiseChannel::amplitude_damp(0.3).unwrap(),
            NoiseChannel::phase_damp(0.7).unwrap(),
            NoiseChannel::phase_amplitude_damp(0.2, 0.3).unwrap(),
            NoiseChannel::depolarizing(0.05).unwrap(),
        ];
        for ch in channels {
            assert!(
                is_complete(&ch.kraus_operators(), 1e-10),
                "incomplete Kraus set for {ch}"
            );
        }
    }

    #[test]
    fn test_display() {
        let ch = NoiseChannel::depolarizing(0.03).unwrap();
        assert_eq!(format!("{ch}"), "depolarizing(p=0.0300)");
    }
}
