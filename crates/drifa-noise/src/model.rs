//! Composable noise models.
//!
//! A [`NoiseModel`] is an *ordered* collection of noise operations. Each
//! operation binds a channel to a gate-arity level: the channel is
//! applied, qubit-wise, after every instruction that touches exactly
//! that many qubits. Models compose with `+`, concatenating operation
//! lists left-then-right — order matters, because channels applied
//! sequentially do not commute in general.
//!
//! # Example
//!
//! ```rust
//! use drifa_noise::NoiseModel;
//!
//! let single = NoiseModel::bit_flip(0.01, 1).unwrap();
//! let double = NoiseModel::depolarizing(0.02, 2).unwrap();
//! let combined = single + double;
//! assert_eq!(combined.len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::channel::NoiseChannel;
use crate::error::{NoiseError, NoiseResult};

/// A channel bound to the gate-arity level it applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseOp {
    /// The noise channel.
    pub channel: NoiseChannel,
    /// Gate arity this operation targets: the channel is applied after
    /// every instruction touching exactly `level` qubits.
    pub level: u32,
}

impl NoiseOp {
    /// Bind a channel to a gate-arity level.
    pub fn new(channel: NoiseChannel, level: u32) -> NoiseResult<Self> {
        if level == 0 {
            return Err(NoiseError::InvalidLevel);
        }
        Ok(Self { channel, level })
    }
}

impl fmt::Display for NoiseOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ level {}", self.channel, self.level)
    }
}

/// An ordered, composable collection of noise operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseModel {
    ops: Vec<NoiseOp>,
}

impl NoiseModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-op model: bit flip with probability `p` on arity-`level` gates.
    pub fn bit_flip(p: f64, level: u32) -> NoiseResult<Self> {
        Ok(Self::from(NoiseOp::new(NoiseChannel::bit_flip(p)?, level)?))
    }

    /// Single-op model: phase flip with probability `p`.
    pub fn phase_flip(p: f64, level: u32) -> NoiseResult<Self> {
        Ok(Self::from(NoiseOp::new(
            NoiseChannel::phase_flip(p)?,
            level,
        )?))
    }

    /// Single-op model: amplitude damping with parameter `gamma`.
    pub fn amplitude_damp(gamma: f64, level: u32) -> NoiseResult<Self> {
        Ok(Self::from(NoiseOp::new(
            NoiseChannel::amplitude_damp(gamma)?,
            level,
        )?))
    }

    /// Single-op model: phase damping with parameter `gamma`.
    pub fn phase_damp(gamma: f64, level: u32) -> NoiseResult<Self> {
        Ok(Self::from(NoiseOp::new(
            NoiseChannel::phase_damp(gamma)?,
            level,
        )?))
    }

    /// Single-op model: combined phase-amplitude damping.
    pub fn phase_amplitude_damp(
        gamma_amp: f64,
        gamma_phase: f64,
        level: u32,
    ) -> NoiseResult<Self> {
        Ok(Self::from(NoiseOp::new(
            NoiseChannel::phase_amplitude_damp(gamma_amp, gamma_phase)?,
            level,
        )?))
    }

    /// Single-op model: depolarizing with probability `p`.
    pub fn depolarizing(p: f64, level: u32) -> NoiseResult<Self> {
        Ok(Self::from(NoiseOp::new(
            NoiseChannel::depolarizing(p)?,
            level,
        )?))
    }

    /// Append an operation, preserving insertion order.
    pub fn push(&mut self, op: NoiseOp) {
        self.ops.push(op);
    }

    /// All operations in insertion order.
    pub fn ops(&self) -> &[NoiseOp] {
        &self.ops
    }

    /// The operations targeting a given gate arity, in model order.
    pub fn ops_for_arity(&self, arity: u32) -> impl Iterator<Item = &NoiseOp> {
        self.ops.iter().filter(move |op| op.level == arity)
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True if the model has no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The highest gate-arity level any operation targets, or 0.
    pub fn max_level(&self) -> u32 {
        self.ops.iter().map(|op| op.level).max().unwrap_or(0)
    }
}

impl From<NoiseOp> for NoiseModel {
    fn from(op: NoiseOp) -> Self {
        Self { ops: vec![op] }
    }
}

impl FromIterator<NoiseOp> for NoiseModel {
    fn from_iter<T: IntoIterator<Item = NoiseOp>>(iter: T) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl std::ops::Add for NoiseModel {
    type Output = Self;

    /// Concatenate two models, left operations first.
    fn add(mut self, rhs: Self) -> Self::Output {
        self.ops.extend(rhs.ops);
        self
    }
}

impl std::ops::AddAssign for NoiseModel {
    fn add_assign(&mut self, rhs: Self) {
        self.ops.extend(rhs.ops);
    }
}

impl fmt::Display for NoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return write!(f, "NoiseModel(empty)");
        }
        write!(f, "NoiseModel[")?;
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{op}")?;
        }
        write!(f, "]")
    }
}

/// The noise argument accepted by simulation entry points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NoiseSource {
    /// No noise: exact unitary evolution.
    Ideal,
    /// An explicit noise model.
    Model(NoiseModel),
    /// Emulate the simulator's configured device profile.
    Device,
}

impl NoiseSource {
    /// True for the `Ideal` variant.
    pub fn is_ideal(&self) -> bool {
        matches!(self, NoiseSource::Ideal)
    }
}

impl From<NoiseModel> for NoiseSource {
    fn from(model: NoiseModel) -> Self {
        NoiseSource::Model(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_validate() {
        assert!(NoiseModel::bit_flip(0.3, 1).is_ok());
        assert!(NoiseModel::bit_flip(1.3, 1).is_err());
        assert!(NoiseModel::depolarizing(0.1, 0).is_err());
    }

    #[test]
    fn test_addition_preserves_order() {
        let a = NoiseModel::bit_flip(0.1, 1).unwrap();
        let b = NoiseModel::amplitude_damp(0.2, 1).unwrap();
        let c = NoiseModel::depolarizing(0.05, 2).unwrap();

        let combined = a + b + c;
        assert_eq!(combined.len(), 3);
        let names: Vec<_> = combined.ops().iter().map(|op| op.channel.name()).collect();
        assert_eq!(names, ["bit_flip", "amplitude_damp", "depolarizing"]);
    }

    #[test]
    fn test_ops_for_arity_keeps_model_order() {
        let model = NoiseModel::amplitude_damp(0.2, 1).unwrap()
            + NoiseModel::depolarizing(0.05, 2).unwrap()
            + NoiseModel::bit_flip(0.1, 1).unwrap();

        let level1: Vec<_> = model
            .ops_for_arity(1)
            .map(|op| op.channel.name())
            .collect();
        assert_eq!(level1, ["amplitude_damp", "bit_flip"]);
        assert_eq!(model.ops_for_arity(3).count(), 0);
        assert_eq!(model.max_level(), 2);
    }

    #[test]
    fn test_serde_round_trip() {
        let model = NoiseModel::phase_amplitude_damp(0.1, 0.2, 1).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let back: NoiseModel = serde_json::from_str(&json).unwrap();
        assert_eq!(model, back);
    }
}
