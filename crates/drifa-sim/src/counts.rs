//! Measurement outcome histograms.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A histogram of sampled measurement outcomes.
///
/// Outcomes are stored as integers where bit `k` is the result of the
/// `k`-th measured qubit. Bitstring rendering puts the first measured
/// qubit leftmost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Counts {
    counts: FxHashMap<u64, u64>,
    /// Number of measured bits per outcome.
    bits: u32,
    /// Total number of shots recorded.
    shots: u64,
}

impl Counts {
    /// Create an empty histogram over `bits` measured bits.
    pub fn new(bits: u32) -> Self {
        Self {
            counts: FxHashMap::default(),
            bits,
            shots: 0,
        }
    }

    /// Record one shot with the given outcome.
    pub fn record(&mut self, outcome: u64) {
        *self.counts.entry(outcome).or_insert(0) += 1;
        self.shots += 1;
    }

    /// The number of measured bits per outcome.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Total shots recorded.
    pub fn shots(&self) -> u64 {
        self.shots
    }

    /// The count for an outcome (0 if never seen).
    pub fn get(&self, outcome: u64) -> u64 {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    /// The relative frequency of an outcome.
    pub fn frequency(&self, outcome: u64) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.get(outcome) as f64 / self.shots as f64
    }

    /// Number of distinct outcomes observed.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// (outcome, count) pairs sorted by outcome.
    pub fn sorted(&self) -> Vec<(u64, u64)> {
        let mut v: Vec<_> = self.counts.iter().map(|(&k, &c)| (k, c)).collect();
        v.sort_by_key(|(k, _)| *k);
        v
    }

    /// Merge another histogram into this one.
    ///
    /// Both histograms must describe the same measured bits.
    pub fn merge(&mut self, other: &Counts) {
        for (&outcome, &count) in &other.counts {
            *self.counts.entry(outcome).or_insert(0) += count;
        }
        self.shots += other.shots;
    }

    /// Render an outcome as a bitstring, first measured qubit leftmost.
    pub fn bitstring(&self, outcome: u64) -> String {
        format!("{:0width$b}", outcome, width = self.bits as usize)
            .chars()
            .rev()
            .collect()
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (outcome, count)) in self.sorted().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", self.bitstring(outcome), count)?;
        }
        write!(f, "}}")
    }
}
