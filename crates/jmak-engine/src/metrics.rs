//! Per-solve metrics.
//!
//! [`SolveMetrics`] summarizes one sequence solve: how long it took, how
//! often each mechanism acted, and how many selections had to fall back
//! for missing material data.

use indexmap::IndexMap;
use jmak_core::Mechanism;
use serde::Serialize;

/// Metrics collected while solving one pass sequence.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SolveMetrics {
    /// Wall-clock time of the solve, in microseconds.
    pub total_us: u64,
    /// Number of solved steps.
    pub steps: usize,
    /// Steps per mechanism, in order of first occurrence.
    pub mechanism_counts: IndexMap<Mechanism, usize>,
    /// Number of steps whose selection skipped a rule for missing data.
    pub degraded_selections: usize,
}

impl SolveMetrics {
    /// Count one solved step.
    pub fn record(&mut self, mechanism: Mechanism, degraded: bool) {
        self.steps += 1;
        *self.mechanism_counts.entry(mechanism).or_insert(0) += 1;
        if degraded {
            self.degraded_selections += 1;
        }
    }

    /// Steps solved with `mechanism`.
    pub fn count(&self, mechanism: Mechanism) -> usize {
        self.mechanism_counts.get(&mechanism).copied().unwrap_or(0)
    }
}
