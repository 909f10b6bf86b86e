//! Strongly-typed identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a processing step within a pass sequence.
///
/// Steps are registered at sequence construction and assigned sequential
/// IDs. `StepId(n)` corresponds to the n-th step in process order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StepId(pub u32);

impl StepId {
    /// Position of the step in its sequence.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StepId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
