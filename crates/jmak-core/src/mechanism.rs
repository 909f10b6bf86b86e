//! The recrystallization [`Mechanism`] tag assigned to each step.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical mechanism governing microstructure evolution in one step.
///
/// Assigned exactly once per step by the mechanism selector and never
/// changed afterwards. Determines which parameter set and formula branch
/// the kinetics evaluation uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mechanism {
    /// No microstructure change beyond strain accumulation or carry-over.
    None,
    /// Dynamic recrystallization during deformation.
    Dynamic,
    /// Continuation of already-nucleated recrystallization during rest.
    Metadynamic,
    /// Nucleation-driven recrystallization during rest.
    Static,
    /// Pure grain growth of a fully recrystallized structure.
    GrainGrowth,
}

impl Mechanism {
    /// All mechanisms in declaration order.
    pub const ALL: [Mechanism; 5] = [
        Mechanism::None,
        Mechanism::Dynamic,
        Mechanism::Metadynamic,
        Mechanism::Static,
        Mechanism::GrainGrowth,
    ];

    /// Stable lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Dynamic => "dynamic",
            Self::Metadynamic => "metadynamic",
            Self::Static => "static",
            Self::GrainGrowth => "grain_growth",
        }
    }
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_unique() {
        let mut names: Vec<&str> = Mechanism::ALL.iter().map(|m| m.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Mechanism::ALL.len());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Mechanism::GrainGrowth).unwrap();
        assert_eq!(json, "\"grain_growth\"");
        let back: Mechanism = serde_json::from_str("\"metadynamic\"").unwrap();
        assert_eq!(back, Mechanism::Metadynamic);
    }
}
