//! Material registration and parsing errors.

use std::error::Error;
use std::fmt;

use jmak_core::Mechanism;

/// Errors raised when a material's parameters are registered or parsed.
///
/// All of these are detected before any sequence is solved.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialError {
    /// A mechanism bundle violates its invariants (e.g. `n <= 0`, `k >= 0`).
    MalformedParameters {
        /// Material being registered.
        material: String,
        /// The offending mechanism.
        mechanism: Mechanism,
        /// Description of the violated invariant.
        reason: String,
    },
    /// The deformation activation energy is non-finite or non-positive.
    InvalidActivationEnergy {
        /// Material being registered.
        material: String,
        /// The invalid value.
        value: f64,
    },
    /// A material with the same name is already registered.
    DuplicateMaterial {
        /// The duplicated name.
        material: String,
    },
    /// A material was registered without any alias to match against.
    NoAliases {
        /// Material being registered.
        material: String,
    },
    /// A JSON parameter table could not be parsed.
    Parse {
        /// Material being parsed.
        material: String,
        /// Parser message.
        reason: String,
    },
    /// A parameter table could not be encoded.
    Encode {
        /// Encoder message.
        reason: String,
    },
}

impl fmt::Display for MaterialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedParameters {
                material,
                mechanism,
                reason,
            } => write!(
                f,
                "material '{material}': malformed {mechanism} parameters: {reason}"
            ),
            Self::InvalidActivationEnergy { material, value } => write!(
                f,
                "material '{material}': deformation activation energy must be finite and positive, got {value}"
            ),
            Self::DuplicateMaterial { material } => {
                write!(f, "material '{material}' is already registered")
            }
            Self::NoAliases { material } => {
                write!(f, "material '{material}' has no aliases")
            }
            Self::Parse { material, reason } => {
                write!(f, "material '{material}': cannot parse parameters: {reason}")
            }
            Self::Encode { reason } => write!(f, "cannot encode parameters: {reason}"),
        }
    }
}

impl Error for MaterialError {}
