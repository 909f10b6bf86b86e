//! Process-wide kinetics constants and their validation.
//!
//! [`KineticsConfig`] bundles the constants every kinetics formula needs.
//! It is passed explicitly into the formula layer rather than read from
//! ambient state, so each formula stays independently testable.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The universal gas constant in J/(mol·K) (2019 SI redefinition).
pub const UNIVERSAL_GAS_CONSTANT: f64 = 8.314_462_618_153_24;

/// Constants used by the kinetics formulas and state classification.
///
/// All fields have defaults (see the associated constants); use
/// struct update syntax to override individual values:
///
/// ```
/// use jmak_core::KineticsConfig;
///
/// let config = KineticsConfig {
///     threshold: 0.02,
///     ..KineticsConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KineticsConfig {
    /// Universal gas constant `R` in J/(mol·K).
    pub gas_constant: f64,
    /// Threshold used to classify a profile as partially or fully
    /// recrystallized, and to define when an Avrami curve is finished.
    /// Default: 0.05.
    pub threshold: f64,
    /// Offset added to the strain before exponentiation in the
    /// recrystallized grain size equation. Default: 0.01.
    pub base_strain: f64,
    /// Offset added to the strain rate before exponentiation in the
    /// recrystallized grain size equation. Default: 0.01.
    pub base_strain_rate: f64,
}

impl KineticsConfig {
    /// Default classification threshold.
    pub const DEFAULT_THRESHOLD: f64 = 0.05;

    /// Default strain and strain-rate offset.
    pub const DEFAULT_BASE_OFFSET: f64 = 0.01;

    /// Check structural invariants.
    ///
    /// The threshold must lie strictly inside `(0, 0.5)` so that the
    /// `partial` band between `threshold` and `1 - threshold` is non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gas_constant.is_finite() || self.gas_constant <= 0.0 {
            return Err(ConfigError::InvalidGasConstant {
                value: self.gas_constant,
            });
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 || self.threshold >= 0.5 {
            return Err(ConfigError::InvalidThreshold {
                value: self.threshold,
            });
        }
        for (name, value) in [
            ("base_strain", self.base_strain),
            ("base_strain_rate", self.base_strain_rate),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidOffset { name, value });
            }
        }
        Ok(())
    }
}

impl Default for KineticsConfig {
    fn default() -> Self {
        Self {
            gas_constant: UNIVERSAL_GAS_CONSTANT,
            threshold: Self::DEFAULT_THRESHOLD,
            base_strain: Self::DEFAULT_BASE_OFFSET,
            base_strain_rate: Self::DEFAULT_BASE_OFFSET,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`KineticsConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The gas constant is NaN, infinite, zero, or negative.
    InvalidGasConstant {
        /// The invalid value.
        value: f64,
    },
    /// The threshold is outside `(0, 0.5)`.
    InvalidThreshold {
        /// The invalid value.
        value: f64,
    },
    /// A base offset is NaN, infinite, or negative.
    InvalidOffset {
        /// Which offset.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGasConstant { value } => {
                write!(f, "gas_constant must be finite and positive, got {value}")
            }
            Self::InvalidThreshold { value } => {
                write!(f, "threshold must lie in (0, 0.5), got {value}")
            }
            Self::InvalidOffset { name, value } => {
                write!(f, "{name} must be finite and non-negative, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}
