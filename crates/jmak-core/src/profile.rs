//! Microstructure state carried between processing steps.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse classification of the recrystallized fraction.
///
/// Derived from the fraction and the configured threshold:
/// `Full` above `1 - threshold`, `Partial` above `threshold`, else `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecrystallizationState {
    /// Recrystallization has not (noticeably) started.
    None,
    /// Recrystallization is in progress.
    Partial,
    /// The structure is (practically) fully recrystallized.
    Full,
}

impl RecrystallizationState {
    /// Classify a recrystallized fraction against `threshold`.
    pub fn classify(fraction: f64, threshold: f64) -> Self {
        if fraction > 1.0 - threshold {
            Self::Full
        } else if fraction > threshold {
            Self::Partial
        } else {
            Self::None
        }
    }

    /// Stable lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Partial => "partial",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for RecrystallizationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Microstructure state at a step boundary.
///
/// Created as the output of each step and consumed as the input of the
/// next. Immutable: the recrystallization state is classified once at
/// construction and always agrees with the stored fraction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    strain: f64,
    grain_size: f64,
    recrystallized_fraction: f64,
    recrystallization_state: RecrystallizationState,
    temperature: f64,
}

impl Profile {
    /// Create a profile, classifying its state against `threshold`.
    ///
    /// The fraction is clamped into `[0, 1]`.
    pub fn new(
        strain: f64,
        grain_size: f64,
        recrystallized_fraction: f64,
        temperature: f64,
        threshold: f64,
    ) -> Self {
        let recrystallized_fraction = recrystallized_fraction.clamp(0.0, 1.0);
        Self {
            strain,
            grain_size,
            recrystallized_fraction,
            recrystallization_state: RecrystallizationState::classify(
                recrystallized_fraction,
                threshold,
            ),
            temperature,
        }
    }

    /// An undeformed, unrecrystallized starting profile.
    pub fn initial(grain_size: f64, temperature: f64) -> Self {
        Self {
            strain: 0.0,
            grain_size,
            recrystallized_fraction: 0.0,
            recrystallization_state: RecrystallizationState::None,
            temperature,
        }
    }

    /// Accumulated (equivalent) strain.
    pub fn strain(&self) -> f64 {
        self.strain
    }

    /// Mean grain size in metres.
    pub fn grain_size(&self) -> f64 {
        self.grain_size
    }

    /// Recrystallized fraction in `[0, 1]`.
    pub fn recrystallized_fraction(&self) -> f64 {
        self.recrystallized_fraction
    }

    /// Classified recrystallization state.
    pub fn recrystallization_state(&self) -> RecrystallizationState {
        self.recrystallization_state
    }

    /// Temperature in kelvin.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Re-classify the state against a different threshold.
    pub fn reclassified(&self, threshold: f64) -> Self {
        Self {
            recrystallization_state: RecrystallizationState::classify(
                self.recrystallized_fraction,
                threshold,
            ),
            ..self.clone()
        }
    }

    /// Check that every quantity is physically meaningful.
    ///
    /// Used for initial profiles supplied by the host; profiles produced
    /// by the kinetics engine always pass.
    pub fn validate(&self) -> Result<(), String> {
        if !self.strain.is_finite() || self.strain < 0.0 {
            return Err(format!(
                "strain must be finite and non-negative, got {}",
                self.strain
            ));
        }
        if !self.grain_size.is_finite() || self.grain_size <= 0.0 {
            return Err(format!(
                "grain_size must be finite and positive, got {}",
                self.grain_size
            ));
        }
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(format!(
                "temperature must be finite and positive, got {}",
                self.temperature
            ));
        }
        if !(0.0..=1.0).contains(&self.recrystallized_fraction) {
            return Err(format!(
                "recrystallized_fraction must lie in [0, 1], got {}",
                self.recrystallized_fraction
            ));
        }
        Ok(())
    }
}
