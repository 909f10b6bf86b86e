//! Descriptions of the processing steps in a pass sequence.
//!
//! A pass sequence alternates [`DeformationStep`]s (roll passes) and
//! [`RestStep`]s (transports). The host supplies these as plain data; the
//! engine resolves predecessor links and solves them in order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which kind of processing a step performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Hot deformation (roll pass).
    Deformation,
    /// Rest or cooling period (transport).
    Rest,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deformation => f.write_str("deformation"),
            Self::Rest => f.write_str("rest"),
        }
    }
}

/// Entry and exit temperature of a step, in kelvin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Temperatures {
    /// Temperature at step entry.
    pub entry: f64,
    /// Temperature at step exit.
    pub exit: f64,
}

impl Temperatures {
    /// Constant temperature over the whole step.
    pub fn constant(temperature: f64) -> Self {
        Self {
            entry: temperature,
            exit: temperature,
        }
    }

    fn validate(&self) -> Result<(), String> {
        for (name, value) in [("entry", self.entry), ("exit", self.exit)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!(
                    "{name} temperature must be finite and positive, got {value}"
                ));
            }
        }
        Ok(())
    }
}

/// A hot-deformation step applying `strain` at `strain_rate`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeformationStep {
    /// Human-readable label for diagnostics.
    pub label: String,
    /// Equivalent strain applied by this step. Must be `>= 0`.
    pub strain: f64,
    /// Mean equivalent strain rate in 1/s. Must be `>= 0`.
    pub strain_rate: f64,
    /// Entry and exit temperature.
    pub temperatures: Temperatures,
}

impl DeformationStep {
    /// A deformation step at constant temperature.
    pub fn new(label: impl Into<String>, strain: f64, strain_rate: f64, temperature: f64) -> Self {
        Self {
            label: label.into(),
            strain,
            strain_rate,
            temperatures: Temperatures::constant(temperature),
        }
    }

    /// Override the exit temperature.
    pub fn with_exit_temperature(mut self, exit: f64) -> Self {
        self.temperatures.exit = exit;
        self
    }
}

/// A rest step of length `duration` seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RestStep {
    /// Human-readable label for diagnostics.
    pub label: String,
    /// Rest time in seconds. Must be `>= 0`.
    pub duration: f64,
    /// Entry and exit temperature.
    pub temperatures: Temperatures,
}

impl RestStep {
    /// A rest step at constant temperature.
    pub fn new(label: impl Into<String>, duration: f64, temperature: f64) -> Self {
        Self {
            label: label.into(),
            duration,
            temperatures: Temperatures::constant(temperature),
        }
    }

    /// Override the exit temperature.
    pub fn with_exit_temperature(mut self, exit: f64) -> Self {
        self.temperatures.exit = exit;
        self
    }
}

/// One processing step of either kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepSpec {
    /// A roll pass.
    Deformation(DeformationStep),
    /// A transport.
    Rest(RestStep),
}

impl StepSpec {
    /// The step's kind.
    pub fn kind(&self) -> StepKind {
        match self {
            Self::Deformation(_) => StepKind::Deformation,
            Self::Rest(_) => StepKind::Rest,
        }
    }

    /// The step's label.
    pub fn label(&self) -> &str {
        match self {
            Self::Deformation(d) => &d.label,
            Self::Rest(r) => &r.label,
        }
    }

    /// The step's entry and exit temperature.
    pub fn temperatures(&self) -> Temperatures {
        match self {
            Self::Deformation(d) => d.temperatures,
            Self::Rest(r) => r.temperatures,
        }
    }

    /// Check that every quantity is finite and within its physical range.
    pub fn validate(&self) -> Result<(), String> {
        self.temperatures().validate()?;
        match self {
            Self::Deformation(d) => {
                if !d.strain.is_finite() || d.strain < 0.0 {
                    return Err(format!(
                        "strain must be finite and non-negative, got {}",
                        d.strain
                    ));
                }
                if !d.strain_rate.is_finite() || d.strain_rate < 0.0 {
                    return Err(format!(
                        "strain_rate must be finite and non-negative, got {}",
                        d.strain_rate
                    ));
                }
            }
            Self::Rest(r) => {
                if !r.duration.is_finite() || r.duration < 0.0 {
                    return Err(format!(
                        "duration must be finite and non-negative, got {}",
                        r.duration
                    ));
                }
            }
        }
        Ok(())
    }
}

impl From<DeformationStep> for StepSpec {
    fn from(step: DeformationStep) -> Self {
        Self::Deformation(step)
    }
}

impl From<RestStep> for StepSpec {
    fn from(step: RestStep) -> Self {
        Self::Rest(step)
    }
}
