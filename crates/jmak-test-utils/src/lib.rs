//! Test utilities for JMAK engine development.
//!
//! Provides synthetic materials with round-number coefficients
//! ([`fixtures`]), pass-sequence builders, and [`init_tracing`] for
//! capturing engine logs in test output.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use jmak_core::{DeformationStep, Profile, RestStep, StepSpec};
use tracing_subscriber::{fmt, EnvFilter};

/// Hot-rolling temperature used by most fixtures (1200 °C).
pub const ROLLING_TEMPERATURE: f64 = 1473.15;

/// Initial grain size used by most fixtures (50 µm).
pub const INITIAL_GRAIN_SIZE: f64 = 50e-6;

/// Install a fmt subscriber writing through the test harness.
///
/// Honours `RUST_LOG` and defaults to `debug`. Safe to call from every
/// test; only the first call installs.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Undeformed 50 µm profile at rolling temperature.
pub fn initial_profile() -> Profile {
    Profile::initial(INITIAL_GRAIN_SIZE, ROLLING_TEMPERATURE)
}

/// Builder for alternating roll pass / transport sequences.
///
/// All steps run at constant temperature unless a cooling rate is set.
pub struct SequenceBuilder {
    steps: Vec<StepSpec>,
    temperature: f64,
    cooling_per_step: f64,
}

impl SequenceBuilder {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            temperature: ROLLING_TEMPERATURE,
            cooling_per_step: 0.0,
        }
    }

    /// Entry temperature of the next step.
    pub fn start_temperature(mut self, kelvin: f64) -> Self {
        self.temperature = kelvin;
        self
    }

    /// Temperature drop applied over each subsequent step.
    pub fn cooling_per_step(mut self, kelvin: f64) -> Self {
        self.cooling_per_step = kelvin;
        self
    }

    pub fn deformation(mut self, strain: f64, strain_rate: f64) -> Self {
        let label = format!("pass {}", self.steps.len());
        let entry = self.temperature;
        self.temperature -= self.cooling_per_step;
        self.steps.push(
            DeformationStep::new(label, strain, strain_rate, entry)
                .with_exit_temperature(self.temperature)
                .into(),
        );
        self
    }

    pub fn rest(mut self, duration: f64) -> Self {
        let label = format!("transport {}", self.steps.len());
        let entry = self.temperature;
        self.temperature -= self.cooling_per_step;
        self.steps.push(
            RestStep::new(label, duration, entry)
                .with_exit_temperature(self.temperature)
                .into(),
        );
        self
    }

    /// `passes` roll passes, each followed by a transport of `duration`.
    pub fn alternating(mut self, passes: usize, strain: f64, strain_rate: f64, duration: f64) -> Self {
        for _ in 0..passes {
            self = self.deformation(strain, strain_rate).rest(duration);
        }
        self
    }

    pub fn build(self) -> Vec<StepSpec> {
        self.steps
    }
}

impl Default for SequenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
