//! Sequence and batch configuration, and the errors their validation
//! reports.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use jmak_core::{ConfigError, KineticsConfig, KineticsError, Profile, StepId, StepSpec};
use jmak_material::{MaterialError, MaterialParameters};

// ── SequenceError ──────────────────────────────────────────────────

/// Errors detected while building or solving a [`PassSequence`].
///
/// Everything except [`Kinetics`](Self::Kinetics) is reported by
/// [`PassSequence::new`] before any step is evaluated.
///
/// [`PassSequence`]: crate::PassSequence
/// [`PassSequence::new`]: crate::PassSequence::new
#[derive(Clone, Debug, PartialEq)]
pub enum SequenceError {
    /// The sequence has no steps.
    EmptySequence,
    /// A step carries a non-finite or out-of-range quantity.
    InvalidStep {
        /// Index of the offending step.
        step: StepId,
        /// Its label.
        label: String,
        /// Description of the problem.
        reason: String,
    },
    /// The initial profile is not physically meaningful.
    InvalidInitialProfile {
        /// Description of the problem.
        reason: String,
    },
    /// The kinetics constants are invalid.
    InvalidConfig(ConfigError),
    /// The material carries a malformed parameter set.
    InvalidMaterial(MaterialError),
    /// A rest step has no deformation step before it.
    MissingDrivingDeformation {
        /// Index of the rest step.
        step: StepId,
        /// Its label.
        label: String,
    },
    /// A kinetics component rejected a step during solving.
    Kinetics(KineticsError),
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySequence => write!(f, "pass sequence has no steps"),
            Self::InvalidStep {
                step,
                label,
                reason,
            } => write!(f, "step {step} ('{label}'): {reason}"),
            Self::InvalidInitialProfile { reason } => {
                write!(f, "invalid initial profile: {reason}")
            }
            Self::InvalidConfig(e) => write!(f, "invalid kinetics config: {e}"),
            Self::InvalidMaterial(e) => write!(f, "invalid material: {e}"),
            Self::MissingDrivingDeformation { step, label } => write!(
                f,
                "rest step {step} ('{label}') has no preceding deformation step"
            ),
            Self::Kinetics(e) => write!(f, "kinetics: {e}"),
        }
    }
}

impl Error for SequenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(e) => Some(e),
            Self::InvalidMaterial(e) => Some(e),
            Self::Kinetics(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SequenceError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfig(e)
    }
}

impl From<MaterialError> for SequenceError {
    fn from(e: MaterialError) -> Self {
        Self::InvalidMaterial(e)
    }
}

impl From<KineticsError> for SequenceError {
    fn from(e: KineticsError) -> Self {
        Self::Kinetics(e)
    }
}

// ── SequenceConfig ─────────────────────────────────────────────────

/// Everything needed to build a [`PassSequence`](crate::PassSequence).
///
/// Plain data; [`PassSequence::new`](crate::PassSequence::new) validates
/// it and resolves the predecessor links.
#[derive(Clone, Debug)]
pub struct SequenceConfig {
    /// Kinetic data of the billet's material.
    pub material: Arc<MaterialParameters>,
    /// Kinetics constants. Default: [`KineticsConfig::default()`].
    pub kinetics: KineticsConfig,
    /// Profile entering the first step.
    pub initial_profile: Profile,
    /// Steps in process order.
    pub steps: Vec<StepSpec>,
}

impl SequenceConfig {
    /// A configuration with default constants and no steps.
    pub fn new(material: Arc<MaterialParameters>, initial_profile: Profile) -> Self {
        Self {
            material,
            kinetics: KineticsConfig::default(),
            initial_profile,
            steps: Vec::new(),
        }
    }

    /// Replace the kinetics constants.
    pub fn with_kinetics(mut self, kinetics: KineticsConfig) -> Self {
        self.kinetics = kinetics;
        self
    }

    /// Append a step.
    pub fn step(mut self, step: impl Into<StepSpec>) -> Self {
        self.steps.push(step.into());
        self
    }

    /// Append several steps.
    pub fn steps(mut self, steps: impl IntoIterator<Item = StepSpec>) -> Self {
        self.steps.extend(steps);
        self
    }
}

// ── BatchConfig ────────────────────────────────────────────────────

/// Worker pool settings for [`solve_batch`](crate::solve_batch).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of worker threads. `0` uses the available parallelism.
    /// Default: 0.
    pub workers: usize,
    /// Capacity of the bounded job queue. Default: 64. Minimum: 1.
    pub queue_capacity: usize,
}

impl BatchConfig {
    /// Worker count after resolving `0` to the available parallelism.
    pub fn resolved_worker_count(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.queue_capacity == 0 {
            return Err("queue_capacity must be at least 1".into());
        }
        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            queue_capacity: 64,
        }
    }
}
