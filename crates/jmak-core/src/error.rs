//! Error type for kinetics evaluation.
//!
//! Numeric edge cases of the fitted curves (non-finite exponentials,
//! `reference <= critical`, missing parameter sets) are never errors: they
//! are recovered locally by the formula layer and the mechanism selector.
//! [`KineticsError`] only covers structural misuse of the evaluation API,
//! which the engine rules out when a sequence is built.

use std::error::Error;
use std::fmt;

use crate::id::StepId;
use crate::mechanism::Mechanism;
use crate::step::StepKind;

/// Errors from evaluating the kinetics of a single step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KineticsError {
    /// A rest step was evaluated without a preceding deformation step to
    /// supply the driving strain rate.
    MissingDrivingDeformation {
        /// The rest step being evaluated.
        step: StepId,
    },
    /// A kinetics component was handed a step of the wrong kind.
    StepKindMismatch {
        /// The step being evaluated.
        step: StepId,
        /// Kind the component handles.
        expected: StepKind,
        /// Kind that was supplied.
        found: StepKind,
    },
    /// A mechanism was requested for a step kind it cannot act in, e.g.
    /// static recrystallization during a roll pass.
    MechanismNotApplicable {
        /// The step being evaluated.
        step: StepId,
        /// Kind of the step.
        kind: StepKind,
        /// The requested mechanism.
        mechanism: Mechanism,
    },
    /// A mechanism was requested for a material without its parameters.
    MissingParameters {
        /// The step being evaluated.
        step: StepId,
        /// The requested mechanism.
        mechanism: Mechanism,
    },
}

impl fmt::Display for KineticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDrivingDeformation { step } => {
                write!(f, "rest step {step} has no preceding deformation step")
            }
            Self::StepKindMismatch {
                step,
                expected,
                found,
            } => write!(
                f,
                "step {step}: expected a {expected} step, got a {found} step"
            ),
            Self::MechanismNotApplicable {
                step,
                kind,
                mechanism,
            } => write!(
                f,
                "step {step}: mechanism {mechanism} does not apply to a {kind} step"
            ),
            Self::MissingParameters { step, mechanism } => {
                write!(f, "step {step}: material has no {mechanism} parameters")
            }
        }
    }
}

impl Error for KineticsError {}
