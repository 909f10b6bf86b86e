//! Inputs to the evaluation of a single step.
//!
//! [`StepContext`] borrows everything a kinetics component may read: the
//! material, the constants, the step description, its input profile and,
//! for rest steps, the deformation step that drives recrystallization.

use jmak_core::{KineticsConfig, Profile, StepId, StepSpec};
use jmak_material::MaterialParameters;

use crate::formulas;

/// The most recent deformation step before a rest step.
///
/// Resolved once when a sequence is built. Static and metadynamic kinetics
/// in every rest step after the deformation step run on one Avrami curve,
/// evaluated from the strain rate and the output state of that step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrivingDeformation {
    /// Arena index of the deformation step.
    pub step: StepId,
    /// Strain rate of the deformation step in 1/s.
    pub strain_rate: f64,
    /// Strain left in the output profile of the deformation step.
    pub strain: f64,
    /// Grain size of the output profile of the deformation step in metres.
    pub grain_size: f64,
    /// Accumulated strain reached during the deformation step
    /// (input strain plus step strain).
    pub total_strain: f64,
    /// Critical strain for dynamic recrystallization in that step, if the
    /// material has dynamic data.
    pub critical_strain: Option<f64>,
}

impl DrivingDeformation {
    /// Whether the deformation exceeded its critical strain.
    pub fn exceeded_critical_strain(&self) -> bool {
        self.critical_strain
            .is_some_and(|critical| self.total_strain > critical)
    }
}

/// Read-only view of one step handed to the selector and the kinetics
/// components.
#[derive(Clone, Copy, Debug)]
pub struct StepContext<'a> {
    material: &'a MaterialParameters,
    config: &'a KineticsConfig,
    step_id: StepId,
    step: &'a StepSpec,
    in_profile: &'a Profile,
    driving: Option<DrivingDeformation>,
}

impl<'a> StepContext<'a> {
    /// Construct a step context.
    ///
    /// Typically called by the engine; tests build contexts directly.
    pub fn new(
        material: &'a MaterialParameters,
        config: &'a KineticsConfig,
        step_id: StepId,
        step: &'a StepSpec,
        in_profile: &'a Profile,
    ) -> Self {
        Self {
            material,
            config,
            step_id,
            step,
            in_profile,
            driving: None,
        }
    }

    /// Attach the driving deformation of a rest step.
    pub fn with_driving(mut self, driving: DrivingDeformation) -> Self {
        self.driving = Some(driving);
        self
    }

    /// Kinetic data of the billet's material.
    pub fn material(&self) -> &'a MaterialParameters {
        self.material
    }

    /// Process-wide constants.
    pub fn config(&self) -> &'a KineticsConfig {
        self.config
    }

    /// Arena index of the step.
    pub fn step_id(&self) -> StepId {
        self.step_id
    }

    /// The step being evaluated.
    pub fn step(&self) -> &'a StepSpec {
        self.step
    }

    /// Output profile of the predecessor step.
    pub fn in_profile(&self) -> &'a Profile {
        self.in_profile
    }

    /// Driving deformation, for rest steps.
    pub fn driving(&self) -> Option<&DrivingDeformation> {
        self.driving.as_ref()
    }

    /// Evaluation temperature: mean of the step's entry and exit temperature.
    pub fn temperature(&self) -> f64 {
        let t = self.step.temperatures();
        formulas::mean_temperature(t.entry, t.exit)
    }

    /// Exit temperature, carried by the output profile.
    pub fn exit_temperature(&self) -> f64 {
        self.step.temperatures().exit
    }
}
