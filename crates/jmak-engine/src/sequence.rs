//! Pass sequences: a step arena with resolved predecessor links.
//!
//! [`PassSequence::new`] validates a [`SequenceConfig`] once and resolves,
//! for every rest step, the nearest deformation step before it. Solving
//! walks the arena in order; each step's output profile is the next
//! step's input.

use std::sync::Arc;
use std::time::Instant;

use jmak_core::{KineticsConfig, Mechanism, Profile, StepId, StepKind, StepSpec};
use jmak_kinetics::{
    evaluate_step, Degradation, DrivingDeformation, KineticsReport, StepContext,
};
use jmak_material::MaterialParameters;
use serde::Serialize;
use smallvec::SmallVec;

use crate::config::{SequenceConfig, SequenceError};
use crate::metrics::SolveMetrics;

/// Name under which an unregistered material is reported.
const MATERIAL_LABEL: &str = "sequence material";

/// A validated, solvable pass sequence.
///
/// Immutable once built. Solving never mutates the sequence; every call
/// to [`solve`](Self::solve) produces a fresh [`SolvedSequence`].
#[derive(Clone, Debug)]
pub struct PassSequence {
    material: Arc<MaterialParameters>,
    kinetics: KineticsConfig,
    initial_profile: Profile,
    steps: Vec<StepSpec>,
    /// For rest steps, the nearest earlier deformation step.
    drivers: Vec<Option<StepId>>,
}

impl PassSequence {
    /// Validate `config` and resolve predecessor links.
    ///
    /// # Errors
    ///
    /// Any structural problem: empty sequence, invalid constants, malformed
    /// material data, invalid initial profile or step, or a rest step
    /// without a deformation step before it.
    pub fn new(config: SequenceConfig) -> Result<Self, SequenceError> {
        let SequenceConfig {
            material,
            kinetics,
            initial_profile,
            steps,
        } = config;

        if steps.is_empty() {
            return Err(SequenceError::EmptySequence);
        }
        kinetics.validate()?;
        material.validate(MATERIAL_LABEL)?;
        initial_profile
            .validate()
            .map_err(|reason| SequenceError::InvalidInitialProfile { reason })?;

        let mut drivers = Vec::with_capacity(steps.len());
        let mut last_deformation: Option<StepId> = None;
        for (i, step) in steps.iter().enumerate() {
            let id = StepId(i as u32);
            step.validate().map_err(|reason| SequenceError::InvalidStep {
                step: id,
                label: step.label().to_string(),
                reason,
            })?;
            match step.kind() {
                StepKind::Deformation => {
                    last_deformation = Some(id);
                    drivers.push(None);
                }
                StepKind::Rest => {
                    let driver =
                        last_deformation.ok_or_else(|| SequenceError::MissingDrivingDeformation {
                            step: id,
                            label: step.label().to_string(),
                        })?;
                    drivers.push(Some(driver));
                }
            }
        }

        // Classify the host's profile against this sequence's threshold.
        let initial_profile = initial_profile.reclassified(kinetics.threshold);
        Ok(Self {
            material,
            kinetics,
            initial_profile,
            steps,
            drivers,
        })
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`: empty sequences are rejected at build time.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps in process order.
    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    /// The step at `id`.
    pub fn step(&self, id: StepId) -> Option<&StepSpec> {
        self.steps.get(id.index())
    }

    /// The deformation step driving rest step `id`.
    ///
    /// `None` for deformation steps and out-of-range ids.
    pub fn driving_step(&self, id: StepId) -> Option<StepId> {
        self.drivers.get(id.index()).copied().flatten()
    }

    /// Kinetic data of the billet's material.
    pub fn material(&self) -> &Arc<MaterialParameters> {
        &self.material
    }

    /// Kinetics constants.
    pub fn kinetics_config(&self) -> &KineticsConfig {
        &self.kinetics
    }

    /// Profile entering the first step.
    pub fn initial_profile(&self) -> &Profile {
        &self.initial_profile
    }

    /// Solve every step in order.
    ///
    /// Numeric edge cases of the kinetics never abort a solve; an error
    /// here means a kinetics component rejected a step structurally.
    pub fn solve(&self) -> Result<SolvedSequence, SequenceError> {
        let span = tracing::debug_span!("solve_sequence", steps = self.steps.len());
        let _guard = span.enter();
        let start = Instant::now();

        let mut records: Vec<StepRecord> = Vec::with_capacity(self.steps.len());
        let mut metrics = SolveMetrics::default();

        for (i, step) in self.steps.iter().enumerate() {
            let id = StepId(i as u32);
            let in_profile = records
                .last()
                .map_or(&self.initial_profile, |r| &r.out_profile)
                .clone();

            let mut ctx = StepContext::new(&self.material, &self.kinetics, id, step, &in_profile);
            if let Some(driver) = self.driving_step(id) {
                ctx = ctx.with_driving(self.driving_deformation(driver, &records)?);
            }
            let evaluation = evaluate_step(&ctx)?;
            let outcome = evaluation.outcome;

            tracing::debug!(
                step = %id,
                label = step.label(),
                kind = %step.kind(),
                mechanism = %outcome.mechanism,
                fraction = outcome.out_profile.recrystallized_fraction(),
                grain_size = outcome.out_profile.grain_size(),
                strain = outcome.out_profile.strain(),
                "solved step"
            );
            metrics.record(outcome.mechanism, evaluation.selection.is_degraded());

            records.push(StepRecord {
                id,
                label: step.label().to_string(),
                kind: step.kind(),
                mechanism: outcome.mechanism,
                rule: evaluation.selection.rule,
                degradations: evaluation.selection.degradations,
                in_profile,
                out_profile: outcome.out_profile,
                report: outcome.report,
            });
        }

        metrics.total_us = start.elapsed().as_micros() as u64;
        tracing::info!(
            steps = metrics.steps,
            degraded = metrics.degraded_selections,
            total_us = metrics.total_us,
            "solved pass sequence"
        );
        Ok(SolvedSequence { records, metrics })
    }

    fn driving_deformation(
        &self,
        driver: StepId,
        records: &[StepRecord],
    ) -> Result<DrivingDeformation, SequenceError> {
        let (Some(StepSpec::Deformation(step)), Some(record)) =
            (self.step(driver), records.get(driver.index()))
        else {
            return Err(SequenceError::MissingDrivingDeformation {
                step: driver,
                label: self.step(driver).map(|s| s.label().to_string()).unwrap_or_default(),
            });
        };
        Ok(DrivingDeformation {
            step: driver,
            strain_rate: step.strain_rate,
            strain: record.out_profile.strain(),
            grain_size: record.out_profile.grain_size(),
            total_strain: record.in_profile.strain() + step.strain,
            critical_strain: record.report.critical_value,
        })
    }
}

/// The solved state of one step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepRecord {
    /// Arena index.
    pub id: StepId,
    /// Step label.
    pub label: String,
    /// Step kind.
    pub kind: StepKind,
    /// Mechanism the step was evaluated with.
    pub mechanism: Mechanism,
    /// Name of the selector rule that chose the mechanism.
    pub rule: &'static str,
    /// Rules skipped for missing material data.
    pub degradations: SmallVec<[Degradation; 2]>,
    /// Profile entering the step.
    pub in_profile: Profile,
    /// Profile leaving the step.
    pub out_profile: Profile,
    /// Intermediate kinetics quantities.
    pub report: KineticsReport,
}

/// Result of [`PassSequence::solve`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SolvedSequence {
    records: Vec<StepRecord>,
    metrics: SolveMetrics,
}

impl SolvedSequence {
    /// Per-step results in process order.
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Result of step `id`.
    pub fn record(&self, id: StepId) -> Option<&StepRecord> {
        self.records.get(id.index())
    }

    /// Output profile of the last step.
    pub fn final_profile(&self) -> Option<&Profile> {
        self.records.last().map(|r| &r.out_profile)
    }

    /// Solve metrics.
    pub fn metrics(&self) -> &SolveMetrics {
        &self.metrics
    }

    /// Whether two solves produced the same profiles and reports,
    /// ignoring timing.
    pub fn same_results(&self, other: &SolvedSequence) -> bool {
        self.records == other.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jmak_core::{DeformationStep, RestStep};
    use jmak_material::MaterialError;
    use jmak_test_utils::{fixtures, initial_profile, SequenceBuilder, ROLLING_TEMPERATURE};

    fn config(steps: Vec<StepSpec>) -> SequenceConfig {
        SequenceConfig::new(Arc::new(fixtures::synthetic_material()), initial_profile())
            .steps(steps)
    }

    #[test]
    fn empty_sequence_rejected() {
        assert_eq!(
            PassSequence::new(config(Vec::new())).unwrap_err(),
            SequenceError::EmptySequence
        );
    }

    #[test]
    fn rest_before_deformation_rejected() {
        let steps = SequenceBuilder::new().rest(1.0).deformation(0.3, 1.0).build();
        match PassSequence::new(config(steps)) {
            Err(SequenceError::MissingDrivingDeformation { step, label }) => {
                assert_eq!(step, StepId(0));
                assert_eq!(label, "transport 0");
            }
            other => panic!("expected MissingDrivingDeformation, got {other:?}"),
        }
    }

    #[test]
    fn invalid_step_names_index() {
        let steps = vec![
            DeformationStep::new("p", 0.3, 1.0, ROLLING_TEMPERATURE).into(),
            RestStep::new("bad", -1.0, ROLLING_TEMPERATURE).into(),
        ];
        match PassSequence::new(config(steps)) {
            Err(SequenceError::InvalidStep { step, label, .. }) => {
                assert_eq!(step, StepId(1));
                assert_eq!(label, "bad");
            }
            other => panic!("expected InvalidStep, got {other:?}"),
        }
    }

    #[test]
    fn invalid_initial_profile_rejected() {
        let cfg = SequenceConfig::new(
            Arc::new(fixtures::synthetic_material()),
            Profile::initial(-1.0, ROLLING_TEMPERATURE),
        )
        .step(DeformationStep::new("p", 0.3, 1.0, ROLLING_TEMPERATURE));
        assert!(matches!(
            PassSequence::new(cfg),
            Err(SequenceError::InvalidInitialProfile { .. })
        ));
    }

    #[test]
    fn invalid_kinetics_config_rejected() {
        let cfg = config(SequenceBuilder::new().deformation(0.3, 1.0).build()).with_kinetics(
            KineticsConfig {
                threshold: 0.6,
                ..KineticsConfig::default()
            },
        );
        assert!(matches!(
            PassSequence::new(cfg),
            Err(SequenceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn malformed_material_rejected() {
        let mut material = fixtures::synthetic_material();
        material.static_ = Some(jmak_material::RecrystallizationParameters {
            k: 0.7,
            n: -1.0,
            ..Default::default()
        });
        let cfg = SequenceConfig::new(Arc::new(material), initial_profile())
            .steps(SequenceBuilder::new().deformation(0.1, 1.0).rest(1.0).build());
        match PassSequence::new(cfg) {
            Err(SequenceError::InvalidMaterial(MaterialError::MalformedParameters {
                mechanism,
                ..
            })) => assert_eq!(mechanism, Mechanism::Static),
            other => panic!("expected InvalidMaterial, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_host_fraction_rejected() {
        let json = r#"{
            "strain": 0.0,
            "grain_size": 5e-5,
            "recrystallized_fraction": 1.5,
            "recrystallization_state": "full",
            "temperature": 1473.15
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        let cfg = SequenceConfig::new(Arc::new(fixtures::synthetic_material()), profile)
            .steps(SequenceBuilder::new().deformation(0.1, 1.0).build());
        assert!(matches!(
            PassSequence::new(cfg),
            Err(SequenceError::InvalidInitialProfile { .. })
        ));
    }

    #[test]
    fn driving_deformation_carries_pass_output() {
        let steps = SequenceBuilder::new()
            .deformation(0.1, 3.0)
            .rest(1.0)
            .rest(1.0)
            .build();
        let seq = PassSequence::new(config(steps)).unwrap();
        let solved = seq.solve().unwrap();
        let records = solved.records();
        let driving = seq.driving_deformation(StepId(0), records).unwrap();
        assert_eq!(driving.strain_rate, 3.0);
        assert_eq!(driving.strain, records[0].out_profile.strain());
        assert_eq!(driving.grain_size, records[0].out_profile.grain_size());
        assert_eq!(driving.total_strain, 0.1);
        assert_eq!(driving.critical_strain, Some(0.2));
    }

    #[test]
    fn drivers_point_to_nearest_deformation() {
        let steps = SequenceBuilder::new()
            .deformation(0.3, 1.0)
            .rest(1.0)
            .rest(1.0)
            .deformation(0.3, 2.0)
            .rest(1.0)
            .build();
        let seq = PassSequence::new(config(steps)).unwrap();
        assert_eq!(seq.driving_step(StepId(0)), None);
        assert_eq!(seq.driving_step(StepId(1)), Some(StepId(0)));
        assert_eq!(seq.driving_step(StepId(2)), Some(StepId(0)));
        assert_eq!(seq.driving_step(StepId(4)), Some(StepId(3)));
        assert_eq!(seq.driving_step(StepId(9)), None);
    }

    #[test]
    fn profiles_chain_between_steps() {
        let steps = SequenceBuilder::new().alternating(3, 0.4, 2.0, 1.5).build();
        let solved = PassSequence::new(config(steps)).unwrap().solve().unwrap();
        let records = solved.records();
        assert_eq!(records.len(), 6);
        assert_eq!(&records[0].in_profile, &initial_profile());
        for pair in records.windows(2) {
            assert_eq!(pair[0].out_profile, pair[1].in_profile);
        }
        assert_eq!(solved.final_profile(), Some(&records[5].out_profile));
        assert_eq!(solved.metrics().steps, 6);
    }

    #[test]
    fn rest_uses_driving_strain_rate() {
        let steps = SequenceBuilder::new().deformation(0.6, 4.0).rest(0.5).build();
        let mut material = fixtures::synthetic_material();
        if let Some(m) = material.metadynamic.as_mut() {
            // reference time ∝ 1/ε̇
            m.b3 = -1.0;
        }
        let solved = PassSequence::new(
            SequenceConfig::new(Arc::new(material), initial_profile()).steps(steps),
        )
        .unwrap()
        .solve()
        .unwrap();
        let rest = solved.record(StepId(1)).unwrap();
        assert_eq!(rest.mechanism, Mechanism::Metadynamic);
        assert!((rest.report.reference_value.unwrap() - 0.125).abs() < 1e-12);
    }

    #[test]
    fn solving_twice_is_bit_identical() {
        let steps = SequenceBuilder::new()
            .cooling_per_step(15.0)
            .alternating(4, 0.35, 3.0, 2.0)
            .build();
        let seq = PassSequence::new(config(steps)).unwrap();
        let a = seq.solve().unwrap();
        let b = seq.solve().unwrap();
        assert!(a.same_results(&b));
    }

    #[test]
    fn solved_sequence_serializes() {
        let steps = SequenceBuilder::new().alternating(1, 0.6, 1.0, 1.0).build();
        let solved = PassSequence::new(config(steps)).unwrap().solve().unwrap();
        let json = serde_json::to_value(&solved).unwrap();
        assert_eq!(json["records"][0]["mechanism"], "dynamic");
        assert_eq!(json["records"][1]["kind"], "rest");
        assert!(json["metrics"]["mechanism_counts"].is_object());
    }
}
