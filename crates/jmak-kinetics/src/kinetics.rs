//! The [`StepKinetics`] trait and its per-step result types.

use jmak_core::{KineticsError, Mechanism, Profile, StepKind};
use serde::{Deserialize, Serialize};

use crate::context::StepContext;
use crate::roll_pass::RollPassKinetics;
use crate::selector::{self, Selection};
use crate::transport::TransportKinetics;

/// Intermediate quantities of one step's kinetics.
///
/// Values that the chosen mechanism does not compute are `None`. For
/// deformation steps critical and reference values are strains; for rest
/// steps they are times in seconds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KineticsReport {
    /// Evaluation temperature in kelvin.
    pub temperature: f64,
    /// Onset of recrystallization.
    pub critical_value: Option<f64>,
    /// Characteristic value of the Avrami curve.
    pub reference_value: Option<f64>,
    /// Size of freshly recrystallized grains in metres.
    pub recrystallized_grain_size: Option<f64>,
    /// Equivalent elapsed time of the recrystallization already present
    /// at step entry.
    pub virtual_time: Option<f64>,
    /// Time after which the mechanism counts as finished and fresh grains
    /// start to grow.
    pub finished_time: Option<f64>,
    /// Fraction recrystallized within this step: the total fraction for
    /// deformation steps, the share of the remaining unrecrystallized
    /// structure for rest steps.
    pub fraction_increment: f64,
    /// Zener-Hollomon parameter of the (driving) deformation in 1/s.
    pub zener_hollomon: Option<f64>,
}

/// Result of evaluating one step for a given mechanism.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    /// Mechanism the step was evaluated with.
    pub mechanism: Mechanism,
    /// Output profile, the next step's input.
    pub out_profile: Profile,
    /// Intermediate quantities.
    pub report: KineticsReport,
}

/// Kinetics of one step kind.
///
/// # Contract
///
/// - `evaluate()` is a pure function of `ctx` and `mechanism`: repeated
///   calls return bit-identical outcomes.
/// - Numeric edge cases never produce an error; they are recovered
///   locally. Errors only report structural misuse, such as a step of the
///   wrong kind.
/// - The mechanism is chosen by [`select`](crate::selector::select) and
///   never re-derived here.
pub trait StepKinetics: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// The step kind this component evaluates.
    fn kind(&self) -> StepKind;

    /// Evaluate the step in `ctx` with `mechanism`.
    fn evaluate(
        &self,
        ctx: &StepContext<'_>,
        mechanism: Mechanism,
    ) -> Result<StepOutcome, KineticsError>;
}

/// The kinetics component for steps of `kind`.
pub fn kinetics_for(kind: StepKind) -> &'static dyn StepKinetics {
    match kind {
        StepKind::Deformation => &RollPassKinetics,
        StepKind::Rest => &TransportKinetics,
    }
}

/// A selected mechanism together with the step evaluated under it.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// How the mechanism was chosen.
    pub selection: Selection,
    /// The evaluated step.
    pub outcome: StepOutcome,
}

/// Select the mechanism for `ctx` and evaluate the step with it.
pub fn evaluate_step(ctx: &StepContext<'_>) -> Result<Evaluation, KineticsError> {
    let selection = selector::select(ctx);
    let outcome = kinetics_for(ctx.step().kind()).evaluate(ctx, selection.mechanism)?;
    Ok(Evaluation { selection, outcome })
}

/// The error for a context whose step is not of kind `expected`.
pub(crate) fn kind_mismatch(ctx: &StepContext<'_>, expected: StepKind) -> KineticsError {
    KineticsError::StepKindMismatch {
        step: ctx.step_id(),
        expected,
        found: ctx.step().kind(),
    }
}

/// Smallest grain size accepted as a kinetics result, in metres.
const MIN_GRAIN_SIZE: f64 = 1e-9;

/// `candidate` if it is a usable grain size, else `fallback`.
pub(crate) fn settle_grain_size(candidate: f64, fallback: f64) -> f64 {
    if candidate.is_finite() && candidate > MIN_GRAIN_SIZE {
        candidate
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DrivingDeformation;
    use jmak_core::{DeformationStep, KineticsConfig, RestStep, StepId, StepSpec};
    use jmak_test_utils::{fixtures, initial_profile, ROLLING_TEMPERATURE};

    #[test]
    fn dispatch_matches_kind() {
        for kind in [StepKind::Deformation, StepKind::Rest] {
            assert_eq!(kinetics_for(kind).kind(), kind);
        }
        assert_eq!(kinetics_for(StepKind::Rest).name(), "transport");
    }

    #[test]
    fn evaluate_step_uses_selected_mechanism() {
        let material = fixtures::synthetic_material();
        let config = KineticsConfig::default();
        let pass: StepSpec = DeformationStep::new("p", 0.6, 1.0, ROLLING_TEMPERATURE).into();
        let input = initial_profile();
        let ctx = StepContext::new(&material, &config, StepId(0), &pass, &input);
        let eval = evaluate_step(&ctx).unwrap();
        assert_eq!(eval.selection.mechanism, Mechanism::Dynamic);
        assert_eq!(eval.outcome.mechanism, Mechanism::Dynamic);

        let rest: StepSpec = RestStep::new("t", 1.0, ROLLING_TEMPERATURE).into();
        let after = eval.outcome.out_profile.clone();
        let ctx = StepContext::new(&material, &config, StepId(1), &rest, &after).with_driving(
            DrivingDeformation {
                step: StepId(0),
                strain_rate: 1.0,
                strain: after.strain(),
                grain_size: after.grain_size(),
                total_strain: 0.6,
                critical_strain: eval.outcome.report.critical_value,
            },
        );
        let eval = evaluate_step(&ctx).unwrap();
        assert_eq!(eval.outcome.mechanism, Mechanism::Metadynamic);
        assert!(
            eval.outcome.out_profile.recrystallized_fraction() >= after.recrystallized_fraction()
        );
    }

    #[test]
    fn degenerate_grain_sizes_fall_back() {
        assert_eq!(settle_grain_size(20e-6, 50e-6), 20e-6);
        assert_eq!(settle_grain_size(0.0, 50e-6), 50e-6);
        assert_eq!(settle_grain_size(-1e-6, 50e-6), 50e-6);
        assert_eq!(settle_grain_size(f64::NAN, 50e-6), 50e-6);
        assert_eq!(settle_grain_size(f64::INFINITY, 50e-6), 50e-6);
    }

    #[test]
    fn report_serializes_absent_values_as_null() {
        let report = KineticsReport {
            temperature: 1400.0,
            critical_value: Some(0.2),
            ..KineticsReport::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["critical_value"], 0.2);
        assert!(json["virtual_time"].is_null());
        let back: KineticsReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }
}
