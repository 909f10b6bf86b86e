//! Dynamic recrystallization during roll passes.
//!
//! A roll pass adds its strain to the strain carried by the input profile.
//! Once the total passes the critical strain, an Avrami curve over the
//! normalized strain `(ε - ε_c)/(ε_ref - ε_c)` gives the dynamically
//! recrystallized fraction `X`. Recrystallized material loses its strain
//! and takes the recrystallized grain size:
//!
//! ```text
//! strain_out = ε · (1 - X)
//! d_out      = d_in + (d_rx - d_in) · X
//! ```
//!
//! Deformation resets the recrystallized fraction: the output fraction is
//! `X`, whatever the input carried.

use jmak_core::{KineticsError, Mechanism, Profile, StepKind, StepSpec};

use crate::context::StepContext;
use crate::formulas;
use crate::kinetics::{kind_mismatch, settle_grain_size, KineticsReport, StepKinetics, StepOutcome};

/// Kinetics of deformation steps.
#[derive(Clone, Copy, Debug, Default)]
pub struct RollPassKinetics;

impl StepKinetics for RollPassKinetics {
    fn name(&self) -> &str {
        "roll_pass"
    }

    fn kind(&self) -> StepKind {
        StepKind::Deformation
    }

    fn evaluate(
        &self,
        ctx: &StepContext<'_>,
        mechanism: Mechanism,
    ) -> Result<StepOutcome, KineticsError> {
        let StepSpec::Deformation(step) = ctx.step() else {
            return Err(kind_mismatch(ctx, StepKind::Deformation));
        };
        let input = ctx.in_profile();
        let config = ctx.config();
        let temperature = ctx.temperature();
        let total_strain = input.strain() + step.strain;

        let mut report = KineticsReport {
            temperature,
            zener_hollomon: ctx
                .material()
                .deformation_activation_energy
                .map(|q| formulas::zener_hollomon(step.strain_rate, q, temperature, config)),
            ..KineticsReport::default()
        };

        let params = match mechanism {
            Mechanism::None => None,
            Mechanism::Dynamic => Some(ctx.material().dynamic.as_ref().ok_or(
                KineticsError::MissingParameters {
                    step: ctx.step_id(),
                    mechanism,
                },
            )?),
            Mechanism::Metadynamic | Mechanism::Static | Mechanism::GrainGrowth => {
                return Err(KineticsError::MechanismNotApplicable {
                    step: ctx.step_id(),
                    kind: StepKind::Deformation,
                    mechanism,
                })
            }
        };

        let Some(params) = params else {
            report.critical_value = crate::selector::critical_strain(ctx);
            return Ok(StepOutcome {
                mechanism,
                out_profile: Profile::new(
                    total_strain,
                    input.grain_size(),
                    0.0,
                    ctx.exit_temperature(),
                    config.threshold,
                ),
                report,
            });
        };

        let critical = formulas::critical_value(
            params,
            input.strain(),
            step.strain_rate,
            input.grain_size(),
            temperature,
            config,
        );
        let reference = formulas::reference_value(
            params,
            input.strain(),
            step.strain_rate,
            input.grain_size(),
            temperature,
            config,
        );
        let recrystallized_grain_size = formulas::recrystallized_grain_size(
            params,
            input.strain(),
            step.strain_rate,
            input.grain_size(),
            temperature,
            config,
        );

        let fraction = if reference > critical {
            formulas::avrami_fraction(params, (total_strain - critical) / (reference - critical))
        } else {
            0.0
        };
        let grain_size = settle_grain_size(
            input.grain_size() + (recrystallized_grain_size - input.grain_size()) * fraction,
            input.grain_size(),
        );

        report.critical_value = Some(critical);
        report.reference_value = Some(reference);
        report.recrystallized_grain_size = Some(recrystallized_grain_size);
        report.fraction_increment = fraction;

        Ok(StepOutcome {
            mechanism,
            out_profile: Profile::new(
                total_strain * (1.0 - fraction),
                grain_size,
                fraction,
                ctx.exit_temperature(),
                config.threshold,
            ),
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jmak_core::{DeformationStep, KineticsConfig, RecrystallizationState, RestStep, StepId};
    use jmak_material::{MaterialParameters, MaterialRegistry};
    use jmak_test_utils::{fixtures, initial_profile, ROLLING_TEMPERATURE};

    fn evaluate(
        material: &MaterialParameters,
        input: &Profile,
        strain: f64,
        mechanism: Mechanism,
    ) -> Result<StepOutcome, KineticsError> {
        let config = KineticsConfig::default();
        let step: StepSpec = DeformationStep::new("p", strain, 1.0, ROLLING_TEMPERATURE).into();
        let ctx = StepContext::new(material, &config, StepId(0), &step, input);
        RollPassKinetics.evaluate(&ctx, mechanism)
    }

    #[test]
    fn partial_dynamic_recrystallization() {
        let material = fixtures::synthetic_material();
        let out = evaluate(&material, &initial_profile(), 0.6, Mechanism::Dynamic).unwrap();

        // x = (0.6 - 0.2) / (0.8 - 0.2), X = 1 - exp(-x²)
        let x: f64 = 0.4 / 0.6;
        let expected = 1.0 - (-x * x).exp();
        let p = &out.out_profile;
        assert!((p.recrystallized_fraction() - expected).abs() < 1e-12);
        assert!(p.recrystallized_fraction() > 0.0 && p.recrystallized_fraction() < 1.0);
        assert!(p.grain_size() > 20e-6 && p.grain_size() < 50e-6);
        assert!((p.grain_size() - (50e-6 - 30e-6 * expected)).abs() < 1e-15);
        assert!((p.strain() - 0.6 * (1.0 - expected)).abs() < 1e-12);
        assert_eq!(p.recrystallization_state(), RecrystallizationState::Partial);

        assert_eq!(out.report.critical_value, Some(0.2));
        assert_eq!(out.report.fraction_increment, p.recrystallized_fraction());
        assert!(out.report.zener_hollomon.is_some());
    }

    #[test]
    fn reference_not_above_critical_means_no_recrystallization() {
        let material = MaterialParameters {
            dynamic: Some(jmak_material::RecrystallizationParameters {
                a1: 0.9,
                ..fixtures::dynamic()
            }),
            ..Default::default()
        };
        let out = evaluate(&material, &initial_profile(), 1.2, Mechanism::Dynamic).unwrap();
        assert_eq!(out.out_profile.recrystallized_fraction(), 0.0);
        assert_eq!(out.out_profile.grain_size(), 50e-6);
        assert_eq!(out.out_profile.strain(), 1.2);
    }

    #[test]
    fn no_mechanism_accumulates_strain() {
        let material = fixtures::synthetic_material();
        let input = Profile::new(0.05, 40e-6, 0.3, ROLLING_TEMPERATURE, 0.05);
        let out = evaluate(&material, &input, 0.1, Mechanism::None).unwrap();
        assert!((out.out_profile.strain() - 0.15).abs() < 1e-15);
        assert_eq!(out.out_profile.grain_size(), 40e-6);
        assert_eq!(out.out_profile.recrystallized_fraction(), 0.0);
        assert_eq!(out.report.critical_value, Some(0.2));
        assert_eq!(out.report.reference_value, None);
    }

    #[test]
    fn negative_blend_falls_back_to_input_grain() {
        let material = MaterialParameters {
            dynamic: Some(jmak_material::RecrystallizationParameters {
                c1: -100.0,
                ..fixtures::dynamic()
            }),
            ..Default::default()
        };
        let out = evaluate(&material, &initial_profile(), 5.0, Mechanism::Dynamic).unwrap();
        assert_eq!(out.out_profile.grain_size(), 50e-6);
        assert_eq!(out.out_profile.recrystallization_state(), RecrystallizationState::Full);
    }

    #[test]
    fn builtin_grade_recrystallizes_heavy_pass() {
        let registry = MaterialRegistry::with_builtin();
        let material = registry.get("S355").unwrap();
        let out = evaluate(&material, &initial_profile(), 0.6, Mechanism::Dynamic).unwrap();
        let rx = out.report.recrystallized_grain_size.unwrap();
        let p = &out.out_profile;
        assert!(p.recrystallized_fraction() > 0.0 && p.recrystallized_fraction() <= 1.0);
        assert!(p.grain_size() < 50e-6 && p.grain_size() >= rx * (1.0 - 1e-12));
    }

    #[test]
    fn evaluation_is_bit_identical() {
        let material = fixtures::synthetic_material();
        let a = evaluate(&material, &initial_profile(), 0.45, Mechanism::Dynamic).unwrap();
        let b = evaluate(&material, &initial_profile(), 0.45, Mechanism::Dynamic).unwrap();
        assert_eq!(
            a.out_profile.grain_size().to_bits(),
            b.out_profile.grain_size().to_bits()
        );
        assert_eq!(a, b);
    }

    #[test]
    fn rest_step_rejected() {
        let material = fixtures::synthetic_material();
        let config = KineticsConfig::default();
        let step: StepSpec = RestStep::new("t", 1.0, ROLLING_TEMPERATURE).into();
        let input = initial_profile();
        let ctx = StepContext::new(&material, &config, StepId(4), &step, &input);
        assert_eq!(
            RollPassKinetics.evaluate(&ctx, Mechanism::Dynamic),
            Err(KineticsError::StepKindMismatch {
                step: StepId(4),
                expected: StepKind::Deformation,
                found: StepKind::Rest,
            })
        );
    }

    #[test]
    fn rest_mechanisms_rejected() {
        let material = fixtures::synthetic_material();
        let err = evaluate(&material, &initial_profile(), 0.3, Mechanism::Static).unwrap_err();
        assert!(matches!(err, KineticsError::MechanismNotApplicable { .. }));
        let err = evaluate(&fixtures::inert_material(), &initial_profile(), 0.3, Mechanism::Dynamic)
            .unwrap_err();
        assert!(matches!(err, KineticsError::MissingParameters { .. }));
    }
}
