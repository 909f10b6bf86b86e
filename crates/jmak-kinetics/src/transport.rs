//! Static and metadynamic recrystallization and grain growth during
//! transports.
//!
//! A transport continues the Avrami curve of the structure it receives.
//! The fraction `X_in` already present is converted into a virtual time,
//! the time the curve would need to reach `X_in`:
//!
//! ```text
//! t_v = t_c + (t_ref - t_c) · (ln(1 - X_in)/k)^(1/n)
//! A   = 1 - exp(k · ((t + t_v - t_c)/(t_ref - t_c))^n)
//! ΔX  = max(0, A - X_in) / (1 - X_in)
//! X_out = X_in + (1 - X_in) · ΔX
//! ```
//!
//! `ΔX` is the share of the still unrecrystallized structure that
//! transforms during this transport, so `X_out = A`.
//!
//! The curve (`t_c`, `t_ref` and the recrystallized grain size) belongs to
//! the driving deformation: it is evaluated from that step's strain rate,
//! output strain and output grain size. Consecutive transports after one
//! pass therefore continue the same curve, and splitting a transport in
//! two yields the same fraction as one transport of the combined
//! duration.

use jmak_core::{
    KineticsError, Mechanism, Profile, RecrystallizationState, RestStep, StepKind, StepSpec,
};
use jmak_material::RecrystallizationParameters;

use crate::context::StepContext;
use crate::formulas;
use crate::kinetics::{kind_mismatch, settle_grain_size, KineticsReport, StepKinetics, StepOutcome};

/// Kinetics of rest steps.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransportKinetics;

impl StepKinetics for TransportKinetics {
    fn name(&self) -> &str {
        "transport"
    }

    fn kind(&self) -> StepKind {
        StepKind::Rest
    }

    fn evaluate(
        &self,
        ctx: &StepContext<'_>,
        mechanism: Mechanism,
    ) -> Result<StepOutcome, KineticsError> {
        let StepSpec::Rest(step) = ctx.step() else {
            return Err(kind_mismatch(ctx, StepKind::Rest));
        };
        let input = ctx.in_profile();
        let temperature = ctx.temperature();
        let mut report = KineticsReport {
            temperature,
            zener_hollomon: match (ctx.driving(), ctx.material().deformation_activation_energy) {
                (Some(d), Some(q)) => Some(formulas::zener_hollomon(
                    d.strain_rate,
                    q,
                    temperature,
                    ctx.config(),
                )),
                _ => None,
            },
            ..KineticsReport::default()
        };

        match mechanism {
            Mechanism::Static | Mechanism::Metadynamic => {
                let params = ctx.material().recrystallization(mechanism).ok_or(
                    KineticsError::MissingParameters {
                        step: ctx.step_id(),
                        mechanism,
                    },
                )?;
                let out_profile = recrystallize(ctx, step, mechanism, params, &mut report)?;
                Ok(StepOutcome {
                    mechanism,
                    out_profile,
                    report,
                })
            }
            Mechanism::GrainGrowth => {
                let growth = ctx.material().grain_growth.as_ref().ok_or(
                    KineticsError::MissingParameters {
                        step: ctx.step_id(),
                        mechanism,
                    },
                )?;
                let grain_size = settle_grain_size(
                    formulas::grain_growth(
                        Some(growth),
                        input.grain_size(),
                        step.duration,
                        temperature,
                        ctx.config(),
                    ),
                    input.grain_size(),
                );
                Ok(StepOutcome {
                    mechanism,
                    out_profile: carry_over(ctx, grain_size),
                    report,
                })
            }
            Mechanism::None => Ok(StepOutcome {
                mechanism,
                out_profile: carry_over(ctx, input.grain_size()),
                report,
            }),
            Mechanism::Dynamic => Err(KineticsError::MechanismNotApplicable {
                step: ctx.step_id(),
                kind: StepKind::Rest,
                mechanism,
            }),
        }
    }
}

/// Strain left after a transport: a fully recrystallized input keeps none.
fn remaining_strain(input: &Profile, increment: f64) -> f64 {
    if input.recrystallization_state() == RecrystallizationState::Full {
        0.0
    } else {
        input.strain() * (1.0 - increment)
    }
}

/// Output of a transport that does not advance recrystallization.
fn carry_over(ctx: &StepContext<'_>, grain_size: f64) -> Profile {
    let input = ctx.in_profile();
    Profile::new(
        remaining_strain(input, 0.0),
        grain_size,
        input.recrystallized_fraction(),
        ctx.exit_temperature(),
        ctx.config().threshold,
    )
}

fn recrystallize(
    ctx: &StepContext<'_>,
    step: &RestStep,
    mechanism: Mechanism,
    params: &RecrystallizationParameters,
    report: &mut KineticsReport,
) -> Result<Profile, KineticsError> {
    let driving = ctx
        .driving()
        .ok_or(KineticsError::MissingDrivingDeformation {
            step: ctx.step_id(),
        })?;
    let input = ctx.in_profile();
    let config = ctx.config();
    let temperature = report.temperature;
    let strain_rate = driving.strain_rate;
    let fraction_in = input.recrystallized_fraction();

    let critical_time = formulas::critical_value(
        params,
        driving.strain,
        strain_rate,
        driving.grain_size,
        temperature,
        config,
    );
    let reference_time = formulas::reference_value(
        params,
        driving.strain,
        strain_rate,
        driving.grain_size,
        temperature,
        config,
    );
    let recrystallized_grain_size = formulas::recrystallized_grain_size(
        params,
        driving.strain,
        strain_rate,
        driving.grain_size,
        temperature,
        config,
    );
    let finished_time =
        formulas::finished_progress(params, config.threshold) * reference_time;

    report.critical_value = Some(critical_time);
    report.reference_value = Some(reference_time);
    report.recrystallized_grain_size = Some(recrystallized_grain_size);
    report.finished_time = Some(finished_time);

    let span = reference_time - critical_time;
    let increment = if span > 0.0 && span.is_finite() {
        let virtual_time =
            critical_time + span * formulas::avrami_progress(params, fraction_in);
        report.virtual_time = Some(virtual_time);
        let total = formulas::avrami_fraction(
            params,
            (step.duration + virtual_time - critical_time) / span,
        );
        remaining_share(total, fraction_in)
    } else {
        0.0
    };
    report.fraction_increment = increment;

    let growth = ctx.material().grain_growth.as_ref();
    let grown_in = formulas::grain_growth(
        growth,
        input.grain_size(),
        step.duration,
        temperature,
        config,
    );
    let grown_recrystallized = settle_grain_size(
        formulas::grain_growth(
            growth,
            recrystallized_grain_size,
            step.duration - finished_time,
            temperature,
            config,
        ),
        grown_in,
    );
    let mixed = match mechanism {
        Mechanism::Static => {
            increment.powf(4.0 / 3.0) * grown_recrystallized
                + (1.0 - increment).powi(2) * grown_in
        }
        _ => grown_in + (grown_recrystallized - grown_in) * increment,
    };

    Ok(Profile::new(
        remaining_strain(input, increment),
        settle_grain_size(mixed, input.grain_size()),
        fraction_in + (1.0 - fraction_in) * increment,
        ctx.exit_temperature(),
        config.threshold,
    ))
}

/// Share of the structure untransformed at `fraction_in` that has
/// transformed once the curve reaches `total`.
fn remaining_share(total: f64, fraction_in: f64) -> f64 {
    if fraction_in >= 1.0 {
        return 0.0;
    }
    let share = (total - fraction_in).max(0.0) / (1.0 - fraction_in);
    if share.is_finite() {
        share.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
