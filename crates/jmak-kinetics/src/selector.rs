//! Mechanism selection as an ordered transition table.
//!
//! Each step kind has a fixed list of [`Rule`]s. The first rule whose
//! condition holds and whose material data is present decides the
//! mechanism. A rule whose condition holds but whose data is missing is
//! skipped; if the rule is marked `warn_when_skipped`, the skip is recorded
//! as a [`Degradation`] and logged at warn level.
//!
//! Nothing else in the workspace infers a mechanism.

use jmak_core::{Mechanism, RecrystallizationState, StepKind, StepSpec};
use serde::Serialize;
use smallvec::SmallVec;

use crate::context::StepContext;
use crate::formulas;

/// A predicate over the step context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    /// Input strain plus step strain exceeds the critical strain of dynamic
    /// recrystallization. Holds when the critical strain is unknown
    /// because the material has no dynamic data.
    AboveCriticalStrain,
    /// The input profile is fully recrystallized.
    InputFull,
    /// The input profile is partially recrystallized, or the driving
    /// deformation exceeded its critical strain.
    InputPartialOrDrivenPastCritical,
    /// Always holds.
    Always,
}

/// One row of a transition table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule {
    /// Stable identifier used in logs and degradations.
    pub name: &'static str,
    /// When the rule applies.
    pub condition: Condition,
    /// Mechanism chosen when the rule applies and its data is present.
    pub mechanism: Mechanism,
    /// Whether skipping this rule for missing data is a degradation.
    pub warn_when_skipped: bool,
}

/// Transition table for deformation steps.
pub const DEFORMATION_RULES: &[Rule] = &[
    Rule {
        name: "dynamic_onset",
        condition: Condition::AboveCriticalStrain,
        mechanism: Mechanism::Dynamic,
        warn_when_skipped: true,
    },
    Rule {
        name: "below_critical_strain",
        condition: Condition::Always,
        mechanism: Mechanism::None,
        warn_when_skipped: false,
    },
];

/// Transition table for rest steps.
pub const REST_RULES: &[Rule] = &[
    Rule {
        name: "full_grain_growth",
        condition: Condition::InputFull,
        mechanism: Mechanism::GrainGrowth,
        warn_when_skipped: false,
    },
    Rule {
        name: "full_carry_over",
        condition: Condition::InputFull,
        mechanism: Mechanism::None,
        warn_when_skipped: false,
    },
    Rule {
        name: "metadynamic",
        condition: Condition::InputPartialOrDrivenPastCritical,
        mechanism: Mechanism::Metadynamic,
        warn_when_skipped: true,
    },
    Rule {
        name: "static",
        condition: Condition::Always,
        mechanism: Mechanism::Static,
        warn_when_skipped: true,
    },
    Rule {
        name: "fallback",
        condition: Condition::Always,
        mechanism: Mechanism::None,
        warn_when_skipped: false,
    },
];

/// The transition table for `kind`.
pub fn rules_for(kind: StepKind) -> &'static [Rule] {
    match kind {
        StepKind::Deformation => DEFORMATION_RULES,
        StepKind::Rest => REST_RULES,
    }
}

/// A rule that applied but could not be used for lack of data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Degradation {
    /// Name of the skipped rule.
    pub rule: &'static str,
    /// Mechanism the rule would have chosen.
    pub mechanism: Mechanism,
}

/// Outcome of mechanism selection for one step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Selection {
    /// The chosen mechanism.
    pub mechanism: Mechanism,
    /// Name of the deciding rule.
    pub rule: &'static str,
    /// Rules skipped for missing data, in table order.
    pub degradations: SmallVec<[Degradation; 2]>,
}

impl Selection {
    /// Whether any rule was skipped for missing data.
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}

/// Critical strain of dynamic recrystallization for a deformation step,
/// if the material has dynamic data.
pub fn critical_strain(ctx: &StepContext<'_>) -> Option<f64> {
    let StepSpec::Deformation(step) = ctx.step() else {
        return None;
    };
    let params = ctx.material().dynamic.as_ref()?;
    let input = ctx.in_profile();
    Some(formulas::critical_value(
        params,
        input.strain(),
        step.strain_rate,
        input.grain_size(),
        ctx.temperature(),
        ctx.config(),
    ))
}

fn holds(condition: Condition, ctx: &StepContext<'_>) -> bool {
    let state = ctx.in_profile().recrystallization_state();
    match condition {
        Condition::Always => true,
        Condition::InputFull => state == RecrystallizationState::Full,
        Condition::InputPartialOrDrivenPastCritical => {
            state == RecrystallizationState::Partial
                || ctx
                    .driving()
                    .is_some_and(|d| d.exceeded_critical_strain())
        }
        Condition::AboveCriticalStrain => {
            let StepSpec::Deformation(step) = ctx.step() else {
                return false;
            };
            let total = ctx.in_profile().strain() + step.strain;
            critical_strain(ctx).is_none_or(|critical| total > critical)
        }
    }
}

/// Choose the mechanism for the step in `ctx`.
///
/// Deterministic and infallible: every table ends in an unconditional
/// `none` rule.
pub fn select(ctx: &StepContext<'_>) -> Selection {
    let mut degradations = SmallVec::new();
    for rule in rules_for(ctx.step().kind()) {
        if !holds(rule.condition, ctx) {
            continue;
        }
        if ctx.material().supports(rule.mechanism) {
            return Selection {
                mechanism: rule.mechanism,
                rule: rule.name,
                degradations,
            };
        }
        if rule.warn_when_skipped {
            tracing::warn!(
                step = %ctx.step_id(),
                label = ctx.step().label(),
                rule = rule.name,
                mechanism = %rule.mechanism,
                "no parameters for applicable mechanism, falling back"
            );
            degradations.push(Degradation {
                rule: rule.name,
                mechanism: rule.mechanism,
            });
        }
    }
    Selection {
        mechanism: Mechanism::None,
        rule: "fallback",
        degradations,
    }
}
