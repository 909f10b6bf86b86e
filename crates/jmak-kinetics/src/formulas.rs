//! Pure kinetics equations.
//!
//! Every function is stateless and takes its constants through an explicit
//! [`KineticsConfig`]. Grain sizes are passed and returned in metres; the
//! fitted equations work in micrometres internally.
//!
//! The Avrami helpers never fail: inputs outside the curve's domain and
//! non-finite intermediate results map to `0` (fraction) or to the
//! untransformed input (grain size).

use jmak_core::KineticsConfig;
use jmak_material::{GrainGrowthParameters, PowerLaw, RecrystallizationParameters};

/// Metres to micrometres.
const MICRONS_PER_METRE: f64 = 1e6;

/// `exp(q / (R·T))`.
#[inline]
fn arrhenius(activation_energy: f64, temperature: f64, config: &KineticsConfig) -> f64 {
    (activation_energy / (config.gas_constant * temperature)).exp()
}

/// Evaluate `c · ε^e1 · ε̇^e2 · (d·1e6)^e3 · exp(q/(R·T))`.
///
/// `0^0` evaluates to `1`, so zero exponents disable a term even for zero
/// strain or strain rate.
pub fn power_law(
    law: PowerLaw,
    strain: f64,
    strain_rate: f64,
    grain_size: f64,
    temperature: f64,
    config: &KineticsConfig,
) -> f64 {
    law.coefficient
        * strain.powf(law.strain_exponent)
        * strain_rate.powf(law.strain_rate_exponent)
        * (grain_size * MICRONS_PER_METRE).powf(law.grain_size_exponent)
        * arrhenius(law.activation_energy, temperature, config)
}

/// Onset of recrystallization: a strain for dynamic, a time for
/// static and metadynamic recrystallization.
pub fn critical_value(
    params: &RecrystallizationParameters,
    strain: f64,
    strain_rate: f64,
    grain_size: f64,
    temperature: f64,
    config: &KineticsConfig,
) -> f64 {
    power_law(
        params.critical(),
        strain,
        strain_rate,
        grain_size,
        temperature,
        config,
    )
}

/// Characteristic value of the Avrami curve (typically the half value).
///
/// A reference value that does not exceed the critical value means no
/// recrystallization takes place.
pub fn reference_value(
    params: &RecrystallizationParameters,
    strain: f64,
    strain_rate: f64,
    grain_size: f64,
    temperature: f64,
    config: &KineticsConfig,
) -> f64 {
    power_law(
        params.reference(),
        strain,
        strain_rate,
        grain_size,
        temperature,
        config,
    )
}

/// Size of freshly recrystallized grains in metres.
///
/// Strain and strain rate are offset by `config.base_strain` and
/// `config.base_strain_rate` so that negative exponents stay finite at
/// zero strain.
pub fn recrystallized_grain_size(
    params: &RecrystallizationParameters,
    strain: f64,
    strain_rate: f64,
    grain_size: f64,
    temperature: f64,
    config: &KineticsConfig,
) -> f64 {
    power_law(
        params.grain_size(),
        strain + config.base_strain,
        strain_rate + config.base_strain_rate,
        grain_size,
        temperature,
        config,
    ) / MICRONS_PER_METRE
}

/// `1 - exp(k·xⁿ)`, the recrystallized fraction at normalized progress `x`.
///
/// Returns `0` for `x <= 0` (including NaN) and for non-finite results.
pub fn avrami_fraction(params: &RecrystallizationParameters, progress: f64) -> f64 {
    if progress.is_nan() || progress <= 0.0 {
        return 0.0;
    }
    let fraction = 1.0 - (params.k * progress.powf(params.n)).exp();
    if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Inverse of [`avrami_fraction`]: the normalized progress at which the
/// curve reaches `fraction`.
///
/// Returns `0` for `fraction <= 0` and `+∞` for `fraction >= 1`.
pub fn avrami_progress(params: &RecrystallizationParameters, fraction: f64) -> f64 {
    if fraction.is_nan() || fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return f64::INFINITY;
    }
    ((1.0 - fraction).ln() / params.k).powf(1.0 / params.n)
}

/// Normalized progress at which only `threshold` remains unrecrystallized.
pub fn finished_progress(params: &RecrystallizationParameters, threshold: f64) -> f64 {
    (threshold.ln() / params.k).powf(1.0 / params.n)
}

/// Grain size after `duration` seconds of grain growth.
///
/// `d^d1 = d0^d1 + d2 · t · exp(-qd/(R·T))` in micrometres. Returns
/// `grain_size` unchanged without growth data, for negative durations and
/// for non-finite results.
pub fn grain_growth(
    params: Option<&GrainGrowthParameters>,
    grain_size: f64,
    duration: f64,
    temperature: f64,
    config: &KineticsConfig,
) -> f64 {
    let Some(g) = params else {
        return grain_size;
    };
    if duration < 0.0 {
        return grain_size;
    }
    let grown = ((grain_size * MICRONS_PER_METRE).powf(g.d1)
        + g.d2 * duration * arrhenius(-g.qd, temperature, config))
    .powf(1.0 / g.d1)
        / MICRONS_PER_METRE;
    if grown.is_finite() {
        grown
    } else {
        grain_size
    }
}

/// Temperature compensated strain rate `ε̇ · exp(q/(R·T))`.
pub fn zener_hollomon(
    strain_rate: f64,
    activation_energy: f64,
    temperature: f64,
    config: &KineticsConfig,
) -> f64 {
    strain_rate * arrhenius(activation_energy, temperature, config)
}

/// Evaluation temperature of a step: the mean of entry and exit.
pub fn mean_temperature(entry: f64, exit: f64) -> f64 {
    (entry + exit) / 2.0
}
