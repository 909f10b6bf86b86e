//! Literature-fitted parameter sets for three hot-rolling steel grades.
//!
//! Coefficients follow the sign convention of [`crate::params`]: every
//! Avrami `k` is negative, and the static and metadynamic reference times
//! fall with strain and strain rate through negative exponents. Reference
//! and grain size activation energies of the dynamic and metadynamic
//! bundles scale with the grade's deformation activation energy.

use crate::params::{GrainGrowthParameters, MaterialParameters, RecrystallizationParameters};

/// `ln(0.5)`: static and metadynamic reference values are half times.
const LN_HALF: f64 = -std::f64::consts::LN_2;

/// Conversion factor from peak strain to critical strain.
const S355_CRITICAL_RATIO: f64 = 0.79;
const C54SICE6_CRITICAL_RATIO: f64 = 0.70;
const C20_CRITICAL_RATIO: f64 = 0.8987;

/// Deformation activation energy of S355J2 in J/mol.
pub const S355_DEFORMATION_ENERGY: f64 = 258_435.17;
/// Deformation activation energy of C54SiCe6 in J/mol.
pub const C54SICE6_DEFORMATION_ENERGY: f64 = 291_876.66;
/// Deformation activation energy of C20 in J/mol.
pub const C20_DEFORMATION_ENERGY: f64 = 278_877.95;

/// Structural steel S355J2.
pub fn s355() -> MaterialParameters {
    let q = S355_DEFORMATION_ENERGY;
    MaterialParameters {
        dynamic: Some(RecrystallizationParameters {
            k: -1.4952,
            n: 1.7347,
            a1: 1.2338e-3 * S355_CRITICAL_RATIO,
            a3: 0.1971,
            a4: 0.3007,
            qa: q * 0.1971,
            b1: 6.6839e-4,
            b3: 0.2265,
            b4: 0.4506,
            qb: q * 0.2265,
            c1: 1072.98,
            c3: -0.1629,
            qc: q * -0.1629,
            ..Default::default()
        }),
        static_: Some(RecrystallizationParameters {
            k: LN_HALF,
            n: 1.505,
            b1: 3.7704e-8,
            b2: -1.1988,
            b3: -1.003,
            b4: 0.1886,
            qb: 163_457.62,
            c1: 0.1953,
            c2: -0.7016,
            c3: -0.0101,
            c4: 1.2052,
            qc: 6841.34,
            ..Default::default()
        }),
        metadynamic: Some(RecrystallizationParameters {
            k: LN_HALF,
            n: 2.038,
            b1: 6.9235e-2,
            b3: -0.9245,
            qb: 248_617.4 - 0.9245 * q,
            c1: 840.57,
            c3: -0.1629,
            qc: q * -0.1629,
            ..Default::default()
        }),
        grain_growth: Some(GrainGrowthParameters {
            d1: 6.0,
            d2: 1.9144e8,
            qd: 30_000.0,
        }),
        deformation_activation_energy: Some(q),
    }
}

/// Spring steel C54SiCe6.
pub fn c54sice6() -> MaterialParameters {
    let q = C54SICE6_DEFORMATION_ENERGY;
    MaterialParameters {
        dynamic: Some(RecrystallizationParameters {
            k: -1.6503,
            n: 1.4409,
            a1: 1.2338e-3 * C54SICE6_CRITICAL_RATIO,
            a3: 0.2013,
            a4: 0.1022,
            qa: q * 0.2013,
            b1: 2.0731e-3,
            b3: 0.2147,
            b4: 0.0724,
            qb: q * 0.2147,
            c1: 3339.98,
            c3: -0.1660,
            qc: q * -0.1660,
            ..Default::default()
        }),
        static_: Some(RecrystallizationParameters {
            k: LN_HALF,
            n: 0.736,
            b1: 2.7061e-6,
            b2: -2.0313,
            b3: -0.3340,
            b4: 0.5438,
            qb: 50_086.94,
            c1: 0.8578,
            c2: -0.3356,
            c3: -0.0137,
            c4: 1.072,
            qc: 14_359.46,
            ..Default::default()
        }),
        metadynamic: Some(RecrystallizationParameters {
            k: LN_HALF,
            n: 0.95,
            b1: 5.0448e-3,
            b3: -0.8523,
            qb: 286_514.93 - 0.8523 * q,
            c1: 5329.19,
            c3: -0.1660,
            qc: q * -0.1660,
            ..Default::default()
        }),
        grain_growth: Some(GrainGrowthParameters {
            d1: 6.8998,
            d2: 3.8637e14,
            qd: 50_000.0,
        }),
        deformation_activation_energy: Some(q),
    }
}

/// Case-hardening steel C20.
pub fn c20() -> MaterialParameters {
    let q = C20_DEFORMATION_ENERGY;
    MaterialParameters {
        dynamic: Some(RecrystallizationParameters {
            k: -1.169,
            n: 1.5158,
            a1: 2.1517e-3 * C20_CRITICAL_RATIO,
            a3: 0.1814,
            a4: 0.092,
            qa: q * 0.1814,
            b1: 5.1143e-4,
            b3: 0.1865,
            b4: 0.5252,
            qb: q * 0.1865,
            c1: 3552.75,
            c3: -0.1837,
            qc: q * -0.1837,
            ..Default::default()
        }),
        static_: Some(RecrystallizationParameters {
            k: LN_HALF,
            n: 1.4919,
            b1: 9.9684e-13,
            b2: -0.73206,
            b3: -0.15703,
            b4: 3.9289,
            qb: 92_146.84,
            c1: 0.6143,
            c2: -0.1017,
            c3: -0.0130,
            c4: 1.1683,
            qc: 5008.18,
            ..Default::default()
        }),
        metadynamic: Some(RecrystallizationParameters {
            k: LN_HALF,
            n: 1.353,
            b1: 7.0757,
            b3: -0.5408,
            qb: 270_024.33 - 0.5408 * q,
            c1: 4263.30,
            c3: -0.1837,
            qc: q * -0.1837,
            ..Default::default()
        }),
        grain_growth: Some(GrainGrowthParameters {
            d1: 7.0,
            d2: 6.4047e37,
            qd: 655_043.37,
        }),
        deformation_activation_energy: Some(q),
    }
}

const S355_ALIASES: &[&str] = &["s355j2"];
const NO_ALIASES: &[&str] = &[];

/// Every built-in grade as `(name, aliases, parameters)`.
pub fn all() -> Vec<(&'static str, &'static [&'static str], MaterialParameters)> {
    vec![
        ("S355", S355_ALIASES, s355()),
        ("C54SiCe6", NO_ALIASES, c54sice6()),
        ("C20", NO_ALIASES, c20()),
    ]
}
